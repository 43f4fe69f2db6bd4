//! Backend access.
//!
//! [`StoreApi`] is the single external dependency of the client. The
//! production implementation is [`HttpStoreApi`]; tests substitute a scripted
//! fake.

mod http;
pub mod types;

use std::future::Future;

use chrono::NaiveDate;
use secrecy::SecretString;

use webshop_core::{OrderId, OrderStatus, ProductId};

use crate::error::ClientError;

pub use http::HttpStoreApi;
pub use types::*;

/// Query-string pairs for the product search endpoint.
pub type SearchQuery = Vec<(&'static str, String)>;

/// Typed access to the webshop REST endpoints.
///
/// Methods taking a `token` send it as a bearer credential. All others are
/// public reads (plus login).
pub trait StoreApi: Send + Sync {
    /// `POST /auth/login`
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<LoginResponse, ClientError>> + Send;

    /// `GET /products/categories`
    fn categories(&self) -> impl Future<Output = Result<Vec<Category>, ClientError>> + Send;

    /// `GET /products/brands`
    fn brands(&self) -> impl Future<Output = Result<Vec<Brand>, ClientError>> + Send;

    /// `GET /products`
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, ClientError>> + Send;

    /// `GET /products/search`
    fn search_products(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<Product>, ClientError>> + Send;

    /// `GET /products/{id}/quantity`
    fn product_stock(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<ProductStock, ClientError>> + Send;

    /// `POST /products`
    fn create_product(
        &self,
        token: &SecretString,
        product: &NewProduct,
    ) -> impl Future<Output = Result<Product, ClientError>> + Send;

    /// `POST /orders`
    fn create_order(
        &self,
        token: &SecretString,
        request: &CreateOrderRequest,
    ) -> impl Future<Output = Result<Order, ClientError>> + Send;

    /// `GET /orders`
    fn orders(
        &self,
        token: &SecretString,
    ) -> impl Future<Output = Result<Vec<Order>, ClientError>> + Send;

    /// `PATCH /orders/{id}/status`
    fn update_order_status(
        &self,
        token: &SecretString,
        order_id: OrderId,
        status: OrderStatus,
    ) -> impl Future<Output = Result<Order, ClientError>> + Send;

    /// `GET /reports/dashboard`
    fn dashboard(
        &self,
        token: &SecretString,
    ) -> impl Future<Output = Result<DashboardReport, ClientError>> + Send;

    /// `GET /reports/top-selling-products`
    fn top_selling(
        &self,
        token: &SecretString,
        limit: u32,
    ) -> impl Future<Output = Result<TopSellingReport, ClientError>> + Send;

    /// `GET /reports/earnings/daily`
    fn daily_earnings(
        &self,
        token: &SecretString,
        date: NaiveDate,
    ) -> impl Future<Output = Result<DailyEarnings, ClientError>> + Send;

    /// `GET /users`
    fn users(
        &self,
        token: &SecretString,
    ) -> impl Future<Output = Result<Vec<UserRecord>, ClientError>> + Send;
}
