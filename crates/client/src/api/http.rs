//! `reqwest` implementation of [`StoreApi`].

use chrono::NaiveDate;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use webshop_core::{OrderId, OrderStatus, ProductId};

use super::types::{
    Brand, Category, CreateOrderRequest, Created, DailyEarnings, DashboardReport, LoginRequest,
    LoginResponse, NewProduct, Order, OrderStatusUpdate, Product, ProductStock, TopSellingReport,
    UserRecord,
};
use super::{SearchQuery, StoreApi};
use crate::config::ClientConfig;
use crate::error::{ApiErrorBody, ClientError};

/// HTTP client for the webshop backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct HttpStoreApi {
    client: Client,
    base: String,
}

impl std::fmt::Debug for HttpStoreApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStoreApi")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl HttpStoreApi {
    /// Create a client for the configured API base URL.
    ///
    /// No request timeout is set; the transport defaults apply.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base: config.base().to_string(),
        })
    }

    /// API base URL without a trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Send a request and decode a JSON body.
    ///
    /// Non-2xx responses become [`ClientError::Api`] carrying the server's
    /// error text.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Request to webshop API failed");
            ClientError::Http(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .unwrap_or_default()
                .into_message(status.as_u16());
            error!(status = status.as_u16(), error = %message, "Webshop API error");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse webshop API response");
            ClientError::Parse(e.to_string())
        })
    }

    fn authed(&self, request: RequestBuilder, token: &SecretString) -> RequestBuilder {
        request.bearer_auth(token.expose_secret())
    }
}

impl StoreApi for HttpStoreApi {
    #[instrument(skip(self, password), fields(username = %username))]
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { username, password });

        let response: LoginResponse = self.send(request).await?;
        debug!(user_id = %response.user.id, role = %response.user.role, "Logged in");
        Ok(response)
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.send(self.client.get(self.url("/products/categories")))
            .await
    }

    #[instrument(skip(self))]
    async fn brands(&self) -> Result<Vec<Brand>, ClientError> {
        self.send(self.client.get(self.url("/products/brands"))).await
    }

    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, ClientError> {
        let products: Vec<Product> = self.send(self.client.get(self.url("/products"))).await?;
        debug!(count = products.len(), "Products loaded");
        Ok(products)
    }

    #[instrument(skip(self), fields(filters = query.len()))]
    async fn search_products(&self, query: &SearchQuery) -> Result<Vec<Product>, ClientError> {
        let request = self
            .client
            .get(self.url("/products/search"))
            .query(query.as_slice());

        let products: Vec<Product> = self.send(request).await?;
        debug!(count = products.len(), "Search completed");
        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product_stock(&self, product_id: ProductId) -> Result<ProductStock, ClientError> {
        self.send(
            self.client
                .get(self.url(&format!("/products/{product_id}/quantity"))),
        )
        .await
    }

    #[instrument(skip(self, token, product), fields(name = %product.name))]
    async fn create_product(
        &self,
        token: &SecretString,
        product: &NewProduct,
    ) -> Result<Product, ClientError> {
        let request = self.authed(self.client.post(self.url("/products")), token);
        let created: Created<Product> = self.send(request.json(product)).await?;
        let product = created.into_inner();
        debug!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, token, request), fields(lines = request.items.len()))]
    async fn create_order(
        &self,
        token: &SecretString,
        request: &CreateOrderRequest,
    ) -> Result<Order, ClientError> {
        let builder = self.authed(self.client.post(self.url("/orders")), token);
        let created: Created<Order> = self.send(builder.json(request)).await?;
        let order = created.into_inner();
        debug!(order_id = %order.id, "Order created");
        Ok(order)
    }

    #[instrument(skip(self, token))]
    async fn orders(&self, token: &SecretString) -> Result<Vec<Order>, ClientError> {
        self.send(self.authed(self.client.get(self.url("/orders")), token))
            .await
    }

    #[instrument(skip(self, token), fields(order_id = %order_id, status = %status))]
    async fn update_order_status(
        &self,
        token: &SecretString,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ClientError> {
        let request = self
            .authed(
                self.client
                    .patch(self.url(&format!("/orders/{order_id}/status"))),
                token,
            )
            .json(&OrderStatusUpdate { status });

        let updated: Created<Order> = self.send(request).await?;
        Ok(updated.into_inner())
    }

    #[instrument(skip(self, token))]
    async fn dashboard(&self, token: &SecretString) -> Result<DashboardReport, ClientError> {
        self.send(self.authed(self.client.get(self.url("/reports/dashboard")), token))
            .await
    }

    #[instrument(skip(self, token))]
    async fn top_selling(
        &self,
        token: &SecretString,
        limit: u32,
    ) -> Result<TopSellingReport, ClientError> {
        let request = self
            .authed(
                self.client.get(self.url("/reports/top-selling-products")),
                token,
            )
            .query(&[("limit", limit)]);

        self.send(request).await
    }

    #[instrument(skip(self, token), fields(date = %date))]
    async fn daily_earnings(
        &self,
        token: &SecretString,
        date: NaiveDate,
    ) -> Result<DailyEarnings, ClientError> {
        let request = self
            .authed(self.client.get(self.url("/reports/earnings/daily")), token)
            .query(&[("date", date.format("%Y-%m-%d").to_string())]);

        self.send(request).await
    }

    #[instrument(skip(self, token))]
    async fn users(&self, token: &SecretString) -> Result<Vec<UserRecord>, ClientError> {
        self.send(self.authed(self.client.get(self.url("/users")), token))
            .await
    }
}
