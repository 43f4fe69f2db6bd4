//! Request and response bodies of the webshop REST API.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use webshop_core::{BrandId, CategoryId, OrderId, OrderStatus, Price, ProductId, Role, UserId};

// =============================================================================
// Auth
// =============================================================================

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for authenticated endpoints.
    pub access_token: String,
    /// Profile of the logged-in user.
    pub user: UserProfile,
}

/// Profile returned on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

// =============================================================================
// Catalog
// =============================================================================

/// Category reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Brand reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

/// Name-only reference embedded in a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// A product as listed by the catalog endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// List price before discount.
    pub price: Price,
    /// Discount in percent (0-100).
    #[serde(default)]
    pub discount_percentage: Decimal,
    /// Price the customer pays.
    pub discounted_price: Price,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub current_quantity: i64,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub category: Option<NamedRef>,
    #[serde(default)]
    pub brand: Option<NamedRef>,
}

impl Product {
    /// Whether the product is currently discounted.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discount_percentage > Decimal::ZERO
    }

    /// Category name, or `N/A` when the product has none.
    #[must_use]
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map_or("N/A", |c| c.name.as_str())
    }

    /// Brand name, or `N/A` when the product has none.
    #[must_use]
    pub fn brand_name(&self) -> &str {
        self.brand.as_ref().map_or("N/A", |b| b.name.as_str())
    }
}

/// Stock figures from `GET /products/{id}/quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStock {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub name: String,
    pub initial_quantity: i64,
    pub sold_quantity: i64,
    pub current_quantity: i64,
    pub in_stock: bool,
}

/// Body of `POST /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percentage: Decimal,
    pub gender: String,
    pub initial_quantity: i64,
    pub category_id: CategoryId,
    pub brand_id: BrandId,
}

// =============================================================================
// Orders
// =============================================================================

/// One line of an order request. Prices are never sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
}

/// Body of `PATCH /orders/{id}/status`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// An order as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, alias = "total_price")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<OrderLine>>,
}

impl Order {
    /// Parse `created_at`, which the backend sends either as RFC 3339 or as
    /// a naive UTC timestamp.
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    /// Number of lines, if the backend included them.
    #[must_use]
    pub fn item_count(&self) -> Option<usize> {
        self.items.as_ref().map(Vec::len)
    }
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price_at_purchase: Decimal,
    #[serde(default)]
    pub subtotal: Decimal,
}

/// Create responses are either the bare object or wrapped with a message.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Created<T> {
    Wrapped {
        #[serde(alias = "order", alias = "product")]
        item: T,
    },
    Bare(T),
}

impl<T> Created<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { item } | Self::Bare(item) => item,
        }
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Dashboard summary from `GET /reports/dashboard`.
///
/// The field names of this endpoint are not confirmed, so every field is
/// optional and anything unrecognized is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    #[serde(default)]
    pub total_revenue: Option<Decimal>,
    #[serde(default)]
    pub total_orders: Option<u64>,
    #[serde(default)]
    pub total_users: Option<u64>,
    #[serde(default)]
    pub top_products: Option<Vec<TopProduct>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Dashboard entry for a best-selling product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    #[serde(default)]
    pub sold: u64,
}

/// Response of `GET /reports/top-selling-products`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopSellingReport {
    #[serde(default)]
    pub top_products: Vec<TopSellingProduct>,
    #[serde(default)]
    pub count: usize,
}

/// One row of the top-selling report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSellingProduct {
    pub product_id: ProductId,
    pub product_name: String,
    pub total_sold: u64,
    pub total_revenue: Decimal,
}

/// Response of `GET /reports/earnings/daily`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEarnings {
    pub date: chrono::NaiveDate,
    pub total_earnings: Decimal,
    pub total_orders: u64,
}

// =============================================================================
// Users
// =============================================================================

/// A row of `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
}
