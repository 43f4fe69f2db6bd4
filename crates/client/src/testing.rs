//! Scripted in-memory backend for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};

use webshop_core::{BrandId, CategoryId, OrderId, OrderStatus, Price, ProductId, Role, UserId};

use crate::api::{
    Brand, Category, CreateOrderRequest, DailyEarnings, DashboardReport, LoginResponse,
    NamedRef, NewProduct, Order, OrderItemRequest, Product, ProductStock, SearchQuery, StoreApi,
    TopSellingReport, UserProfile, UserRecord,
};
use crate::error::ClientError;

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login(String),
    Categories,
    Brands,
    Products,
    Search(SearchQuery),
    ProductStock(ProductId),
    CreateProduct(String),
    CreateOrder(Vec<OrderItemRequest>),
    Orders,
    UpdateOrderStatus(OrderId, OrderStatus),
    Dashboard,
    TopSelling(u32),
    DailyEarnings(NaiveDate),
    Users,
}

impl Call {
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Categories => "categories",
            Self::Brands => "brands",
            Self::Products => "products",
            Self::Search(_) => "search",
            Self::ProductStock(_) => "product_stock",
            Self::CreateProduct(_) => "create_product",
            Self::CreateOrder(_) => "create_order",
            Self::Orders => "orders",
            Self::UpdateOrderStatus(..) => "update_order_status",
            Self::Dashboard => "dashboard",
            Self::TopSelling(_) => "top_selling",
            Self::DailyEarnings(_) => "daily_earnings",
            Self::Users => "users",
        }
    }
}

/// Backend fake that records every call and answers from canned data.
pub struct FakeApi {
    role: Role,
    products: Vec<Product>,
    orders: Mutex<Vec<Order>>,
    order_delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
    tokens: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, (u16, String)>>,
    sequence: AtomicI64,
}

impl FakeApi {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            products: vec![
                product(1, "Sneaker", 999, true),
                product(2, "Cap", 500, true),
                product(3, "Boot", 4500, false),
            ],
            orders: Mutex::new(Vec::new()),
            order_delay: None,
            calls: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            sequence: AtomicI64::new(0),
        }
    }

    /// Make `create_order` wait before answering.
    pub fn with_order_delay(mut self, delay: Duration) -> Self {
        self.order_delay = Some(delay);
        self
    }

    /// Answer `endpoint` with an error body from now on.
    pub fn fail(&self, endpoint: &'static str, status: u16, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(endpoint, (status, message.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.endpoint() == endpoint)
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Bearer tokens seen by authenticated calls, in order.
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        let endpoint = call.endpoint();
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(endpoint) {
            Some((status, message)) => Err(ClientError::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn record_authed(&self, token: &SecretString, call: Call) -> Result<(), ClientError> {
        self.tokens
            .lock()
            .unwrap()
            .push(token.expose_secret().to_string());
        self.record(call)
    }

    fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }
}

pub fn product(id: i64, name: &str, cents: i64, in_stock: bool) -> Product {
    let price = Price::from_cents(cents).unwrap();
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: None,
        price,
        discount_percentage: Decimal::ZERO,
        discounted_price: price,
        in_stock,
        current_quantity: if in_stock { 10 } else { 0 },
        gender: "Unisex".to_string(),
        category: Some(NamedRef {
            name: "Shoes".to_string(),
        }),
        brand: None,
    }
}

impl StoreApi for FakeApi {
    async fn login(&self, username: &str, _password: &str) -> Result<LoginResponse, ClientError> {
        self.record(Call::Login(username.to_string()))?;
        let n = self.next_id();
        Ok(LoginResponse {
            access_token: format!("token-{n}"),
            user: UserProfile {
                id: UserId::new(n),
                username: username.to_string(),
                role: self.role,
            },
        })
    }

    async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.record(Call::Categories)?;
        Ok(vec![
            Category {
                id: CategoryId::new(1),
                name: "Shoes".to_string(),
            },
            Category {
                id: CategoryId::new(2),
                name: "Hats".to_string(),
            },
        ])
    }

    async fn brands(&self) -> Result<Vec<Brand>, ClientError> {
        self.record(Call::Brands)?;
        Ok(vec![Brand {
            id: BrandId::new(7),
            name: "Acme".to_string(),
        }])
    }

    async fn products(&self) -> Result<Vec<Product>, ClientError> {
        self.record(Call::Products)?;
        Ok(self.products.clone())
    }

    async fn search_products(&self, query: &SearchQuery) -> Result<Vec<Product>, ClientError> {
        self.record(Call::Search(query.clone()))?;
        Ok(self.products.iter().filter(|p| p.in_stock).cloned().collect())
    }

    async fn product_stock(&self, product_id: ProductId) -> Result<ProductStock, ClientError> {
        self.record(Call::ProductStock(product_id))?;
        Ok(ProductStock {
            product_id: Some(product_id),
            name: "Sneaker".to_string(),
            initial_quantity: 10,
            sold_quantity: 3,
            current_quantity: 7,
            in_stock: true,
        })
    }

    async fn create_product(
        &self,
        token: &SecretString,
        product: &NewProduct,
    ) -> Result<Product, ClientError> {
        self.record_authed(token, Call::CreateProduct(product.name.clone()))?;
        let mut created = self::product(100 + self.next_id(), &product.name, 0, true);
        created.price = product.price;
        created.discounted_price = product.price;
        Ok(created)
    }

    async fn create_order(
        &self,
        token: &SecretString,
        request: &CreateOrderRequest,
    ) -> Result<Order, ClientError> {
        self.record_authed(token, Call::CreateOrder(request.items.clone()))?;
        if let Some(delay) = self.order_delay {
            tokio::time::sleep(delay).await;
        }

        let total = request
            .items
            .iter()
            .filter_map(|item| {
                self.products
                    .iter()
                    .find(|p| p.id == item.product_id)
                    .map(|p| p.discounted_price.times(item.quantity))
            })
            .sum();

        let order = Order {
            id: OrderId::new(self.next_id()),
            status: OrderStatus::Pending,
            total_amount: total,
            created_at: Some("2024-03-01T10:15:30".to_string()),
            items: None,
        };
        self.orders.lock().unwrap().push(order.clone());
        Ok(order)
    }

    async fn orders(&self, token: &SecretString) -> Result<Vec<Order>, ClientError> {
        self.record_authed(token, Call::Orders)?;
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn update_order_status(
        &self,
        token: &SecretString,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ClientError> {
        self.record_authed(token, Call::UpdateOrderStatus(order_id, status))?;
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: "Order not found".to_string(),
            })?;
        order.status = status;
        Ok(order.clone())
    }

    async fn dashboard(&self, token: &SecretString) -> Result<DashboardReport, ClientError> {
        self.record_authed(token, Call::Dashboard)?;
        Ok(DashboardReport {
            total_orders: Some(self.orders.lock().unwrap().len() as u64),
            ..DashboardReport::default()
        })
    }

    async fn top_selling(
        &self,
        token: &SecretString,
        limit: u32,
    ) -> Result<TopSellingReport, ClientError> {
        self.record_authed(token, Call::TopSelling(limit))?;
        Ok(TopSellingReport::default())
    }

    async fn daily_earnings(
        &self,
        token: &SecretString,
        date: NaiveDate,
    ) -> Result<DailyEarnings, ClientError> {
        self.record_authed(token, Call::DailyEarnings(date))?;
        Ok(DailyEarnings {
            date,
            total_earnings: Decimal::new(2498, 2),
            total_orders: 1,
        })
    }

    async fn users(&self, token: &SecretString) -> Result<Vec<UserRecord>, ClientError> {
        self.record_authed(token, Call::Users)?;
        Ok(vec![UserRecord {
            id: UserId::new(1),
            username: "admin".to_string(),
            role: Role::Admin,
            email: None,
        }])
    }
}
