//! Integration tests for the webshop client.
//!
//! [`MockBackend`] serves the webshop REST API from an in-process `axum`
//! router on `127.0.0.1:0`. Tests drive the real [`HttpStoreApi`] and
//! [`StoreClient`] against it and inspect the recorded requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p webshop-integration-tests
//! ```
//!
//! # Seed Data
//!
//! | User | Password | Role |
//! |------|----------|------|
//! | `alice` | `secret` | `simple_user` |
//! | `ava` | `secret` | `advanced_user` |
//! | `adam` | `secret` | `admin` |
//!
//! Products: `1` Sneaker ($9.99, 10 in stock), `2` Cap ($5.00, 3 in stock),
//! `3` Boot ($45.00, sold out), `4` Runner ($120.00, 25% off, 4 in stock).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use webshop_client::{ClientConfig, HttpStoreApi, StoreClient};

/// Timestamp stamped on every mock record.
const CREATED_AT: &str = "2024-03-01T10:15:30.123456";

const STATUSES: [&str; 5] = ["pending", "confirmed", "shipped", "delivered", "cancelled"];

// =============================================================================
// Recording
// =============================================================================

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Decoded query string pairs in order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

// =============================================================================
// Seed data
// =============================================================================

#[derive(Debug, Clone)]
struct MockProduct {
    id: i64,
    name: String,
    price_cents: i64,
    discount: i64,
    gender: &'static str,
    category_id: i64,
    brand_id: i64,
    initial: i64,
    sold: i64,
}

impl MockProduct {
    const fn discounted_cents(&self) -> i64 {
        self.price_cents * (100 - self.discount) / 100
    }

    const fn available(&self) -> i64 {
        self.initial - self.sold
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "description": null,
            "price": dollars(self.price_cents),
            "discount_percentage": self.discount as f64,
            "discounted_price": dollars(self.discounted_cents()),
            "gender": self.gender,
            "initial_quantity": self.initial,
            "category": named(&CATEGORIES, self.category_id),
            "brand": named(&BRANDS, self.brand_id),
            "sizes": [],
            "colors": [],
            "created_at": CREATED_AT,
            "updated_at": CREATED_AT,
            "current_quantity": self.available(),
            "in_stock": self.available() > 0,
        })
    }
}

const USERS: [(i64, &str, &str, &str); 3] = [
    (1, "alice", "secret", "simple_user"),
    (2, "ava", "secret", "advanced_user"),
    (3, "adam", "secret", "admin"),
];

const CATEGORIES: [(i64, &str); 2] = [(1, "Shoes"), (2, "Hats")];
const BRANDS: [(i64, &str); 2] = [(1, "Acme"), (2, "Globex")];

#[allow(clippy::cast_precision_loss)]
fn dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

fn named(table: &[(i64, &str)], id: i64) -> Value {
    table
        .iter()
        .find(|(row_id, _)| *row_id == id)
        .map_or(Value::Null, |(id, name)| {
            json!({"id": id, "name": name, "description": null})
        })
}

fn seed_products() -> Vec<MockProduct> {
    let product = |id, name: &str, price_cents, discount, gender, category_id, brand_id, initial| {
        MockProduct {
            id,
            name: name.to_string(),
            price_cents,
            discount,
            gender,
            category_id,
            brand_id,
            initial,
            sold: 0,
        }
    };
    vec![
        product(1, "Sneaker", 999, 0, "Men", 1, 1, 10),
        product(2, "Cap", 500, 0, "Unisex", 2, 2, 3),
        product(3, "Boot", 4500, 0, "Women", 1, 2, 0),
        product(4, "Runner", 12000, 25, "Men", 1, 1, 4),
    ]
}

// =============================================================================
// State
// =============================================================================

/// Mutable backend state shared by the handlers.
#[derive(Debug)]
pub struct BackendState {
    requests: Mutex<Vec<RecordedRequest>>,
    failures: Mutex<HashMap<(String, String), (StatusCode, Value)>>,
    products: Mutex<Vec<MockProduct>>,
    orders: Mutex<Vec<Value>>,
    order_delay: Mutex<Option<Duration>>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            products: Mutex::new(seed_products()),
            orders: Mutex::new(Vec::new()),
            order_delay: Mutex::new(None),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

type Shared = Arc<BackendState>;

// =============================================================================
// Server
// =============================================================================

/// Running mock backend. Shuts down on drop.
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start a seeded backend on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(BackendState::default());
        let app = router(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Mock backend stopped: {e}");
            }
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL including the `/api` prefix.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// HTTP API pointed at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn api(&self) -> HttpStoreApi {
        let config = ClientConfig::with_api_url(&self.api_url()).expect("Invalid mock URL");
        HttpStoreApi::new(&config).expect("Failed to build HTTP client")
    }

    /// Anonymous client pointed at this backend.
    #[must_use]
    pub fn client(&self) -> StoreClient<HttpStoreApi> {
        StoreClient::new(self.api())
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// Requests matching `method` and `path` (path without the host).
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn clear_requests(&self) {
        lock(&self.state.requests).clear();
    }

    /// Answer `method path` with `status` and `body` from now on.
    pub fn fail(&self, method: &str, path: &str, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        lock(&self.state.failures).insert((method.to_string(), path.to_string()), (status, body));
    }

    /// Delay order creation, to widen race windows.
    pub fn delay_orders(&self, delay: Duration) {
        *lock(&self.state.order_delay) = Some(delay);
    }

    /// Units of `product_id` still available.
    #[must_use]
    pub fn stock(&self, product_id: i64) -> Option<i64> {
        lock(&self.state.products)
            .iter()
            .find(|p| p.id == product_id)
            .map(MockProduct::available)
    }

    /// Number of orders placed.
    #[must_use]
    pub fn order_count(&self) -> usize {
        lock(&self.state.orders).len()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/categories", get(categories))
        .route("/api/products/brands", get(brands))
        .route("/api/products/search", get(search))
        .route("/api/products/{id}/quantity", get(quantity))
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/{id}/status", patch(update_status))
        .route("/api/reports/dashboard", get(dashboard))
        .route("/api/reports/top-selling-products", get(top_selling))
        .route("/api/reports/earnings/daily", get(daily_earnings))
        .route("/api/users", get(users))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
        .with_state(state)
}

/// Record the request, then either answer with an injected failure or pass
/// it on.
async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, 1 << 20).await.unwrap_or_default();

    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();
    lock(&state.requests).push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: parts.uri.query().map(str::to_string),
        authorization: parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&bytes).ok(),
    });

    let injected = lock(&state.failures).get(&(method, path)).cloned();
    if let Some((status, body)) = injected {
        return (status, Json(body)).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}

/// Resolve the bearer token to `(user_id, role)`, or the JWT layer's error.
fn authenticate(headers: &HeaderMap) -> Result<(i64, &'static str), Response> {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"msg": "Missing Authorization Header"})),
        )
            .into_response());
    };

    value
        .strip_prefix("Bearer token-")
        .and_then(|username| USERS.iter().find(|(_, name, _, _)| *name == username))
        .map(|(id, _, _, role)| (*id, *role))
        .ok_or_else(|| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"msg": "Signature verification failed"})),
            )
                .into_response()
        })
}

fn require_role(
    headers: &HeaderMap,
    allowed: &[&str],
) -> Result<(i64, &'static str), Response> {
    let (id, role) = authenticate(headers)?;
    if allowed.contains(&role) {
        Ok((id, role))
    } else {
        Err(error(StatusCode::FORBIDDEN, "Insufficient permissions"))
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn login(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    match USERS
        .iter()
        .find(|(_, name, pw, _)| *name == username && *pw == password)
    {
        Some((id, name, _, role)) => Json(json!({
            "access_token": format!("token-{name}"),
            "user": {
                "id": id,
                "username": name,
                "email": format!("{name}@shop.test"),
                "role": role,
                "created_at": CREATED_AT,
            }
        }))
        .into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn categories() -> Json<Value> {
    Json(Value::Array(
        CATEGORIES
            .iter()
            .map(|(id, _)| named(&CATEGORIES, *id))
            .collect(),
    ))
}

async fn brands() -> Json<Value> {
    Json(Value::Array(
        BRANDS.iter().map(|(id, _)| named(&BRANDS, *id)).collect(),
    ))
}

async fn list_products(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(
        lock(&state.products).iter().map(MockProduct::to_json).collect(),
    ))
}

async fn search(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let name_of = |table: &[(i64, &'static str)], id: i64| {
        table
            .iter()
            .find(|(row_id, _)| *row_id == id)
            .map(|(_, name)| *name)
    };
    let cents = |key: &str| {
        params
            .get(key)
            .and_then(|v| v.parse::<f64>().ok())
            .map(|v| (v * 100.0).round())
    };
    let (min, max) = (cents("price_min"), cents("price_max"));

    let products = lock(&state.products);
    let matches = products
        .iter()
        .filter(|p| params.get("gender").is_none_or(|g| g == p.gender))
        .filter(|p| {
            params
                .get("category")
                .is_none_or(|c| name_of(&CATEGORIES, p.category_id) == Some(c.as_str()))
        })
        .filter(|p| {
            params
                .get("brand")
                .is_none_or(|b| name_of(&BRANDS, p.brand_id) == Some(b.as_str()))
        })
        .filter(|p| {
            #[allow(clippy::cast_precision_loss)]
            let price = p.discounted_cents() as f64;
            min.is_none_or(|m| price >= m) && max.is_none_or(|m| price <= m)
        })
        .filter(|p| match params.get("availability").map(String::as_str) {
            Some("in_stock") => p.available() > 0,
            Some("out_of_stock") => p.available() <= 0,
            _ => true,
        })
        .map(MockProduct::to_json)
        .collect();

    Json(Value::Array(matches))
}

async fn quantity(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let products = lock(&state.products);
    match products.iter().find(|p| p.id == id) {
        Some(p) => Json(json!({
            "product_id": p.id,
            "name": p.name,
            "initial_quantity": p.initial,
            "sold_quantity": p.sold,
            "current_quantity": p.available(),
            "in_stock": p.available() > 0,
        }))
        .into_response(),
        None => error(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authenticate(&headers) {
        return response;
    }

    let (Some(name), Some(price), Some(gender), Some(category_id), Some(brand_id)) = (
        body["name"].as_str(),
        body["price"].as_f64(),
        body["gender"].as_str(),
        body["category_id"].as_i64(),
        body["brand_id"].as_i64(),
    ) else {
        return error(StatusCode::BAD_REQUEST, "Missing required fields");
    };

    let gender = match gender {
        "Men" => "Men",
        "Women" => "Women",
        _ => "Unisex",
    };

    let mut products = lock(&state.products);
    let id = products.iter().map(|p| p.id).max().unwrap_or_default() + 1;
    #[allow(clippy::cast_possible_truncation)]
    let product = MockProduct {
        id,
        name: name.to_string(),
        price_cents: (price * 100.0).round() as i64,
        discount: body["discount_percentage"].as_f64().unwrap_or_default().round() as i64,
        gender,
        category_id,
        brand_id,
        initial: body["initial_quantity"].as_i64().unwrap_or_default(),
        sold: 0,
    };
    let json = product.to_json();
    products.push(product);

    (
        StatusCode::CREATED,
        Json(json!({"message": "Product created successfully", "product": json})),
    )
        .into_response()
}

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authenticate(&headers) {
        return response;
    }

    let Some(items) = body["items"].as_array().filter(|items| !items.is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "Missing required fields");
    };
    let lines: Vec<(i64, i64)> = items
        .iter()
        .map(|i| {
            (
                i["product_id"].as_i64().unwrap_or_default(),
                i["quantity"].as_i64().unwrap_or_default(),
            )
        })
        .collect();

    let delay = *lock(&state.order_delay);
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut products = lock(&state.products);
    for &(product_id, quantity) in &lines {
        let Some(product) = products.iter().find(|p| p.id == product_id) else {
            return error(
                StatusCode::NOT_FOUND,
                &format!("Product {product_id} not found"),
            );
        };
        if product.available() < quantity {
            return error(
                StatusCode::BAD_REQUEST,
                &format!(
                    "Insufficient stock for {}. Available: {}",
                    product.name,
                    product.available()
                ),
            );
        }
    }

    let mut total_cents = 0;
    let mut order_items = Vec::new();
    for &(product_id, quantity) in &lines {
        if let Some(product) = products.iter_mut().find(|p| p.id == product_id) {
            product.sold += quantity;
            let unit = product.discounted_cents();
            total_cents += unit * quantity;
            order_items.push(json!({
                "product": product.to_json(),
                "quantity": quantity,
                "price_at_purchase": dollars(unit),
                "subtotal": dollars(unit * quantity),
            }));
        }
    }
    drop(products);

    let mut orders = lock(&state.orders);
    let order = json!({
        "id": orders.len() + 1,
        "client": null,
        "status": "pending",
        "total_amount": dollars(total_cents),
        "created_at": CREATED_AT,
        "updated_at": CREATED_AT,
        "items": order_items,
    });
    orders.push(order.clone());

    (
        StatusCode::CREATED,
        Json(json!({"message": "Order created successfully", "order": order})),
    )
        .into_response()
}

async fn list_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(response) = require_role(&headers, &["admin", "advanced_user"]) {
        return response;
    }
    Json(Value::Array(lock(&state.orders).clone())).into_response()
}

async fn update_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_role(&headers, &["admin", "advanced_user"]) {
        return response;
    }

    let Some(status) = body["status"].as_str() else {
        return error(StatusCode::BAD_REQUEST, "Missing status");
    };
    if !STATUSES.contains(&status) {
        return error(StatusCode::BAD_REQUEST, "Invalid status");
    }

    let mut orders = lock(&state.orders);
    let Some(order) = orders.iter_mut().find(|o| o["id"].as_u64() == Some(id)) else {
        return error(StatusCode::NOT_FOUND, "Order not found");
    };
    order["status"] = json!(status);

    Json(json!({"message": "Order status updated", "order": order.clone()})).into_response()
}

fn revenue_cents(state: &BackendState) -> i64 {
    lock(&state.products)
        .iter()
        .map(|p| p.sold * p.discounted_cents())
        .sum()
}

async fn dashboard(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(response) = require_role(&headers, &["admin", "advanced_user"]) {
        return response;
    }

    let top: Vec<Value> = lock(&state.products)
        .iter()
        .filter(|p| p.sold > 0)
        .map(|p| json!({"name": p.name, "sold": p.sold}))
        .collect();

    Json(json!({
        "total_revenue": dollars(revenue_cents(&state)),
        "total_orders": lock(&state.orders).len(),
        "total_users": USERS.len(),
        "top_products": top,
    }))
    .into_response()
}

async fn top_selling(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = require_role(&headers, &["admin", "advanced_user"]) {
        return response;
    }

    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(10);

    let mut sold: Vec<MockProduct> = lock(&state.products)
        .iter()
        .filter(|p| p.sold > 0)
        .cloned()
        .collect();
    sold.sort_by(|a, b| b.sold.cmp(&a.sold));
    let rows: Vec<Value> = sold
        .iter()
        .take(limit)
        .map(|p| {
            json!({
                "product_id": p.id,
                "product_name": p.name,
                "total_sold": p.sold,
                "total_revenue": dollars(p.sold * p.discounted_cents()),
            })
        })
        .collect();

    Json(json!({"count": rows.len(), "top_products": rows})).into_response()
}

async fn daily_earnings(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(response) = require_role(&headers, &["admin", "advanced_user"]) {
        return response;
    }

    let Some(date) = params.get("date") else {
        return error(StatusCode::BAD_REQUEST, "Missing date");
    };
    if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return error(StatusCode::BAD_REQUEST, "Invalid date format. Use YYYY-MM-DD");
    }

    Json(json!({
        "date": date,
        "total_earnings": dollars(revenue_cents(&state)),
        "total_orders": lock(&state.orders).len(),
    }))
    .into_response()
}

async fn users(headers: HeaderMap) -> Response {
    if let Err(response) = require_role(&headers, &["admin"]) {
        return response;
    }

    Json(Value::Array(
        USERS
            .iter()
            .map(|(id, name, _, role)| {
                json!({
                    "id": id,
                    "username": name,
                    "email": format!("{name}@shop.test"),
                    "role": role,
                    "created_at": CREATED_AT,
                })
            })
            .collect(),
    ))
    .into_response()
}
