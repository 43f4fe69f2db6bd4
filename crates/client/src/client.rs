//! Session/cart client.
//!
//! [`StoreClient`] owns the session, the cart, the catalog reference data and
//! the [`View`]. Every action takes `&mut self`, so actions on one client run
//! one at a time; use [`SharedClient`](crate::SharedClient) to drive a client
//! from several tasks.
//!
//! Failed actions never touch the session or the cart. The error is returned
//! to the caller, logged, and rendered into the notice bar or the panel the
//! action owns.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use webshop_core::{Capabilities, OrderId, OrderStatus, Price, ProductId};

use crate::api::{
    CreateOrderRequest, DailyEarnings, DashboardReport, NewProduct, Order, Product, ProductStock,
    StoreApi, TopSellingReport, UserProfile, UserRecord,
};
use crate::cart::{Cart, CartLine};
use crate::catalog::Catalog;
use crate::error::ClientError;
use crate::search::SearchFilters;
use crate::session::Session;
use crate::view::{NoticeArea, NoticeLevel, Panel, Screen, Tab, View};

/// Yes/no gate asked before an order is placed.
pub trait Confirm {
    /// Return `true` to place the order for `cart`.
    fn confirm(&mut self, cart: &Cart) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Cart) -> bool,
{
    fn confirm(&mut self, cart: &Cart) -> bool {
        self(cart)
    }
}

/// Gate that approves every checkout.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _cart: &Cart) -> bool {
        true
    }
}

/// Stateful webshop client.
#[derive(Debug)]
pub struct StoreClient<A> {
    api: A,
    session: Option<Session>,
    cart: Cart,
    catalog: Catalog,
    view: View,
}

impl<A: StoreApi> StoreClient<A> {
    /// Create an anonymous client with an empty cart.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            session: None,
            cart: Cart::new(),
            catalog: Catalog::default(),
            view: View::default(),
        }
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub const fn view(&self) -> &View {
        &self.view
    }

    /// Capabilities of the current user; nothing when logged out.
    pub fn capabilities(&self) -> Capabilities {
        self.session
            .as_ref()
            .map(Session::capabilities)
            .unwrap_or_default()
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Log in and load the catalog and the default product listing.
    ///
    /// On success any previous session is replaced and the cart starts empty.
    /// Failures of the follow-up loads are shown inline and do not fail the
    /// login.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCredentials`] without sending a request
    /// if either field is empty, otherwise the login call's error. Existing
    /// state is untouched on failure.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&mut self, username: &str, password: &str) -> Result<UserProfile, ClientError> {
        if username.is_empty() || password.is_empty() {
            let err = ClientError::MissingCredentials;
            self.view
                .notify(NoticeArea::Login, NoticeLevel::Error, err.user_message());
            return Err(err);
        }

        let response = match self.api.login(username, password).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Login failed");
                self.view
                    .notify(NoticeArea::Login, NoticeLevel::Error, e.user_message());
                return Err(e);
            }
        };

        let session = Session::from(response);
        let user = session.user().clone();
        info!(user_id = %user.id, role = %user.role, "Session started");

        self.session = Some(session);
        self.cart = Cart::new();
        self.catalog = Catalog::default();
        self.view.enter_main(user.clone());

        self.load_catalog().await;
        // Failure is already rendered into the products panel.
        let _ = self.load_products().await;

        Ok(user)
    }

    /// End the session. Clears the cart and catalog data; no server call.
    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!(user_id = %session.user().id, "Session ended");
        }
        self.cart.clear();
        self.catalog = Catalog::default();
        self.view.reset();
    }

    /// Fetch categories, then brands. Each failure is logged and leaves that
    /// list empty.
    ///
    /// Runs on login; anonymous callers use it before searching by category
    /// or brand.
    #[instrument(skip(self))]
    pub async fn load_catalog(&mut self) {
        match self.api.categories().await {
            Ok(categories) => self.catalog.categories = categories,
            Err(e) => {
                warn!(error = %e, "Failed to load categories");
                self.view
                    .failure(format!("Error loading categories: {}", e.user_message()));
            }
        }

        match self.api.brands().await {
            Ok(brands) => self.catalog.brands = brands,
            Err(e) => {
                warn!(error = %e, "Failed to load brands");
                self.view
                    .failure(format!("Error loading brands: {}", e.user_message()));
            }
        }

        debug!(
            categories = self.catalog.categories.len(),
            brands = self.catalog.brands.len(),
            "Catalog loaded"
        );
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of a product to the cart.
    ///
    /// Returns the product's quantity after the add.
    pub fn add_to_cart(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Price,
    ) -> u32 {
        let name = name.into();
        let quantity = self.cart.add(product_id, name.clone(), unit_price);
        self.view.set_cart_count(self.cart.item_count());
        self.view.success(format!("{name} added to cart"));
        debug!(product_id = %product_id, quantity, "Added to cart");
        quantity
    }

    /// Add a listed product at its discounted price.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::OutOfStock`] if the product has no stock.
    pub fn add_product_to_cart(&mut self, product: &Product) -> Result<u32, ClientError> {
        if !product.in_stock {
            let err = ClientError::OutOfStock(product.name.clone());
            self.view.failure(err.user_message());
            return Err(err);
        }
        Ok(self.add_to_cart(product.id, product.name.clone(), product.discounted_price))
    }

    /// Remove the cart line at `index`. Out-of-range indexes do nothing.
    pub fn remove_from_cart(&mut self, index: usize) -> Option<CartLine> {
        let removed = self.cart.remove(index)?;
        self.view.set_cart_count(self.cart.item_count());
        debug!(product_id = %removed.product_id, "Removed from cart");
        Some(removed)
    }

    /// Current cart total, recomputed from the lines.
    pub fn cart_total(&self) -> Decimal {
        self.cart.total()
    }

    /// Place an order for the whole cart.
    ///
    /// Returns `Ok(None)` without a request when the cart is empty or `confirm`
    /// declines. On success the cart is emptied and the orders tab is shown.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] without a request when logged
    /// out with a non-empty cart, otherwise the order call's error. The cart
    /// is unchanged on error.
    #[instrument(skip(self, confirm), fields(lines = self.cart.len()))]
    pub async fn checkout<C: Confirm>(&mut self, mut confirm: C) -> Result<Option<Order>, ClientError> {
        if self.cart.is_empty() {
            debug!("Checkout skipped, cart is empty");
            return Ok(None);
        }

        let Some(session) = self.session.as_ref() else {
            return Err(ClientError::NotAuthenticated);
        };

        if !confirm.confirm(&self.cart) {
            info!("Checkout declined");
            return Ok(None);
        }

        let request = CreateOrderRequest {
            items: self.cart.order_items(),
        };

        match self.api.create_order(session.token(), &request).await {
            Ok(order) => {
                info!(order_id = %order.id, total = %order.total_amount, "Order placed");
                self.cart.clear();
                self.view.set_cart_count(0);
                self.view.success("Order placed successfully!");
                self.select_tab(Tab::Orders).await;
                Ok(Some(order))
            }
            Err(e) => {
                error!(error = %e, "Checkout failed");
                self.view.failure(e.user_message());
                Err(e)
            }
        }
    }

    // =========================================================================
    // Catalog reads
    // =========================================================================

    /// Load the full product listing into the products panel.
    ///
    /// # Errors
    ///
    /// Returns the listing call's error.
    #[instrument(skip(self))]
    pub async fn load_products(&mut self) -> Result<Vec<Product>, ClientError> {
        let result = self.api.products().await;
        if let Err(e) = &result {
            self.view
                .failure(format!("Error loading products: {}", e.user_message()));
        }
        settle(&mut self.view.products, result, "products")
    }

    /// Search products. Results are shown as returned by the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnknownCategory`] / [`ClientError::UnknownBrand`]
    /// without a request if a filter id is not in the catalog, otherwise the
    /// search call's error.
    #[instrument(skip(self, filters))]
    pub async fn search(&mut self, filters: &SearchFilters) -> Result<Vec<Product>, ClientError> {
        let result = match filters.to_query(&self.catalog) {
            Ok(query) => self.api.search_products(&query).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(products) => self.view.success(format!("Found {} products", products.len())),
            Err(e) => self
                .view
                .failure(format!("Search failed: {}", e.user_message())),
        }
        settle(&mut self.view.search_results, result, "search results")
    }

    /// Load stock figures for one product into the detail panel.
    ///
    /// # Errors
    ///
    /// Returns the stock call's error.
    #[instrument(skip(self))]
    pub async fn product_stock(&mut self, product_id: ProductId) -> Result<ProductStock, ClientError> {
        let result = self.api.product_stock(product_id).await;
        if let Err(e) = &result {
            self.view.failure(format!("Error: {}", e.user_message()));
        }
        settle(&mut self.view.product_detail, result, "product detail")
    }

    /// Create a product and reload the listing.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] or
    /// [`ClientError::Forbidden`] without a request, otherwise the create
    /// call's error.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&mut self, product: &NewProduct) -> Result<Product, ClientError> {
        let result = match self.authorize(|c| c.can_create_products, "create products") {
            Ok(session) => self.api.create_product(session.token(), product).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(created) => {
                info!(product_id = %created.id, "Product created");
                self.view.success("Product added successfully!");
                let _ = self.load_products().await;
                Ok(created)
            }
            Err(e) => {
                error!(error = %e, "Failed to create product");
                self.view.failure(e.user_message());
                Err(e)
            }
        }
    }

    // =========================================================================
    // Authenticated reads
    // =========================================================================

    /// Load order history into the orders panel.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] without a request, otherwise
    /// the orders call's error.
    #[instrument(skip(self))]
    pub async fn load_orders(&mut self) -> Result<Vec<Order>, ClientError> {
        let result = match self.authorize(|_| true, "view orders") {
            Ok(session) => self.api.orders(session.token()).await,
            Err(e) => Err(e),
        };
        settle(&mut self.view.orders, result, "orders")
    }

    /// Load the dashboard report into the reports panel.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] or
    /// [`ClientError::Forbidden`] without a request, otherwise the report
    /// call's error.
    #[instrument(skip(self))]
    pub async fn load_reports(&mut self) -> Result<DashboardReport, ClientError> {
        let result = match self.authorize(|c| c.can_view_reports, "view reports") {
            Ok(session) => self.api.dashboard(session.token()).await,
            Err(e) => Err(e),
        };
        settle(&mut self.view.reports, result, "reports")
    }

    /// Load the user table into the users panel.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] or
    /// [`ClientError::Forbidden`] without a request, otherwise the users
    /// call's error.
    #[instrument(skip(self))]
    pub async fn load_users(&mut self) -> Result<Vec<UserRecord>, ClientError> {
        let result = match self.authorize(|c| c.can_view_users, "view users") {
            Ok(session) => self.api.users(session.token()).await,
            Err(e) => Err(e),
        };
        settle(&mut self.view.users, result, "users")
    }

    /// Load the best sellers report.
    ///
    /// # Errors
    ///
    /// Same rules as [`Self::load_reports`].
    #[instrument(skip(self))]
    pub async fn top_selling_products(&mut self, limit: u32) -> Result<TopSellingReport, ClientError> {
        let result = match self.authorize(|c| c.can_view_reports, "view reports") {
            Ok(session) => self.api.top_selling(session.token(), limit).await,
            Err(e) => Err(e),
        };
        settle(&mut self.view.top_selling, result, "top selling report")
    }

    /// Load earnings for one day.
    ///
    /// # Errors
    ///
    /// Same rules as [`Self::load_reports`].
    #[instrument(skip(self), fields(date = %date))]
    pub async fn daily_earnings(&mut self, date: NaiveDate) -> Result<DailyEarnings, ClientError> {
        let result = match self.authorize(|c| c.can_view_reports, "view reports") {
            Ok(session) => self.api.daily_earnings(session.token(), date).await,
            Err(e) => Err(e),
        };
        settle(&mut self.view.earnings, result, "daily earnings")
    }

    /// Change an order's status.
    ///
    /// A loaded orders panel is patched in place.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] or
    /// [`ClientError::Forbidden`] without a request, otherwise the update
    /// call's error.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &mut self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, ClientError> {
        let result = match self.authorize(|c| c.can_manage_orders, "manage orders") {
            Ok(session) => {
                self.api
                    .update_order_status(session.token(), order_id, status)
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(order) => {
                info!(order_id = %order_id, status = %order.status, "Order status updated");
                if let Panel::Ready(orders) = &mut self.view.orders
                    && let Some(existing) = orders.iter_mut().find(|o| o.id == order_id)
                {
                    existing.status = order.status;
                }
                self.view
                    .success(format!("Order #{order_id} is now {}", order.status));
                Ok(order)
            }
            Err(e) => {
                error!(error = %e, "Failed to update order status");
                self.view.failure(e.user_message());
                Err(e)
            }
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Show `tab` and load its data.
    ///
    /// Hidden tabs are ignored. Returns whether the tab was switched. Load
    /// failures land in the tab's own panel.
    #[instrument(skip(self), fields(tab = %tab))]
    pub async fn select_tab(&mut self, tab: Tab) -> bool {
        if !self.view.is_tab_visible(tab) {
            warn!(screen = ?self.view.screen, "Tab is not available");
            return false;
        }

        self.view.active_tab = tab;
        match tab {
            Tab::Orders => {
                let _ = self.load_orders().await;
            }
            Tab::Reports => {
                let _ = self.load_reports().await;
            }
            Tab::Users => {
                let _ = self.load_users().await;
            }
            Tab::Products | Tab::Search | Tab::Cart => {}
        }
        true
    }

    /// The session, if its role passes `check`.
    fn authorize(
        &self,
        check: impl FnOnce(&Capabilities) -> bool,
        action: &'static str,
    ) -> Result<&Session, ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::NotAuthenticated)?;
        if check(&session.capabilities()) {
            Ok(session)
        } else {
            Err(ClientError::Forbidden(action))
        }
    }
}

impl<A> StoreClient<A> {
    /// Whether the main screen is showing.
    pub fn is_main_screen(&self) -> bool {
        self.view.screen == Screen::Main
    }
}

/// Store `result` in `panel` and hand it back.
fn settle<T: Clone>(
    panel: &mut Panel<T>,
    result: Result<T, ClientError>,
    what: &str,
) -> Result<T, ClientError> {
    match result {
        Ok(value) => {
            debug!(panel = what, "Loaded");
            *panel = Panel::Ready(value.clone());
            Ok(value)
        }
        Err(e) => {
            error!(error = %e, panel = what, "Failed to load");
            *panel = Panel::Failed(e.user_message());
            Err(e)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use webshop_core::{BrandId, CategoryId, Role};

    use super::*;
    use crate::api::OrderItemRequest;
    use crate::shared::SharedClient;
    use crate::testing::{Call, FakeApi, product};

    fn price(cents: i64) -> Price {
        Price::from_cents(cents).unwrap()
    }

    async fn logged_in(role: Role) -> StoreClient<FakeApi> {
        let mut client = StoreClient::new(FakeApi::new(role));
        client.login("alice", "secret").await.unwrap();
        client.api().clear_calls();
        client
    }

    #[tokio::test]
    async fn test_login_loads_catalog_then_products() {
        let mut client = StoreClient::new(FakeApi::new(Role::SimpleUser));

        let user = client.login("alice", "secret").await.unwrap();

        assert_eq!(user.username, "alice");
        assert!(client.is_authenticated());
        assert!(client.is_main_screen());
        assert_eq!(client.view().active_tab, Tab::Products);
        assert_eq!(client.catalog().categories.len(), 2);
        assert_eq!(client.catalog().brands.len(), 1);
        assert_eq!(client.view().products.ready().map(Vec::len), Some(3));
        assert_eq!(
            client.api().calls(),
            vec![
                Call::Login("alice".to_string()),
                Call::Categories,
                Call::Brands,
                Call::Products,
            ]
        );
        assert!(!client.view().is_tab_visible(Tab::Reports));
        assert!(!client.view().is_tab_visible(Tab::Users));
    }

    #[tokio::test]
    async fn test_login_sends_blank_username_to_server() {
        let mut client = StoreClient::new(FakeApi::new(Role::SimpleUser));

        client.login("   ", "secret").await.unwrap();

        assert_eq!(
            client.api().calls().first(),
            Some(&Call::Login("   ".to_string()))
        );
    }

    #[tokio::test]
    async fn test_login_rejects_empty_fields_locally() {
        let mut client = StoreClient::new(FakeApi::new(Role::Admin));

        let err = client.login("", "secret").await.unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials));
        let err = client.login("alice", "").await.unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials));

        assert!(client.api().calls().is_empty());
        assert!(!client.is_authenticated());
        let notice = client.view().notice.as_ref().unwrap();
        assert_eq!(notice.area, NoticeArea::Login);
        assert!(notice.is_error());
    }

    #[tokio::test]
    async fn test_login_failure_shows_server_text() {
        let api = FakeApi::new(Role::Admin);
        api.fail("login", 401, "Invalid credentials");
        let mut client = StoreClient::new(api);

        let err = client.login("alice", "wrong").await.unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 401, .. }));
        assert!(client.session().is_none());
        assert_eq!(client.view().screen, Screen::Login);
        let notice = client.view().notice.as_ref().unwrap();
        assert_eq!(notice.area, NoticeArea::Login);
        assert_eq!(notice.text, "Invalid credentials");
        // no follow-up loads after a failed login
        assert_eq!(client.api().count("categories"), 0);
    }

    #[tokio::test]
    async fn test_failed_relogin_keeps_existing_session_and_cart() {
        let mut client = logged_in(Role::SimpleUser).await;
        client.add_to_cart(ProductId::new(1), "Sneaker", price(999));
        let user_before = client.session().unwrap().user().id;

        client.api().fail("login", 500, "boom");
        assert!(client.login("bob", "pw").await.is_err());

        assert_eq!(client.session().unwrap().user().id, user_before);
        assert_eq!(client.cart().item_count(), 1);
    }

    #[tokio::test]
    async fn test_catalog_failure_does_not_fail_login() {
        let api = FakeApi::new(Role::SimpleUser);
        api.fail("categories", 500, "db down");
        let mut client = StoreClient::new(api);

        client.login("alice", "secret").await.unwrap();

        assert!(client.is_authenticated());
        assert!(client.catalog().categories.is_empty());
        assert_eq!(client.catalog().brands.len(), 1);
        assert!(client.view().products.ready().is_some());
    }

    #[tokio::test]
    async fn test_logout_then_login_starts_clean() {
        let mut client = logged_in(Role::SimpleUser).await;
        client.add_to_cart(ProductId::new(1), "Sneaker", price(999));
        client.load_orders().await.unwrap();

        client.logout();
        assert!(client.session().is_none());
        assert!(client.cart().is_empty());
        assert!(client.catalog().is_empty());
        assert_eq!(*client.view(), View::default());

        client.login("alice", "secret").await.unwrap();
        assert!(client.cart().is_empty());
        client.load_orders().await.unwrap();

        let tokens = client.api().tokens();
        assert_eq!(tokens.len(), 2);
        assert_ne!(tokens[0], tokens[1]);
    }

    #[tokio::test]
    async fn test_login_replaces_previous_cart() {
        let mut client = logged_in(Role::SimpleUser).await;
        client.add_to_cart(ProductId::new(1), "Sneaker", price(999));

        client.login("bob", "pw").await.unwrap();

        assert!(client.cart().is_empty());
        assert_eq!(client.view().cart_badge, None);
        assert_eq!(client.session().unwrap().user().username, "bob");
    }

    #[tokio::test]
    async fn test_cart_total_example() {
        let mut client = logged_in(Role::SimpleUser).await;
        client.add_to_cart(ProductId::new(1), "Sneaker", price(999));
        client.add_to_cart(ProductId::new(1), "Sneaker", price(999));
        client.add_to_cart(ProductId::new(2), "Cap", price(500));

        assert_eq!(client.cart_total(), Decimal::new(2498, 2));
        assert_eq!(client.view().cart_badge, Some(3));
        assert_eq!(
            client.view().notice.as_ref().unwrap().text,
            "Cap added to cart"
        );

        client.remove_from_cart(0).unwrap();
        assert_eq!(client.cart_total(), Decimal::new(500, 2));
        assert_eq!(client.view().cart_badge, Some(1));

        assert!(client.remove_from_cart(5).is_none());
        assert_eq!(client.cart_total(), Decimal::new(500, 2));
    }

    #[tokio::test]
    async fn test_add_product_refuses_out_of_stock() {
        let mut client = logged_in(Role::SimpleUser).await;

        let err = client
            .add_product_to_cart(&product(3, "Boot", 4500, false))
            .unwrap_err();
        assert!(matches!(err, ClientError::OutOfStock(name) if name == "Boot"));
        assert!(client.cart().is_empty());

        assert_eq!(
            client
                .add_product_to_cart(&product(1, "Sneaker", 999, true))
                .unwrap(),
            1
        );
        assert_eq!(client.cart_total(), Decimal::new(999, 2));
    }

    #[tokio::test]
    async fn test_checkout_requires_session() {
        let mut client = StoreClient::new(FakeApi::new(Role::SimpleUser));
        client.add_to_cart(ProductId::new(1), "Sneaker", price(999));

        let err = client.checkout(AutoConfirm).await.unwrap_err();

        assert!(matches!(err, ClientError::NotAuthenticated));
        assert!(client.api().calls().is_empty());
        assert_eq!(client.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_anonymous_checkout_of_empty_cart_is_noop() {
        let mut client = StoreClient::new(FakeApi::new(Role::SimpleUser));

        let placed = client.checkout(AutoConfirm).await.unwrap();

        assert!(placed.is_none());
        assert!(client.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_noop() {
        let mut client = logged_in(Role::SimpleUser).await;
        let mut asked = false;

        let placed = client
            .checkout(|_: &Cart| {
                asked = true;
                true
            })
            .await
            .unwrap();

        assert!(placed.is_none());
        assert!(!asked);
        assert!(client.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_declined_keeps_cart() {
        let mut client = logged_in(Role::SimpleUser).await;
        client.add_to_cart(ProductId::new(1), "Sneaker", price(999));
        let before = client.cart().clone();

        let placed = client.checkout(|_: &Cart| false).await.unwrap();

        assert!(placed.is_none());
        assert_eq!(*client.cart(), before);
        assert_eq!(client.api().count("create_order"), 0);
    }

    #[tokio::test]
    async fn test_checkout_success_empties_cart_and_shows_orders() {
        let mut client = logged_in(Role::SimpleUser).await;
        client.add_to_cart(ProductId::new(1), "Sneaker", price(999));
        client.add_to_cart(ProductId::new(1), "Sneaker", price(999));
        client.add_to_cart(ProductId::new(2), "Cap", price(500));

        let order = client.checkout(AutoConfirm).await.unwrap().unwrap();

        assert_eq!(order.total_amount, Decimal::new(2498, 2));
        assert!(client.cart().is_empty());
        assert_eq!(client.view().cart_badge, None);
        assert_eq!(client.view().active_tab, Tab::Orders);
        assert_eq!(client.view().orders.ready().map(Vec::len), Some(1));
        assert_eq!(
            client.view().notice.as_ref().unwrap().text,
            "Order placed successfully!"
        );
        assert_eq!(
            client.api().calls(),
            vec![
                Call::CreateOrder(vec![
                    OrderItemRequest {
                        product_id: ProductId::new(1),
                        quantity: 2,
                    },
                    OrderItemRequest {
                        product_id: ProductId::new(2),
                        quantity: 1,
                    },
                ]),
                Call::Orders,
            ]
        );
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_cart_exactly() {
        let mut client = logged_in(Role::SimpleUser).await;
        client.add_to_cart(ProductId::new(1), "Sneaker", price(999));
        client.add_to_cart(ProductId::new(2), "Cap", price(500));
        let before = client.cart().clone();
        client
            .api()
            .fail("create_order", 400, "Insufficient stock for Sneaker. Available: 0");

        let err = client.checkout(AutoConfirm).await.unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 400, .. }));
        assert_eq!(*client.cart(), before);
        assert_eq!(client.view().cart_badge, Some(2));
        let notice = client.view().notice.as_ref().unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.text, "Insufficient stock for Sneaker. Available: 0");
        assert_eq!(client.view().active_tab, Tab::Products);
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_place_one_order() {
        let api = FakeApi::new(Role::SimpleUser).with_order_delay(Duration::from_millis(20));
        let mut client = StoreClient::new(api);
        client.login("alice", "secret").await.unwrap();
        client.add_to_cart(ProductId::new(1), "Sneaker", price(999));

        let shared = SharedClient::new(client);
        let first = tokio::spawn({
            let shared = shared.clone();
            async move { shared.checkout(AutoConfirm).await }
        });
        let second = tokio::spawn({
            let shared = shared.clone();
            async move { shared.checkout(AutoConfirm).await }
        });

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();

        assert_eq!(
            usize::from(first.is_some()) + usize::from(second.is_some()),
            1
        );
        let guard = shared.lock().await;
        assert_eq!(guard.api().count("create_order"), 1);
        assert!(guard.cart().is_empty());
    }

    #[tokio::test]
    async fn test_reports_failure_leaves_orders_panel() {
        let mut client = logged_in(Role::AdvancedUser).await;
        client.load_orders().await.unwrap();
        let orders_before = client.view().orders.clone();

        client.api().fail("dashboard", 500, "report query failed");
        assert!(client.load_reports().await.is_err());

        assert_eq!(client.view().reports.error(), Some("report query failed"));
        assert_eq!(client.view().orders, orders_before);
        assert!(client.view().orders.ready().is_some());
    }

    #[tokio::test]
    async fn test_orders_failure_leaves_reports_panel() {
        let mut client = logged_in(Role::AdvancedUser).await;
        client.load_reports().await.unwrap();

        client.api().fail("orders", 401, "Token has expired");
        assert!(client.load_orders().await.is_err());

        assert_eq!(client.view().orders.error(), Some("Token has expired"));
        assert!(client.view().reports.ready().is_some());
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn test_role_gates_privileged_reads() {
        let mut client = logged_in(Role::SimpleUser).await;

        let err = client.load_reports().await.unwrap_err();
        assert!(matches!(err, ClientError::Forbidden(_)));
        assert!(client.view().reports.error().is_some());
        assert!(client.load_users().await.is_err());
        assert!(
            client
                .update_order_status(OrderId::new(1), OrderStatus::Shipped)
                .await
                .is_err()
        );
        assert!(client.api().calls().is_empty());

        // ordinary users may still create products
        let created = client
            .create_product(&NewProduct {
                name: "Tee".to_string(),
                description: String::new(),
                price: price(1500),
                discount_percentage: Decimal::ZERO,
                gender: "Unisex".to_string(),
                initial_quantity: 3,
                category_id: CategoryId::new(1),
                brand_id: BrandId::new(7),
            })
            .await
            .unwrap();
        assert_eq!(created.name, "Tee");
        assert_eq!(
            client.view().notice.as_ref().unwrap().text,
            "Product added successfully!"
        );
        assert_eq!(client.api().count("products"), 1);
    }

    #[tokio::test]
    async fn test_select_tab_respects_visibility() {
        let mut client = logged_in(Role::AdvancedUser).await;

        assert!(!client.select_tab(Tab::Users).await);
        assert_eq!(client.view().active_tab, Tab::Products);
        assert!(client.api().calls().is_empty());

        assert!(client.select_tab(Tab::Reports).await);
        assert_eq!(client.view().active_tab, Tab::Reports);
        assert_eq!(client.api().calls(), vec![Call::Dashboard]);

        assert!(client.select_tab(Tab::Cart).await);
        assert_eq!(client.api().calls().len(), 1);

        client.logout();
        assert!(!client.select_tab(Tab::Products).await);
    }

    #[tokio::test]
    async fn test_admin_sees_users() {
        let mut client = logged_in(Role::Admin).await;

        assert!(client.select_tab(Tab::Users).await);
        assert_eq!(client.view().users.ready().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_search_sends_names_and_reports_count() {
        let mut client = logged_in(Role::SimpleUser).await;
        let filters = SearchFilters {
            gender: Some(String::new()),
            category_id: Some(CategoryId::new(2)),
            brand_id: Some(BrandId::new(7)),
            ..SearchFilters::default()
        };

        let results = client.search(&filters).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(
            client.api().calls(),
            vec![Call::Search(vec![
                ("category", "Hats".to_string()),
                ("brand", "Acme".to_string()),
            ])]
        );
        assert_eq!(
            client.view().notice.as_ref().unwrap().text,
            "Found 2 products"
        );
        assert_eq!(client.view().search_results.ready().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_search_unknown_brand_sends_nothing() {
        let mut client = logged_in(Role::SimpleUser).await;
        let filters = SearchFilters {
            brand_id: Some(BrandId::new(99)),
            ..SearchFilters::default()
        };

        let err = client.search(&filters).await.unwrap_err();

        assert!(matches!(err, ClientError::UnknownBrand(_)));
        assert!(client.api().calls().is_empty());
        assert!(client.view().search_results.error().is_some());
    }

    #[tokio::test]
    async fn test_product_stock_fills_detail_panel() {
        let mut client = StoreClient::new(FakeApi::new(Role::SimpleUser));

        let stock = client.product_stock(ProductId::new(1)).await.unwrap();

        assert_eq!(stock.sold_quantity, 3);
        assert_eq!(client.view().product_detail.ready(), Some(&stock));
    }

    #[tokio::test]
    async fn test_update_order_status_patches_orders_panel() {
        let mut client = logged_in(Role::Admin).await;
        client.add_to_cart(ProductId::new(2), "Cap", price(500));
        let order = client.checkout(AutoConfirm).await.unwrap().unwrap();

        let updated = client
            .update_order_status(order.id, OrderStatus::Shipped)
            .await
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Shipped);
        let orders = client.view().orders.ready().unwrap();
        assert_eq!(orders[0].status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_admin_report_reads() {
        let mut client = logged_in(Role::AdvancedUser).await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        client.top_selling_products(5).await.unwrap();
        let earnings = client.daily_earnings(date).await.unwrap();

        assert_eq!(earnings.total_earnings, Decimal::new(2498, 2));
        assert!(client.view().top_selling.ready().is_some());
        assert_eq!(client.view().earnings.ready(), Some(&earnings));
        assert_eq!(
            client.api().calls(),
            vec![Call::TopSelling(5), Call::DailyEarnings(date)]
        );
    }
}
