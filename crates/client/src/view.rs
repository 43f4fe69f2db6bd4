//! View model.
//!
//! Render instructions produced by [`StoreClient`](crate::StoreClient). A
//! front end reads these and draws them; nothing here performs I/O.

use core::fmt;

use webshop_core::Capabilities;

use crate::api::{
    DailyEarnings, DashboardReport, Order, Product, ProductStock, TopSellingReport, UserProfile,
    UserRecord,
};

/// Which top-level screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Main,
}

/// Tabs of the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Products,
    Search,
    Cart,
    Orders,
    Reports,
    Users,
}

impl Tab {
    pub const ALL: [Self; 6] = [
        Self::Products,
        Self::Search,
        Self::Cart,
        Self::Orders,
        Self::Reports,
        Self::Users,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Search => "search",
            Self::Cart => "cart",
            Self::Orders => "orders",
            Self::Reports => "reports",
            Self::Users => "users",
        }
    }

    /// Whether a user with `caps` may see this tab.
    #[must_use]
    pub const fn visible_with(self, caps: Capabilities) -> bool {
        match self {
            Self::Reports => caps.can_view_reports,
            Self::Users => caps.can_view_users,
            Self::Products | Self::Search | Self::Cart | Self::Orders => true,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a notice is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeArea {
    /// Under the login form.
    Login,
    /// Message bar of the main screen.
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub area: NoticeArea,
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, NoticeLevel::Error)
    }
}

/// Content of one panel: nothing yet, loaded data, or an inline error.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Empty,
    Ready(T),
    Failed(String),
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> Panel<T> {
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Everything a front end needs to draw the current state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub screen: Screen,
    pub active_tab: Tab,
    /// Header line for the logged-in user.
    pub user: Option<UserProfile>,
    /// Sum of cart quantities; `None` hides the badge.
    pub cart_badge: Option<u32>,
    pub notice: Option<Notice>,

    pub products: Panel<Vec<Product>>,
    pub search_results: Panel<Vec<Product>>,
    pub product_detail: Panel<ProductStock>,
    pub orders: Panel<Vec<Order>>,
    pub reports: Panel<DashboardReport>,
    pub top_selling: Panel<TopSellingReport>,
    pub earnings: Panel<DailyEarnings>,
    pub users: Panel<Vec<UserRecord>>,

    capabilities: Capabilities,
}

impl View {
    /// Switch to the main screen for `user`.
    pub(crate) fn enter_main(&mut self, user: UserProfile) {
        *self = Self {
            screen: Screen::Main,
            capabilities: user.role.capabilities(),
            user: Some(user),
            ..Self::default()
        };
    }

    /// Back to the login screen with every panel cleared.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn notify(&mut self, area: NoticeArea, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            area,
            level,
            text: text.into(),
        });
    }

    pub(crate) fn success(&mut self, text: impl Into<String>) {
        self.notify(NoticeArea::Main, NoticeLevel::Success, text);
    }

    pub(crate) fn failure(&mut self, text: impl Into<String>) {
        self.notify(NoticeArea::Main, NoticeLevel::Error, text);
    }

    pub(crate) fn set_cart_count(&mut self, count: u32) {
        self.cart_badge = (count > 0).then_some(count);
    }

    /// Whether `tab` is shown. Nothing is visible on the login screen.
    #[must_use]
    pub const fn is_tab_visible(&self, tab: Tab) -> bool {
        matches!(self.screen, Screen::Main) && tab.visible_with(self.capabilities)
    }

    #[must_use]
    pub fn visible_tabs(&self) -> Vec<Tab> {
        Tab::ALL
            .into_iter()
            .filter(|&tab| self.is_tab_visible(tab))
            .collect()
    }
}
