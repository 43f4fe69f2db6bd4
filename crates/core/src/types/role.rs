//! User roles and the capabilities they grant.

use serde::{Deserialize, Serialize};

/// Error returned when a role name is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// Storefront user role.
///
/// Role names on the wire are `snake_case`. Names the client does not know
/// deserialize as [`Role::Unknown`], which grants nothing beyond the public
/// storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular customer account.
    SimpleUser,
    /// Staff account with access to reports and order management.
    AdvancedUser,
    /// Full access, including user management.
    Admin,
    /// Unrecognized role name.
    #[serde(other)]
    Unknown,
}

/// What a role is allowed to see and do in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// Reports tab and report endpoints.
    pub can_view_reports: bool,
    /// Users tab.
    pub can_view_users: bool,
    /// Add-product form.
    pub can_create_products: bool,
    /// Order status changes.
    pub can_manage_orders: bool,
}

impl Role {
    /// Capability set granted to this role.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Unknown => Capabilities {
                can_view_reports: false,
                can_view_users: false,
                can_create_products: false,
                can_manage_orders: false,
            },
            Self::SimpleUser => Capabilities {
                can_view_reports: false,
                can_view_users: false,
                can_create_products: true,
                can_manage_orders: false,
            },
            Self::AdvancedUser => Capabilities {
                can_view_reports: true,
                can_view_users: false,
                can_create_products: true,
                can_manage_orders: true,
            },
            Self::Admin => Capabilities {
                can_view_reports: true,
                can_view_users: true,
                can_create_products: true,
                can_manage_orders: true,
            },
        }
    }

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::SimpleUser => "simple_user",
            Self::AdvancedUser => "advanced_user",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple_user" => Ok(Self::SimpleUser),
            "advanced_user" => Ok(Self::AdvancedUser),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}
