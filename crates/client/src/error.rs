//! Error types for the webshop client.

use thiserror::Error;

use webshop_core::{BrandId, CategoryId};

/// Errors that can occur while performing a client action.
///
/// Transport failures ([`ClientError::Http`], [`ClientError::Parse`]) and
/// application failures ([`ClientError::Api`]) are handled the same way by
/// callers: the action is abandoned and client state is left untouched.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-supplied error text.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// The action needs a logged-in session.
    #[error("not logged in")]
    NotAuthenticated,

    /// Username or password was empty.
    #[error("username and password are required")]
    MissingCredentials,

    /// The current role lacks the capability for this action.
    #[error("insufficient permissions: {0}")]
    Forbidden(&'static str),

    /// The product cannot be added because it has no stock.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// Search filter referenced a category that is not in the catalog.
    #[error("unknown category: {0}")]
    UnknownCategory(CategoryId),

    /// Search filter referenced a brand that is not in the catalog.
    #[error("unknown brand: {0}")]
    UnknownBrand(BrandId),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<crate::config::ConfigError> for ClientError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl ClientError {
    /// Whether the failure happened below the application layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Parse(_))
    }

    /// Text suitable for an inline notice.
    ///
    /// Application failures show the server's own message verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Error body returned by the backend.
///
/// Route handlers use `error`; the JWT layer uses `msg`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ApiErrorBody {
    /// Handler error text.
    pub error: Option<String>,
    /// JWT layer error text.
    pub msg: Option<String>,
    /// Generic message field.
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Pick the most specific message, falling back to the status code.
    #[must_use]
    pub fn into_message(self, status: u16) -> String {
        self.error
            .or(self.msg)
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"))
    }
}
