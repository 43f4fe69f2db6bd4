//! Core types for the webshop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod role;
pub mod status;

pub use id::*;
pub use price::{Price, PriceError};
pub use role::{Capabilities, Role, RoleParseError};
pub use status::*;
