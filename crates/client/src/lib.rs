//! Webshop session/cart client.
//!
//! Holds the login session, the shopping cart and a view model, and talks to
//! the webshop REST backend through the [`StoreApi`] trait.
//!
//! # Modules
//!
//! - [`api`] - Backend trait, wire types and the `reqwest` implementation
//! - [`client`] - [`StoreClient`], the stateful client
//! - [`view`] - Render instructions for a front end

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod search;
pub mod session;
pub mod shared;
pub mod view;

#[cfg(test)]
mod testing;

pub use api::{HttpStoreApi, StoreApi};
pub use cart::{Cart, CartLine};
pub use catalog::Catalog;
pub use client::{AutoConfirm, Confirm, StoreClient};
pub use config::{ClientConfig, ConfigError, Credentials};
pub use error::ClientError;
pub use search::SearchFilters;
pub use session::Session;
pub use shared::SharedClient;
pub use view::{Notice, NoticeArea, NoticeLevel, Panel, Screen, Tab, View};
