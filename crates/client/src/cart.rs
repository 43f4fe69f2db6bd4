//! Local shopping cart.
//!
//! The cart lives only in client memory. It holds at most one line per
//! product; adding the same product again bumps the quantity.

use rust_decimal::Decimal;
use serde::Serialize;

use webshop_core::{Price, ProductId};

use crate::api::OrderItemRequest;

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.times(self.quantity)
    }
}

/// Ordered list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of a product.
    ///
    /// Returns the quantity of that product after the add.
    pub fn add(&mut self, product_id: ProductId, name: impl Into<String>, unit_price: Price) -> u32 {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }

        self.lines.push(CartLine {
            product_id,
            name: name.into(),
            unit_price,
            quantity: 1,
        });
        1
    }

    /// Remove the line at `index`. Out-of-range indexes leave the cart as is.
    pub fn remove(&mut self, index: usize) -> Option<CartLine> {
        (index < self.lines.len()).then(|| self.lines.remove(index))
    }

    /// Sum of every line total, recomputed on each call. Saturates at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().fold(Decimal::ZERO, |acc, line| {
            acc.checked_add(line.line_total()).unwrap_or(Decimal::MAX)
        })
    }

    /// Sum of quantities (the badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Order lines for `POST /orders`. Prices are left to the backend.
    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItemRequest> {
        self.lines
            .iter()
            .map(|l| OrderItemRequest {
                product_id: l.product_id,
                quantity: l.quantity,
            })
            .collect()
    }
}
