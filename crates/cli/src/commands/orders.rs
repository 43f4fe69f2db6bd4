//! Cart, checkout and order commands.

use std::io::{self, Write};

use webshop_client::{AutoConfirm, HttpStoreApi, StoreClient};
use webshop_core::{OrderId, OrderStatus, ProductId};

use super::{CommandError, connect_authenticated};
use crate::prompt::PromptConfirm;
use crate::render;
use crate::Connection;

/// Largest quantity a single `--item` may ask for.
pub const MAX_ITEM_QUANTITY: u32 = 999;

/// Parse a `--item` value: `ID` or `ID:QTY` with `1 <= QTY <= 999`.
pub fn parse_item(raw: &str) -> Result<(ProductId, u32), String> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, quantity)) => (id, quantity),
        None => (raw, "1"),
    };

    let id: ProductId = id
        .parse()
        .map_err(|_| format!("invalid product id '{id}'"))?;
    let quantity: u32 = quantity
        .trim()
        .parse()
        .map_err(|_| format!("invalid quantity '{quantity}'"))?;

    if quantity == 0 {
        return Err("quantity must be at least 1".to_string());
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(format!("quantity must be at most {MAX_ITEM_QUANTITY}"));
    }
    Ok((id, quantity))
}

/// `shopctl buy --item ID[:QTY]...`
pub async fn buy(
    connection: &Connection,
    items: &[(ProductId, u32)],
    yes: bool,
) -> Result<(), CommandError> {
    let mut client = connect_authenticated(connection).await?;
    fill_cart(&mut client, items)?;

    let placed = if yes {
        client.checkout(AutoConfirm).await?
    } else {
        client.checkout(PromptConfirm::stdin()).await?
    };

    let mut out = io::stdout().lock();
    match placed {
        Some(order) => {
            if let Some(notice) = &client.view().notice {
                render::notice(&mut out, notice)?;
            }
            render::order_placed(&mut out, &order)?;
        }
        None => writeln!(out, "Order cancelled.")?,
    }
    Ok(())
}

/// Add each requested product from the listing loaded at login.
fn fill_cart(
    client: &mut StoreClient<HttpStoreApi>,
    items: &[(ProductId, u32)],
) -> Result<(), CommandError> {
    for &(id, quantity) in items {
        let product = client
            .view()
            .products
            .ready()
            .and_then(|products| products.iter().find(|p| p.id == id))
            .cloned()
            .ok_or_else(|| CommandError::InvalidArgument(format!("unknown product {id}")))?;

        for _ in 0..quantity {
            client.add_product_to_cart(&product)?;
        }
    }
    Ok(())
}

/// `shopctl orders`
pub async fn list(connection: &Connection) -> Result<(), CommandError> {
    let mut client = connect_authenticated(connection).await?;
    let result = client.load_orders().await;

    let mut out = io::stdout().lock();
    render::panel(&mut out, &client.view().orders, |o, v| render::orders(o, v))?;
    result?;
    Ok(())
}

/// `shopctl order-status <id> <status>`
pub async fn set_status(
    connection: &Connection,
    id: OrderId,
    status: OrderStatus,
) -> Result<(), CommandError> {
    let mut client = connect_authenticated(connection).await?;
    client.update_order_status(id, status).await?;

    let mut out = io::stdout().lock();
    if let Some(notice) = &client.view().notice {
        render::notice(&mut out, notice)?;
    }
    Ok(())
}
