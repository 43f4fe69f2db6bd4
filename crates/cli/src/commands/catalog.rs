//! Product catalog commands.

use std::io::{self, Write};

use webshop_client::SearchFilters;
use webshop_client::api::NewProduct;
use webshop_core::ProductId;

use super::{CommandError, connect, connect_authenticated};
use crate::render;
use crate::{Connection, CreateProductArgs, SearchArgs};

/// `shopctl products`
pub async fn products(connection: &Connection) -> Result<(), CommandError> {
    let (mut client, _) = connect(connection)?;
    let result = client.load_products().await;

    let mut out = io::stdout().lock();
    render::panel(&mut out, &client.view().products, |o, p| render::products(o, p))?;
    result?;
    Ok(())
}

/// `shopctl search`
pub async fn search(connection: &Connection, args: SearchArgs) -> Result<(), CommandError> {
    let (mut client, _) = connect(connection)?;

    // Category and brand ids are resolved against the catalog.
    if args.category.is_some() || args.brand.is_some() {
        client.load_catalog().await;
    }

    let filters = SearchFilters {
        gender: args.gender,
        category_id: args.category,
        brand_id: args.brand,
        price_min: args.min_price,
        price_max: args.max_price,
        availability: args.availability,
    };
    let result = client.search(&filters).await;

    let mut out = io::stdout().lock();
    render::panel(&mut out, &client.view().search_results, |o, p| {
        render::products(o, p)
    })?;
    if result.is_ok()
        && let Some(notice) = &client.view().notice
    {
        render::notice(&mut out, notice)?;
    }
    result?;
    Ok(())
}

/// `shopctl product <id>`
pub async fn product(connection: &Connection, id: ProductId) -> Result<(), CommandError> {
    let (mut client, _) = connect(connection)?;
    let result = client.product_stock(id).await;

    let mut out = io::stdout().lock();
    render::panel(&mut out, &client.view().product_detail, |o, s| {
        render::stock(o, s)
    })?;
    result?;
    Ok(())
}

/// `shopctl create-product`
pub async fn create_product(
    connection: &Connection,
    args: CreateProductArgs,
) -> Result<(), CommandError> {
    let mut client = connect_authenticated(connection).await?;

    let product = NewProduct {
        name: args.name,
        description: args.description,
        price: args.price,
        discount_percentage: args.discount,
        gender: args.gender,
        initial_quantity: args.quantity,
        category_id: args.category,
        brand_id: args.brand,
    };
    let created = client.create_product(&product).await?;

    let mut out = io::stdout().lock();
    if let Some(notice) = &client.view().notice {
        render::notice(&mut out, notice)?;
    }
    writeln!(
        out,
        "Created product #{} {} at {}",
        created.id, created.name, created.discounted_price
    )?;
    Ok(())
}
