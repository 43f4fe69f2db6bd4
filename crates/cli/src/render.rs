//! Text rendering of the client view model.
//!
//! Every function writes to any [`Write`] so commands pass a locked stdout
//! and tests pass a buffer.

use std::io::{self, Write};

use rust_decimal::Decimal;

use webshop_client::api::{
    DailyEarnings, DashboardReport, Order, Product, ProductStock, TopSellingReport, UserRecord,
};
use webshop_client::{Cart, Notice, NoticeLevel, Panel};

/// `$` amount with two decimals.
pub fn money(amount: Decimal) -> String {
    format!("${amount:.2}")
}

/// Draw a panel: its data, an inline error, or nothing.
pub fn panel<W, T, F>(out: &mut W, panel: &Panel<T>, draw: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut W, &T) -> io::Result<()>,
{
    match panel {
        Panel::Ready(value) => draw(out, value),
        Panel::Failed(message) => writeln!(out, "Error: {message}"),
        Panel::Empty => Ok(()),
    }
}

pub fn notice<W: Write>(out: &mut W, notice: &Notice) -> io::Result<()> {
    match notice.level {
        NoticeLevel::Success => writeln!(out, "{}", notice.text),
        NoticeLevel::Error => writeln!(out, "Error: {}", notice.text),
    }
}

pub fn products<W: Write>(out: &mut W, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    writeln!(
        out,
        "{:>5}  {:<28} {:>10}  {:<16} {:<14} {:<14} {:<8}",
        "ID", "NAME", "PRICE", "STOCK", "CATEGORY", "BRAND", "GENDER"
    )?;
    for p in products {
        let stock = if p.in_stock {
            format!("in stock ({})", p.current_quantity)
        } else {
            "out of stock".to_string()
        };
        writeln!(
            out,
            "{:>5}  {:<28} {:>10}  {:<16} {:<14} {:<14} {:<8}",
            p.id,
            p.name,
            p.discounted_price.to_string(),
            stock,
            p.category_name(),
            p.brand_name(),
            p.gender
        )?;
        if p.is_discounted() {
            writeln!(
                out,
                "       {}% off, was {}",
                p.discount_percentage.normalize(),
                p.price
            )?;
        }
    }
    Ok(())
}

pub fn stock<W: Write>(out: &mut W, stock: &ProductStock) -> io::Result<()> {
    writeln!(out, "Name:             {}", stock.name)?;
    writeln!(out, "Initial Quantity: {}", stock.initial_quantity)?;
    writeln!(out, "Sold:             {}", stock.sold_quantity)?;
    writeln!(out, "Available:        {}", stock.current_quantity)?;
    writeln!(
        out,
        "Status:           {}",
        if stock.in_stock {
            "In Stock"
        } else {
            "Out of Stock"
        }
    )
}

pub fn orders<W: Write>(out: &mut W, orders: &[Order]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No order history.");
    }

    writeln!(
        out,
        "{:>6}  {:<17} {:<10} {:>10}  {:>5}",
        "ORDER", "PLACED", "STATUS", "TOTAL", "ITEMS"
    )?;
    for order in orders {
        let placed = order
            .created_at_utc()
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        let items = order
            .item_count()
            .map_or_else(|| "N/A".to_string(), |n| n.to_string());
        writeln!(
            out,
            "{:>6}  {:<17} {:<10} {:>10}  {:>5}",
            format!("#{}", order.id),
            placed,
            order.status.as_str(),
            money(order.total_amount),
            items
        )?;
    }
    Ok(())
}

pub fn order_placed<W: Write>(out: &mut W, order: &Order) -> io::Result<()> {
    writeln!(
        out,
        "Order #{} ({}) total {}",
        order.id,
        order.status,
        money(order.total_amount)
    )
}

pub fn dashboard<W: Write>(out: &mut W, report: &DashboardReport) -> io::Result<()> {
    writeln!(
        out,
        "Total Revenue: {}",
        money(report.total_revenue.unwrap_or_default())
    )?;
    writeln!(out, "Total Orders:  {}", report.total_orders.unwrap_or_default())?;
    writeln!(out, "Users:         {}", report.total_users.unwrap_or_default())?;

    if let Some(top) = &report.top_products {
        writeln!(out)?;
        writeln!(out, "Top Selling Products")?;
        writeln!(out, "{:<32} {:>6}", "PRODUCT", "SOLD")?;
        for p in top {
            writeln!(out, "{:<32} {:>6}", p.name, p.sold)?;
        }
    }
    Ok(())
}

pub fn top_selling<W: Write>(out: &mut W, report: &TopSellingReport) -> io::Result<()> {
    if report.top_products.is_empty() {
        return writeln!(out, "No sales yet.");
    }

    writeln!(
        out,
        "{:>5}  {:<32} {:>6} {:>12}",
        "ID", "PRODUCT", "SOLD", "REVENUE"
    )?;
    for p in &report.top_products {
        writeln!(
            out,
            "{:>5}  {:<32} {:>6} {:>12}",
            p.product_id,
            p.product_name,
            p.total_sold,
            money(p.total_revenue)
        )?;
    }
    Ok(())
}

pub fn earnings<W: Write>(out: &mut W, earnings: &DailyEarnings) -> io::Result<()> {
    writeln!(
        out,
        "{}: {} from {} orders",
        earnings.date.format("%Y-%m-%d"),
        money(earnings.total_earnings),
        earnings.total_orders
    )
}

pub fn users<W: Write>(out: &mut W, users: &[UserRecord]) -> io::Result<()> {
    writeln!(out, "{:>5}  {:<20} {:<14} {}", "ID", "USERNAME", "ROLE", "EMAIL")?;
    for u in users {
        writeln!(
            out,
            "{:>5}  {:<20} {:<14} {}",
            u.id,
            u.username,
            u.role.as_str(),
            u.email.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

pub fn cart<W: Write>(out: &mut W, cart: &Cart) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    for line in cart.lines() {
        writeln!(
            out,
            "{:<28} {} x {:<3} {:>10}",
            line.name,
            line.unit_price,
            line.quantity,
            money(line.line_total())
        )?;
    }
    writeln!(out, "Total: {}", money(cart.total()))
}
