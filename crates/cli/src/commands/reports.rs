//! Reporting and user administration commands.

use std::io;

use chrono::{NaiveDate, Utc};

use super::{CommandError, connect_authenticated};
use crate::Connection;
use crate::render;

/// `shopctl reports`
pub async fn dashboard(connection: &Connection) -> Result<(), CommandError> {
    let mut client = connect_authenticated(connection).await?;
    let result = client.load_reports().await;

    let mut out = io::stdout().lock();
    render::panel(&mut out, &client.view().reports, |o, r| render::dashboard(o, r))?;
    result?;
    Ok(())
}

/// `shopctl top-selling`
pub async fn top_selling(connection: &Connection, limit: u32) -> Result<(), CommandError> {
    let mut client = connect_authenticated(connection).await?;
    let result = client.top_selling_products(limit).await;

    let mut out = io::stdout().lock();
    render::panel(&mut out, &client.view().top_selling, |o, r| {
        render::top_selling(o, r)
    })?;
    result?;
    Ok(())
}

/// `shopctl earnings`
pub async fn earnings(connection: &Connection, date: Option<NaiveDate>) -> Result<(), CommandError> {
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let mut client = connect_authenticated(connection).await?;
    let result = client.daily_earnings(date).await;

    let mut out = io::stdout().lock();
    render::panel(&mut out, &client.view().earnings, |o, e| render::earnings(o, e))?;
    result?;
    Ok(())
}

/// `shopctl users`
pub async fn users(connection: &Connection) -> Result<(), CommandError> {
    let mut client = connect_authenticated(connection).await?;
    let result = client.load_users().await;

    let mut out = io::stdout().lock();
    render::panel(&mut out, &client.view().users, |o, u| render::users(o, u))?;
    result?;
    Ok(())
}
