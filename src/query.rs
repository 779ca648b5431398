use serde_json::Value;
use tokio_postgres::{types::ToSql, GenericClient, SimpleQueryMessage};

use crate::{
    convert::{write_row, write_rows},
    tuple::{FromRow, TypedRows},
    Result,
};

#[tracing::instrument(level = "debug", skip(client, params))]
pub async fn query_json<C: GenericClient>(
    client: &C,
    sql: &str,
    params: &[&(dyn ToSql + Sync)],
) -> Result<Value> {
    let rows = client.query(sql, params).await?;
    tracing::debug!(rows = rows.len(), "converting");
    let mut out = Value::Null;
    write_rows(&mut out, &rows)?;
    Ok(out)
}

/// Fails unless the statement returns exactly one row.
#[tracing::instrument(level = "debug", skip(client, params))]
pub async fn query_one_json<C: GenericClient>(
    client: &C,
    sql: &str,
    params: &[&(dyn ToSql + Sync)],
) -> Result<Value> {
    let row = client.query_one(sql, params).await?;
    let mut out = Value::Null;
    write_row(&mut out, &row)?;
    Ok(out)
}

/// Runs the statement and hands back its rows decoded as `T`.
///
/// Errors executing the statement are returned here, before any
/// conversion starts.
#[tracing::instrument(level = "debug", skip(client, params))]
pub async fn query_typed<T: FromRow, C: GenericClient>(
    client: &C,
    sql: &str,
    params: &[&(dyn ToSql + Sync)],
) -> Result<TypedRows<T>> {
    let rows = client.query(sql, params).await?;
    tracing::debug!(rows = rows.len(), "typed");
    Ok(TypedRows::new(rows))
}

/// Runs `sql` over the simple query protocol. Every value arrives as
/// text; rows of all statements are written in order.
#[tracing::instrument(level = "debug", skip(client))]
pub async fn simple_query_json<C: GenericClient>(client: &C, sql: &str) -> Result<Value> {
    let rows = client
        .client()
        .simple_query(sql)
        .await?
        .into_iter()
        .filter_map(|msg| match msg {
            SimpleQueryMessage::Row(row) => Some(row),
            _ => None,
        })
        .collect::<Vec<_>>();
    tracing::debug!(rows = rows.len(), "converting");
    let mut out = Value::Null;
    write_rows(&mut out, rows)?;
    Ok(out)
}
