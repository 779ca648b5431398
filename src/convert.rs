use serde_json::Value;
use tokio_postgres::{Row, SimpleQueryRow};

use crate::{
    document::{self, STATUS_OK},
    record::Record,
    tuple::{FromRow, Tuple, TypedRows},
    Error, Result,
};

/// Writes every row to `out["data"][i]`, in source order.
///
/// Owned and borrowed result sets behave the same. The document always
/// gets a `data` array, so zero rows yields `{"data": []}`.
pub fn write_rows<I>(out: &mut Value, rows: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: Record,
{
    let data = document::data(out)?;
    for (idx, row) in rows.into_iter().enumerate() {
        document::put(data, idx, row.values()?);
    }
    Ok(())
}

/// Writes one row to `out["data"][0]`.
pub fn write_row<R: Record>(out: &mut Value, row: R) -> Result<()> {
    let values = row.values()?;
    document::put(document::data(out)?, 0, values);
    Ok(())
}

/// Writes each tuple to `out["data"][i]` and then sets
/// `out["status-code"]` to 200.
///
/// The first failed item stops the conversion and is returned as is. The
/// status is set whenever the iteration runs to the end; it says nothing
/// about the query that produced the tuples.
///
/// Each row is assigned whole. An existing longer row at the same index
/// loses its trailing cells instead of keeping them.
pub fn write_tuples<I, T, E>(out: &mut Value, tuples: I) -> Result<()>
where
    I: IntoIterator<Item = Result<T, E>>,
    T: Tuple,
    Error: From<E>,
{
    let data = document::data(out)?;
    let mut row_idx = 0;
    for tuple in tuples {
        let mut row = Vec::with_capacity(T::ARITY);
        tuple?.write_columns(&mut row)?;
        document::put(data, row_idx, row);
        row_idx += 1;
    }
    document::set_status(out, STATUS_OK)
}

/// Builds json documents out of query results.
///
/// ```no_run
/// # async fn doc(client: &tokio_postgres::Client) -> pgjson::Result<()> {
/// use pgjson::ToJson;
/// let rows = client.query("select 1, 'a'", &[]).await?;
/// assert_eq!(rows.to_json()?, serde_json::json!({"data": [[1, "a"]]}));
/// # Ok(())
/// # }
/// ```
pub trait ToJson: Sized {
    fn write_json(self, out: &mut Value) -> Result<()>;

    fn to_json(self) -> Result<Value> {
        let mut out = Value::Null;
        self.write_json(&mut out)?;
        Ok(out)
    }
}

impl ToJson for Row {
    fn write_json(self, out: &mut Value) -> Result<()> {
        write_row(out, self)
    }
}

impl ToJson for &Row {
    fn write_json(self, out: &mut Value) -> Result<()> {
        write_row(out, self)
    }
}

impl ToJson for SimpleQueryRow {
    fn write_json(self, out: &mut Value) -> Result<()> {
        write_row(out, self)
    }
}

impl ToJson for Vec<Row> {
    fn write_json(self, out: &mut Value) -> Result<()> {
        write_rows(out, self)
    }
}

impl ToJson for &Vec<Row> {
    fn write_json(self, out: &mut Value) -> Result<()> {
        write_rows(out, self)
    }
}

impl ToJson for &[Row] {
    fn write_json(self, out: &mut Value) -> Result<()> {
        write_rows(out, self)
    }
}

impl ToJson for Vec<SimpleQueryRow> {
    fn write_json(self, out: &mut Value) -> Result<()> {
        write_rows(out, self)
    }
}

impl<T: FromRow + Tuple> ToJson for TypedRows<T> {
    fn write_json(self, out: &mut Value) -> Result<()> {
        write_tuples(out, self)
    }
}
