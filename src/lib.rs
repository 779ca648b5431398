//! Postgres query results as json documents.
//!
//! Result sets and rows become `{"data": [[...], ...]}`, one inner array
//! per row with the cells in column order. Typed tuple iterations produce
//! the same shape plus `"status-code": 200`.

mod cell;
mod convert;
mod document;
mod error;
mod numeric;
#[cfg(all(test, feature = "pg-test"))]
mod pg_test;
mod query;
pub mod record;
pub mod tuple;

pub use cell::Cell;
pub use convert::{write_row, write_rows, write_tuples, ToJson};
pub use document::{DATA, STATUS_CODE, STATUS_OK};
pub use error::{Error, Result};
pub use numeric::Numeric;
pub use query::{query_json, query_one_json, query_typed, simple_query_json};
pub use record::Record;
pub use tuple::{FromRow, Tuple, TypedRows};
