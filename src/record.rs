use serde_json::Value;
use tokio_postgres::{types::FromSql, Row, SimpleQueryRow};

use crate::{cell::Cell, Error, Result};

/// A row whose cells can be read positionally as json values.
pub trait Record {
    fn width(&self) -> usize;

    fn cell(&self, idx: usize) -> Result<Value>;

    /// All cells in column order.
    fn values(&self) -> Result<Vec<Value>> {
        (0..self.width()).map(|idx| self.cell(idx)).collect()
    }
}

impl Record for Row {
    fn width(&self) -> usize {
        self.len()
    }

    fn cell(&self, idx: usize) -> Result<Value> {
        if let Some(column) = self.columns().get(idx) {
            if !<Cell as FromSql>::accepts(column.type_()) {
                return Err(Error::Unsupported {
                    column: idx,
                    ty: column.type_().to_string(),
                });
            }
        }
        self.try_get::<usize, Cell>(idx)
            .map(|c| c.0)
            .map_err(|source| Error::Decode {
                column: idx,
                source,
            })
    }
}

/// Text protocol rows carry the server's rendering of every value.
impl Record for SimpleQueryRow {
    fn width(&self) -> usize {
        self.len()
    }

    fn cell(&self, idx: usize) -> Result<Value> {
        match self.try_get(idx) {
            Ok(Some(s)) => Ok(Value::String(s.to_string())),
            Ok(None) => Ok(Value::Null),
            Err(source) => Err(Error::Decode {
                column: idx,
                source,
            }),
        }
    }
}

impl Record for [Value] {
    fn width(&self) -> usize {
        self.len()
    }

    fn cell(&self, idx: usize) -> Result<Value> {
        self.get(idx).cloned().ok_or(Error::Arity {
            expected: idx + 1,
            found: self.len(),
        })
    }
}

impl Record for Vec<Value> {
    fn width(&self) -> usize {
        self.len()
    }

    fn cell(&self, idx: usize) -> Result<Value> {
        self.as_slice().cell(idx)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn cell(&self, idx: usize) -> Result<Value> {
        (**self).cell(idx)
    }

    fn values(&self) -> Result<Vec<Value>> {
        (**self).values()
    }
}
