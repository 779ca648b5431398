use std::{marker::PhantomData, vec};

use serde::Serialize;
use serde_json::Value;
use tokio_postgres::{types::FromSqlOwned, Row};

use crate::{Error, Result};

/// A fixed arity row whose elements serialize to json by position.
pub trait Tuple {
    const ARITY: usize;

    /// Pushes every element onto `row` in declaration order.
    fn write_columns(self, row: &mut Vec<Value>) -> Result<()>;
}

/// A fixed arity row read out of a postgres row by position.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

macro_rules! tuples {
    ($($len:literal => ($($idx:tt $name:ident),+))+) => {$(
        impl<$($name: Serialize),+> Tuple for ($($name,)+) {
            const ARITY: usize = $len;

            fn write_columns(self, row: &mut Vec<Value>) -> Result<()> {
                $(row.push(serde_json::to_value(self.$idx)?);)+
                Ok(())
            }
        }

        impl<$($name: FromSqlOwned),+> FromRow for ($($name,)+) {
            fn from_row(row: &Row) -> Result<Self> {
                if row.len() != $len {
                    return Err(Error::Arity {
                        expected: $len,
                        found: row.len(),
                    });
                }
                Ok(($(
                    row.try_get::<usize, $name>($idx)
                        .map_err(|source| Error::Decode { column: $idx, source })?,
                )+))
            }
        }
    )+};
}

tuples! {
    1 => (0 A)
    2 => (0 A, 1 B)
    3 => (0 A, 1 B, 2 C)
    4 => (0 A, 1 B, 2 C, 3 D)
    5 => (0 A, 1 B, 2 C, 3 D, 4 E)
    6 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F)
    7 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G)
    8 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H)
    9 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I)
    10 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J)
    11 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K)
    12 => (0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K, 11 L)
}

/// Single pass iteration over rows decoded as `T`.
pub struct TypedRows<T> {
    rows: vec::IntoIter<Row>,
    row: PhantomData<fn() -> T>,
}

impl<T: FromRow> TypedRows<T> {
    pub fn new(rows: Vec<Row>) -> TypedRows<T> {
        TypedRows {
            rows: rows.into_iter(),
            row: PhantomData,
        }
    }
}

impl<T: FromRow> Iterator for TypedRows<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|row| T::from_row(&row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl<T: FromRow> ExactSizeIterator for TypedRows<T> {}
