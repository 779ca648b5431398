use std::{convert::Infallible, fmt};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    /// The statement itself failed.
    Query(tokio_postgres::Error),
    /// A cell could not be read out of its row.
    Decode {
        column: usize,
        source: tokio_postgres::Error,
    },
    /// The column's type has no json representation.
    Unsupported { column: usize, ty: String },
    /// A typed row was read from a row of a different width.
    Arity { expected: usize, found: usize },
    Json(serde_json::Error),
    /// The output value cannot hold a document.
    Document(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Query(err) => match err.as_db_error() {
                Some(e) => write!(f, "query: {}", e.message()),
                None => write!(f, "query: {err}"),
            },
            Error::Decode { column, source } => write!(f, "decoding column {column}: {source}"),
            Error::Unsupported { column, ty } => {
                write!(f, "column {column} has unsupported type {ty}")
            }
            Error::Arity { expected, found } => {
                write!(f, "expected {expected} columns found {found}")
            }
            Error::Json(err) => write!(f, "json: {err}"),
            Error::Document(msg) => write!(f, "document: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Query(err) => Some(err),
            Error::Decode { source, .. } => Some(source),
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        Error::Query(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<Infallible> for Error {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}
