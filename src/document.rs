//! Positional writes into a `{"data": [...]}` document.

use serde_json::{Map, Value};

use crate::{Error, Result};

pub const DATA: &str = "data";
pub const STATUS_CODE: &str = "status-code";
pub const STATUS_OK: u16 = 200;

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn object<'a>(out: &'a mut Value, key: &str) -> Result<&'a mut Map<String, Value>> {
    if out.is_null() {
        *out = Value::Object(Map::new());
    }
    match out {
        Value::Object(map) => Ok(map),
        other => Err(Error::Document(format!(
            "cannot use key {key:?} with {}",
            kind(other)
        ))),
    }
}

/// The `data` array of `out`, created when missing.
///
/// A null `out` becomes an object. Other keys of an existing object are
/// left alone.
pub(crate) fn data(out: &mut Value) -> Result<&mut Vec<Value>> {
    let slot = object(out, DATA)?
        .entry(DATA)
        .or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(rows) => Ok(rows),
        other => Err(Error::Document(format!(
            "{DATA:?} is {} not array",
            kind(other)
        ))),
    }
}

/// Assigns `row` at `idx`, padding with nulls like an indexed assignment.
pub(crate) fn put(rows: &mut Vec<Value>, idx: usize, row: Vec<Value>) {
    if rows.len() <= idx {
        rows.resize(idx + 1, Value::Null);
    }
    rows[idx] = Value::Array(row);
}

pub(crate) fn set_status(out: &mut Value, code: u16) -> Result<()> {
    object(out, STATUS_CODE)?.insert(STATUS_CODE.to_string(), Value::from(code));
    Ok(())
}
