use serde_json::{Number, Value};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use tokio_postgres::types::{FromSql, Kind, Type};
use uuid::Uuid;

use crate::numeric::Numeric;

type BoxError = Box<dyn std::error::Error + Sync + Send>;

/// Julian day of 2000-01-01, the zero of postgres dates.
const PG_EPOCH_JDATE: i32 = 2_451_545;

/// A single postgres value in its natural json form.
///
/// SQL NULL of any type is `null`. One dimensional arrays of supported
/// types become json arrays.
#[derive(Debug, PartialEq)]
pub struct Cell(pub Value);

fn scalar(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::BOOL
            | Type::INT2
            | Type::INT4
            | Type::INT8
            | Type::OID
            | Type::FLOAT4
            | Type::FLOAT8
            | Type::NUMERIC
            | Type::CHAR
            | Type::BYTEA
            | Type::JSON
            | Type::JSONB
            | Type::UUID
            | Type::DATE
            | Type::TIME
            | Type::TIMESTAMP
            | Type::TIMESTAMPTZ
    ) || matches!(ty.kind(), Kind::Enum(_))
        || <&str as FromSql>::accepts(ty)
}

fn float(f: f64) -> Value {
    match Number::from_f64(f) {
        Some(n) => Value::Number(n),
        None if f.is_nan() => Value::String(String::from("NaN")),
        None if f.is_sign_positive() => Value::String(String::from("Infinity")),
        None => Value::String(String::from("-Infinity")),
    }
}

/// `"char"` as postgres prints it: high bytes as octal escapes.
fn pg_char(b: u8) -> String {
    match b {
        0 => String::new(),
        0x80.. => format!("\\{b:03o}"),
        _ => char::from(b).to_string(),
    }
}

fn era(year: i32) -> (i32, &'static str) {
    if year <= 0 {
        (1 - year, " BC")
    } else {
        (year, "")
    }
}

fn date(d: Date) -> String {
    let (year, bc) = era(d.year());
    format!("{year:04}-{:02}-{:02}{bc}", u8::from(d.month()), d.day())
}

fn clock(t: Time) -> String {
    let mut s = format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second());
    if t.microsecond() != 0 {
        s.push_str(&format!(".{:06}", t.microsecond()));
    }
    s
}

fn stamp(ts: PrimitiveDateTime, zone: &str) -> String {
    let (year, bc) = era(ts.year());
    format!(
        "{year:04}-{:02}-{:02}T{}{zone}{bc}",
        u8::from(ts.month()),
        ts.day(),
        clock(ts.time())
    )
}

/// Gregorian date of a julian day, the way postgres computes it. Only
/// used past the last year `time` can represent.
fn j2date(jd: i64) -> (i64, i64, i64) {
    let mut julian = jd + 32044;
    let mut quad = julian / 146_097;
    let extra = (julian - quad * 146_097) * 4 + 3;
    julian += 60 + quad * 3 + extra / 146_097;
    quad = julian / 1461;
    julian -= quad * 1461;
    let mut y = julian * 4 / 1461;
    julian = 123
        + if y != 0 {
            (julian + 305) % 365
        } else {
            (julian + 306) % 366
        };
    y += quad * 4;
    quad = julian * 2141 / 65536;
    let day = julian - 7834 * quad / 256;
    let month = (quad + 10) % 12 + 1;
    (y - 4800, month, day)
}

fn date_cell(raw: &[u8]) -> Result<String, BoxError> {
    let days = i32::from_be_bytes(raw.try_into()?);
    Ok(match days {
        i32::MAX => String::from("infinity"),
        i32::MIN => String::from("-infinity"),
        _ => {
            let jd = i64::from(PG_EPOCH_JDATE) + i64::from(days);
            match i32::try_from(jd).ok().and_then(|jd| Date::from_julian_day(jd).ok()) {
                Some(d) => date(d),
                None => {
                    let (year, month, day) = j2date(jd);
                    format!("{year:04}-{month:02}-{day:02}")
                }
            }
        }
    })
}

/// Timestamps at the infinity sentinels, if `raw` holds one.
fn infinite_stamp(raw: &[u8]) -> Option<String> {
    match i64::from_be_bytes(raw.try_into().ok()?) {
        i64::MAX => Some(String::from("infinity")),
        i64::MIN => Some(String::from("-infinity")),
        _ => None,
    }
}

impl<'a> FromSql<'a> for Cell {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        if let Kind::Array(_) = ty.kind() {
            let cells = Vec::<Cell>::from_sql(ty, raw)?;
            return Ok(Cell(Value::Array(cells.into_iter().map(|c| c.0).collect())));
        }
        let value = match *ty {
            Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
            Type::INT2 => i16::from_sql(ty, raw)?.into(),
            Type::INT4 => i32::from_sql(ty, raw)?.into(),
            Type::INT8 => i64::from_sql(ty, raw)?.into(),
            Type::OID => u32::from_sql(ty, raw)?.into(),
            Type::FLOAT4 => {
                // widen through the shortest repr so 0.1 stays 0.1
                let f = f32::from_sql(ty, raw)?;
                float(f.to_string().parse().unwrap_or_else(|_| f64::from(f)))
            }
            Type::FLOAT8 => float(f64::from_sql(ty, raw)?),
            Type::NUMERIC => Value::String(Numeric::from_sql(ty, raw)?.to_string()),
            Type::CHAR => Value::String(pg_char(i8::from_sql(ty, raw)? as u8)),
            Type::BYTEA => Value::String(format!("0x{}", hex::encode(raw))),
            Type::JSON | Type::JSONB => Value::from_sql(ty, raw)?,
            Type::UUID => Value::String(Uuid::from_sql(ty, raw)?.to_string()),
            Type::DATE => Value::String(date_cell(raw)?),
            Type::TIME => Value::String(clock(Time::from_sql(ty, raw)?)),
            Type::TIMESTAMP => Value::String(match infinite_stamp(raw) {
                Some(s) => s,
                None => stamp(PrimitiveDateTime::from_sql(ty, raw)?, ""),
            }),
            Type::TIMESTAMPTZ => Value::String(match infinite_stamp(raw) {
                Some(s) => s,
                None => {
                    let ts = OffsetDateTime::from_sql(ty, raw)?;
                    stamp(PrimitiveDateTime::new(ts.date(), ts.time()), "Z")
                }
            }),
            _ if matches!(ty.kind(), Kind::Enum(_)) => {
                Value::String(std::str::from_utf8(raw)?.to_string())
            }
            _ if <&str as FromSql>::accepts(ty) => {
                Value::String(<&str as FromSql>::from_sql(ty, raw)?.to_string())
            }
            _ => return Err(format!("no json representation for {ty}").into()),
        };
        Ok(Cell(value))
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(Cell(Value::Null))
    }

    fn accepts(ty: &Type) -> bool {
        match ty.kind() {
            Kind::Array(member) => scalar(member),
            _ => scalar(ty),
        }
    }
}
