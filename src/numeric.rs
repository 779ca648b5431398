use std::fmt;

use eyre::eyre;
use tokio_postgres::types::{FromSql, Type};

const NUMERIC_POS: u16 = 0x0000;
const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

/// A postgres `numeric` decoded from the binary wire format.
///
/// The value is kept as base 10000 digits so that it renders exactly,
/// including trailing zeros implied by the display scale.
#[derive(Debug, PartialEq)]
pub enum Numeric {
    NaN,
    Infinity,
    NegInfinity,
    Finite {
        negative: bool,
        weight: i16,
        scale: u16,
        digits: Vec<i16>,
    },
}

impl Numeric {
    fn digit(digits: &[i16], idx: i32) -> i16 {
        if idx < 0 {
            return 0;
        }
        digits.get(idx as usize).copied().unwrap_or(0)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (negative, weight, scale, digits) = match self {
            Numeric::NaN => return f.write_str("NaN"),
            Numeric::Infinity => return f.write_str("Infinity"),
            Numeric::NegInfinity => return f.write_str("-Infinity"),
            Numeric::Finite {
                negative,
                weight,
                scale,
                digits,
            } => (*negative, i32::from(*weight), usize::from(*scale), digits),
        };
        let mut out = String::new();
        if negative {
            out.push('-');
        }
        if weight < 0 {
            out.push('0');
        } else {
            for idx in 0..=weight {
                let d = Self::digit(digits, idx);
                if idx == 0 {
                    out.push_str(&d.to_string());
                } else {
                    out.push_str(&format!("{d:04}"));
                }
            }
        }
        if scale > 0 {
            let mut frac = String::with_capacity(scale + 4);
            let mut idx = weight + 1;
            while frac.len() < scale {
                frac.push_str(&format!("{:04}", Self::digit(digits, idx)));
                idx += 1;
            }
            frac.truncate(scale);
            out.push('.');
            out.push_str(&frac);
        }
        f.write_str(&out)
    }
}

impl<'a> FromSql<'a> for Numeric {
    fn accepts(ty: &Type) -> bool {
        *ty == Type::NUMERIC
    }

    fn from_sql(
        _ty: &Type,
        raw: &'a [u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        if raw.len() < 8 {
            return Err(eyre!("numeric header too small").into());
        }
        let ndigits = i16::from_be_bytes(raw[0..2].try_into()?);
        let weight = i16::from_be_bytes(raw[2..4].try_into()?);
        let sign = u16::from_be_bytes(raw[4..6].try_into()?);
        let scale = u16::from_be_bytes(raw[6..8].try_into()?);
        let negative = match sign {
            NUMERIC_POS => false,
            NUMERIC_NEG => true,
            NUMERIC_NAN => return Ok(Numeric::NaN),
            NUMERIC_PINF => return Ok(Numeric::Infinity),
            NUMERIC_NINF => return Ok(Numeric::NegInfinity),
            _ => return Err(eyre!("invalid numeric sign {sign:#x}").into()),
        };
        let ndigits = usize::try_from(ndigits)?;
        let body = &raw[8..];
        if body.len() != ndigits * 2 {
            return Err(eyre!("numeric has {} digit bytes want {}", body.len(), ndigits * 2).into());
        }
        let digits = body
            .chunks_exact(2)
            .map(|c| i16::from_be_bytes([c[0], c[1]]))
            .collect();
        Ok(Numeric::Finite {
            negative,
            weight,
            scale,
            digits,
        })
    }
}
