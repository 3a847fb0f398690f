//! Typed values: the closed string/quantity/year/date algebra shared by
//! attribute values, qualifier values, and literal program arguments.

use std::fmt::{self, Display, Formatter};

use anyhow::anyhow;
use chrono::NaiveDate;
use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Reason};

/// A single typed value, as stored on an attribute/qualifier or parsed from
/// a primitive's literal argument.
#[derive(Debug, Clone, PartialEq, EnumAsInner, Serialize, Deserialize, strum::AsRefStr)]
pub enum Value {
    String(String),
    Quantity(Quantity),
    Year(i64),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl From<Value> for anyhow::Error {
    fn from(v: Value) -> Self {
        anyhow!("cannot convert `{v}` to the requested shape")
    }
}

impl Value {
    pub fn quantity(value: f64, unit: impl Into<String>) -> Self {
        Value::Quantity(Quantity {
            value,
            unit: unit.into(),
        })
    }

    fn is_temporal(&self) -> bool {
        matches!(self, Value::Year(_) | Value::Date(_))
    }

    /// The year this value's temporal meaning falls in, if any.
    fn as_year_number(&self) -> Option<i64> {
        match self {
            Value::Year(y) => Some(*y),
            Value::Date(d) => Some(d.format("%Y").to_string().parse().ok()?),
            _ => None,
        }
    }

    /// Whether `self` and `other` may be compared at all (§4.1).
    pub fn is_comparable(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(_), Value::String(_)) => true,
            (Value::Quantity(a), Value::Quantity(b)) => a.unit == b.unit,
            (a, b) if a.is_temporal() && b.is_temporal() => true,
            _ => false,
        }
    }

    /// Equality per §4.1: temporal values use containment, everything else
    /// compares structurally.
    pub fn value_eq(&self, other: &Value) -> bool {
        if !self.is_comparable(other) {
            return false;
        }
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Quantity(a), Value::Quantity(b)) => a.unit == b.unit && a.value == b.value,
            (a, b) if a.is_temporal() && b.is_temporal() => match (a, b) {
                (Value::Date(d), Value::Date(e)) => d == e,
                (Value::Year(y), Value::Year(z)) => y == z,
                _ => a.as_year_number() == b.as_year_number(),
            },
            _ => false,
        }
    }

    pub fn value_ne(&self, other: &Value) -> bool {
        !self.value_eq(other)
    }

    /// Ordering comparison per §4.1. Strings never order; this returns a
    /// domain error rather than an `Ordering`.
    pub fn value_lt(&self, other: &Value) -> crate::error::Result<bool> {
        if !self.is_comparable(other) {
            return Ok(false);
        }
        match (self, other) {
            (Value::String(_), Value::String(_)) => Err(Error::domain(
                "ordering comparison is not supported on string values",
            )
            .into()),
            (Value::Quantity(a), Value::Quantity(b)) => Ok(a.value < b.value),
            (a, b) if a.is_temporal() && b.is_temporal() => match (a, b) {
                (Value::Date(d), Value::Date(e)) => Ok(d < e),
                (Value::Year(y), Value::Year(z)) => Ok(y < z),
                _ => Ok(a.as_year_number() < b.as_year_number()),
            },
            _ => Ok(false),
        }
    }

    pub fn value_gt(&self, other: &Value) -> crate::error::Result<bool> {
        if !self.is_comparable(other) {
            return Ok(false);
        }
        match (self, other) {
            (Value::String(_), Value::String(_)) => Err(Error::domain(
                "ordering comparison is not supported on string values",
            )
            .into()),
            (Value::Quantity(a), Value::Quantity(b)) => Ok(a.value > b.value),
            (a, b) if a.is_temporal() && b.is_temporal() => match (a, b) {
                (Value::Date(d), Value::Date(e)) => Ok(d > e),
                (Value::Year(y), Value::Year(z)) => Ok(y > z),
                _ => Ok(a.as_year_number() > b.as_year_number()),
            },
            _ => Ok(false),
        }
    }

    /// Apply a named comparison operator (`=`, `!=`, `<`, `>`) to `self` as
    /// the subject and `target` as the literal being compared against.
    pub fn compare(&self, target: &Value, op: &str) -> crate::error::Result<bool> {
        match op {
            "=" => Ok(self.value_eq(target)),
            "!=" => Ok(self.value_ne(target)),
            "<" => self.value_lt(target),
            ">" => self.value_gt(target),
            other => Err(Error::new(Reason::Expected {
                who: Some("comparison operator".to_string()),
                expected: "one of =, !=, <, >".to_string(),
                found: other.to_string(),
            })
            .into()),
        }
    }

    /// Splits a date/year string on its separator. A leading `-` is a sign
    /// marker, not a separator (§4.1).
    fn split_separator(raw: &str) -> Option<char> {
        if raw.contains('/') {
            Some('/')
        } else if raw.get(1..).map_or(false, |rest| rest.contains('-')) {
            Some('-')
        } else {
            None
        }
    }

    fn parse_temporal(raw: &str) -> crate::error::Result<Value> {
        match Self::split_separator(raw) {
            Some(sep) => {
                let first = raw.find(sep).unwrap();
                let last = raw.rfind(sep).unwrap();
                let y: i32 = raw[..first].parse()?;
                let m: u32 = raw[first + 1..last].parse()?;
                let d: u32 = raw[last + 1..].parse()?;
                let date = NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| {
                    Error::simple(format!("`{raw}` is not a valid calendar date"))
                })?;
                Ok(Value::Date(date))
            }
            None => Ok(Value::Year(raw.parse()?)),
        }
    }

    /// Parse a value from its raw `(type, payload)` ingestion record (§4.1).
    pub fn from_raw(type_tag: &str, raw: &str, unit: Option<&str>) -> crate::error::Result<Value> {
        match type_tag {
            "string" => Ok(Value::String(raw.to_string())),
            "quantity" => Ok(Value::quantity(raw.parse()?, unit.unwrap_or("1"))),
            "year" => Ok(Value::Year(raw.parse()?)),
            "date" => Self::parse_temporal(raw),
            other => Err(Error::new(Reason::Expected {
                who: Some("value type".to_string()),
                expected: "string, quantity, year or date".to_string(),
                found: other.to_string(),
            })
            .into()),
        }
    }

    /// Parse a value from a user-supplied literal string, using `key_type`
    /// (normalised to one of "string"/"quantity"/"date") as the expected
    /// shape, unless `override_type` is given explicitly.
    pub fn from_literal(
        raw: &str,
        key_type: &str,
        override_type: Option<&str>,
    ) -> crate::error::Result<Value> {
        let typ = override_type.unwrap_or(key_type);
        match typ {
            "string" => Ok(Value::String(raw.to_string())),
            "quantity" => {
                if let Some((num, unit)) = raw.split_once(char::is_whitespace) {
                    Ok(Value::quantity(num.trim().parse()?, unit.trim()))
                } else {
                    Ok(Value::quantity(raw.parse()?, "1"))
                }
            }
            "date" | "year" => Self::parse_temporal(raw),
            other => Err(Error::new(Reason::Expected {
                who: Some("value type".to_string()),
                expected: "string, quantity or date".to_string(),
                found: other.to_string(),
            })
            .into()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Quantity(q) => {
                let rounded = q.value.round();
                let shown = if (q.value - rounded).abs() < 1e-5 {
                    format!("{}", rounded as i64)
                } else {
                    format!("{}", q.value)
                };
                if q.unit == "1" {
                    f.write_str(&shown)
                } else {
                    write!(f, "{shown} {}", q.unit)
                }
            }
            Value::Year(y) => write!(f, "{y}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Normalises a key's declared value type so that year and date share one
/// key type (§3 invariants): last-writer-wins among observed value types,
/// then `year -> date`.
pub fn unify_key_type(observed: &str) -> String {
    if observed == "year" {
        "date".to_string()
    } else {
        observed.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_date_year_containment_equality() {
        let date = Value::Date(NaiveDate::from_ymd_opt(1960, 2, 1).unwrap());
        let year = Value::Year(1960);
        assert!(date.value_eq(&year));
        assert!(year.value_eq(&date));
        assert!(!date.value_ne(&year));
    }

    #[test]
    fn test_date_year_containment_inequality_on_mismatch() {
        let date = Value::Date(NaiveDate::from_ymd_opt(1960, 2, 1).unwrap());
        let year = Value::Year(1961);
        assert!(date.value_ne(&year));
        assert!(!date.value_eq(&year));
    }

    #[test]
    fn test_quantity_same_unit_equal() {
        let a = Value::quantity(1.0, "kg");
        let b = Value::quantity(1.0, "kg");
        assert!(a.value_eq(&b));
    }

    #[test]
    fn test_quantity_different_unit_not_comparable() {
        let a = Value::quantity(1.0, "kg");
        let b = Value::quantity(1.0, "lb");
        assert!(!a.is_comparable(&b));
        assert!(!a.value_eq(&b));
    }

    #[test]
    fn test_string_ordering_is_domain_error() {
        let a = Value::String("a".to_string());
        let b = Value::String("b".to_string());
        assert!(a.value_lt(&b).is_err());
    }

    #[test]
    fn test_quantity_display_integer_rounding() {
        let v = Value::quantity(180.0, "cm");
        assert_eq!(v.to_string(), "180 cm");
        let v = Value::quantity(1.0, "1");
        assert_eq!(v.to_string(), "1");
    }

    #[test]
    fn test_parse_literal_quantity_default_unit() {
        let v = Value::from_literal("178", "quantity", None).unwrap();
        assert_eq!(v, Value::quantity(178.0, "1"));
    }

    #[test]
    fn test_parse_literal_quantity_with_unit() {
        let v = Value::from_literal("178 cm", "quantity", None).unwrap();
        assert_eq!(v, Value::quantity(178.0, "cm"));
    }

    #[test]
    fn test_parse_literal_date_vs_year() {
        let v = Value::from_literal("1960-02-01", "date", None).unwrap();
        assert_eq!(v, Value::Date(NaiveDate::from_ymd_opt(1960, 2, 1).unwrap()));
        let v = Value::from_literal("1960", "date", None).unwrap();
        assert_eq!(v, Value::Year(1960));
    }

    #[test]
    fn test_negative_sign_is_not_a_separator() {
        // A hypothetical BCE year-only literal shouldn't be mistaken for a
        // dashed date; there is no second dash to pair it with.
        assert!(Value::split_separator("-44").is_none());
    }

    #[test]
    fn test_cross_tag_temporal_ordering() {
        let date = Value::Date(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap());
        let year = Value::Year(2000);
        assert!(date.value_lt(&year).unwrap());
        assert!(year.value_gt(&date).unwrap());
    }

    #[test]
    fn test_unify_key_type() {
        assert_eq!(unify_key_type("year"), "date");
        assert_eq!(unify_key_type("date"), "date");
        assert_eq!(unify_key_type("string"), "string");
    }
}
