#![deny(unsafe_code)]

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Largest magnitude at which an integral `f64` is still rendered as an integer.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A single scalar read from a spreadsheet cell.
///
/// Equality is strict by kind: the text `"1"` and the number `1` are different
/// values. Numbers compare by value, so `-0.0` equals `0.0`.
#[derive(Debug, Clone, Default)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    #[default]
    Missing,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Whether the value may be offered as an option: missing cells and empty
    /// strings are not. Numeric zero and `false` are real values.
    pub fn is_selectable(&self) -> bool {
        match self {
            Self::Missing => false,
            Self::Text(text) => !text.is_empty(),
            Self::Number(_) | Self::Bool(_) => true,
        }
    }

    fn integral(value: f64) -> Option<i64> {
        if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
            Some(value as i64)
        } else {
            None
        }
    }
}

fn normalized_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => normalized_bits(*a) == normalized_bits(*b),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Missing, Self::Missing) => true,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Text(text) => text.hash(state),
            Self::Number(number) => normalized_bits(*number).hash(state),
            Self::Bool(flag) => flag.hash(state),
            Self::Missing => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => match Self::integral(*number) {
                Some(int) => write!(f, "{int}"),
                None => write!(f, "{number}"),
            },
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Missing => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Number(number) => match Self::integral(*number) {
                Some(int) => serializer.serialize_i64(int),
                None => serializer.serialize_f64(*number),
            },
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Missing => serializer.serialize_none(),
        }
    }
}

struct CellValueVisitor;

impl<'de> Visitor<'de> for CellValueVisitor {
    type Value = CellValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean, or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<CellValue, E> {
        Ok(CellValue::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<CellValue, E> {
        Ok(CellValue::Text(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<CellValue, E> {
        Ok(CellValue::Number(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<CellValue, E> {
        Ok(CellValue::Number(value as f64))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<CellValue, E> {
        Ok(CellValue::Number(value))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<CellValue, E> {
        Ok(CellValue::Bool(value))
    }

    fn visit_none<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Missing)
    }

    fn visit_unit<E: de::Error>(self) -> Result<CellValue, E> {
        Ok(CellValue::Missing)
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CellValueVisitor)
    }
}
