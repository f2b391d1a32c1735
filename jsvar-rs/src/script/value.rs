//! Decoded literal values.
//!
//! A script literal is one of five shapes.  Unlike a dynamically typed
//! value, [`LiteralValue`] is a closed enum: callers match on every shape
//! and never coerce implicitly.

use std::fmt;
use std::str::FromStr;

/// The tag of a [`LiteralValue`], also the syntactic kind of a raw literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Float,
    Int,
    Text,
    Bool,
    Null,
}

impl Kind {
    pub const ALL: [Kind; 5] = [Kind::Float, Kind::Int, Kind::Text, Kind::Bool, Kind::Null];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Float => "float",
            Kind::Int => "int",
            Kind::Text => "text",
            Kind::Bool => "bool",
            Kind::Null => "null",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a kind name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kind {0:?} (expected float, int, text, bool or null)")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "float" | "real" => Ok(Kind::Float),
            "int" | "integer" => Ok(Kind::Int),
            "text" | "str" | "string" => Ok(Kind::Text),
            "bool" | "boolean" => Ok(Kind::Bool),
            "null" | "none" => Ok(Kind::Null),
            _ => Err(UnknownKind(s.to_owned())),
        }
    }
}

/// A decoded script literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Float(f64),
    Int(i64),
    Text(String),
    Bool(bool),
    Null,
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Float(x) => {
                // Keep a fractional part so floats never read back as ints.
                if x.fract() == 0.0 && x.abs() < 1e15 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{x}")
                }
            }
            LiteralValue::Int(n) => write!(f, "{n}"),
            LiteralValue::Text(s) => f.write_str(s),
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Null => f.write_str("null"),
        }
    }
}

impl LiteralValue {
    pub fn kind(&self) -> Kind {
        match self {
            LiteralValue::Float(_) => Kind::Float,
            LiteralValue::Int(_) => Kind::Int,
            LiteralValue::Text(_) => Kind::Text,
            LiteralValue::Bool(_) => Kind::Bool,
            LiteralValue::Null => Kind::Null,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            LiteralValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            LiteralValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            LiteralValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LiteralValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, LiteralValue::Null)
    }

    /// Take the string out of a `Text` value.
    pub fn into_text(self) -> Option<String> {
        match self {
            LiteralValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for LiteralValue {
    fn from(n: i64) -> Self {
        LiteralValue::Int(n)
    }
}

impl From<f64> for LiteralValue {
    fn from(x: f64) -> Self {
        LiteralValue::Float(x)
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::Text(s)
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::Text(s.to_owned())
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Bool(b)
    }
}

impl<T: Into<LiteralValue>> From<Option<T>> for LiteralValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(LiteralValue::Null, Into::into)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
