use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value as returned by the view engine.
///
/// Dates and datetimes arrive as epoch milliseconds, so they are carried as
/// `Int` or `Float` and only become dates once a formatter is applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value, if it has one.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_column() {
        let values: Vec<Scalar> =
            serde_json::from_str(r#"[null, 1, 2.5, "x", true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Scalar::Null,
                Scalar::Int(1),
                Scalar::Float(2.5),
                Scalar::Str("x".to_string()),
                Scalar::Bool(true),
            ]
        );
    }

    #[test]
    fn test_display_passthrough() {
        assert_eq!(Scalar::Int(42).to_string(), "42");
        assert_eq!(Scalar::from("Europe").to_string(), "Europe");
        assert_eq!(Scalar::Bool(false).to_string(), "false");
    }
}
