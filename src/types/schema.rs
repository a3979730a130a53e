use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Declared scalar type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Integer,
    Float,
    String,
    Boolean,
    Date,
    Datetime,
    /// Any type name this crate does not know how to format.
    #[serde(other)]
    Unknown,
}

impl ScalarType {
    /// Numeric types are right-aligned and sign-colored.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column name to scalar type mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(HashMap<String, ScalarType>);

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<ScalarType> {
        self.0.get(column).copied()
    }

    pub fn insert(&mut self, column: impl Into<String>, ty: ScalarType) {
        self.0.insert(column.into(), ty);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Union of `self` and `overlay`; overlay entries shadow same-named ones.
    #[must_use]
    pub fn merged(mut self, overlay: Schema) -> Self {
        self.0.extend(overlay.0);
        self
    }
}

impl<K: Into<String>> FromIterator<(K, ScalarType)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, ScalarType)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
