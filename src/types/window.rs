//! Window request/response types exchanged with the view engine and the grid.

use serde::{Deserialize, Serialize, Serializer};
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::Scalar;
use crate::format::CachedFormatter;
use crate::NULL_PLACEHOLDER;

/// Options for one windowed `to_columns` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowQuery {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
    /// Request row identities (`__ID__`) alongside values.
    pub id: bool,
}

/// Options for a CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CsvOptions {
    /// Render values through the view's formatters rather than raw.
    pub formatted: bool,
}

/// Columnar answer to a [`WindowQuery`].
///
/// Columns are keyed by their full column path. Columns the engine dropped
/// (e.g. computed columns still being evaluated) are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ColumnSlice {
    #[serde(rename = "__ROW_PATH__", default)]
    pub row_paths: Option<Vec<Vec<Scalar>>>,
    #[serde(rename = "__ID__", default)]
    pub ids: Option<Vec<Vec<Scalar>>>,
    #[serde(flatten)]
    pub columns: HashMap<String, Vec<Scalar>>,
}

/// A window the grid asked for, stamped with the generation it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRequest {
    pub generation: u64,
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl WindowRequest {
    /// A window with no columns or no rows never reaches the engine.
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Rows per column in the result.
    pub fn num_rows(&self) -> usize {
        self.y1.saturating_sub(self.y0)
    }

    pub fn query(&self) -> Option<WindowQuery> {
        if self.is_empty() {
            return None;
        }
        Some(WindowQuery {
            start_row: self.y0,
            start_col: self.x0,
            end_row: self.y1,
            end_col: self.x1,
            id: true,
        })
    }
}

/// One row-header label, formatted on first read.
#[derive(Clone)]
pub struct RowLabel {
    value: Scalar,
    formatter: Option<Arc<CachedFormatter>>,
    text: OnceCell<String>,
}

impl RowLabel {
    /// A blanked ancestor segment.
    pub fn blank() -> Self {
        Self {
            value: Scalar::Str(String::new()),
            formatter: None,
            text: OnceCell::new(),
        }
    }

    pub(crate) fn deferred(value: Scalar, formatter: Arc<CachedFormatter>) -> Self {
        Self {
            value,
            formatter: Some(formatter),
            text: OnceCell::new(),
        }
    }

    /// Raw, unformatted value.
    pub fn value(&self) -> &Scalar {
        &self.value
    }

    /// Display text; runs the formatter the first time only.
    pub fn as_str(&self) -> &str {
        self.text.get_or_init(|| {
            if self.value.is_null() {
                return NULL_PLACEHOLDER.to_string();
            }
            match &self.formatter {
                Some(formatter) => formatter.apply(&self.value),
                None => self.value.to_string(),
            }
        })
    }

    /// Whether the label has been rendered yet.
    pub fn is_rendered(&self) -> bool {
        self.text.get().is_some()
    }

    /// Whether reading the label would still run a formatter.
    pub fn is_pending(&self) -> bool {
        self.formatter.is_some() && !self.is_rendered()
    }
}

impl fmt::Debug for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowLabel")
            .field("value", &self.value)
            .field("text", &self.text.get())
            .finish()
    }
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq for RowLabel {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for RowLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A rendered row header: `row_pivots.len() + 1` slots, `None` past the
/// row's depth.
pub type RowHeaderLabels = Vec<Option<RowLabel>>;

/// Everything the grid needs to paint one window.
#[derive(Debug, Clone, Serialize)]
pub struct WindowResult {
    #[serde(skip)]
    pub generation: u64,
    #[serde(skip)]
    pub y0: usize,
    pub num_rows: usize,
    pub num_columns: usize,
    pub row_headers: Vec<RowHeaderLabels>,
    /// Column paths split into segments, unformatted.
    pub column_headers: Vec<Vec<String>>,
    /// Formatted values, one inner vector per column.
    pub data: Vec<Vec<String>>,
    /// Row identities, `None` when the window was empty and never queried.
    #[serde(skip)]
    pub ids: Option<Vec<Vec<Scalar>>>,
}
