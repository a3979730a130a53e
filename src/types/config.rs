use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a sort term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDir {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
    /// Sorts column groups; only valid with column pivots.
    #[serde(rename = "col asc")]
    ColAsc,
    /// Sorts column groups; only valid with column pivots.
    #[serde(rename = "col desc")]
    ColDesc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
            Self::ColAsc => "col asc",
            Self::ColDesc => "col desc",
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(column, direction)` entry of a sort list.
///
/// Serialized as a two-element array, e.g. `["Sales", "desc"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, SortDir)", into = "(String, SortDir)")]
pub struct SortTerm {
    pub column: String,
    pub dir: SortDir,
}

impl SortTerm {
    pub fn new(column: impl Into<String>, dir: SortDir) -> Self {
        Self {
            column: column.into(),
            dir,
        }
    }
}

impl From<(String, SortDir)> for SortTerm {
    fn from((column, dir): (String, SortDir)) -> Self {
        Self { column, dir }
    }
}

impl From<SortTerm> for (String, SortDir) {
    fn from(term: SortTerm) -> Self {
        (term.column, term.dir)
    }
}

/// Ordered sort specification, unique by column.
pub type SortList = Vec<SortTerm>;

/// Snapshot of the view configuration for one draw.
///
/// Replaced wholesale whenever the engine applies a sort, expand or collapse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub row_pivots: Vec<String>,
    #[serde(default)]
    pub column_pivots: Vec<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub sort: SortList,
    /// Opaque computed-column definitions, handed back to the table verbatim.
    #[serde(default)]
    pub computed_columns: Vec<serde_json::Value>,
}

impl ViewConfig {
    /// Column-axis sorting is only offered when column pivots are active.
    pub fn has_column_pivots(&self) -> bool {
        !self.column_pivots.is_empty()
    }

    /// Sort term for `column`, if any.
    pub fn sort_for(&self, column: &str) -> Option<&SortTerm> {
        self.sort.iter().find(|term| term.column == column)
    }
}
