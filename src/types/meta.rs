//! Per-cell metadata reported by the grid widget.
//!
//! The widget recomputes these every draw. The boundary adapter resolves each
//! rendered cell into one of the variants below before any sort, tree or style
//! logic sees it.

use serde::{Deserialize, Serialize};

/// A row-header path as rendered: one entry per header column.
///
/// `None` marks a level past the row's real depth; `Some("")` is a blanked
/// ancestor.
pub type RowHeaderPath = Vec<Option<String>>;

/// Number of defined levels of a row-header path.
pub fn defined_depth(row_header: &[Option<String>]) -> usize {
    row_header.iter().filter(|segment| segment.is_some()).count()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellMeta {
    /// A header cell on the innermost (leaf) header row.
    LeafHeader {
        /// Data-column index; `None` for the corner cells above row headers.
        #[serde(default)]
        x: Option<usize>,
        /// Row-header column this cell sits over, for corner cells.
        #[serde(default)]
        row_header_x: Option<usize>,
        /// Pivot path of the column.
        #[serde(default)]
        column_header: Vec<String>,
        #[serde(default)]
        value: String,
    },
    /// A header cell on any header row above the leaf row.
    GroupHeader {
        #[serde(default)]
        x: Option<usize>,
        #[serde(default)]
        row_header_x: Option<usize>,
    },
    /// A row-header (tree label) cell.
    RowHeader {
        /// Data-row index.
        y: usize,
        /// Data-row index of the first rendered row.
        y0: usize,
        row_header_x: usize,
        #[serde(default)]
        row_header: RowHeaderPath,
        #[serde(default)]
        value: String,
    },
    /// A data cell.
    Body {
        x: usize,
        y: usize,
        #[serde(default)]
        value: String,
    },
}

impl CellMeta {
    /// Data-column index, if the cell belongs to a data column.
    pub fn x(&self) -> Option<usize> {
        match self {
            Self::LeafHeader { x, .. } | Self::GroupHeader { x, .. } => *x,
            Self::Body { x, .. } => Some(*x),
            Self::RowHeader { .. } => None,
        }
    }

    /// Row-header column index, if the cell sits in the row-header area.
    pub fn row_header_x(&self) -> Option<usize> {
        match self {
            Self::LeafHeader { row_header_x, .. } | Self::GroupHeader { row_header_x, .. } => {
                *row_header_x
            }
            Self::RowHeader { row_header_x, .. } => Some(*row_header_x),
            Self::Body { .. } => None,
        }
    }

    /// Rendered text of the cell.
    pub fn value(&self) -> &str {
        match self {
            Self::LeafHeader { value, .. }
            | Self::RowHeader { value, .. }
            | Self::Body { value, .. } => value,
            Self::GroupHeader { .. } => "",
        }
    }

    /// Viewport-relative row of a row-header cell.
    pub fn viewport_row(&self) -> Option<usize> {
        match self {
            Self::RowHeader { y, y0, .. } => y.checked_sub(*y0),
            _ => None,
        }
    }
}
