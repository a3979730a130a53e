//! pivotgrid - pivoted views on a virtualized grid
//!
//! Adapts a (possibly pivoted) analytical view to a virtualized grid widget:
//! - Windowed data fetching with stale-response suppression
//! - Tree-shaped row headers with lazy label formatting
//! - Type-aware en-us value formatting with a shared formatter cache
//! - Header-click sort cycling and row-tree expand/collapse
//! - Per-cell style decisions (alignment, sign, sort and tree classes)
//! - Formatted CSV export of the view or the flat table
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { DatagridModel } from 'pivotgrid';
//! await init();
//! const model = await DatagridModel.create(table, view);
//! grid.setDataListener((x0, y0, x1, y1) => model.data_listener(view, x0, y0, x1, y1));
//! ```

pub mod engine;
pub mod error;
pub mod export;
pub mod format;
pub mod gesture;
pub mod model;
pub mod resolve;
pub mod sort;
pub mod style;
pub mod tree;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use engine::{TableSource, ViewEngine};
pub use error::{GridError, Result};
pub use export::{export_csv, export_flat_csv, CSV_FILE_NAME};
pub use format::{FormatterCache, TypeConfigs};
pub use gesture::{classify, Gesture, GestureOutcome};
pub use model::GridModel;
pub use style::{StyleClass, StyleFlags};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use viewer::DatagridModel;

/// Separator between the segments of a column path.
pub const COLUMN_PATH_SEPARATOR: char = '|';

/// Label of the grand-total row.
pub const TOTAL_LABEL: &str = "TOTAL";

/// Display text for `null`.
pub const NULL_PLACEHOLDER: &str = "-";

/// Reserved column carrying each row's group path.
pub const ROW_PATH_COLUMN: &str = "__ROW_PATH__";

/// Reserved column carrying each row's identity.
pub const ID_COLUMN: &str = "__ID__";

/// Locale of every formatter.
pub const LOCALE: &str = "en-us";

/// Width in CSS pixels of the expand/collapse hit area at the left edge of a
/// tree label.
pub const TREE_TOGGLE_WIDTH: f64 = 26.0;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
