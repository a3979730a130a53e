//! The query surface consumed from the view engine and the source table.
//!
//! Both are external collaborators. Every call is asynchronous and failures
//! are surfaced as [`GridError::Engine`](crate::GridError::Engine); nothing here
//! retries.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ColumnSlice, CsvOptions, Schema, ViewConfig, WindowQuery};

/// A (possibly pivoted) view over a table.
#[async_trait(?Send)]
pub trait ViewEngine {
    async fn get_config(&self) -> Result<ViewConfig>;

    /// Post-pivot column types.
    async fn schema(&self) -> Result<Schema>;

    /// Types of the view's computed columns.
    async fn computed_schema(&self) -> Result<Schema>;

    async fn num_rows(&self) -> Result<usize>;

    async fn num_columns(&self) -> Result<usize>;

    /// Every column path of the result, `|`-separated, including the
    /// reserved `__ROW_PATH__`/`__ID__` entries when the engine reports them.
    async fn column_paths(&self) -> Result<Vec<String>>;

    /// Fetch one rectangular window of the result.
    async fn to_columns(&self, query: &WindowQuery) -> Result<ColumnSlice>;

    /// Expand or collapse every row to `depth`.
    async fn set_depth(&self, depth: usize) -> Result<()>;

    /// Collapse the row at data index `row`.
    async fn collapse(&self, row: usize) -> Result<()>;

    /// Expand the row at data index `row`.
    async fn expand(&self, row: usize) -> Result<()>;

    /// The whole result as CSV text.
    async fn to_csv(&self, options: &CsvOptions) -> Result<String>;
}

/// The source table a view was created from.
#[async_trait(?Send)]
pub trait TableSource {
    /// Pre-pivot column types.
    async fn schema(&self) -> Result<Schema>;

    /// Types of `computed_columns` evaluated against this table.
    async fn computed_schema(&self, computed_columns: &[serde_json::Value]) -> Result<Schema>;

    /// CSV of every column, unpivoted, through a temporary view that is
    /// released afterwards.
    async fn to_flat_csv(&self, options: &CsvOptions) -> Result<String>;
}
