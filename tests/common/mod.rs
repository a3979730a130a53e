//! Common test utilities: an in-memory view engine and source table.
//!
//! `MockView` answers every engine call from plain vectors and records each
//! call, so tests can assert both on results and on what reached the engine.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use pivotgrid::{
    ColumnSlice, CsvOptions, FormatterCache, GridError, GridModel, Result, Scalar, ScalarType, Schema,
    SortDir, SortTerm, TableSource, ViewConfig, ViewEngine, WindowQuery,
};

// ============================================================================
// Engine calls
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetConfig,
    Schema,
    ComputedSchema,
    NumRows,
    NumColumns,
    ColumnPaths,
    ToColumns(WindowQuery),
    SetDepth(usize),
    Collapse(usize),
    Expand(usize),
    ToCsv(CsvOptions),
    TableSchema,
    TableComputedSchema(usize),
    TableToFlatCsv(CsvOptions),
}

// ============================================================================
// MockView
// ============================================================================

#[derive(Debug, Default)]
pub struct MockView {
    pub config: ViewConfig,
    pub schema: Schema,
    pub computed_schema: Schema,
    /// Column paths as the engine reports them, reserved columns included.
    pub column_paths: Vec<String>,
    /// Full-height columns, keyed by column path.
    pub columns: HashMap<String, Vec<Scalar>>,
    /// Full-height row paths; `None` for a view without row pivots.
    pub row_paths: Option<Vec<Vec<Scalar>>>,
    /// Columns the engine leaves out of window answers.
    pub dropped: Vec<String>,
    pub num_rows: Cell<usize>,
    pub num_columns: Cell<usize>,
    /// Row count reported after the next tree transition.
    pub rows_after_transition: Cell<Option<usize>>,
    pub fail_windows: Cell<bool>,
    pub fail_export: Cell<bool>,
    pub calls: RefCell<Vec<Call>>,
}

impl MockView {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Add a leaf column; its type is registered under the last path segment.
    pub fn with_column(mut self, path: &str, ty: ScalarType, values: Vec<Scalar>) -> Self {
        let leaf = path.rsplit('|').next().unwrap_or(path);
        self.schema.insert(leaf, ty);
        self.num_rows.set(values.len());
        self.column_paths.push(path.to_string());
        self.columns.insert(path.to_string(), values);
        self.num_columns.set(self.columns.len());
        self
    }

    pub fn with_row_paths(mut self, row_paths: Vec<Vec<Scalar>>) -> Self {
        self.column_paths.insert(0, "__ROW_PATH__".to_string());
        self.num_rows.set(row_paths.len());
        self.row_paths = Some(row_paths);
        self
    }

    pub fn dropping(mut self, path: &str) -> Self {
        self.dropped.push(path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn window_queries(&self) -> Vec<WindowQuery> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::ToColumns(query) => Some(*query),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn leaf_paths(&self) -> Vec<&String> {
        self.column_paths
            .iter()
            .filter(|path| !path.starts_with("__"))
            .collect()
    }

    fn transition(&self) {
        if let Some(rows) = self.rows_after_transition.take() {
            self.num_rows.set(rows);
        }
    }
}

fn slice_rows<T: Clone>(values: &[T], query: &WindowQuery) -> Vec<T> {
    let end = query.end_row.min(values.len());
    values
        .get(query.start_row.min(end)..end)
        .unwrap_or_default()
        .to_vec()
}

#[async_trait(?Send)]
impl ViewEngine for MockView {
    async fn get_config(&self) -> Result<ViewConfig> {
        self.record(Call::GetConfig);
        Ok(self.config.clone())
    }

    async fn schema(&self) -> Result<Schema> {
        self.record(Call::Schema);
        Ok(self.schema.clone())
    }

    async fn computed_schema(&self) -> Result<Schema> {
        self.record(Call::ComputedSchema);
        Ok(self.computed_schema.clone())
    }

    async fn num_rows(&self) -> Result<usize> {
        self.record(Call::NumRows);
        Ok(self.num_rows.get())
    }

    async fn num_columns(&self) -> Result<usize> {
        self.record(Call::NumColumns);
        Ok(self.num_columns.get())
    }

    async fn column_paths(&self) -> Result<Vec<String>> {
        self.record(Call::ColumnPaths);
        Ok(self.column_paths.clone())
    }

    async fn to_columns(&self, query: &WindowQuery) -> Result<ColumnSlice> {
        self.record(Call::ToColumns(*query));
        if self.fail_windows.get() {
            return Err(GridError::Engine("view was deleted".to_string()));
        }

        let leaves = self.leaf_paths();
        let end_col = query.end_col.min(leaves.len());
        let mut columns = HashMap::new();
        for path in leaves.get(query.start_col.min(end_col)..end_col).unwrap_or_default() {
            if self.dropped.contains(*path) {
                continue;
            }
            if let Some(values) = self.columns.get(*path) {
                columns.insert((*path).clone(), slice_rows(values, query));
            }
        }

        let ids = query.id.then(|| {
            (query.start_row..query.end_row.min(self.num_rows.get()))
                .map(|y| vec![Scalar::Int(i64::try_from(y).unwrap())])
                .collect()
        });
        Ok(ColumnSlice {
            row_paths: self.row_paths.as_ref().map(|paths| slice_rows(paths, query)),
            ids,
            columns,
        })
    }

    async fn set_depth(&self, depth: usize) -> Result<()> {
        self.record(Call::SetDepth(depth));
        self.transition();
        Ok(())
    }

    async fn collapse(&self, row: usize) -> Result<()> {
        self.record(Call::Collapse(row));
        self.transition();
        Ok(())
    }

    async fn expand(&self, row: usize) -> Result<()> {
        self.record(Call::Expand(row));
        self.transition();
        Ok(())
    }

    async fn to_csv(&self, options: &CsvOptions) -> Result<String> {
        self.record(Call::ToCsv(*options));
        if self.fail_export.get() {
            return Err(GridError::Engine("view was deleted".to_string()));
        }

        let leaves = self.leaf_paths();
        let mut lines = vec![leaves
            .iter()
            .map(|path| path.as_str())
            .collect::<Vec<_>>()
            .join(",")];
        for y in 0..self.num_rows.get() {
            let row: Vec<String> = leaves
                .iter()
                .map(|path| match self.columns.get(*path).and_then(|c| c.get(y)) {
                    Some(Scalar::Null) | None => String::new(),
                    Some(value) => value.to_string(),
                })
                .collect();
            lines.push(row.join(","));
        }
        Ok(lines.join("\n"))
    }
}

// ============================================================================
// MockTable
// ============================================================================

#[derive(Debug, Default)]
pub struct MockTable {
    pub schema: Schema,
    pub computed_schema: Schema,
    /// Answer to a flat CSV export.
    pub flat_csv: String,
    pub calls: RefCell<Vec<Call>>,
}

impl MockTable {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }
}

#[async_trait(?Send)]
impl TableSource for MockTable {
    async fn schema(&self) -> Result<Schema> {
        self.calls.borrow_mut().push(Call::TableSchema);
        Ok(self.schema.clone())
    }

    async fn computed_schema(&self, computed_columns: &[serde_json::Value]) -> Result<Schema> {
        self.calls
            .borrow_mut()
            .push(Call::TableComputedSchema(computed_columns.len()));
        Ok(self.computed_schema.clone())
    }

    async fn to_flat_csv(&self, options: &CsvOptions) -> Result<String> {
        self.calls.borrow_mut().push(Call::TableToFlatCsv(*options));
        Ok(self.flat_csv.clone())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn config(row_pivots: &[&str], column_pivots: &[&str], columns: &[&str]) -> ViewConfig {
    let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
    ViewConfig {
        row_pivots: owned(row_pivots),
        column_pivots: owned(column_pivots),
        columns: owned(columns),
        ..ViewConfig::default()
    }
}

pub fn sort(terms: &[(&str, SortDir)]) -> Vec<SortTerm> {
    terms
        .iter()
        .map(|(column, dir)| SortTerm::new(*column, *dir))
        .collect()
}

pub fn sales_table() -> MockTable {
    MockTable::new(
        [
            ("Region", ScalarType::String),
            ("City", ScalarType::String),
            ("Year", ScalarType::Integer),
            ("Sales", ScalarType::Float),
            ("Units", ScalarType::Integer),
            ("Date", ScalarType::Date),
        ]
        .into_iter()
        .collect(),
    )
}

/// Flat view: `Sales` and `Units`, three rows, no pivots.
pub fn flat_view() -> MockView {
    MockView::new(config(&[], &[], &["Sales", "Units"]))
        .with_column(
            "Sales",
            ScalarType::Float,
            vec![Scalar::Float(1234.5), Scalar::Float(-2.0), Scalar::Null],
        )
        .with_column(
            "Units",
            ScalarType::Integer,
            vec![Scalar::Int(12), Scalar::Int(0), Scalar::Int(-7000)],
        )
}

/// Pivoted view: rows by `Region` then `City`, fully expanded.
pub fn region_city_view() -> MockView {
    let path = |segments: &[&str]| segments.iter().map(|s| Scalar::from(*s)).collect();
    MockView::new(config(&["Region", "City"], &[], &["Sales"]))
        .with_column(
            "Sales",
            ScalarType::Float,
            vec![
                Scalar::Float(100.0),
                Scalar::Float(60.0),
                Scalar::Float(60.0),
                Scalar::Float(40.0),
                Scalar::Float(40.0),
            ],
        )
        .with_row_paths(vec![
            path(&[]),
            path(&["Europe"]),
            path(&["Europe", "Paris"]),
            path(&["Asia"]),
            path(&["Asia", "Tokyo"]),
        ])
}

pub async fn create(table: &MockTable, view: &MockView) -> GridModel {
    GridModel::create(table, view, Arc::new(FormatterCache::default()))
        .await
        .unwrap()
}
