//! The grid model: schema and configuration snapshot of one view, plus the
//! viewport data fetcher the grid widget draws from.
//!
//! Fetching is split into explicit messages so a caller can drop stale
//! responses:
//! 1. [`GridModel::request`] stamps a window with a new generation
//! 2. [`GridModel::fetch_window`] runs the (single) engine query and reshapes it
//! 3. [`GridModel::accept`] applies the result only if no newer request exists

use std::sync::Arc;

use crate::engine::{TableSource, ViewEngine};
use crate::error::Result;
use crate::format::FormatterCache;
use crate::resolve::TypeResolver;
use crate::style::{StyleContext, StyleFlags};
use crate::types::{
    CellMeta, ColumnSlice, RowHeaderLabels, RowLabel, Scalar, Schema, ViewConfig, WindowRequest,
    WindowResult,
};
use crate::{COLUMN_PATH_SEPARATOR, ID_COLUMN, ROW_PATH_COLUMN, TOTAL_LABEL};

#[derive(Debug, Clone)]
pub struct GridModel {
    config: ViewConfig,
    /// Source-table schema merged with the computed-column schema.
    table_schema: Schema,
    /// View schema merged with the view's computed-column schema.
    view_schema: Schema,
    /// Leaf column paths, reserved columns removed.
    column_paths: Vec<String>,
    num_rows: usize,
    num_columns: usize,
    formatters: Arc<FormatterCache>,
    generation: u64,
    /// Row identities of the last accepted window, starting at `ids_y0`.
    ids: Vec<Vec<Scalar>>,
    ids_y0: usize,
}

impl GridModel {
    /// Load everything the grid needs from `table` and `view`.
    pub async fn create<T, V>(table: &T, view: &V, formatters: Arc<FormatterCache>) -> Result<Self>
    where
        T: TableSource + ?Sized,
        V: ViewEngine + ?Sized,
    {
        let config = view.get_config().await?;
        let (
            table_schema,
            table_computed_schema,
            num_rows,
            num_columns,
            view_schema,
            view_computed_schema,
            column_paths,
        ) = futures_util::try_join!(
            table.schema(),
            table.computed_schema(&config.computed_columns),
            view.num_rows(),
            view.num_columns(),
            view.schema(),
            view.computed_schema(),
            view.column_paths(),
        )?;

        let mut model = Self::from_parts(
            config,
            table_schema.merged(table_computed_schema),
            view_schema.merged(view_computed_schema),
            column_paths,
            num_rows,
            formatters,
        );
        model.num_columns = num_columns;
        log::debug!(
            "grid model: {} rows, {} leaf columns, {} row pivots",
            model.num_rows,
            model.column_paths.len(),
            model.config.row_pivots.len()
        );
        Ok(model)
    }

    /// Assemble a model from already-merged schemas.
    pub fn from_parts(
        config: ViewConfig,
        table_schema: Schema,
        view_schema: Schema,
        column_paths: Vec<String>,
        num_rows: usize,
        formatters: Arc<FormatterCache>,
    ) -> Self {
        let column_paths: Vec<String> = column_paths
            .into_iter()
            .filter(|path| path != ROW_PATH_COLUMN && path != ID_COLUMN)
            .collect();
        Self {
            config,
            table_schema,
            view_schema,
            num_columns: column_paths.len(),
            column_paths,
            num_rows,
            formatters,
            generation: 0,
            ids: Vec::new(),
            ids_y0: 0,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn table_schema(&self) -> &Schema {
        &self.table_schema
    }

    pub fn view_schema(&self) -> &Schema {
        &self.view_schema
    }

    pub fn column_paths(&self) -> &[String] {
        &self.column_paths
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Column count as last reported by the view engine.
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn formatters(&self) -> &Arc<FormatterCache> {
        &self.formatters
    }

    /// Generation of the most recently issued window request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the configuration snapshot, e.g. after a sort was applied.
    pub fn set_config(&mut self, config: ViewConfig) {
        self.config = config;
    }

    pub fn set_counts(&mut self, num_rows: usize, num_columns: usize) {
        self.num_rows = num_rows;
        self.num_columns = num_columns;
    }

    /// Re-read row and column counts after the view changed shape.
    pub async fn refresh_counts<V: ViewEngine + ?Sized>(&mut self, view: &V) -> Result<()> {
        let (num_rows, num_columns) = futures_util::try_join!(view.num_rows(), view.num_columns())?;
        self.set_counts(num_rows, num_columns);
        Ok(())
    }

    /// Re-read the view configuration.
    pub async fn refresh_config<V: ViewEngine + ?Sized>(&mut self, view: &V) -> Result<()> {
        self.config = view.get_config().await?;
        Ok(())
    }

    pub fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(
            &self.column_paths,
            &self.config.row_pivots,
            &self.view_schema,
            &self.table_schema,
        )
    }

    pub fn style_context(&self) -> StyleContext<'_> {
        StyleContext::new(&self.config, self.resolver())
    }

    /// Style toggles for one rendered cell; see [`StyleContext::cell_style`].
    pub fn cell_style(&self, meta: &CellMeta, next_row_header: Option<&[Option<String>]>) -> StyleFlags {
        self.style_context().cell_style(meta, next_row_header)
    }

    /// Display string for `value` in the column named by the last of
    /// `path_segments`.
    pub fn format<S: AsRef<str>>(&self, path_segments: &[S], value: &Scalar, use_table_schema: bool) -> String {
        let title = path_segments.last().map(AsRef::as_ref);
        let ty = self.resolver().value_type(title, use_table_schema);
        self.formatters.format(ty, value)
    }

    /// Stamp a new window request; any older in-flight request becomes stale.
    pub fn request(&mut self, x0: usize, y0: usize, x1: usize, y1: usize) -> WindowRequest {
        self.generation = self.generation.wrapping_add(1);
        WindowRequest {
            generation: self.generation,
            x0,
            y0,
            x1,
            y1,
        }
    }

    /// Run the window query (unless the window is empty) and reshape it.
    pub async fn fetch_window<V: ViewEngine + ?Sized>(
        &self,
        view: &V,
        request: &WindowRequest,
    ) -> Result<WindowResult> {
        let slice = query_window(view, request).await?;
        Ok(self.assemble(request, slice))
    }

    /// Reshape an engine answer into the grid's window result.
    ///
    /// Every requested leaf column yields exactly `y1 - y0` formatted values;
    /// columns missing from `slice` are null-filled.
    pub fn assemble(&self, request: &WindowRequest, slice: ColumnSlice) -> WindowResult {
        let ColumnSlice {
            row_paths,
            ids,
            mut columns,
        } = slice;
        let rows = request.num_rows();
        let end = request.x1.min(self.column_paths.len());
        let paths = self
            .column_paths
            .get(request.x0..end)
            .unwrap_or_default();

        let resolver = self.resolver();
        let mut data = Vec::with_capacity(paths.len());
        let mut column_headers = Vec::with_capacity(paths.len());
        for path in paths {
            let parts: Vec<String> = path
                .split(COLUMN_PATH_SEPARATOR)
                .map(str::to_string)
                .collect();

            let mut values = columns.remove(path.as_str()).unwrap_or_else(|| {
                if !request.is_empty() {
                    log::debug!("column {path:?} absent from window, null-filled");
                }
                Vec::new()
            });
            values.resize(rows, Scalar::Null);

            let ty = resolver.value_type(parts.last().map(String::as_str), false);
            let formatter = self.formatters.get(ty);
            data.push(
                values
                    .iter()
                    .map(|value| formatter.render(value))
                    .collect(),
            );
            column_headers.push(parts);
        }

        WindowResult {
            generation: request.generation,
            y0: request.y0,
            num_rows: self.num_rows,
            num_columns: self.column_paths.len(),
            row_headers: self.tree_headers(row_paths.unwrap_or_default()),
            column_headers,
            data,
            ids: (!request.is_empty()).then(|| ids.unwrap_or_default()),
        }
    }

    /// Apply a window result if it answers the latest request.
    ///
    /// Returns `None` for stale results, which the caller should drop.
    pub fn accept(&mut self, result: WindowResult) -> Option<WindowResult> {
        if result.generation != self.generation {
            log::debug!(
                "discarding stale window #{} (latest #{})",
                result.generation,
                self.generation
            );
            return None;
        }
        // Empty windows keep the identities of the last real query.
        if let Some(ids) = &result.ids {
            self.ids.clone_from(ids);
            self.ids_y0 = result.y0;
        }
        Some(result)
    }

    /// Request, fetch and accept one window.
    pub async fn data_listener<V: ViewEngine + ?Sized>(
        &mut self,
        view: &V,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
    ) -> Result<Option<WindowResult>> {
        let request = self.request(x0, y0, x1, y1);
        let result = self.fetch_window(view, &request).await?;
        Ok(self.accept(result))
    }

    /// Row identity of data row `y`, if it was part of the last accepted window.
    pub fn row_id(&self, y: usize) -> Option<&[Scalar]> {
        let offset = y.checked_sub(self.ids_y0)?;
        self.ids.get(offset).map(Vec::as_slice)
    }

    /// Tree-shaped row headers for the row paths of one window.
    ///
    /// A row at depth `d` shows `d` blank ancestors, then its own label, then
    /// padding up to `row_pivots.len() + 1` slots.
    pub fn tree_headers(&self, row_paths: Vec<Vec<Scalar>>) -> Vec<RowHeaderLabels> {
        let width = self.config.row_pivots.len() + 1;
        let resolver = self.resolver();
        row_paths
            .into_iter()
            .map(|path| {
                let depth = path.len();
                let value = path
                    .into_iter()
                    .last()
                    .unwrap_or_else(|| Scalar::from(TOTAL_LABEL));
                let pivot = depth
                    .checked_sub(1)
                    .and_then(|level| self.config.row_pivots.get(level));
                let ty = resolver.value_type(pivot.map(String::as_str), true);
                let label = RowLabel::deferred(value, self.formatters.get(ty));

                let mut header: RowHeaderLabels = std::iter::repeat_with(|| Some(RowLabel::blank()))
                    .take(depth)
                    .collect();
                header.push(Some(label));
                header.resize(width, None);
                header
            })
            .collect()
    }
}

/// Run the engine query for `request`; empty windows never reach the engine.
pub async fn query_window<V: ViewEngine + ?Sized>(view: &V, request: &WindowRequest) -> Result<ColumnSlice> {
    let Some(query) = request.query() else {
        return Ok(ColumnSlice::default());
    };
    log::debug!(
        "fetch window #{}: cols {}..{}, rows {}..{}",
        request.generation,
        query.start_col,
        query.end_col,
        query.start_row,
        query.end_row
    );
    view.to_columns(&query).await
}
