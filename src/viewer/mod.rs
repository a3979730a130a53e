//! `DatagridModel` - the WASM-exported model handed to the grid widget.
//!
//! This module provides:
//! - Model creation from JavaScript table and view handles
//! - The data listener the widget calls for every visible window
//! - Per-cell style decisions
//! - Mouse handling (tree toggles and header sort clicks, see `events`)
//!
//! Cell metadata crosses the boundary as the widget reports it, tagged with
//! a `kind` naming the cell variant (`leaf_header`, `group_header`,
//! `row_header` or `body`).
//!
//! Row-header labels reach the widget as objects whose `toString` formats
//! the label on first call.
//!
//! The model state sits behind `Rc<RefCell<..>>` and is never borrowed
//! across an `.await`, so overlapping listener calls cannot conflict.

mod bindings;
mod download;
mod events;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use js_sys::{Array, Function, Object, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::Element;

pub use bindings::{JsTable, JsView};
pub use download::{download, download_flat};
pub use events::SORT_EVENT;

use crate::engine::ViewEngine;
use crate::format::{FormatterCache, TypeConfigs};
use crate::model::{query_window, GridModel};
use crate::style::StyleFlags;
use crate::types::{CellMeta, RowHeaderLabels, RowHeaderPath, RowLabel, WindowResult};

thread_local! {
    /// Formatter cache shared by every model using the stock type config.
    static SHARED_FORMATTERS: Arc<FormatterCache> = Arc::new(FormatterCache::default());
}

/// The grid model exported to JavaScript
#[wasm_bindgen]
pub struct DatagridModel {
    state: Rc<RefCell<GridModel>>,
    redraw_callback: Rc<RefCell<Option<Function>>>,
}

#[wasm_bindgen]
impl DatagridModel {
    /// Load a model for `view`, created from `table`.
    ///
    /// `type_config` is an optional JSON object overriding the per-type
    /// format options; models without one share a single formatter cache.
    ///
    /// # Errors
    /// Returns an error if any engine call fails or `type_config` is invalid.
    pub async fn create(
        table: JsTable,
        view: JsView,
        type_config: Option<String>,
    ) -> Result<DatagridModel, JsValue> {
        console_error_panic_hook::set_once();

        let formatters = match type_config {
            Some(json) => Arc::new(FormatterCache::new(TypeConfigs::from_json(&json)?)),
            None => SHARED_FORMATTERS.with(Arc::clone),
        };
        let model = GridModel::create(&table, &view, formatters).await?;
        Ok(Self {
            state: Rc::new(RefCell::new(model)),
            redraw_callback: Rc::default(),
        })
    }

    /// Fetch the window `[x0, x1) x [y0, y1)`.
    ///
    /// Resolves to the window result, or `null` when a newer request was
    /// issued while this one was in flight.
    #[wasm_bindgen]
    pub fn data_listener(&self, view: JsView, x0: usize, y0: usize, x1: usize, y1: usize) -> Promise {
        let state = Rc::clone(&self.state);
        future_to_promise(async move {
            let request = state.borrow_mut().request(x0, y0, x1, y1);
            let slice = query_window(&view, &request).await?;
            let result = state.borrow().assemble(&request, slice);
            let accepted = state.borrow_mut().accept(result);
            match accepted {
                Some(result) => window_to_js(result),
                None => Ok(JsValue::NULL),
            }
        })
    }

    /// Class toggles for one cell, as `[class, on]` pairs.
    ///
    /// # Errors
    /// Returns an error if `meta` is not valid cell metadata.
    #[wasm_bindgen]
    pub fn style_classes(&self, meta: JsValue, next_row_header: JsValue) -> Result<JsValue, JsValue> {
        let flags = self.cell_style(meta, next_row_header)?;
        let toggles: Vec<(&str, bool)> = flags
            .toggles()
            .iter()
            .map(|(class, on)| (class.as_str(), *on))
            .collect();
        Ok(toggles.serialize(&serde_wasm_bindgen::Serializer::new())?)
    }

    /// Apply the class toggles for one cell directly to its element.
    ///
    /// # Errors
    /// Returns an error if `meta` is not valid cell metadata.
    #[wasm_bindgen]
    pub fn style_cell(&self, cell: Element, meta: JsValue, next_row_header: JsValue) -> Result<(), JsValue> {
        let flags = self.cell_style(meta, next_row_header)?;
        let classes = cell.class_list();
        for (class, on) in flags.toggles() {
            classes.toggle_with_force(class.as_str(), *on)?;
        }
        Ok(())
    }

    /// Re-read the view configuration, e.g. after a sort was applied.
    #[wasm_bindgen]
    pub fn refresh_config(&self, view: JsView) -> Promise {
        let state = Rc::clone(&self.state);
        future_to_promise(async move {
            let config = view.get_config().await?;
            state.borrow_mut().set_config(config);
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen]
    pub fn num_rows(&self) -> usize {
        self.state.borrow().num_rows()
    }

    #[wasm_bindgen]
    pub fn num_columns(&self) -> usize {
        self.state.borrow().num_columns()
    }

    /// Row identity of data row `y` from the last accepted window.
    #[wasm_bindgen]
    pub fn row_id(&self, y: usize) -> Result<JsValue, JsValue> {
        let state = self.state.borrow();
        Ok(serde_wasm_bindgen::to_value(&state.row_id(y))?)
    }
}

impl DatagridModel {
    fn cell_style(&self, meta: JsValue, next_row_header: JsValue) -> Result<StyleFlags, JsValue> {
        let meta: CellMeta = serde_wasm_bindgen::from_value(meta)?;
        let next: Option<RowHeaderPath> = serde_wasm_bindgen::from_value(next_row_header)?;
        Ok(self.state.borrow().cell_style(&meta, next.as_deref()))
    }
}

/// Convert a window result for the widget, deferring every pending label.
fn window_to_js(mut result: WindowResult) -> Result<JsValue, JsValue> {
    let row_headers = std::mem::take(&mut result.row_headers);
    let value = serde_wasm_bindgen::to_value(&result)?;
    let rows: Array = row_headers.into_iter().map(row_header_to_js).collect();
    Reflect::set(&value, &"row_headers".into(), &rows)?;
    Ok(value)
}

fn row_header_to_js(header: RowHeaderLabels) -> JsValue {
    header
        .into_iter()
        .map(|label| label.map_or(JsValue::NULL, label_to_js))
        .collect::<Array>()
        .into()
}

fn label_to_js(label: RowLabel) -> JsValue {
    if !label.is_pending() {
        return JsValue::from_str(label.as_str());
    }
    let lazy = Object::new();
    let to_string = Closure::<dyn Fn() -> String>::new(move || label.as_str().to_string());
    // Ownership passes to the JS object; the closure is freed with it.
    let _ = Reflect::set(&lazy, &"toString".into(), &to_string.into_js_value());
    lazy.into()
}
