//! Mouse handling for the grid element.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CustomEvent, CustomEventInit, Element, EventTarget, MouseEvent};

use super::{DatagridModel, JsView};
use crate::engine::ViewEngine;
use crate::error::Result;
use crate::gesture::{classify, Gesture};
use crate::model::GridModel;
use crate::style::StyleFlags;
use crate::tree::TreeCommand;
use crate::types::{CellMeta, SortList};

/// Event announcing a requested sort change; `detail.sort` holds the list.
pub const SORT_EVENT: &str = "regular-table-psp-sort";

/// Style flags as currently applied to `element`.
pub(crate) fn element_flags(element: &Element) -> StyleFlags {
    let classes = element.class_list();
    StyleFlags::from_class_names((0..classes.length()).filter_map(|i| classes.item(i)))
}

#[wasm_bindgen]
impl DatagridModel {
    /// Handle a `mousedown` on the grid.
    ///
    /// `meta` is the widget's metadata for the pressed cell. Returns whether
    /// the press was consumed; tree transitions finish asynchronously and
    /// trigger the redraw callback.
    #[wasm_bindgen]
    pub fn mousedown(
        &self,
        view: JsView,
        grid: EventTarget,
        event: MouseEvent,
        meta: JsValue,
    ) -> std::result::Result<bool, JsValue> {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return Ok(false);
        };
        let meta: CellMeta = serde_wasm_bindgen::from_value(meta)?;
        let flags = element_flags(&target);
        let Some(gesture) = classify(&meta, &flags, f64::from(event.offset_x()), event.shift_key())
        else {
            return Ok(false);
        };
        let _ = Reflect::set(event.as_ref(), &"handled".into(), &JsValue::TRUE);

        match gesture {
            Gesture::Sort { column, mode } => {
                let sort = self.state.borrow().next_sort(&column, mode);
                dispatch_sort(&grid, &sort)?;
            }
            Gesture::Tree(command) => {
                let state = Rc::clone(&self.state);
                let callback = self.redraw_callback.borrow().clone();
                spawn_local(async move {
                    match apply_tree(&state, &view, command).await {
                        Ok(()) => invoke_redraw_callback(callback),
                        Err(err) => log::warn!("tree transition failed: {err}"),
                    }
                });
            }
        }
        Ok(true)
    }

    /// Register a JS callback that redraws the grid.
    #[wasm_bindgen]
    pub fn set_redraw_callback(&self, callback: Option<Function>) {
        *self.redraw_callback.borrow_mut() = callback;
    }
}

fn dispatch_sort(grid: &EventTarget, sort: &SortList) -> std::result::Result<(), JsValue> {
    let detail = Object::new();
    Reflect::set(&detail, &"sort".into(), &serde_wasm_bindgen::to_value(sort)?)?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(SORT_EVENT, &init)?;
    grid.dispatch_event(&event)?;
    Ok(())
}

// The engine calls run without a borrow of the model; only the count
// update touches it.
async fn apply_tree(state: &Rc<RefCell<GridModel>>, view: &JsView, command: TreeCommand) -> Result<()> {
    command.apply(view).await?;
    let (num_rows, num_columns) = futures_util::try_join!(view.num_rows(), view.num_columns())?;
    state.borrow_mut().set_counts(num_rows, num_columns);
    Ok(())
}

fn invoke_redraw_callback(callback: Option<Function>) {
    if let Some(callback) = callback {
        let _ = callback.call0(&JsValue::NULL);
    }
}
