//! Browser downloads of CSV exports.

use js_sys::{Array, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::{JsTable, JsView};
use crate::error::GridError;
use crate::export::{export_csv, export_flat_csv, CSV_FILE_NAME};

/// Download `view` as a formatted CSV.
#[wasm_bindgen]
pub fn download(view: &JsView) -> Promise {
    let view = view.clone();
    future_to_promise(async move {
        let csv = export_csv(&view).await?;
        save_csv(&csv)?;
        Ok(JsValue::UNDEFINED)
    })
}

/// Download every column of `table`, unpivoted, as a formatted CSV.
#[wasm_bindgen]
pub fn download_flat(table: &JsTable) -> Promise {
    let table = table.clone();
    future_to_promise(async move {
        let csv = export_flat_csv(&table).await?;
        save_csv(&csv)?;
        Ok(JsValue::UNDEFINED)
    })
}

/// Hand `csv` to the browser through a hidden, clicked anchor.
fn save_csv(csv: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| GridError::Dom("no document".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| GridError::Dom("document has no body".to_string()))?;

    let options = BlobPropertyBag::new();
    options.set_type("text/csv");
    let blob = Blob::new_with_str_sequence_and_options(&Array::of1(&JsValue::from_str(csv)), &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.unchecked_into();
    anchor.set_download(CSV_FILE_NAME);
    anchor.set_href(&url);
    anchor.style().set_property("display", "none")?;
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Url::revoke_object_url(&url)?;
    Ok(())
}
