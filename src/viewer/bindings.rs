//! JavaScript table and view handles.

use async_trait::async_trait;
use js_sys::{Object, Promise};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::engine::{TableSource, ViewEngine};
use crate::error::{GridError, Result};
use crate::types::{ColumnSlice, CsvOptions, Schema, ViewConfig, WindowQuery};

#[wasm_bindgen]
extern "C" {
    #[derive(Clone)]
    pub type JsTable;

    #[wasm_bindgen(method, catch, js_name = schema)]
    fn js_schema(this: &JsTable) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = computed_schema)]
    fn js_computed_schema(
        this: &JsTable,
        computed_columns: &JsValue,
    ) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = view)]
    fn js_view(this: &JsTable, config: &JsValue) -> std::result::Result<Promise, JsValue>;

    #[derive(Clone)]
    pub type JsView;

    #[wasm_bindgen(method, catch, js_name = get_config)]
    fn js_get_config(this: &JsView) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = schema)]
    fn js_schema(this: &JsView) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = computed_schema)]
    fn js_computed_schema(this: &JsView) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = num_rows)]
    fn js_num_rows(this: &JsView) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = num_columns)]
    fn js_num_columns(this: &JsView) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = column_paths)]
    fn js_column_paths(this: &JsView) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = to_columns)]
    fn js_to_columns(this: &JsView, options: &JsValue) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = set_depth)]
    fn js_set_depth(this: &JsView, depth: u32) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = collapse)]
    fn js_collapse(this: &JsView, row: u32) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = expand)]
    fn js_expand(this: &JsView, row: u32) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = to_csv)]
    fn js_to_csv(this: &JsView, options: &JsValue) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = delete)]
    fn js_delete(this: &JsView) -> std::result::Result<Promise, JsValue>;
}

async fn settle(promise: std::result::Result<Promise, JsValue>) -> Result<JsValue> {
    Ok(JsFuture::from(promise?).await?)
}

async fn decode<T: DeserializeOwned>(promise: std::result::Result<Promise, JsValue>) -> Result<T> {
    let value = settle(promise).await?;
    Ok(serde_wasm_bindgen::from_value(value)?)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
async fn count(promise: std::result::Result<Promise, JsValue>) -> Result<usize> {
    let value = settle(promise).await?;
    match value.as_f64() {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n as usize),
        _ => Err(GridError::Decode(format!("expected a count, got {value:?}"))),
    }
}

async fn text(promise: std::result::Result<Promise, JsValue>) -> Result<String> {
    let value = settle(promise).await?;
    value
        .as_string()
        .ok_or_else(|| GridError::Decode(format!("expected text, got {value:?}")))
}

fn index(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| GridError::Decode(format!("index {value} out of range")))
}

#[async_trait(?Send)]
impl TableSource for JsTable {
    async fn schema(&self) -> Result<Schema> {
        decode(self.js_schema()).await
    }

    async fn computed_schema(&self, computed_columns: &[serde_json::Value]) -> Result<Schema> {
        let columns = computed_columns.serialize(&Serializer::json_compatible())?;
        decode(self.js_computed_schema(&columns)).await
    }

    async fn to_flat_csv(&self, options: &CsvOptions) -> Result<String> {
        let view: JsView = settle(self.js_view(&Object::new())).await?.unchecked_into();
        let csv = view.to_csv(options).await;
        settle(view.js_delete()).await?;
        csv
    }
}

#[async_trait(?Send)]
impl ViewEngine for JsView {
    async fn get_config(&self) -> Result<ViewConfig> {
        decode(self.js_get_config()).await
    }

    async fn schema(&self) -> Result<Schema> {
        decode(self.js_schema()).await
    }

    async fn computed_schema(&self) -> Result<Schema> {
        decode(self.js_computed_schema()).await
    }

    async fn num_rows(&self) -> Result<usize> {
        count(self.js_num_rows()).await
    }

    async fn num_columns(&self) -> Result<usize> {
        count(self.js_num_columns()).await
    }

    async fn column_paths(&self) -> Result<Vec<String>> {
        decode(self.js_column_paths()).await
    }

    async fn to_columns(&self, query: &WindowQuery) -> Result<ColumnSlice> {
        let options = serde_wasm_bindgen::to_value(query)?;
        decode(self.js_to_columns(&options)).await
    }

    async fn set_depth(&self, depth: usize) -> Result<()> {
        settle(self.js_set_depth(index(depth)?)).await.map(drop)
    }

    async fn collapse(&self, row: usize) -> Result<()> {
        settle(self.js_collapse(index(row)?)).await.map(drop)
    }

    async fn expand(&self, row: usize) -> Result<()> {
        settle(self.js_expand(index(row)?)).await.map(drop)
    }

    async fn to_csv(&self, options: &CsvOptions) -> Result<String> {
        let options = serde_wasm_bindgen::to_value(options)?;
        text(self.js_to_csv(&options)).await
    }
}
