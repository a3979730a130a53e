//! Structured error types for pivotgrid.
//!
//! Failures of the view engine or table are not recovered here; they are
//! wrapped and propagated to the grid widget's draw cycle.

/// All errors that can occur while adapting a view to the grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A view-engine or table call failed.
    #[error("View engine: {0}")]
    Engine(String),

    /// The engine answered with a payload of the wrong shape.
    #[error("Malformed engine payload: {0}")]
    Decode(String),

    /// JSON configuration could not be parsed.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is out of range or unsupported.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The browser environment is missing something the grid needs.
    #[error("DOM: {0}")]
    Dom(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Engine(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Engine(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for GridError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Engine(
            value
                .as_string()
                .unwrap_or_else(|| format!("{value:?}")),
        )
    }
}

#[cfg(target_arch = "wasm32")]
impl From<serde_wasm_bindgen::Error> for GridError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
