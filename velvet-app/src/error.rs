//! Errors surfaced to JavaScript callers.

use thiserror::Error;
use velvet_core::VelvetError;
use wasm_bindgen::JsValue;

/// Failures mounting or driving the app.
#[derive(Debug, Error)]
pub enum AppError {
    /// Not running in a window context.
    #[error("No window object")]
    NoWindow,

    /// The window has no document.
    #[error("No document object")]
    NoDocument,

    /// Core failure (config, routes, DOM mutation).
    #[error(transparent)]
    Velvet(#[from] VelvetError),
}

impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
