//! Template renderer port.
//!
//! A page is rendered from a template name and a flat key-value payload. The
//! key set is the only contract between handlers and the renderer:
//! `Title`, `Error` and `Notice` are common to every page, the rest are
//! route specific (see [`keys`]).

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Payload keys shared by handlers and renderers.
pub mod keys {
    pub const TITLE: &str = "Title";
    pub const ERROR: &str = "Error";
    pub const NOTICE: &str = "Notice";
    pub const USERNAME: &str = "Username";
    pub const DATASETS: &str = "Datasets";
    pub const MODELS: &str = "Models";
    pub const MODEL: &str = "Model";
    pub const RESULT: &str = "Result";
    pub const PREDICTIONS: &str = "Predictions";
    pub const PAGE: &str = "Page";
    pub const PREVIEW: &str = "Preview";
    pub const MODEL_INFO: &str = "ModelInfo";
    pub const FORM: &str = "Form";
    pub const ENCODING: &str = "Encoding";
    pub const MAX_UPLOAD_BYTES: &str = "MaxUploadBytes";
}

/// Flat key-value map handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePayload(BTreeMap<String, Value>);

impl PagePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload with only a title set.
    pub fn titled(title: impl Into<String>) -> Self {
        Self::new().with(keys::TITLE, title.into())
    }

    /// Set `key` to the JSON form of `value`.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        self.insert(key, value);
        self
    }

    /// A value that fails to serialize is logged and stored as `null`.
    pub fn insert(&mut self, key: &str, value: impl Serialize) {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Page payload value failed to serialize");
            Value::Null
        });
        self.0.insert(key.to_string(), value);
    }

    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.with(keys::ERROR, message.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> &str {
        self.get_str(keys::TITLE).unwrap_or("ML Console")
    }

    pub fn error(&self) -> Option<&str> {
        self.get_str(keys::ERROR)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Rendering failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Template {template} rendering failed: {reason}")]
    Failed { template: String, reason: String },
}

/// Renders named templates to HTML.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, payload: &PagePayload) -> Result<String, RenderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_serializes_values() {
        let payload = PagePayload::titled("Dashboard")
            .with(keys::DATASETS, vec!["a", "b"])
            .with_error("boom");

        assert_eq!(payload.title(), "Dashboard");
        assert_eq!(payload.error(), Some("boom"));
        assert_eq!(payload.get(keys::DATASETS), Some(&json!(["a", "b"])));
    }

    #[test]
    fn missing_title_has_fallback() {
        assert_eq!(PagePayload::new().title(), "ML Console");
    }

    #[test]
    fn keys_are_sorted() {
        let payload = PagePayload::new().with("b", 1).with("a", 2);
        assert_eq!(payload.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn unserializable_value_becomes_null() {
        let mut by_pair = std::collections::HashMap::new();
        by_pair.insert((1u8, 2u8), "x");

        let payload = PagePayload::new().with(keys::RESULT, by_pair);

        assert_eq!(payload.get(keys::RESULT), Some(&Value::Null));
    }
}
