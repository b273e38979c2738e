//! One-shot request value handed to the HTTP transport.
//!
//! A [`BackendRequest`] fully describes a call before anything touches the
//! network: method, path, optional bearer token and body. Multipart bodies are
//! kept as plain values ([`MultipartForm`]) and only turned into a
//! `reqwest::multipart::Form` (which picks the boundary) at send time.

use reqwest::Method;
use serde_json::Value;

use crate::domain::backend::{BackendError, BackendOperation, UploadedFile};
use crate::domain::foundation::AuthToken;

/// Body of an outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// Serialized JSON document.
    Json(Vec<u8>),
    Multipart(MultipartForm),
}

/// Describes a single call to the model API.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    pub operation: BackendOperation,
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<AuthToken>,
    pub body: RequestBody,
}

impl BackendRequest {
    pub fn new(operation: BackendOperation, method: Method, path: impl Into<String>) -> Self {
        Self {
            operation,
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(operation: BackendOperation, path: impl Into<String>) -> Self {
        Self::new(operation, Method::GET, path)
    }

    pub fn post(operation: BackendOperation, path: impl Into<String>) -> Self {
        Self::new(operation, Method::POST, path)
    }

    pub fn with_bearer(mut self, token: &AuthToken) -> Self {
        self.bearer = Some(token.clone());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_json(mut self, body: &Value) -> Result<Self, BackendError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| BackendError::invalid_request(format!("JSON encoding failed: {}", e)))?;
        self.body = RequestBody::Json(bytes);
        Ok(self)
    }

    pub fn with_multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Value of the `Authorization` header, if a token is attached.
    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_ref().map(AuthToken::bearer_header)
    }
}

/// File part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field_name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Text fields (in insertion order) plus at most one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    fields: Vec<(String, String)>,
    file: Option<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Adds the field only when a non-blank value is present. The value is
    /// sent as given, surrounding whitespace included.
    pub fn optional_text(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => self.text(name, v),
            None => self,
        }
    }

    pub fn file(mut self, field_name: impl Into<String>, file: UploadedFile) -> Self {
        self.file = Some(FilePart {
            field_name: field_name.into(),
            file_name: file.file_name,
            content_type: file.content_type,
            bytes: file.bytes,
        });
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn file_part(&self) -> Option<&FilePart> {
        self.file.as_ref()
    }

    /// Converts into the reqwest form, which assigns the boundary.
    pub fn into_reqwest(self) -> Result<reqwest::multipart::Form, BackendError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        if let Some(file) = self.file {
            let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(content_type) = file.content_type {
                part = part.mime_str(&content_type).map_err(|e| {
                    BackendError::invalid_request(format!("bad content type {}: {}", content_type, e))
                })?;
            }
            form = form.part(file.field_name, part);
        }
        Ok(form)
    }
}
