//! Caller-supplied inputs for backend operations.

use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

use crate::domain::foundation::DatasetId;

/// Username and password submitted to login or register. Registration may
/// also carry an email address.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    password: Secret<String>,
    email: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password.into()),
            email: None,
        }
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Exposes the password (for building the request body).
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// JSON body the model API expects for `/login` and `/register`.
    pub fn to_json(&self) -> Value {
        let mut body = serde_json::json!({
            "username": self.username,
            "password": self.password(),
        });
        if let Some(email) = &self.email {
            body["email"] = Value::String(email.clone());
        }
        body
    }
}

/// A file read from an inbound multipart form, held fully in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Dataset upload: the CSV file plus optional metadata.
#[derive(Debug, Clone)]
pub struct DatasetUpload {
    pub file: UploadedFile,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Training request for a previously uploaded dataset.
#[derive(Debug, Clone)]
pub struct TrainModel {
    pub dataset_id: DatasetId,
    pub target_column: String,
    pub model_type: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Comma-separated columns to leave out of the features.
    pub drop_columns: Option<String>,
}

impl TrainModel {
    pub const DEFAULT_MODEL_TYPE: &'static str = "random_forest";
}

/// Preview of the first rows of a CSV file.
#[derive(Debug, Clone)]
pub struct PreviewDataset {
    pub file: UploadedFile,
    pub num_rows: Option<u32>,
}

/// JSON body sent to `POST /predict/{model_id}`: one object or a list of them.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionInput(Value);

impl PredictionInput {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}
