//! Model API (backend) configuration
//!
//! The historical front ends disagreed on a few details of the backend
//! contract: the success status for registration, the dataset upload path and
//! how prediction input is encoded. These are deployment settings here.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::backend::BackendOperation;

/// Backend client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the model API (e.g. `http://localhost:8000`)
    pub base_url: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Per-operation paths and expected success statuses
    #[serde(default)]
    pub contract: BackendContract,

    /// How the predict form is turned into the JSON request body
    #[serde(default)]
    pub predict_encoding: PredictEncoding,

    /// Refuse a plain `http://` base URL. Off by default: the model API is
    /// usually an internal service reached over http.
    #[serde(default)]
    pub require_https: bool,
}

/// Expected success status per operation, plus the upload path.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BackendContract {
    #[serde(default = "ok")]
    pub login_status: u16,

    #[serde(default = "created")]
    pub register_status: u16,

    #[serde(default = "ok")]
    pub list_datasets_status: u16,

    #[serde(default = "ok")]
    pub list_models_status: u16,

    #[serde(default = "created")]
    pub upload_status: u16,

    #[serde(default = "ok")]
    pub train_status: u16,

    #[serde(default = "ok")]
    pub predict_status: u16,

    #[serde(default = "ok")]
    pub predictions_status: u16,

    #[serde(default = "ok")]
    pub model_info_status: u16,

    #[serde(default = "ok")]
    pub preview_status: u16,

    /// Dataset upload endpoint, `/dataset` or `/upload` depending on the backend build
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
}

/// Encoding of the prediction form.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PredictEncoding {
    /// One form field per model feature column, all required.
    #[default]
    TypedFields,
    /// A `features_json` field forwarded as-is once it parses.
    RawJson,
    /// Every non-empty form field becomes a string property.
    FormToJson,
}

impl PredictEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictEncoding::TypedFields => "typed_fields",
            PredictEncoding::RawJson => "raw_json",
            PredictEncoding::FormToJson => "form_to_json",
        }
    }
}

impl BackendConfig {
    /// Create a configuration for the given base URL with default contract.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout(),
            contract: BackendContract::default(),
            predict_encoding: PredictEncoding::default(),
            require_https: false,
        }
    }

    /// Get the outbound timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate backend configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("BACKEND__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBackendUrl);
        }
        if self.require_https && !self.base_url.starts_with("https://") {
            return Err(ValidationError::BackendMustBeHttps);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }
        self.contract.validate()
    }
}

impl BackendContract {
    /// Status the backend answers with when `operation` succeeds.
    pub fn expected_status(&self, operation: BackendOperation) -> u16 {
        match operation {
            BackendOperation::Login => self.login_status,
            BackendOperation::Register => self.register_status,
            BackendOperation::ListDatasets => self.list_datasets_status,
            BackendOperation::ListModels => self.list_models_status,
            BackendOperation::UploadDataset => self.upload_status,
            BackendOperation::TrainModel => self.train_status,
            BackendOperation::Predict => self.predict_status,
            BackendOperation::ListPredictions => self.predictions_status,
            BackendOperation::ModelInfo => self.model_info_status,
            BackendOperation::PreviewDataset => self.preview_status,
        }
    }

    /// Validate that every expected status is a success code
    pub fn validate(&self) -> Result<(), ValidationError> {
        for operation in BackendOperation::ALL {
            let status = self.expected_status(operation);
            if !(200..300).contains(&status) {
                return Err(ValidationError::InvalidExpectedStatus {
                    operation: operation.as_str(),
                    status,
                });
            }
        }
        if !self.upload_path.starts_with('/') {
            return Err(ValidationError::InvalidUploadPath);
        }
        Ok(())
    }
}

impl Default for BackendContract {
    fn default() -> Self {
        Self {
            login_status: ok(),
            register_status: created(),
            list_datasets_status: ok(),
            list_models_status: ok(),
            upload_status: created(),
            train_status: ok(),
            predict_status: ok(),
            predictions_status: ok(),
            model_info_status: ok(),
            preview_status: ok(),
            upload_path: default_upload_path(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn ok() -> u16 {
    200
}

fn created() -> u16 {
    201
}

fn default_upload_path() -> String {
    "/dataset".to_string()
}
