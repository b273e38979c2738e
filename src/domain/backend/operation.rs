//! The capabilities of the model API this front end calls.

use std::fmt;

/// One backend capability. Used to look up the expected success status and
/// to label errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOperation {
    Login,
    Register,
    ListDatasets,
    ListModels,
    UploadDataset,
    TrainModel,
    Predict,
    ListPredictions,
    ModelInfo,
    PreviewDataset,
}

impl BackendOperation {
    pub const ALL: [BackendOperation; 10] = [
        BackendOperation::Login,
        BackendOperation::Register,
        BackendOperation::ListDatasets,
        BackendOperation::ListModels,
        BackendOperation::UploadDataset,
        BackendOperation::TrainModel,
        BackendOperation::Predict,
        BackendOperation::ListPredictions,
        BackendOperation::ModelInfo,
        BackendOperation::PreviewDataset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendOperation::Login => "login",
            BackendOperation::Register => "register",
            BackendOperation::ListDatasets => "list_datasets",
            BackendOperation::ListModels => "list_models",
            BackendOperation::UploadDataset => "upload_dataset",
            BackendOperation::TrainModel => "train_model",
            BackendOperation::Predict => "predict",
            BackendOperation::ListPredictions => "list_predictions",
            BackendOperation::ModelInfo => "model_info",
            BackendOperation::PreviewDataset => "preview_dataset",
        }
    }

    /// Whether the call carries the caller's bearer token.
    pub fn requires_token(&self) -> bool {
        !matches!(self, BackendOperation::Login | BackendOperation::Register)
    }
}

impl fmt::Display for BackendOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
