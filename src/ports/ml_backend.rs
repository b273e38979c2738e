//! Model API port.
//!
//! One method per backend capability the front end needs. The production
//! adapter is `HttpMlBackend`; tests use `MockMlBackend`.
//!
//! # Contract
//!
//! Implementations must:
//! - Attach `Authorization: Bearer <token>` whenever a token is passed
//! - Return `BackendError::Connection` for transport failures
//! - Return `BackendError::Rejected` when the status differs from the
//!   operation's expected success code, without decoding the body as success
//! - Return `BackendError::Decode` when a success body is malformed
//! - Never retry and never cache

use async_trait::async_trait;

use crate::domain::backend::{
    Acknowledgement, BackendError, Credentials, Dataset, DatasetUpload, LoginResult, Model,
    ModelInfo, PredictionInput, PredictionPage, PredictionResult, Preview, PreviewDataset,
    TrainModel, TrainResult, UploadResult,
};
use crate::domain::foundation::{AuthToken, ModelId};

#[async_trait]
pub trait MlBackend: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResult, BackendError>;

    /// Create an account.
    async fn register(&self, credentials: &Credentials) -> Result<Acknowledgement, BackendError>;

    async fn list_datasets(&self, token: &AuthToken) -> Result<Vec<Dataset>, BackendError>;

    async fn list_models(&self, token: &AuthToken) -> Result<Vec<Model>, BackendError>;

    /// Upload a CSV dataset as a multipart form.
    async fn upload_dataset(
        &self,
        token: &AuthToken,
        upload: DatasetUpload,
    ) -> Result<UploadResult, BackendError>;

    async fn train_model(
        &self,
        token: &AuthToken,
        request: TrainModel,
    ) -> Result<TrainResult, BackendError>;

    async fn predict(
        &self,
        token: &AuthToken,
        model_id: ModelId,
        input: PredictionInput,
    ) -> Result<PredictionResult, BackendError>;

    /// One page of stored predictions for a model (pages start at 1).
    async fn list_predictions(
        &self,
        token: &AuthToken,
        model_id: ModelId,
        page: u32,
    ) -> Result<PredictionPage, BackendError>;

    async fn model_info(&self, token: &AuthToken) -> Result<ModelInfo, BackendError>;

    async fn preview_dataset(
        &self,
        token: &AuthToken,
        request: PreviewDataset,
    ) -> Result<Preview, BackendError>;
}
