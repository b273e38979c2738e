//! Mock model API for testing.
//!
//! Implements the `MlBackend` port without a network. It records every call so
//! tests can assert that a path did (or did not) reach the backend.
//!
//! # Example
//!
//! ```ignore
//! use ml_frontend::adapters::backend::MockMlBackend;
//!
//! let backend = MockMlBackend::new()
//!     .with_user("u", "p", "T")
//!     .with_models(vec![model]);
//!
//! let result = backend.login(&Credentials::new("u", "p")).await;
//! assert_eq!(result.unwrap().access_token, "T");
//! assert_eq!(backend.call_count(), 1);
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::backend::{
    Acknowledgement, BackendError, BackendOperation, Credentials, Dataset, DatasetUpload,
    LoginResult, Model, ModelInfo, PredictionInput, PredictionPage, PredictionResult, Preview,
    PreviewDataset, TrainModel, TrainResult, UploadResult,
};
use crate::domain::foundation::{AuthToken, DatasetId, ModelId};
use crate::ports::MlBackend;

#[derive(Debug, Default)]
struct MockState {
    /// username -> (password, token)
    users: HashMap<String, (String, String)>,
    /// username -> email given at registration
    emails: HashMap<String, String>,
    datasets: Vec<Dataset>,
    models: Vec<Model>,
    predictions: HashMap<ModelId, PredictionPage>,
    model_info: ModelInfo,
    preview: Preview,
    prediction: Option<PredictionResult>,
    errors: HashMap<BackendOperation, BackendError>,
    calls: Vec<BackendOperation>,
    last_token: Option<String>,
    last_upload: Option<DatasetUpload>,
    last_training: Option<TrainModel>,
    last_prediction: Option<(ModelId, PredictionInput)>,
    last_preview: Option<PreviewDataset>,
}

/// In-process stand-in for the model API.
#[derive(Debug, Default)]
pub struct MockMlBackend {
    state: RwLock<MockState>,
}

impl MockMlBackend {
    /// Creates an empty mock backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `username`/`password` at login, issuing `token`.
    pub fn with_user(
        self,
        username: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.state
            .write()
            .unwrap()
            .users
            .insert(username.into(), (password.into(), token.into()));
        self
    }

    pub fn with_datasets(self, datasets: Vec<Dataset>) -> Self {
        self.state.write().unwrap().datasets = datasets;
        self
    }

    pub fn with_models(self, models: Vec<Model>) -> Self {
        self.state.write().unwrap().models = models;
        self
    }

    pub fn with_prediction(self, result: PredictionResult) -> Self {
        self.state.write().unwrap().prediction = Some(result);
        self
    }

    pub fn with_prediction_page(self, model_id: ModelId, page: PredictionPage) -> Self {
        self.state
            .write()
            .unwrap()
            .predictions
            .insert(model_id, page);
        self
    }

    pub fn with_model_info(self, info: ModelInfo) -> Self {
        self.state.write().unwrap().model_info = info;
        self
    }

    pub fn with_preview(self, preview: Preview) -> Self {
        self.state.write().unwrap().preview = preview;
        self
    }

    /// Forces `operation` to fail with `error`.
    pub fn with_error(self, operation: BackendOperation, error: BackendError) -> Self {
        self.state.write().unwrap().errors.insert(operation, error);
        self
    }

    /// Operations called so far, in order.
    pub fn calls(&self) -> Vec<BackendOperation> {
        self.state.read().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.read().unwrap().calls.len()
    }

    /// Raw token passed on the most recent authenticated call.
    pub fn last_token(&self) -> Option<String> {
        self.state.read().unwrap().last_token.clone()
    }

    pub fn last_upload(&self) -> Option<DatasetUpload> {
        self.state.read().unwrap().last_upload.clone()
    }

    pub fn last_training(&self) -> Option<TrainModel> {
        self.state.read().unwrap().last_training.clone()
    }

    pub fn last_prediction(&self) -> Option<(ModelId, PredictionInput)> {
        self.state.read().unwrap().last_prediction.clone()
    }

    pub fn last_preview(&self) -> Option<PreviewDataset> {
        self.state.read().unwrap().last_preview.clone()
    }

    /// Email sent when `username` registered, if any.
    pub fn email_of(&self, username: &str) -> Option<String> {
        self.state.read().unwrap().emails.get(username).cloned()
    }

    /// Records the call and returns the forced error, if any.
    fn enter(&self, operation: BackendOperation, token: Option<&AuthToken>) -> Result<(), BackendError> {
        let mut state = self.state.write().unwrap();
        state.calls.push(operation);
        if let Some(token) = token {
            state.last_token = Some(token.expose().to_string());
        }
        match state.errors.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn rejected(operation: BackendOperation, status: u16, message: &str) -> BackendError {
        BackendError::Rejected {
            operation,
            status,
            expected: 200,
            message: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl MlBackend for MockMlBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResult, BackendError> {
        self.enter(BackendOperation::Login, None)?;
        let state = self.state.read().unwrap();
        match state.users.get(&credentials.username) {
            Some((password, token)) if password == credentials.password() => Ok(LoginResult {
                access_token: token.clone(),
            }),
            _ => Err(Self::rejected(
                BackendOperation::Login,
                401,
                "Invalid username or password",
            )),
        }
    }

    async fn register(&self, credentials: &Credentials) -> Result<Acknowledgement, BackendError> {
        self.enter(BackendOperation::Register, None)?;
        let mut state = self.state.write().unwrap();
        if state.users.contains_key(&credentials.username) {
            return Err(Self::rejected(
                BackendOperation::Register,
                400,
                "Username already exists",
            ));
        }
        let token = format!("token-{}", credentials.username);
        if let Some(email) = credentials.email() {
            state
                .emails
                .insert(credentials.username.clone(), email.to_string());
        }
        state.users.insert(
            credentials.username.clone(),
            (credentials.password().to_string(), token),
        );
        Ok(Acknowledgement {
            message: Some("User created successfully".to_string()),
            error: None,
        })
    }

    async fn list_datasets(&self, token: &AuthToken) -> Result<Vec<Dataset>, BackendError> {
        self.enter(BackendOperation::ListDatasets, Some(token))?;
        Ok(self.state.read().unwrap().datasets.clone())
    }

    async fn list_models(&self, token: &AuthToken) -> Result<Vec<Model>, BackendError> {
        self.enter(BackendOperation::ListModels, Some(token))?;
        Ok(self.state.read().unwrap().models.clone())
    }

    async fn upload_dataset(
        &self,
        token: &AuthToken,
        upload: DatasetUpload,
    ) -> Result<UploadResult, BackendError> {
        self.enter(BackendOperation::UploadDataset, Some(token))?;
        let mut state = self.state.write().unwrap();
        let dataset_id = DatasetId::new(state.datasets.len() as u64 + 1);
        state.last_upload = Some(upload);
        Ok(UploadResult {
            message: Some("Dataset uploaded successfully".to_string()),
            dataset_id,
        })
    }

    async fn train_model(
        &self,
        token: &AuthToken,
        request: TrainModel,
    ) -> Result<TrainResult, BackendError> {
        self.enter(BackendOperation::TrainModel, Some(token))?;
        let mut state = self.state.write().unwrap();
        let model_id = ModelId::new(state.models.len() as u64 + 1);
        state.last_training = Some(request);
        Ok(TrainResult {
            message: Some("Model trained successfully".to_string()),
            model_id,
        })
    }

    async fn predict(
        &self,
        token: &AuthToken,
        model_id: ModelId,
        input: PredictionInput,
    ) -> Result<PredictionResult, BackendError> {
        self.enter(BackendOperation::Predict, Some(token))?;
        let mut state = self.state.write().unwrap();
        if !state.models.iter().any(|m| m.id == model_id) {
            return Err(Self::rejected(BackendOperation::Predict, 404, "Model not found"));
        }
        state.last_prediction = Some((model_id, input));
        Ok(state.prediction.clone().unwrap_or(PredictionResult {
            predictions: vec![],
            confidence_score: None,
            error: None,
        }))
    }

    async fn list_predictions(
        &self,
        token: &AuthToken,
        model_id: ModelId,
        page: u32,
    ) -> Result<PredictionPage, BackendError> {
        self.enter(BackendOperation::ListPredictions, Some(token))?;
        let state = self.state.read().unwrap();
        match state.predictions.get(&model_id) {
            Some(stored) => Ok(stored.clone()),
            None => Ok(PredictionPage {
                predictions: vec![],
                total: 0,
                pages: 0,
                current_page: u64::from(page.max(1)),
            }),
        }
    }

    async fn model_info(&self, token: &AuthToken) -> Result<ModelInfo, BackendError> {
        self.enter(BackendOperation::ModelInfo, Some(token))?;
        Ok(self.state.read().unwrap().model_info.clone())
    }

    async fn preview_dataset(
        &self,
        token: &AuthToken,
        request: PreviewDataset,
    ) -> Result<Preview, BackendError> {
        self.enter(BackendOperation::PreviewDataset, Some(token))?;
        let mut state = self.state.write().unwrap();
        state.last_preview = Some(request);
        Ok(state.preview.clone())
    }
}
