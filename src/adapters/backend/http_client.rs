//! reqwest implementation of the [`MlBackend`] port.
//!
//! Every operation goes through [`HttpMlBackend::execute`]:
//!
//! ```text
//! BackendRequest -> reqwest request -> send -> status == expected? -> decode JSON
//!                                         \-> transport error: Connection
//!                                                  \-> other status: Rejected
//! ```
//!
//! # Configuration
//!
//! ```ignore
//! let backend = HttpMlBackend::new(&config.backend)?
//!     .with_upload_limit(config.upload.max_file_bytes);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::request::{BackendRequest, MultipartForm, RequestBody};
use crate::config::{BackendConfig, BackendContract};
use crate::domain::backend::{
    Acknowledgement, BackendError, BackendOperation, Credentials, Dataset, DatasetUpload,
    LoginResult, Model, ModelInfo, PredictionInput, PredictionPage, PredictionResult, Preview,
    PreviewDataset, TrainModel, TrainResult, UploadResult, UploadedFile,
};
use crate::domain::foundation::{AuthToken, ModelId};
use crate::ports::MlBackend;

/// HTTP client for the model API.
pub struct HttpMlBackend {
    client: Client,
    base_url: String,
    contract: BackendContract,
    upload_limit: Option<usize>,
}

impl HttpMlBackend {
    /// Creates a client from configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BackendError::invalid_request(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self::with_client(
            client,
            config.base_url.clone(),
            config.contract.clone(),
        ))
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: impl Into<String>, contract: BackendContract) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            contract,
            upload_limit: None,
        }
    }

    /// Refuse files larger than `limit` bytes before sending anything.
    pub fn with_upload_limit(mut self, limit: usize) -> Self {
        self.upload_limit = Some(limit);
        self
    }

    pub fn contract(&self) -> &BackendContract {
        &self.contract
    }

    /// Resolves `path` against the base URL with exactly one `/` between them.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn check_upload_size(&self, file: &UploadedFile) -> Result<(), BackendError> {
        match self.upload_limit {
            Some(limit) if file.len() > limit => Err(BackendError::PayloadTooLarge { limit }),
            _ => Ok(()),
        }
    }

    fn build(&self, request: BackendRequest) -> Result<reqwest::RequestBuilder, BackendError> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(authorization) = request.authorization() {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes),
            RequestBody::Multipart(form) => builder.multipart(form.into_reqwest()?),
        };

        Ok(builder)
    }

    /// Sends the request and decodes the expected success body.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: BackendRequest,
    ) -> Result<T, BackendError> {
        let operation = request.operation;
        let expected = self.contract.expected_status(operation);
        let builder = self.build(request)?;

        tracing::debug!(%operation, "Calling model API");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%operation, error = %e, "Model API unreachable");
            BackendError::connection(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::connection(format!("reading response body: {}", e)))?;

        if status != expected {
            let message = error_message(&body);
            tracing::info!(%operation, status, expected, "Model API rejected request");
            return Err(BackendError::Rejected {
                operation,
                status,
                expected,
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(%operation, error = %e, "Model API returned malformed JSON");
            BackendError::decode(operation, e.to_string())
        })
    }
}

/// Error text from a rejection body (`{"error": ...}`, or `{"msg": ...}` from
/// the JWT layer).
fn error_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        msg: Option<String>,
        message: Option<String>,
    }

    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.msg).or(b.message))
}

#[async_trait]
impl MlBackend for HttpMlBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResult, BackendError> {
        let request = BackendRequest::post(BackendOperation::Login, "/login")
            .with_json(&credentials.to_json())?;
        let result: LoginResult = self.execute(request).await?;

        if result.token().is_none() {
            return Err(BackendError::decode(
                BackendOperation::Login,
                "empty access_token",
            ));
        }
        Ok(result)
    }

    async fn register(&self, credentials: &Credentials) -> Result<Acknowledgement, BackendError> {
        let request = BackendRequest::post(BackendOperation::Register, "/register")
            .with_json(&credentials.to_json())?;
        self.execute(request).await
    }

    async fn list_datasets(&self, token: &AuthToken) -> Result<Vec<Dataset>, BackendError> {
        let request = BackendRequest::get(BackendOperation::ListDatasets, "/datasets").with_bearer(token);
        self.execute(request).await
    }

    async fn list_models(&self, token: &AuthToken) -> Result<Vec<Model>, BackendError> {
        let request = BackendRequest::get(BackendOperation::ListModels, "/models").with_bearer(token);
        self.execute(request).await
    }

    async fn upload_dataset(
        &self,
        token: &AuthToken,
        upload: DatasetUpload,
    ) -> Result<UploadResult, BackendError> {
        self.check_upload_size(&upload.file)?;

        let form = MultipartForm::new()
            .optional_text("name", upload.name.as_deref())
            .optional_text("description", upload.description.as_deref())
            .file("file", upload.file);
        let request = BackendRequest::post(
            BackendOperation::UploadDataset,
            self.contract.upload_path.clone(),
        )
        .with_bearer(token)
        .with_multipart(form);

        self.execute(request).await
    }

    async fn train_model(
        &self,
        token: &AuthToken,
        request: TrainModel,
    ) -> Result<TrainResult, BackendError> {
        let form = MultipartForm::new()
            .text("dataset_id", request.dataset_id.to_string())
            .text("target_column", request.target_column)
            .text("model_type", request.model_type)
            .optional_text("name", request.name.as_deref())
            .optional_text("description", request.description.as_deref())
            .optional_text("drop_columns", request.drop_columns.as_deref());
        let request = BackendRequest::post(BackendOperation::TrainModel, "/train")
            .with_bearer(token)
            .with_multipart(form);

        self.execute(request).await
    }

    async fn predict(
        &self,
        token: &AuthToken,
        model_id: ModelId,
        input: PredictionInput,
    ) -> Result<PredictionResult, BackendError> {
        let request =
            BackendRequest::post(BackendOperation::Predict, format!("/predict/{}", model_id))
                .with_bearer(token)
                .with_json(input.as_value())?;
        self.execute(request).await
    }

    async fn list_predictions(
        &self,
        token: &AuthToken,
        model_id: ModelId,
        page: u32,
    ) -> Result<PredictionPage, BackendError> {
        let request = BackendRequest::get(
            BackendOperation::ListPredictions,
            format!("/predictions/{}", model_id),
        )
        .with_bearer(token)
        .with_query("page", page.max(1));
        self.execute(request).await
    }

    async fn model_info(&self, token: &AuthToken) -> Result<ModelInfo, BackendError> {
        let request = BackendRequest::get(BackendOperation::ModelInfo, "/model-info").with_bearer(token);
        self.execute(request).await
    }

    async fn preview_dataset(
        &self,
        token: &AuthToken,
        request: PreviewDataset,
    ) -> Result<Preview, BackendError> {
        self.check_upload_size(&request.file)?;

        let num_rows = request.num_rows.map(|n| n.to_string());
        let form = MultipartForm::new()
            .file("file", request.file)
            .optional_text("num_rows", num_rows.as_deref());
        let request = BackendRequest::post(BackendOperation::PreviewDataset, "/preview")
            .with_bearer(token)
            .with_multipart(form);

        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base_url: &str) -> HttpMlBackend {
        HttpMlBackend::with_client(Client::new(), base_url, BackendContract::default())
    }

    #[test]
    fn url_joins_with_single_slash() {
        assert_eq!(backend("http://api:8000").url("/models"), "http://api:8000/models");
        assert_eq!(backend("http://api:8000/").url("/models"), "http://api:8000/models");
        assert_eq!(backend("http://api:8000/").url("models"), "http://api:8000/models");
        assert_eq!(
            backend("http://api:8000/v1").url("predict/3"),
            "http://api:8000/v1/predict/3"
        );
    }

    #[test]
    fn error_message_prefers_error_field() {
        assert_eq!(
            error_message(br#"{"error": "Dataset not found"}"#).as_deref(),
            Some("Dataset not found")
        );
        assert_eq!(
            error_message(br#"{"msg": "Token has expired"}"#).as_deref(),
            Some("Token has expired")
        );
        assert_eq!(error_message(b"<html>502</html>"), None);
    }

    #[tokio::test]
    async fn oversized_upload_is_refused_before_sending() {
        // Nothing listens on this address; reaching the network would be a Connection error
        let backend = backend("http://127.0.0.1:9").with_upload_limit(4);
        let token = AuthToken::new("T").unwrap();
        let upload = DatasetUpload {
            file: UploadedFile::new("big.csv", vec![0u8; 5]),
            name: None,
            description: None,
        };

        let result = backend.upload_dataset(&token, upload).await;

        assert_eq!(result.unwrap_err(), BackendError::PayloadTooLarge { limit: 4 });
    }
}
