//! Page-level errors and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use thiserror::Error;

use crate::adapters::render::escape;
use crate::application::AccountError;
use crate::domain::backend::{BackendError, BackendOperation};
use crate::domain::session::SessionError;
use crate::ports::RenderError;

/// Errors a page handler can end with.
#[derive(Debug, Error)]
pub enum PageError {
    /// Missing or invalid form input; the form is shown again.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Session store failure: {0}")]
    Session(#[from] SessionError),

    #[error("File exceeds the {limit} byte upload limit")]
    PayloadTooLarge { limit: usize },

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// No usable session; the browser is sent to the login page.
    #[error("Authentication required")]
    Unauthenticated,
}

impl PageError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        PageError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            PageError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PageError::Backend(e) => backend_status(e),
            PageError::Session(_) | PageError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PageError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            PageError::NotFound(_) => StatusCode::NOT_FOUND,
            PageError::Unauthenticated => StatusCode::SEE_OTHER,
        }
    }

    /// Text shown to the user in the page's error banner.
    pub fn user_message(&self) -> String {
        match self {
            PageError::BadRequest(message) | PageError::NotFound(message) => message.clone(),
            PageError::Backend(e) => backend_message(e),
            PageError::Session(_) => "Your session could not be saved. Please try again.".to_string(),
            PageError::PayloadTooLarge { limit } => {
                format!("Upload failed: the file is larger than {} bytes", limit)
            }
            PageError::Render(_) => "The page could not be rendered".to_string(),
            PageError::Unauthenticated => String::new(),
        }
    }

    pub(crate) fn log(&self) {
        match self {
            PageError::Session(e) => tracing::error!(error = %e, "Session store failure"),
            PageError::Render(e) => tracing::error!(error = %e, "Rendering failed"),
            PageError::Backend(e @ (BackendError::Connection(_) | BackendError::Decode { .. })) => {
                tracing::warn!(error = %e, "Model API call failed")
            }
            PageError::Backend(e) => tracing::info!(error = %e, "Model API refused request"),
            _ => {}
        }
    }
}

impl From<AccountError> for PageError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Backend(e) => PageError::Backend(e),
            AccountError::Session(e) => PageError::Session(e),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        if let PageError::Unauthenticated = self {
            return Redirect::to("/login").into_response();
        }
        self.log();
        let body = format!(
            "<!DOCTYPE html>\n<html><body><p class=\"error\" role=\"alert\">{}</p></body></html>\n",
            escape(&self.user_message())
        );
        (self.status(), Html(body)).into_response()
    }
}

/// 4xx rejections pass through; everything else is a bad gateway.
fn backend_status(err: &BackendError) -> StatusCode {
    match err {
        BackendError::Rejected { status, .. } if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        BackendError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        BackendError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn backend_message(err: &BackendError) -> String {
    match err {
        BackendError::Connection(_) => "Failed to connect to the model service".to_string(),
        BackendError::Decode { .. } => "Failed to parse the model service response".to_string(),
        BackendError::Rejected {
            operation, message, ..
        } => match message {
            Some(text) => format!("{}: {}", failure_label(*operation), text),
            None => failure_label(*operation).to_string(),
        },
        BackendError::PayloadTooLarge { limit } => {
            format!("Upload failed: the file is larger than {} bytes", limit)
        }
        BackendError::InvalidRequest(reason) => reason.clone(),
    }
}

fn failure_label(operation: BackendOperation) -> &'static str {
    match operation {
        BackendOperation::Login => "Login failed",
        BackendOperation::Register => "Registration failed",
        BackendOperation::ListDatasets => "Could not load datasets",
        BackendOperation::ListModels => "Could not load models",
        BackendOperation::UploadDataset => "Upload failed",
        BackendOperation::TrainModel => "Training failed",
        BackendOperation::Predict => "Prediction failed",
        BackendOperation::ListPredictions => "Could not load prediction history",
        BackendOperation::ModelInfo => "Could not load model info",
        BackendOperation::PreviewDataset => "Preview failed",
    }
}
