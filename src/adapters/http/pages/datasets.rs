//! Dataset upload and preview.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Response,
};

use super::{render_outcome, render_page, signed_in};
use crate::adapters::http::error::PageError;
use crate::adapters::http::forms::{read_multipart, MultipartInput};
use crate::adapters::http::middleware::{RequireToken, SessionAuth};
use crate::adapters::http::state::AppState;
use crate::adapters::render::templates;
use crate::domain::backend::{DatasetUpload, PreviewDataset};
use crate::ports::{keys, PagePayload};

fn upload_payload(state: &AppState, auth: &SessionAuth) -> PagePayload {
    signed_in("Upload dataset", auth).with(keys::MAX_UPLOAD_BYTES, state.settings.max_upload_bytes)
}

pub async fn upload_page(State(state): State<AppState>, RequireToken(auth): RequireToken) -> Response {
    render_page(
        &state,
        templates::UPLOAD,
        upload_payload(&state, &auth),
        StatusCode::OK,
    )
}

pub async fn upload_submit(
    State(state): State<AppState>,
    RequireToken(auth): RequireToken,
    multipart: Multipart,
) -> Response {
    let base = upload_payload(&state, &auth);
    let outcome = upload(&state, &auth, multipart, base.clone()).await;
    render_outcome(&state, templates::UPLOAD, base, outcome)
}

async fn upload(
    state: &AppState,
    auth: &SessionAuth,
    multipart: Multipart,
    payload: PagePayload,
) -> Result<PagePayload, PageError> {
    let mut input = read_multipart(multipart, "file", state.settings.max_upload_bytes).await?;
    let upload = DatasetUpload {
        file: input.take_file()?,
        name: input.text_owned("name"),
        description: input.text_owned("description"),
    };

    tracing::debug!(
        file_name = %upload.file.file_name,
        bytes = upload.file.len(),
        "Uploading dataset"
    );
    let result = state.backend.upload_dataset(&auth.token, upload).await?;
    Ok(payload.with(keys::RESULT, result))
}

pub async fn preview_page(State(state): State<AppState>, RequireToken(auth): RequireToken) -> Response {
    render_page(
        &state,
        templates::PREVIEW,
        signed_in("Preview dataset", &auth),
        StatusCode::OK,
    )
}

pub async fn preview_submit(
    State(state): State<AppState>,
    RequireToken(auth): RequireToken,
    multipart: Multipart,
) -> Response {
    let base = signed_in("Preview dataset", &auth);
    let outcome = preview(&state, &auth, multipart, base.clone()).await;
    render_outcome(&state, templates::PREVIEW, base, outcome)
}

async fn preview(
    state: &AppState,
    auth: &SessionAuth,
    multipart: Multipart,
    payload: PagePayload,
) -> Result<PagePayload, PageError> {
    let mut input = read_multipart(multipart, "file", state.settings.max_upload_bytes).await?;
    let request = PreviewDataset {
        num_rows: num_rows(&input)?,
        file: input.take_file()?,
    };

    let preview = state.backend.preview_dataset(&auth.token, request).await?;
    Ok(payload
        .with(keys::FORM, input.fields())
        .with(keys::PREVIEW, preview))
}

fn num_rows(input: &MultipartInput) -> Result<Option<u32>, PageError> {
    match input.text("num_rows") {
        None => Ok(None),
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(PageError::bad_request("Rows must be a positive number")),
        },
    }
}
