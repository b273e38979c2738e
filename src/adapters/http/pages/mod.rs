//! Page handlers.
//!
//! Handlers build a [`PagePayload`] and hand it to the renderer. Failures are
//! shown inline on the same page through [`render_outcome`].
//!
//! - `account` - login, registration, logout
//! - `dashboard` - dataset and model overview, model info
//! - `datasets` - upload and preview
//! - `models` - training, prediction and prediction history

pub mod account;
pub mod dashboard;
pub mod datasets;
pub mod models;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use super::error::PageError;
use super::middleware::SessionAuth;
use super::state::AppState;
use crate::ports::{keys, PagePayload};

/// Renders `template` with `payload` and `status`.
pub(crate) fn render_page(
    state: &AppState,
    template: &str,
    payload: PagePayload,
    status: StatusCode,
) -> Response {
    match state.renderer.render(template, &payload) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => PageError::Render(e).into_response(),
    }
}

/// Renders `fallback` with the error message and the error's status.
pub(crate) fn render_error(
    state: &AppState,
    template: &str,
    fallback: PagePayload,
    err: PageError,
) -> Response {
    if let PageError::Unauthenticated = err {
        return err.into_response();
    }
    err.log();
    let status = err.status();
    render_page(state, template, fallback.with_error(err.user_message()), status)
}

/// Turns a handler outcome into a response: the payload on success, the
/// fallback payload with the error message otherwise.
pub(crate) fn render_outcome(
    state: &AppState,
    template: &str,
    fallback: PagePayload,
    outcome: Result<PagePayload, PageError>,
) -> Response {
    match outcome {
        Ok(payload) => render_page(state, template, payload, StatusCode::OK),
        Err(err) => render_error(state, template, fallback, err),
    }
}

/// Payload for a logged-in page.
pub(crate) fn signed_in(title: &str, auth: &SessionAuth) -> PagePayload {
    let payload = PagePayload::titled(title);
    match &auth.username {
        Some(username) => payload.with(keys::USERNAME, username),
        None => payload.with(keys::USERNAME, ""),
    }
}

/// Liveness probe.
pub async fn healthz() -> &'static str {
    "ok"
}
