//! Dashboard and model info.

use axum::{extract::State, response::Response};

use super::{render_outcome, signed_in};
use crate::adapters::http::error::PageError;
use crate::adapters::http::middleware::{RequireToken, SessionAuth};
use crate::adapters::http::state::AppState;
use crate::adapters::render::templates;
use crate::ports::{keys, PagePayload};

pub async fn dashboard(State(state): State<AppState>, RequireToken(auth): RequireToken) -> Response {
    let base = signed_in("Dashboard", &auth);
    let outcome = load_dashboard(&state, &auth, base.clone()).await;
    render_outcome(&state, templates::DASHBOARD, base, outcome)
}

async fn load_dashboard(
    state: &AppState,
    auth: &SessionAuth,
    payload: PagePayload,
) -> Result<PagePayload, PageError> {
    let (datasets, models) = tokio::join!(
        state.backend.list_datasets(&auth.token),
        state.backend.list_models(&auth.token),
    );
    Ok(payload
        .with(keys::DATASETS, datasets?)
        .with(keys::MODELS, models?))
}

pub async fn model_info(State(state): State<AppState>, RequireToken(auth): RequireToken) -> Response {
    let base = signed_in("Model info", &auth);
    let outcome = state
        .backend
        .model_info(&auth.token)
        .await
        .map(|info| base.clone().with(keys::MODEL_INFO, info))
        .map_err(PageError::from);
    render_outcome(&state, templates::MODEL_INFO, base, outcome)
}
