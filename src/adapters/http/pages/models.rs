//! Training, prediction and prediction history.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Form,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{render_outcome, signed_in};
use crate::adapters::http::error::PageError;
use crate::adapters::http::forms::{as_typed, non_blank, required};
use crate::adapters::http::middleware::{RequireToken, SessionAuth};
use crate::adapters::http::state::AppState;
use crate::adapters::render::templates;
use crate::config::PredictEncoding;
use crate::domain::backend::{Model, PredictionInput, TrainModel};
use crate::domain::foundation::{DatasetId, ModelId};
use crate::ports::{keys, PagePayload};

type FormFields = HashMap<String, String>;

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

pub async fn train_page(State(state): State<AppState>, RequireToken(auth): RequireToken) -> Response {
    let base = signed_in("Train model", &auth);
    let outcome = state
        .backend
        .list_datasets(&auth.token)
        .await
        .map(|datasets| base.clone().with(keys::DATASETS, datasets))
        .map_err(PageError::from);
    render_outcome(&state, templates::TRAIN, base, outcome)
}

pub async fn train_submit(
    State(state): State<AppState>,
    RequireToken(auth): RequireToken,
    Form(form): Form<FormFields>,
) -> Response {
    let command = train_command(&form);

    // The dataset selector is shown again whatever the outcome
    let datasets = match state.backend.list_datasets(&auth.token).await {
        Ok(datasets) => datasets,
        Err(e) => {
            tracing::warn!(error = %e, "Could not list datasets for the training form");
            Vec::new()
        }
    };
    let base = signed_in("Train model", &auth)
        .with(keys::DATASETS, datasets)
        .with(keys::FORM, &form);

    let outcome = match command {
        Ok(command) => state
            .backend
            .train_model(&auth.token, command)
            .await
            .map(|result| base.clone().with(keys::RESULT, result))
            .map_err(PageError::from),
        Err(err) => Err(err),
    };
    render_outcome(&state, templates::TRAIN, base, outcome)
}

fn train_command(form: &FormFields) -> Result<TrainModel, PageError> {
    let field = |name: &str| form.get(name).map(String::as_str);

    let dataset_id: DatasetId = required(field("dataset_id"), "Dataset")?
        .parse()
        .map_err(|_| PageError::bad_request("Dataset must be a numeric id"))?;
    let target_column = required(field("target_column"), "Target column")?.to_string();
    let model_type = non_blank(field("model_type"))
        .unwrap_or(TrainModel::DEFAULT_MODEL_TYPE)
        .to_string();

    Ok(TrainModel {
        dataset_id,
        target_column,
        model_type,
        name: as_typed(field("name")).map(str::to_string),
        description: as_typed(field("description")).map(str::to_string),
        drop_columns: non_blank(field("drop_columns")).map(str::to_string),
    })
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

async fn find_model(
    state: &AppState,
    auth: &SessionAuth,
    model_id: ModelId,
) -> Result<Model, PageError> {
    state
        .backend
        .list_models(&auth.token)
        .await?
        .into_iter()
        .find(|model| model.id == model_id)
        .ok_or_else(|| PageError::NotFound(format!("Model {} not found", model_id)))
}

fn predict_payload(state: &AppState, auth: &SessionAuth) -> PagePayload {
    signed_in("Predict", auth).with(keys::ENCODING, state.settings.predict_encoding.as_str())
}

pub async fn predict_page(
    State(state): State<AppState>,
    RequireToken(auth): RequireToken,
    Path(model_id): Path<ModelId>,
) -> Response {
    let base = predict_payload(&state, &auth).with(keys::MODEL, json!({ "id": model_id }));
    let outcome = find_model(&state, &auth, model_id)
        .await
        .map(|model| base.clone().with(keys::MODEL, model));
    render_outcome(&state, templates::PREDICT, base, outcome)
}

pub async fn predict_submit(
    State(state): State<AppState>,
    RequireToken(auth): RequireToken,
    Path(model_id): Path<ModelId>,
    Form(form): Form<FormFields>,
) -> Response {
    let mut base = predict_payload(&state, &auth)
        .with(keys::MODEL, json!({ "id": model_id }))
        .with(keys::FORM, &form);

    let model = match find_model(&state, &auth, model_id).await {
        Ok(model) => model,
        Err(err) => return render_outcome(&state, templates::PREDICT, base, Err(err)),
    };
    base.insert(keys::MODEL, &model);

    let outcome = predict(&state, &auth, &model, &form, base.clone()).await;
    render_outcome(&state, templates::PREDICT, base, outcome)
}

async fn predict(
    state: &AppState,
    auth: &SessionAuth,
    model: &Model,
    form: &FormFields,
    payload: PagePayload,
) -> Result<PagePayload, PageError> {
    let input = encode_prediction(state.settings.predict_encoding, model, form)?;
    let result = state.backend.predict(&auth.token, model.id, input).await?;

    let mut payload = payload.with(keys::RESULT, &result);
    if let Some(error) = &result.error {
        payload.insert(keys::ERROR, format!("Prediction failed: {}", error));
    }
    Ok(payload)
}

/// Builds the JSON body of a prediction from the submitted form.
pub fn encode_prediction(
    encoding: PredictEncoding,
    model: &Model,
    form: &FormFields,
) -> Result<PredictionInput, PageError> {
    match encoding {
        PredictEncoding::TypedFields => {
            let mut features = Map::new();
            for feature in &model.feature_columns {
                let value = non_blank(form.get(feature).map(String::as_str)).ok_or_else(|| {
                    PageError::bad_request(format!("Missing feature: {}", feature))
                })?;
                features.insert(feature.clone(), Value::String(value.to_string()));
            }
            Ok(PredictionInput::new(Value::Object(features)))
        }
        PredictEncoding::RawJson => {
            let raw = required(form.get("features_json").map(String::as_str), "Features JSON")?;
            let value: Value = serde_json::from_str(raw)
                .map_err(|e| PageError::bad_request(format!("Invalid JSON: {}", e)))?;
            if !(value.is_object() || value.is_array()) {
                return Err(PageError::bad_request(
                    "Features must be a JSON object or array",
                ));
            }
            Ok(PredictionInput::new(value))
        }
        PredictEncoding::FormToJson => {
            let features: Map<String, Value> = form
                .iter()
                .filter_map(|(name, value)| {
                    non_blank(Some(value.as_str())).map(|v| (name.clone(), Value::String(v.to_string())))
                })
                .collect();
            if features.is_empty() {
                return Err(PageError::bad_request(
                    "At least one feature value is required",
                ));
            }
            Ok(PredictionInput::new(Value::Object(features)))
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<String>,
}

impl HistoryQuery {
    /// Requested page; anything unparsable or below 1 is page 1.
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

pub async fn predictions_page(
    State(state): State<AppState>,
    RequireToken(auth): RequireToken,
    Path(model_id): Path<ModelId>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let page = query.page();
    let base = signed_in("Prediction history", &auth)
        .with(keys::MODEL, json!({ "id": model_id }))
        .with(keys::PAGE, page);
    let outcome = state
        .backend
        .list_predictions(&auth.token, model_id, page)
        .await
        .map(|history| base.clone().with(keys::PREDICTIONS, history))
        .map_err(PageError::from);
    render_outcome(&state, templates::PREDICTIONS, base, outcome)
}
