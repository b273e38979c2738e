//! Response shapes returned by the model API.
//!
//! Decoding is structural only: unknown fields are ignored and optional
//! fields default, nothing beyond that is validated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{AuthToken, DatasetId, ModelId};

/// An uploaded dataset as listed by `GET /datasets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub row_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A trained model as listed by `GET /models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: ModelId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    pub feature_columns: Vec<String>,
    #[serde(default)]
    pub target_column: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub dataset_id: Option<DatasetId>,
}

/// Body of a successful `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResult {
    pub access_token: String,
}

impl LoginResult {
    /// The issued token, or `None` if the backend sent a blank one.
    pub fn token(&self) -> Option<AuthToken> {
        AuthToken::new(self.access_token.clone())
    }
}

/// Generic `{"message": ...}` or `{"error": ...}` acknowledgement (registration).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of a successful dataset upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub message: Option<String>,
    pub dataset_id: DatasetId,
}

/// Body of a successful `POST /train`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainResult {
    #[serde(default)]
    pub message: Option<String>,
    pub model_id: ModelId,
}

/// Body of a successful `POST /predict/{model_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default)]
    pub predictions: Vec<Value>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    /// Some backend builds report feature problems inline with a 200.
    #[serde(default)]
    pub error: Option<String>,
}

/// One stored prediction in the history listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: u64,
    #[serde(default)]
    pub input_data: Value,
    #[serde(default)]
    pub prediction_result: Value,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A page of `GET /predictions/{model_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPage {
    #[serde(default)]
    pub predictions: Vec<PredictionRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u64,
    #[serde(default = "first_page")]
    pub current_page: u64,
}

impl PredictionPage {
    pub fn has_next(&self) -> bool {
        self.current_page < self.pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// Description of the currently deployed model (`GET /model-info`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    pub feature_columns: Vec<String>,
    #[serde(default)]
    pub target_column: String,
    #[serde(default)]
    pub categorical_features: Vec<String>,
    #[serde(default)]
    pub target_classes: Vec<Value>,
}

/// First rows of an uploaded CSV (`POST /preview`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    #[serde(default)]
    pub preview: Vec<Map<String, Value>>,
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub total_columns: u64,
    #[serde(default)]
    pub column_names: Vec<String>,
}

fn first_page() -> u64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dataset_decodes_backend_listing() {
        let body = json!([{
            "id": 3,
            "name": "iris",
            "description": null,
            "columns": ["sepal_length", "species"],
            "row_count": 150,
            "created_at": "2024-03-01T10:00:00"
        }]);
        let datasets: Vec<Dataset> = serde_json::from_value(body).unwrap();
        assert_eq!(datasets[0].id, DatasetId::new(3));
        assert_eq!(datasets[0].columns.len(), 2);
        assert_eq!(datasets[0].row_count, 150);
    }

    #[test]
    fn acknowledgement_keeps_error_text() {
        let ack: Acknowledgement =
            serde_json::from_value(json!({"error": "Username already exists"})).unwrap();
        assert_eq!(ack.error.as_deref(), Some("Username already exists"));
        assert_eq!(ack.message, None);
    }

    #[test]
    fn model_ignores_unknown_fields() {
        let body = json!({
            "id": 9,
            "name": "rf",
            "model_type": "random_forest",
            "feature_columns": ["a", "b"],
            "target_column": "y",
            "dataset_id": 3,
            "extra": {"nested": true}
        });
        let model: Model = serde_json::from_value(body).unwrap();
        assert_eq!(model.id, ModelId::new(9));
        assert_eq!(model.feature_columns, vec!["a", "b"]);
        assert_eq!(model.dataset_id, Some(DatasetId::new(3)));
    }

    #[test]
    fn login_result_with_blank_token_yields_none() {
        let result: LoginResult = serde_json::from_value(json!({"access_token": " "})).unwrap();
        assert!(result.token().is_none());
    }

    #[test]
    fn prediction_page_navigation() {
        let page: PredictionPage = serde_json::from_value(json!({
            "predictions": [],
            "total": 25,
            "pages": 3,
            "current_page": 2
        }))
        .unwrap();
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn prediction_result_accepts_mixed_values() {
        let result: PredictionResult = serde_json::from_value(json!({
            "predictions": ["setosa", 1.5],
            "confidence_score": 0.93
        }))
        .unwrap();
        assert_eq!(result.predictions.len(), 2);
        assert_eq!(result.confidence_score, Some(0.93));
        assert!(result.error.is_none());
    }
}
