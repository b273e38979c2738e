//! Integration tests for the reqwest model API client.
//!
//! Each test starts a small axum app on a loopback port that plays the model
//! API, then checks what the client sent and how it read the reply.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use ml_frontend::adapters::backend::HttpMlBackend;
use ml_frontend::config::{BackendConfig, BackendContract};
use ml_frontend::domain::backend::{
    BackendError, BackendOperation, Credentials, DatasetUpload, PredictionInput, PreviewDataset,
    TrainModel, UploadedFile,
};
use ml_frontend::domain::foundation::{AuthToken, DatasetId, ModelId};
use ml_frontend::ports::MlBackend;

// =============================================================================
// Fake model API
// =============================================================================

/// One multipart request as the fake API received it.
#[derive(Debug, Default, Clone)]
struct Captured {
    content_type: String,
    authorization: Option<String>,
    fields: Vec<(String, String)>,
    file: Option<(String, Vec<u8>)>,
}

type Capture = Arc<Mutex<Option<Captured>>>;

async fn capture_multipart(headers: &HeaderMap, mut multipart: Multipart) -> Captured {
    let mut captured = Captured {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ..Captured::default()
    };
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let bytes = field.bytes().await.unwrap().to_vec();
                captured.file = Some((file_name, bytes));
            }
            None => {
                let value = field.text().await.unwrap();
                captured.fields.push((name, value));
            }
        }
    }
    captured
}

fn fake_api(capture: Capture) -> Router {
    Router::new()
        .route(
            "/login",
            post(|Json(body): Json<Value>| async move {
                if body["username"] == "u" && body["password"] == "p" {
                    (StatusCode::OK, Json(json!({"access_token": "T"})))
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"error": "Invalid username or password"})),
                    )
                }
            }),
        )
        .route(
            "/register",
            post(
                |State(capture): State<Capture>, Json(body): Json<Value>| async move {
                    let fields = body
                        .as_object()
                        .map(|object| {
                            object
                                .iter()
                                .map(|(k, v)| (k.clone(), v.as_str().unwrap_or_default().to_string()))
                                .collect()
                        })
                        .unwrap_or_default();
                    *capture.lock().unwrap() = Some(Captured {
                        fields,
                        ..Captured::default()
                    });
                    (StatusCode::OK, Json(json!({"message": "User created"})))
                },
            ),
        )
        .route(
            "/models",
            get(|headers: HeaderMap| async move {
                match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
                    Some("Bearer T") => (
                        StatusCode::OK,
                        Json(json!([{
                            "id": 3,
                            "name": "iris-rf",
                            "model_type": "random_forest",
                            "feature_columns": ["sepal_length"],
                            "target_column": "species"
                        }])),
                    ),
                    _ => (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"msg": "Missing Authorization Header"})),
                    ),
                }
            }),
        )
        .route("/datasets", get(|| async { "this is not json" }))
        .route(
            "/dataset",
            post(
                |State(capture): State<Capture>, headers: HeaderMap, multipart: Multipart| async move {
                    let captured = capture_multipart(&headers, multipart).await;
                    *capture.lock().unwrap() = Some(captured);
                    (
                        StatusCode::CREATED,
                        Json(json!({"message": "Dataset uploaded successfully", "dataset_id": 7})),
                    )
                },
            ),
        )
        .route(
            "/train",
            post(
                |State(capture): State<Capture>, headers: HeaderMap, multipart: Multipart| async move {
                    let captured = capture_multipart(&headers, multipart).await;
                    *capture.lock().unwrap() = Some(captured);
                    Json(json!({"message": "Model trained successfully", "model_id": 9}))
                },
            ),
        )
        .route(
            "/preview",
            post(
                |State(capture): State<Capture>, headers: HeaderMap, multipart: Multipart| async move {
                    let captured = capture_multipart(&headers, multipart).await;
                    *capture.lock().unwrap() = Some(captured);
                    Json(json!({
                        "preview": [{"a": 1, "b": "x"}],
                        "total_rows": 10,
                        "total_columns": 2,
                        "column_names": ["a", "b"]
                    }))
                },
            ),
        )
        .route(
            "/predict/:id",
            post(|Path(id): Path<u64>, Json(body): Json<Value>| async move {
                Json(json!({"predictions": [id, body], "confidence_score": 0.5}))
            }),
        )
        .route(
            "/predictions/:id",
            get(
                |Path(_id): Path<u64>, Query(query): Query<std::collections::HashMap<String, String>>| async move {
                    let page: u64 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
                    Json(json!({"predictions": [], "total": 0, "pages": 5, "current_page": page}))
                },
            ),
        )
        .route(
            "/model-info",
            get(|| async {
                Json(json!({
                    "model_type": "random_forest",
                    "feature_columns": ["a"],
                    "target_column": "y",
                    "categorical_features": [],
                    "target_classes": ["yes", "no"]
                }))
            }),
        )
        .with_state(capture)
}

async fn spawn_api() -> (String, Capture) {
    let capture: Capture = Arc::new(Mutex::new(None));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = fake_api(capture.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), capture)
}

fn client(base_url: &str) -> HttpMlBackend {
    HttpMlBackend::new(&BackendConfig::new(base_url)).unwrap()
}

fn token() -> AuthToken {
    AuthToken::new("T").unwrap()
}

fn captured(capture: &Capture) -> Captured {
    capture.lock().unwrap().clone().expect("request reached the fake API")
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn login_returns_access_token() {
    let (base, _) = spawn_api().await;

    let result = client(&base)
        .login(&Credentials::new("u", "p"))
        .await
        .unwrap();

    assert_eq!(result.token().unwrap().expose(), "T");
}

#[tokio::test]
async fn rejected_login_carries_backend_message() {
    let (base, _) = spawn_api().await;

    let err = client(&base)
        .login(&Credentials::new("u", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackendError::Rejected {
            operation: BackendOperation::Login,
            status: 401,
            expected: 200,
            message: Some("Invalid username or password".to_string()),
        }
    );
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let (base, _) = spawn_api().await;

    let models = client(&base).list_models(&token()).await.unwrap();

    assert_eq!(models.len(), 1);
    assert_eq!(models[0].id, ModelId::new(3));
    assert_eq!(models[0].feature_columns, vec!["sepal_length".to_string()]);
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
    let (base, _) = spawn_api().await;

    let err = client(&base)
        .list_models(&AuthToken::new("other").unwrap())
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn unexpected_success_code_is_rejected_not_decoded() {
    let (base, _) = spawn_api().await;

    // The fake answers 200; the default contract expects 201
    let err = client(&base)
        .register(&Credentials::new("new", "pw"))
        .await
        .unwrap_err();

    assert!(err.is_unexpected_success());
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn register_status_is_configurable() {
    let (base, _) = spawn_api().await;
    let contract = BackendContract {
        register_status: 200,
        ..BackendContract::default()
    };
    let backend = HttpMlBackend::with_client(reqwest::Client::new(), base, contract);

    let ack = backend
        .register(&Credentials::new("new", "pw"))
        .await
        .unwrap();

    assert_eq!(ack.message.as_deref(), Some("User created"));
}

#[tokio::test]
async fn register_body_carries_email_and_untrimmed_password() {
    let (base, capture) = spawn_api().await;
    let contract = BackendContract {
        register_status: 200,
        ..BackendContract::default()
    };
    let backend = HttpMlBackend::with_client(reqwest::Client::new(), base, contract);

    backend
        .register(&Credentials::new("new", " pw ").with_email(Some("new@example.com".to_string())))
        .await
        .unwrap();

    let mut fields = captured(&capture).fields;
    fields.sort();
    assert_eq!(
        fields,
        vec![
            ("email".to_string(), "new@example.com".to_string()),
            ("password".to_string(), " pw ".to_string()),
            ("username".to_string(), "new".to_string()),
        ]
    );
}

#[tokio::test]
async fn malformed_json_is_decode_error() {
    let (base, _) = spawn_api().await;

    let err = client(&base).list_datasets(&token()).await.unwrap_err();

    assert!(matches!(
        err,
        BackendError::Decode {
            operation: BackendOperation::ListDatasets,
            ..
        }
    ));
}

async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn unreachable_api_is_connection_error() {
    let base = unreachable_base_url().await;

    let err = client(&base).list_models(&token()).await.unwrap_err();

    assert!(matches!(err, BackendError::Connection(_)));
}

#[tokio::test]
async fn unreachable_api_fails_json_and_multipart_calls_alike() {
    let base = unreachable_base_url().await;
    let backend = client(&base);

    let login = backend.login(&Credentials::new("u", "p")).await.unwrap_err();
    assert!(matches!(login, BackendError::Connection(_)), "{:?}", login);

    let upload = DatasetUpload {
        file: UploadedFile::new("iris.csv", b"a,b\n1,2\n".to_vec()),
        name: None,
        description: None,
    };
    let upload = backend.upload_dataset(&token(), upload).await.unwrap_err();
    assert!(matches!(upload, BackendError::Connection(_)), "{:?}", upload);
}

#[tokio::test]
async fn upload_sends_multipart_file_and_fields() {
    let (base, capture) = spawn_api().await;
    let upload = DatasetUpload {
        file: UploadedFile::new("iris.csv", b"a,b\n1,2\n".to_vec()).with_content_type("text/csv"),
        name: Some("iris".to_string()),
        description: None,
    };

    let result = client(&base)
        .upload_dataset(&token(), upload)
        .await
        .unwrap();

    assert_eq!(result.dataset_id, DatasetId::new(7));
    let request = captured(&capture);
    assert!(request.content_type.starts_with("multipart/form-data; boundary="));
    assert_eq!(request.authorization.as_deref(), Some("Bearer T"));
    assert_eq!(request.fields, vec![("name".to_string(), "iris".to_string())]);
    assert_eq!(
        request.file,
        Some(("iris.csv".to_string(), b"a,b\n1,2\n".to_vec()))
    );
}

#[tokio::test]
async fn upload_path_is_configurable() {
    let (base, _) = spawn_api().await;
    let contract = BackendContract {
        upload_path: "/upload".to_string(),
        ..BackendContract::default()
    };
    let backend = HttpMlBackend::with_client(reqwest::Client::new(), base, contract);
    let upload = DatasetUpload {
        file: UploadedFile::new("d.csv", b"a\n1\n".to_vec()),
        name: None,
        description: None,
    };

    // The fake API has no /upload route
    let err = backend.upload_dataset(&token(), upload).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn train_sends_form_fields() {
    let (base, capture) = spawn_api().await;
    let request = TrainModel {
        dataset_id: DatasetId::new(2),
        target_column: "species".to_string(),
        model_type: "random_forest".to_string(),
        name: Some("iris-rf".to_string()),
        description: None,
        drop_columns: Some("id".to_string()),
    };

    let result = client(&base).train_model(&token(), request).await.unwrap();

    assert_eq!(result.model_id, ModelId::new(9));
    let fields = captured(&capture).fields;
    assert!(fields.contains(&("dataset_id".to_string(), "2".to_string())));
    assert!(fields.contains(&("target_column".to_string(), "species".to_string())));
    assert!(fields.contains(&("drop_columns".to_string(), "id".to_string())));
    assert!(!fields.iter().any(|(name, _)| name == "description"));
}

#[tokio::test]
async fn predict_posts_json_to_model_path() {
    let (base, _) = spawn_api().await;

    let result = client(&base)
        .predict(
            &token(),
            ModelId::new(4),
            PredictionInput::new(json!({"age": "30"})),
        )
        .await
        .unwrap();

    assert_eq!(result.predictions, vec![json!(4), json!({"age": "30"})]);
    assert_eq!(result.confidence_score, Some(0.5));
}

#[tokio::test]
async fn prediction_history_sends_page() {
    let (base, _) = spawn_api().await;

    let page = client(&base)
        .list_predictions(&token(), ModelId::new(4), 3)
        .await
        .unwrap();

    assert_eq!(page.current_page, 3);
    assert!(page.has_next());
    assert!(page.has_previous());
}

#[tokio::test]
async fn preview_sends_file_and_row_count() {
    let (base, capture) = spawn_api().await;
    let request = PreviewDataset {
        file: UploadedFile::new("d.csv", b"a,b\n1,x\n".to_vec()),
        num_rows: Some(5),
    };

    let preview = client(&base).preview_dataset(&token(), request).await.unwrap();

    assert_eq!(preview.column_names, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(preview.total_rows, 10);
    let sent = captured(&capture);
    assert!(sent.fields.contains(&("num_rows".to_string(), "5".to_string())));
    assert_eq!(sent.file.map(|(name, _)| name).as_deref(), Some("d.csv"));
}

#[tokio::test]
async fn model_info_decodes() {
    let (base, _) = spawn_api().await;

    let info = client(&base).model_info(&token()).await.unwrap();

    assert_eq!(info.target_column, "y");
    assert_eq!(info.target_classes, vec![json!("yes"), json!("no")]);
}
