//! Axum router for the front end.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::middleware::require_session;
use super::pages::{account, dashboard, datasets, healthz, models};
use super::state::AppState;

/// Create the complete router.
///
/// # Routes
///
/// ## Public
/// - `GET /` - Redirect to the dashboard
/// - `GET|POST /login`, `GET|POST /register`, `GET /logout`
/// - `GET /healthz` - Liveness probe
///
/// ## Behind the session gate
/// - `GET /dashboard`, `GET /model-info`
/// - `GET|POST /upload`, `GET|POST /preview`
/// - `GET|POST /train`
/// - `GET|POST /predict/:model_id`, `GET /predictions/:model_id?page=N`
pub fn build_router(state: AppState) -> Router {
    let settings = state.settings.clone();

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(DefaultBodyLimit::max(settings.body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(settings.request_timeout))
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/login", get(account::login_page).post(account::login_submit))
        .route(
            "/register",
            get(account::register_page).post(account::register_submit),
        )
        .route("/logout", get(account::logout))
        .route("/healthz", get(healthz))
}

/// Routes that only run with a session token. The gate is a route layer, so
/// unknown paths still 404 instead of redirecting.
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/model-info", get(dashboard::model_info))
        .route(
            "/upload",
            get(datasets::upload_page).post(datasets::upload_submit),
        )
        .route(
            "/preview",
            get(datasets::preview_page).post(datasets::preview_submit),
        )
        .route("/train", get(models::train_page).post(models::train_submit))
        .route(
            "/predict/:model_id",
            get(models::predict_page).post(models::predict_submit),
        )
        .route("/predictions/:model_id", get(models::predictions_page))
        .route_layer(middleware::from_fn_with_state(state, require_session))
}
