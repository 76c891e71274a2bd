use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Json, Router,
};
use configs::UploadConfig;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod system;
pub mod vehicles;

pub use system::health;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: listings API, informational routes and uploaded files.
pub fn build_router(state: AppState, cors: CorsLayer, uploads: &UploadConfig) -> Router {
    // Uploaded images, published by generated file name
    let files = ServeDir::new(&uploads.dir);

    let api = Router::new()
        .route("/vehicles", get(vehicles::list).post(vehicles::create))
        .layer(DefaultBodyLimit::max(uploads.max_body_bytes));

    let public = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/test", get(system::diagnostics))
        .route("/api-docs/openapi.json", get(openapi_json));

    public
        .merge(api)
        .with_state(state)
        .nest_service(&uploads.public_prefix, files)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx responses are logged at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
