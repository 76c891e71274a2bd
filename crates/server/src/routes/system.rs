use axum::{extract::State, Json};
use common::types::{Health, Info};
use serde::Serialize;

use crate::state::AppState;

pub const API_NAME: &str = "Car Marketplace API";
const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

#[utoipa::path(get, path = "/", tag = "system", responses((status = 200, description = "API name")))]
pub async fn root() -> Json<Info> {
    Json(Info::new(API_NAME))
}

#[utoipa::path(get, path = "/health", tag = "system", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Backend and database report; always answers 200, even without a database.
#[derive(Debug, Serialize)]
pub struct Diagnostics {
    pub backend: &'static str,
    pub database: String,
    pub database_url: &'static str,
    pub database_name: &'static str,
    pub connection_status: &'static str,
    pub store_backend: &'static str,
    pub collections: Vec<String>,
}

fn truncate(msg: &str) -> String {
    msg.chars().take(MAX_ERROR_CHARS).collect()
}

#[utoipa::path(get, path = "/test", tag = "system", responses((status = 200, description = "Diagnostics report")))]
pub async fn diagnostics(State(state): State<AppState>) -> Json<Diagnostics> {
    let status = state.listings.store_status();
    let mut report = Diagnostics {
        backend: "running",
        database: "not available".into(),
        database_url: if state.database.url_set { "set" } else { "not set" },
        database_name: if state.database.name.is_some() { "set" } else { "not set" },
        connection_status: "not connected",
        store_backend: status.backend,
        collections: Vec::new(),
    };

    if status.connected {
        report.connection_status = "connected";
        match state.listings.collection_names().await {
            Ok(mut names) => {
                names.truncate(MAX_COLLECTIONS);
                report.collections = names;
                report.database = "connected and working".into();
            }
            Err(e) => report.database = format!("connected but error: {}", truncate(&e.to_string())),
        }
    }

    Json(report)
}
