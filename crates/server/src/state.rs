use configs::AppConfig;
use service::ListingService;

/// What diagnostics may say about database configuration (never the URL itself).
#[derive(Clone, Debug, Default)]
pub struct DatabaseInfo {
    pub url_set: bool,
    pub name: Option<String>,
}

impl DatabaseInfo {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self { url_set: cfg.database.is_configured(), name: cfg.database.name.clone() }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub listings: ListingService,
    pub database: DatabaseInfo,
}
