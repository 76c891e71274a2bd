use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error body shared by every route: `{"error": title, "message": detail}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, message: Option<String>) -> Self {
        Self { status, title, message, details: None }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({"error": self.title, "message": self.message});
        if let Some(details) = self.details {
            body["fields"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(ref v) => {
                let details = serde_json::to_value(&v.fields).unwrap_or_default();
                JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())).with_details(details)
            }
            ServiceError::UploadRead(source) => match source.downcast::<MultipartError>() {
                Ok(multipart) => JsonApiError::from(*multipart),
                Err(other) => JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some(other.to_string())),
            },
            ServiceError::Storage(_) => {
                error!(error = %e, "storage failure");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage Error", Some(e.to_string()))
            }
            ServiceError::FileIo(_) => {
                error!(error = %e, "image write failure");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save image", Some(e.to_string()))
            }
        }
    }
}

/// Form parsing failures keep the extractor's status, e.g. 413 past the body limit.
impl From<MultipartError> for JsonApiError {
    fn from(e: MultipartError) -> Self {
        let status = e.status();
        let title = if status == StatusCode::PAYLOAD_TOO_LARGE { "Payload Too Large" } else { "Bad Request" };
        JsonApiError::new(status, title, Some(e.body_text()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}
