use axum::{
    extract::{Multipart, State},
    Json,
};
use service::listing::{CreatedListing, ListingFields, ListingView};
use service::ServiceError;
use tracing::{debug, info};

use crate::errors::JsonApiError;
use crate::state::AppState;

/// Multipart part name carrying image attachments.
pub const IMAGES_FIELD: &str = "images";

#[utoipa::path(
    get, path = "/vehicles", tag = "vehicles",
    responses(
        (status = 200, description = "All listings", body = [crate::openapi::ListingViewDoc]),
        (status = 500, description = "Storage Error")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ListingView>>, JsonApiError> {
    let listings = state.listings.list_listings().await?;
    Ok(Json(listings))
}

#[utoipa::path(
    post, path = "/vehicles", tag = "vehicles",
    request_body(content = crate::openapi::VehicleFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Created", body = crate::openapi::CreatedListingDoc),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Storage Error or Failed to save image")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CreatedListing>, JsonApiError> {
    let mut fields = ListingFields::default();
    let mut images = Vec::new();

    // parts are consumed in arrival order, so images keep upload order
    while let Some(field) = multipart.next_field().await.map_err(JsonApiError::from)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGES_FIELD {
            let file_name = field.file_name().map(str::to_string);
            // browsers send an empty, unnamed part when no file was picked
            if file_name.as_deref() == Some("") {
                continue;
            }
            let saved = state.listings.store_image(file_name.as_deref(), field).await?;
            images.push(saved);
            continue;
        }
        let value = field.text().await.map_err(JsonApiError::from)?;
        if !fields.set(&name, value) {
            debug!(field = %name, "ignoring unknown form field");
        }
    }

    let form = fields.parse().map_err(ServiceError::Validation)?;
    info!(make = %form.make, model = %form.model, images = images.len(), "vehicle_create_request");
    let created = state.listings.create_listing(form, images).await?;
    Ok(Json(created))
}
