use bytes::Bytes;
use futures::Stream;
use tracing::{error, info, instrument, warn};

use crate::errors::ServiceError;
use crate::storage::{StorageAdapter, StoreStatus};
use crate::uploads::{ImageStore, SavedImage, StreamError};

use super::domain::{serialize_listing, CreatedListing, ListingForm, ListingView};

/// Application service for vehicle listings.
/// Holds only immutable handles, so clones are shared freely across requests.
#[derive(Clone)]
pub struct ListingService {
    storage: StorageAdapter,
    images: ImageStore,
    collection: String,
}

impl ListingService {
    pub fn new(storage: StorageAdapter, images: ImageStore, collection: impl Into<String>) -> Self {
        Self { storage, images, collection: collection.into() }
    }

    pub fn store_status(&self) -> StoreStatus { self.storage.status() }

    pub async fn collection_names(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.storage.collection_names().await?)
    }

    /// Persist one attachment under a generated name.
    /// Callers write attachments one after another and stop at the first failure.
    pub async fn store_image<S, E>(&self, file_name: Option<&str>, chunks: S) -> Result<SavedImage, ServiceError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<StreamError>,
    {
        let saved = self.images.save_stream(file_name, chunks).await.map_err(|e| {
            error!(event = "image_save_failed", error = %e, "failed to save image");
            ServiceError::from(e)
        })?;
        info!(event = "image_saved", path = %saved.public_path, "image saved");
        Ok(saved)
    }

    /// Validate and insert a listing whose images are already on disk.
    #[instrument(skip(self, form, images), fields(collection = %self.collection, images = images.len()))]
    pub async fn create_listing(&self, form: ListingForm, images: Vec<SavedImage>) -> Result<CreatedListing, ServiceError> {
        let image_urls = images.iter().map(|i| i.public_path.clone()).collect();
        let vehicle = models::validate_listing(
            &form.make,
            &form.model,
            form.year,
            form.price,
            form.description.as_deref(),
            image_urls,
        )
        .map_err(|e| {
            warn!(event = "listing_invalid", error = %e, "listing rejected");
            ServiceError::Validation(e)
        })?;

        let id = match self.storage.insert(&self.collection, &vehicle).await {
            Ok(id) => id,
            Err(e) => {
                error!(event = "listing_insert_failed", error = %e, "insert failed; removing this request's images");
                self.images.discard(&images).await;
                return Err(e.into());
            }
        };

        info!(event = "listing_created", %id, make = %vehicle.make, model = %vehicle.model, "listing created");
        Ok(CreatedListing { id: id.to_string(), vehicle })
    }

    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn list_listings(&self) -> Result<Vec<ListingView>, ServiceError> {
        let docs = self.storage.find_all(&self.collection, None).await.map_err(|e| {
            error!(event = "listing_query_failed", error = %e, "list failed");
            ServiceError::from(e)
        })?;
        let views: Vec<ListingView> = docs.iter().map(serialize_listing).collect();
        info!(event = "listings_listed", count = views.len(), "listings fetched");
        Ok(views)
    }
}
