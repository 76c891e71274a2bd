use std::sync::Arc;

use models::Vehicle;
use tracing::{debug, instrument};

use super::{Document, DocumentId, DocumentStore, Filter, StorageError, StoreStatus, StoredDocument};

/// Bridges validated records and stored documents for a named collection.
/// Calls go straight to the store; nothing is retried here.
#[derive(Clone)]
pub struct StorageAdapter {
    store: Arc<dyn DocumentStore>,
}

impl StorageAdapter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    #[instrument(skip(self, record), fields(collection = %collection))]
    pub async fn insert(&self, collection: &str, record: &Vehicle) -> Result<DocumentId, StorageError> {
        let id = self.store.insert_one(collection, &Document::from(record)).await?;
        debug!(%id, "document inserted");
        Ok(id)
    }

    /// Documents in store order; `None` or an empty filter selects everything.
    #[instrument(skip(self, filter), fields(collection = %collection))]
    pub async fn find_all(&self, collection: &str, filter: Option<&Filter>) -> Result<Vec<StoredDocument>, StorageError> {
        let filter = filter.filter(|f| !f.is_empty());
        let docs = self.store.find_many(collection, filter).await?;
        debug!(count = docs.len(), "documents fetched");
        Ok(docs)
    }

    pub async fn collection_names(&self) -> Result<Vec<String>, StorageError> {
        self.store.collection_names().await
    }

    pub fn status(&self) -> StoreStatus { self.store.status() }
}
