use async_trait::async_trait;

use super::{Document, DocumentId, DocumentStore, Filter, StorageError, StoreStatus, StoredDocument};

/// Stand-in when no database is configured: every data call fails, nothing panics.
#[derive(Debug, Clone)]
pub struct UnavailableDocumentStore {
    reason: String,
}

impl UnavailableDocumentStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    fn error(&self) -> StorageError {
        StorageError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl DocumentStore for UnavailableDocumentStore {
    async fn insert_one(&self, _collection: &str, _document: &Document) -> Result<DocumentId, StorageError> {
        Err(self.error())
    }

    async fn find_many(&self, _collection: &str, _filter: Option<&Filter>) -> Result<Vec<StoredDocument>, StorageError> {
        Err(self.error())
    }

    async fn collection_names(&self) -> Result<Vec<String>, StorageError> {
        Err(self.error())
    }

    fn status(&self) -> StoreStatus {
        StoreStatus { backend: "none", connected: false }
    }
}
