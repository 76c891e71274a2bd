use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{matches_filter, Document, DocumentId, DocumentStore, Filter, StorageError, StoreStatus, StoredDocument};

type Collection = Vec<(DocumentId, serde_json::Value)>;

/// Process-local document store keeping raw JSON bodies in insertion order.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Insert a raw body as-is, bypassing the typed document.
    pub async fn insert_raw(&self, collection: &str, body: serde_json::Value) -> DocumentId {
        let id = DocumentId::generate();
        let mut map = self.inner.write().await;
        map.entry(collection.to_string()).or_default().push((id, body));
        id
    }

    pub async fn len(&self, collection: &str) -> usize {
        let map = self.inner.read().await;
        map.get(collection).map(Vec::len).unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(&self, collection: &str, document: &Document) -> Result<DocumentId, StorageError> {
        if collection.trim().is_empty() {
            return Err(StorageError::Rejected("collection name must not be empty".into()));
        }
        let mut stamped = document.clone();
        stamped.created_at.get_or_insert_with(Utc::now);
        let body = stamped.to_json()?;
        Ok(self.insert_raw(collection, body).await)
    }

    async fn find_many(&self, collection: &str, filter: Option<&Filter>) -> Result<Vec<StoredDocument>, StorageError> {
        let map = self.inner.read().await;
        let Some(rows) = map.get(collection) else { return Ok(Vec::new()); };
        rows.iter()
            .filter(|(_, body)| matches_filter(filter, body))
            .map(|(id, body)| {
                Ok(StoredDocument { id: Some(*id), document: Document::from_json(body.clone())? })
            })
            .collect()
    }

    async fn collection_names(&self) -> Result<Vec<String>, StorageError> {
        let map = self.inner.read().await;
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn status(&self) -> StoreStatus {
        StoreStatus { backend: "memory", connected: true }
    }
}
