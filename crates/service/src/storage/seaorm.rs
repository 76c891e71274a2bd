use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{document, ModelError};
use sea_orm::DatabaseConnection;

use super::{matches_filter, Document, DocumentId, DocumentStore, Filter, StorageError, StoreStatus, StoredDocument};

/// SeaORM-backed store over the `document` table.
pub struct SeaOrmDocumentStore {
    pub db: DatabaseConnection,
}

impl SeaOrmDocumentStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn write_error(e: ModelError) -> StorageError {
    match e {
        ModelError::Db(msg) => StorageError::Rejected(msg),
    }
}

fn query_error(e: ModelError) -> StorageError {
    StorageError::Query(e.to_string())
}

fn decode_row(row: document::Model) -> Result<StoredDocument, StorageError> {
    let mut doc = Document::from_json(row.body)?;
    if doc.created_at.is_none() {
        let created: DateTime<Utc> = row.created_at.into();
        doc.created_at = Some(created);
    }
    Ok(StoredDocument { id: Some(DocumentId::from(row.id)), document: doc })
}

#[async_trait]
impl DocumentStore for SeaOrmDocumentStore {
    async fn insert_one(&self, collection: &str, doc: &Document) -> Result<DocumentId, StorageError> {
        // created_at lives in its own column
        let body = Document { created_at: None, ..doc.clone() }.to_json()?;
        let row = document::insert(&self.db, collection, body).await.map_err(write_error)?;
        Ok(DocumentId::from(row.id))
    }

    async fn find_many(&self, collection: &str, filter: Option<&Filter>) -> Result<Vec<StoredDocument>, StorageError> {
        let rows = document::find_in_collection(&self.db, collection).await.map_err(query_error)?;
        rows.into_iter()
            .filter(|row| matches_filter(filter, &row.body))
            .map(decode_row)
            .collect()
    }

    async fn collection_names(&self) -> Result<Vec<String>, StorageError> {
        document::collection_names(&self.db).await.map_err(query_error)
    }

    fn status(&self) -> StoreStatus {
        StoreStatus { backend: "postgres", connected: true }
    }
}
