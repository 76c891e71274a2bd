//! Storage abstractions for the service layer
//!
//! `DocumentStore` is the seam to the external document database. Records
//! cross it only as [`Document`], a typed view with every field optional,
//! so nothing past the adapter handles an untyped map.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use models::Vehicle;

pub mod adapter;
pub mod memory;
pub mod seaorm;
pub mod unavailable;

pub use adapter::StorageAdapter;
pub use memory::MemoryDocumentStore;
pub use seaorm::SeaOrmDocumentStore;
pub use unavailable::UnavailableDocumentStore;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("document store rejected the write: {0}")]
    Rejected(String),
    #[error("document query failed: {0}")]
    Query(String),
    #[error("stored document could not be decoded: {0}")]
    Decode(String),
}

/// Store-generated identifier; clients only ever see its text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn generate() -> Self { Self(Uuid::new_v4()) }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self { Self(id) }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Stored shape of a listing. Unknown fields in a raw document are dropped on decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Vehicle> for Document {
    fn from(v: &Vehicle) -> Self {
        Self {
            make: Some(v.make.clone()),
            model: Some(v.model.clone()),
            year: Some(i64::from(v.year)),
            price: Some(v.price),
            description: v.description.clone(),
            image_urls: Some(v.image_urls.clone()),
            created_at: None,
        }
    }
}

impl Document {
    pub fn to_json(&self) -> Result<serde_json::Value, StorageError> {
        serde_json::to_value(self).map_err(|e| StorageError::Rejected(e.to_string()))
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, StorageError> {
        serde_json::from_value(value).map_err(|e| StorageError::Decode(e.to_string()))
    }
}

/// A document as returned by the store, with its generated identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: Option<DocumentId>,
    pub document: Document,
}

/// Field equality filter; empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(BTreeMap<String, serde_json::Value>);

impl Filter {
    pub fn new() -> Self { Self::default() }

    pub fn field_eq(mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// True when every filtered field is present in `body` with an equal value.
    pub fn matches(&self, body: &serde_json::Value) -> bool {
        self.0.iter().all(|(k, v)| body.get(k) == Some(v))
    }
}

pub(crate) fn matches_filter(filter: Option<&Filter>, body: &serde_json::Value) -> bool {
    filter.map(|f| f.matches(body)).unwrap_or(true)
}

/// Which backend is installed and whether it can serve data calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatus {
    pub backend: &'static str,
    pub connected: bool,
}

/// Insert-one / find-many contract of the external document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_one(&self, collection: &str, document: &Document) -> Result<DocumentId, StorageError>;
    async fn find_many(&self, collection: &str, filter: Option<&Filter>) -> Result<Vec<StoredDocument>, StorageError>;
    async fn collection_names(&self) -> Result<Vec<String>, StorageError>;
    fn status(&self) -> StoreStatus;
}
