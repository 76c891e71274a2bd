use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

/// A stored document; `collection` plays the role of a document-store collection.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub collection: String,
    pub body: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_collection(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() || name.len() > 128 {
        return Err(errors::ModelError::Db("collection name must be 1..=128 characters".into()));
    }
    Ok(())
}

pub async fn insert(db: &DatabaseConnection, collection: &str, body: Json) -> Result<Model, errors::ModelError> {
    validate_collection(collection)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        collection: Set(collection.to_string()),
        body: Set(body),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All documents of a collection, oldest first.
pub async fn find_in_collection(db: &DatabaseConnection, collection: &str) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Collection.eq(collection))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn collection_names(db: &DatabaseConnection) -> Result<Vec<String>, errors::ModelError> {
    Entity::find()
        .select_only()
        .column(Column::Collection)
        .distinct()
        .order_by_asc(Column::Collection)
        .into_tuple::<String>()
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
