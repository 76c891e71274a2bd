//! Listing a collection scans by `collection` in insertion order.
use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_document::Document;

#[derive(DeriveMigrationName)]
pub struct Migration;

const IDX_COLLECTION_CREATED: &str = "idx_document_collection_created_at";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(IDX_COLLECTION_CREATED)
                    .table(Document::Table)
                    .col(Document::Collection)
                    .col(Document::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(IDX_COLLECTION_CREATED).table(Document::Table).to_owned())
            .await
    }
}
