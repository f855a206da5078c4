//! Migration: Create relationships table.
//!
//! Member ids are stored ordered, so the unique index covers the unordered pair.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_products::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Relationships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Relationships::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Relationships::ProductAId).uuid().not_null())
                    .col(ColumnDef::new(Relationships::ProductBId).uuid().not_null())
                    .col(
                        ColumnDef::new(Relationships::RelationshipType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Relationships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationships_product_a")
                            .from(Relationships::Table, Relationships::ProductAId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relationships_product_b")
                            .from(Relationships::Table, Relationships::ProductBId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_relationships_pair_type")
                    .table(Relationships::Table)
                    .col(Relationships::ProductAId)
                    .col(Relationships::ProductBId)
                    .col(Relationships::RelationshipType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_relationships_product_b")
                    .table(Relationships::Table)
                    .col(Relationships::ProductBId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Relationships::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Relationships {
    Table,
    Id,
    ProductAId,
    ProductBId,
    RelationshipType,
    CreatedAt,
}
