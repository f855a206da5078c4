//! Migration: Create results table.

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
                    .table(Results::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Results::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Results::ProductId).uuid().not_null())
                    .col(
                        ColumnDef::new(Results::DateReported)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_results_product")
                            .from(Results::Table, Results::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_results_product_id")
                    .table(Results::Table)
                    .col(Results::ProductId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Results::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Results {
    Table,
    Id,
    ProductId,
    DateReported,
}
