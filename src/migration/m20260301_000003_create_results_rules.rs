//! Migration: Create results_rules table.

use sea_orm_migration::prelude::*;

use super::m20260301_000002_create_relationships::Relationships;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ResultsRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResultsRules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ResultsRules::RelationshipId).uuid().not_null())
                    .col(ColumnDef::new(ResultsRules::Expression).string().not_null())
                    .col(
                        ColumnDef::new(ResultsRules::AppliesTo)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResultsRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ResultsRules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_results_rules_relationship")
                            .from(ResultsRules::Table, ResultsRules::RelationshipId)
                            .to(Relationships::Table, Relationships::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_results_rules_relationship_id")
                    .table(ResultsRules::Table)
                    .col(ResultsRules::RelationshipId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ResultsRules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ResultsRules {
    Table,
    Id,
    RelationshipId,
    Expression,
    AppliesTo,
    CreatedAt,
    UpdatedAt,
}
