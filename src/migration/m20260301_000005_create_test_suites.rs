//! Migration: Create test_suites table.

use sea_orm_migration::prelude::*;

use super::m20260301_000004_create_results::Results;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestSuites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestSuites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestSuites::ResultId).uuid().not_null())
                    .col(ColumnDef::new(TestSuites::Name).string().not_null())
                    .col(
                        ColumnDef::new(TestSuites::Tests)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TestSuites::Failures)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TestSuites::Errors)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TestSuites::Skipped)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TestSuites::Assertions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TestSuites::Time)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(TestSuites::File).string())
                    .col(ColumnDef::new(TestSuites::SystemOut).text())
                    .col(ColumnDef::new(TestSuites::SystemErr).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_suites_result")
                            .from(TestSuites::Table, TestSuites::ResultId)
                            .to(Results::Table, Results::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_suites_result_id")
                    .table(TestSuites::Table)
                    .col(TestSuites::ResultId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestSuites::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestSuites {
    Table,
    Id,
    ResultId,
    Name,
    Tests,
    Failures,
    Errors,
    Skipped,
    Assertions,
    Time,
    File,
    SystemOut,
    SystemErr,
}
