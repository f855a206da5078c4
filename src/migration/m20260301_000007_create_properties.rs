//! Migration: Create properties table.
//!
//! A property belongs to either a suite or a case, never both.

use sea_orm_migration::prelude::*;

use super::m20260301_000005_create_test_suites::TestSuites;
use super::m20260301_000006_create_test_cases::TestCases;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Properties::TestSuiteId).uuid())
                    .col(ColumnDef::new(Properties::TestCaseId).uuid())
                    .col(ColumnDef::new(Properties::Name).string().not_null())
                    .col(ColumnDef::new(Properties::Value).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_properties_test_suite")
                            .from(Properties::Table, Properties::TestSuiteId)
                            .to(TestSuites::Table, TestSuites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_properties_test_case")
                            .from(Properties::Table, Properties::TestCaseId)
                            .to(TestCases::Table, TestCases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_test_suite_id")
                    .table(Properties::Table)
                    .col(Properties::TestSuiteId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_test_case_id")
                    .table(Properties::Table)
                    .col(Properties::TestCaseId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    TestSuiteId,
    TestCaseId,
    Name,
    Value,
}
