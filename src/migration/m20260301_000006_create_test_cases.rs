//! Migration: Create test_cases table.

use sea_orm_migration::prelude::*;

use super::m20260301_000005_create_test_suites::TestSuites;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestCases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestCases::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestCases::TestSuiteId).uuid().not_null())
                    .col(ColumnDef::new(TestCases::Classname).string().not_null())
                    .col(ColumnDef::new(TestCases::Name).string().not_null())
                    .col(
                        ColumnDef::new(TestCases::Time)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(TestCases::Status).string_len(20).not_null())
                    .col(ColumnDef::new(TestCases::Message).text())
                    .col(ColumnDef::new(TestCases::FailureType).string())
                    .col(
                        ColumnDef::new(TestCases::Assertions)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(TestCases::File).string())
                    .col(
                        ColumnDef::new(TestCases::Line)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(TestCases::SystemOut).text())
                    .col(ColumnDef::new(TestCases::SystemErr).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_cases_test_suite")
                            .from(TestCases::Table, TestCases::TestSuiteId)
                            .to(TestSuites::Table, TestSuites::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_cases_test_suite_id")
                    .table(TestCases::Table)
                    .col(TestCases::TestSuiteId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestCases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestCases {
    Table,
    Id,
    TestSuiteId,
    Classname,
    Name,
    Time,
    Status,
    Message,
    FailureType,
    Assertions,
    File,
    Line,
    SystemOut,
    SystemErr,
}
