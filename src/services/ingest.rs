//! Report ingest: parse an uploaded report and persist one result per suite.

use sea_orm::{TransactionSession, TransactionTrait};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::ResultsGateway;
use crate::error::{AppError, AppResult};
use crate::models::{ParsedSuite, PropertyOwner};

use super::report_parser::parse_report;

/// Parse `bytes` and store every suite under `product_id`.
///
/// Each suite (its result row, properties, cases and case properties) is
/// written in its own transaction. A failure stops the upload: suites already
/// committed stay, the failing and remaining suites are not stored.
///
/// Returns the created result ids in document order.
pub async fn ingest_report<C>(conn: &C, product_id: Uuid, bytes: &[u8]) -> AppResult<Vec<Uuid>>
where
    C: ResultsGateway + TransactionTrait,
    C::Transaction: ResultsGateway,
{
    conn.find_product(product_id).await?;

    let report = parse_report(bytes)?;
    info!(
        product_id = %product_id,
        suites = report.suites.len(),
        cases = report.case_count(),
        "Parsed test report"
    );

    let mut result_ids = Vec::with_capacity(report.suites.len());
    for (index, suite) in report.suites.iter().enumerate() {
        let result_id = store_suite(conn, product_id, suite).await.inspect_err(|e| {
            warn!(
                product_id = %product_id,
                suite = %suite.name,
                stored = index,
                error = %e,
                "Aborting report ingest"
            );
        })?;
        result_ids.push(result_id);
    }

    Ok(result_ids)
}

/// Write one suite cascade atomically and return its result id.
async fn store_suite<C>(conn: &C, product_id: Uuid, suite: &ParsedSuite) -> AppResult<Uuid>
where
    C: TransactionTrait,
    C::Transaction: ResultsGateway,
{
    let txn = conn
        .begin()
        .await
        .map_err(|e| AppError::Storage(format!("Failed to begin transaction: {}", e)))?;

    let result_id = match write_suite(&txn, product_id, suite).await {
        Ok(result_id) => result_id,
        Err(e) => {
            if let Err(rollback) = txn.rollback().await {
                warn!(suite = %suite.name, error = %rollback, "Rollback failed");
            }
            return Err(e);
        }
    };

    txn.commit()
        .await
        .map_err(|e| AppError::Storage(format!("Failed to commit suite: {}", e)))?;

    info!(
        result_id = %result_id,
        suite = %suite.name,
        cases = suite.cases.len(),
        "Stored test suite"
    );

    Ok(result_id)
}

/// Insert the result, suite, cases and properties of one suite.
async fn write_suite<G>(gateway: &G, product_id: Uuid, suite: &ParsedSuite) -> AppResult<Uuid>
where
    G: ResultsGateway,
{
    let result = gateway.insert_result(product_id).await?;
    let suite_row = gateway.insert_test_suite(result.id, suite).await?;

    for property in &suite.properties {
        gateway
            .insert_property(PropertyOwner::Suite(suite_row.id), property)
            .await?;
    }

    for case in &suite.cases {
        let case_row = gateway.insert_test_case(suite_row.id, case).await?;
        for property in &case.properties {
            gateway
                .insert_property(PropertyOwner::Case(case_row.id), property)
                .await?;
        }
    }

    Ok(result.id)
}
