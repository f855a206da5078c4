//! Ingest tests: reports persisted through the results gateway.

use hypha_lib::db::ResultsGateway;
use hypha_lib::error::AppError;
use hypha_lib::services::{ingest_report, retrieve_by_product};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use super::test_helpers::*;

/// Each suite of a JUnit report becomes its own result.
#[actix_rt::test]
async fn test_ingest_creates_one_result_per_suite() {
    let pool = create_test_pool().await;
    let product = seed_product(&pool, "chat").await;

    let result_ids = ingest_report(pool.connection(), product.id, INTEGRATION_REPORT.as_bytes())
        .await
        .expect("ingest");
    assert_eq!(result_ids.len(), 2);

    let stored = pool
        .connection()
        .query_results_by_product(product.id)
        .await
        .unwrap();
    let stored_ids: Vec<Uuid> = stored.iter().map(|r| r.id).collect();
    assert_eq!(stored_ids, result_ids);
    assert!(stored.iter().all(|r| r.product_id == product.id));
}

/// The stored tree keeps statuses, failure details and properties.
#[actix_rt::test]
async fn test_ingest_persists_full_tree() {
    let pool = create_test_pool().await;
    let product = seed_product(&pool, "chat").await;
    ingest_report(pool.connection(), product.id, INTEGRATION_REPORT.as_bytes())
        .await
        .unwrap();

    let results = retrieve_by_product(pool.connection(), product.id)
        .await
        .unwrap();
    assert_eq!(results.len(), 2);

    let login = &results[0].test_suites[0];
    assert_eq!(login.name, "IntegrationLogin");
    assert_eq!((login.tests, login.failures), (2, 1));
    assert_eq!(login.properties.len(), 1);
    assert_eq!(login.properties[0].name, "browser");
    assert_eq!(login.properties[0].value, "firefox");

    let failed = &login.test_cases[1];
    assert_eq!(failed.name, "testB");
    assert_eq!(failed.status.as_str(), "fail");
    assert_eq!(failed.message.as_deref(), Some("expected 200"));
    assert_eq!(failed.failure_type.as_deref(), Some("AssertionError"));

    assert_eq!(results[1].test_suites[0].name, "UnitMath");
}

/// xUnit reports go through the same pipeline.
#[actix_rt::test]
async fn test_ingest_xunit_report() {
    let pool = create_test_pool().await;
    let product = seed_product(&pool, "desktop").await;
    let xml = r#"<assemblies>
  <assembly name="Desktop.Tests.dll">
    <collection name="Startup" total="2" failed="1">
      <test name="Desktop.Tests.Boots" type="Desktop.Tests" method="Boots" time="0.2" result="Pass">
        <traits><trait name="Category" value="Smoke"/></traits>
      </test>
      <test name="Desktop.Tests.Crashes" type="Desktop.Tests" method="Crashes" time="0.3" result="Fail">
        <failure exception-type="System.Exception"><message>boom</message></failure>
      </test>
    </collection>
  </assembly>
</assemblies>"#;

    let result_ids = ingest_report(pool.connection(), product.id, xml.as_bytes())
        .await
        .unwrap();
    assert_eq!(result_ids.len(), 1);

    let results = retrieve_by_product(pool.connection(), product.id)
        .await
        .unwrap();
    let suite = &results[0].test_suites[0];
    assert_eq!(suite.name, "Startup");
    assert_eq!(suite.file.as_deref(), Some("Desktop.Tests.dll"));
    assert_eq!(suite.test_cases[0].properties[0].value, "Smoke");
    assert_eq!(suite.test_cases[1].message.as_deref(), Some("boom"));
}

/// Unknown products are rejected before the report is parsed.
#[actix_rt::test]
async fn test_ingest_unknown_product() {
    let pool = create_test_pool().await;
    let err = ingest_report(pool.connection(), Uuid::now_v7(), b"not xml")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{:?}", err);
}

/// Unparseable reports store nothing.
#[actix_rt::test]
async fn test_ingest_invalid_report_stores_nothing() {
    let pool = create_test_pool().await;
    let product = seed_product(&pool, "chat").await;

    let err = ingest_report(pool.connection(), product.id, b"<html><body/></html>")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidFormat(_)), "{:?}", err);

    let stored = pool
        .connection()
        .query_results_by_product(product.id)
        .await
        .unwrap();
    assert!(stored.is_empty());
}

/// A report without suites succeeds with no results.
#[actix_rt::test]
async fn test_ingest_empty_suites_element() {
    let pool = create_test_pool().await;
    let product = seed_product(&pool, "chat").await;

    let result_ids = ingest_report(pool.connection(), product.id, b"<testsuites/>")
        .await
        .unwrap();
    assert!(result_ids.is_empty());
}

/// A failing suite is rolled back as a whole; suites before it stay committed.
#[actix_rt::test]
async fn test_ingest_failure_rolls_back_only_the_failing_suite() {
    let pool = create_test_pool().await;
    let product = seed_product(&pool, "chat").await;

    // First suite has no properties, the second one does
    let xml = r#"<testsuites>
  <testsuite name="Plain"><testcase name="ok"/></testsuite>
  <testsuite name="WithProperties">
    <properties><property name="k" value="v"/></properties>
    <testcase name="ok"/>
  </testsuite>
  <testsuite name="Never"><testcase name="ok"/></testsuite>
</testsuites>"#;

    pool.connection()
        .execute_unprepared("DROP TABLE properties")
        .await
        .unwrap();

    let err = ingest_report(pool.connection(), product.id, xml.as_bytes())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Storage(_)), "{:?}", err);

    let stored = pool
        .connection()
        .query_results_by_product(product.id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);

    let suites = pool
        .connection()
        .query_suites_by_results(&[stored[0].id])
        .await
        .unwrap();
    assert_eq!(suites.len(), 1);
    assert_eq!(suites[0].0.name, "Plain");
    assert_eq!(suites[0].1.len(), 1);
}
