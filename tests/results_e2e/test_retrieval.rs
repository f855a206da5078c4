//! Retrieval tests: rules selecting results across an integration.

use async_trait::async_trait;
use hypha_lib::db::{ResultsGateway, SuiteWithCases};
use hypha_lib::entity::{product, property, relationship, result, results_rule, test_case, test_suite};
use hypha_lib::error::{AppError, AppResult};
use hypha_lib::models::{ParsedCase, ParsedProperty, ParsedSuite, PropertyOwner};
use hypha_lib::services::{ingest_report, retrieve_by_relationship};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::test_helpers::*;

const SECOND_PRODUCT_REPORT: &str = r#"<testsuites>
  <testsuite name="IntegrationSearch">
    <testcase name="finds"/>
  </testsuite>
  <testsuite name="Smoke">
    <testcase name="testB"/>
    <testcase name="boots"/>
  </testsuite>
</testsuites>"#;

/// Ingest a report for each product and link them.
async fn seed_integration_with_reports(
    pool: &hypha_lib::db::DbPool,
) -> (Uuid, Uuid, Uuid) {
    let chat = seed_product(pool, "chat").await;
    let calls = seed_product(pool, "calls").await;
    ingest_report(pool.connection(), chat.id, INTEGRATION_REPORT.as_bytes())
        .await
        .unwrap();
    ingest_report(pool.connection(), calls.id, SECOND_PRODUCT_REPORT.as_bytes())
        .await
        .unwrap();
    let relationship_id = seed_integration(pool, chat.id, calls.id).await;
    (relationship_id, chat.id, calls.id)
}

fn names(results: &[hypha_lib::models::ResultView]) -> Vec<(String, Vec<String>)> {
    results
        .iter()
        .flat_map(|r| r.test_suites.iter())
        .map(|s| {
            (
                s.name.clone(),
                s.test_cases.iter().map(|c| c.name.clone()).collect(),
            )
        })
        .collect()
}

/// Suite-level wildcard rule keeps matching suites of both products with all cases.
#[actix_rt::test]
async fn test_suite_rule_selects_across_both_products() {
    let pool = create_test_pool().await;
    let (relationship_id, chat_id, calls_id) = seed_integration_with_reports(&pool).await;
    seed_rule(&pool, relationship_id, "Integration*", &["suite"]).await;

    let results = retrieve_by_relationship(pool.connection(), relationship_id)
        .await
        .unwrap();

    assert_eq!(
        names(&results),
        vec![
            (
                "IntegrationLogin".to_string(),
                vec!["testA".to_string(), "testB".to_string()]
            ),
            ("IntegrationSearch".to_string(), vec!["finds".to_string()]),
        ]
    );
    assert_eq!(results[0].product_id, chat_id);
    assert_eq!(results[1].product_id, calls_id);

    // Selected suites carry their properties
    assert_eq!(results[0].test_suites[0].properties[0].name, "browser");
}

/// Negated case-level rule keeps every case except the named one.
#[actix_rt::test]
async fn test_negated_case_rule() {
    let pool = create_test_pool().await;
    let (relationship_id, _, _) = seed_integration_with_reports(&pool).await;
    seed_rule(&pool, relationship_id, "!testB", &["case"]).await;

    let results = retrieve_by_relationship(pool.connection(), relationship_id)
        .await
        .unwrap();

    assert_eq!(
        names(&results),
        vec![
            ("IntegrationLogin".to_string(), vec!["testA".to_string()]),
            ("UnitMath".to_string(), vec!["adds".to_string()]),
            ("IntegrationSearch".to_string(), vec!["finds".to_string()]),
            ("Smoke".to_string(), vec!["boots".to_string()]),
        ]
    );
}

/// A relationship without rules selects nothing.
#[actix_rt::test]
async fn test_no_rules_returns_empty() {
    let pool = create_test_pool().await;
    let (relationship_id, _, _) = seed_integration_with_reports(&pool).await;

    let results = retrieve_by_relationship(pool.connection(), relationship_id)
        .await
        .unwrap();
    assert!(results.is_empty());
}

/// Rules that match nothing give an empty list, not an error.
#[actix_rt::test]
async fn test_unmatched_rule_returns_empty() {
    let pool = create_test_pool().await;
    let (relationship_id, _, _) = seed_integration_with_reports(&pool).await;
    seed_rule(&pool, relationship_id, "Nothing*Here", &["suite", "case"]).await;

    let results = retrieve_by_relationship(pool.connection(), relationship_id)
        .await
        .unwrap();
    assert!(results.is_empty());
}

/// Results of products outside the relationship are never selected.
#[actix_rt::test]
async fn test_other_products_are_ignored() {
    let pool = create_test_pool().await;
    let (relationship_id, _, _) = seed_integration_with_reports(&pool).await;
    let outsider = seed_product(&pool, "boards").await;
    ingest_report(
        pool.connection(),
        outsider.id,
        b"<testsuite name=\"IntegrationBoards\"><testcase name=\"x\"/></testsuite>",
    )
    .await
    .unwrap();
    seed_rule(&pool, relationship_id, "Integration*", &["suite"]).await;

    let results = retrieve_by_relationship(pool.connection(), relationship_id)
        .await
        .unwrap();
    assert!(
        names(&results)
            .iter()
            .all(|(suite, _)| suite != "IntegrationBoards")
    );
    assert_eq!(results.len(), 2);
}

/// Unknown relationships are reported as not found.
#[actix_rt::test]
async fn test_unknown_relationship() {
    let pool = create_test_pool().await;
    let err = retrieve_by_relationship(pool.connection(), Uuid::now_v7())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{:?}", err);
}

/// More selected cases than SQLite binds in one statement.
#[actix_rt::test]
async fn test_selection_larger_than_bind_limit() {
    const CASES: usize = 33_000;

    let pool = create_test_pool().await;
    let chat = seed_product(&pool, "chat").await;
    let calls = seed_product(&pool, "calls").await;

    let mut xml = String::from("<testsuites><testsuite name=\"Huge\">");
    for i in 0..CASES - 1 {
        xml.push_str(&format!("<testcase name=\"t{}\"/>", i));
    }
    xml.push_str(&format!(
        "<testcase name=\"t{}\"><properties><property name=\"last\" value=\"yes\"/></properties></testcase>",
        CASES - 1
    ));
    xml.push_str("</testsuite></testsuites>");

    ingest_report(pool.connection(), chat.id, xml.as_bytes())
        .await
        .unwrap();
    let relationship_id = seed_integration(&pool, chat.id, calls.id).await;
    seed_rule(&pool, relationship_id, "t*", &["case"]).await;

    let results = retrieve_by_relationship(pool.connection(), relationship_id)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    let cases = &results[0].test_suites[0].test_cases;
    assert_eq!(cases.len(), CASES);
    assert_eq!(cases[0].name, "t0");
    let last = &cases[CASES - 1];
    assert_eq!(last.name, format!("t{}", CASES - 1));
    assert_eq!(last.properties.len(), 1);
    assert_eq!(last.properties[0].name, "last");
}

/// Gateway whose `find_result` reports one result as gone, as after a
/// concurrent product deletion.
struct VanishedResult<'a> {
    inner: &'a DatabaseConnection,
    vanished: Uuid,
}

#[async_trait]
impl ResultsGateway for VanishedResult<'_> {
    async fn insert_result(&self, product_id: Uuid) -> AppResult<result::Model> {
        self.inner.insert_result(product_id).await
    }

    async fn insert_test_suite(
        &self,
        result_id: Uuid,
        suite: &ParsedSuite,
    ) -> AppResult<test_suite::Model> {
        self.inner.insert_test_suite(result_id, suite).await
    }

    async fn insert_test_case(
        &self,
        test_suite_id: Uuid,
        case: &ParsedCase,
    ) -> AppResult<test_case::Model> {
        self.inner.insert_test_case(test_suite_id, case).await
    }

    async fn insert_property(
        &self,
        owner: PropertyOwner,
        property: &ParsedProperty,
    ) -> AppResult<property::Model> {
        self.inner.insert_property(owner, property).await
    }

    async fn find_product(&self, id: Uuid) -> AppResult<product::Model> {
        self.inner.find_product(id).await
    }

    async fn find_result(&self, id: Uuid) -> AppResult<result::Model> {
        if id == self.vanished {
            return Err(AppError::NotFound(format!("Result {}", id)));
        }
        self.inner.find_result(id).await
    }

    async fn find_relationship(&self, id: Uuid) -> AppResult<relationship::Model> {
        self.inner.find_relationship(id).await
    }

    async fn find_rules_by_relationship(
        &self,
        relationship_id: Uuid,
    ) -> AppResult<Vec<results_rule::Model>> {
        self.inner.find_rules_by_relationship(relationship_id).await
    }

    async fn query_suites_with_cases(
        &self,
        product_ids: &[Uuid],
    ) -> AppResult<Vec<SuiteWithCases>> {
        self.inner.query_suites_with_cases(product_ids).await
    }

    async fn query_suites_by_results(
        &self,
        result_ids: &[Uuid],
    ) -> AppResult<Vec<SuiteWithCases>> {
        self.inner.query_suites_by_results(result_ids).await
    }

    async fn query_results_by_product(&self, product_id: Uuid) -> AppResult<Vec<result::Model>> {
        self.inner.query_results_by_product(product_id).await
    }

    async fn query_properties(
        &self,
        suite_ids: &[Uuid],
        case_ids: &[Uuid],
    ) -> AppResult<Vec<property::Model>> {
        self.inner.query_properties(suite_ids, case_ids).await
    }
}

/// A selected result that disappears mid-request is left out, not a 404.
#[actix_rt::test]
async fn test_vanished_result_is_skipped() {
    let pool = create_test_pool().await;
    let chat = seed_product(&pool, "chat").await;
    let calls = seed_product(&pool, "calls").await;
    let result_ids = ingest_report(pool.connection(), chat.id, INTEGRATION_REPORT.as_bytes())
        .await
        .unwrap();
    let relationship_id = seed_integration(&pool, chat.id, calls.id).await;
    seed_rule(&pool, relationship_id, "*", &["suite"]).await;

    let gateway = VanishedResult {
        inner: pool.connection(),
        vanished: result_ids[0],
    };
    let results = retrieve_by_relationship(&gateway, relationship_id)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, result_ids[1]);
    assert_eq!(results[0].test_suites[0].name, "UnitMath");
}
