//! Persistence gateway for results.
//!
//! Every sea-orm connection is a gateway, so the same code runs against the
//! shared pool and inside an open transaction.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::entity::{product, property, relationship, result, results_rule, test_case, test_suite};
use crate::error::{AppError, AppResult};
use crate::models::{ParsedCase, ParsedProperty, ParsedSuite, PropertyOwner};

/// Upper bound on ids bound into one `IN (...)` filter.
///
/// Keeps every statement well under the bind-parameter limits of SQLite
/// (32766) and PostgreSQL (65535).
pub const MAX_IDS_PER_QUERY: usize = 1000;

/// A suite row with its cases preloaded, cases ordered by id.
pub type SuiteWithCases = (test_suite::Model, Vec<test_case::Model>);

/// Store operations used by ingest and retrieval.
#[async_trait]
pub trait ResultsGateway: Send + Sync {
    /// Create a result row for `product_id`, reported now.
    async fn insert_result(&self, product_id: Uuid) -> AppResult<result::Model>;

    async fn insert_test_suite(
        &self,
        result_id: Uuid,
        suite: &ParsedSuite,
    ) -> AppResult<test_suite::Model>;

    async fn insert_test_case(
        &self,
        test_suite_id: Uuid,
        case: &ParsedCase,
    ) -> AppResult<test_case::Model>;

    async fn insert_property(
        &self,
        owner: PropertyOwner,
        property: &ParsedProperty,
    ) -> AppResult<property::Model>;

    async fn find_product(&self, id: Uuid) -> AppResult<product::Model>;

    async fn find_result(&self, id: Uuid) -> AppResult<result::Model>;

    async fn find_relationship(&self, id: Uuid) -> AppResult<relationship::Model>;

    /// Rules of a relationship, oldest first.
    async fn find_rules_by_relationship(
        &self,
        relationship_id: Uuid,
    ) -> AppResult<Vec<results_rule::Model>>;

    /// Suites whose result belongs to one of `product_ids`, with their cases.
    async fn query_suites_with_cases(&self, product_ids: &[Uuid])
    -> AppResult<Vec<SuiteWithCases>>;

    /// Suites belonging to the given results, with their cases.
    async fn query_suites_by_results(&self, result_ids: &[Uuid])
    -> AppResult<Vec<SuiteWithCases>>;

    /// Results of one product, oldest first.
    async fn query_results_by_product(&self, product_id: Uuid) -> AppResult<Vec<result::Model>>;

    /// Properties owned by any of the given suites or cases.
    async fn query_properties(
        &self,
        suite_ids: &[Uuid],
        case_ids: &[Uuid],
    ) -> AppResult<Vec<property::Model>>;
}

#[async_trait]
impl<C> ResultsGateway for C
where
    C: ConnectionTrait + Send + Sync,
{
    async fn insert_result(&self, product_id: Uuid) -> AppResult<result::Model> {
        let model = result::ActiveModel {
            id: Set(Uuid::now_v7()),
            product_id: Set(product_id),
            date_reported: Set(chrono::Utc::now()),
        };

        model
            .insert(self)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to insert result: {}", e)))
    }

    async fn insert_test_suite(
        &self,
        result_id: Uuid,
        suite: &ParsedSuite,
    ) -> AppResult<test_suite::Model> {
        let model = test_suite::ActiveModel {
            id: Set(Uuid::now_v7()),
            result_id: Set(result_id),
            name: Set(suite.name.clone()),
            tests: Set(suite.tests),
            failures: Set(suite.failures),
            errors: Set(suite.errors),
            skipped: Set(suite.skipped),
            assertions: Set(suite.assertions),
            time: Set(suite.time),
            file: Set(suite.file.clone()),
            system_out: Set(suite.system_out.clone()),
            system_err: Set(suite.system_err.clone()),
        };

        model
            .insert(self)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to insert test suite: {}", e)))
    }

    async fn insert_test_case(
        &self,
        test_suite_id: Uuid,
        case: &ParsedCase,
    ) -> AppResult<test_case::Model> {
        let model = test_case::ActiveModel {
            id: Set(Uuid::now_v7()),
            test_suite_id: Set(test_suite_id),
            classname: Set(case.classname.clone()),
            name: Set(case.name.clone()),
            time: Set(case.time),
            status: Set(case.status.as_str().to_string()),
            message: Set(case.message.clone()),
            failure_type: Set(case.failure_type.clone()),
            assertions: Set(case.assertions),
            file: Set(case.file.clone()),
            line: Set(case.line),
            system_out: Set(case.system_out.clone()),
            system_err: Set(case.system_err.clone()),
        };

        model
            .insert(self)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to insert test case: {}", e)))
    }

    async fn insert_property(
        &self,
        owner: PropertyOwner,
        property: &ParsedProperty,
    ) -> AppResult<property::Model> {
        let (test_suite_id, test_case_id) = owner.columns();
        let model = property::ActiveModel {
            id: Set(Uuid::now_v7()),
            test_suite_id: Set(test_suite_id),
            test_case_id: Set(test_case_id),
            name: Set(property.name.clone()),
            value: Set(property.value.clone()),
        };

        model
            .insert(self)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to insert property: {}", e)))
    }

    async fn find_product(&self, id: Uuid) -> AppResult<product::Model> {
        product::Entity::find_by_id(id)
            .one(self)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get product: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))
    }

    async fn find_result(&self, id: Uuid) -> AppResult<result::Model> {
        result::Entity::find_by_id(id)
            .one(self)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get result: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Result {}", id)))
    }

    async fn find_relationship(&self, id: Uuid) -> AppResult<relationship::Model> {
        relationship::Entity::find_by_id(id)
            .one(self)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get relationship: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Relationship {}", id)))
    }

    async fn find_rules_by_relationship(
        &self,
        relationship_id: Uuid,
    ) -> AppResult<Vec<results_rule::Model>> {
        results_rule::Entity::find()
            .filter(results_rule::Column::RelationshipId.eq(relationship_id))
            .order_by_asc(results_rule::Column::Id) // UUIDv7 is time-ordered
            .all(self)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get rules: {}", e)))
    }

    async fn query_suites_with_cases(
        &self,
        product_ids: &[Uuid],
    ) -> AppResult<Vec<SuiteWithCases>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let suites = test_suite::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                test_suite::Relation::Result.def(),
            )
            .filter(result::Column::ProductId.is_in(product_ids.iter().copied()))
            .order_by_asc(test_suite::Column::Id)
            .all(self)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get candidate suites: {}", e)))?;

        attach_cases(self, suites).await
    }

    async fn query_suites_by_results(
        &self,
        result_ids: &[Uuid],
    ) -> AppResult<Vec<SuiteWithCases>> {
        let mut suites = Vec::new();
        for chunk in result_ids.chunks(MAX_IDS_PER_QUERY) {
            let rows = test_suite::Entity::find()
                .filter(test_suite::Column::ResultId.is_in(chunk.iter().copied()))
                .all(self)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to get suites: {}", e)))?;
            suites.extend(rows);
        }
        suites.sort_by_key(|suite| suite.id);

        attach_cases(self, suites).await
    }

    async fn query_results_by_product(&self, product_id: Uuid) -> AppResult<Vec<result::Model>> {
        result::Entity::find()
            .filter(result::Column::ProductId.eq(product_id))
            .order_by_asc(result::Column::Id)
            .all(self)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get results: {}", e)))
    }

    async fn query_properties(
        &self,
        suite_ids: &[Uuid],
        case_ids: &[Uuid],
    ) -> AppResult<Vec<property::Model>> {
        let mut properties = Vec::new();

        // A property has exactly one owner, so the two passes never overlap
        for chunk in suite_ids.chunks(MAX_IDS_PER_QUERY) {
            let rows = property::Entity::find()
                .filter(property::Column::TestSuiteId.is_in(chunk.iter().copied()))
                .all(self)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to get suite properties: {}", e)))?;
            properties.extend(rows);
        }
        for chunk in case_ids.chunks(MAX_IDS_PER_QUERY) {
            let rows = property::Entity::find()
                .filter(property::Column::TestCaseId.is_in(chunk.iter().copied()))
                .all(self)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to get case properties: {}", e)))?;
            properties.extend(rows);
        }

        properties.sort_by_key(|property| property.id);
        Ok(properties)
    }
}

/// Preload the cases of `suites`, keeping suite order.
async fn attach_cases<C>(conn: &C, suites: Vec<test_suite::Model>) -> AppResult<Vec<SuiteWithCases>>
where
    C: ConnectionTrait,
{
    if suites.is_empty() {
        return Ok(Vec::new());
    }

    let suite_ids: Vec<Uuid> = suites.iter().map(|s| s.id).collect();
    let mut cases = Vec::new();
    for chunk in suite_ids.chunks(MAX_IDS_PER_QUERY) {
        let rows = test_case::Entity::find()
            .filter(test_case::Column::TestSuiteId.is_in(chunk.iter().copied()))
            .all(conn)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to get test cases: {}", e)))?;
        cases.extend(rows);
    }
    cases.sort_by_key(|case| case.id);

    let mut by_suite: BTreeMap<Uuid, Vec<test_case::Model>> = BTreeMap::new();
    for case in cases {
        by_suite.entry(case.test_suite_id).or_default().push(case);
    }

    Ok(suites
        .into_iter()
        .map(|suite| {
            let cases = by_suite.remove(&suite.id).unwrap_or_default();
            (suite, cases)
        })
        .collect())
}
