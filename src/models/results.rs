//! Result views returned by ingest and retrieval.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{property, result, test_case, test_suite};

use super::CaseStatus;

/// One test run with the suites selected for it.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub id: Uuid,
    #[serde(rename = "productID")]
    pub product_id: Uuid,
    pub date_reported: DateTime<Utc>,
    pub test_suites: Vec<TestSuiteView>,
}

impl ResultView {
    pub fn new(model: result::Model, test_suites: Vec<TestSuiteView>) -> Self {
        ResultView {
            id: model.id,
            product_id: model.product_id,
            date_reported: model.date_reported,
            test_suites,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestSuiteView {
    pub id: Uuid,
    #[serde(rename = "resultID")]
    pub result_id: Uuid,
    pub name: String,
    pub tests: i32,
    pub failures: i32,
    pub errors: i32,
    pub skipped: i32,
    pub assertions: i32,
    pub time: f64,
    pub file: Option<String>,
    pub system_out: Option<String>,
    pub system_err: Option<String>,
    pub properties: Vec<PropertyView>,
    pub test_cases: Vec<TestCaseView>,
}

impl TestSuiteView {
    pub fn new(
        model: test_suite::Model,
        properties: Vec<PropertyView>,
        test_cases: Vec<TestCaseView>,
    ) -> Self {
        TestSuiteView {
            id: model.id,
            result_id: model.result_id,
            name: model.name,
            tests: model.tests,
            failures: model.failures,
            errors: model.errors,
            skipped: model.skipped,
            assertions: model.assertions,
            time: model.time,
            file: model.file,
            system_out: model.system_out,
            system_err: model.system_err,
            properties,
            test_cases,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseView {
    pub id: Uuid,
    #[serde(rename = "testSuiteID")]
    pub test_suite_id: Uuid,
    pub class_name: String,
    pub name: String,
    pub time: f64,
    pub status: CaseStatus,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub failure_type: Option<String>,
    pub assertions: i32,
    pub file: Option<String>,
    pub line: i32,
    pub system_out: Option<String>,
    pub system_err: Option<String>,
    pub properties: Vec<PropertyView>,
}

impl TestCaseView {
    pub fn new(model: test_case::Model, properties: Vec<PropertyView>) -> Self {
        TestCaseView {
            id: model.id,
            test_suite_id: model.test_suite_id,
            class_name: model.classname,
            name: model.name,
            time: model.time,
            status: CaseStatus::parse(&model.status),
            message: model.message,
            failure_type: model.failure_type,
            assertions: model.assertions,
            file: model.file,
            line: model.line,
            system_out: model.system_out,
            system_err: model.system_err,
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PropertyView {
    pub id: Uuid,
    pub name: String,
    pub value: String,
}

impl From<property::Model> for PropertyView {
    fn from(model: property::Model) -> Self {
        PropertyView {
            id: model.id,
            name: model.name,
            value: model.value,
        }
    }
}

/// Response for a successful report upload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngestResponse {
    /// Created result ids, one per suite, in document order
    #[serde(rename = "resultIDs")]
    pub result_ids: Vec<Uuid>,
}
