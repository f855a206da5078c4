//! xUnit (v2) decoder: `assemblies > assembly > collection > test`.
//!
//! Each collection becomes one suite and each test one case.

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::models::{CaseStatus, ParsedCase, ParsedProperty, ParsedReport, ParsedSuite};

use super::text::{lenient_f64, lenient_i32};
use super::{DecodeResult, root_element};

// ============================================================================
// xUnit XML Schema Structs
// ============================================================================

#[derive(Debug, Deserialize)]
struct XUnitAssemblies {
    #[serde(rename = "assembly", default)]
    assemblies: Vec<XUnitAssembly>,
}

#[derive(Debug, Deserialize)]
struct XUnitAssembly {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@test-framework", default)]
    _test_framework: Option<String>,
    #[serde(rename = "@run-date", default)]
    _run_date: Option<String>,
    #[serde(rename = "@run-time", default)]
    _run_time: Option<String>,
    #[serde(rename = "collection", default)]
    collections: Vec<XUnitCollection>,
}

#[derive(Debug, Deserialize)]
struct XUnitCollection {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@total", default, deserialize_with = "count")]
    total: i32,
    #[serde(rename = "@failed", default, deserialize_with = "count")]
    failed: i32,
    #[serde(rename = "@skipped", default, deserialize_with = "count")]
    skipped: i32,
    #[serde(rename = "@time", default, deserialize_with = "seconds")]
    time: f64,
    #[serde(rename = "test", default)]
    tests: Vec<XUnitTest>,
}

#[derive(Debug, Deserialize)]
struct XUnitTest {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@type", default)]
    test_type: String,
    #[serde(rename = "@method", default)]
    method: String,
    #[serde(rename = "@time", default, deserialize_with = "seconds")]
    time: f64,
    #[serde(rename = "@result", default)]
    result: String,
    #[serde(default)]
    failure: Option<XUnitFailure>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    traits: Option<XUnitTraits>,
}

#[derive(Debug, Deserialize)]
struct XUnitFailure {
    #[serde(rename = "@exception-type", default)]
    exception_type: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XUnitTraits {
    #[serde(rename = "trait", default)]
    items: Vec<XUnitTrait>,
}

#[derive(Debug, Deserialize)]
struct XUnitTrait {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@value", default)]
    value: String,
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(lenient_i32(&raw))
}

fn seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(lenient_f64(&raw))
}

// ============================================================================
// Conversion
// ============================================================================

/// Decode an `<assemblies>` document.
pub fn decode(xml: &str) -> DecodeResult<ParsedReport> {
    let root = root_element(xml)?.ok_or("document has no root element")?;
    if root.name != "assemblies" {
        return Err(format!("root element is <{}>, expected <assemblies>", root.name));
    }

    let document: XUnitAssemblies =
        quick_xml::de::from_str(xml).map_err(|e| format!("invalid xUnit document: {}", e))?;

    let suites = document
        .assemblies
        .into_iter()
        .flat_map(|assembly| {
            let file = Some(assembly.name).filter(|name| !name.is_empty());
            assembly
                .collections
                .into_iter()
                .map(move |collection| convert_collection(collection, file.clone()))
        })
        .collect();

    Ok(ParsedReport { suites })
}

fn convert_collection(collection: XUnitCollection, file: Option<String>) -> ParsedSuite {
    let cases: Vec<ParsedCase> = collection.tests.into_iter().map(convert_test).collect();

    let errors = cases
        .iter()
        .filter(|case| case.status == CaseStatus::Error)
        .count() as i32;
    let time = if collection.time > 0.0 {
        collection.time
    } else {
        cases.iter().map(|case| case.time).sum()
    };

    ParsedSuite {
        name: collection.name,
        tests: collection.total,
        failures: collection.failed,
        errors,
        skipped: collection.skipped,
        time,
        file,
        cases,
        ..ParsedSuite::default()
    }
}

fn convert_test(test: XUnitTest) -> ParsedCase {
    let status = CaseStatus::from_xunit(&test.result).unwrap_or_else(|| {
        warn!(
            test = %test.name,
            result = %test.result,
            "Unknown xUnit result, recording test as failed"
        );
        CaseStatus::Fail
    });

    let (message, failure_type) = match status {
        CaseStatus::Fail | CaseStatus::Error => match test.failure {
            Some(failure) => (
                Some(failure.message.unwrap_or_default()),
                Some(failure.exception_type.unwrap_or_default()),
            ),
            None => (Some(String::new()), Some(String::new())),
        },
        CaseStatus::Skipped => (Some(test.reason.unwrap_or_default()), None),
        CaseStatus::Pass => (None, None),
    };

    let name = if test.name.is_empty() {
        test.method
    } else {
        test.name
    };

    ParsedCase {
        classname: test.test_type,
        name,
        time: test.time,
        status,
        message,
        failure_type,
        system_out: test.output,
        properties: test
            .traits
            .map(|traits| {
                traits
                    .items
                    .into_iter()
                    .map(|t| ParsedProperty::new(t.name, t.value))
                    .collect()
            })
            .unwrap_or_default(),
        ..ParsedCase::default()
    }
}
