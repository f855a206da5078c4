//! Canonical parsed report tree.
//!
//! Every supported report dialect is decoded into these types before anything
//! is persisted.

use uuid::Uuid;

use super::CaseStatus;

/// A decoded report: one entry per suite, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReport {
    pub suites: Vec<ParsedSuite>,
}

impl ParsedReport {
    /// Total number of cases across all suites.
    pub fn case_count(&self) -> usize {
        self.suites.iter().map(|s| s.cases.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSuite {
    pub name: String,
    pub tests: i32,
    pub failures: i32,
    pub errors: i32,
    pub skipped: i32,
    pub assertions: i32,
    /// Elapsed seconds
    pub time: f64,
    pub file: Option<String>,
    pub system_out: Option<String>,
    pub system_err: Option<String>,
    pub properties: Vec<ParsedProperty>,
    pub cases: Vec<ParsedCase>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCase {
    pub classname: String,
    pub name: String,
    pub time: f64,
    pub status: CaseStatus,
    pub message: Option<String>,
    pub failure_type: Option<String>,
    pub assertions: i32,
    pub file: Option<String>,
    pub line: i32,
    pub system_out: Option<String>,
    pub system_err: Option<String>,
    pub properties: Vec<ParsedProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedProperty {
    pub name: String,
    pub value: String,
}

impl ParsedProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        ParsedProperty {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The single row a property is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOwner {
    Suite(Uuid),
    Case(Uuid),
}

impl PropertyOwner {
    /// Split into the `(test_suite_id, test_case_id)` column pair.
    pub fn columns(&self) -> (Option<Uuid>, Option<Uuid>) {
        match *self {
            Self::Suite(id) => (Some(id), None),
            Self::Case(id) => (None, Some(id)),
        }
    }
}
