//! Test case outcome.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Derived status of a single test case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Pass,
    Fail,
    Error,
    Skipped,
}

impl CaseStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Error => "error",
            Self::Skipped => "skipped",
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Self {
        match s {
            "pass" => Self::Pass,
            "error" => Self::Error,
            "skipped" => Self::Skipped,
            _ => Self::Fail, // Unknown statuses are treated as failures
        }
    }

    /// Map an xUnit `result` attribute (`Pass`, `Fail`, `Skip`, ...) to a status.
    ///
    /// Returns `None` for values no dialect uses.
    pub fn from_xunit(result: &str) -> Option<Self> {
        match result.trim() {
            "Pass" | "pass" | "passed" | "Passed" => Some(Self::Pass),
            "Fail" | "fail" | "failed" | "Failed" => Some(Self::Fail),
            "Error" | "error" => Some(Self::Error),
            "Skip" | "skip" | "skipped" | "Skipped" | "NotRun" => Some(Self::Skipped),
            _ => None,
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
