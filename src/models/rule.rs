//! Retrieval rule models.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::results_rule;
use crate::error::{AppError, AppResult};

/// Level of the result hierarchy a rule expression is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleScope {
    Suite,
    Case,
}

impl RuleScope {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suite => "suite",
            Self::Case => "case",
        }
    }

    /// Parse a scope tag. Singular and plural forms are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "suite" | "suites" | "testsuite" => Some(Self::Suite),
            "case" | "cases" | "testcase" => Some(Self::Case),
            _ => None,
        }
    }
}

impl std::fmt::Display for RuleScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set of scopes a rule applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSet(BTreeSet<RuleScope>);

impl ScopeSet {
    /// Build a scope set from request tags, rejecting unknown ones.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> AppResult<Self> {
        let mut scopes = BTreeSet::new();
        for tag in tags {
            let tag = tag.as_ref();
            let scope = RuleScope::parse(tag)
                .ok_or_else(|| AppError::Validation(format!("Unknown rule scope '{}'", tag)))?;
            scopes.insert(scope);
        }
        Ok(Self(scopes))
    }

    /// Decode the stored comma-separated form. Unknown tags are ignored.
    pub fn from_stored(stored: &str) -> Self {
        Self(stored.split(',').filter_map(RuleScope::parse).collect())
    }

    /// Encode for storage, e.g. `suite,case`.
    pub fn to_stored(&self) -> String {
        self.0
            .iter()
            .map(RuleScope::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn contains(&self, scope: RuleScope) -> bool {
        self.0.contains(&scope)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RuleScope> + '_ {
        self.0.iter().copied()
    }
}

/// A rule ready for evaluation.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: Uuid,
    pub expression: String,
    pub scopes: ScopeSet,
}

impl From<&results_rule::Model> for Rule {
    fn from(model: &results_rule::Model) -> Self {
        Rule {
            id: model.id,
            expression: model.expression.clone(),
            scopes: ScopeSet::from_stored(&model.applies_to),
        }
    }
}

/// Request body for creating a rule.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleRequest {
    /// Wildcard expression; `*` matches any run of characters, a leading `!` negates
    pub expression: String,
    /// Scope tags: `suite`, `case`
    pub applies_to: Vec<String>,
    #[serde(alias = "relationshipID", alias = "relationId", alias = "relationID")]
    pub relationship_id: Uuid,
}

/// Rule as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuleResponse {
    pub id: Uuid,
    #[serde(rename = "relationshipID")]
    pub relationship_id: Uuid,
    pub expression: String,
    pub applies_to: Vec<RuleScope>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<results_rule::Model> for RuleResponse {
    fn from(model: results_rule::Model) -> Self {
        RuleResponse {
            id: model.id,
            relationship_id: model.relationship_id,
            applies_to: ScopeSet::from_stored(&model.applies_to).iter().collect(),
            expression: model.expression,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
