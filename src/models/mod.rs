//! Domain models and DTOs for the Hypha results server.

pub mod case_status;
pub mod product;
pub mod relationship;
pub mod report;
pub mod results;
pub mod rule;

// Re-export commonly used types
pub use case_status::CaseStatus;
pub use product::{CreateProductRequest, Product, ProductQuery};
pub use relationship::{CreateRelationshipRequest, Integration, ProductPair, Relationship};
pub use report::{ParsedCase, ParsedProperty, ParsedReport, ParsedSuite, PropertyOwner};
pub use results::{IngestResponse, PropertyView, ResultView, TestCaseView, TestSuiteView};
pub use rule::{CreateRuleRequest, Rule, RuleResponse, RuleScope, ScopeSet};
