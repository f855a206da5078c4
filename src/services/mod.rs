//! Business logic services.

pub mod ingest;
pub mod matcher;
pub mod report_parser;
pub mod retrieval;

pub use ingest::ingest_report;
pub use matcher::matches_expression;
pub use report_parser::parse_report;
pub use retrieval::{retrieve_by_product, retrieve_by_relationship, select_suites};
