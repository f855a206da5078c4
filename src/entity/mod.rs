//! SeaORM entity definitions.

pub mod product;
pub mod property;
pub mod relationship;
pub mod result;
pub mod results_rule;
pub mod test_case;
pub mod test_suite;
