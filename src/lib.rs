//! Hypha results server library.
//!
//! Ingests JUnit and xUnit test reports per product and selects results
//! across related products with wildcard rules.

pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
