//! Integration test suite.
//!
//! Tests are organized by store:
//! 1. Config lifecycle (bootstrap, edit, reload)
//! 2. Tabular log properties

pub mod config_lifecycle_tests;
pub mod tabular_property_tests;
