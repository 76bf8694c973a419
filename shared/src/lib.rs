//! Shared types and models for the Trade Certificate Platform
//!
//! This crate contains the certificate and admin entities together with the
//! pure validation and derivation logic (quantity parsing, invoice totals)
//! used by the backend service and its test suites.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
