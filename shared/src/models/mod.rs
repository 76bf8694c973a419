//! Entity models for the Trade Certificate Platform

pub mod admin;
pub mod certificate;

pub use admin::*;
pub use certificate::*;
