//! HTTP handlers for the Trade Certificate Platform

pub mod admin;
pub mod auth;
pub mod certificate;
pub mod health;
pub mod seed;
pub mod verification;

pub use admin::*;
pub use auth::*;
pub use certificate::*;
pub use health::*;
pub use seed::*;
pub use verification::*;
