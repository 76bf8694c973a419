//! Business logic services for the Trade Certificate Platform

pub mod admin;
pub mod auth;
pub mod certificate;
pub mod seed;
pub mod verification;

pub use admin::AdminService;
pub use auth::AuthService;
pub use certificate::CertificateService;
pub use seed::SeedService;
pub use verification::VerificationService;
