//! Public verification resolver
//!
//! Maps an external lookup key to a certificate. GUID keys fall back to the
//! legacy record id so links issued before guids existed keep resolving;
//! certificate-number keys have no fallback.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::CertificateService;

use shared::models::Certificate;
use shared::validation::derive_display_weight;

/// Lookup key supplied by the public verification page. When both query
/// parameters are present, the guid wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Guid(String),
    CertificateNumber(String),
}

/// Pick the lookup key from the two optional query parameters
pub fn choose_key(guid: Option<String>, cert_number: Option<String>) -> Option<LookupKey> {
    if let Some(guid) = guid.filter(|g| !g.trim().is_empty()) {
        return Some(LookupKey::Guid(guid.trim().to_string()));
    }
    cert_number
        .filter(|n| !n.trim().is_empty())
        .map(|n| LookupKey::CertificateNumber(n.trim().to_string()))
}

/// Verification service for the public lookup path
#[derive(Clone)]
pub struct VerificationService {
    certificates: CertificateService,
}

impl VerificationService {
    /// Create a new VerificationService instance
    pub fn new(db: PgPool) -> Self {
        Self {
            certificates: CertificateService::new(db),
        }
    }

    /// Resolve a lookup key to a certificate
    pub async fn resolve(&self, key: LookupKey) -> AppResult<Certificate> {
        let certificate = match key {
            LookupKey::Guid(guid) => match self.certificates.find_by_guid(&guid).await? {
                Some(certificate) => Some(certificate),
                // Older issued links carried the record id where the guid
                // now goes
                None => match Uuid::parse_str(&guid) {
                    Ok(id) => self.certificates.find(id).await?,
                    Err(_) => None,
                },
            },
            LookupKey::CertificateNumber(number) => {
                self.certificates.find_by_certificate_number(&number).await?
            }
        };

        let mut certificate =
            certificate.ok_or_else(|| AppError::NotFound("Certificate".to_string()))?;

        // The stored total normally holds; re-derive only when it is zero
        // or unparsable.
        certificate.invoice.total_weight =
            derive_display_weight(&certificate.invoice.total_weight, &certificate.products);

        Ok(certificate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_takes_precedence_over_certificate_number() {
        let key = choose_key(Some("abc-guid".into()), Some("V0528031".into()));
        assert_eq!(key, Some(LookupKey::Guid("abc-guid".into())));
    }

    #[test]
    fn certificate_number_used_when_guid_absent() {
        let key = choose_key(None, Some(" V0528031 ".into()));
        assert_eq!(key, Some(LookupKey::CertificateNumber("V0528031".into())));
    }

    #[test]
    fn blank_parameters_yield_no_key() {
        assert_eq!(choose_key(None, None), None);
        assert_eq!(choose_key(Some("  ".into()), Some("".into())), None);
    }

    #[test]
    fn blank_guid_falls_through_to_certificate_number() {
        let key = choose_key(Some("".into()), Some("V0528031".into()));
        assert_eq!(key, Some(LookupKey::CertificateNumber("V0528031".into())));
    }
}
