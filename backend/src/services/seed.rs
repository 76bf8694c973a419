//! Development seeding
//!
//! Inserts a reference certificate when absent and bootstraps a default
//! super-admin when the admin table is empty.

use serde::Serialize;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::admin::CreateAdminInput;
use crate::services::certificate::{CreateCertificateInput, InvoiceInput, NewProduct};
use crate::services::{AdminService, CertificateService};

use shared::models::{AdminRole, CertificateInfo, ProductUnit};

/// Seeding service
#[derive(Clone)]
pub struct SeedService {
    certificates: CertificateService,
    admins: AdminService,
}

/// Outcome of a seed run
#[derive(Debug, Serialize)]
pub struct SeedOutcome {
    pub certificate_created: bool,
    pub admin_created: bool,
}

const SEED_CERTIFICATE_NUMBER: &str = "V0528031";

impl SeedService {
    /// Create a new SeedService instance
    pub fn new(db: PgPool) -> Self {
        Self {
            certificates: CertificateService::new(db.clone()),
            admins: AdminService::new(db),
        }
    }

    /// Seed the database. Only allowed in development unless force-enabled.
    pub async fn seed(&self, config: &Config) -> AppResult<SeedOutcome> {
        if config.environment != "development" && !config.seed.force {
            return Err(AppError::Forbidden(
                "Seeding is only available in development mode".to_string(),
            ));
        }

        let certificate_created = if self
            .certificates
            .find_by_certificate_number(SEED_CERTIFICATE_NUMBER)
            .await?
            .is_none()
        {
            self.certificates.create(reference_certificate()).await?;
            true
        } else {
            false
        };

        let admin_created = if self.admins.count().await? == 0 {
            self.admins
                .create(CreateAdminInput {
                    name: "Administrator".to_string(),
                    email: config.seed.admin_email.clone(),
                    password: config.seed.admin_password.clone(),
                    role: AdminRole::SuperAdmin,
                    is_active: true,
                })
                .await?;
            true
        } else {
            false
        };

        tracing::info!(
            certificate_created,
            admin_created,
            "Seed run completed"
        );

        Ok(SeedOutcome {
            certificate_created,
            admin_created,
        })
    }
}

/// The reference certificate used by the verification demo page
fn reference_certificate() -> CreateCertificateInput {
    let kgs = |description: &str, quantity: &str| NewProduct {
        description: description.to_string(),
        quantity: quantity.to_string(),
        unit: ProductUnit::Kgs,
    };

    CreateCertificateInput {
        guid: None,
        info: CertificateInfo {
            certificate_number: SEED_CERTIFICATE_NUMBER.to_string(),
            exporter_name: "Teksan Jeneratör Elektrik San.ve Tic.A.Ş. Kocaeli Serbest Bölge Şubesi"
                .to_string(),
            exporter_address:
                "Kocaeli Serbest Bölgesi Sepetli Pınar Serbest Bölge Mah. 107.Cd. Başiskele/ KOCAELI"
                    .to_string(),
            consignee_name: "ALSOFY COMPANY FOR INTERNATIONAL TREADING".to_string(),
            consignee_address: "SOFY MALL GULAN ST. Erbil".to_string(),
            consignee_country: "Iraq".to_string(),
            transport_details: "BY TRUCK".to_string(),
            country_of_origin: "Türkiye".to_string(),
            place_and_date_of_issue: "KOCAELI CHAMBER OF INDUSTRY / 21.Jan.2025".to_string(),
        },
        products: vec![
            kgs(
                "TJ720PE DGS4071; PERKINS US JGBF5151N09814H, LEROY SOMER FR 40590400002",
                "4,285.00",
            ),
            kgs(
                "TJ165BD DGS3837; BAUDOUIN CN 4824F001815, CG POWER IN XXFG7016",
                "2,250.00",
            ),
            kgs(
                "TJ33PE DGS3918; PERKINS UK DJ32003U614727J, LEROY SOMER CZ 45682000008",
                "1,360.00",
            ),
            kgs(
                "TJ33PE DGS3919; PERKINS UK DJ32003U615360J, LEROY SOMER CZ 45682000007",
                "1,360.00",
            ),
            kgs(
                "TJ33PE DGS3920; PERKINS UK DJ32003U614734J, LEROY SOMER CZ 45682000006",
                "1,360.00",
            ),
            kgs(
                "TJ33PE DGS3921; PERKINS UK DJ32003U614734J, LEROY SOMER CZ 45682000005",
                "1,360.00",
            ),
        ],
        invoice: InvoiceInput {
            invoice_number: "TH02024000000578".to_string(),
            invoice_date: "30.10.2024".to_string(),
        },
    }
}
