//! Certificate record store
//!
//! Persistence and invariant enforcement for certificate documents:
//! certificate-number and guid uniqueness, and the derived invoice totals
//! that are recomputed on every save.

use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use shared::models::{Certificate, CertificateInfo, InvoiceDetails, Product, ProductUnit};
use shared::validation::{recompute_invoice_totals, validate_product};

/// Certificate service backed by the shared connection pool
#[derive(Clone)]
pub struct CertificateService {
    db: PgPool,
}

/// Database row for a certificate; `products` is a JSONB document column
#[derive(Debug, sqlx::FromRow)]
struct CertificateRow {
    id: Uuid,
    guid: String,
    certificate_number: String,
    exporter_name: String,
    exporter_address: String,
    consignee_name: String,
    consignee_address: String,
    consignee_country: String,
    transport_details: String,
    country_of_origin: String,
    place_and_date_of_issue: String,
    products: Json<Vec<Product>>,
    total_packages: String,
    total_weight: String,
    invoice_number: String,
    invoice_date: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<CertificateRow> for Certificate {
    fn from(row: CertificateRow) -> Self {
        Certificate {
            id: row.id,
            guid: row.guid,
            info: CertificateInfo {
                certificate_number: row.certificate_number,
                exporter_name: row.exporter_name,
                exporter_address: row.exporter_address,
                consignee_name: row.consignee_name,
                consignee_address: row.consignee_address,
                consignee_country: row.consignee_country,
                transport_details: row.transport_details,
                country_of_origin: row.country_of_origin,
                place_and_date_of_issue: row.place_and_date_of_issue,
            },
            products: row.products.0,
            invoice: InvoiceDetails {
                total_packages: row.total_packages,
                total_weight: row.total_weight,
                invoice_number: row.invoice_number,
                invoice_date: row.invoice_date,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, guid, certificate_number, exporter_name, exporter_address,
           consignee_name, consignee_address, consignee_country,
           transport_details, country_of_origin, place_and_date_of_issue,
           products, total_packages, total_weight, invoice_number,
           invoice_date, created_at, updated_at
    FROM certificates
"#;

/// Product line item as submitted by a caller (id assigned by the store)
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub description: String,
    pub quantity: String,
    #[serde(default)]
    pub unit: ProductUnit,
}

/// Invoice free-text fields as submitted (totals are derived, never taken
/// from the caller)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub invoice_date: String,
}

/// Input for creating a certificate
#[derive(Debug, Deserialize)]
pub struct CreateCertificateInput {
    /// External reference token; generated when absent
    pub guid: Option<String>,
    pub info: CertificateInfo,
    #[serde(default)]
    pub products: Vec<NewProduct>,
    #[serde(default)]
    pub invoice: InvoiceInput,
}

/// Partial update of the certificate header
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInfoPatch {
    pub certificate_number: Option<String>,
    pub exporter_name: Option<String>,
    pub exporter_address: Option<String>,
    pub consignee_name: Option<String>,
    pub consignee_address: Option<String>,
    pub consignee_country: Option<String>,
    pub transport_details: Option<String>,
    pub country_of_origin: Option<String>,
    pub place_and_date_of_issue: Option<String>,
}

/// Partial update of the invoice free-text fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
}

/// Input for updating a certificate
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCertificateInput {
    pub info: Option<CertificateInfoPatch>,
    /// Full replacement of the product list when present
    pub products: Option<Vec<NewProduct>>,
    pub invoice: Option<InvoicePatch>,
}

/// Partial update of a single product line item
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductInput {
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<ProductUnit>,
}

impl CertificateService {
    /// Create a new CertificateService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Certificate CRUD
    // ========================================================================

    /// Create a certificate, assigning id and guid and deriving totals
    pub async fn create(&self, input: CreateCertificateInput) -> AppResult<Certificate> {
        validate_info(&input.info)?;

        let products = build_products(input.products)?;
        let mut invoice = InvoiceDetails {
            total_packages: String::new(),
            total_weight: String::new(),
            invoice_number: input.invoice.invoice_number,
            invoice_date: input.invoice.invoice_date,
        };
        recompute_invoice_totals(&products, &mut invoice)
            .map_err(|msg| AppError::validation("quantity", msg))?;

        let number_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM certificates WHERE certificate_number = $1)",
        )
        .bind(&input.info.certificate_number)
        .fetch_one(&self.db)
        .await?;

        if number_taken {
            return Err(AppError::DuplicateKey("certificateNumber".to_string()));
        }

        let guid = input
            .guid
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let row = sqlx::query_as::<_, CertificateRow>(
            r#"
            INSERT INTO certificates (
                guid, certificate_number, exporter_name, exporter_address,
                consignee_name, consignee_address, consignee_country,
                transport_details, country_of_origin, place_and_date_of_issue,
                products, total_packages, total_weight, invoice_number, invoice_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id, guid, certificate_number, exporter_name, exporter_address,
                      consignee_name, consignee_address, consignee_country,
                      transport_details, country_of_origin, place_and_date_of_issue,
                      products, total_packages, total_weight, invoice_number,
                      invoice_date, created_at, updated_at
            "#,
        )
        .bind(&guid)
        .bind(&input.info.certificate_number)
        .bind(&input.info.exporter_name)
        .bind(&input.info.exporter_address)
        .bind(&input.info.consignee_name)
        .bind(&input.info.consignee_address)
        .bind(&input.info.consignee_country)
        .bind(&input.info.transport_details)
        .bind(&input.info.country_of_origin)
        .bind(&input.info.place_and_date_of_issue)
        .bind(Json(&products))
        .bind(&invoice.total_packages)
        .bind(&invoice.total_weight)
        .bind(&invoice.invoice_number)
        .bind(&invoice.invoice_date)
        .fetch_one(&self.db)
        .await
        .map_err(map_unique_violation)?;

        Ok(row.into())
    }

    /// Get a certificate by id, failing with NotFound when absent
    pub async fn get(&self, id: Uuid) -> AppResult<Certificate> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Certificate".to_string()))
    }

    /// Look up a certificate by id
    pub async fn find(&self, id: Uuid) -> AppResult<Option<Certificate>> {
        let row = sqlx::query_as::<_, CertificateRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Look up a certificate by its external guid
    pub async fn find_by_guid(&self, guid: &str) -> AppResult<Option<Certificate>> {
        let row =
            sqlx::query_as::<_, CertificateRow>(&format!("{SELECT_COLUMNS} WHERE guid = $1"))
                .bind(guid)
                .fetch_optional(&self.db)
                .await?;
        Ok(row.map(Into::into))
    }

    /// Look up a certificate by its business certificate number
    pub async fn find_by_certificate_number(
        &self,
        number: &str,
    ) -> AppResult<Option<Certificate>> {
        let row = sqlx::query_as::<_, CertificateRow>(&format!(
            "{SELECT_COLUMNS} WHERE certificate_number = $1"
        ))
        .bind(number)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Into::into))
    }

    /// List all certificates, newest first
    pub async fn list(&self) -> AppResult<Vec<Certificate>> {
        let rows = sqlx::query_as::<_, CertificateRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Merge a partial update and save, recomputing derived totals
    pub async fn update(&self, id: Uuid, patch: UpdateCertificateInput) -> AppResult<Certificate> {
        let mut certificate = self.get(id).await?;

        if let Some(info_patch) = &patch.info {
            if let Some(number) = &info_patch.certificate_number {
                if number.trim().is_empty() {
                    return Err(AppError::validation(
                        "certificateNumber",
                        "Certificate number is required",
                    ));
                }
                if number != &certificate.info.certificate_number {
                    let taken = sqlx::query_scalar::<_, bool>(
                        "SELECT EXISTS(SELECT 1 FROM certificates WHERE certificate_number = $1 AND id <> $2)",
                    )
                    .bind(number)
                    .bind(id)
                    .fetch_one(&self.db)
                    .await?;
                    if taken {
                        return Err(AppError::DuplicateKey("certificateNumber".to_string()));
                    }
                }
            }
            apply_info_patch(&mut certificate.info, info_patch);
            // The merged header must still pass the create-time checks; a
            // patch must not be able to blank a required field.
            validate_info(&certificate.info)?;
        }

        if let Some(products) = patch.products {
            certificate.products = build_products(products)?;
        }

        if let Some(invoice_patch) = patch.invoice {
            if let Some(number) = invoice_patch.invoice_number {
                certificate.invoice.invoice_number = number;
            }
            if let Some(date) = invoice_patch.invoice_date {
                certificate.invoice.invoice_date = date;
            }
        }

        self.save(certificate).await
    }

    /// Delete a certificate permanently
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM certificates WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        match deleted {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Certificate".to_string())),
        }
    }

    // ========================================================================
    // Product Line Items
    // ========================================================================

    /// Append a product to a certificate and re-derive totals
    pub async fn add_product(&self, id: Uuid, product: NewProduct) -> AppResult<Certificate> {
        let mut certificate = self.get(id).await?;
        let product = build_product(product)?;
        certificate.products.push(product);
        self.save(certificate).await
    }

    /// Update a product matched by id; NotFound when no product matches
    pub async fn update_product(
        &self,
        id: Uuid,
        product_id: Uuid,
        patch: UpdateProductInput,
    ) -> AppResult<Certificate> {
        let mut certificate = self.get(id).await?;

        let product = certificate
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(quantity) = patch.quantity {
            product.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            product.unit = unit;
        }
        validate_product(product).map_err(|msg| AppError::validation("products", msg))?;

        self.save(certificate).await
    }

    /// Remove a product matched by exact id equality. Removing an id that is
    /// not present leaves the list unchanged and succeeds.
    pub async fn remove_product(&self, id: Uuid, product_id: Uuid) -> AppResult<Certificate> {
        let mut certificate = self.get(id).await?;
        certificate.products.retain(|p| p.id != product_id);
        self.save(certificate).await
    }

    // ========================================================================
    // GUID Management
    // ========================================================================

    /// Replace the guid with a freshly generated token; no other field changes
    pub async fn regenerate_guid(&self, id: Uuid) -> AppResult<Certificate> {
        let new_guid = Uuid::new_v4().to_string();
        let row = sqlx::query_as::<_, CertificateRow>(
            r#"
            UPDATE certificates SET guid = $1 WHERE id = $2
            RETURNING id, guid, certificate_number, exporter_name, exporter_address,
                      consignee_name, consignee_address, consignee_country,
                      transport_details, country_of_origin, place_and_date_of_issue,
                      products, total_packages, total_weight, invoice_number,
                      invoice_date, created_at, updated_at
            "#,
        )
        .bind(&new_guid)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Certificate".to_string()))?;

        Ok(row.into())
    }

    /// Persist a full certificate document. Totals are re-derived here so
    /// every save path upholds the invariant.
    async fn save(&self, mut certificate: Certificate) -> AppResult<Certificate> {
        recompute_invoice_totals(&certificate.products, &mut certificate.invoice)
            .map_err(|msg| AppError::validation("quantity", msg))?;

        let row = sqlx::query_as::<_, CertificateRow>(
            r#"
            UPDATE certificates SET
                guid = $2,
                certificate_number = $3,
                exporter_name = $4,
                exporter_address = $5,
                consignee_name = $6,
                consignee_address = $7,
                consignee_country = $8,
                transport_details = $9,
                country_of_origin = $10,
                place_and_date_of_issue = $11,
                products = $12,
                total_packages = $13,
                total_weight = $14,
                invoice_number = $15,
                invoice_date = $16,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, guid, certificate_number, exporter_name, exporter_address,
                      consignee_name, consignee_address, consignee_country,
                      transport_details, country_of_origin, place_and_date_of_issue,
                      products, total_packages, total_weight, invoice_number,
                      invoice_date, created_at, updated_at
            "#,
        )
        .bind(certificate.id)
        .bind(&certificate.guid)
        .bind(&certificate.info.certificate_number)
        .bind(&certificate.info.exporter_name)
        .bind(&certificate.info.exporter_address)
        .bind(&certificate.info.consignee_name)
        .bind(&certificate.info.consignee_address)
        .bind(&certificate.info.consignee_country)
        .bind(&certificate.info.transport_details)
        .bind(&certificate.info.country_of_origin)
        .bind(&certificate.info.place_and_date_of_issue)
        .bind(Json(&certificate.products))
        .bind(&certificate.invoice.total_packages)
        .bind(&certificate.invoice.total_weight)
        .bind(&certificate.invoice.invoice_number)
        .bind(&certificate.invoice.invoice_date)
        .fetch_optional(&self.db)
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| AppError::NotFound("Certificate".to_string()))?;

        Ok(row.into())
    }
}

/// Validate that every required header field is present and non-empty
fn validate_info(info: &CertificateInfo) -> AppResult<()> {
    for (field, value) in info.required_fields() {
        if value.trim().is_empty() {
            return Err(AppError::Validation {
                field: field.to_string(),
                message: format!("{} is required", field),
            });
        }
    }
    Ok(())
}

/// Assign ids to submitted products after validating each line item
fn build_products(products: Vec<NewProduct>) -> AppResult<Vec<Product>> {
    products.into_iter().map(build_product).collect()
}

fn build_product(product: NewProduct) -> AppResult<Product> {
    let product = Product {
        id: Uuid::new_v4(),
        description: product.description,
        quantity: product.quantity,
        unit: product.unit,
    };
    validate_product(&product).map_err(|msg| AppError::validation("products", msg))?;
    Ok(product)
}

fn apply_info_patch(info: &mut CertificateInfo, patch: &CertificateInfoPatch) {
    if let Some(v) = &patch.certificate_number {
        info.certificate_number = v.clone();
    }
    if let Some(v) = &patch.exporter_name {
        info.exporter_name = v.clone();
    }
    if let Some(v) = &patch.exporter_address {
        info.exporter_address = v.clone();
    }
    if let Some(v) = &patch.consignee_name {
        info.consignee_name = v.clone();
    }
    if let Some(v) = &patch.consignee_address {
        info.consignee_address = v.clone();
    }
    if let Some(v) = &patch.consignee_country {
        info.consignee_country = v.clone();
    }
    if let Some(v) = &patch.transport_details {
        info.transport_details = v.clone();
    }
    if let Some(v) = &patch.country_of_origin {
        info.country_of_origin = v.clone();
    }
    if let Some(v) = &patch.place_and_date_of_issue {
        info.place_and_date_of_issue = v.clone();
    }
}

/// Translate a unique-constraint violation into the duplicate-key taxonomy.
/// This backstops the check-then-insert race on concurrent creates.
fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some("certificates_certificate_number_key") => {
                return AppError::DuplicateKey("certificateNumber".to_string());
            }
            Some("certificates_guid_key") => {
                return AppError::DuplicateKey("guid".to_string());
            }
            _ => {}
        }
    }
    AppError::Database(err)
}
