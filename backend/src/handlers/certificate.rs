//! HTTP handlers for certificate management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::access::{authorize, Operation, Resource};
use crate::error::{AppError, AppResult};
use crate::middleware::CurrentAdmin;
use crate::services::certificate::{
    CreateCertificateInput, NewProduct, UpdateCertificateInput, UpdateProductInput,
};
use crate::services::CertificateService;
use crate::AppState;

use shared::models::Certificate;

// ============================================================================
// Certificate CRUD
// ============================================================================

/// List all certificates, newest first
pub async fn list_certificates(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
) -> AppResult<Json<Vec<Certificate>>> {
    authorize(Some(&admin), Resource::Certificate, Operation::Read)?;
    let service = CertificateService::new(state.db);
    let certificates = service.list().await?;
    Ok(Json(certificates))
}

/// Create a new certificate
pub async fn create_certificate(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(input): Json<CreateCertificateInput>,
) -> AppResult<(StatusCode, Json<Certificate>)> {
    authorize(Some(&admin), Resource::Certificate, Operation::Write)?;
    let service = CertificateService::new(state.db);
    let certificate = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(certificate)))
}

/// Get a certificate by ID
pub async fn get_certificate(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(certificate_id): Path<Uuid>,
) -> AppResult<Json<Certificate>> {
    authorize(Some(&admin), Resource::Certificate, Operation::Read)?;
    let service = CertificateService::new(state.db);
    let certificate = service.get(certificate_id).await?;
    Ok(Json(certificate))
}

/// Update a certificate
pub async fn update_certificate(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(certificate_id): Path<Uuid>,
    Json(input): Json<UpdateCertificateInput>,
) -> AppResult<Json<Certificate>> {
    authorize(Some(&admin), Resource::Certificate, Operation::Write)?;
    let service = CertificateService::new(state.db);
    let certificate = service.update(certificate_id, input).await?;
    Ok(Json(certificate))
}

/// Delete a certificate
pub async fn delete_certificate(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(certificate_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    authorize(Some(&admin), Resource::Certificate, Operation::Delete)?;
    let service = CertificateService::new(state.db);
    service.delete(certificate_id).await?;
    Ok(Json(()))
}

// ============================================================================
// GUID Management
// ============================================================================

/// Regenerate the external guid of a certificate
pub async fn regenerate_guid(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(certificate_id): Path<Uuid>,
) -> AppResult<Json<Certificate>> {
    authorize(Some(&admin), Resource::Certificate, Operation::Write)?;
    let service = CertificateService::new(state.db);
    let certificate = service.regenerate_guid(certificate_id).await?;
    Ok(Json(certificate))
}

// ============================================================================
// Product Line Items
// ============================================================================

/// Append a product to a certificate
pub async fn add_product(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(certificate_id): Path<Uuid>,
    Json(input): Json<NewProduct>,
) -> AppResult<(StatusCode, Json<Certificate>)> {
    authorize(Some(&admin), Resource::Certificate, Operation::Write)?;
    let service = CertificateService::new(state.db);
    let certificate = service.add_product(certificate_id, input).await?;
    Ok((StatusCode::CREATED, Json(certificate)))
}

/// Update a product within a certificate
pub async fn update_product(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path((certificate_id, product_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Certificate>> {
    authorize(Some(&admin), Resource::Certificate, Operation::Write)?;
    let service = CertificateService::new(state.db);
    let certificate = service
        .update_product(certificate_id, product_id, input)
        .await?;
    Ok(Json(certificate))
}

/// Remove a product from a certificate. An id with no match leaves the
/// product list unchanged.
pub async fn remove_product(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path((certificate_id, product_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Certificate>> {
    authorize(Some(&admin), Resource::Certificate, Operation::Write)?;
    let service = CertificateService::new(state.db);
    let certificate = service.remove_product(certificate_id, product_id).await?;
    Ok(Json(certificate))
}

// ============================================================================
// Public Lookups
// ============================================================================

/// Read a certificate by guid (public, used by issued verification links)
pub async fn get_certificate_by_guid(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> AppResult<Json<Certificate>> {
    let service = CertificateService::new(state.db);
    let certificate = service
        .find_by_guid(&guid)
        .await?
        .ok_or_else(|| AppError::NotFound("Certificate".to_string()))?;
    Ok(Json(certificate))
}

/// Query parameters for certificate-number search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(rename = "certNumber")]
    pub cert_number: Option<String>,
}

/// Search a certificate by its business number (public)
pub async fn search_certificate(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Certificate>> {
    let number = query
        .cert_number
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| {
            AppError::validation("certNumber", "Certificate number is required")
        })?;

    let service = CertificateService::new(state.db);
    let certificate = service
        .find_by_certificate_number(number.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Certificate".to_string()))?;
    Ok(Json(certificate))
}
