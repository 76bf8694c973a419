//! Public verification endpoint handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::verification::choose_key;
use crate::services::VerificationService;
use crate::AppState;

use shared::models::Certificate;

/// Query parameters accepted by the verification endpoint. Both keys are
/// optional; guid wins when both are present.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default, rename = "certNumber")]
    pub cert_number: Option<String>,
}

/// Resolve a certificate for public verification by guid or certificate
/// number. The response carries display-ready invoice totals.
pub async fn verify_certificate(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> AppResult<Json<Certificate>> {
    let key = choose_key(query.guid, query.cert_number).ok_or_else(|| {
        AppError::validation("guid", "A guid or certNumber query parameter is required")
    })?;

    let service = VerificationService::new(state.db);
    let certificate = service.resolve(key).await?;
    Ok(Json(certificate))
}
