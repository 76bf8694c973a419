//! Development seeding endpoint handler

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::seed::SeedOutcome;
use crate::services::SeedService;
use crate::AppState;

/// Populate the database with the reference certificate and a bootstrap
/// super-admin. Refused outside development unless seeding is forced.
pub async fn run_seed(State(state): State<AppState>) -> AppResult<Json<SeedOutcome>> {
    let service = SeedService::new(state.db);
    let outcome = service.seed(&state.config).await?;
    Ok(Json(outcome))
}
