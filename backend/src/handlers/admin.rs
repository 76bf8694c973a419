//! HTTP handlers for admin account management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::access::{authorize, Operation, Resource};
use crate::error::{AppError, AppResult};
use crate::middleware::CurrentAdmin;
use crate::services::admin::{CreateAdminInput, UpdateAdminInput};
use crate::services::AdminService;
use crate::AppState;

use shared::models::{AdminRole, AdminUser};
use shared::validation::is_self_demotion;

/// List all admin accounts (super-admin only)
pub async fn list_admins(
    State(state): State<AppState>,
    CurrentAdmin(actor): CurrentAdmin,
) -> AppResult<Json<Vec<AdminUser>>> {
    authorize(Some(&actor), Resource::AdminCollection, Operation::Read)?;
    let service = AdminService::new(state.db);
    let admins = service.list().await?;
    Ok(Json(admins))
}

/// Create an admin account (super-admin only)
pub async fn create_admin(
    State(state): State<AppState>,
    CurrentAdmin(actor): CurrentAdmin,
    Json(input): Json<CreateAdminInput>,
) -> AppResult<(StatusCode, Json<AdminUser>)> {
    authorize(Some(&actor), Resource::AdminCollection, Operation::Write)?;
    let service = AdminService::new(state.db);
    let admin = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

/// Get an admin account (self or super-admin)
pub async fn get_admin(
    State(state): State<AppState>,
    CurrentAdmin(actor): CurrentAdmin,
    Path(admin_id): Path<Uuid>,
) -> AppResult<Json<AdminUser>> {
    authorize(Some(&actor), Resource::AdminAccount(admin_id), Operation::Read)?;
    let service = AdminService::new(state.db);
    let admin = service.get(admin_id).await?;
    Ok(Json(admin))
}

/// Update an admin account (self or super-admin)
///
/// A plain admin editing their own account cannot touch role or activation;
/// those fields are silently dropped from the patch. A super-admin cannot
/// demote or deactivate their own account.
pub async fn update_admin(
    State(state): State<AppState>,
    CurrentAdmin(actor): CurrentAdmin,
    Path(admin_id): Path<Uuid>,
    Json(input): Json<UpdateAdminInput>,
) -> AppResult<Json<AdminUser>> {
    authorize(Some(&actor), Resource::AdminAccount(admin_id), Operation::Write)?;

    let is_own_account = actor.id == admin_id;
    if is_self_demotion(actor.role, is_own_account, input.role, input.is_active) {
        return Err(AppError::InvariantViolation(
            "A super-admin cannot demote or deactivate their own account".to_string(),
        ));
    }

    let patch = if actor.role == AdminRole::SuperAdmin {
        input
    } else {
        input.without_privileged_fields()
    };

    let service = AdminService::new(state.db);
    let admin = service.update(admin_id, patch).await?;
    Ok(Json(admin))
}

/// Delete an admin account (super-admin only; the last active super-admin
/// cannot be removed)
pub async fn delete_admin(
    State(state): State<AppState>,
    CurrentAdmin(actor): CurrentAdmin,
    Path(admin_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    authorize(Some(&actor), Resource::AdminAccount(admin_id), Operation::Delete)?;
    let service = AdminService::new(state.db);
    service.delete(admin_id).await?;
    Ok(Json(()))
}
