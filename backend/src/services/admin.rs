//! Admin identity store
//!
//! Persistence and invariant enforcement for administrator accounts:
//! unique emails, bcrypt-only password storage, and the guarantee that at
//! least one active super-admin always exists.

use bcrypt::{hash, verify, DEFAULT_COST};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

use shared::models::{AdminRole, AdminUser};
use shared::validation::{can_delete_admin, normalize_email, validate_email, validate_password};

/// Admin identity service
#[derive(Clone)]
pub struct AdminService {
    db: PgPool,
}

/// Database row including the password hash; never leaves this module
#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl AdminRow {
    fn into_public(self) -> AppResult<AdminUser> {
        let role = AdminRole::parse(&self.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown admin role: {}", self.role)))?;
        Ok(AdminUser {
            id: self.id,
            name: self.name,
            email: self.email,
            role,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, email, password_hash, role, is_active, created_at, updated_at
    FROM admins
"#;

/// Input for creating an admin account
#[derive(Debug, Deserialize)]
pub struct CreateAdminInput {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: AdminRole,
    #[serde(default = "default_active", rename = "isActive")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Partial update of an admin account
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminInput {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Plaintext; rehashed only when present
    pub password: Option<String>,
    pub role: Option<AdminRole>,
    pub is_active: Option<bool>,
}

impl UpdateAdminInput {
    /// Strip the privileged fields from a self-service edit by a plain
    /// admin. Role and activation changes require a super-admin.
    pub fn without_privileged_fields(mut self) -> Self {
        self.role = None;
        self.is_active = None;
        self
    }
}

impl AdminService {
    /// Create a new AdminService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an admin account with a hashed password
    pub async fn create(&self, input: CreateAdminInput) -> AppResult<AdminUser> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("name", "Name is required"));
        }
        let email = normalize_email(&input.email);
        validate_email(&email).map_err(|msg| AppError::validation("email", msg))?;
        validate_password(&input.password)
            .map_err(|msg| AppError::validation("password", msg))?;

        if self.get_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateKey("email".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            INSERT INTO admins (name, email, password_hash, role, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, is_active, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&email)
        .bind(&password_hash)
        .bind(input.role.as_str())
        .bind(input.is_active)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err {
                if db_err.constraint() == Some("admins_email_key") {
                    return AppError::DuplicateKey("email".to_string());
                }
            }
            AppError::Database(err)
        })?;

        row.into_public()
    }

    /// Get an admin by id, failing with NotFound when absent
    pub async fn get(&self, id: Uuid) -> AppResult<AdminUser> {
        let row = sqlx::query_as::<_, AdminRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin".to_string()))?;
        row.into_public()
    }

    /// Look up an admin by email (normalized)
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<AdminUser>> {
        let row = sqlx::query_as::<_, AdminRow>(&format!("{SELECT_COLUMNS} WHERE email = $1"))
            .bind(normalize_email(email))
            .fetch_optional(&self.db)
            .await?;
        row.map(AdminRow::into_public).transpose()
    }

    /// List all admins, newest first
    pub async fn list(&self) -> AppResult<Vec<AdminUser>> {
        let rows = sqlx::query_as::<_, AdminRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(AdminRow::into_public).collect()
    }

    /// Merge a partial update; the password is rehashed only when a new
    /// plaintext is supplied. Privilege rules are the caller's concern.
    pub async fn update(&self, id: Uuid, patch: UpdateAdminInput) -> AppResult<AdminUser> {
        let mut row = sqlx::query_as::<_, AdminRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin".to_string()))?;

        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("name", "Name is required"));
            }
            row.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            let email = normalize_email(&email);
            validate_email(&email).map_err(|msg| AppError::validation("email", msg))?;
            if email != row.email {
                let taken = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM admins WHERE email = $1 AND id <> $2)",
                )
                .bind(&email)
                .bind(id)
                .fetch_one(&self.db)
                .await?;
                if taken {
                    return Err(AppError::DuplicateKey("email".to_string()));
                }
            }
            row.email = email;
        }
        if let Some(password) = patch.password {
            validate_password(&password)
                .map_err(|msg| AppError::validation("password", msg))?;
            row.password_hash = hash(&password, DEFAULT_COST)
                .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
        }
        if let Some(role) = patch.role {
            row.role = role.as_str().to_string();
        }
        if let Some(is_active) = patch.is_active {
            row.is_active = is_active;
        }

        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            UPDATE admins SET
                name = $2, email = $3, password_hash = $4, role = $5,
                is_active = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&row.name)
        .bind(&row.email)
        .bind(&row.password_hash)
        .bind(&row.role)
        .bind(row.is_active)
        .fetch_one(&self.db)
        .await?;

        row.into_public()
    }

    /// Delete an admin permanently, refusing to remove the last active
    /// super-admin
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let target = self.get(id).await?;

        let active_super_admins = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM admins WHERE role = $1 AND is_active = true",
        )
        .bind(AdminRole::SuperAdmin.as_str())
        .fetch_one(&self.db)
        .await?;

        can_delete_admin(target.role, target.is_active, active_super_admins)
            .map_err(|msg| AppError::InvariantViolation(msg.to_string()))?;

        sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Verify a credential pair against an active account. Unknown email,
    /// inactive account, and wrong password all yield `None`; bad
    /// credentials are never an error.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<Option<AdminUser>> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "{SELECT_COLUMNS} WHERE email = $1 AND is_active = true"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.db)
        .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        // bcrypt's verify is the constant-time comparison primitive; a
        // malformed stored hash counts as no match rather than an error.
        match verify(password, &row.password_hash) {
            Ok(true) => row.into_public().map(Some),
            Ok(false) | Err(_) => Ok(None),
        }
    }

    /// Number of admin accounts, used by first-run seeding
    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_edit_strips_privileged_fields() {
        let patch = UpdateAdminInput {
            name: Some("New Name".into()),
            email: None,
            password: Some("longenough".into()),
            role: Some(AdminRole::SuperAdmin),
            is_active: Some(false),
        }
        .without_privileged_fields();

        assert_eq!(patch.name.as_deref(), Some("New Name"));
        assert_eq!(patch.password.as_deref(), Some("longenough"));
        assert!(patch.role.is_none());
        assert!(patch.is_active.is_none());
    }

    #[test]
    fn create_input_defaults() {
        let input: CreateAdminInput = serde_json::from_value(serde_json::json!({
            "name": "Ops",
            "email": "ops@example.com",
            "password": "longenough",
        }))
        .unwrap();
        assert_eq!(input.role, AdminRole::Admin);
        assert!(input.is_active);
    }
}
