//! Session/Access Gate
//!
//! Stateless per-request authorization. Given the acting administrator (if
//! any), the target resource, and the operation, decides allow or deny.
//! Rules are evaluated in order; the first match wins.

use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthAdmin;

use shared::models::AdminRole;

/// Resource targeted by a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A certificate or the certificate collection (not owner-scoped)
    Certificate,
    /// The admin-account collection (list, create)
    AdminCollection,
    /// A single admin account
    AdminAccount(Uuid),
}

/// Operation requested against a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
    Delete,
}

/// Authorize an operation. `Err(Unauthenticated)` when no actor is present,
/// `Err(Forbidden)` when an actor is present but denied.
pub fn authorize(
    actor: Option<&AuthAdmin>,
    resource: Resource,
    operation: Operation,
) -> Result<(), AppError> {
    // Rule 1: no actor rejects everything behind the gate (the public
    // verification lookup never consults the gate).
    let actor = match actor {
        Some(actor) => actor,
        None => return Err(AppError::Unauthenticated),
    };

    // Rule 2: super-admin may do anything.
    if actor.role == AdminRole::SuperAdmin {
        return Ok(());
    }

    match resource {
        // Rules 3 and 4: a plain admin may read and update their own
        // account, nothing else in the admin directory.
        Resource::AdminAccount(target) if target == actor.id => match operation {
            Operation::Read | Operation::Write => Ok(()),
            Operation::Delete => Err(AppError::Forbidden(
                "Only a super-admin can delete admin accounts".to_string(),
            )),
        },
        Resource::AdminAccount(_) | Resource::AdminCollection => Err(AppError::Forbidden(
            "Only a super-admin can manage other admin accounts".to_string(),
        )),
        // Rule 5: certificates are not owner-scoped.
        Resource::Certificate => Ok(()),
    }
}
