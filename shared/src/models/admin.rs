//! Administrator account model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Administrator role (closed set)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AdminRole {
    #[default]
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "super-admin")]
    SuperAdmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::SuperAdmin => "super-admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(AdminRole::Admin),
            "super-admin" => Some(AdminRole::SuperAdmin),
            _ => None,
        }
    }
}

/// Externally visible administrator record
///
/// The password hash lives only in the backend's row type; it is never part
/// of this representation, so it cannot leak through any response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_names() {
        assert_eq!(serde_json::to_string(&AdminRole::SuperAdmin).unwrap(), "\"super-admin\"");
        let parsed: AdminRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, AdminRole::Admin);
    }

    #[test]
    fn role_parse_matches_serde_names() {
        assert_eq!(AdminRole::parse("super-admin"), Some(AdminRole::SuperAdmin));
        assert_eq!(AdminRole::parse("admin"), Some(AdminRole::Admin));
        assert_eq!(AdminRole::parse("root"), None);
    }

    #[test]
    fn admin_user_has_no_password_field() {
        let json = serde_json::to_value(AdminUser {
            id: Uuid::new_v4(),
            name: "Ops".into(),
            email: "ops@example.com".into(),
            role: AdminRole::Admin,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
