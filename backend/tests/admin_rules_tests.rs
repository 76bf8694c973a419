//! Admin account rule tests
//!
//! Covers the identity-store invariants: email normalization, password
//! strength, the last-super-admin delete guard, and the self-demotion rule.

use proptest::prelude::*;

use shared::models::AdminRole;
use shared::validation::{
    can_delete_admin, is_self_demotion, normalize_email, validate_email, validate_password,
};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Emails are stored trimmed and lowercased
    #[test]
    fn test_email_normalization() {
        assert_eq!(normalize_email("  Ops@Example.COM "), "ops@example.com");
        assert_eq!(normalize_email("admin@example.com"), "admin@example.com");
    }

    /// Basic email shape validation
    #[test]
    fn test_email_validation() {
        assert!(validate_email("admin@example.com").is_ok());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("no-dot@examplecom").is_err());
        assert!(validate_email("a@b").is_err());
    }

    /// Passwords require at least 8 characters
    #[test]
    fn test_password_strength() {
        assert!(validate_password("change-me-on-first-login").is_ok());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("").is_err());
    }

    /// The last active super-admin cannot be deleted
    #[test]
    fn test_last_super_admin_guard() {
        assert!(can_delete_admin(AdminRole::SuperAdmin, true, 1).is_err());
        assert!(can_delete_admin(AdminRole::SuperAdmin, true, 2).is_ok());
        assert!(can_delete_admin(AdminRole::Admin, true, 1).is_ok());
        // A deactivated super-admin is not the last line of defense
        assert!(can_delete_admin(AdminRole::SuperAdmin, false, 1).is_ok());
    }

    /// A super-admin cannot demote or deactivate their own account
    #[test]
    fn test_self_demotion_rule() {
        assert!(is_self_demotion(
            AdminRole::SuperAdmin,
            true,
            Some(AdminRole::Admin),
            None
        ));
        assert!(is_self_demotion(AdminRole::SuperAdmin, true, None, Some(false)));
        // Keeping role and activation is fine
        assert!(!is_self_demotion(
            AdminRole::SuperAdmin,
            true,
            Some(AdminRole::SuperAdmin),
            Some(true)
        ));
        // Editing someone else's account is fine
        assert!(!is_self_demotion(
            AdminRole::SuperAdmin,
            false,
            Some(AdminRole::Admin),
            Some(false)
        ));
        // Plain admins never hit this rule
        assert!(!is_self_demotion(AdminRole::Admin, true, None, Some(false)));
    }

    /// Role wire names round-trip through parse
    #[test]
    fn test_role_names() {
        assert_eq!(AdminRole::parse("admin"), Some(AdminRole::Admin));
        assert_eq!(AdminRole::parse("super-admin"), Some(AdminRole::SuperAdmin));
        assert_eq!(AdminRole::parse("root"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn role_strategy() -> impl Strategy<Value = AdminRole> {
        prop_oneof![Just(AdminRole::Admin), Just(AdminRole::SuperAdmin)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Normalization is idempotent
        #[test]
        fn prop_email_normalization_idempotent(email in "[A-Za-z0-9.@ ]{0,40}") {
            let once = normalize_email(&email);
            prop_assert_eq!(normalize_email(&once), once.clone());
        }

        /// Deleting a plain admin is never blocked by the super-admin guard
        #[test]
        fn prop_plain_admin_delete_never_blocked(
            is_active in any::<bool>(),
            count in 0i64..10
        ) {
            prop_assert!(can_delete_admin(AdminRole::Admin, is_active, count).is_ok());
        }

        /// With two or more active super-admins, deletion is never blocked
        #[test]
        fn prop_delete_allowed_with_spare_super_admin(
            role in role_strategy(),
            is_active in any::<bool>(),
            count in 2i64..10
        ) {
            prop_assert!(can_delete_admin(role, is_active, count).is_ok());
        }

        /// The self-demotion rule only ever fires for a super-admin acting
        /// on their own account
        #[test]
        fn prop_self_demotion_scope(
            actor in role_strategy(),
            own in any::<bool>(),
            new_role in proptest::option::of(role_strategy()),
            new_active in proptest::option::of(any::<bool>())
        ) {
            if is_self_demotion(actor, own, new_role, new_active) {
                prop_assert_eq!(actor, AdminRole::SuperAdmin);
                prop_assert!(own);
                prop_assert!(
                    new_role == Some(AdminRole::Admin) || new_active == Some(false)
                );
            }
        }
    }
}
