//! Validation and derivation logic for the Trade Certificate Platform
//!
//! Quantity strings come straight from paper invoices, so they arrive in
//! mixed locale conventions: "4,285.00" (comma as thousands separator),
//! "2,5" (decimal comma), or plain "1360". The functions here normalize
//! those and compute the invoice totals that every save must re-derive.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{AdminRole, InvoiceDetails, Product};

// ============================================================================
// Quantity Parsing
// ============================================================================

/// Parse a product quantity as entered on the certificate.
///
/// A string containing a dot treats commas as thousands separators; a
/// comma-only string treats a single comma as the decimal separator and
/// multiple commas as thousands grouping.
pub fn parse_quantity(raw: &str) -> Result<Decimal, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Quantity is required");
    }

    let normalized = if trimmed.contains('.') {
        trimmed.replace(',', "")
    } else if trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.replace(',', "")
    };

    Decimal::from_str(&normalized).map_err(|_| "Quantity is not a valid number")
}

/// Lenient parse used by the public verification read path: strip every
/// comma and take whatever parses, skipping the rest.
pub fn parse_quantity_lenient(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim().replace(',', "").as_str()).ok()
}

/// Format a weight total to exactly three decimal places.
pub fn format_weight(total: Decimal) -> String {
    format!("{:.3}", total)
}

// ============================================================================
// Derived Invoice Totals
// ============================================================================

/// Sum of all product quantities, strictly parsed.
pub fn total_weight(products: &[Product]) -> Result<Decimal, &'static str> {
    let mut total = Decimal::ZERO;
    for product in products {
        total += parse_quantity(&product.quantity)?;
    }
    Ok(total)
}

/// Recompute `total_packages` and `total_weight` from the product list.
///
/// Invariant: after any successful save, `total_packages` equals the product
/// count and `total_weight` equals the quantity sum formatted to 3 decimals.
pub fn recompute_invoice_totals(
    products: &[Product],
    invoice: &mut InvoiceDetails,
) -> Result<(), &'static str> {
    invoice.total_packages = products.len().to_string();
    invoice.total_weight = format_weight(total_weight(products)?);
    Ok(())
}

/// Re-derive the displayed weight when the stored total is missing, zero, or
/// unparsable. Mirrors the public verification page, which strips every
/// comma and skips entries that still fail to parse.
pub fn derive_display_weight(stored: &str, products: &[Product]) -> String {
    if let Some(value) = parse_quantity_lenient(stored) {
        if value != Decimal::ZERO {
            return stored.to_string();
        }
    }
    let total: Decimal = products
        .iter()
        .filter_map(|p| parse_quantity_lenient(&p.quantity))
        .sum();
    format_weight(total)
}

/// Validate a single product line item.
pub fn validate_product(product: &Product) -> Result<(), &'static str> {
    if product.description.trim().is_empty() {
        return Err("Product description is required");
    }
    parse_quantity(&product.quantity)?;
    Ok(())
}

// ============================================================================
// Admin Account Rules
// ============================================================================

/// Canonical form of an admin email: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Whether deleting the given admin would leave the system without any
/// active super-admin.
pub fn can_delete_admin(
    target_role: AdminRole,
    target_is_active: bool,
    active_super_admin_count: i64,
) -> Result<(), &'static str> {
    if target_role == AdminRole::SuperAdmin && target_is_active && active_super_admin_count <= 1 {
        return Err("Cannot delete the last super-admin");
    }
    Ok(())
}

/// Whether a super-admin's self-service update would demote or deactivate
/// their own account. Another super-admin must make that change.
pub fn is_self_demotion(
    actor_role: AdminRole,
    is_own_account: bool,
    new_role: Option<AdminRole>,
    new_is_active: Option<bool>,
) -> bool {
    actor_role == AdminRole::SuperAdmin
        && is_own_account
        && (new_role == Some(AdminRole::Admin) || new_is_active == Some(false))
}
