//! Derived invoice totals tests
//!
//! Every certificate save recomputes `totalPackages` (product count) and
//! `totalWeight` (quantity sum, three decimals). The public verification
//! read path additionally re-derives the displayed weight when the stored
//! total is zero or unparsable.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{InvoiceDetails, Product, ProductUnit};
use shared::validation::{
    derive_display_weight, format_weight, parse_quantity, recompute_invoice_totals, total_weight,
};

fn product(quantity: &str) -> Product {
    Product {
        id: Uuid::new_v4(),
        description: "TJ720PE DGS4071; PERKINS US".into(),
        quantity: quantity.into(),
        unit: ProductUnit::Kgs,
    }
}

fn blank_invoice() -> InvoiceDetails {
    InvoiceDetails {
        total_packages: String::new(),
        total_weight: String::new(),
        invoice_number: "TH02024000000578".into(),
        invoice_date: "30.10.2024".into(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The six line items of the reference certificate sum to 11975.000
    #[test]
    fn test_reference_certificate_totals() {
        let products = vec![
            product("4,285.00"),
            product("2,250.00"),
            product("1,360.00"),
            product("1,360.00"),
            product("1,360.00"),
            product("1,360.00"),
        ];
        let mut invoice = blank_invoice();
        recompute_invoice_totals(&products, &mut invoice).unwrap();
        assert_eq!(invoice.total_packages, "6");
        assert_eq!(invoice.total_weight, "11975.000");
    }

    /// An empty product list produces zero totals
    #[test]
    fn test_empty_product_list() {
        let mut invoice = blank_invoice();
        invoice.total_packages = "6".into();
        invoice.total_weight = "11975.000".into();
        recompute_invoice_totals(&[], &mut invoice).unwrap();
        assert_eq!(invoice.total_packages, "0");
        assert_eq!(invoice.total_weight, "0.000");
    }

    /// Recomputation leaves the free-text invoice fields untouched
    #[test]
    fn test_free_text_fields_preserved() {
        let mut invoice = blank_invoice();
        recompute_invoice_totals(&[product("100")], &mut invoice).unwrap();
        assert_eq!(invoice.invoice_number, "TH02024000000578");
        assert_eq!(invoice.invoice_date, "30.10.2024");
    }

    /// An unparsable quantity fails the whole recomputation
    #[test]
    fn test_bad_quantity_fails_recomputation() {
        let mut invoice = blank_invoice();
        let products = vec![product("100"), product("heavy")];
        assert!(recompute_invoice_totals(&products, &mut invoice).is_err());
    }

    /// A valid non-zero stored total is displayed as stored
    #[test]
    fn test_display_weight_keeps_stored() {
        let products = vec![product("9,999.00")];
        assert_eq!(derive_display_weight("11975.000", &products), "11975.000");
        // Stored values with thousands separators also count as valid
        assert_eq!(derive_display_weight("11,975.000", &products), "11,975.000");
    }

    /// A zero or garbage stored total is re-derived from the line items
    #[test]
    fn test_display_weight_rederived() {
        let products = vec![product("3,200.00"), product("1,800.00")];
        assert_eq!(derive_display_weight("0", &products), "5000.000");
        assert_eq!(derive_display_weight("0.000", &products), "5000.000");
        assert_eq!(derive_display_weight("", &products), "5000.000");
        assert_eq!(derive_display_weight("N/A", &products), "5000.000");
    }

    /// Unparsable line items are skipped on the lenient display path
    #[test]
    fn test_display_weight_skips_bad_items() {
        let products = vec![product("1,000.00"), product("pallet"), product("500")];
        assert_eq!(derive_display_weight("0", &products), "1500.000");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for a parseable quantity string
    fn quantity_strategy() -> impl Strategy<Value = String> {
        (1u64..100_000, 0u32..1000).prop_map(|(i, f)| format!("{}.{:03}", i, f))
    }

    /// Strategy for a product list of up to 12 line items
    fn products_strategy() -> impl Strategy<Value = Vec<Product>> {
        prop::collection::vec(quantity_strategy().prop_map(|q| product(&q)), 0..12)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// totalPackages always equals the product count
        #[test]
        fn prop_total_packages_is_count(products in products_strategy()) {
            let mut invoice = blank_invoice();
            recompute_invoice_totals(&products, &mut invoice).unwrap();
            prop_assert_eq!(invoice.total_packages, products.len().to_string());
        }

        /// totalWeight is the quantity sum rendered with exactly three
        /// decimal places
        #[test]
        fn prop_total_weight_is_sum(products in products_strategy()) {
            let mut invoice = blank_invoice();
            recompute_invoice_totals(&products, &mut invoice).unwrap();

            let expected: Decimal = products
                .iter()
                .map(|p| parse_quantity(&p.quantity).unwrap())
                .sum();
            prop_assert_eq!(
                Decimal::from_str(&invoice.total_weight).unwrap(),
                expected
            );

            let (_, frac) = invoice.total_weight.split_once('.').unwrap();
            prop_assert_eq!(frac.len(), 3);
        }

        /// Recomputing totals twice gives the same result as once
        #[test]
        fn prop_recompute_is_idempotent(products in products_strategy()) {
            let mut first = blank_invoice();
            recompute_invoice_totals(&products, &mut first).unwrap();
            let mut second = first.clone();
            recompute_invoice_totals(&products, &mut second).unwrap();
            prop_assert_eq!(first.total_packages, second.total_packages);
            prop_assert_eq!(first.total_weight, second.total_weight);
        }

        /// A freshly recomputed total is never re-derived on display unless
        /// the product list was empty (a zero total re-derives to zero)
        #[test]
        fn prop_display_weight_trusts_fresh_totals(products in products_strategy()) {
            let stored = format_weight(total_weight(&products).unwrap());
            let displayed = derive_display_weight(&stored, &products);
            prop_assert_eq!(
                Decimal::from_str(&displayed).unwrap(),
                Decimal::from_str(&stored).unwrap()
            );
        }
    }
}
