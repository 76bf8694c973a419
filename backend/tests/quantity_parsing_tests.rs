//! Quantity parsing tests
//!
//! Product quantities are transcribed from paper invoices in mixed locale
//! conventions. These tests pin down the normalization rules:
//! - a dot makes every comma a thousands separator
//! - a single comma with no dot is a decimal separator
//! - multiple commas with no dot are thousands grouping

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::validation::{parse_quantity, parse_quantity_lenient};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Quantities from the reference certificate parse to their face value
    #[test]
    fn test_reference_quantities() {
        let cases = [
            ("4,285.00", "4285.00"),
            ("2,250.00", "2250.00"),
            ("1,360.00", "1360.00"),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                parse_quantity(raw).unwrap(),
                Decimal::from_str(expected).unwrap(),
                "failed for {}",
                raw
            );
        }
    }

    /// A single comma with no dot is a decimal separator
    #[test]
    fn test_decimal_comma() {
        assert_eq!(parse_quantity("2,5").unwrap(), Decimal::from_str("2.5").unwrap());
        assert_eq!(
            parse_quantity("1360,75").unwrap(),
            Decimal::from_str("1360.75").unwrap()
        );
    }

    /// Multiple commas with no dot are thousands grouping
    #[test]
    fn test_grouped_commas_without_dot() {
        assert_eq!(
            parse_quantity("1,234,567").unwrap(),
            Decimal::from(1_234_567)
        );
    }

    /// Surrounding whitespace is ignored
    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(parse_quantity("  1360  ").unwrap(), Decimal::from(1360));
    }

    /// Empty and non-numeric strings are rejected
    #[test]
    fn test_invalid_quantities() {
        assert!(parse_quantity("").is_err());
        assert!(parse_quantity("   ").is_err());
        assert!(parse_quantity("12 KGS").is_err());
        assert!(parse_quantity("1.2.3").is_err());
    }

    /// The lenient parser strips every comma and never fails, it just
    /// returns None
    #[test]
    fn test_lenient_parse() {
        assert_eq!(
            parse_quantity_lenient("4,285.00"),
            Some(Decimal::from_str("4285.00").unwrap())
        );
        assert_eq!(parse_quantity_lenient("n/a"), None);
        assert_eq!(parse_quantity_lenient(""), None);
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Insert thousands separators into the integer part of a plain decimal
/// string, e.g. "1234567.50" -> "1,234,567.50"
fn group_thousands(plain: &str) -> String {
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for plain decimal strings with a fractional part
    fn plain_decimal_strategy() -> impl Strategy<Value = String> {
        (0u64..10_000_000, 0u32..100).prop_map(|(i, f)| format!("{}.{:02}", i, f))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Thousands grouping never changes the parsed value when the
        /// string carries a dot
        #[test]
        fn prop_grouping_is_value_preserving(plain in plain_decimal_strategy()) {
            let grouped = group_thousands(&plain);
            prop_assert_eq!(
                parse_quantity(&grouped).unwrap(),
                parse_quantity(&plain).unwrap()
            );
        }

        /// Plain decimal strings parse to exactly their face value
        #[test]
        fn prop_plain_decimal_parses_exact(plain in plain_decimal_strategy()) {
            prop_assert_eq!(
                parse_quantity(&plain).unwrap(),
                Decimal::from_str(&plain).unwrap()
            );
        }

        /// Integers parse identically whether a decimal comma or a decimal
        /// dot is used
        #[test]
        fn prop_decimal_comma_equals_decimal_dot(i in 0u64..1_000_000, f in 0u32..100) {
            let with_comma = format!("{},{:02}", i, f);
            let with_dot = format!("{}.{:02}", i, f);
            prop_assert_eq!(
                parse_quantity(&with_comma).unwrap(),
                parse_quantity(&with_dot).unwrap()
            );
        }

        /// The strict and lenient parsers agree on dot-carrying strings
        #[test]
        fn prop_lenient_agrees_on_dot_strings(plain in plain_decimal_strategy()) {
            let grouped = group_thousands(&plain);
            prop_assert_eq!(
                parse_quantity_lenient(&grouped),
                Some(parse_quantity(&grouped).unwrap())
            );
        }
    }
}
