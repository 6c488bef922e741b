//! Conversion between hastings and SpaceCash.
//!
//! One SpaceCash (SPC) is 10^24 hastings, the base unit hsd uses for all of
//! its accounting. Amounts are held as [`BigDecimal`] so nothing is lost to
//! floating point, and rendered in plain notation because hsd rejects
//! exponents in amount strings.
//!
//! # Example
//!
//! ```ignore
//! use libhyperspace::units;
//!
//! let hastings = units::space_cash_to_hastings("1.5")?;
//! assert_eq!(hastings, "1500000000000000000000000");
//!
//! let spc = units::hastings_to_space_cash(&hastings)?;
//! assert_eq!(spc, "1.5");
//! ```

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};

use crate::{Error, Result};

/// Power of ten separating hastings from SpaceCash.
pub const HASTINGS_PER_SPACE_CASH_EXP: i64 = 24;

/// Maximum fractional digits kept when dividing down to SpaceCash.
pub const DECIMAL_PLACES: i64 = 30;

/// Convert a SpaceCash amount to hastings.
///
/// Multiplication by a power of ten only moves the decimal point, so the
/// result is always exact.
pub fn to_base_units(amount: &BigDecimal) -> BigDecimal {
    let (digits, scale) = amount.as_bigint_and_exponent();
    BigDecimal::new(digits, scale - HASTINGS_PER_SPACE_CASH_EXP).normalized()
}

/// Convert a hastings amount to SpaceCash.
///
/// Results with more than [`DECIMAL_PLACES`] fractional digits are rounded
/// half-up.
pub fn to_decimal_units(amount: &BigDecimal) -> BigDecimal {
    let (digits, scale) = amount.as_bigint_and_exponent();
    let scale = scale + HASTINGS_PER_SPACE_CASH_EXP;
    let shifted = BigDecimal::new(digits, scale);

    if scale > DECIMAL_PLACES {
        shifted
            .with_scale_round(DECIMAL_PLACES, RoundingMode::HalfUp)
            .normalized()
    } else {
        shifted.normalized()
    }
}

/// Parse a decimal amount string.
pub fn parse_amount(value: &str) -> Result<BigDecimal> {
    BigDecimal::from_str(value.trim()).map_err(|source| Error::InvalidAmount {
        value: value.to_string(),
        source,
    })
}

/// Render an amount without exponential notation.
pub fn format_amount(amount: &BigDecimal) -> String {
    amount.to_plain_string()
}

/// Convert a SpaceCash string to a hastings string.
pub fn space_cash_to_hastings(amount: &str) -> Result<String> {
    let amount = parse_amount(amount)?;
    Ok(format_amount(&to_base_units(&amount)))
}

/// Convert a hastings string to a SpaceCash string.
pub fn hastings_to_space_cash(amount: &str) -> Result<String> {
    let amount = parse_amount(amount)?;
    Ok(format_amount(&to_decimal_units(&amount)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn one_space_cash_is_ten_to_the_24_hastings() {
        assert_eq!(
            space_cash_to_hastings("1").unwrap(),
            "1000000000000000000000000"
        );
        assert_eq!(
            hastings_to_space_cash("1000000000000000000000000").unwrap(),
            "1"
        );
    }

    #[test]
    fn fractional_space_cash() {
        assert_eq!(
            space_cash_to_hastings("1.5").unwrap(),
            "1500000000000000000000000"
        );
        assert_eq!(
            space_cash_to_hastings("0.000000000000000000000001").unwrap(),
            "1"
        );
    }

    #[test]
    fn single_hasting() {
        assert_eq!(
            hastings_to_space_cash("1").unwrap(),
            "0.000000000000000000000001"
        );
    }

    #[test]
    fn trailing_zeros_are_dropped() {
        assert_eq!(
            hastings_to_space_cash("100").unwrap(),
            "0.0000000000000000000001"
        );
        assert_eq!(space_cash_to_hastings("2.500").unwrap(), "2500000000000000000000000");
    }

    #[test]
    fn zero_and_negative_amounts() {
        assert_eq!(space_cash_to_hastings("0").unwrap(), "0");
        assert_eq!(hastings_to_space_cash("0").unwrap(), "0");
        assert_eq!(
            space_cash_to_hastings("-3").unwrap(),
            "-3000000000000000000000000"
        );
    }

    #[test]
    fn division_rounds_to_thirty_places() {
        // 0.5 hastings needs 25 places, 0.0000005 hastings needs 31.
        assert_eq!(
            hastings_to_space_cash("0.5").unwrap(),
            "0.0000000000000000000000005"
        );
        assert_eq!(
            hastings_to_space_cash("0.0000005").unwrap(),
            "0.000000000000000000000000000001"
        );
        assert_eq!(
            hastings_to_space_cash("0.0000004").unwrap(),
            "0"
        );
    }

    #[test]
    fn large_values_have_no_exponent() {
        let huge = format!("1{}", "0".repeat(150));
        let hastings = space_cash_to_hastings(&huge).unwrap();
        assert!(!hastings.contains('e') && !hastings.contains('E'));
        assert_eq!(hastings, format!("1{}", "0".repeat(174)));

        let spc = hastings_to_space_cash(&huge).unwrap();
        assert!(!spc.contains('e') && !spc.contains('E'));
        assert_eq!(spc, format!("1{}", "0".repeat(126)));
    }

    #[test]
    fn exponent_input_is_accepted() {
        assert_eq!(space_cash_to_hastings("1e3").unwrap(), format!("1{}", "0".repeat(27)));
    }

    #[test]
    fn round_trip_is_exact() {
        for value in [
            "1337338498282837188273",
            "0.1",
            "123.456789",
            "99999999999999999999999.999999",
            "0.000000000000000000000000000001",
        ] {
            let amount = dec(value);
            let back = to_decimal_units(&to_base_units(&amount));
            assert_eq!(format_amount(&back), value);
        }
    }

    #[test]
    fn repeated_round_trips_do_not_drift() {
        let original = dec("1337338498282837188273");
        let mut converted = original.clone();
        for _ in 0..10_000 {
            converted = to_decimal_units(&to_base_units(&converted));
        }
        assert_eq!(format_amount(&converted), format_amount(&original));
    }

    #[test]
    fn invalid_amount_is_reported() {
        let err = space_cash_to_hastings("ten").unwrap_err();
        match err {
            Error::InvalidAmount { value, .. } => assert_eq!(value, "ten"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(hastings_to_space_cash("").is_err());
    }
}
