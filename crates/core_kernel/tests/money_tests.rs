//! Unit tests for the Money module
//!
//! Tests cover money creation, arithmetic, currency handling, and the
//! X12 wire-form conversions used by the EDI codec.

use core_kernel::{Money, Currency, MoneyError};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(150.50), Currency::USD);
        assert_eq!(m.amount(), dec!(150.50));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_minor_converts_cents_correctly() {
        let m = Money::from_minor(10050, Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_usd_shorthand() {
        let m = Money::usd(dec!(150.00));
        assert_eq!(m.currency(), Currency::USD);
        assert_eq!(m.amount(), dec!(150.00));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero(Currency::EUR);
        assert!(m.is_zero());
        assert_eq!(m.currency(), Currency::EUR);
    }

    #[test]
    fn test_negative_amount_creation() {
        let m = Money::new(dec!(-100.00), Currency::USD);
        assert!(m.is_negative());
        assert!(!m.is_positive());
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_addition_same_currency() {
        let a = Money::usd(dec!(100.00));
        let b = Money::usd(dec!(50.25));
        assert_eq!((a + b).amount(), dec!(150.25));
    }

    #[test]
    fn test_subtraction_same_currency() {
        let a = Money::usd(dec!(100.00));
        let b = Money::usd(dec!(50.25));
        assert_eq!((a - b).amount(), dec!(49.75));
    }

    #[test]
    fn test_negation() {
        let m = Money::usd(dec!(75.00));
        assert_eq!((-m).amount(), dec!(-75.00));
    }

    #[test]
    fn test_checked_add_rejects_currency_mismatch() {
        let usd = Money::new(dec!(100.00), Currency::USD);
        let gbp = Money::new(dec!(100.00), Currency::GBP);
        assert!(matches!(
            usd.checked_add(&gbp),
            Err(MoneyError::CurrencyMismatch(_, _))
        ));
    }

    #[test]
    fn test_checked_sub_rejects_currency_mismatch() {
        let usd = Money::new(dec!(100.00), Currency::USD);
        let cad = Money::new(dec!(100.00), Currency::CAD);
        assert!(matches!(
            usd.checked_sub(&cad),
            Err(MoneyError::CurrencyMismatch(_, _))
        ));
    }
}

mod edi_wire_form {
    use super::*;

    #[test]
    fn test_to_edi_string_pads_to_two_decimals() {
        assert_eq!(Money::usd(dec!(150)).to_edi_string(), "150.00");
        assert_eq!(Money::usd(dec!(0.5)).to_edi_string(), "0.50");
    }

    #[test]
    fn test_from_edi_str_parses_plain_decimal() {
        let m = Money::from_edi_str("150.00").unwrap();
        assert_eq!(m, Money::usd(dec!(150.00)));
    }

    #[test]
    fn test_from_edi_str_trims_whitespace() {
        let m = Money::from_edi_str(" 42.10 ").unwrap();
        assert_eq!(m.amount(), dec!(42.10));
    }

    #[test]
    fn test_from_edi_str_rejects_garbage() {
        assert!(matches!(
            Money::from_edi_str("1O0.00"),
            Err(MoneyError::InvalidAmount(_))
        ));
    }
}

mod display {
    use super::*;

    #[test]
    fn test_display_includes_currency_code() {
        let m = Money::usd(dec!(150.00));
        assert_eq!(m.to_string(), "USD 150.00");
    }
}
