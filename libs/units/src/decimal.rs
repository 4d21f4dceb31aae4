//! Thin facade over the exact-decimal library.
//!
//! All numeric state in this workspace is [`Decimal`]; nothing here or
//! downstream touches floating point.

use std::str::FromStr;

pub use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// Parse a decimal literal, accepting both plain (`110`, `0.402`) and
/// scientific (`1.1E-04`) notation.
pub fn parse(s: &str) -> Result<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| Error::InvalidNumber(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_scientific() {
        assert_eq!(parse("110").unwrap(), Decimal::from(110));
        assert_eq!(parse("0.402").unwrap(), Decimal::from_str("0.402").unwrap());
        assert_eq!(
            parse("1.1E-04").unwrap(),
            Decimal::from_str("0.00011").unwrap()
        );
        assert_eq!(parse("7.2e-06").unwrap(), Decimal::from_str("0.0000072").unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse("abc"), Err(Error::InvalidNumber(_))));
        assert!(matches!(parse(""), Err(Error::InvalidNumber(_))));
    }
}
