//! Minor-unit money conversion.
//!
//! Prices are stored as integers in the smallest currency unit (e.g. pesewas)
//! so totals stay exact. These helpers convert to and from the decimal
//! strings used at the presentation boundary.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("not a decimal amount")]
    Malformed,

    #[error("more than two decimal places")]
    Precision,

    #[error("amount too large")]
    Overflow,
}

/// Parse a decimal string like `"5"`, `"5.5"` or `"5.00"` into minor units.
pub fn parse_minor(input: &str) -> Result<u64, MoneyError> {
    let input = input.trim();
    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(MoneyError::Malformed);
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(MoneyError::Malformed);
    }
    if frac.len() > 2 {
        return Err(MoneyError::Precision);
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| MoneyError::Overflow)?
    };

    let frac_minor: u64 = if frac.is_empty() {
        0
    } else {
        let parsed: u64 = frac.parse().map_err(|_| MoneyError::Overflow)?;
        // "5.5" means 50 minor units, "5.05" means 5.
        if frac.len() == 1 { parsed * 10 } else { parsed }
    };

    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(frac_minor))
        .ok_or(MoneyError::Overflow)
}

/// Format minor units back into a two-decimal string (`8200` -> `"82.00"`).
pub fn format_minor(minor: u64) -> String {
    format!("{}.{:02}", minor / 100, minor % 100)
}
