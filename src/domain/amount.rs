//! Pure conversion between human-decimal and fixed-point token amounts.
//!
//! Fixed-point amounts are integer strings scaled by `10^decimals`.
//! Scaling is done on digit strings and `U256`, never through floats,
//! so every EVM-representable amount round-trips at full precision.
//! Display echo is capped at 6 significant digits; orchestrators always
//! work with the full-precision form.

use std::str::FromStr;

use alloy::primitives::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

use crate::domain::error::DeskError;

/// Significant digits used for UI display echo.
pub const DISPLAY_SIGNIFICANT_DIGITS: u32 = 6;

/// Parses a user-typed amount into a `Decimal`, or `None` if malformed.
///
/// Positivity is not checked here — the validator owns that rule.
pub fn parse_amount(typed: &str) -> Option<Decimal> {
    let trimmed = typed.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Scales a human-decimal string by `10^decimals` into a `U256`.
///
/// Fractional digits beyond `decimals` are truncated. Fails with
/// `InvalidAmount` if the input is not a non-negative finite decimal.
pub fn to_fixed_point_u256(amount: &str, decimals: u8) -> Result<U256, DeskError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(DeskError::InvalidAmount(amount.to_string()));
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    let digits_only = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let int_ok = int_part.is_empty() || digits_only(int_part);
    let frac_ok = frac_part.is_empty() || digits_only(frac_part);
    if !int_ok || !frac_ok || (int_part.is_empty() && frac_part.is_empty()) {
        return Err(DeskError::InvalidAmount(amount.to_string()));
    }

    // Truncate excess fractional digits, right-pad the rest.
    let wanted = decimals as usize;
    let mut frac: String = frac_part.chars().take(wanted).collect();
    while frac.len() < wanted {
        frac.push('0');
    }

    let mut digits = format!("{int_part}{frac}");
    digits = digits.trim_start_matches('0').to_string();
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(&digits, 10)
        .map_err(|_| DeskError::InvalidAmount(amount.to_string()))
}

/// Scales a human-decimal string into a fixed-point integer string.
pub fn to_fixed_point(amount: &str, decimals: u8) -> Result<String, DeskError> {
    Ok(to_fixed_point_u256(amount, decimals)?.to_string())
}

/// Inverse of [`to_fixed_point`]: fixed-point integer string back to a
/// human-decimal string at full precision (no display rounding).
pub fn to_decimal(amount: &str, decimals: u8) -> Result<String, DeskError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DeskError::InvalidAmount(amount.to_string()));
    }

    let digits = trimmed.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    if decimals == 0 {
        return Ok(digits.to_string());
    }

    let wanted = decimals as usize;
    let padded = format!("{digits:0>width$}", width = wanted + 1);
    let split = padded.len() - wanted;
    let (int_part, frac_part) = padded.split_at(split);
    let frac_trimmed = frac_part.trim_end_matches('0');

    if frac_trimmed.is_empty() {
        Ok(int_part.to_string())
    } else {
        Ok(format!("{int_part}.{frac_trimmed}"))
    }
}

/// Rounds a value to `digits` significant digits for display.
///
/// Values whose integer part already exceeds `digits` digits keep their
/// full integer precision — display never corrupts the magnitude.
pub fn to_significant(value: Decimal, digits: u32) -> String {
    if value.is_zero() {
        return "0".to_string();
    }

    let abs = value.abs();
    let dp = if abs >= Decimal::ONE {
        let int_digits = abs.trunc().to_string().len() as u32;
        digits.saturating_sub(int_digits)
    } else {
        // Count zeros between the point and the first significant digit.
        let mut leading = 0u32;
        let mut probe = abs;
        while probe < Decimal::ONE {
            probe *= Decimal::TEN;
            leading += 1;
        }
        digits + leading - 1
    };

    value
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}
