//! Rate model: a price as a ratio between the two sides of an order.
//!
//! A displayed price is always one of two orientations of the same
//! ratio. `Mul` shows output-per-input (typed price multiplies the
//! input), `Div` shows input-per-output (typed price divides it).
//! `apply_typed_price` is the exact algebraic inverse of `price_from`
//! for the same orientation — the round-trip law is property-tested.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::error::DeskError;

/// Orientation of the displayed price ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateKind {
    /// Price is output/input; output = input × price.
    Mul,
    /// Price is input/output; output = input ÷ price.
    Div,
}

impl RateKind {
    /// The opposite orientation.
    pub fn toggled(self) -> Self {
        match self {
            Self::Mul => Self::Div,
            Self::Div => Self::Mul,
        }
    }
}

impl std::fmt::Display for RateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mul => write!(f, "MUL"),
            Self::Div => write!(f, "DIV"),
        }
    }
}

/// Price implied by a pair of amounts, in the given orientation.
pub fn price_from(
    input: Decimal,
    output: Decimal,
    kind: RateKind,
) -> Result<Decimal, DeskError> {
    let (numerator, denominator) = match kind {
        RateKind::Mul => (output, input),
        RateKind::Div => (input, output),
    };
    if denominator.is_zero() {
        return Err(DeskError::DivisionByZero);
    }
    Ok(numerator / denominator)
}

/// Reciprocal of a price.
pub fn invert(price: Decimal) -> Result<Decimal, DeskError> {
    if price.is_zero() {
        return Err(DeskError::DivisionByZero);
    }
    Ok(Decimal::ONE / price)
}

/// Output amount implied by a typed price and the input-side amount.
pub fn apply_typed_price(
    price: Decimal,
    input_amount: Decimal,
    kind: RateKind,
) -> Result<Decimal, DeskError> {
    match kind {
        RateKind::Mul => Ok(input_amount * price),
        RateKind::Div => {
            if price.is_zero() {
                return Err(DeskError::DivisionByZero);
            }
            Ok(input_amount / price)
        }
    }
}

/// Re-expresses a canonical market rate (output-per-input) in the
/// displayed orientation.
pub fn orient(market_mul_rate: Decimal, kind: RateKind) -> Result<Decimal, DeskError> {
    match kind {
        RateKind::Mul => Ok(market_mul_rate),
        RateKind::Div => invert(market_mul_rate),
    }
}
