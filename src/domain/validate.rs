//! Draft validation: the first blocking reason, or none.
//!
//! Rules are evaluated in a fixed order so the surfaced message is
//! stable as the user fills the form in. Pure function of the draft,
//! its derived projection and the current market rate.

use rust_decimal::Decimal;

use crate::domain::draft::{DerivedAmounts, Field, OrderDraft};
use crate::domain::error::DeskError;
use crate::domain::rate::{self, RateKind};

/// A human-readable reason the submit action is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingReason {
    MissingToken,
    IdenticalTokens,
    InvalidAmount,
    NoRoute,
    PriceBelowMarket,
}

impl std::fmt::Display for BlockingReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingToken => write!(f, "Select a token"),
            Self::IdenticalTokens => {
                write!(f, "Order not allowed between identical tokens")
            }
            Self::InvalidAmount => write!(f, "Enter an amount"),
            Self::NoRoute => write!(f, "No price available for this pair"),
            Self::PriceBelowMarket => {
                write!(f, "Price is below the current market rate")
            }
        }
    }
}

impl From<BlockingReason> for DeskError {
    fn from(reason: BlockingReason) -> Self {
        match reason {
            BlockingReason::MissingToken => Self::MissingToken,
            BlockingReason::IdenticalTokens => Self::IdenticalTokens,
            BlockingReason::InvalidAmount => {
                Self::InvalidAmount("missing or non-positive amount".to_string())
            }
            BlockingReason::NoRoute => Self::NoRoute,
            BlockingReason::PriceBelowMarket => Self::PriceBelowMarket,
        }
    }
}

/// Returns the first applicable blocking reason, in rule order:
/// missing token, identical tokens, bad independent amount, no
/// derivable dependent amount, price below market.
pub fn first_blocking_reason(
    draft: &OrderDraft,
    derived: &DerivedAmounts,
    market_mul_rate: Option<Decimal>,
) -> Option<BlockingReason> {
    let (Some(input_token), Some(output_token)) =
        (&draft.input_token, &draft.output_token)
    else {
        return Some(BlockingReason::MissingToken);
    };

    if input_token.same_asset(output_token) {
        return Some(BlockingReason::IdenticalTokens);
    }

    let independent = match draft.independent_field {
        Field::Input => derived.input,
        Field::Output => derived.output,
        Field::Price => derived.price,
    };
    match independent {
        None => return Some(BlockingReason::InvalidAmount),
        Some(v) if v <= Decimal::ZERO => {
            return Some(BlockingReason::InvalidAmount)
        }
        Some(_) => {}
    }

    let (Some(input), Some(output)) = (derived.input, derived.output) else {
        return Some(BlockingReason::NoRoute);
    };

    // Desired execution rate in canonical output-per-input terms; an
    // unratioable pair (zero input) has no route either.
    let Ok(desired) = rate::price_from(input, output, RateKind::Mul) else {
        return Some(BlockingReason::NoRoute);
    };

    let market = match market_mul_rate {
        Some(m) if !m.is_zero() => m,
        _ => return Some(BlockingReason::NoRoute),
    };

    // Price impact must be at or better than market in the maker's
    // favor: (desired - market) / market >= 0.
    if (desired - market) / market < Decimal::ZERO {
        return Some(BlockingReason::PriceBelowMarket);
    }

    None
}
