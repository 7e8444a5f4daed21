//! Order draft state and amount derivation.
//!
//! The draft holds the authoritative, user-editable fields of an
//! in-progress order. Exactly one amount-bearing field is independent
//! (last typed by the user); the other two are always projections
//! computed by [`derive`], never stored.
//!
//! The one stored extra is `input_value`: the input-side anchor kept
//! alongside the typed value so that a typed price can resolve into
//! concrete amounts. It is refreshed whenever the input amount is typed
//! or derived, and is what makes "type 1000 in, then type a price"
//! yield a concrete output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::amount::parse_amount;
use crate::domain::rate::{self, RateKind};
use crate::domain::token::Token;

/// Which of the three amount-bearing fields the user last edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Input,
    Output,
    Price,
}

/// A side of the pair, for token selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Input,
    Output,
}

/// Mutable order-entry state. One draft per entry session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub input_token: Option<Token>,
    pub output_token: Option<Token>,
    /// The single user-sourced field; the other two are derived.
    pub independent_field: Field,
    /// Raw typed string for the independent field.
    pub typed_value: String,
    /// Input-side anchor amount (see module docs).
    pub input_value: String,
    pub rate_kind: RateKind,
    /// Slippage tolerance in basis points; affects only the minimum
    /// return computed at submission time, never displayed amounts.
    pub slippage_bps: u32,
}

impl OrderDraft {
    /// Creates an empty draft with the given default slippage.
    pub fn new(slippage_bps: u32) -> Self {
        Self {
            input_token: None,
            output_token: None,
            independent_field: Field::Input,
            typed_value: String::new(),
            input_value: String::new(),
            rate_kind: RateKind::Mul,
            slippage_bps,
        }
    }

    /// Records a user edit: `field` becomes independent with `value`.
    ///
    /// The previous independent field's typed string is discarded.
    /// Editing the input amount also refreshes the anchor.
    pub fn set_independent_field(&mut self, field: Field, value: &str) {
        self.independent_field = field;
        self.typed_value = value.to_string();
        if field == Field::Input {
            self.input_value = value.to_string();
        }
    }

    /// Selects a token on one side.
    ///
    /// Selecting the token already present on the opposite side swaps
    /// the two sides instead — a draft can never hold identical tokens
    /// through selection.
    pub fn select_token(&mut self, side: Side, token: Token) {
        match side {
            Side::Input => {
                if self
                    .output_token
                    .as_ref()
                    .is_some_and(|t| t.same_asset(&token))
                {
                    self.output_token = self.input_token.take();
                }
                self.input_token = Some(token);
            }
            Side::Output => {
                if self
                    .input_token
                    .as_ref()
                    .is_some_and(|t| t.same_asset(&token))
                {
                    self.input_token = self.output_token.take();
                }
                self.output_token = Some(token);
            }
        }
    }

    /// Swaps input and output tokens.
    ///
    /// If the independent field is an amount, it moves to the opposite
    /// side so the typed value stays attached to the side it was typed
    /// for. A typed price stays a typed price.
    pub fn switch_tokens(&mut self) {
        std::mem::swap(&mut self.input_token, &mut self.output_token);
        self.independent_field = match self.independent_field {
            Field::Input => Field::Output,
            Field::Output => Field::Input,
            Field::Price => Field::Price,
        };
    }

    /// Stores a new slippage tolerance verbatim. No amounts recompute.
    pub fn set_slippage(&mut self, bps: u32) {
        self.slippage_bps = bps;
    }

    /// Clears typed amounts after a successful submission; tokens,
    /// rate orientation and slippage survive for the next order.
    pub fn reset(&mut self) {
        self.independent_field = Field::Input;
        self.typed_value.clear();
        self.input_value.clear();
    }
}

/// Projection of the draft: all three amount fields, derived from the
/// single independent one plus the current market rate. `None` means
/// not derivable — never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAmounts {
    /// Input amount in human units.
    pub input: Option<Decimal>,
    /// Output amount in human units.
    pub output: Option<Decimal>,
    /// Price in the displayed orientation (`rate_kind`).
    pub price: Option<Decimal>,
}

/// Computes [`DerivedAmounts`] from a draft and the current market
/// rate (canonical output-per-input orientation).
///
/// Pure: same inputs, same projection. Sessions memoize this by its
/// input tuple.
pub fn derive(draft: &OrderDraft, market_mul_rate: Option<Decimal>) -> DerivedAmounts {
    match draft.independent_field {
        Field::Input => {
            let input = parse_amount(&draft.typed_value);
            let output = match (input, market_mul_rate) {
                (Some(i), Some(m)) => Some(i * m),
                _ => None,
            };
            let price = market_mul_rate
                .and_then(|m| rate::orient(m, draft.rate_kind).ok());
            DerivedAmounts { input, output, price }
        }
        Field::Output => {
            let output = parse_amount(&draft.typed_value);
            let input = match (output, market_mul_rate) {
                (Some(o), Some(m)) if !m.is_zero() => Some(o / m),
                _ => None,
            };
            let price = market_mul_rate
                .and_then(|m| rate::orient(m, draft.rate_kind).ok());
            DerivedAmounts { input, output, price }
        }
        Field::Price => {
            let price = parse_amount(&draft.typed_value);
            let input = parse_amount(&draft.input_value);
            let output = match (price, input) {
                (Some(p), Some(i)) => {
                    rate::apply_typed_price(p, i, draft.rate_kind).ok()
                }
                _ => None,
            };
            DerivedAmounts { input, output, price }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use rust_decimal_macros::dec;

    fn usdc() -> Token {
        Token::new(
            address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
            6,
            "USDC",
        )
    }

    fn weth() -> Token {
        Token::new(
            address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            18,
            "WETH",
        )
    }

    fn draft_with_pair() -> OrderDraft {
        let mut draft = OrderDraft::new(100);
        draft.select_token(Side::Input, usdc());
        draft.select_token(Side::Output, weth());
        draft
    }

    #[test]
    fn test_select_collision_swaps_sides() {
        let mut draft = draft_with_pair();
        // Selecting USDC on the output side swaps, never duplicates.
        draft.select_token(Side::Output, usdc());
        assert_eq!(draft.input_token.as_ref().unwrap().symbol, "WETH");
        assert_eq!(draft.output_token.as_ref().unwrap().symbol, "USDC");
    }

    #[test]
    fn test_select_collision_on_input_side() {
        let mut draft = draft_with_pair();
        draft.select_token(Side::Input, weth());
        assert_eq!(draft.input_token.as_ref().unwrap().symbol, "WETH");
        assert_eq!(draft.output_token.as_ref().unwrap().symbol, "USDC");
    }

    #[test]
    fn test_switch_tokens_moves_independent_amount() {
        let mut draft = draft_with_pair();
        draft.set_independent_field(Field::Input, "1000");
        draft.switch_tokens();
        assert_eq!(draft.input_token.as_ref().unwrap().symbol, "WETH");
        assert_eq!(draft.independent_field, Field::Output);
        assert_eq!(draft.typed_value, "1000");
    }

    #[test]
    fn test_switch_tokens_keeps_price_independent() {
        let mut draft = draft_with_pair();
        draft.set_independent_field(Field::Price, "0.0005");
        draft.switch_tokens();
        assert_eq!(draft.independent_field, Field::Price);
    }

    #[test]
    fn test_derive_from_input_with_market() {
        let mut draft = draft_with_pair();
        draft.set_independent_field(Field::Input, "1000");
        let derived = derive(&draft, Some(dec!(0.0004)));
        assert_eq!(derived.input, Some(dec!(1000)));
        assert_eq!(derived.output, Some(dec!(0.4)));
        assert_eq!(derived.price, Some(dec!(0.0004)));
    }

    #[test]
    fn test_derive_without_market_is_undefined_not_zero() {
        let mut draft = draft_with_pair();
        draft.set_independent_field(Field::Input, "1000");
        let derived = derive(&draft, None);
        assert_eq!(derived.input, Some(dec!(1000)));
        assert_eq!(derived.output, None);
        assert_eq!(derived.price, None);
    }

    #[test]
    fn test_derive_typed_price_uses_anchor() {
        // 1000 USDC in, MUL price 0.0005 → 0.5 out.
        let mut draft = draft_with_pair();
        draft.set_independent_field(Field::Input, "1000.0");
        draft.set_independent_field(Field::Price, "0.0005");
        let derived = derive(&draft, Some(dec!(0.0004)));
        assert_eq!(derived.input, Some(dec!(1000)));
        assert_eq!(derived.output, Some(dec!(0.5)));
        assert_eq!(derived.price, Some(dec!(0.0005)));
    }

    #[test]
    fn test_derive_output_independent() {
        let mut draft = draft_with_pair();
        draft.set_independent_field(Field::Output, "0.5");
        let derived = derive(&draft, Some(dec!(0.0005)));
        assert_eq!(derived.input, Some(dec!(1000)));
        assert_eq!(derived.output, Some(dec!(0.5)));
    }

    #[test]
    fn test_reset_keeps_tokens_and_slippage() {
        let mut draft = draft_with_pair();
        draft.set_slippage(250);
        draft.set_independent_field(Field::Input, "42");
        draft.reset();
        assert!(draft.input_token.is_some());
        assert_eq!(draft.slippage_bps, 250);
        assert!(draft.typed_value.is_empty());
        assert_eq!(draft.independent_field, Field::Input);
    }
}
