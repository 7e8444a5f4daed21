//! Order Entry Session - Draft Mutation and Memoized Derivation
//!
//! One session per in-progress order. Holds the draft, recomputes the
//! derived projection through a pure function on every read, and
//! memoizes the result by its input tuple so repeated reads between
//! edits are free. This replaces the original render-triggered
//! memoization with an explicit object.

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::amount::{self, DISPLAY_SIGNIFICANT_DIGITS};
use crate::domain::draft::{self, DerivedAmounts, Field, OrderDraft, Side};
use crate::domain::rate::{self, RateKind};
use crate::domain::token::Token;
use crate::domain::validate::{self, BlockingReason};

/// Inputs the derivation depends on; cache is valid while they match.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DerivationKey {
    field: Field,
    typed_value: String,
    input_value: String,
    rate_kind: RateKind,
    market: Option<Decimal>,
}

impl DerivationKey {
    fn of(draft: &OrderDraft, market: Option<Decimal>) -> Self {
        Self {
            field: draft.independent_field,
            typed_value: draft.typed_value.clone(),
            input_value: draft.input_value.clone(),
            rate_kind: draft.rate_kind,
            market,
        }
    }
}

/// The order-entry session: authoritative draft + derived projection.
#[derive(Debug)]
pub struct OrderEntrySession {
    draft: OrderDraft,
    cache: Option<(DerivationKey, DerivedAmounts)>,
}

impl OrderEntrySession {
    /// Opens a fresh session with the given default slippage.
    pub fn new(default_slippage_bps: u32) -> Self {
        Self {
            draft: OrderDraft::new(default_slippage_bps),
            cache: None,
        }
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Records a user edit of an amount or price field.
    pub fn set_independent_field(&mut self, field: Field, value: &str) {
        self.draft.set_independent_field(field, value);
        self.cache = None;
    }

    /// Selects a token; colliding with the opposite side swaps sides.
    pub fn select_token(&mut self, side: Side, token: Token) {
        self.draft.select_token(side, token);
        self.cache = None;
    }

    /// Swaps the two sides, moving the typed amount with its side.
    pub fn switch_tokens(&mut self) {
        self.draft.switch_tokens();
        self.cache = None;
    }

    /// Slippage only affects submission-time minimum return, so the
    /// derivation cache stays valid.
    pub fn set_slippage(&mut self, bps: u32) {
        self.draft.set_slippage(bps);
    }

    /// Derives the full projection for the current draft and market
    /// rate (canonical output-per-input orientation), memoized.
    ///
    /// When the independent field is an amount, the derived input also
    /// refreshes the draft's input anchor so a subsequent price edit
    /// resolves against it.
    pub fn derive(&mut self, market_mul_rate: Option<Decimal>) -> DerivedAmounts {
        let key = DerivationKey::of(&self.draft, market_mul_rate);
        if let Some((cached_key, cached)) = &self.cache {
            if *cached_key == key {
                return cached.clone();
            }
        }

        let derived = draft::derive(&self.draft, market_mul_rate);

        if self.draft.independent_field != Field::Price {
            if let Some(input) = derived.input {
                self.draft.input_value = input.normalize().to_string();
            }
        }

        self.cache = Some((DerivationKey::of(&self.draft, market_mul_rate), derived.clone()));
        derived
    }

    /// Flips the displayed price orientation and re-seeds the price
    /// field with the inverted value at display precision, making the
    /// price the independent field. A display-state transition only —
    /// no draft amount changes. With nothing displayable, just the
    /// orientation flips.
    pub fn toggle_rate_kind(&mut self, market_mul_rate: Option<Decimal>) {
        let displayed = self.derive(market_mul_rate).price;
        self.draft.rate_kind = self.draft.rate_kind.toggled();
        self.cache = None;

        if let Some(price) = displayed {
            if let Ok(inverted) = rate::invert(price) {
                let seeded =
                    amount::to_significant(inverted, DISPLAY_SIGNIFICANT_DIGITS);
                self.draft.set_independent_field(Field::Price, &seeded);
            }
        }
        debug!(rate_kind = %self.draft.rate_kind, "Rate orientation toggled");
    }

    /// First blocking reason for the current draft, or `None` when the
    /// order is submittable.
    pub fn validate(&mut self, market_mul_rate: Option<Decimal>) -> Option<BlockingReason> {
        let derived = self.derive(market_mul_rate);
        validate::first_blocking_reason(&self.draft, &derived, market_mul_rate)
    }

    /// Clears the typed amounts after a successful submission; the
    /// selected pair, orientation and slippage carry over.
    pub fn reset(&mut self) {
        self.draft.reset();
        self.cache = None;
    }
}
