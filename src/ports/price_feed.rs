//! Price Source Port - Market Reference Rate Interface
//!
//! Supplies the current market rate for a token pair, used to derive
//! dependent amounts and to gate limit prices against the market.
//! Fetching strategy (AMM quote, oracle, aggregator) is entirely the
//! adapter's concern.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::token::Token;

/// Trait for market reference price providers.
#[async_trait]
pub trait PriceSource: Send + Sync + 'static {
    /// Current market rate for the pair in canonical output-per-input
    /// terms (human units). `None` when no rate is derivable — the
    /// draft then stays not-yet-derivable, never zero.
    async fn current_market_rate(
        &self,
        input: &Token,
        output: &Token,
    ) -> Option<Decimal>;
}
