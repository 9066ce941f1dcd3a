//! Carbon credit market: price random walk plus the trading ledger.

use rand::Rng;
use rand::rngs::StdRng;

use serde::{Deserialize, Serialize};

use super::history::RingBuffer;

/// Prices never fall below this floor.
pub const PRICE_FLOOR: f64 = 5.0;
/// Half-width of the per-tick price change.
const PRICE_STEP: f64 = 0.025;
/// Price history retention.
pub const PRICE_HISTORY_CAPACITY: usize = 30;

/// Direction of a trade command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Whether a trade was applied or silently rejected.
///
/// Rejection is an outcome, not an error: the ledger is simply left
/// unchanged and the caller may compare snapshots to detect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOutcome {
    Applied,
    Rejected,
}

/// One point of the bounded price history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub price: f64,
}

/// Published view of the market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub price: f64,
    pub history: Vec<PricePoint>,
    pub wallet_balance: f64,
    pub portfolio_value: f64,
}

/// The carbon market ledger and price walk.
///
/// Selling is deliberately unguarded (no short-sell check); see DESIGN.md.
#[derive(Debug, Clone)]
pub struct CarbonMarket {
    price: f64,
    history: RingBuffer<PricePoint>,
    wallet_balance: f64,
    portfolio_value: f64,
}

impl Default for CarbonMarket {
    fn default() -> Self {
        Self::new()
    }
}

impl CarbonMarket {
    /// Opens the market at the session defaults.
    pub fn new() -> Self {
        Self {
            price: 13.42,
            history: RingBuffer::new(PRICE_HISTORY_CAPACITY),
            wallet_balance: 24.50,
            portfolio_value: 1200.0,
        }
    }

    /// Advances the price by one floored random-walk step and records it.
    ///
    /// Runs unconditionally every base tick.
    pub fn step(&mut self, timestamp_ms: i64, rng: &mut StdRng) {
        let next = self.price + rng.random_range(-PRICE_STEP..PRICE_STEP);
        self.price = next.max(PRICE_FLOOR);
        self.history.push(PricePoint {
            timestamp_ms,
            price: self.price,
        });
    }

    /// Executes a trade at the current price.
    ///
    /// A buy that would overdraw the wallet is rejected with the ledger
    /// unchanged, as is any non-finite or non-positive amount. Sells always
    /// apply.
    pub fn trade(&mut self, amount: f64, side: TradeSide) -> TradeOutcome {
        if !amount.is_finite() || amount <= 0.0 {
            return TradeOutcome::Rejected;
        }
        let cost = amount * self.price;
        match side {
            TradeSide::Buy => {
                if self.wallet_balance < cost {
                    return TradeOutcome::Rejected;
                }
                self.wallet_balance -= cost;
                self.portfolio_value += cost;
            }
            TradeSide::Sell => {
                self.wallet_balance += cost;
                self.portfolio_value -= cost;
            }
        }
        TradeOutcome::Applied
    }

    /// Current spot price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Current wallet balance.
    pub fn wallet_balance(&self) -> f64 {
        self.wallet_balance
    }

    /// Current portfolio value.
    pub fn portfolio_value(&self) -> f64 {
        self.portfolio_value
    }

    /// Owned view for publishing.
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            price: self.price,
            history: self.history.to_vec(),
            wallet_balance: self.wallet_balance,
            portfolio_value: self.portfolio_value,
        }
    }
}
