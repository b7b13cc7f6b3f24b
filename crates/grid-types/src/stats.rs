use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Marketplace aggregates, computed on demand from the offer and
/// transaction collections. Not stored; no independent lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceStats {
    /// Number of offers currently active.
    pub active_offer_count: u64,
    /// Number of transactions that reached `completed`.
    pub completed_trade_count: u64,
    /// Sum of settlement totals across completed trades.
    pub total_volume: Decimal,
    /// Mean `price_per_token` across active offers; zero when there are none.
    pub average_offer_price: Decimal,
}

/// Compensation-ledger aggregates, derived on demand.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompensationStats {
    pub total: u64,
    pub claimed: u64,
    pub pending: u64,
    /// Sum of payout amounts across all compensation records.
    pub total_amount: Decimal,
}
