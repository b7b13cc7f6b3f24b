use std::sync::Arc;

use grid_ledger::{InMemoryLedger, OfferFilter, SortBy};
use grid_settlement::{
    ClaimSettlement, RpcAuthority, SettlementAuthority, SettlementBridge, SimulatedAuthority,
    TradeSettlement,
};
use grid_types::{
    Address, Compensation, CompensationStats, MarketplaceStats, OfferId, OutageId, TradeOffer,
    Transaction,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::config::{AuthorityMode, MarketConfig};
use crate::error::MarketResult;

/// High-level marketplace API.
///
/// Owns the ledger store and the settlement bridge; every operation on
/// the trading and compensation core goes through here.
pub struct Marketplace {
    ledger: Arc<InMemoryLedger>,
    bridge: SettlementBridge,
}

impl Marketplace {
    pub fn new(config: MarketConfig) -> Self {
        let ledger = Arc::new(InMemoryLedger::new(config.ledger));
        let authority: Arc<dyn SettlementAuthority> = match config.authority {
            AuthorityMode::Simulated => Arc::new(SimulatedAuthority::new()),
            AuthorityMode::Rpc { addr } => {
                info!(%addr, "using remote settlement authority");
                Arc::new(RpcAuthority::new(addr))
            }
        };
        let bridge = SettlementBridge::new(Arc::clone(&ledger), authority, config.bridge);
        Self { ledger, bridge }
    }

    /// Direct access to the ledger store, for read-heavy embedders.
    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    // ---- Trading ----

    /// List active offers matching `filter`, ordered per `sort`.
    pub fn list_offers(&self, filter: &OfferFilter, sort: SortBy) -> MarketResult<Vec<TradeOffer>> {
        Ok(self.ledger.list_offers(filter, sort)?)
    }

    /// Publish a new sell offer.
    pub fn create_offer(
        &self,
        seller: Address,
        seller_name: Option<String>,
        amount: Decimal,
        price_per_token: Decimal,
        location: String,
    ) -> MarketResult<TradeOffer> {
        Ok(self
            .ledger
            .create_offer(seller, seller_name, amount, price_per_token, location)?)
    }

    /// Buy `amount` tokens from `offer_id`, settling through the bridge.
    pub async fn buy(
        &self,
        buyer: Address,
        offer_id: OfferId,
        amount: Decimal,
    ) -> MarketResult<TradeSettlement> {
        Ok(self.bridge.settle_trade(buyer, offer_id, amount).await?)
    }

    /// Paginated transaction history for `address`, newest first.
    pub fn transaction_history(
        &self,
        address: &Address,
        limit: usize,
        offset: usize,
    ) -> MarketResult<Vec<Transaction>> {
        Ok(self.ledger.list_transactions(address, limit, offset)?)
    }

    pub fn stats(&self) -> MarketResult<MarketplaceStats> {
        Ok(self.ledger.compute_stats()?)
    }

    /// Token balance on the settlement network.
    pub async fn balance_of(&self, address: &Address) -> MarketResult<Decimal> {
        Ok(self.bridge.balance_of(address).await?)
    }

    // ---- Compensation ----

    /// Record a compensation owed to `user` for an outage. Called by the
    /// outage oracle; at most one record per `(user, outage)` pair.
    pub fn report_outage(
        &self,
        user: Address,
        outage_id: OutageId,
        amount: Decimal,
    ) -> MarketResult<Compensation> {
        Ok(self.ledger.record_compensation(user, outage_id, amount)?)
    }

    /// Compensations `user` can still claim.
    pub fn pending_compensations(&self, user: &Address) -> MarketResult<Vec<Compensation>> {
        Ok(self.ledger.list_pending_compensations(user)?)
    }

    /// Claim the compensation for `(user, outage_id)`, settling the
    /// payout through the bridge. At-most-once per pair.
    pub async fn claim_compensation(
        &self,
        user: Address,
        outage_id: OutageId,
    ) -> MarketResult<ClaimSettlement> {
        Ok(self
            .bridge
            .settle_compensation_claim(user, outage_id)
            .await?)
    }

    pub fn compensation_stats(&self) -> MarketResult<CompensationStats> {
        Ok(self.ledger.compensation_stats()?)
    }
}

impl Default for Marketplace {
    fn default() -> Self {
        Self::new(MarketConfig::default())
    }
}
