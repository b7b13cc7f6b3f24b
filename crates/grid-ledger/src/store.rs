use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::Utc;
use grid_types::{
    Address, Compensation, CompensationId, OfferId, OutageId, TradeOffer, Transaction,
    TransactionId, TransactionStatus,
};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::LedgerConfig;
use crate::error::LedgerError;

/// Offer collection: insertion-ordered records plus an id index.
///
/// Records are never removed; a fully-matched offer is deactivated in
/// place.
#[derive(Default)]
pub(crate) struct OfferBook {
    pub(crate) entries: Vec<TradeOffer>,
    index: HashMap<OfferId, usize>,
    next_id: u64,
}

impl OfferBook {
    fn allocate_id(&mut self) -> OfferId {
        self.next_id += 1;
        OfferId::new(self.next_id)
    }

    pub(crate) fn get(&self, id: OfferId) -> Option<&TradeOffer> {
        self.index.get(&id).map(|&pos| &self.entries[pos])
    }

    fn get_mut(&mut self, id: OfferId) -> Option<&mut TradeOffer> {
        let pos = *self.index.get(&id)?;
        Some(&mut self.entries[pos])
    }
}

/// Transaction collection: append-only log plus an id index.
#[derive(Default)]
pub(crate) struct TransactionLog {
    pub(crate) entries: Vec<Transaction>,
    index: HashMap<TransactionId, usize>,
    next_id: u64,
}

impl TransactionLog {
    fn allocate_id(&mut self) -> TransactionId {
        self.next_id += 1;
        TransactionId::new(self.next_id)
    }

    fn get_mut(&mut self, id: TransactionId) -> Option<&mut Transaction> {
        let pos = *self.index.get(&id)?;
        Some(&mut self.entries[pos])
    }
}

/// Compensation collection. `by_pair` enforces the one-record-per
/// `(user, outage)` invariant; `reserved` holds claims whose settlement
/// is in flight.
#[derive(Default)]
pub(crate) struct CompensationBook {
    pub(crate) entries: Vec<Compensation>,
    pub(crate) by_pair: HashMap<(Address, OutageId), usize>,
    pub(crate) reserved: HashSet<CompensationId>,
    next_id: u64,
}

impl CompensationBook {
    pub(crate) fn allocate_id(&mut self) -> CompensationId {
        self.next_id += 1;
        CompensationId::new(self.next_id)
    }

    pub(crate) fn get_mut(&mut self, id: CompensationId) -> Option<&mut Compensation> {
        self.entries.iter_mut().find(|c| c.id == id)
    }
}

/// In-memory ledger store: the single owner of the offer, transaction,
/// and compensation collections.
///
/// Each collection sits behind its own `RwLock`, so mutations on one
/// collection never contend with the others. Identifiers are allocated
/// under the write lock and are unique and strictly increasing per
/// collection.
pub struct InMemoryLedger {
    config: LedgerConfig,
    pub(crate) offers: RwLock<OfferBook>,
    pub(crate) transactions: RwLock<TransactionLog>,
    pub(crate) compensations: RwLock<CompensationBook>,
}

impl InMemoryLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            offers: RwLock::new(OfferBook::default()),
            transactions: RwLock::new(TransactionLog::default()),
            compensations: RwLock::new(CompensationBook::default()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ---- Offer operations ----

    /// Create a new trade offer and allocate the next monotonic id.
    pub fn create_offer(
        &self,
        seller: Address,
        seller_name: Option<String>,
        amount: Decimal,
        price_per_token: Decimal,
        location: String,
    ) -> Result<TradeOffer, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidInput(format!(
                "offer amount must be positive, got {amount}"
            )));
        }
        if price_per_token <= Decimal::ZERO {
            return Err(LedgerError::InvalidInput(format!(
                "price per token must be positive, got {price_per_token}"
            )));
        }

        let mut book = self.offers.write().map_err(|_| LedgerError::LockPoisoned)?;
        let id = book.allocate_id();
        let offer = TradeOffer::new(
            id,
            seller,
            seller_name,
            amount,
            price_per_token,
            location,
            Utc::now(),
        );
        let pos = book.entries.len();
        book.index.insert(id, pos);
        book.entries.push(offer.clone());

        info!(offer_id = %id, seller = %offer.seller.short(), %amount, %price_per_token, "offer created");
        Ok(offer)
    }

    /// Look up an offer by id, active or not.
    pub fn offer(&self, id: OfferId) -> Result<TradeOffer, LedgerError> {
        let book = self.offers.read().map_err(|_| LedgerError::LockPoisoned)?;
        book.get(id).cloned().ok_or(LedgerError::OfferNotFound(id))
    }

    /// Look up an offer that is still active. Inactive offers report
    /// `OfferNotFound`, same as absent ones: callers on the buy path
    /// cannot act on either.
    pub fn active_offer(&self, id: OfferId) -> Result<TradeOffer, LedgerError> {
        let offer = self.offer(id)?;
        if !offer.active {
            return Err(LedgerError::OfferNotFound(id));
        }
        Ok(offer)
    }

    /// Decrement an offer's remaining amount after a confirmed trade,
    /// deactivating it when fully matched.
    pub fn consume_offer(&self, id: OfferId, amount: Decimal) -> Result<TradeOffer, LedgerError> {
        let mut book = self.offers.write().map_err(|_| LedgerError::LockPoisoned)?;
        let offer = book.get_mut(id).ok_or(LedgerError::OfferNotFound(id))?;
        if !offer.active {
            return Err(LedgerError::OfferNotFound(id));
        }
        if amount > offer.remaining {
            return Err(LedgerError::InsufficientOffer {
                requested: amount,
                remaining: offer.remaining,
            });
        }

        offer.remaining -= amount;
        if offer.remaining.is_zero() {
            offer.active = false;
        }
        debug!(offer_id = %id, %amount, remaining = %offer.remaining, active = offer.active, "offer consumed");
        Ok(offer.clone())
    }

    // ---- Transaction operations ----

    /// Record a pending transaction and allocate the next monotonic id.
    /// Does not touch the offer book; supply is decremented by the
    /// caller once settlement is confirmed.
    pub fn record_transaction(
        &self,
        buyer: Address,
        seller: Address,
        amount: Decimal,
        price: Decimal,
    ) -> Result<Transaction, LedgerError> {
        let mut log = self
            .transactions
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        let id = log.allocate_id();
        let tx = Transaction::pending(id, buyer, seller, amount, price, Utc::now());
        let pos = log.entries.len();
        log.index.insert(id, pos);
        log.entries.push(tx.clone());

        debug!(transaction_id = %id, buyer = %tx.buyer.short(), %amount, %price, "transaction recorded");
        Ok(tx)
    }

    pub fn transaction(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let log = self
            .transactions
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        log.index
            .get(&id)
            .map(|&pos| log.entries[pos].clone())
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    /// Mark a pending transaction completed, attaching the settlement
    /// result.
    pub fn complete_transaction(
        &self,
        id: TransactionId,
        settlement_hash: &str,
        block_reference: &str,
        simulated: bool,
    ) -> Result<Transaction, LedgerError> {
        let mut log = self
            .transactions
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        let tx = log.get_mut(id).ok_or(LedgerError::TransactionNotFound(id))?;
        if !tx.status.can_transition_to(TransactionStatus::Completed) {
            return Err(LedgerError::InvalidTransition {
                from: tx.status,
                to: TransactionStatus::Completed,
            });
        }

        tx.status = TransactionStatus::Completed;
        tx.settlement_hash = Some(settlement_hash.to_string());
        tx.block_reference = Some(block_reference.to_string());
        tx.simulated = simulated;
        info!(transaction_id = %id, simulated, "transaction completed");
        Ok(tx.clone())
    }

    /// Mark a pending transaction failed after an authority rejection.
    /// The record is retained for manual reconciliation.
    pub fn fail_transaction(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let mut log = self
            .transactions
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        let tx = log.get_mut(id).ok_or(LedgerError::TransactionNotFound(id))?;
        if !tx.status.can_transition_to(TransactionStatus::Failed) {
            return Err(LedgerError::InvalidTransition {
                from: tx.status,
                to: TransactionStatus::Failed,
            });
        }

        tx.status = TransactionStatus::Failed;
        info!(transaction_id = %id, "transaction failed");
        Ok(tx.clone())
    }

    // ---- Counters ----

    pub fn offer_count(&self) -> Result<usize, LedgerError> {
        let book = self.offers.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(book.entries.len())
    }

    pub fn transaction_count(&self) -> Result<usize, LedgerError> {
        let log = self
            .transactions
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        Ok(log.entries.len())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}
