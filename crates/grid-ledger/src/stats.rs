//! Derived marketplace and compensation aggregates. Read-only; nothing
//! here mutates the store.

use grid_types::{CompensationStats, MarketplaceStats, TransactionStatus};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::store::InMemoryLedger;

impl InMemoryLedger {
    /// Compute marketplace aggregates from the offer and transaction
    /// collections.
    pub fn compute_stats(&self) -> Result<MarketplaceStats, LedgerError> {
        let (active_offer_count, price_sum) = {
            let book = self.offers.read().map_err(|_| LedgerError::LockPoisoned)?;
            book.entries
                .iter()
                .filter(|o| o.active)
                .fold((0u64, Decimal::ZERO), |(count, sum), o| {
                    (count + 1, sum + o.price_per_token)
                })
        };

        let (completed_trade_count, total_volume) = {
            let log = self
                .transactions
                .read()
                .map_err(|_| LedgerError::LockPoisoned)?;
            log.entries
                .iter()
                .filter(|tx| tx.status == TransactionStatus::Completed)
                .fold((0u64, Decimal::ZERO), |(count, volume), tx| {
                    (count + 1, volume + tx.price)
                })
        };

        let average_offer_price = if active_offer_count > 0 {
            price_sum / Decimal::from(active_offer_count)
        } else {
            Decimal::ZERO
        };

        Ok(MarketplaceStats {
            active_offer_count,
            completed_trade_count,
            total_volume,
            average_offer_price,
        })
    }

    /// Compute compensation-ledger aggregates.
    pub fn compensation_stats(&self) -> Result<CompensationStats, LedgerError> {
        let book = self
            .compensations
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;

        let total = book.entries.len() as u64;
        let claimed = book.entries.iter().filter(|c| c.claimed).count() as u64;
        let total_amount = book
            .entries
            .iter()
            .fold(Decimal::ZERO, |sum, c| sum + c.amount);

        Ok(CompensationStats {
            total,
            claimed,
            pending: total - claimed,
            total_amount,
        })
    }
}
