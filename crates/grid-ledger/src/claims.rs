//! Compensation ledger: at-most-once outage payouts.
//!
//! A claim moves through three steps. `reserve_claim` atomically marks a
//! record as in flight so exactly one concurrent caller may proceed to
//! settlement. `finalize_claim` commits the payout (idempotently) once
//! settlement succeeds. `release_claim` rolls a reservation back when
//! settlement fails, so the user may retry.

use chrono::Utc;
use grid_types::{Address, Compensation, CompensationId, OutageId};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::LedgerError;
use crate::store::InMemoryLedger;

impl InMemoryLedger {
    /// Record a compensation owed to `user` for `outage_id`. Called by
    /// the external outage oracle.
    ///
    /// At most one record may exist per `(user, outage)` pair; a second
    /// report for the same pair fails with `DuplicateCompensation`.
    pub fn record_compensation(
        &self,
        user: Address,
        outage_id: OutageId,
        amount: Decimal,
    ) -> Result<Compensation, LedgerError> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::InvalidInput(format!(
                "compensation amount must be non-negative, got {amount}"
            )));
        }

        let mut book = self
            .compensations
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        let key = (user.clone(), outage_id);
        if book.by_pair.contains_key(&key) {
            return Err(LedgerError::DuplicateCompensation { user, outage_id });
        }

        let id = book.allocate_id();
        let comp = Compensation::unclaimed(id, user, outage_id, amount, Utc::now());
        let pos = book.entries.len();
        book.by_pair.insert(key, pos);
        book.entries.push(comp.clone());

        info!(compensation_id = %id, user = %comp.user.short(), %outage_id, %amount, "compensation recorded");
        Ok(comp)
    }

    /// Compensations for `user` that are still claimable. Records whose
    /// settlement is in flight are excluded until the reservation is
    /// released or finalized.
    pub fn list_pending_compensations(
        &self,
        user: &Address,
    ) -> Result<Vec<Compensation>, LedgerError> {
        let book = self
            .compensations
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        Ok(book
            .entries
            .iter()
            .filter(|c| &c.user == user && !c.claimed && !book.reserved.contains(&c.id))
            .cloned()
            .collect())
    }

    /// Atomically reserve the right to settle a claim.
    ///
    /// Exactly one of N concurrent callers for the same `(user, outage)`
    /// pair succeeds; the rest observe `AlreadyClaimed`. The write lock
    /// covers the whole scan-and-mark, which is what makes the
    /// reservation atomic.
    pub fn reserve_claim(
        &self,
        user: &Address,
        outage_id: OutageId,
    ) -> Result<Compensation, LedgerError> {
        let mut book = self
            .compensations
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        let key = (user.clone(), outage_id);
        let pos = *book
            .by_pair
            .get(&key)
            .ok_or_else(|| LedgerError::NoPendingCompensation {
                user: user.clone(),
                outage_id,
            })?;

        let comp = book.entries[pos].clone();
        if comp.claimed || book.reserved.contains(&comp.id) {
            return Err(LedgerError::AlreadyClaimed {
                user: user.clone(),
                outage_id,
            });
        }

        book.reserved.insert(comp.id);
        debug!(compensation_id = %comp.id, user = %user.short(), %outage_id, "claim reserved");
        Ok(comp)
    }

    /// Roll a reservation back after a failed settlement so the user may
    /// retry. Releasing a record that is not reserved is a no-op.
    pub fn release_claim(&self, id: CompensationId) -> Result<(), LedgerError> {
        let mut book = self
            .compensations
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        if book.get_mut(id).is_none() {
            return Err(LedgerError::CompensationNotFound(id));
        }
        if book.reserved.remove(&id) {
            debug!(compensation_id = %id, "claim reservation released");
        }
        Ok(())
    }

    /// Commit a settled claim: `claimed = true`, `claimed_at = now`.
    ///
    /// Idempotent: finalizing an already-claimed record returns it
    /// unchanged (same `claimed_at`, same hash). This protects against
    /// duplicate settlement callbacks.
    pub fn finalize_claim(
        &self,
        id: CompensationId,
        settlement_hash: &str,
    ) -> Result<Compensation, LedgerError> {
        let mut book = self
            .compensations
            .write()
            .map_err(|_| LedgerError::LockPoisoned)?;
        let comp = book
            .get_mut(id)
            .ok_or(LedgerError::CompensationNotFound(id))?;

        if comp.claimed {
            return Ok(comp.clone());
        }

        comp.claimed = true;
        comp.claimed_at = Some(Utc::now());
        comp.settlement_hash = Some(settlement_hash.to_string());
        let finalized = comp.clone();
        book.reserved.remove(&id);

        info!(compensation_id = %id, "claim finalized");
        Ok(finalized)
    }

    pub fn compensation(&self, id: CompensationId) -> Result<Compensation, LedgerError> {
        let book = self
            .compensations
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        book.entries
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(LedgerError::CompensationNotFound(id))
    }
}
