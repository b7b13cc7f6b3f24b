//! Trade and claim execution against the settlement authority.
//!
//! Every settlement call runs under a per-attempt timeout and a bounded
//! retry loop. When the authority stays unreachable the bridge falls
//! back to a deterministic simulated settlement rather than leaving the
//! caller without an outcome. Only an explicit rejection from the
//! authority surfaces as an error.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use grid_ledger::InMemoryLedger;
use grid_types::{Address, Compensation, OfferId, OutageId, Transaction};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::authority::{SettlementAuthority, SettlementReceipt};
use crate::error::{AuthorityError, SettlementError};
use crate::simulator::SimulatedAuthority;

/// Retry and timeout policy for authority calls.
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Per-attempt deadline. A timed-out attempt counts as unavailable.
    pub attempt_timeout: Duration,
    /// Total attempts before falling back to simulated settlement.
    pub max_attempts: u32,
    /// Base delay between attempts, multiplied by the attempt number.
    pub backoff_base: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(30),
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
        }
    }
}

/// Outcome of a settled trade, as recorded in the ledger.
#[derive(Clone, Debug)]
pub struct TradeSettlement {
    pub transaction: Transaction,
    pub offer_remaining: Decimal,
    pub simulated: bool,
}

/// Outcome of a settled compensation claim.
#[derive(Clone, Debug)]
pub struct ClaimSettlement {
    pub compensation: Compensation,
    pub simulated: bool,
}

enum Outcome<T> {
    Confirmed(T),
    Rejected(String),
    Exhausted,
}

/// Executes trades and compensation claims: validates against the
/// ledger, drives the authority with retries, and commits the result
/// back to the ledger.
///
/// No ledger lock is ever held across an authority call.
pub struct SettlementBridge {
    ledger: Arc<InMemoryLedger>,
    authority: Arc<dyn SettlementAuthority>,
    config: BridgeConfig,
}

impl SettlementBridge {
    pub fn new(
        ledger: Arc<InMemoryLedger>,
        authority: Arc<dyn SettlementAuthority>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            ledger,
            authority,
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Run `call` up to `max_attempts` times, each under the attempt
    /// timeout. `Rejected` is terminal and stops the loop immediately;
    /// unavailability and timeouts are retried with linear backoff.
    async fn with_retry<T, F, Fut>(&self, op: &str, mut call: F) -> Outcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AuthorityError>>,
    {
        for attempt in 1..=self.config.max_attempts {
            match tokio::time::timeout(self.config.attempt_timeout, call()).await {
                Ok(Ok(value)) => return Outcome::Confirmed(value),
                Ok(Err(AuthorityError::Rejected(reason))) => {
                    warn!(op, attempt, %reason, "authority rejected request");
                    return Outcome::Rejected(reason);
                }
                Ok(Err(AuthorityError::Unavailable(reason))) => {
                    warn!(op, attempt, %reason, "authority unavailable");
                }
                Err(_) => {
                    warn!(op, attempt, timeout = ?self.config.attempt_timeout, "authority call timed out");
                }
            }
            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.backoff_base * attempt).await;
            }
        }
        Outcome::Exhausted
    }

    /// Buy `amount` tokens from `offer_id` on behalf of `buyer`.
    ///
    /// The transaction is recorded as pending before any authority call
    /// so an in-flight settlement is always visible in the log. Supply
    /// is decremented only after the settlement is confirmed (real or
    /// simulated), and the transaction completes only once supply has
    /// been secured: a buyer that loses the supply race to a concurrent
    /// settlement gets a `failed` transaction, never a completed one
    /// without tokens behind it. A rejection likewise leaves the offer
    /// untouched and the transaction `failed`.
    pub async fn settle_trade(
        &self,
        buyer: Address,
        offer_id: OfferId,
        amount: Decimal,
    ) -> Result<TradeSettlement, SettlementError> {
        if amount <= Decimal::ZERO {
            return Err(SettlementError::Ledger(
                grid_ledger::LedgerError::InvalidInput(format!(
                    "trade amount must be positive, got {amount}"
                )),
            ));
        }

        let offer = self.ledger.active_offer(offer_id)?;
        if amount > offer.remaining {
            return Err(SettlementError::Ledger(
                grid_ledger::LedgerError::InsufficientOffer {
                    requested: amount,
                    remaining: offer.remaining,
                },
            ));
        }

        let price = offer.price_of(amount);
        let tx = self
            .ledger
            .record_transaction(buyer, offer.seller.clone(), amount, price)?;

        let outcome = self
            .with_retry("execute_trade", || {
                self.authority.execute_trade(offer_id, amount)
            })
            .await;

        let (receipt, simulated) = match outcome {
            Outcome::Confirmed(receipt) => (receipt, false),
            Outcome::Exhausted => {
                info!(transaction_id = %tx.id, %offer_id, "falling back to simulated settlement");
                (SimulatedAuthority::trade_receipt(offer_id, amount), true)
            }
            Outcome::Rejected(reason) => {
                self.ledger.fail_transaction(tx.id)?;
                return Err(SettlementError::Rejected(reason));
            }
        };

        // Secure the supply before completing. A concurrent settlement
        // may have drained the offer while ours was in flight; that
        // buyer's transaction must end up failed, not completed.
        let offer = match self.ledger.consume_offer(offer_id, amount) {
            Ok(offer) => offer,
            Err(err) => {
                self.ledger.fail_transaction(tx.id)?;
                return Err(err.into());
            }
        };
        let transaction = self.ledger.complete_transaction(
            tx.id,
            &receipt.hash,
            &receipt.block_reference,
            simulated,
        )?;

        info!(
            transaction_id = %transaction.id,
            %offer_id,
            %amount,
            remaining = %offer.remaining,
            simulated,
            "trade settled"
        );
        Ok(TradeSettlement {
            transaction,
            offer_remaining: offer.remaining,
            simulated,
        })
    }

    /// Settle the compensation claim for `(user, outage_id)`.
    ///
    /// The claim is reserved before the authority is called, which is
    /// what makes concurrent claims at-most-once: only the caller that
    /// wins the reservation reaches settlement. A rejection releases
    /// the reservation so the user may retry.
    pub async fn settle_compensation_claim(
        &self,
        user: Address,
        outage_id: OutageId,
    ) -> Result<ClaimSettlement, SettlementError> {
        let comp = self.ledger.reserve_claim(&user, outage_id)?;

        let outcome = self
            .with_retry("claim_compensation", || {
                self.authority.claim_compensation(outage_id)
            })
            .await;

        let (receipt, simulated): (SettlementReceipt, bool) = match outcome {
            Outcome::Confirmed(receipt) => (receipt, false),
            Outcome::Exhausted => {
                info!(compensation_id = %comp.id, %outage_id, "falling back to simulated payout");
                (SimulatedAuthority::claim_receipt(outage_id), true)
            }
            Outcome::Rejected(reason) => {
                self.ledger.release_claim(comp.id)?;
                return Err(SettlementError::Rejected(reason));
            }
        };

        let compensation = self.ledger.finalize_claim(comp.id, &receipt.hash)?;
        info!(compensation_id = %compensation.id, %outage_id, simulated, "claim settled");
        Ok(ClaimSettlement {
            compensation,
            simulated,
        })
    }

    /// Token balance for `address`, falling back to the simulator's
    /// development balance when the authority stays unreachable.
    pub async fn balance_of(&self, address: &Address) -> Result<Decimal, SettlementError> {
        let outcome = self
            .with_retry("balance_of", || self.authority.balance_of(address))
            .await;
        match outcome {
            Outcome::Confirmed(balance) => Ok(balance),
            Outcome::Exhausted => Ok(SimulatedAuthority::default_balance()),
            Outcome::Rejected(reason) => Err(SettlementError::Rejected(reason)),
        }
    }
}
