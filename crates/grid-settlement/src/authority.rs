use async_trait::async_trait;
use grid_types::{Address, OfferId, OutageId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AuthorityError;

/// Result of a settlement executed by an authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    /// Opaque transaction hash, e.g. `0x3f9a…`.
    pub hash: String,
    /// Opaque block reference.
    pub block_reference: String,
}

/// External system of record that finalizes trades and compensation
/// claims.
///
/// Two implementations exist: [`crate::RpcAuthority`] talks to a real
/// settlement network, [`crate::SimulatedAuthority`] produces
/// deterministic stand-in results. The bridge treats `Unavailable`
/// errors as retryable and `Rejected` as terminal.
#[async_trait]
pub trait SettlementAuthority: Send + Sync {
    /// Token balance held by `address` on the settlement network.
    async fn balance_of(&self, address: &Address) -> Result<Decimal, AuthorityError>;

    /// Execute a trade of `amount` tokens against `offer_id`.
    async fn execute_trade(
        &self,
        offer_id: OfferId,
        amount: Decimal,
    ) -> Result<SettlementReceipt, AuthorityError>;

    /// Disburse the compensation payout for `outage_id`.
    async fn claim_compensation(
        &self,
        outage_id: OutageId,
    ) -> Result<SettlementReceipt, AuthorityError>;
}
