use async_trait::async_trait;
use grid_types::{Address, OfferId, OutageId};
use rust_decimal::Decimal;

use crate::authority::{SettlementAuthority, SettlementReceipt};
use crate::error::AuthorityError;

/// Block numbers synthesized by the simulator sit in a realistic range
/// so downstream consumers cannot tell them from network-provided ones.
const BLOCK_BASE: u64 = 50_000_000;
const BLOCK_SPAN: u64 = 1_000_000;

/// Deterministic stand-in for the settlement network.
///
/// Receipts are derived with BLAKE3 from the request itself under a
/// domain-separation prefix: the same trade or claim always produces the
/// same hash and block reference. Used both as a configurable primary
/// authority (demos, tests) and as the bridge's fallback when the real
/// authority is unreachable.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulatedAuthority;

impl SimulatedAuthority {
    pub fn new() -> Self {
        Self
    }

    /// Balance reported for every address. Matches the reference
    /// deployment's development balance of 1250 energy tokens.
    pub fn default_balance() -> Decimal {
        Decimal::from(1250)
    }

    /// Deterministic receipt for a trade settlement.
    pub fn trade_receipt(offer_id: OfferId, amount: Decimal) -> SettlementReceipt {
        Self::receipt(&[b"trade", offer_id.to_string().as_bytes(), amount.to_string().as_bytes()])
    }

    /// Deterministic receipt for a compensation payout.
    pub fn claim_receipt(outage_id: OutageId) -> SettlementReceipt {
        Self::receipt(&[b"claim", outage_id.to_string().as_bytes()])
    }

    fn receipt(parts: &[&[u8]]) -> SettlementReceipt {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"grid-settlement-sim-v1:");
        for part in parts {
            hasher.update(part);
            hasher.update(b":");
        }
        let digest = hasher.finalize();
        let bytes = digest.as_bytes();

        let mut head = [0u8; 8];
        head.copy_from_slice(&bytes[..8]);
        let block = BLOCK_BASE + u64::from_le_bytes(head) % BLOCK_SPAN;

        SettlementReceipt {
            hash: format!("0x{}", hex::encode(bytes)),
            block_reference: block.to_string(),
        }
    }
}

#[async_trait]
impl SettlementAuthority for SimulatedAuthority {
    async fn balance_of(&self, _address: &Address) -> Result<Decimal, AuthorityError> {
        Ok(Self::default_balance())
    }

    async fn execute_trade(
        &self,
        offer_id: OfferId,
        amount: Decimal,
    ) -> Result<SettlementReceipt, AuthorityError> {
        Ok(Self::trade_receipt(offer_id, amount))
    }

    async fn claim_compensation(
        &self,
        outage_id: OutageId,
    ) -> Result<SettlementReceipt, AuthorityError> {
        Ok(Self::claim_receipt(outage_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_receipts_are_deterministic() {
        let a = SimulatedAuthority::trade_receipt(OfferId::new(1), Decimal::from(50));
        let b = SimulatedAuthority::trade_receipt(OfferId::new(1), Decimal::from(50));
        assert_eq!(a, b);
    }

    #[test]
    fn different_requests_produce_different_receipts() {
        let a = SimulatedAuthority::trade_receipt(OfferId::new(1), Decimal::from(50));
        let b = SimulatedAuthority::trade_receipt(OfferId::new(2), Decimal::from(50));
        let c = SimulatedAuthority::claim_receipt(OutageId::new(1));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn hash_looks_like_a_transaction_hash() {
        let receipt = SimulatedAuthority::claim_receipt(OutageId::new(7));
        assert!(receipt.hash.starts_with("0x"));
        assert_eq!(receipt.hash.len(), 2 + 64);
    }

    #[test]
    fn block_reference_is_in_range() {
        let receipt = SimulatedAuthority::trade_receipt(OfferId::new(9), Decimal::ONE);
        let block: u64 = receipt.block_reference.parse().unwrap();
        assert!((BLOCK_BASE..BLOCK_BASE + BLOCK_SPAN).contains(&block));
    }

    #[tokio::test]
    async fn authority_impl_answers_every_call() {
        let authority = SimulatedAuthority::new();
        let addr = Address::parse("0xA").unwrap();
        assert_eq!(
            authority.balance_of(&addr).await.unwrap(),
            Decimal::from(1250)
        );
        authority
            .execute_trade(OfferId::new(1), Decimal::from(10))
            .await
            .unwrap();
        authority.claim_compensation(OutageId::new(1)).await.unwrap();
    }
}
