use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::id::TransactionId;

/// Lifecycle state of a [`Transaction`].
///
/// The only legal transitions are `Pending -> Completed` and
/// `Pending -> Failed`. Terminal states never move again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Completed) | (Self::Pending, Self::Failed)
        )
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// A trade settlement record.
///
/// Created `Pending` when a buy is initiated; mutated only by the
/// settlement bridge; never deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub buyer: Address,
    pub seller: Address,
    /// Quantity traded, in energy-token units.
    pub amount: Decimal,
    /// Settlement total (`amount * price_per_token` of the matched offer).
    pub price: Decimal,
    pub status: TransactionStatus,
    /// Authority-provided transaction hash. Present once the status is
    /// terminal and the settlement succeeded.
    pub settlement_hash: Option<String>,
    /// Opaque block reference from the settlement authority.
    pub block_reference: Option<String>,
    /// Set when the result came from the simulated fallback rather than
    /// the external authority.
    pub simulated: bool,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn pending(
        id: TransactionId,
        buyer: Address,
        seller: Address,
        amount: Decimal,
        price: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            buyer,
            seller,
            amount,
            price,
            status: TransactionStatus::Pending,
            settlement_hash: None,
            block_reference: None,
            simulated: false,
            created_at,
        }
    }

    /// Whether `address` participated in this transaction on either side.
    pub fn involves(&self, address: &Address) -> bool {
        &self.buyer == address || &self.seller == address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    fn tx() -> Transaction {
        Transaction::pending(
            TransactionId::new(1),
            addr("0xB"),
            addr("0xA"),
            Decimal::from(50),
            "2.5".parse().unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn pending_has_no_settlement_fields() {
        let tx = tx();
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert!(tx.settlement_hash.is_none());
        assert!(tx.block_reference.is_none());
        assert!(!tx.simulated);
    }

    #[test]
    fn legal_transitions() {
        use TransactionStatus::*;
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Failed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn terminal_states() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
    }

    #[test]
    fn involves_matches_both_sides() {
        let tx = tx();
        assert!(tx.involves(&addr("0xb")));
        assert!(tx.involves(&addr("0xA")));
        assert!(!tx.involves(&addr("0xC")));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
