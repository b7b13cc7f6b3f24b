use grid_types::{Address, CompensationId, OfferId, OutageId, TransactionId, TransactionStatus};
use rust_decimal::Decimal;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("offer {0} not found or inactive")]
    OfferNotFound(OfferId),

    #[error("offer has {remaining} tokens remaining, requested {requested}")]
    InsufficientOffer {
        requested: Decimal,
        remaining: Decimal,
    },

    #[error("transaction {0} not found")]
    TransactionNotFound(TransactionId),

    #[error("illegal transaction status transition {from} -> {to}")]
    InvalidTransition {
        from: TransactionStatus,
        to: TransactionStatus,
    },

    #[error("compensation {0} not found")]
    CompensationNotFound(CompensationId),

    #[error("compensation for user {user} and outage {outage_id} already exists")]
    DuplicateCompensation { user: Address, outage_id: OutageId },

    #[error("compensation for user {user} and outage {outage_id} already claimed")]
    AlreadyClaimed { user: Address, outage_id: OutageId },

    #[error("no unclaimed compensation for user {user} and outage {outage_id}")]
    NoPendingCompensation { user: Address, outage_id: OutageId },

    #[error("ledger lock poisoned")]
    LockPoisoned,
}
