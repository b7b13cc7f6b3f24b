use grid_ledger::LedgerError;

/// Errors reported by a [`crate::SettlementAuthority`] implementation.
///
/// The distinction matters: `Unavailable` is a connectivity/timeout
/// failure and is retryable; `Rejected` is a semantic refusal from the
/// authority and is terminal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorityError {
    #[error("settlement authority unavailable: {0}")]
    Unavailable(String),

    #[error("settlement authority rejected the request: {0}")]
    Rejected(String),
}

/// Errors produced by the settlement bridge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    /// The authority explicitly refused the operation. The affected
    /// transaction is left `failed` (or the claim reservation rolled
    /// back) for reconciliation.
    #[error("settlement rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Errors from the authority wire codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("framing error: {0}")]
    FramingError(String),

    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}
