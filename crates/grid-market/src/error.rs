use grid_ledger::LedgerError;
use grid_settlement::SettlementError;

/// Unified error type for the marketplace API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

pub type MarketResult<T> = Result<T, MarketError>;
