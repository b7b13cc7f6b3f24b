//! High-level API for the GridMarket energy-token marketplace.
//!
//! Provides a unified entry point over the ledger store and the
//! settlement bridge. This is the crate applications embed.

pub mod config;
pub mod error;
pub mod marketplace;

pub use config::{AuthorityMode, MarketConfig};
pub use error::{MarketError, MarketResult};
pub use marketplace::Marketplace;

// Re-export key types
pub use grid_ledger::{LedgerConfig, OfferFilter, SortBy};
pub use grid_settlement::{BridgeConfig, ClaimSettlement, TradeSettlement};
pub use grid_types::{
    Address, Compensation, CompensationId, CompensationStats, MarketplaceStats, OfferId, OutageId,
    TradeOffer, Transaction, TransactionId, TransactionStatus,
};
