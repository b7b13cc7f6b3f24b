//! Foundation types for the GridMarket trading and compensation ledger.
//!
//! This crate provides the core identity, monetary, and record types used
//! throughout the GridMarket system. Every other GridMarket crate depends
//! on `grid-types`.
//!
//! # Key Types
//!
//! - [`Address`] — Canonicalized (lowercase) wallet address
//! - [`OfferId`] / [`TransactionId`] / [`CompensationId`] — Monotonic record identifiers
//! - [`TradeOffer`] — A seller's advertisement of surplus energy tokens
//! - [`Transaction`] — A trade settlement record with status lifecycle
//! - [`Compensation`] — An outage payout owed to a user, claimable at most once
//! - [`MarketplaceStats`] — Derived marketplace aggregates

pub mod address;
pub mod compensation;
pub mod error;
pub mod id;
pub mod offer;
pub mod stats;
pub mod transaction;

pub use address::Address;
pub use compensation::Compensation;
pub use error::TypeError;
pub use id::{CompensationId, OfferId, OutageId, TransactionId};
pub use offer::TradeOffer;
pub use stats::{CompensationStats, MarketplaceStats};
pub use transaction::{Transaction, TransactionStatus};
