//! In-memory ledger store for the GridMarket trading and compensation
//! core.
//!
//! This crate is the heart of GridMarket. It provides:
//! - [`InMemoryLedger`]: the single owner of the three core collections
//!   (offers, transactions, compensations)
//! - Monotonic, strictly-increasing identifier allocation per collection
//! - Offer filtering/sorting and paginated transaction history
//! - Marketplace and compensation statistics, derived on demand
//! - The compensation claim state machine (reserve / release / finalize)
//!   that guarantees at-most-once payout per `(user, outage)` pair
//!
//! Each collection sits behind its own `RwLock`; mutations on a
//! collection are serialized, and no lock is ever held across an await
//! point (the settlement bridge calls back in between).

pub mod claims;
pub mod config;
pub mod error;
pub mod query;
pub mod stats;
pub mod store;

pub use config::LedgerConfig;
pub use error::LedgerError;
pub use query::{OfferFilter, SortBy};
pub use store::InMemoryLedger;
