//! Settlement bridge for the GridMarket trading core.
//!
//! This crate owns everything between the ledger store and the external
//! settlement authority:
//! - [`SettlementAuthority`]: the async capability interface
//! - [`SimulatedAuthority`]: a deterministic in-process implementation
//! - [`RpcAuthority`]: a framed-RPC network client
//! - [`SettlementBridge`]: the retry/timeout/fallback execution path for
//!   trades and compensation claims
//!
//! The bridge guarantees every caller a definitive outcome: transient
//! authority failures are retried and then absorbed by a simulated
//! settlement; only explicit rejections surface as failures.

pub mod authority;
pub mod bridge;
pub mod error;
pub mod protocol;
pub mod rpc;
pub mod simulator;

pub use authority::{SettlementAuthority, SettlementReceipt};
pub use bridge::{BridgeConfig, ClaimSettlement, SettlementBridge, TradeSettlement};
pub use error::{AuthorityError, ProtocolError, SettlementError};
pub use rpc::RpcAuthority;
pub use simulator::SimulatedAuthority;
