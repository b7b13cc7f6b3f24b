use grid_ledger::LedgerConfig;
use grid_settlement::BridgeConfig;
use serde::{Deserialize, Serialize};

/// Which settlement authority the marketplace talks to.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum AuthorityMode {
    /// Deterministic in-process settlement. The default for development
    /// and tests.
    #[default]
    Simulated,
    /// Framed RPC to a remote settlement authority at `addr`.
    Rpc { addr: String },
}

/// Top-level marketplace configuration.
#[derive(Clone, Debug, Default)]
pub struct MarketConfig {
    pub authority: AuthorityMode,
    pub ledger: LedgerConfig,
    pub bridge: BridgeConfig,
}
