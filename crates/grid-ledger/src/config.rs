use serde::{Deserialize, Serialize};

/// Configuration for the [`crate::InMemoryLedger`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Hard cap applied to the `limit` parameter of transaction-history
    /// queries. Requests above the cap are clamped, not rejected.
    pub max_page_size: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { max_page_size: 100 }
    }
}
