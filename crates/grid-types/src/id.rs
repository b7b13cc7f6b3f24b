use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

record_id!(
    /// Identifier of a [`crate::TradeOffer`]. Allocated monotonically by the
    /// ledger store; unique and strictly increasing.
    OfferId
);

record_id!(
    /// Identifier of a [`crate::Transaction`]. Allocated monotonically by the
    /// ledger store; unique and strictly increasing.
    TransactionId
);

record_id!(
    /// Identifier of a [`crate::Compensation`]. Allocated monotonically by
    /// the ledger store; unique and strictly increasing.
    CompensationId
);

record_id!(
    /// Foreign key to an outage event reported by the external oracle.
    /// Not allocated by the ledger store.
    OutageId
);
