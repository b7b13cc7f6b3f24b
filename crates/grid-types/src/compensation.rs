use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::id::{CompensationId, OutageId};

/// A one-time token payout owed to a user for a specific outage event.
///
/// At most one record may exist per `(user, outage_id)` pair, and
/// `claimed` transitions false -> true exactly once. Created by the
/// external outage oracle; mutated only by a successful claim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Compensation {
    pub id: CompensationId,
    pub user: Address,
    pub outage_id: OutageId,
    /// Payout size, in energy-token units. Non-negative.
    pub amount: Decimal,
    pub claimed: bool,
    pub claimed_at: Option<DateTime<Utc>>,
    /// Settlement hash recorded when the claim was finalized.
    pub settlement_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Compensation {
    pub fn unclaimed(
        id: CompensationId,
        user: Address,
        outage_id: OutageId,
        amount: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user,
            outage_id,
            amount,
            claimed: false,
            claimed_at: None,
            settlement_hash: None,
            created_at,
        }
    }
}
