use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::id::OfferId;

/// A seller's advertisement to sell a quantity of energy tokens at a
/// unit price.
///
/// Offers are retained forever: once fully matched they become inactive
/// but are never deleted. Only `remaining` and `active` mutate after
/// creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub id: OfferId,
    pub seller: Address,
    /// Human-readable producer name, e.g. "Solar Farm Alpha".
    pub seller_name: Option<String>,
    /// Quantity originally listed, in energy-token units. Always positive.
    pub amount: Decimal,
    /// Unit price. Always positive.
    pub price_per_token: Decimal,
    /// `amount * price_per_token`, fixed at creation.
    pub total_price: Decimal,
    /// Quantity still available for purchase.
    pub remaining: Decimal,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

impl TradeOffer {
    /// Construct a fresh offer. Input validation (positive amount and
    /// price) is the ledger store's responsibility; this computes the
    /// derived fields.
    pub fn new(
        id: OfferId,
        seller: Address,
        seller_name: Option<String>,
        amount: Decimal,
        price_per_token: Decimal,
        location: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            seller,
            seller_name,
            amount,
            price_per_token,
            total_price: amount * price_per_token,
            remaining: amount,
            location,
            created_at,
            active: true,
        }
    }

    /// Cost of buying `quantity` tokens from this offer.
    pub fn price_of(&self, quantity: Decimal) -> Decimal {
        quantity * self.price_per_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn seller() -> Address {
        Address::parse("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6").unwrap()
    }

    #[test]
    fn total_price_is_amount_times_unit_price() {
        let offer = TradeOffer::new(
            OfferId::new(1),
            seller(),
            Some("Solar Farm Alpha".into()),
            d("100"),
            d("0.05"),
            "Mumbai".into(),
            Utc::now(),
        );
        assert_eq!(offer.total_price, d("5.0"));
        assert_eq!(offer.remaining, d("100"));
        assert!(offer.active);
    }

    #[test]
    fn price_of_partial_fill() {
        let offer = TradeOffer::new(
            OfferId::new(1),
            seller(),
            None,
            d("100"),
            d("0.05"),
            "Mumbai".into(),
            Utc::now(),
        );
        assert_eq!(offer.price_of(d("40")), d("2.00"));
    }

    #[test]
    fn serde_roundtrip() {
        let offer = TradeOffer::new(
            OfferId::new(3),
            seller(),
            Some("Wind Energy Co.".into()),
            d("250"),
            d("0.048"),
            "Delhi".into(),
            Utc::now(),
        );
        let json = serde_json::to_string(&offer).unwrap();
        let parsed: TradeOffer = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, offer);
    }
}
