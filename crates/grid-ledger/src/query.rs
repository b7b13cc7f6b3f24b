//! Read-side queries over the ledger store: offer listings and
//! paginated transaction history. Pure reads; no mutation.

use grid_types::{Address, TradeOffer, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::store::InMemoryLedger;

/// Conjunctive filter over active offers. An empty filter matches all.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OfferFilter {
    /// Case-insensitive substring match on the offer location.
    pub location: Option<String>,
    /// Inclusive lower bound on `price_per_token`.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on `price_per_token`.
    pub max_price: Option<Decimal>,
}

impl OfferFilter {
    pub fn matches(&self, offer: &TradeOffer) -> bool {
        if let Some(ref location) = self.location {
            if !offer
                .location
                .to_lowercase()
                .contains(&location.to_lowercase())
            {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if offer.price_per_token < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if offer.price_per_token > max {
                return false;
            }
        }
        true
    }
}

/// Sort order for offer listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest first. The default.
    #[default]
    Timestamp,
    /// Cheapest unit price first.
    Price,
    /// Largest offer first.
    Amount,
}

impl InMemoryLedger {
    /// List active offers matching `filter`, ordered per `sort`.
    pub fn list_offers(
        &self,
        filter: &OfferFilter,
        sort: SortBy,
    ) -> Result<Vec<TradeOffer>, LedgerError> {
        let book = self.offers.read().map_err(|_| LedgerError::LockPoisoned)?;
        let mut offers: Vec<TradeOffer> = book
            .entries
            .iter()
            .filter(|o| o.active && filter.matches(o))
            .cloned()
            .collect();
        drop(book);

        match sort {
            // Ids increase with creation time, so they break ties between
            // offers created in the same instant.
            SortBy::Timestamp => offers.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            }),
            SortBy::Price => offers.sort_by(|a, b| {
                a.price_per_token
                    .cmp(&b.price_per_token)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            SortBy::Amount => offers.sort_by(|a, b| {
                b.amount.cmp(&a.amount).then_with(|| a.id.cmp(&b.id))
            }),
        }
        Ok(offers)
    }

    /// Paginated transaction history for an address (as buyer or
    /// seller), newest first. `limit` is clamped to the configured
    /// maximum page size.
    pub fn list_transactions(
        &self,
        address: &Address,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let limit = limit.min(self.config().max_page_size);
        let log = self
            .transactions
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;
        // The log is append-ordered, so reverse iteration is newest-first.
        Ok(log
            .entries
            .iter()
            .rev()
            .filter(|tx| tx.involves(address))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_types::OfferId;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    fn seeded_ledger() -> InMemoryLedger {
        let ledger = InMemoryLedger::default();
        ledger
            .create_offer(addr("0xA"), None, d("100"), d("0.052"), "Mumbai, India".into())
            .unwrap();
        ledger
            .create_offer(addr("0xB"), None, d("250"), d("0.048"), "Delhi, India".into())
            .unwrap();
        ledger
            .create_offer(addr("0xC"), None, d("75"), d("0.05"), "Bangalore, India".into())
            .unwrap();
        ledger
    }

    #[test]
    fn empty_filter_matches_all_active() {
        let ledger = seeded_ledger();
        let offers = ledger
            .list_offers(&OfferFilter::default(), SortBy::Timestamp)
            .unwrap();
        assert_eq!(offers.len(), 3);
    }

    #[test]
    fn price_sort_is_ascending() {
        let ledger = seeded_ledger();
        let offers = ledger
            .list_offers(&OfferFilter::default(), SortBy::Price)
            .unwrap();
        let prices: Vec<Decimal> = offers.iter().map(|o| o.price_per_token).collect();
        assert_eq!(prices, vec![d("0.048"), d("0.05"), d("0.052")]);
    }

    #[test]
    fn amount_sort_is_descending() {
        let ledger = seeded_ledger();
        let offers = ledger
            .list_offers(&OfferFilter::default(), SortBy::Amount)
            .unwrap();
        let amounts: Vec<Decimal> = offers.iter().map(|o| o.amount).collect();
        assert_eq!(amounts, vec![d("250"), d("100"), d("75")]);
    }

    #[test]
    fn timestamp_sort_is_newest_first() {
        let ledger = seeded_ledger();
        let offers = ledger
            .list_offers(&OfferFilter::default(), SortBy::Timestamp)
            .unwrap();
        // Same-instant creations fall back to id order, newest id first.
        assert_eq!(offers[0].id, OfferId::new(3));
        assert_eq!(offers[2].id, OfferId::new(1));
    }

    #[test]
    fn location_filter_is_case_insensitive_substring() {
        let ledger = seeded_ledger();
        let filter = OfferFilter {
            location: Some("mumbai".into()),
            ..Default::default()
        };
        let offers = ledger.list_offers(&filter, SortBy::Timestamp).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].location, "Mumbai, India");
    }

    #[test]
    fn price_bounds_are_inclusive_and_conjunctive() {
        let ledger = seeded_ledger();
        let filter = OfferFilter {
            min_price: Some(d("0.048")),
            max_price: Some(d("0.05")),
            ..Default::default()
        };
        let offers = ledger.list_offers(&filter, SortBy::Price).unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].price_per_token, d("0.048"));
        assert_eq!(offers[1].price_per_token, d("0.05"));
    }

    #[test]
    fn inactive_offers_are_hidden() {
        let ledger = seeded_ledger();
        ledger.consume_offer(OfferId::new(1), d("100")).unwrap();
        let offers = ledger
            .list_offers(&OfferFilter::default(), SortBy::Timestamp)
            .unwrap();
        assert_eq!(offers.len(), 2);
        assert!(offers.iter().all(|o| o.id != OfferId::new(1)));
    }

    #[test]
    fn history_matches_either_side_newest_first() {
        let ledger = InMemoryLedger::default();
        ledger
            .record_transaction(addr("0xB"), addr("0xA"), d("10"), d("0.5"))
            .unwrap();
        ledger
            .record_transaction(addr("0xC"), addr("0xB"), d("20"), d("1.0"))
            .unwrap();
        ledger
            .record_transaction(addr("0xC"), addr("0xD"), d("30"), d("1.5"))
            .unwrap();

        let history = ledger.list_transactions(&addr("0xB"), 10, 0).unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].id > history[1].id);
    }

    #[test]
    fn history_address_match_is_case_insensitive() {
        let ledger = InMemoryLedger::default();
        ledger
            .record_transaction(addr("0xAbCd"), addr("0xA"), d("10"), d("0.5"))
            .unwrap();
        let history = ledger.list_transactions(&addr("0xABCD"), 10, 0).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn pagination_skips_and_limits() {
        let ledger = InMemoryLedger::default();
        for i in 1..=5 {
            ledger
                .record_transaction(addr("0xB"), addr("0xA"), Decimal::from(i), d("0.1"))
                .unwrap();
        }

        let page = ledger.list_transactions(&addr("0xB"), 2, 1).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id.value(), 4);
        assert_eq!(page[1].id.value(), 3);
    }

    #[test]
    fn limit_is_clamped_to_configured_maximum() {
        let ledger = InMemoryLedger::new(crate::LedgerConfig { max_page_size: 3 });
        for _ in 0..10 {
            ledger
                .record_transaction(addr("0xB"), addr("0xA"), d("1"), d("0.1"))
                .unwrap();
        }
        let page = ledger.list_transactions(&addr("0xB"), 50, 0).unwrap();
        assert_eq!(page.len(), 3);
    }
}
