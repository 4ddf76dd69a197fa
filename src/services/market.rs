//! Marketplace catalog and purchase flow
//!
//! The catalog is fixed at build time. A purchase appends to the
//! ledger's history and debits credits; an over-spend is absorbed by
//! the ledger's zero clamp rather than rejected.

use serde::Serialize;

use crate::db::schemas::StatsDoc;
use crate::db::stores::LedgerStore;
use crate::types::GroveError;

/// Category of a marketplace item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketCategory {
    Eco,
    Lifestyle,
    Tech,
    Food,
}

/// An item purchasable with credits
#[derive(Debug, Clone, Serialize)]
pub struct MarketItem {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Price in credits
    pub price: i64,
    pub category: MarketCategory,
    pub icon: &'static str,
}

/// The fixed marketplace catalog
pub fn market_catalog() -> &'static [MarketItem] {
    &[
        MarketItem {
            id: "1",
            name: "Reusable Water Bottle",
            description: "Durable stainless steel bottle to reduce plastic waste.",
            price: 50,
            category: MarketCategory::Eco,
            icon: "🍶",
        },
        MarketItem {
            id: "2",
            name: "Organic Cotton Tote Bag",
            description: "Eco-friendly shopping bag for everyday use.",
            price: 30,
            category: MarketCategory::Lifestyle,
            icon: "🛍️",
        },
        MarketItem {
            id: "3",
            name: "Solar Charger",
            description: "Portable solar panel charger for phones and small devices.",
            price: 200,
            category: MarketCategory::Tech,
            icon: "🔆",
        },
        MarketItem {
            id: "4",
            name: "Local Organic Veggie Box",
            description: "Weekly delivery of fresh, locally sourced vegetables.",
            price: 100,
            category: MarketCategory::Food,
            icon: "🥬",
        },
    ]
}

/// Look up a catalog item by id
pub fn find_item(id: &str) -> Option<&'static MarketItem> {
    market_catalog().iter().find(|item| item.id == id)
}

/// Record a purchase: append to the history, then debit the price.
///
/// Returns the ledger after both writes.
pub async fn purchase(
    ledger: &LedgerStore,
    user_id: &str,
    item: &MarketItem,
) -> Result<StatsDoc, GroveError> {
    ledger
        .add_purchase(user_id, item.id, item.name, item.price)
        .await?;
    ledger.add_credits(user_id, -item.price).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let catalog = market_catalog();
        for (i, a) in catalog.iter().enumerate() {
            for b in &catalog[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_find_item() {
        let item = find_item("3").unwrap();
        assert_eq!(item.name, "Solar Charger");
        assert_eq!(item.price, 200);
        assert!(find_item("999").is_none());
    }

    #[test]
    fn test_all_prices_positive() {
        assert!(market_catalog().iter().all(|item| item.price > 0));
    }
}
