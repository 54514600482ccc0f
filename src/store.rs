//! Load/save boundary shapes and the product store port.
//!
//! The engine only ever sees products in the denormalized form below:
//! options with inline values, variants as flat records. How those map onto
//! tables or documents is the embedding application's business.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Combination, ProductOption, Variant, VariantSeed};
use crate::error::VariantError;
use crate::ids::{ProductId, VariantId};
use crate::money::Money;

/// Flat, storage-agnostic form of one variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantRecord {
    /// Persisted id; absent for rows the store has never seen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The option-value tuple, in option order. Array order is identity
    /// and must survive any encoding.
    pub option_values: Vec<String>,
    /// Selling price.
    pub price: Money,
    /// Original price when on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Money>,
    /// Stock keeping unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// On-hand quantity; `None` when untracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<i64>,
}

impl VariantRecord {
    /// Denormalize an in-session variant for the save contract.
    pub fn from_variant(variant: &Variant) -> Self {
        Self {
            id: Some(variant.id.as_str().to_string()),
            option_values: variant.combination.values().to_vec(),
            price: variant.price,
            compare_at_price: variant.compare_at_price,
            sku: variant.sku.clone(),
            available: variant.available,
        }
    }

    /// Rehydrate for the load contract. Rows without a persisted id get
    /// one assigned now.
    pub fn into_variant(self) -> Variant {
        Variant {
            id: self.id.map(VariantId::new).unwrap_or_else(VariantId::generate),
            combination: Combination::new(self.option_values),
            price: self.price,
            compare_at_price: self.compare_at_price,
            sku: self.sku,
            available: self.available,
        }
    }
}

/// Everything the engine needs to know about one product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    /// The product this snapshot belongs to.
    pub product_id: ProductId,
    /// Options with inline values, in display order.
    pub options: Vec<ProductOption>,
    /// Base price new variants are seeded from.
    pub base_price: Money,
    /// Base compare-at price for new variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_compare_at_price: Option<Money>,
    /// Flat variant records, in list order.
    pub variants: Vec<VariantRecord>,
    /// Caller metadata carried through the session untouched.
    #[serde(default = "empty_metadata")]
    pub metadata: serde_json::Value,
}

impl ProductSnapshot {
    /// Snapshot of a product with no options or variants yet.
    pub fn empty(product_id: ProductId, base_price: Money) -> Self {
        Self {
            product_id,
            options: Vec::new(),
            base_price,
            base_compare_at_price: None,
            variants: Vec::new(),
            metadata: empty_metadata(),
        }
    }

    /// The seed new variants of this product inherit.
    pub fn seed(&self) -> VariantSeed {
        VariantSeed {
            price: self.base_price,
            compare_at_price: self.base_compare_at_price,
        }
    }
}

fn empty_metadata() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// The engine's two contracts with the hosting application: load a
/// denormalized product, save the edited result. Implementations own every
/// storage concern, diffing against their previous state included.
pub trait ProductStore {
    /// Fetch the snapshot for `product_id`, or `None` if unknown.
    fn load(&self, product_id: &ProductId) -> Result<Option<ProductSnapshot>, VariantError>;

    /// Persist a snapshot, replacing whatever was stored before.
    fn save(&mut self, snapshot: ProductSnapshot) -> Result<(), VariantError>;
}

/// In-memory store for tests and for embedding without a real backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    products: HashMap<ProductId, ProductSnapshot>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductStore for MemoryStore {
    fn load(&self, product_id: &ProductId) -> Result<Option<ProductSnapshot>, VariantError> {
        Ok(self.products.get(product_id).cloned())
    }

    fn save(&mut self, snapshot: ProductSnapshot) -> Result<(), VariantError> {
        self.products.insert(snapshot.product_id.clone(), snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn sample_snapshot() -> ProductSnapshot {
        ProductSnapshot {
            product_id: ProductId::new("prod-1"),
            options: vec![ProductOption::with_values("Size", &["S", "M"])],
            base_price: usd(1000),
            base_compare_at_price: Some(usd(1500)),
            variants: vec![
                VariantRecord {
                    id: Some("var_1".to_string()),
                    option_values: vec!["S".to_string()],
                    price: usd(1000),
                    compare_at_price: None,
                    sku: Some("TS-S".to_string()),
                    available: Some(3),
                },
                VariantRecord {
                    id: None,
                    option_values: vec!["M".to_string()],
                    price: usd(1200),
                    compare_at_price: None,
                    sku: None,
                    available: None,
                },
            ],
            metadata: serde_json::json!({"vendor": "acme"}),
        }
    }

    #[test]
    fn test_record_round_trip_preserves_fields() {
        let record = sample_snapshot().variants[0].clone();
        let variant = record.clone().into_variant();
        assert_eq!(variant.id.as_str(), "var_1");
        assert_eq!(variant.combination.values(), ["S"]);
        assert_eq!(variant.available, Some(3));

        let back = VariantRecord::from_variant(&variant);
        assert_eq!(back, record);
    }

    #[test]
    fn test_missing_id_gets_assigned() {
        let record = sample_snapshot().variants[1].clone();
        let variant = record.into_variant();
        assert!(variant.id.as_str().starts_with("var_"));
        assert_eq!(variant.available, None);
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: ProductSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        // Tuple order is identity and must survive the encoding.
        assert_eq!(back.variants[0].option_values, vec!["S"]);
    }

    #[test]
    fn test_snapshot_tolerates_missing_optional_fields() {
        let json = r#"{
            "product_id": "prod-9",
            "options": [{"name": "Size", "values": ["S"]}],
            "base_price": {"amount_cents": 500, "currency": "USD"},
            "variants": [{
                "option_values": ["S"],
                "price": {"amount_cents": 500, "currency": "USD"}
            }]
        }"#;
        let snapshot: ProductSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.base_compare_at_price, None);
        assert_eq!(snapshot.variants[0].sku, None);
        assert_eq!(snapshot.metadata, serde_json::json!({}));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        let snapshot = sample_snapshot();
        store.save(snapshot.clone()).unwrap();
        assert_eq!(store.len(), 1);

        let loaded = store.load(&ProductId::new("prod-1")).unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert!(store.load(&ProductId::new("prod-2")).unwrap().is_none());
    }
}
