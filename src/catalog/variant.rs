//! Variant records and combination-keyed reconciliation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Combination;
use crate::ids::VariantId;
use crate::money::Money;

/// A sellable variant: one priced, stockable row per live combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    /// Assigned when the reconciler first creates the row; preserved across
    /// every later reconciliation the combination survives.
    pub id: VariantId,
    /// The option-value tuple. This is the variant's identity.
    pub combination: Combination,
    /// Selling price.
    pub price: Money,
    /// Original price when on sale.
    pub compare_at_price: Option<Money>,
    /// Stock keeping unit.
    pub sku: Option<String>,
    /// On-hand quantity. `None` means availability is not tracked.
    pub available: Option<i64>,
}

impl Variant {
    /// Create a brand-new variant for `combination`, inheriting the base
    /// prices. New rows start tracked at zero stock with no SKU.
    pub fn seeded(combination: Combination, seed: &VariantSeed) -> Self {
        Self {
            id: VariantId::generate(),
            combination,
            price: seed.price,
            compare_at_price: seed.compare_at_price,
            sku: None,
            available: Some(0),
        }
    }

    /// Display title: the full value tuple joined with " / ".
    pub fn title(&self) -> String {
        self.combination.title()
    }
}

/// Base prices a newly created variant inherits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VariantSeed {
    /// Price for new variants.
    pub price: Money,
    /// Compare-at price for new variants, if the product has one.
    pub compare_at_price: Option<Money>,
}

impl VariantSeed {
    /// Seed with a price and no compare-at price.
    pub fn new(price: Money) -> Self {
        Self {
            price,
            compare_at_price: None,
        }
    }

    /// Set the compare-at price.
    pub fn with_compare_at(mut self, compare_at_price: Money) -> Self {
        self.compare_at_price = Some(compare_at_price);
        self
    }
}

/// Reconcile the previous variant list against freshly generated
/// combinations.
///
/// Matching is by ordered tuple equality. A previous variant whose
/// combination is still generated survives with every field intact, id
/// included. Combinations with no previous variant get a seeded row.
/// Previous variants whose combination disappeared are dropped. The result
/// is in generation order, so the call is idempotent: feeding its output
/// back in with the same combinations reproduces it exactly.
pub fn reconcile(
    previous: &[Variant],
    combinations: Vec<Combination>,
    seed: &VariantSeed,
) -> Vec<Variant> {
    let mut carried: HashMap<&Combination, &Variant> = previous
        .iter()
        .map(|variant| (&variant.combination, variant))
        .collect();

    let mut kept = 0usize;
    let mut created = 0usize;
    let result: Vec<Variant> = combinations
        .into_iter()
        .map(|combination| match carried.remove(&combination) {
            Some(existing) => {
                kept += 1;
                existing.clone()
            }
            None => {
                created += 1;
                Variant::seeded(combination, seed)
            }
        })
        .collect();

    debug!(kept, created, dropped = carried.len(), "reconciled variant matrix");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{generate, OptionSet, ProductOption};
    use crate::money::Currency;

    fn combo(values: &[&str]) -> Combination {
        Combination::new(values.iter().map(|v| v.to_string()).collect())
    }

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn size_color(sizes: &[&str], colors: &[&str]) -> OptionSet {
        OptionSet::from_options(vec![
            ProductOption::with_values("Size", sizes),
            ProductOption::with_values("Color", colors),
        ])
    }

    #[test]
    fn test_seeded_variant_defaults() {
        let seed = VariantSeed::new(usd(1000)).with_compare_at(usd(1500));
        let variant = Variant::seeded(combo(&["M", "Red"]), &seed);
        assert_eq!(variant.price, usd(1000));
        assert_eq!(variant.compare_at_price, Some(usd(1500)));
        assert_eq!(variant.available, Some(0));
        assert_eq!(variant.sku, None);
        assert_eq!(variant.title(), "M / Red");
    }

    #[test]
    fn test_reconcile_preserves_surviving_variants() {
        let seed = VariantSeed::new(usd(1000));
        let mut first = reconcile(&[], generate(&size_color(&["S", "M"], &["Red"])), &seed);

        // Customize one row the way a merchant would.
        first[0].price = usd(1200);
        first[0].sku = Some("SM-RED-S".to_string());
        first[0].available = Some(7);
        let kept_id = first[0].id.clone();

        // Add a color; Size x Red rows must survive untouched.
        let second = reconcile(
            &first,
            generate(&size_color(&["S", "M"], &["Red", "Blue"])),
            &seed,
        );

        assert_eq!(second.len(), 4);
        let survivor = second
            .iter()
            .find(|v| v.combination == combo(&["S", "Red"]))
            .unwrap();
        assert_eq!(survivor.id, kept_id);
        assert_eq!(survivor.price, usd(1200));
        assert_eq!(survivor.sku.as_deref(), Some("SM-RED-S"));
        assert_eq!(survivor.available, Some(7));

        let created = second
            .iter()
            .find(|v| v.combination == combo(&["S", "Blue"]))
            .unwrap();
        assert_eq!(created.price, usd(1000));
        assert_eq!(created.available, Some(0));
    }

    #[test]
    fn test_reconcile_drops_orphans() {
        let seed = VariantSeed::new(usd(1000));
        let first = reconcile(
            &[],
            generate(&size_color(&["S", "M"], &["Red", "Blue"])),
            &seed,
        );
        assert_eq!(first.len(), 4);

        let second = reconcile(&first, generate(&size_color(&["S", "M"], &["Red"])), &seed);
        assert_eq!(second.len(), 2);
        assert!(second.iter().all(|v| v.combination.values()[1] == "Red"));
    }

    #[test]
    fn test_reconcile_result_in_generation_order() {
        let seed = VariantSeed::new(usd(1000));
        // Previous rows deliberately shuffled.
        let combinations = generate(&size_color(&["S", "M"], &["Red", "Blue"]));
        let mut previous = reconcile(&[], combinations.clone(), &seed);
        previous.reverse();

        let result = reconcile(&previous, combinations.clone(), &seed);
        let order: Vec<&Combination> = result.iter().map(|v| &v.combination).collect();
        let expected: Vec<&Combination> = combinations.iter().collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_reconcile_idempotent() {
        let seed = VariantSeed::new(usd(1000));
        let combinations = generate(&size_color(&["S", "M", "L"], &["Red", "Blue"]));

        let once = reconcile(&[], combinations.clone(), &seed);
        let twice = reconcile(&once, combinations.clone(), &seed);
        let thrice = reconcile(&twice, combinations, &seed);

        assert_eq!(once, twice);
        assert_eq!(twice, thrice);
    }

    #[test]
    fn test_reconcile_fixed_point_with_unchanged_options() {
        let seed = VariantSeed::new(usd(1000));
        let options = size_color(&["S", "M"], &["Red", "Blue"]);
        let first = reconcile(&[], generate(&options), &seed);

        let second = reconcile(&first, generate(&options), &seed);
        let first_ids: Vec<&VariantId> = first.iter().map(|v| &v.id).collect();
        let second_ids: Vec<&VariantId> = second.iter().map(|v| &v.id).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn test_reconcile_empty_matrix_drops_everything() {
        let seed = VariantSeed::new(usd(1000));
        let first = reconcile(&[], generate(&size_color(&["S"], &["Red"])), &seed);
        assert_eq!(first.len(), 1);

        let second = reconcile(&first, Vec::new(), &seed);
        assert!(second.is_empty());
    }
}
