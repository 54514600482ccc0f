//! The single-session editor behind a product's variant form.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{
    generate_checked, reconcile, Combination, GeneratedMatrix, GenerationWarning, GeneratorLimits,
    OptionSet, ProductOption, Variant, VariantSeed,
};
use crate::editor::{
    apply_bulk_edit, default_group_axis, group_variants, row_label, BulkEdit, GroupKey,
    VariantGroup,
};
use crate::error::VariantError;
use crate::ids::{ProductId, VariantId};
use crate::money::Money;
use crate::store::{ProductSnapshot, VariantRecord};

/// How [`VariantEditor::regenerate`] treats a plan that would drop variants.
///
/// Dropping is irreversible once saved, so the form's "Done" button
/// regenerates with `Refuse` first and retries with `Allow` after the user
/// confirms the [`VariantError::WouldDropVariants`] prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropPolicy {
    /// Fail with `WouldDropVariants` instead of dropping anything.
    Refuse,
    /// The user confirmed; orphaned variants may be dropped.
    Allow,
}

/// Dry run of a regeneration: what would happen, without doing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerationPlan {
    /// Combinations the current options produce.
    pub total: usize,
    /// Existing variants whose combination survives, fields preserved.
    pub kept: usize,
    /// Combinations with no existing variant, to be seeded from base price.
    pub created: usize,
    /// Existing variants whose combination disappeared.
    pub dropped: usize,
    /// Titles of the variants that would drop, for the confirmation prompt.
    pub dropped_titles: Vec<String>,
    /// Non-fatal generation warnings.
    pub warnings: Vec<GenerationWarning>,
}

/// What a regeneration actually did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenerationSummary {
    /// Variants carried over with fields preserved.
    pub kept: usize,
    /// Variants newly seeded from the base price.
    pub created: usize,
    /// Variants destroyed because their combination disappeared.
    pub dropped: usize,
    /// Non-fatal generation warnings.
    pub warnings: Vec<GenerationWarning>,
}

/// One editing session over one product's options and variants.
///
/// Owns the option store, the variant list, and the base prices new
/// variants inherit. Everything is synchronous and in-memory: the session
/// is loaded from a [`ProductSnapshot`], edited, and written back out with
/// [`VariantEditor::snapshot`]. Only [`VariantEditor::regenerate`] creates
/// or destroys variants; every other mutation touches existing rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantEditor {
    product_id: ProductId,
    options: OptionSet,
    variants: Vec<Variant>,
    seed: VariantSeed,
    limits: GeneratorLimits,
    /// Explicit grouping axis; `None` defers to the default.
    group_axis: Option<usize>,
    /// Caller metadata carried through load and save, opaque to the engine.
    metadata: serde_json::Value,
    dirty: bool,
    needs_regeneration: bool,
}

impl VariantEditor {
    /// Start an empty session for a new product.
    pub fn new(product_id: ProductId, seed: VariantSeed) -> Self {
        Self {
            product_id,
            options: OptionSet::new(),
            variants: Vec::new(),
            seed,
            limits: GeneratorLimits::default(),
            group_axis: None,
            metadata: serde_json::Value::Object(serde_json::Map::new()),
            dirty: false,
            needs_regeneration: false,
        }
    }

    /// Adopt an already-denormalized snapshot, the load path. Rows without
    /// a persisted id are assigned one now.
    pub fn from_snapshot(snapshot: ProductSnapshot) -> Self {
        let seed = snapshot.seed();
        Self {
            product_id: snapshot.product_id,
            options: OptionSet::from_options(snapshot.options),
            variants: snapshot
                .variants
                .into_iter()
                .map(VariantRecord::into_variant)
                .collect(),
            seed,
            limits: GeneratorLimits::default(),
            group_axis: None,
            metadata: snapshot.metadata,
            dirty: false,
            needs_regeneration: false,
        }
    }

    /// Override the generation guard rails.
    pub fn with_limits(mut self, limits: GeneratorLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The product this session edits.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// The option store, in order.
    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    /// The variant list, in its current order.
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// The base prices new variants inherit.
    pub fn seed(&self) -> &VariantSeed {
        &self.seed
    }

    /// Look up a variant by id.
    pub fn variant(&self, id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Whether the session has unsaved edits.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the option store changed in a way the variant list does not
    /// reflect yet.
    pub fn needs_regeneration(&self) -> bool {
        self.needs_regeneration
    }

    /// Update the base prices new variants inherit. Existing rows keep
    /// their prices.
    pub fn set_seed(&mut self, seed: VariantSeed) -> Result<(), VariantError> {
        if seed.price.is_negative() || seed.compare_at_price.is_some_and(|p| p.is_negative()) {
            return Err(VariantError::NegativePrice);
        }
        self.seed = seed;
        self.dirty = true;
        Ok(())
    }

    // ---- option store ----

    /// Append a new, unnamed option and return its index.
    pub fn add_option(&mut self) -> usize {
        let index = self.options.add_option();
        self.touch(true);
        index
    }

    /// Rename an option. Variant identity is the value tuple, so no
    /// regeneration is needed.
    pub fn rename_option(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), VariantError> {
        self.options.rename_option(index, name)?;
        self.touch(false);
        Ok(())
    }

    /// Remove an option and return it. Every existing variant becomes an
    /// orphan at the next regeneration, since its tuple keeps the old
    /// length; `preview_regeneration` will show the full impact.
    pub fn remove_option(&mut self, index: usize) -> Result<ProductOption, VariantError> {
        let removed = self.options.remove_option(index)?;
        if let Some(axis) = self.group_axis {
            self.group_axis = match axis {
                a if a == index => None,
                a if a > index => Some(a - 1),
                a => Some(a),
            };
        }
        self.touch(true);
        Ok(removed)
    }

    /// Union comma-separated values into an option; returns how many were
    /// actually new.
    pub fn add_values(&mut self, index: usize, raw: &str) -> Result<usize, VariantError> {
        let added = self.options.add_values(index, raw)?;
        if added > 0 {
            self.touch(true);
        }
        Ok(added)
    }

    /// Remove one value from an option; returns whether it was present.
    pub fn remove_value(&mut self, index: usize, value: &str) -> Result<bool, VariantError> {
        let removed = self.options.remove_value(index, value)?;
        if removed {
            self.touch(true);
        }
        Ok(removed)
    }

    /// Reorder options, keeping the variant list in lockstep: every
    /// current-shape tuple is permuted in the same motion, so `values[i]`
    /// still corresponds to `options()[i]` and no variant changes identity.
    /// Stale tuples from an unapplied add or remove are left for the next
    /// regeneration.
    pub fn move_option(&mut self, from: usize, to: usize) -> Result<(), VariantError> {
        self.options.move_option(from, to)?;
        if from != to {
            let axes = self.options.len();
            for variant in &mut self.variants {
                if variant.combination.len() == axes {
                    variant.combination.move_axis(from, to);
                }
            }
            self.group_axis = self.group_axis.map(|axis| shifted_axis(axis, from, to));
            self.dirty = true;
        }
        Ok(())
    }

    /// Flip an option's presentation collapse flag. Not an edit: the
    /// session does not become dirty.
    pub fn toggle_collapse(&mut self, index: usize) -> Result<bool, VariantError> {
        self.options.toggle_collapse(index)
    }

    // ---- regeneration ----

    /// Validate the options and compute what a regeneration would do,
    /// without touching the variant list. Feeds the confirmation prompt.
    pub fn preview_regeneration(&self) -> Result<RegenerationPlan, VariantError> {
        let matrix = self.checked_matrix()?;
        Ok(self.plan(&matrix))
    }

    /// Rebuild the variant list from the current options. The only path
    /// that creates or destroys variants.
    ///
    /// Surviving combinations keep their variant untouched, new ones are
    /// seeded from the base price, and orphans are dropped, but only under
    /// [`DropPolicy::Allow`]; under `Refuse` a plan with drops fails before
    /// anything changes.
    pub fn regenerate(&mut self, policy: DropPolicy) -> Result<RegenerationSummary, VariantError> {
        let matrix = self.checked_matrix()?;
        let plan = self.plan(&matrix);

        if plan.dropped > 0 && policy == DropPolicy::Refuse {
            return Err(VariantError::WouldDropVariants {
                dropped: plan.dropped,
            });
        }

        self.variants = reconcile(&self.variants, matrix.combinations, &self.seed);
        self.needs_regeneration = false;
        self.dirty = true;
        debug!(
            product = %self.product_id,
            kept = plan.kept,
            created = plan.created,
            dropped = plan.dropped,
            "regenerated variants"
        );

        Ok(RegenerationSummary {
            kept: plan.kept,
            created: plan.created,
            dropped: plan.dropped,
            warnings: plan.warnings,
        })
    }

    fn checked_matrix(&self) -> Result<GeneratedMatrix, VariantError> {
        self.options.validate()?;
        generate_checked(&self.options, &self.limits)
    }

    fn plan(&self, matrix: &GeneratedMatrix) -> RegenerationPlan {
        let previous: HashSet<&Combination> =
            self.variants.iter().map(|v| &v.combination).collect();
        let next: HashSet<&Combination> = matrix.combinations.iter().collect();

        let kept = matrix
            .combinations
            .iter()
            .filter(|c| previous.contains(*c))
            .count();
        let dropped_titles: Vec<String> = self
            .variants
            .iter()
            .filter(|v| !next.contains(&v.combination))
            .map(|v| v.title())
            .collect();

        RegenerationPlan {
            total: matrix.combinations.len(),
            kept,
            created: matrix.combinations.len() - kept,
            dropped: dropped_titles.len(),
            dropped_titles,
            warnings: matrix.warnings.clone(),
        }
    }

    // ---- per-row edits, never a regeneration trigger ----

    /// Set one variant's price.
    pub fn set_price(&mut self, id: &VariantId, price: Money) -> Result<(), VariantError> {
        if price.is_negative() {
            return Err(VariantError::NegativePrice);
        }
        self.variant_mut(id)?.price = price;
        self.dirty = true;
        Ok(())
    }

    /// Price edit straight from a form field; rejects non-numeric text.
    pub fn set_price_input(&mut self, id: &VariantId, raw: &str) -> Result<(), VariantError> {
        let price = self.parse_price(raw)?;
        self.set_price(id, price)
    }

    /// Set one variant's compare-at price; `None` clears it.
    pub fn set_compare_at_price(
        &mut self,
        id: &VariantId,
        price: Option<Money>,
    ) -> Result<(), VariantError> {
        if price.is_some_and(|p| p.is_negative()) {
            return Err(VariantError::NegativePrice);
        }
        self.variant_mut(id)?.compare_at_price = price;
        self.dirty = true;
        Ok(())
    }

    /// Compare-at edit straight from a form field; blank clears it.
    pub fn set_compare_at_price_input(
        &mut self,
        id: &VariantId,
        raw: &str,
    ) -> Result<(), VariantError> {
        let price = if raw.trim().is_empty() {
            None
        } else {
            Some(self.parse_price(raw)?)
        };
        self.set_compare_at_price(id, price)
    }

    /// Set one variant's SKU; blank clears it.
    pub fn set_sku(&mut self, id: &VariantId, sku: impl Into<String>) -> Result<(), VariantError> {
        let sku = sku.into();
        let trimmed = sku.trim();
        self.variant_mut(id)?.sku = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self.dirty = true;
        Ok(())
    }

    /// Set one variant's availability count.
    pub fn set_available(&mut self, id: &VariantId, available: i64) -> Result<(), VariantError> {
        if available < 0 {
            return Err(VariantError::NegativeQuantity(available));
        }
        self.variant_mut(id)?.available = Some(available);
        self.dirty = true;
        Ok(())
    }

    /// Availability edit straight from a form field; blank stops tracking.
    pub fn set_available_input(&mut self, id: &VariantId, raw: &str) -> Result<(), VariantError> {
        let text = raw.trim();
        if text.is_empty() {
            self.variant_mut(id)?.available = None;
            self.dirty = true;
            return Ok(());
        }
        let count: i64 = text
            .parse()
            .map_err(|_| VariantError::InvalidQuantityInput(raw.to_string()))?;
        self.set_available(id, count)
    }

    fn parse_price(&self, raw: &str) -> Result<Money, VariantError> {
        let money = Money::parse(raw, self.seed.price.currency)
            .ok_or_else(|| VariantError::InvalidPriceInput(raw.to_string()))?;
        if money.is_negative() {
            return Err(VariantError::NegativePrice);
        }
        Ok(money)
    }

    fn variant_mut(&mut self, id: &VariantId) -> Result<&mut Variant, VariantError> {
        self.variants
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| VariantError::UnknownVariant(id.to_string()))
    }

    // ---- grouping ----

    /// Choose the grouping axis explicitly; `None` returns to the default.
    /// Pure view state; no variant data changes and the session stays
    /// clean.
    pub fn set_group_axis(&mut self, axis: Option<usize>) -> Result<(), VariantError> {
        if let Some(index) = axis {
            if index >= self.options.len() {
                return Err(VariantError::OptionIndexOutOfRange {
                    index,
                    len: self.options.len(),
                });
            }
        }
        self.group_axis = axis;
        Ok(())
    }

    /// The axis grouping currently uses: the explicit choice, else the
    /// first option with something to group by.
    pub fn group_axis(&self) -> Option<usize> {
        self.group_axis.or_else(|| default_group_axis(&self.options))
    }

    /// The grouped projection of the variant list. With no usable axis,
    /// every variant lands in a single "Ungrouped" bucket.
    pub fn groups(&self) -> Vec<VariantGroup> {
        match self.group_axis() {
            Some(axis) => group_variants(&self.variants, axis),
            None if self.variants.is_empty() => Vec::new(),
            None => vec![VariantGroup {
                key: GroupKey::Ungrouped,
                members: (0..self.variants.len()).collect(),
            }],
        }
    }

    /// Overwrite one field on every member of the group labelled `key`,
    /// representative included. Returns the member count.
    pub fn bulk_edit(&mut self, key: &GroupKey, edit: BulkEdit) -> Result<usize, VariantError> {
        let groups = self.groups();
        let group = groups
            .iter()
            .find(|g| &g.key == key)
            .ok_or_else(|| VariantError::UnknownGroup(key.to_string()))?;
        apply_bulk_edit(&mut self.variants, group, edit)?;
        self.dirty = true;
        Ok(group.members.len())
    }

    /// Row label for a variant under the current grouping axis.
    pub fn row_label(&self, variant: &Variant) -> String {
        match self.group_axis() {
            Some(axis) => row_label(variant, axis),
            None => variant.title(),
        }
    }

    // ---- snapshot boundary ----

    /// Denormalize the session for saving. The caller diffs against what
    /// it loaded and persists; call [`Self::mark_clean`] once that
    /// succeeds.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            product_id: self.product_id.clone(),
            options: self.options.options().to_vec(),
            base_price: self.seed.price,
            base_compare_at_price: self.seed.compare_at_price,
            variants: self
                .variants
                .iter()
                .map(VariantRecord::from_variant)
                .collect(),
            metadata: self.metadata.clone(),
        }
    }

    /// Record that the session was saved.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn touch(&mut self, affects_matrix: bool) {
        self.dirty = true;
        if affects_matrix {
            self.needs_regeneration = true;
        }
    }
}

/// Where an axis index lands after the option at `from` moves to `to`.
fn shifted_axis(axis: usize, from: usize, to: usize) -> usize {
    if axis == from {
        to
    } else if from < axis && to >= axis {
        axis - 1
    } else if from > axis && to <= axis {
        axis + 1
    } else {
        axis
    }
}
