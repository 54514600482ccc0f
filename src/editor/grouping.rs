//! Grouped bulk-edit projection over the variant list.
//!
//! Groups are derived view state, recomputed from the variant list on every
//! call and never persisted. Member indices point into the exact list the
//! projection was computed from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{OptionSet, Variant};
use crate::error::VariantError;
use crate::money::Money;

/// The key a group of variants shares at the grouping axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKey {
    /// The option value the members share.
    Value(String),
    /// Catch-all for variants with no value at the grouping axis, e.g.
    /// stale tuples shorter than the axis index.
    Ungrouped,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Value(value) => write!(f, "{}", value),
            GroupKey::Ungrouped => write!(f, "Ungrouped"),
        }
    }
}

/// One bucket of the grouping projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantGroup {
    /// What the members share.
    pub key: GroupKey,
    /// Indices into the variant list, in emission order.
    pub members: Vec<usize>,
}

impl VariantGroup {
    /// The representative row: the first member. Its price and availability
    /// are what the collapsed group header shows as editable fields.
    pub fn representative(&self) -> Option<usize> {
        self.members.first().copied()
    }

    /// Aggregate state for the group header, or `None` for an empty group.
    pub fn summary(&self, variants: &[Variant]) -> Option<GroupSummary> {
        let representative = variants.get(self.representative()?)?;
        let mut total_available: Option<i64> = None;
        for &index in &self.members {
            if let Some(count) = variants.get(index).and_then(|v| v.available) {
                *total_available.get_or_insert(0) += count;
            }
        }
        Some(GroupSummary {
            count: self.members.len(),
            price: representative.price,
            available: representative.available,
            total_available,
        })
    }
}

/// Header-line aggregate for one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Number of member variants.
    pub count: usize,
    /// The representative's price.
    pub price: Money,
    /// The representative's availability.
    pub available: Option<i64>,
    /// Stock summed across members that track it; `None` when none do.
    pub total_available: Option<i64>,
}

/// Partition `variants` by their value at option axis `group_by`.
///
/// Groups appear in first-appearance order, which for a freshly generated
/// list is the option's value order. Variants whose tuple has no value at
/// the axis land in a trailing [`GroupKey::Ungrouped`] bucket instead of
/// erroring.
pub fn group_variants(variants: &[Variant], group_by: usize) -> Vec<VariantGroup> {
    let mut groups: Vec<VariantGroup> = Vec::new();
    let mut ungrouped: Vec<usize> = Vec::new();

    for (index, variant) in variants.iter().enumerate() {
        match variant.combination.values().get(group_by) {
            Some(value) => {
                let existing = groups
                    .iter_mut()
                    .find(|g| matches!(&g.key, GroupKey::Value(v) if v == value));
                match existing {
                    Some(group) => group.members.push(index),
                    None => groups.push(VariantGroup {
                        key: GroupKey::Value(value.clone()),
                        members: vec![index],
                    }),
                }
            }
            None => ungrouped.push(index),
        }
    }

    if !ungrouped.is_empty() {
        groups.push(VariantGroup {
            key: GroupKey::Ungrouped,
            members: ungrouped,
        });
    }
    groups
}

/// Row label for a variant inside an expanded group: the tuple with the
/// grouping axis removed, joined with " / ". Falls back to the full title
/// when the axis is out of range for this tuple.
pub fn row_label(variant: &Variant, group_by: usize) -> String {
    let values = variant.combination.values();
    if group_by >= values.len() {
        return variant.title();
    }
    values
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != group_by)
        .map(|(_, v)| v.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// The axis grouping defaults to: the first option that would produce more
/// than one group, else the first with any value, else `None` (callers
/// render a single implicit "Ungrouped" bucket).
pub fn default_group_axis(options: &OptionSet) -> Option<usize> {
    options
        .options()
        .iter()
        .position(|o| o.values.len() >= 2)
        .or_else(|| options.options().iter().position(|o| !o.values.is_empty()))
}

/// A group-level overwrite of one field across every member.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BulkEdit {
    /// Overwrite every member's price.
    Price(Money),
    /// Overwrite every member's availability.
    Available(i64),
}

/// Write a bulk edit onto every member of `group`, representative included.
/// A full overwrite: no per-member previous value survives. Validation runs
/// before any member is touched, so a failure leaves the list unchanged.
pub fn apply_bulk_edit(
    variants: &mut [Variant],
    group: &VariantGroup,
    edit: BulkEdit,
) -> Result<(), VariantError> {
    match edit {
        BulkEdit::Price(price) if price.is_negative() => {
            return Err(VariantError::NegativePrice);
        }
        BulkEdit::Available(count) if count < 0 => {
            return Err(VariantError::NegativeQuantity(count));
        }
        _ => {}
    }
    if let Some(&index) = group.members.iter().find(|&&i| i >= variants.len()) {
        return Err(VariantError::GroupMemberOutOfRange {
            index,
            len: variants.len(),
        });
    }

    for &index in &group.members {
        match edit {
            BulkEdit::Price(price) => variants[index].price = price,
            BulkEdit::Available(count) => variants[index].available = Some(count),
        }
    }
    Ok(())
}
