//! The editing session and its grouped bulk-edit projection.

mod grouping;
mod session;

pub use grouping::{
    apply_bulk_edit, default_group_axis, group_variants, row_label, BulkEdit, GroupKey,
    GroupSummary, VariantGroup,
};
pub use session::{DropPolicy, RegenerationPlan, RegenerationSummary, VariantEditor};
