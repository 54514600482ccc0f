//! Option, combination, and variant domain types.
//!
//! The pipeline lives here: an [`OptionSet`] generates [`Combination`]s,
//! and [`reconcile`] turns combinations plus the previous variant list into
//! the next one without clobbering per-variant edits.

mod combination;
mod option;
mod variant;

pub use combination::{
    count, generate, generate_checked, Combination, GeneratedMatrix, GenerationWarning,
    GeneratorLimits, DEFAULT_WARN_THRESHOLD,
};
pub use option::{OptionSet, ProductOption};
pub use variant::{reconcile, Variant, VariantSeed};
