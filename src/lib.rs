//! # variant-matrix
//!
//! Product option and variant engine for e-commerce admin forms.
//!
//! Turns a product's named options ("Size": S/M/L, "Color": Red/Blue) into
//! the full catalog of purchasable variants, keeps that catalog in sync as
//! options change without clobbering per-variant edits, and drives the
//! grouped bulk-edit view the variant table renders.
//!
//! ## Features
//!
//! - **Catalog**: ordered option store, Cartesian combination generator,
//!   variant records keyed by their value tuple
//! - **Reconciliation**: regeneration that preserves surviving variants
//!   (ids, prices, SKUs, stock) and only drops with explicit consent
//! - **Editor**: the synchronous session behind a product form, with
//!   per-row edits, grouping, and bulk overwrite
//! - **Store**: denormalized load/save snapshots plus a port trait for
//!   whatever persistence hosts the engine
//!
//! ## Example
//!
//! ```rust
//! use variant_matrix::prelude::*;
//!
//! let mut editor = VariantEditor::new(
//!     ProductId::new("prod-1"),
//!     VariantSeed::new(Money::new(1999, Currency::USD)),
//! );
//!
//! let size = editor.add_option();
//! editor.rename_option(size, "Size")?;
//! editor.add_values(size, "S, M, L")?;
//!
//! let color = editor.add_option();
//! editor.rename_option(color, "Color")?;
//! editor.add_values(color, "Red, Blue")?;
//!
//! let summary = editor.regenerate(DropPolicy::Refuse)?;
//! assert_eq!(summary.created, 6);
//! assert_eq!(editor.variants()[0].title(), "S / Red");
//! # Ok::<(), variant_matrix::VariantError>(())
//! ```

pub mod catalog;
pub mod editor;
pub mod error;
pub mod ids;
pub mod money;
pub mod store;

pub use error::VariantError;
pub use ids::{ProductId, VariantId};
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::VariantError;
    pub use crate::ids::{ProductId, VariantId};
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        count, generate, generate_checked, reconcile, Combination, GeneratedMatrix,
        GenerationWarning, GeneratorLimits, OptionSet, ProductOption, Variant, VariantSeed,
    };

    // Editor
    pub use crate::editor::{
        BulkEdit, DropPolicy, GroupKey, GroupSummary, RegenerationPlan, RegenerationSummary,
        VariantEditor, VariantGroup,
    };

    // Store
    pub use crate::store::{MemoryStore, ProductSnapshot, ProductStore, VariantRecord};
}
