//! Variant engine error types.

use thiserror::Error;

/// Errors that can occur while editing options and generating variants.
///
/// Every variant here is a synchronous, user-correctable failure surfaced to
/// the form layer. Degenerate but legal states (an option with no values, an
/// empty matrix) are reported as [`crate::catalog::GenerationWarning`]s
/// instead and never appear in this enum.
#[derive(Error, Debug)]
pub enum VariantError {
    /// An option exists but its name is still blank; generation is blocked
    /// until the user fills it in.
    #[error("Option name required")]
    BlankOptionName,

    /// Two options carry the same name (case-sensitive).
    #[error("Duplicate option name: {0}")]
    DuplicateOptionName(String),

    /// An option index points past the end of the option list.
    #[error("Option index {index} out of range: product has {len} option(s)")]
    OptionIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Current option count.
        len: usize,
    },

    /// A group referenced a variant row that is not in the list.
    #[error("Group member index {index} out of range: {len} variant(s)")]
    GroupMemberOutOfRange {
        /// The offending member index.
        index: usize,
        /// Current variant count.
        len: usize,
    },

    /// No variant with the given id in this session.
    #[error("Unknown variant: {0}")]
    UnknownVariant(String),

    /// No group with the given key under the current grouping axis.
    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    /// A price field received text that does not parse as a monetary amount.
    #[error("Invalid price entry: {0:?}")]
    InvalidPriceInput(String),

    /// A monetary amount was negative.
    #[error("Price must not be negative")]
    NegativePrice,

    /// An availability field received text that does not parse as a whole
    /// number.
    #[error("Invalid quantity entry: {0:?}")]
    InvalidQuantityInput(String),

    /// An availability count was negative.
    #[error("Quantity must not be negative: {0}")]
    NegativeQuantity(i64),

    /// Applying the current options would drop existing variants and the
    /// caller asked not to. Retry with an explicit confirmation.
    #[error("Regeneration would drop {dropped} variant(s)")]
    WouldDropVariants {
        /// How many variants would be destroyed.
        dropped: usize,
    },

    /// The projected matrix exceeds the configured hard cap.
    #[error("{combinations} combinations exceed the configured cap of {cap}")]
    CombinationLimitExceeded {
        /// Projected combination count.
        combinations: u64,
        /// The configured cap.
        cap: u64,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backing store failed to load or save a snapshot.
    #[error("Store error: {0}")]
    Store(String),
}

impl From<serde_json::Error> for VariantError {
    fn from(e: serde_json::Error) -> Self {
        VariantError::Serialization(e.to_string())
    }
}
