//! Combination tuples and the Cartesian matrix generator.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::OptionSet;
use crate::error::VariantError;

/// Default combination count above which generation emits a
/// [`GenerationWarning::LargeMatrix`].
pub const DEFAULT_WARN_THRESHOLD: u64 = 2_000;

/// One choice of exactly one value per option, in option order.
///
/// The tuple is the natural identity of a variant: reconciliation matches on
/// ordered tuple equality, never on list position or database id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Combination {
    values: Vec<String>,
}

impl Combination {
    /// Create a combination from an ordered value tuple.
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// The tuple values, in option order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Tuple length, one entry per option at generation time.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the tuple is empty (the option-less product).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Human-readable title: values joined with " / ", or "Default" for the
    /// option-less product.
    pub fn title(&self) -> String {
        if self.values.is_empty() {
            "Default".to_string()
        } else {
            self.values.join(" / ")
        }
    }

    /// Move the value at axis `from` so it lands at axis `to`, mirroring an
    /// option reorder. Out-of-range axes leave the tuple unchanged.
    pub fn move_axis(&mut self, from: usize, to: usize) {
        if from != to && from < self.values.len() && to < self.values.len() {
            let value = self.values.remove(from);
            self.values.insert(to, value);
        }
    }
}

/// Generate every combination of the option values, in canonical order:
/// the first option varies slowest, the last varies fastest.
///
/// Zero options produce a single empty combination (the one "Default"
/// variant). Any option with zero values empties the entire product.
pub fn generate(options: &OptionSet) -> Vec<Combination> {
    let mut tuples: Vec<Vec<String>> = vec![Vec::new()];
    for option in options.options() {
        let mut next = Vec::with_capacity(tuples.len().saturating_mul(option.values.len()));
        for tuple in &tuples {
            for value in &option.values {
                let mut extended = tuple.clone();
                extended.push(value.clone());
                next.push(extended);
            }
        }
        tuples = next;
    }
    tuples.into_iter().map(Combination::new).collect()
}

/// Projected combination count without materializing anything: the product
/// of the option cardinalities, saturating at `u64::MAX`. Zero options
/// count as one; any empty option makes the count zero.
pub fn count(options: &OptionSet) -> u64 {
    options
        .options()
        .iter()
        .fold(1u64, |acc, option| {
            acc.saturating_mul(option.values.len() as u64)
        })
}

/// Tunable guard rails for matrix generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeneratorLimits {
    /// Warn when the projected combination count exceeds this.
    pub warn_above: u64,
    /// Refuse to generate above this count. `None` leaves generation
    /// unbounded; oversized matrices then only warn.
    pub hard_cap: Option<u64>,
}

impl Default for GeneratorLimits {
    fn default() -> Self {
        Self {
            warn_above: DEFAULT_WARN_THRESHOLD,
            hard_cap: None,
        }
    }
}

/// Non-fatal conditions noticed during generation. Warnings accompany a
/// successful result; they are never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationWarning {
    /// An option has zero values, so the whole matrix is empty.
    EmptyOption {
        /// Index of the empty option.
        index: usize,
        /// Its name at generation time.
        name: String,
    },
    /// The projected combination count crossed the warning threshold.
    LargeMatrix {
        /// Projected combination count.
        combinations: u64,
        /// The threshold that was crossed.
        threshold: u64,
    },
}

impl GenerationWarning {
    /// Inline message for the form layer.
    pub fn message(&self) -> String {
        match self {
            GenerationWarning::EmptyOption { name, .. } => {
                format!("Option \"{}\" has no values; no variants will be created", name)
            }
            GenerationWarning::LargeMatrix {
                combinations,
                threshold,
            } => {
                format!(
                    "{} combinations exceed {}; generation may be slow",
                    combinations, threshold
                )
            }
        }
    }
}

/// A generated matrix plus anything worth telling the user about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMatrix {
    /// The combinations, in canonical order.
    pub combinations: Vec<Combination>,
    /// Warnings gathered along the way.
    pub warnings: Vec<GenerationWarning>,
}

/// Generate with the guard rails of `limits`: degenerate axes and oversized
/// matrices come back as warnings, and only a configured hard cap refuses.
pub fn generate_checked(
    options: &OptionSet,
    limits: &GeneratorLimits,
) -> Result<GeneratedMatrix, VariantError> {
    let projected = count(options);
    if let Some(cap) = limits.hard_cap {
        if projected > cap {
            return Err(VariantError::CombinationLimitExceeded {
                combinations: projected,
                cap,
            });
        }
    }

    let mut warnings = Vec::new();
    for (index, option) in options.options().iter().enumerate() {
        if option.is_empty() {
            warn!(option = %option.name, "option has no values, variant matrix is empty");
            warnings.push(GenerationWarning::EmptyOption {
                index,
                name: option.name.clone(),
            });
        }
    }
    if projected > limits.warn_above {
        warn!(
            combinations = projected,
            threshold = limits.warn_above,
            "large variant matrix"
        );
        warnings.push(GenerationWarning::LargeMatrix {
            combinations: projected,
            threshold: limits.warn_above,
        });
    }

    Ok(GeneratedMatrix {
        combinations: generate(options),
        warnings,
    })
}
