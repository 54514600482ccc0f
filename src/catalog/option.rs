//! Product options and the ordered option store.

use serde::{Deserialize, Serialize};

use crate::error::VariantError;

/// One axis of product variation ("Size", "Color") with its ordered values.
///
/// Value order is load-bearing: it drives generation order, grouping order,
/// and every rendered list. Values are unique within an option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductOption {
    /// Option name, unique per product (case-sensitive).
    pub name: String,
    /// Ordered, de-duplicated values.
    pub values: Vec<String>,
    /// UI collapse flag. Presentation state only; it never influences
    /// generation or variant identity.
    #[serde(default)]
    pub collapsed: bool,
}

impl ProductOption {
    /// Create a named option with no values yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            collapsed: false,
        }
    }

    /// Create an option with an initial value list. Duplicates are dropped,
    /// first occurrence wins.
    pub fn with_values(name: impl Into<String>, values: &[&str]) -> Self {
        let mut option = Self::new(name);
        for value in values {
            option.push_value(value);
        }
        option
    }

    /// Whether the option has no values. An accepted transient state while
    /// the user is typing; it makes the whole matrix empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the option already carries this exact value.
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Append a value unless it is empty or already present. Returns whether
    /// it was added.
    fn push_value(&mut self, value: &str) -> bool {
        if value.is_empty() || self.has_value(value) {
            return false;
        }
        self.values.push(value.to_string());
        true
    }
}

/// The ordered option store for one product.
///
/// Holds at most a handful of options; every mutation is index-based, the
/// way a form addresses its rows. Identity of downstream variants is the
/// value tuple, so renaming an option is free while removing one orphans
/// every variant on the next regeneration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct OptionSet {
    options: Vec<ProductOption>,
}

impl OptionSet {
    /// Create an empty option store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-denormalized options, e.g. the load path of a
    /// snapshot. Values are taken verbatim (no trimming, which would change
    /// variant identity) but de-duplicated defensively.
    pub fn from_options(options: Vec<ProductOption>) -> Self {
        let mut set = Self::new();
        for option in options {
            let mut clean = ProductOption::new(option.name);
            clean.collapsed = option.collapsed;
            for value in &option.values {
                clean.push_value(value);
            }
            set.options.push(clean);
        }
        set
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the store has no options at all.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// All options, in order.
    pub fn options(&self) -> &[ProductOption] {
        &self.options
    }

    /// The option at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&ProductOption> {
        self.options.get(index)
    }

    /// Append a new, unnamed option and return its index. The blank name is
    /// allowed to sit in the store while the user types; [`Self::validate`]
    /// blocks generation until it is filled in.
    pub fn add_option(&mut self) -> usize {
        self.options.push(ProductOption::new(""));
        self.options.len() - 1
    }

    /// Rename the option at `index`. Variants are untouched: identity is
    /// the value tuple, not the option name.
    pub fn rename_option(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), VariantError> {
        self.check_index(index)?;
        self.options[index].name = name.into();
        Ok(())
    }

    /// Remove the option at `index` and return it. Variants keyed on the
    /// old axis count become orphans at the next regeneration.
    pub fn remove_option(&mut self, index: usize) -> Result<ProductOption, VariantError> {
        self.check_index(index)?;
        Ok(self.options.remove(index))
    }

    /// Parse `raw` as comma-separated values and union them into the option
    /// at `index`. Tokens are trimmed, empties dropped, existing values keep
    /// their position, and genuinely new values append at the end. Returns
    /// how many values were actually added.
    pub fn add_values(&mut self, index: usize, raw: &str) -> Result<usize, VariantError> {
        self.check_index(index)?;
        let option = &mut self.options[index];
        let mut added = 0;
        for token in raw.split(',') {
            if option.push_value(token.trim()) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove one value from the option at `index`; returns whether it was
    /// present. Removing the last value is allowed and leaves an empty
    /// option, which empties the whole matrix rather than erroring.
    pub fn remove_value(&mut self, index: usize, value: &str) -> Result<bool, VariantError> {
        self.check_index(index)?;
        let values = &mut self.options[index].values;
        let before = values.len();
        values.retain(|v| v != value);
        Ok(values.len() < before)
    }

    /// Move the option at `from` so it lands at `to`, shifting the options
    /// between them by one. Value order inside each option is untouched.
    pub fn move_option(&mut self, from: usize, to: usize) -> Result<(), VariantError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from != to {
            let option = self.options.remove(from);
            self.options.insert(to, option);
        }
        Ok(())
    }

    /// Flip the presentation collapse flag and return the new state.
    pub fn toggle_collapse(&mut self, index: usize) -> Result<bool, VariantError> {
        self.check_index(index)?;
        let option = &mut self.options[index];
        option.collapsed = !option.collapsed;
        Ok(option.collapsed)
    }

    /// Check that every option has a non-blank, unique name. Runs before
    /// any generation; the error names the first offending option.
    pub fn validate(&self) -> Result<(), VariantError> {
        for (i, option) in self.options.iter().enumerate() {
            if option.name.trim().is_empty() {
                return Err(VariantError::BlankOptionName);
            }
            if self.options[..i].iter().any(|prior| prior.name == option.name) {
                return Err(VariantError::DuplicateOptionName(option.name.clone()));
            }
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), VariantError> {
        if index >= self.options.len() {
            return Err(VariantError::OptionIndexOutOfRange {
                index,
                len: self.options.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_and_color() -> OptionSet {
        OptionSet::from_options(vec![
            ProductOption::with_values("Size", &["S", "M", "L"]),
            ProductOption::with_values("Color", &["Red", "Blue"]),
        ])
    }

    #[test]
    fn test_add_option_starts_blank() {
        let mut options = OptionSet::new();
        let index = options.add_option();
        assert_eq!(index, 0);
        assert_eq!(options.get(0).unwrap().name, "");
        assert!(options.get(0).unwrap().values.is_empty());
        assert!(!options.get(0).unwrap().collapsed);
    }

    #[test]
    fn test_rename_option() {
        let mut options = size_and_color();
        options.rename_option(1, "Colour").unwrap();
        assert_eq!(options.get(1).unwrap().name, "Colour");
        assert!(matches!(
            options.rename_option(2, "x"),
            Err(VariantError::OptionIndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_add_values_parses_comma_list() {
        let mut options = OptionSet::new();
        let index = options.add_option();
        options.rename_option(index, "Size").unwrap();

        let added = options.add_values(index, " S , M ,, L , M ").unwrap();
        assert_eq!(added, 3);
        assert_eq!(options.get(index).unwrap().values, vec!["S", "M", "L"]);
    }

    #[test]
    fn test_add_values_appends_new_after_existing() {
        let mut options = size_and_color();
        let added = options.add_values(0, "M, XL").unwrap();
        assert_eq!(added, 1);
        assert_eq!(options.get(0).unwrap().values, vec!["S", "M", "L", "XL"]);
    }

    #[test]
    fn test_remove_value_allows_emptying_an_option() {
        let mut options = size_and_color();
        assert!(options.remove_value(1, "Red").unwrap());
        assert!(options.remove_value(1, "Blue").unwrap());
        assert!(!options.remove_value(1, "Blue").unwrap());
        assert!(options.get(1).unwrap().is_empty());
    }

    #[test]
    fn test_move_option() {
        let mut options = size_and_color();
        options.move_option(0, 1).unwrap();
        assert_eq!(options.get(0).unwrap().name, "Color");
        assert_eq!(options.get(1).unwrap().name, "Size");
        assert_eq!(options.get(1).unwrap().values, vec!["S", "M", "L"]);
        assert!(options.move_option(0, 5).is_err());
    }

    #[test]
    fn test_toggle_collapse_is_presentation_only() {
        let mut options = size_and_color();
        assert!(options.toggle_collapse(0).unwrap());
        assert!(!options.toggle_collapse(0).unwrap());
        assert_eq!(options.get(0).unwrap().values, vec!["S", "M", "L"]);
    }

    #[test]
    fn test_validate_blank_name() {
        let mut options = size_and_color();
        options.add_option();
        assert!(matches!(
            options.validate(),
            Err(VariantError::BlankOptionName)
        ));
    }

    #[test]
    fn test_validate_duplicate_name() {
        let mut options = size_and_color();
        options.rename_option(1, "Size").unwrap();
        match options.validate() {
            Err(VariantError::DuplicateOptionName(name)) => assert_eq!(name, "Size"),
            other => panic!("expected duplicate name error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_options_deduplicates_verbatim() {
        let options = OptionSet::from_options(vec![ProductOption {
            name: "Size".to_string(),
            values: vec!["S".to_string(), "S".to_string(), "S ".to_string()],
            collapsed: true,
        }]);
        // "S " is a distinct value; no trimming happens on the load path.
        assert_eq!(options.get(0).unwrap().values, vec!["S", "S "]);
        assert!(options.get(0).unwrap().collapsed);
    }
}
