//! Membership lookup in the extracted map.

use super::{FieldSelector, Selection};
use crate::error::Result;
use crate::matcher::Decoration;
use crate::models::fields::{AllowList, FieldValues};

/// Looks up each allowed name directly, trying the bare name first and then
/// each bracket decoration.
pub struct DirectSelector;

impl DirectSelector {
    /// Create a new direct selector.
    pub fn new() -> Self {
        Self
    }

    /// Value of the first decoration variant of `name` present in `extracted`.
    pub fn lookup(&self, name: &str, extracted: &FieldValues) -> Option<Option<String>> {
        Decoration::ALL
            .iter()
            .find_map(|decoration| extracted.get(&decoration.apply(name)))
            .cloned()
    }
}

impl Default for DirectSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSelector for DirectSelector {
    fn select(&self, allow: &AllowList, extracted: &FieldValues) -> Result<Selection> {
        let mut selection = Selection::default();
        for name in allow.iter() {
            selection.record(name, self.lookup(name, extracted));
        }
        Ok(selection)
    }
}
