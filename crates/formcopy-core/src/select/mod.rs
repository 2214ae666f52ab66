//! Allow-list selection over extracted fields.

mod direct;
mod pattern;

pub use direct::DirectSelector;
pub use pattern::PatternSelector;

use crate::error::Result;
use crate::models::config::SelectionStrategy;
use crate::models::fields::{AllowList, FieldValues};

/// Result of selecting fields against an allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Selected values keyed by canonical name.
    pub values: FieldValues,
    /// Allowed names with no extracted counterpart.
    pub missing: Vec<String>,
}

impl Selection {
    fn record(&mut self, name: &str, value: Option<Option<String>>) {
        match value {
            Some(value) => {
                self.values.insert(name.to_string(), value);
            }
            None => self.missing.push(name.to_string()),
        }
    }
}

/// Restricts extracted fields to the allow-list.
///
/// Membership in the allow-list is the only criterion; names are matched under
/// the accepted bracket decorations and stored undecorated.
pub trait FieldSelector {
    fn select(&self, allow: &AllowList, extracted: &FieldValues) -> Result<Selection>;
}

/// Build the selector for a configured strategy.
pub fn selector_for(strategy: SelectionStrategy) -> Box<dyn FieldSelector> {
    match strategy {
        SelectionStrategy::Direct => Box::new(DirectSelector::new()),
        SelectionStrategy::Pattern => Box::new(PatternSelector::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extracted(pairs: &[(&str, Option<&str>)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_strategies_agree() {
        let allow = AllowList::new(["Name", "DateOfBirth", "City", "Absent"]);
        let fields = extracted(&[
            ("Name", Some("Alice")),
            ("[DateOfBirth]", Some("1990-01-01")),
            ("[City", Some("Torino \"centro\"")),
            ("Extra", Some("ignored")),
        ]);

        let direct = selector_for(SelectionStrategy::Direct).select(&allow, &fields).unwrap();
        let pattern = selector_for(SelectionStrategy::Pattern).select(&allow, &fields).unwrap();

        assert_eq!(direct, pattern);
        assert_eq!(direct.missing, vec!["Absent".to_string()]);
        assert_eq!(
            direct.values,
            extracted(&[
                ("Name", Some("Alice")),
                ("DateOfBirth", Some("1990-01-01")),
                ("City", Some("Torino \"centro\"")),
            ])
        );
    }

    #[test]
    fn test_empty_allow_list_selects_nothing() {
        let fields = extracted(&[("Name", Some("Alice"))]);
        for strategy in [SelectionStrategy::Direct, SelectionStrategy::Pattern] {
            let selection = selector_for(strategy).select(&AllowList::default(), &fields).unwrap();
            assert!(selection.values.is_empty());
            assert!(selection.missing.is_empty());
        }
    }
}
