use std::collections::HashMap;

use super::{StyleComplexSelector, StyleSelectorPart};

/// Key under which selectors starting with `*`, a pseudo-class or a
/// predicate are stored.
pub const WILDCARD_KEY: &str = "*";

/// Per-sheet lookup tables from the first part of a selector's rightmost
/// compound to the positions of the selectors that start that way.
///
/// Lookup is exact and case-sensitive. Each selector is indexed exactly once,
/// so a candidate set is a superset of the selectors that can match and must
/// still be verified by the matcher.
#[derive(Debug, Clone, Default)]
pub struct SelectorIndex {
    by_type: HashMap<String, Vec<usize>>,
    by_class: HashMap<String, Vec<usize>>,
    by_id: HashMap<String, Vec<usize>>,
}

impl SelectorIndex {
    /// Index every selector of a sheet.
    #[must_use]
    pub fn build(selectors: &[StyleComplexSelector]) -> Self {
        let mut index = Self::default();
        for (position, complex) in selectors.iter().enumerate() {
            let Some(first) = complex.rightmost().and_then(|s| s.parts().first()) else {
                tracing::error!(position, "selector without parts cannot be indexed");
                continue;
            };
            let (table, key) = match first {
                StyleSelectorPart::Type(name) => (&mut index.by_type, name.as_str()),
                StyleSelectorPart::Class(class) => (&mut index.by_class, class.as_str()),
                StyleSelectorPart::Id(id) => (&mut index.by_id, id.as_str()),
                StyleSelectorPart::Wildcard
                | StyleSelectorPart::PseudoClass(_)
                | StyleSelectorPart::Predicate(_) => (&mut index.by_type, WILDCARD_KEY),
            };
            table.entry(key.to_string()).or_default().push(position);
        }
        index
    }

    /// Selectors whose rightmost compound starts with type `name`, or with
    /// `*` when `name` is [`WILDCARD_KEY`].
    #[must_use]
    pub fn by_type(&self, name: &str) -> &[usize] {
        self.by_type.get(name).map_or(&[], Vec::as_slice)
    }

    /// Selectors whose rightmost compound starts with `.class`.
    #[must_use]
    pub fn by_class(&self, class: &str) -> &[usize] {
        self.by_class.get(class).map_or(&[], Vec::as_slice)
    }

    /// Selectors whose rightmost compound starts with `#id`.
    #[must_use]
    pub fn by_id(&self, id: &str) -> &[usize] {
        self.by_id.get(id).map_or(&[], Vec::as_slice)
    }

    /// Total number of indexed selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        [&self.by_type, &self.by_class, &self.by_id]
            .iter()
            .flat_map(|t| t.values())
            .map(Vec::len)
            .sum()
    }

    /// `true` if nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::selector::{StyleSelector, StyleSelectorRelationship, parse_selector_list};

    fn selectors(text: &str) -> Vec<StyleComplexSelector> {
        parse_selector_list(text)
            .unwrap()
            .into_iter()
            .map(|s| StyleComplexSelector::new(s, 0))
            .collect()
    }

    #[test]
    fn test_indexed_by_first_part_of_rightmost() {
        let index = SelectorIndex::build(&selectors("Panel .a, #ok.a, Button.a, *, :hover, .a Label"));
        assert_eq!(index.by_class("a"), &[0]);
        assert_eq!(index.by_id("ok"), &[1]);
        assert_eq!(index.by_type("Button"), &[2]);
        assert_eq!(index.by_type(WILDCARD_KEY), &[3, 4]);
        assert_eq!(index.by_type("Label"), &[5]);
        assert_eq!(index.len(), 6);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let index = SelectorIndex::build(&selectors("Button"));
        assert!(index.by_type("button").is_empty());
    }

    #[test]
    fn test_predicate_selector_is_a_wildcard_candidate() {
        let predicate = StyleSelector::new(
            vec![StyleSelectorPart::Predicate(Arc::new(|_| true))],
            StyleSelectorRelationship::None,
        );
        let index = SelectorIndex::build(&[StyleComplexSelector::new(vec![predicate], 0)]);
        assert_eq!(index.by_type(WILDCARD_KEY), &[0]);
    }
}
