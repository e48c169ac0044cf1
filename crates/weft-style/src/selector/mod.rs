//! Selector model, parsing, indexing and matching.
//!
//! A complex selector such as `Panel > .row Button:hover` is stored as a list
//! of compound selectors from left to right. Each compound records how it
//! relates to the compound on its left (`previous_relationship`) and the
//! pseudo-state masks its pseudo-classes compile to.
//!
//! ```text
//! [Panel] <-(Child)- [.row] <-(Descendant)- [Button :hover]
//! ```
//!
//! Matching walks this list from the right, climbing the element tree.

mod index;
mod matcher;
mod parser;

use std::fmt;
use std::sync::Arc;

use weft_common::warning::warn_once;
use weft_dom::PseudoStates;

pub use index::{SelectorIndex, WILDCARD_KEY};
pub use matcher::{
    MatchResultInfo, QueryElement, StyleSubject, match_right_to_left, match_selector, matches,
};
pub use parser::parse_selector_list;

/// A host-supplied test against an element.
pub type SelectorPredicate = Arc<dyn Fn(&dyn StyleSubject) -> bool + Send + Sync>;

/// A single condition on an element.
#[derive(Clone)]
pub enum StyleSelectorPart {
    /// `*`, matches every element.
    Wildcard,
    /// Type selector, compared exactly against the element's type name.
    Type(String),
    /// `.class`.
    Class(String),
    /// `#name`, compared against the element's name.
    Id(String),
    /// `:state`, compiled into the owning selector's pseudo-state masks.
    PseudoClass(String),
    /// Arbitrary test supplied by the host.
    Predicate(SelectorPredicate),
}

impl StyleSelectorPart {
    /// Evaluate the structural part of this condition. Pseudo-classes always
    /// pass here; they are checked through the selector's masks.
    pub fn matches(&self, element: &dyn StyleSubject) -> bool {
        match self {
            Self::Wildcard | Self::PseudoClass(_) => true,
            Self::Type(name) => element.type_name() == name,
            Self::Class(class) => element.has_class(class),
            Self::Id(id) => element.name() == Some(id.as_str()),
            Self::Predicate(predicate) => predicate(element),
        }
    }
}

impl fmt::Debug for StyleSelectorPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str("Wildcard"),
            Self::Type(v) => f.debug_tuple("Type").field(v).finish(),
            Self::Class(v) => f.debug_tuple("Class").field(v).finish(),
            Self::Id(v) => f.debug_tuple("Id").field(v).finish(),
            Self::PseudoClass(v) => f.debug_tuple("PseudoClass").field(v).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl PartialEq for StyleSelectorPart {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Wildcard, Self::Wildcard) => true,
            (Self::Type(a), Self::Type(b))
            | (Self::Class(a), Self::Class(b))
            | (Self::Id(a), Self::Id(b))
            | (Self::PseudoClass(a), Self::PseudoClass(b)) => a == b,
            (Self::Predicate(a), Self::Predicate(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// How a compound selector relates to the compound on its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StyleSelectorRelationship {
    /// Leftmost compound.
    #[default]
    None,
    /// `A > B`: the left compound must match the parent.
    Child,
    /// `A B`: the left compound must match some ancestor.
    Descendant,
}

/// Pseudo-classes and the state bit each one tests.
///
/// A negated entry matches when the bit is *clear*.
const PSEUDO_CLASSES: &[(&str, PseudoStates, bool)] = &[
    ("active", PseudoStates::ACTIVE, false),
    ("hover", PseudoStates::HOVER, false),
    ("checked", PseudoStates::CHECKED, false),
    ("selected", PseudoStates::CHECKED, false),
    ("disabled", PseudoStates::DISABLED, false),
    ("focus", PseudoStates::FOCUS, false),
    ("root", PseudoStates::ROOT, false),
    ("inactive", PseudoStates::ACTIVE, true),
    ("enabled", PseudoStates::DISABLED, true),
];

/// A compound selector: conditions that must all hold on one element.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSelector {
    parts: Vec<StyleSelectorPart>,
    previous_relationship: StyleSelectorRelationship,
    pseudo_state_mask: PseudoStates,
    negated_pseudo_state_mask: PseudoStates,
}

impl StyleSelector {
    /// Build a compound selector, compiling its pseudo-classes into masks.
    ///
    /// An unknown pseudo-class is reported once and sets every bit outside
    /// the known states in the positive mask, so the selector can never
    /// match.
    #[must_use]
    pub fn new(parts: Vec<StyleSelectorPart>, previous_relationship: StyleSelectorRelationship) -> Self {
        let mut pseudo_state_mask = PseudoStates::empty();
        let mut negated_pseudo_state_mask = PseudoStates::empty();
        for part in &parts {
            let StyleSelectorPart::PseudoClass(name) = part else {
                continue;
            };
            match PSEUDO_CLASSES.iter().find(|(n, _, _)| *n == name.as_str()) {
                Some(&(_, state, true)) => negated_pseudo_state_mask |= state,
                Some(&(_, state, false)) => pseudo_state_mask |= state,
                None => {
                    warn_once("Style", &format!("unknown pseudo-class ':{name}'"));
                    pseudo_state_mask |= PseudoStates::from_bits_retain(!PseudoStates::all().bits());
                }
            }
        }
        Self {
            parts,
            previous_relationship,
            pseudo_state_mask,
            negated_pseudo_state_mask,
        }
    }

    /// The conditions of this compound.
    #[must_use]
    pub fn parts(&self) -> &[StyleSelectorPart] {
        &self.parts
    }

    /// Relationship to the compound on the left.
    #[must_use]
    pub const fn previous_relationship(&self) -> StyleSelectorRelationship {
        self.previous_relationship
    }

    /// States that must be set.
    #[must_use]
    pub const fn pseudo_state_mask(&self) -> PseudoStates {
        self.pseudo_state_mask
    }

    /// States that must be clear.
    #[must_use]
    pub const fn negated_pseudo_state_mask(&self) -> PseudoStates {
        self.negated_pseudo_state_mask
    }
}

/// Selector specificity as `(ids, classes and pseudo-classes, types)`.
///
/// Compared lexicographically, so the derived `Ord` is the cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }

    /// Specificity of a list of compounds.
    ///
    /// Predicates count as classes. Wildcards count for nothing.
    #[must_use]
    pub fn of(selectors: &[StyleSelector]) -> Self {
        let mut specificity = Self::default();
        for part in selectors.iter().flat_map(|s| s.parts.iter()) {
            match part {
                StyleSelectorPart::Id(_) => specificity.0 += 1,
                StyleSelectorPart::Class(_)
                | StyleSelectorPart::PseudoClass(_)
                | StyleSelectorPart::Predicate(_) => specificity.1 += 1,
                StyleSelectorPart::Type(_) => specificity.2 += 1,
                StyleSelectorPart::Wildcard => {}
            }
        }
        specificity
    }
}

/// A complete selector bound to the rule it selects for.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleComplexSelector {
    selectors: Vec<StyleSelector>,
    specificity: Specificity,
    pub(crate) rule_index: usize,
    pub(crate) order_in_style_sheet: usize,
}

impl StyleComplexSelector {
    /// Bind compounds (left to right) to the rule at `rule_index`.
    ///
    /// The position in the owning sheet is assigned when the sheet's content
    /// is set.
    #[must_use]
    pub fn new(selectors: Vec<StyleSelector>, rule_index: usize) -> Self {
        let specificity = Specificity::of(&selectors);
        Self {
            selectors,
            specificity,
            rule_index,
            order_in_style_sheet: 0,
        }
    }

    /// Compounds, left to right.
    #[must_use]
    pub fn selectors(&self) -> &[StyleSelector] {
        &self.selectors
    }

    /// The compound matched against the subject element.
    #[must_use]
    pub fn rightmost(&self) -> Option<&StyleSelector> {
        self.selectors.last()
    }

    /// Cached specificity.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// Index of the selected rule in the owning sheet.
    #[must_use]
    pub const fn rule_index(&self) -> usize {
        self.rule_index
    }

    /// Position of this selector in the owning sheet.
    #[must_use]
    pub const fn order_in_style_sheet(&self) -> usize {
        self.order_in_style_sheet
    }

    /// `true` if there is a single compound.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.selectors.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(parts: Vec<StyleSelectorPart>) -> StyleSelector {
        StyleSelector::new(parts, StyleSelectorRelationship::None)
    }

    #[test]
    fn test_pseudo_class_masks() {
        let s = compound(vec![
            StyleSelectorPart::Type("Button".into()),
            StyleSelectorPart::PseudoClass("hover".into()),
            StyleSelectorPart::PseudoClass("enabled".into()),
        ]);
        assert_eq!(s.pseudo_state_mask(), PseudoStates::HOVER);
        assert_eq!(s.negated_pseudo_state_mask(), PseudoStates::DISABLED);
    }

    #[test]
    fn test_selected_aliases_checked() {
        let s = compound(vec![StyleSelectorPart::PseudoClass("selected".into())]);
        assert_eq!(s.pseudo_state_mask(), PseudoStates::CHECKED);
    }

    #[test]
    fn test_unknown_pseudo_class_sets_only_unknown_bits() {
        let s = compound(vec![StyleSelectorPart::PseudoClass("wobble".into())]);
        assert!(!s.pseudo_state_mask().intersects(PseudoStates::all()));
        assert_eq!(s.pseudo_state_mask().bits() | PseudoStates::all().bits(), u32::MAX);

        let s = compound(vec![
            StyleSelectorPart::PseudoClass("hover".into()),
            StyleSelectorPart::PseudoClass("wobble".into()),
        ]);
        assert_eq!(s.pseudo_state_mask() & PseudoStates::all(), PseudoStates::HOVER);
    }

    #[test]
    fn test_specificity_counts() {
        let selectors = vec![
            compound(vec![StyleSelectorPart::Id("main".into())]),
            StyleSelector::new(
                vec![
                    StyleSelectorPart::Type("Label".into()),
                    StyleSelectorPart::Class("title".into()),
                    StyleSelectorPart::PseudoClass("hover".into()),
                    StyleSelectorPart::Wildcard,
                ],
                StyleSelectorRelationship::Descendant,
            ),
        ];
        assert_eq!(Specificity::of(&selectors), Specificity::new(1, 2, 1));
    }

    #[test]
    fn test_specificity_ordering() {
        assert!(Specificity::new(1, 0, 0) > Specificity::new(0, 10, 10));
        assert!(Specificity::new(0, 1, 0) > Specificity::new(0, 0, 5));
    }
}
