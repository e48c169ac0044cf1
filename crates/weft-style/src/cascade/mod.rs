//! Cascade: which rules match an element, and in which order they apply.
//!
//! Sheets are matched from a [`StyleSheetStack`] holding every sheet attached
//! to the element and its ancestors, each preceded by its imports. Candidate
//! selectors are looked up in each sheet's index by the element's type name,
//! `*`, name and classes, then verified right to left. The resulting
//! [`MatchRecord`]s sort into application order:
//!
//! 1. Base (default) sheets before every other sheet.
//! 2. Lower specificity before higher.
//! 3. Lower stack position (further from the element) before higher.
//! 4. Earlier selector in its sheet before later.
//!
//! Properties are applied in ascending order, so the last record wins.

use std::cmp::Ordering;

use weft_dom::PseudoStates;

use crate::selector::{
    MatchResultInfo, QueryElement, Specificity, StyleComplexSelector, WILDCARD_KEY, match_right_to_left,
};
use crate::sheet::{StyleRule, StyleSheet};

/// A sheet on the stack and the depth of the element that attached it.
#[derive(Debug, Clone, Copy)]
pub struct StackEntry<'a> {
    /// The sheet.
    pub sheet: &'a StyleSheet,
    /// Depth of the element the sheet (or the sheet importing it) is attached to.
    pub owner_depth: usize,
}

/// Sheets in effect for the element being styled.
#[derive(Debug, Clone, Default)]
pub struct StyleSheetStack<'a> {
    entries: Vec<StackEntry<'a>>,
}

impl<'a> StyleSheetStack<'a> {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `sheet` attached at `owner_depth`, preceded by its imports.
    pub fn push(&mut self, sheet: &'a StyleSheet, owner_depth: usize) {
        for import in sheet.flattened_recursive_imports() {
            self.entries.push(StackEntry {
                sheet: import,
                owner_depth,
            });
        }
        self.entries.push(StackEntry { sheet, owner_depth });
    }

    /// Remove every sheet attached at `depth` or deeper.
    pub fn pop_depth(&mut self, depth: usize) {
        while self.entries.last().is_some_and(|e| e.owner_depth >= depth) {
            let _ = self.entries.pop();
        }
    }

    /// Entries, outermost first.
    #[must_use]
    pub fn entries(&self) -> &[StackEntry<'a>] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no sheet is in effect.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The sort key of a [`MatchRecord`].
///
/// Field order is comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CascadeKey {
    /// 0 for base sheets, 1 otherwise.
    pub origin: u8,
    /// Selector specificity.
    pub specificity: Specificity,
    /// Position of the sheet in the stack.
    pub stack_index: usize,
    /// Position of the selector in its sheet.
    pub order_in_style_sheet: usize,
}

/// A selector that matched, with where it came from.
#[derive(Debug, Clone, Copy)]
pub struct MatchRecord<'a> {
    /// The declaring sheet.
    pub sheet: &'a StyleSheet,
    /// Position of the sheet in the stack.
    pub stack_index: usize,
    /// The selector that matched.
    pub complex_selector: &'a StyleComplexSelector,
}

impl<'a> MatchRecord<'a> {
    /// The cascade sort key.
    #[must_use]
    pub fn cascade_key(&self) -> CascadeKey {
        CascadeKey {
            origin: u8::from(!self.sheet.is_default_style_sheet()),
            specificity: self.complex_selector.specificity(),
            stack_index: self.stack_index,
            order_in_style_sheet: self.complex_selector.order_in_style_sheet(),
        }
    }

    /// The rule the selector selects for.
    #[must_use]
    pub fn rule(&self) -> Option<&'a StyleRule> {
        self.sheet.rules().get(self.complex_selector.rule_index())
    }
}

impl PartialEq for MatchRecord<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MatchRecord<'_> {}

impl PartialOrd for MatchRecord<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MatchRecord<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cascade_key().cmp(&other.cascade_key())
    }
}

fn match_candidates<'a, E, F>(
    element: E,
    sheet: &'a StyleSheet,
    stack_index: usize,
    positions: &[usize],
    forced_states: PseudoStates,
    sink: &mut F,
    out: &mut Vec<MatchRecord<'a>>,
) where
    E: QueryElement,
    F: FnMut(E, MatchResultInfo),
{
    for &position in positions {
        let Some(complex_selector) = sheet.complex_selectors().get(position) else {
            continue;
        };
        if match_right_to_left(element, complex_selector, forced_states, &mut *sink) {
            out.push(MatchRecord {
                sheet,
                stack_index,
                complex_selector,
            });
        }
    }
}

/// Find every selector in `stack` matching `element`, in application order.
///
/// `element_depth` is the element's depth in its tree. Sheets attached at
/// that depth are the element's own, and match with [`PseudoStates::ROOT`]
/// forced on the element. `sink` receives every compound evaluation, which
/// is how pseudo-state dependencies are collected.
pub fn find_matches<'a, E, F>(
    element: E,
    stack: &StyleSheetStack<'a>,
    element_depth: usize,
    mut sink: F,
) -> Vec<MatchRecord<'a>>
where
    E: QueryElement,
    F: FnMut(E, MatchResultInfo),
{
    let mut records = Vec::new();
    for (stack_index, entry) in stack.entries().iter().enumerate() {
        let forced = if entry.owner_depth == element_depth {
            PseudoStates::ROOT
        } else {
            PseudoStates::empty()
        };
        let sheet = entry.sheet;
        let index = sheet.index();
        let mut candidates: Vec<usize> = index
            .by_type(element.type_name())
            .iter()
            .chain(index.by_type(WILDCARD_KEY))
            .chain(element.name().map_or(&[][..], |name| index.by_id(name)))
            .copied()
            .collect();
        for class in element.classes() {
            candidates.extend_from_slice(index.by_class(class));
        }
        // a host may list a class twice
        candidates.sort_unstable();
        candidates.dedup();
        match_candidates(element, sheet, stack_index, &candidates, forced, &mut sink, &mut records);
    }
    records.sort();
    records
}
