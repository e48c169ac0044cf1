//! Right-to-left selector matching with pseudo-state dependency reporting.

use weft_dom::PseudoStates;

use super::{StyleComplexSelector, StyleSelector, StyleSelectorRelationship};

/// What a selector part can ask of an element.
///
/// This is object safe so that host predicates can receive any element.
pub trait StyleSubject {
    /// The element's type name, compared exactly.
    fn type_name(&self) -> &str;
    /// The element's name, matched by `#name`.
    fn name(&self) -> Option<&str>;
    /// Whether the class list contains `class`.
    fn has_class(&self, class: &str) -> bool;
    /// Current pseudo-state flags.
    fn pseudo_states(&self) -> PseudoStates;
}

/// An element the cascade can walk.
///
/// Implementations are cheap handles (typically a tree reference and an
/// index), so walking to the parent returns a new value.
pub trait QueryElement: StyleSubject + Copy {
    /// The parent element, `None` at the root.
    fn parent(&self) -> Option<Self>;
    /// The class list, used to look up class-indexed selectors.
    fn classes(&self) -> impl Iterator<Item = &str>;
}

/// Outcome of matching one compound selector against one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchResultInfo {
    /// Whether the compound matched.
    pub success: bool,
    /// State bits that would change the outcome from failure to success if toggled.
    pub trigger_pseudo_mask: PseudoStates,
    /// State bits the current outcome depends on.
    pub dependency_pseudo_mask: PseudoStates,
}

/// Match a compound selector against a single element.
///
/// `extra_states` is OR-ed into the element's own states for this test.
/// Pseudo-state masks are only evaluated once every structural part passed;
/// a structural failure reports empty masks.
pub fn match_selector<E: QueryElement>(
    element: E,
    selector: &StyleSelector,
    extra_states: PseudoStates,
) -> MatchResultInfo {
    let mut info = MatchResultInfo::default();
    if !selector.parts().iter().all(|part| part.matches(&element)) {
        return info;
    }

    let states = element.pseudo_states() | extra_states;
    let mut success = true;

    let positive = selector.pseudo_state_mask();
    if !positive.is_empty() {
        if states.contains(positive) {
            info.dependency_pseudo_mask = positive;
        } else {
            // unknown pseudo-classes set bits no element can carry
            info.trigger_pseudo_mask = positive & PseudoStates::all();
            success = false;
        }
    }

    let negated = selector.negated_pseudo_state_mask();
    if !negated.is_empty() {
        if states.intersects(negated) {
            info.trigger_pseudo_mask |= negated;
            success = false;
        } else {
            info.dependency_pseudo_mask |= negated;
        }
    }

    info.success = success;
    info
}

#[derive(Clone, Copy)]
struct Checkpoint<E> {
    index: usize,
    element: E,
    depth: usize,
}

/// Match a complex selector against `element` and its ancestors.
///
/// Compounds are tried from the rightmost one. A failure below a descendant
/// combinator retries the same compound on the parent; otherwise matching
/// resumes from the last checkpoint, saved each time a compound to the left
/// of a descendant combinator succeeds. `sink` receives every evaluation,
/// successful or not.
///
/// `forced_states` applies to `element` only, never to its ancestors.
pub fn match_right_to_left<E, F>(
    element: E,
    complex: &StyleComplexSelector,
    forced_states: PseudoStates,
    mut sink: F,
) -> bool
where
    E: QueryElement,
    F: FnMut(E, MatchResultInfo),
{
    let selectors = complex.selectors();
    let Some(last) = selectors.len().checked_sub(1) else {
        return false;
    };

    let mut index = last;
    let mut current = Some(element);
    let mut depth = 0usize;
    let mut checkpoint: Option<Checkpoint<E>> = None;

    while let Some(candidate) = current {
        let extra = if depth == 0 {
            forced_states
        } else {
            PseudoStates::empty()
        };
        let info = match_selector(candidate, &selectors[index], extra);
        sink(candidate, info);

        let below_descendant = index < last
            && selectors[index + 1].previous_relationship() == StyleSelectorRelationship::Descendant;

        if !info.success {
            if below_descendant {
                current = candidate.parent();
                depth += 1;
                continue;
            }
            if let Some(saved) = checkpoint {
                index = saved.index;
                current = Some(saved.element);
                depth = saved.depth;
                continue;
            }
            return false;
        }

        if below_descendant {
            checkpoint = candidate.parent().map(|element| Checkpoint {
                index,
                element,
                depth: depth + 1,
            });
        }

        if index == 0 {
            return true;
        }
        index -= 1;
        current = candidate.parent();
        depth += 1;
    }
    false
}

/// Match without forced states or dependency reporting.
pub fn matches<E: QueryElement>(element: E, complex: &StyleComplexSelector) -> bool {
    match_right_to_left(element, complex, PseudoStates::empty(), |_, _| {})
}
