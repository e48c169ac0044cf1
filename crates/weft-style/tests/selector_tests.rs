//! Integration tests for selector matching.

use weft_dom::{ElementData, ElementRef, ElementTree, NodeId, PseudoStates};
use weft_style::selector::parse_selector_list;
use weft_style::{MatchResultInfo, StyleComplexSelector, match_right_to_left, match_selector, matches};

fn complex(text: &str) -> StyleComplexSelector {
    let mut list = parse_selector_list(text).unwrap();
    assert_eq!(list.len(), 1, "expected a single selector in '{text}'");
    StyleComplexSelector::new(list.remove(0), 0)
}

/// Root > Panel.box > Row > Button#ok.primary
fn sample_tree() -> (ElementTree, NodeId, NodeId, NodeId) {
    let mut tree = ElementTree::new(ElementData::new("Root"));
    let panel = tree.append(NodeId::ROOT, ElementData::new("Panel").with_classes(&["box"]));
    let row = tree.append(panel, ElementData::new("Row"));
    let button = tree.append(
        row,
        ElementData::new("Button")
            .with_name("ok")
            .with_classes(&["primary"]),
    );
    (tree, panel, row, button)
}

fn element(tree: &ElementTree, id: NodeId) -> ElementRef<'_> {
    tree.element_ref(id).unwrap()
}

#[test]
fn test_descendant_matches_any_ancestor() {
    let (tree, _, _, button) = sample_tree();
    assert!(matches(element(&tree, button), &complex(".box Button")));
    assert!(matches(element(&tree, button), &complex("Root .primary")));
}

#[test]
fn test_child_requires_direct_parent() {
    let (tree, _, _, button) = sample_tree();
    assert!(!matches(element(&tree, button), &complex(".box > Button")));
    assert!(matches(element(&tree, button), &complex("Row > Button")));
    assert!(matches(element(&tree, button), &complex(".box > Row > #ok")));
}

#[test]
fn test_backtracks_to_outer_ancestor() {
    // Two Panels: the inner one has no Row parent, so `Row > Panel` must be
    // retried higher up after the descendant step picks the inner Panel.
    let mut tree = ElementTree::new(ElementData::new("Root"));
    let row = tree.append(NodeId::ROOT, ElementData::new("Row"));
    let outer = tree.append(row, ElementData::new("Panel"));
    let inner = tree.append(outer, ElementData::new("Panel"));
    let label = tree.append(inner, ElementData::new("Label"));

    assert!(matches(element(&tree, label), &complex("Row > Panel Label")));
    assert!(!matches(element(&tree, label), &complex("Column > Panel Label")));
}

#[test]
fn test_type_match_is_exact() {
    let (tree, _, _, button) = sample_tree();
    assert!(!matches(element(&tree, button), &complex("button")));
    assert!(!matches(element(&tree, button), &complex("Butt")));
}

#[test]
fn test_wildcard_and_compound() {
    let (tree, _, _, button) = sample_tree();
    assert!(matches(element(&tree, button), &complex("*")));
    assert!(matches(element(&tree, button), &complex("Button#ok.primary")));
    assert!(!matches(element(&tree, button), &complex("Button#ok.secondary")));
}

#[test]
fn test_hover_trigger_and_dependency() {
    let (mut tree, _, _, button) = sample_tree();
    let selector = complex("Button:hover");
    let compound = selector.rightmost().unwrap();

    let info = match_selector(element(&tree, button), compound, PseudoStates::empty());
    assert!(!info.success);
    assert_eq!(info.trigger_pseudo_mask, PseudoStates::HOVER);
    assert!(info.dependency_pseudo_mask.is_empty());

    let _ = tree.set_pseudo_states(button, PseudoStates::HOVER);
    let info = match_selector(element(&tree, button), compound, PseudoStates::empty());
    assert!(info.success);
    assert_eq!(info.dependency_pseudo_mask, PseudoStates::HOVER);
    assert!(info.trigger_pseudo_mask.is_empty());
}

#[test]
fn test_negated_pseudo_class() {
    let (mut tree, _, _, button) = sample_tree();
    let selector = complex("Button:enabled");
    let compound = selector.rightmost().unwrap();

    let info = match_selector(element(&tree, button), compound, PseudoStates::empty());
    assert!(info.success);
    assert_eq!(info.dependency_pseudo_mask, PseudoStates::DISABLED);
    assert!(info.trigger_pseudo_mask.is_empty());

    // a present negated state blocks the match, so toggling it is the trigger
    let _ = tree.set_pseudo_states(button, PseudoStates::DISABLED);
    let info = match_selector(element(&tree, button), compound, PseudoStates::empty());
    assert!(!info.success);
    assert_eq!(info.trigger_pseudo_mask, PseudoStates::DISABLED);
    assert!(info.dependency_pseudo_mask.is_empty());
}

#[test]
fn test_structural_failure_reports_no_masks() {
    let (tree, _, _, button) = sample_tree();
    let selector = complex("Label:hover");
    let info = match_selector(element(&tree, button), selector.rightmost().unwrap(), PseudoStates::empty());
    assert_eq!(info, MatchResultInfo::default());
}

#[test]
fn test_unknown_pseudo_class_never_matches() {
    let (tree, _, _, button) = sample_tree();
    let selector = complex("Button:wobbly");
    let all = PseudoStates::all();
    assert!(!match_right_to_left(element(&tree, button), &selector, all, |_, _| {}));

    let info = match_selector(element(&tree, button), selector.rightmost().unwrap(), all);
    assert!(!info.success);
    assert!(info.trigger_pseudo_mask.is_empty());
}

#[test]
fn test_unknown_pseudo_class_keeps_known_triggers() {
    let (tree, _, _, button) = sample_tree();
    let selector = complex("Button:hover:wobbly");
    let info = match_selector(element(&tree, button), selector.rightmost().unwrap(), PseudoStates::empty());
    assert!(!info.success);
    assert_eq!(info.trigger_pseudo_mask, PseudoStates::HOVER);
}

#[test]
fn test_forced_states_apply_to_target_only() {
    let (tree, panel, _, button) = sample_tree();
    assert!(match_right_to_left(
        element(&tree, button),
        &complex("Button:root"),
        PseudoStates::ROOT,
        |_, _| {}
    ));
    assert!(!match_right_to_left(
        element(&tree, button),
        &complex(":root Button"),
        PseudoStates::ROOT,
        |_, _| {}
    ));
    assert!(match_right_to_left(
        element(&tree, panel),
        &complex(":root"),
        PseudoStates::ROOT,
        |_, _| {}
    ));
}

#[test]
fn test_sink_sees_ancestor_evaluations() {
    let (mut tree, panel, _, button) = sample_tree();
    let _ = tree.set_pseudo_states(panel, PseudoStates::HOVER);
    let mut seen = Vec::new();
    let matched = match_right_to_left(
        element(&tree, button),
        &complex(".box:hover Button"),
        PseudoStates::empty(),
        |e, info| seen.push((e.id(), info)),
    );
    assert!(matched);
    let (id, info) = seen.last().copied().unwrap();
    assert_eq!(id, panel);
    assert_eq!(info.dependency_pseudo_mask, PseudoStates::HOVER);
}
