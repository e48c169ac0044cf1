//! Tests for element tree construction and traversal.

use weft_dom::{ElementData, ElementTree, NodeId, PseudoStates};

fn sample_tree() -> (ElementTree, NodeId, NodeId) {
    let mut tree = ElementTree::new(ElementData::new("Root"));
    let panel = tree.append(NodeId::ROOT, ElementData::new("Panel").with_classes(&["box"]));
    let button = tree.append(
        panel,
        ElementData::new("Button")
            .with_name("ok")
            .with_classes(&["primary", "large"]),
    );
    (tree, panel, button)
}

#[test]
fn test_append_sets_parent() {
    let (tree, panel, button) = sample_tree();
    assert_eq!(tree.parent(button), Some(panel));
    assert_eq!(tree.parent(panel), Some(NodeId::ROOT));
    assert_eq!(tree.parent(NodeId::ROOT), None);
    assert_eq!(tree.children(panel), &[button]);
}

#[test]
fn test_ancestors_walk_to_root() {
    let (tree, panel, button) = sample_tree();
    let ancestors: Vec<NodeId> = tree.ancestors(button).collect();
    assert_eq!(ancestors, vec![panel, NodeId::ROOT]);
    assert_eq!(tree.depth(button), 2);
    assert_eq!(tree.depth(NodeId::ROOT), 0);
}

#[test]
fn test_class_list_deduplicates() {
    let mut data = ElementData::new("Label").with_classes(&["a", "b", "a"]);
    assert_eq!(data.classes, vec!["a".to_string(), "b".to_string()]);
    assert!(data.remove_class("a"));
    assert!(!data.remove_class("a"));
    assert!(!data.has_class("a"));
}

#[test]
fn test_set_pseudo_states_returns_previous() {
    let (mut tree, _, button) = sample_tree();
    let previous = tree.set_pseudo_states(button, PseudoStates::HOVER);
    assert_eq!(previous, Some(PseudoStates::empty()));
    assert_eq!(
        tree.element(button).map(|e| e.pseudo_states),
        Some(PseudoStates::HOVER)
    );
}

#[test]
fn test_element_ref_parent_chain() {
    let (tree, panel, button) = sample_tree();
    let element = tree.element_ref(button).unwrap();
    assert_eq!(element.data().name.as_deref(), Some("ok"));
    let parent = element.parent().unwrap();
    assert_eq!(parent.id(), panel);
    assert_eq!(parent.parent().unwrap().id(), NodeId::ROOT);
    assert!(parent.parent().unwrap().parent().is_none());
}
