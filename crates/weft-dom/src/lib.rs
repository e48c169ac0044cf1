//! Element tree for the Weft style engine.
//!
//! This crate provides an arena-based tree of UI elements carrying exactly
//! the data selector matching needs: a type name, an optional name (the
//! element's id), a class list and a set of pseudo-state flags.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues.
//! [`ElementRef`] pairs a tree with a node id so that an element can be
//! handed to the style engine by value.

mod state;

pub use state::PseudoStates;

/// A type-safe index into the element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root element is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// Element-specific data used by selector matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementData {
    /// The element's type name, matched by type selectors (`Button`).
    pub type_name: String,
    /// The element's name, matched by id selectors (`#ok`).
    pub name: Option<String>,
    /// Class list in insertion order, matched by class selectors (`.primary`).
    pub classes: Vec<String>,
    /// Current interaction state, matched by pseudo-class selectors.
    pub pseudo_states: PseudoStates,
}

impl ElementData {
    /// Create element data with the given type name and nothing else.
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            ..Self::default()
        }
    }

    /// Set the element's name.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Append classes to the class list, skipping duplicates.
    #[must_use]
    pub fn with_classes(mut self, classes: &[&str]) -> Self {
        for class in classes {
            self.add_class(class);
        }
        self
    }

    /// Set the pseudo-state flags.
    #[must_use]
    pub fn with_states(mut self, states: PseudoStates) -> Self {
        self.pseudo_states = states;
        self
    }

    /// Returns `true` if the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class if it is not already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Remove a class. Returns `true` if it was present.
    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        before != self.classes.len()
    }
}

/// A node of the tree: element data plus its relationships.
#[derive(Debug, Clone)]
pub struct Node {
    /// The element stored at this node.
    pub data: ElementData,
    /// Parent node, `None` for the root and for detached nodes.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// Arena-based element tree with O(1) node access and traversal.
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. The root element is always at [`NodeId::ROOT`].
#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: Vec<Node>,
}

impl ElementTree {
    /// Create a new tree whose root element is `root`.
    pub fn new(root: ElementData) -> Self {
        Self {
            nodes: vec![Node {
                data: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get the root element ID.
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the element data of a node.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).map(|n| &n.data)
    }

    /// Get mutable element data of a node.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id.0).map(|n| &mut n.data)
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, data: ElementData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// # Panics
    /// Panics if either id was not allocated by this tree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Allocate `data` and append it under `parent` in one step.
    pub fn append(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let id = self.alloc(data);
        self.append_child(parent, id);
        id
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Replace the pseudo-state flags of a node. Returns the previous flags.
    pub fn set_pseudo_states(&mut self, id: NodeId, states: PseudoStates) -> Option<PseudoStates> {
        self.element_mut(id)
            .map(|e| std::mem::replace(&mut e.pseudo_states, states))
    }

    /// Iterate over all ancestors of a node, from parent to root.
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Depth of a node: 0 for the root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Borrow a node as an [`ElementRef`].
    pub fn element_ref(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.get(id).map(|_| ElementRef { tree: self, id })
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a ElementTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// A borrowed element: the tree plus a node id.
///
/// `ElementRef` is `Copy`, so walking to the parent produces a new value
/// instead of a reference into the arena.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a ElementTree,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    /// The node this reference points at.
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The tree this reference borrows.
    pub const fn tree(&self) -> &'a ElementTree {
        self.tree
    }

    /// The element data. Valid ids always resolve; see [`ElementTree::element_ref`].
    pub fn data(&self) -> &'a ElementData {
        &self.tree.nodes[self.id.0].data
    }

    /// The parent element, if any.
    pub fn parent(&self) -> Option<Self> {
        self.tree.parent(self.id).map(|id| Self {
            tree: self.tree,
            id,
        })
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}
