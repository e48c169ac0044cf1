//! Style cascade and resolution for retained-mode UI trees.
//!
//! # Scope
//!
//! This crate implements:
//! - **Stylesheets** built from pre-tokenized values ([`StyleSheetBuilder`])
//!   - Typed value store addressed by [`StyleValueHandle`]s
//!   - Recursive imports and base (default) sheets
//!
//! - **Selectors**
//!   - Type, class, name (`#id`), wildcard, pseudo-class and host predicate parts
//!   - Child and descendant combinators
//!   - A per-sheet index keyed by the first part of the rightmost compound
//!   - Right-to-left matching reporting the pseudo-states each result depends on
//!
//! - **Cascade**
//!   - Base sheets, then specificity, then sheet position, then source order
//!   - `:root` forced on the element owning the sheet being matched
//!
//! - **Variables**
//!   - `var(--name, fallback)` with cycle detection and an expansion cap
//!   - Per-property grammars checked on expanded values
//!
//! - **Values**
//!   - Typed reads (lengths, colors, keywords, fonts, textures, cursors)
//!   - Box, `flex`, `border-radius` and text-outline shorthands
//!   - `initial`, `inherit` and `unset`
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use weft_dom::{ElementData, ElementTree};
//! use weft_style::{Color, StyleResolver, StyleSheetBuilder};
//!
//! let sheet = StyleSheetBuilder::new()
//!     .rule("Label.title")
//!     .property("color")
//!     .color(Color::BLUE)
//!     .build()
//!     .unwrap();
//!
//! let mut tree = ElementTree::new(ElementData::new("Panel"));
//! let label = tree.append(tree.root(), ElementData::new("Label").with_classes(&["title"]));
//!
//! let attachments = HashMap::from([(tree.root(), vec![Arc::new(sheet)])]);
//! let styles = StyleResolver::default().compute_styles(&tree, &attachments);
//! assert_eq!(styles.get(label).unwrap().color, Color::BLUE);
//! ```

/// Cascade ordering and the sheet stack.
pub mod cascade;
mod dom;
mod error;
/// Value grammars checked during variable expansion.
pub mod grammar;
/// Property ids, metadata and the property-id cache.
pub mod properties;
/// Full style passes and their caches.
pub mod resolver;
/// Selector model, index and matcher.
pub mod selector;
/// Stylesheets and their value store.
pub mod sheet;
/// Typed values, the declaration reader and computed styles.
pub mod style;
/// Custom properties and `var()` resolution.
pub mod variables;

pub use cascade::{MatchRecord, StyleSheetStack, find_matches};
pub use error::StyleSheetError;
pub use grammar::{ValueGrammar, ValueKinds};
pub use properties::{PropertyIdCache, StylePropertyId};
pub use resolver::{
    PseudoStateDependencies, ResolvedStyles, ResolverOptions, SheetAttachments, StyleResolver, StyleScope,
};
pub use selector::{
    MatchResultInfo, QueryElement, SelectorIndex, Specificity, StyleComplexSelector, StyleSelector,
    StyleSelectorPart, StyleSelectorRelationship, StyleSubject, match_right_to_left, match_selector, matches,
};
pub use sheet::{
    SheetId, StyleProperty, StylePropertyValue, StyleRule, StyleSheet, StyleSheetBuilder, StyleValueHandle,
    StyleValueKeyword, StyleValueType,
};
pub use style::{Color, ComputedStyle, Length, ResourceLoader, StylePropertyReader};
pub use variables::{ResolveResult, Variable, VariableContext, VariableResolver};
