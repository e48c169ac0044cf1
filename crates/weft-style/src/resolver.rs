//! Full style passes over an element tree.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use weft_common::warning::clear_warnings;
use weft_dom::{ElementRef, ElementTree, NodeId, PseudoStates};

use crate::cascade::{MatchRecord, StyleSheetStack, find_matches};
use crate::properties::PropertyIdCache;
use crate::selector::{MatchResultInfo, QueryElement};
use crate::sheet::{SheetId, StyleSheet};
use crate::style::{ComputedStyle, NullResourceLoader, ResourceLoader, StylePropertyReader};
use crate::variables::{DEFAULT_MAX_RESOLVES, Variable, VariableContext};

/// Sheets attached to elements of a tree.
pub type SheetAttachments = HashMap<NodeId, Vec<Arc<StyleSheet>>>;

/// Resolver settings.
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Display scale. Above 1, high density texture variants are preferred.
    pub dpi_scaling: f32,
    /// Most tokens a single declaration may expand to through `var()`.
    pub max_variable_resolves: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            dpi_scaling: 1.0,
            max_variable_resolves: DEFAULT_MAX_RESOLVES,
        }
    }
}

/// Pseudo-states an element's style depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PseudoStateDependencies {
    /// States whose change could make a failed selector match.
    pub trigger: PseudoStates,
    /// States a successful match relied on.
    pub dependency: PseudoStates,
}

impl PseudoStateDependencies {
    /// Fold in one selector evaluation.
    pub fn record(&mut self, info: &MatchResultInfo) {
        self.trigger |= info.trigger_pseudo_mask;
        self.dependency |= info.dependency_pseudo_mask;
    }

    /// Whether going from `old` to `new` states can change the element's style.
    #[must_use]
    pub fn needs_restyle(&self, old: PseudoStates, new: PseudoStates) -> bool {
        (old ^ new).intersects(self.trigger | self.dependency)
    }
}

/// Output of [`StyleResolver::compute_styles`].
#[derive(Debug, Default)]
pub struct ResolvedStyles {
    /// Computed style of every element. Elements with identical inputs share one allocation.
    pub styles: HashMap<NodeId, Arc<ComputedStyle>>,
    /// Pseudo-states each element's matching evaluated.
    pub pseudo_dependencies: HashMap<NodeId, PseudoStateDependencies>,
}

impl ResolvedStyles {
    /// The style of `id`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ComputedStyle> {
        self.styles.get(&id).map(AsRef::as_ref)
    }

    /// Whether a state change on `id` requires restyling it.
    #[must_use]
    pub fn needs_restyle(&self, id: NodeId, old: PseudoStates, new: PseudoStates) -> bool {
        self.pseudo_dependencies
            .get(&id)
            .is_some_and(|d| d.needs_restyle(old, new))
    }
}

/// The result of styling one element, and what its children inherit.
#[derive(Debug, Clone)]
pub struct StyleScope<'a> {
    /// The computed style.
    pub style: Arc<ComputedStyle>,
    /// Variables visible to the element, starting with its parent's.
    pub variables: VariableContext<'a>,
}

/// Identity of a computed style's inputs.
///
/// Matched rules and the parent are compared exactly; the variable context
/// is compared by its combined hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StyleCacheKey {
    rules: Vec<(SheetId, usize)>,
    parent: Option<usize>,
    variables: u64,
}

impl StyleCacheKey {
    fn new(records: &[MatchRecord<'_>], parent: Option<&StyleScope<'_>>, variables: &VariableContext<'_>) -> Self {
        Self {
            rules: records
                .iter()
                .map(|r| (r.sheet.id(), r.complex_selector.rule_index()))
                .collect(),
            parent: parent.map(|p| Arc::as_ptr(&p.style).addr()),
            variables: variables.context_hash(),
        }
    }
}

/// Drives style passes and owns the caches they share.
///
/// The caches assume stylesheet content does not change between passes;
/// call [`reload`](Self::reload) after replacing any sheet's content.
pub struct StyleResolver {
    options: ResolverOptions,
    loader: Box<dyn ResourceLoader>,
    property_ids: PropertyIdCache,
    style_cache: HashMap<StyleCacheKey, Arc<ComputedStyle>>,
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::new(ResolverOptions::default(), Box::new(NullResourceLoader))
    }
}

impl StyleResolver {
    /// A resolver loading resources through `loader`.
    #[must_use]
    pub fn new(options: ResolverOptions, loader: Box<dyn ResourceLoader>) -> Self {
        Self {
            options,
            loader,
            property_ids: PropertyIdCache::new(),
            style_cache: HashMap::new(),
        }
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// The property-id cache.
    pub fn property_ids(&mut self) -> &mut PropertyIdCache {
        &mut self.property_ids
    }

    /// Number of distinct computed styles cached.
    #[must_use]
    pub fn cached_style_count(&self) -> usize {
        self.style_cache.len()
    }

    /// Drop every cache and forget reported warnings.
    pub fn reload(&mut self) {
        self.property_ids.clear();
        self.style_cache.clear();
        clear_warnings();
        tracing::debug!("style caches cleared");
    }

    /// Style one element.
    ///
    /// `stack` holds the sheets in effect, `depth` is the element's depth
    /// and `parent` the parent's scope (`None` at the root). `on_match`
    /// receives every selector evaluation made while matching.
    pub fn resolve_element<'a, E, F>(
        &mut self,
        element: E,
        stack: &StyleSheetStack<'a>,
        depth: usize,
        parent: Option<&StyleScope<'a>>,
        mut on_match: F,
    ) -> StyleScope<'a>
    where
        E: QueryElement,
        F: FnMut(E, MatchResultInfo),
    {
        let records = find_matches(element, stack, depth, &mut on_match);

        let mut variables = VariableContext::new();
        if let Some(parent) = parent {
            variables.add_initial_range(&parent.variables);
        }
        for record in &records {
            let Some(rule) = record.rule() else {
                continue;
            };
            if rule.custom_properties_count == 0 {
                continue;
            }
            for property in rule.properties.iter().filter(|p| p.is_custom_property()) {
                variables.add(Variable::from_property(record.sheet, property));
            }
        }

        let key = StyleCacheKey::new(&records, parent, &variables);
        if let Some(style) = self.style_cache.get(&key) {
            return StyleScope {
                style: Arc::clone(style),
                variables,
            };
        }

        let parent_style = parent.map(|p| p.style.as_ref());
        let mut style = parent_style.map_or_else(ComputedStyle::default, ComputedStyle::inherit_from);
        let mut reader = StylePropertyReader::new(
            &records,
            &variables,
            &mut self.property_ids,
            self.loader.as_ref(),
            &self.options,
        );
        style.apply_properties(&mut reader, parent_style);

        let style = Arc::new(style);
        let _ = self.style_cache.insert(key, Arc::clone(&style));
        StyleScope { style, variables }
    }

    /// Style every element of `tree`.
    ///
    /// Sheets in `attachments` apply to the element they are attached to and
    /// its descendants.
    pub fn compute_styles(&mut self, tree: &ElementTree, attachments: &SheetAttachments) -> ResolvedStyles {
        let mut resolved = ResolvedStyles::default();
        let mut stack = StyleSheetStack::new();
        self.compute_node(tree, tree.root(), 0, attachments, &mut stack, None, &mut resolved);
        tracing::debug!(
            elements = resolved.styles.len(),
            cached_styles = self.style_cache.len(),
            "style pass complete"
        );
        resolved
    }

    #[allow(clippy::too_many_arguments)]
    fn compute_node<'a>(
        &mut self,
        tree: &ElementTree,
        id: NodeId,
        depth: usize,
        attachments: &'a SheetAttachments,
        stack: &mut StyleSheetStack<'a>,
        parent: Option<&StyleScope<'a>>,
        out: &mut ResolvedStyles,
    ) {
        let Some(element) = tree.element_ref(id) else {
            tracing::error!(?id, "node missing from tree");
            return;
        };
        if let Some(sheets) = attachments.get(&id) {
            for sheet in sheets {
                stack.push(sheet, depth);
            }
        }

        let dependencies = &mut out.pseudo_dependencies;
        let scope = self.resolve_element(element, stack, depth, parent, |e: ElementRef<'_>, info| {
            dependencies.entry(e.id()).or_default().record(&info);
        });
        let _ = out.styles.insert(id, Arc::clone(&scope.style));

        for &child in tree.children(id) {
            self.compute_node(tree, child, depth + 1, attachments, stack, Some(&scope), out);
        }
        stack.pop_depth(depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::StyleSheetBuilder;

    fn records(sheet: &StyleSheet) -> Vec<MatchRecord<'_>> {
        sheet
            .complex_selectors()
            .iter()
            .map(|complex_selector| MatchRecord {
                sheet,
                stack_index: 0,
                complex_selector,
            })
            .collect()
    }

    #[test]
    fn test_cache_key_compares_matched_rules() {
        let sheet = StyleSheetBuilder::new()
            .rule("Label")
            .property("width")
            .px(1.0)
            .rule(".wide")
            .property("width")
            .px(2.0)
            .build()
            .unwrap();
        let all = records(&sheet);
        let variables = VariableContext::new();

        let both = StyleCacheKey::new(&all, None, &variables);
        let first = StyleCacheKey::new(&all[..1], None, &variables);
        let second = StyleCacheKey::new(&all[1..], None, &variables);
        assert_eq!(both, StyleCacheKey::new(&all, None, &variables));
        assert_ne!(first, second);
        assert_eq!(first.rules, vec![(sheet.id(), 0)]);

        let mut cache = HashMap::new();
        let _ = cache.insert(first.clone(), Arc::new(ComputedStyle::default()));
        assert!(cache.contains_key(&first));
        assert!(!cache.contains_key(&second));
    }
}
