//! Stylesheets: rules, selectors, values and imports.

mod builder;
mod values;

use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::selector::{SelectorIndex, StyleComplexSelector, StyleSelectorPart};

pub use builder::StyleSheetBuilder;
pub use values::{
    Dimension, DimensionUnit, ScalableImage, StyleValueFunction, StyleValueHandle,
    StyleValueKeyword, StyleValueType, ValueStore,
};

/// Prefix of custom property names.
pub const CUSTOM_PROPERTY_PREFIX: &str = "--";

static NEXT_SHEET_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a stylesheet.
///
/// The id survives content replacement, so caches keyed by it must be
/// cleared when a sheet is reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetId(u64);

impl SheetId {
    fn next() -> Self {
        Self(NEXT_SHEET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One declaration: a property name and its value handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleProperty {
    /// Property name as written, including the `--` of custom properties.
    pub name: String,
    /// Source line.
    pub line: u32,
    /// Value handles into the owning sheet's [`ValueStore`].
    pub values: Vec<StyleValueHandle>,
    /// Set when the values contain a `var()` call.
    pub requires_variable_resolution: bool,
}

impl StyleProperty {
    /// `true` for `--name` declarations.
    #[must_use]
    pub fn is_custom_property(&self) -> bool {
        self.name.starts_with(CUSTOM_PROPERTY_PREFIX)
    }
}

/// A rule body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StyleRule {
    /// Declarations in source order.
    pub properties: Vec<StyleProperty>,
    /// Source line.
    pub line: u32,
    /// Number of custom property declarations, maintained by the sheet.
    pub custom_properties_count: usize,
}

/// A value handle together with the sheet whose store it indexes.
///
/// Values produced by `var()` expansion come from the sheet declaring the
/// variable, which may differ from the sheet declaring the property.
#[derive(Debug, Clone, Copy)]
pub struct StylePropertyValue<'a> {
    /// Sheet owning the value.
    pub sheet: &'a StyleSheet,
    /// The value.
    pub handle: StyleValueHandle,
}

impl<'a> StylePropertyValue<'a> {
    /// Pair a handle with its sheet.
    #[must_use]
    pub const fn new(sheet: &'a StyleSheet, handle: StyleValueHandle) -> Self {
        Self { sheet, handle }
    }
}

/// A stylesheet.
///
/// Rules and selectors are only replaced as a whole through
/// [`set_content`](Self::set_content), which rebuilds the selector index and
/// the content hash.
#[derive(Debug)]
pub struct StyleSheet {
    id: SheetId,
    rules: Vec<StyleRule>,
    complex_selectors: Vec<StyleComplexSelector>,
    values: ValueStore,
    imports: Vec<Arc<StyleSheet>>,
    is_default_style_sheet: bool,
    content_hash: u64,
    index: SelectorIndex,
}

impl StyleSheet {
    /// Create a sheet from its parts.
    #[must_use]
    pub fn new(
        rules: Vec<StyleRule>,
        complex_selectors: Vec<StyleComplexSelector>,
        values: ValueStore,
    ) -> Self {
        let mut sheet = Self {
            id: SheetId::next(),
            rules: Vec::new(),
            complex_selectors: Vec::new(),
            values,
            imports: Vec::new(),
            is_default_style_sheet: false,
            content_hash: 0,
            index: SelectorIndex::default(),
        };
        sheet.set_content(rules, complex_selectors);
        sheet
    }

    /// An empty sheet.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), ValueStore::default())
    }

    /// Replace rules and selectors.
    ///
    /// Selectors whose rule index is out of range are dropped with an error
    /// log. Selector order in the sheet is reassigned from list position.
    pub fn set_content(&mut self, mut rules: Vec<StyleRule>, complex_selectors: Vec<StyleComplexSelector>) {
        for rule in &mut rules {
            rule.custom_properties_count = rule
                .properties
                .iter()
                .filter(|p| p.is_custom_property())
                .count();
        }
        let rule_count = rules.len();
        self.complex_selectors = complex_selectors
            .into_iter()
            .filter(|s| {
                let valid = s.rule_index < rule_count;
                if !valid {
                    tracing::error!(rule_index = s.rule_index, rule_count, "selector refers to a missing rule");
                }
                valid
            })
            .enumerate()
            .map(|(order, mut s)| {
                s.order_in_style_sheet = order;
                s
            })
            .collect();
        self.rules = rules;
        self.index = SelectorIndex::build(&self.complex_selectors);
        self.content_hash = self.compute_content_hash();
        tracing::debug!(
            sheet = ?self.id,
            rules = self.rules.len(),
            selectors = self.complex_selectors.len(),
            "stylesheet content set"
        );
    }

    /// Replace everything but the identity with the content of `source`.
    ///
    /// Returns `true` if the content hash changed. Caches keyed by this
    /// sheet's id hold stale entries until cleared, so a `true` result means
    /// the owning [`StyleResolver`](crate::StyleResolver) needs a
    /// [`reload`](crate::StyleResolver::reload).
    pub fn replace_content(&mut self, source: Self) -> bool {
        let previous = self.content_hash;
        self.values = source.values;
        self.imports = source.imports;
        self.is_default_style_sheet = source.is_default_style_sheet;
        self.set_content(source.rules, source.complex_selectors);
        self.content_hash != previous
    }

    fn compute_content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.rules.hash(&mut hasher);
        for complex in &self.complex_selectors {
            complex.rule_index.hash(&mut hasher);
            for selector in complex.selectors() {
                selector.previous_relationship().hash(&mut hasher);
                for part in selector.parts() {
                    match part {
                        StyleSelectorPart::Wildcard => "*".hash(&mut hasher),
                        StyleSelectorPart::Type(s) => ("t", s).hash(&mut hasher),
                        StyleSelectorPart::Class(s) => (".", s).hash(&mut hasher),
                        StyleSelectorPart::Id(s) => ("#", s).hash(&mut hasher),
                        StyleSelectorPart::PseudoClass(s) => (":", s).hash(&mut hasher),
                        StyleSelectorPart::Predicate(_) => "?".hash(&mut hasher),
                    }
                }
            }
        }
        self.values.hash_into(&mut hasher);
        self.is_default_style_sheet.hash(&mut hasher);
        hasher.finish()
    }

    /// Process-unique identity.
    #[must_use]
    pub const fn id(&self) -> SheetId {
        self.id
    }

    /// Rules in source order.
    #[must_use]
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Selectors in source order.
    #[must_use]
    pub fn complex_selectors(&self) -> &[StyleComplexSelector] {
        &self.complex_selectors
    }

    /// The selector index.
    #[must_use]
    pub const fn index(&self) -> &SelectorIndex {
        &self.index
    }

    /// Value storage.
    #[must_use]
    pub const fn values(&self) -> &ValueStore {
        &self.values
    }

    /// Hash of rules, selectors and values.
    #[must_use]
    pub const fn content_hash(&self) -> u64 {
        self.content_hash
    }

    /// Whether this is a base (platform) sheet.
    #[must_use]
    pub const fn is_default_style_sheet(&self) -> bool {
        self.is_default_style_sheet
    }

    /// Mark this sheet as a base sheet. Base sheets lose to every other sheet.
    pub fn set_default_style_sheet(&mut self, is_default: bool) {
        self.is_default_style_sheet = is_default;
        self.content_hash = self.compute_content_hash();
    }

    /// Direct imports.
    #[must_use]
    pub fn imports(&self) -> &[Arc<Self>] {
        &self.imports
    }

    /// Replace direct imports.
    pub fn set_imports(&mut self, imports: Vec<Arc<Self>>) {
        self.imports = imports;
    }

    /// All imports, depth first, each import after its own imports.
    ///
    /// A sheet reachable through several paths appears once, at its first
    /// position.
    #[must_use]
    pub fn flattened_recursive_imports(&self) -> Vec<&Self> {
        fn visit<'a>(sheet: &'a StyleSheet, seen: &mut HashSet<SheetId>, out: &mut Vec<&'a StyleSheet>) {
            for import in &sheet.imports {
                if !seen.insert(import.id) {
                    continue;
                }
                visit(import, seen, out);
                out.push(import);
            }
        }

        let mut seen = HashSet::from([self.id]);
        let mut out = Vec::new();
        visit(self, &mut seen, &mut out);
        out
    }
}
