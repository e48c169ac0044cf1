//! Custom properties and `var()` resolution.
//!
//! Custom properties (`--name: ...`) declared by the rules matching an element
//! are collected into a [`VariableContext`] that starts as a copy of the
//! parent element's context. Properties flagged as containing `var()` are
//! then expanded by a [`VariableResolver`]:
//!
//! - The most recently added variable with a name wins.
//! - A variable already being expanded is treated as not found, which breaks
//!   reference cycles such as `--x: var(--x)`.
//! - A fallback is used only when the variable is not found. A variable that
//!   exists but expands to values the property rejects makes the whole
//!   property invalid.
//! - Expansion stops after a fixed number of appended tokens.

use std::hash::{DefaultHasher, Hash, Hasher};

use weft_common::warning::warn_once;

use crate::grammar::ValueGrammar;
use crate::properties::StylePropertyId;
use crate::sheet::{StyleProperty, StylePropertyValue, StyleSheet, StyleValueHandle, StyleValueType};

/// Default cap on tokens appended while resolving one property.
pub const DEFAULT_MAX_RESOLVES: usize = 100;

/// A custom property declaration: its name, declaring sheet and raw values.
#[derive(Debug, Clone, Copy)]
pub struct Variable<'a> {
    name: &'a str,
    sheet: &'a StyleSheet,
    handles: &'a [StyleValueHandle],
    hash: u64,
}

impl<'a> Variable<'a> {
    /// Wrap a declaration.
    #[must_use]
    pub fn new(name: &'a str, sheet: &'a StyleSheet, handles: &'a [StyleValueHandle]) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        sheet.id().hash(&mut hasher);
        handles.hash(&mut hasher);
        Self {
            name,
            sheet,
            handles,
            hash: hasher.finish(),
        }
    }

    /// Wrap a custom property declared in `sheet`.
    #[must_use]
    pub fn from_property(sheet: &'a StyleSheet, property: &'a StyleProperty) -> Self {
        Self::new(&property.name, sheet, &property.values)
    }

    /// The `--name`.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// The declaring sheet.
    #[must_use]
    pub const fn sheet(&self) -> &'a StyleSheet {
        self.sheet
    }

    /// Unresolved value handles.
    #[must_use]
    pub const fn handles(&self) -> &'a [StyleValueHandle] {
        self.handles
    }

    /// Hash of name, sheet and handles.
    #[must_use]
    pub const fn hash(&self) -> u64 {
        self.hash
    }
}

/// The variables visible to one element.
///
/// Identical declarations (same hash) are stored once. The combined hash
/// changes with every addition and identifies the context for caching.
#[derive(Debug, Clone, Default)]
pub struct VariableContext<'a> {
    variables: Vec<Variable<'a>>,
    sorted_hashes: Vec<u64>,
    hash: u64,
}

impl<'a> VariableContext<'a> {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable unless an identical one is present.
    pub fn add(&mut self, variable: Variable<'a>) {
        let Err(position) = self.sorted_hashes.binary_search(&variable.hash) else {
            return;
        };
        self.sorted_hashes.insert(position, variable.hash);
        self.variables.push(variable);
        self.hash = self.hash.wrapping_mul(397) ^ variable.hash;
    }

    /// Seed this context with the content of `other`.
    ///
    /// # Panics
    ///
    /// Panics if this context is not empty.
    pub fn add_initial_range(&mut self, other: &Self) {
        assert!(
            self.variables.is_empty(),
            "add_initial_range requires an empty variable context"
        );
        self.variables.clone_from(&other.variables);
        self.sorted_hashes.clone_from(&other.sorted_hashes);
        self.hash = other.hash;
    }

    /// The most recently added variable called `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Variable<'a>> {
        self.variables.iter().rev().find(|v| v.name == name)
    }

    /// Combined hash of every added variable.
    #[must_use]
    pub const fn context_hash(&self) -> u64 {
        self.hash
    }

    /// Variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable<'a>> {
        self.variables.iter()
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// `true` if there are no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.variables.clear();
        self.sorted_hashes.clear();
        self.hash = 0;
    }
}

/// Outcome of resolving a `var()` call or a whole property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveResult {
    /// Values were appended.
    Valid,
    /// The variable exists but its values are rejected, or the token cap was hit.
    Invalid,
    /// The variable does not exist or is part of a cycle, and there is no fallback.
    NotFound,
}

/// Expands `var()` calls in the values of one property at a time.
pub struct VariableResolver<'a, 'c> {
    context: &'c VariableContext<'a>,
    grammar: Option<ValueGrammar>,
    resolved: Vec<StylePropertyValue<'a>>,
    in_flight: Vec<String>,
    resolve_count: usize,
    max_resolves: usize,
}

impl<'a, 'c> VariableResolver<'a, 'c> {
    /// A resolver reading variables from `context`.
    #[must_use]
    pub const fn new(context: &'c VariableContext<'a>, max_resolves: usize) -> Self {
        Self {
            context,
            grammar: None,
            resolved: Vec::new(),
            in_flight: Vec::new(),
            resolve_count: 0,
            max_resolves,
        }
    }

    /// Start resolving the property `name`, discarding previous results.
    ///
    /// Custom properties have no grammar, so their tokens are never rejected.
    pub fn init(&mut self, name: &str) {
        self.grammar = StylePropertyId::from_name(name).grammar();
        self.resolved.clear();
        self.in_flight.clear();
        self.resolve_count = 0;
    }

    /// Append a literal value.
    pub fn add_value(&mut self, sheet: &'a StyleSheet, handle: StyleValueHandle) {
        self.resolved.push(StylePropertyValue::new(sheet, handle));
    }

    /// Expand the `var()` call starting at `tokens[*index]`.
    ///
    /// On return `*index` points at the last token of the call.
    pub fn resolve_var_function(
        &mut self,
        sheet: &'a StyleSheet,
        tokens: &'a [StyleValueHandle],
        index: &mut usize,
    ) -> ResolveResult {
        self.in_flight.clear();
        self.resolve_var_call(sheet, tokens, index)
    }

    fn resolve_var_call(
        &mut self,
        sheet: &'a StyleSheet,
        tokens: &'a [StyleValueHandle],
        index: &mut usize,
    ) -> ResolveResult {
        let start = *index;
        let (Some(&count), Some(&name)) = (tokens.get(start + 1), tokens.get(start + 2)) else {
            warn_once("Style", "malformed var() call");
            *index = tokens.len().saturating_sub(1);
            return ResolveResult::Invalid;
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let argc = sheet.values().read_float(count).max(0.0) as usize;
        let end = (start + 1 + argc).min(tokens.len() - 1);
        *index = end;

        let name = sheet.values().read_variable(name);
        let mark = self.resolved.len();
        let result = self.resolve_variable(name);
        if result != ResolveResult::NotFound {
            return result;
        }

        self.resolved.truncate(mark);
        if argc > 1 {
            // tokens[start + 3] is the separator
            return self.append_tokens(sheet, tokens, start + 4, end + 1);
        }
        tracing::debug!(variable = name, "variable not found");
        ResolveResult::NotFound
    }

    fn resolve_variable(&mut self, name: &'a str) -> ResolveResult {
        let Some(variable) = self.context.find(name).copied() else {
            return ResolveResult::NotFound;
        };
        if self.in_flight.iter().any(|n| n == name) {
            warn_once("Style", &format!("variable '{name}' refers to itself"));
            return ResolveResult::NotFound;
        }
        self.in_flight.push(name.to_owned());
        let result = self.append_tokens(variable.sheet, variable.handles, 0, variable.handles.len());
        let _ = self.in_flight.pop();
        result
    }

    /// Append `tokens[start..end]`, expanding nested `var()` calls and
    /// validating each appended token.
    fn append_tokens(
        &mut self,
        sheet: &'a StyleSheet,
        tokens: &'a [StyleValueHandle],
        start: usize,
        end: usize,
    ) -> ResolveResult {
        let mut i = start;
        while i < end {
            let handle = tokens[i];
            if handle.is_var_function() {
                let result = self.resolve_var_call(sheet, tokens, &mut i);
                if result != ResolveResult::Valid {
                    return result;
                }
            } else {
                if self.resolve_count >= self.max_resolves {
                    warn_once(
                        "Style",
                        &format!("variable expansion exceeded {} tokens", self.max_resolves),
                    );
                    return ResolveResult::Invalid;
                }
                self.resolve_count += 1;
                if let Some(grammar) = &self.grammar
                    && !grammar.accepts(sheet.values(), handle)
                {
                    return ResolveResult::Invalid;
                }
                self.add_value(sheet, handle);
            }
            i += 1;
        }
        ResolveResult::Valid
    }

    /// Check the resolved list against the property's arity and tokens.
    #[must_use]
    pub fn validate_resolved_values(&self) -> bool {
        let Some(grammar) = &self.grammar else {
            return true;
        };
        let count = self
            .resolved
            .iter()
            .filter(|v| v.handle.value_type != StyleValueType::CommaSeparator)
            .count();
        grammar.accepts_count(count)
            && self
                .resolved
                .iter()
                .all(|v| grammar.accepts(v.sheet.values(), v.handle))
    }

    /// Resolve every value of `property`, declared in `sheet`.
    pub fn resolve_property(&mut self, sheet: &'a StyleSheet, property: &'a StyleProperty) -> ResolveResult {
        self.init(&property.name);
        let tokens = property.values.as_slice();
        let mut i = 0;
        while i < tokens.len() {
            if tokens[i].is_var_function() {
                let result = self.resolve_var_function(sheet, tokens, &mut i);
                if result != ResolveResult::Valid {
                    return result;
                }
            } else {
                self.add_value(sheet, tokens[i]);
            }
            i += 1;
        }
        if self.validate_resolved_values() {
            ResolveResult::Valid
        } else {
            ResolveResult::Invalid
        }
    }

    /// Values resolved so far.
    #[must_use]
    pub fn resolved_values(&self) -> &[StylePropertyValue<'a>] {
        &self.resolved
    }

    /// Take the resolved values, leaving the resolver empty.
    pub fn take_resolved_values(&mut self) -> Vec<StylePropertyValue<'a>> {
        std::mem::take(&mut self.resolved)
    }
}
