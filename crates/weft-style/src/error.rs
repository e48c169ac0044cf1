//! Errors raised while building stylesheets.
//!
//! Problems found while *resolving* styles are never errors: they are logged
//! once and the affected value falls back to a default.

use thiserror::Error;

/// Error building a [`StyleSheet`](crate::StyleSheet).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleSheetError {
    /// Selector text could not be parsed.
    #[error("invalid selector '{selector}' at {position}: {reason}")]
    InvalidSelector {
        /// The full selector text.
        selector: String,
        /// Byte offset of the problem.
        position: usize,
        /// What was wrong.
        reason: String,
    },

    /// A value was added while no property was open.
    #[error("value added outside of a property declaration")]
    ValueOutsideProperty,

    /// A property was declared while no rule was open.
    #[error("property '{name}' declared outside of a rule")]
    PropertyOutsideRule {
        /// The property name.
        name: String,
    },

    /// `var()` was given a name that is not a custom property.
    #[error("'{name}' is not a custom property name")]
    InvalidVariableName {
        /// The offending name.
        name: String,
    },

    /// A property or rule ended with a `var()` call still open.
    #[error("unclosed var() in property '{property}'")]
    UnclosedVarFunction {
        /// The property containing the call.
        property: String,
    },

    /// `end_var` was called with no open `var()`.
    #[error("end_var() without a matching var()")]
    UnbalancedVarFunction,
}
