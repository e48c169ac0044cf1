//! Value grammars: which tokens a property accepts, and how many.
//!
//! Grammars are checked token by token while `var()` expansions are appended
//! and once more on the full resolved list. They are deliberately coarse: a
//! token is accepted when its kind is allowed, and a count when it lies in
//! `min_values..=max_values`.

use bitflags::bitflags;

use crate::sheet::{DimensionUnit, StyleValueHandle, StyleValueKeyword, StyleValueType, ValueStore};
use crate::style::Color;

bitflags! {
    /// Token kinds a grammar accepts.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ValueKinds: u16 {
        /// `px` dimensions and a bare `0`.
        const LENGTH   = 1 << 0;
        /// `%` dimensions.
        const PERCENT  = 1 << 1;
        /// Any number.
        const NUMBER   = 1 << 2;
        /// Whole numbers.
        const INTEGER  = 1 << 3;
        /// Color literals and named colors.
        const COLOR    = 1 << 4;
        /// Resource paths, asset references and scalable images.
        const RESOURCE = 1 << 5;
        /// Identifiers listed in the grammar's keywords.
        const KEYWORD  = 1 << 6;
    }
}

/// Accepted tokens and arity of one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueGrammar {
    /// Accepted token kinds.
    pub kinds: ValueKinds,
    /// Accepted identifiers, including `auto`/`none` where allowed.
    pub keywords: &'static [&'static str],
    /// Fewest tokens.
    pub min_values: usize,
    /// Most tokens.
    pub max_values: usize,
}

impl ValueGrammar {
    /// A single-token grammar.
    #[must_use]
    pub const fn single(kinds: ValueKinds, keywords: &'static [&'static str]) -> Self {
        Self::repeated(kinds, keywords, 1, 1)
    }

    /// A grammar accepting `min..=max` tokens.
    #[must_use]
    pub const fn repeated(
        kinds: ValueKinds,
        keywords: &'static [&'static str],
        min_values: usize,
        max_values: usize,
    ) -> Self {
        Self {
            kinds,
            keywords,
            min_values,
            max_values,
        }
    }

    fn accepts_keyword(&self, name: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(name))
    }

    /// Whether a single token is acceptable.
    #[must_use]
    pub fn accepts(&self, values: &ValueStore, handle: StyleValueHandle) -> bool {
        match handle.value_type {
            StyleValueType::Keyword => match values.read_keyword(handle) {
                StyleValueKeyword::Initial | StyleValueKeyword::Inherit | StyleValueKeyword::Unset => {
                    true
                }
                keyword => self.accepts_keyword(keyword.as_str()),
            },
            // a bare number is read as pixels wherever a length is accepted
            StyleValueType::Float => {
                let value = values.read_float(handle);
                self.kinds.intersects(ValueKinds::NUMBER | ValueKinds::LENGTH)
                    || (self.kinds.contains(ValueKinds::INTEGER) && value.fract().abs() < f32::EPSILON)
            }
            StyleValueType::Dimension => match values.read_dimension(handle).unit {
                DimensionUnit::Pixel => self.kinds.contains(ValueKinds::LENGTH),
                DimensionUnit::Percent => self.kinds.contains(ValueKinds::PERCENT),
                DimensionUnit::Unitless => self.kinds.contains(ValueKinds::NUMBER),
            },
            StyleValueType::Color => self.kinds.contains(ValueKinds::COLOR),
            StyleValueType::Enum | StyleValueType::String => {
                let text = values.read_as_string(handle);
                (self.kinds.contains(ValueKinds::KEYWORD) && self.accepts_keyword(&text))
                    || (self.kinds.contains(ValueKinds::COLOR) && Color::from_named(&text).is_some())
            }
            StyleValueType::ResourcePath
            | StyleValueType::AssetReference
            | StyleValueType::MissingAssetReference
            | StyleValueType::ScalableImage => self.kinds.contains(ValueKinds::RESOURCE),
            StyleValueType::Variable | StyleValueType::Function | StyleValueType::CommaSeparator => {
                false
            }
        }
    }

    /// Whether `count` tokens is an acceptable arity.
    #[must_use]
    pub const fn accepts_count(&self, count: usize) -> bool {
        count >= self.min_values && count <= self.max_values
    }
}
