//! Property identifiers, per-property metadata and the property-id cache.

use std::collections::HashMap;
use std::sync::Arc;

use strum::VariantNames;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

use crate::grammar::{ValueGrammar, ValueKinds};
use crate::sheet::{CUSTOM_PROPERTY_PREFIX, SheetId, StyleSheet};
use crate::style::{
    Align, CursorKind, DisplayStyle, FlexDirection, FontStyle, Justify, Overflow, Position,
    ScaleMode, TextAnchor, Visibility, WhiteSpace, Wrap,
};

/// Every property the engine understands.
///
/// Names parse from their stylesheet spelling. Names starting with `--` map
/// to [`Custom`](Self::Custom); anything else unrecognised to
/// [`Unknown`](Self::Unknown).
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum StylePropertyId {
    // Colors
    Color,
    BackgroundColor,
    BorderTopColor,
    BorderRightColor,
    BorderBottomColor,
    BorderLeftColor,
    #[strum(serialize = "-unity-background-image-tint-color")]
    UnityBackgroundImageTintColor,
    #[strum(serialize = "-unity-text-outline-color")]
    UnityTextOutlineColor,

    // Lengths
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    Left,
    Top,
    Right,
    Bottom,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    FlexBasis,
    FontSize,
    LetterSpacing,
    BorderTopLeftRadius,
    BorderTopRightRadius,
    BorderBottomRightRadius,
    BorderBottomLeftRadius,

    // Numbers
    Opacity,
    FlexGrow,
    FlexShrink,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    #[strum(serialize = "-unity-text-outline-width")]
    UnityTextOutlineWidth,
    #[strum(serialize = "-unity-slice-scale")]
    UnitySliceScale,
    #[strum(serialize = "-unity-slice-left")]
    UnitySliceLeft,
    #[strum(serialize = "-unity-slice-top")]
    UnitySliceTop,
    #[strum(serialize = "-unity-slice-right")]
    UnitySliceRight,
    #[strum(serialize = "-unity-slice-bottom")]
    UnitySliceBottom,

    // Keywords
    Display,
    Position,
    FlexDirection,
    FlexWrap,
    AlignItems,
    AlignSelf,
    AlignContent,
    JustifyContent,
    Overflow,
    Visibility,
    WhiteSpace,
    #[strum(serialize = "-unity-font-style")]
    UnityFontStyle,
    #[strum(serialize = "-unity-text-align")]
    UnityTextAlign,
    #[strum(serialize = "-unity-background-scale-mode")]
    UnityBackgroundScaleMode,

    // Resources
    #[strum(serialize = "-unity-font")]
    UnityFont,
    Cursor,
    BackgroundImage,

    // Shorthands
    Margin,
    Padding,
    BorderWidth,
    BorderColor,
    BorderRadius,
    Flex,
    #[strum(serialize = "-unity-text-outline")]
    UnityTextOutline,

    /// A `--name` declaration.
    #[strum(disabled)]
    Custom,
    /// A name this engine does not know.
    #[strum(disabled)]
    Unknown,
}

const COLOR: ValueGrammar = ValueGrammar::single(ValueKinds::COLOR, &[]);
const LENGTH: ValueGrammar =
    ValueGrammar::single(ValueKinds::LENGTH.union(ValueKinds::PERCENT), &[]);
const LENGTH_AUTO: ValueGrammar =
    ValueGrammar::single(ValueKinds::LENGTH.union(ValueKinds::PERCENT), &["auto"]);
const LENGTH_NONE: ValueGrammar =
    ValueGrammar::single(ValueKinds::LENGTH.union(ValueKinds::PERCENT), &["none"]);
const NUMBER: ValueGrammar = ValueGrammar::single(ValueKinds::NUMBER, &[]);
const WIDTH: ValueGrammar = ValueGrammar::single(ValueKinds::NUMBER.union(ValueKinds::LENGTH), &[]);
const INTEGER: ValueGrammar = ValueGrammar::single(ValueKinds::INTEGER, &[]);
const FONT: ValueGrammar = ValueGrammar::single(ValueKinds::RESOURCE, &[]);
const IMAGE: ValueGrammar = ValueGrammar::single(ValueKinds::RESOURCE, &["none"]);
const CURSOR: ValueGrammar = ValueGrammar::repeated(
    ValueKinds::RESOURCE.union(ValueKinds::NUMBER).union(ValueKinds::KEYWORD),
    CursorKind::VARIANTS,
    1,
    3,
);

const fn keywords(names: &'static [&'static str]) -> ValueGrammar {
    ValueGrammar::single(ValueKinds::KEYWORD, names)
}

const fn box_of(grammar: ValueGrammar) -> ValueGrammar {
    ValueGrammar::repeated(grammar.kinds, grammar.keywords, 1, 4)
}

impl StylePropertyId {
    /// Map a declared name to its id.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.starts_with(CUSTOM_PROPERTY_PREFIX) {
            return Self::Custom;
        }
        name.parse().unwrap_or(Self::Unknown)
    }

    /// Stylesheet spelling.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Whether the property inherits from the parent when not declared.
    #[must_use]
    pub const fn is_inherited(self) -> bool {
        matches!(
            self,
            Self::Color
                | Self::FontSize
                | Self::LetterSpacing
                | Self::Visibility
                | Self::WhiteSpace
                | Self::UnityFont
                | Self::UnityFontStyle
                | Self::UnityTextAlign
                | Self::UnityTextOutlineColor
                | Self::UnityTextOutlineWidth
                | Self::UnityTextOutline
        )
    }

    /// Longhands set by a shorthand, empty for longhands.
    #[must_use]
    pub const fn longhands(self) -> &'static [Self] {
        match self {
            Self::Margin => &[
                Self::MarginTop,
                Self::MarginRight,
                Self::MarginBottom,
                Self::MarginLeft,
            ],
            Self::Padding => &[
                Self::PaddingTop,
                Self::PaddingRight,
                Self::PaddingBottom,
                Self::PaddingLeft,
            ],
            Self::BorderWidth => &[
                Self::BorderTopWidth,
                Self::BorderRightWidth,
                Self::BorderBottomWidth,
                Self::BorderLeftWidth,
            ],
            Self::BorderColor => &[
                Self::BorderTopColor,
                Self::BorderRightColor,
                Self::BorderBottomColor,
                Self::BorderLeftColor,
            ],
            Self::BorderRadius => &[
                Self::BorderTopLeftRadius,
                Self::BorderTopRightRadius,
                Self::BorderBottomRightRadius,
                Self::BorderBottomLeftRadius,
            ],
            Self::Flex => &[Self::FlexGrow, Self::FlexShrink, Self::FlexBasis],
            Self::UnityTextOutline => &[Self::UnityTextOutlineWidth, Self::UnityTextOutlineColor],
            _ => &[],
        }
    }

    /// Whether this is a shorthand.
    #[must_use]
    pub const fn is_shorthand(self) -> bool {
        !self.longhands().is_empty()
    }

    /// The value grammar, `None` for custom and unknown properties.
    #[must_use]
    pub const fn grammar(self) -> Option<ValueGrammar> {
        let grammar = match self {
            Self::Color
            | Self::BackgroundColor
            | Self::BorderTopColor
            | Self::BorderRightColor
            | Self::BorderBottomColor
            | Self::BorderLeftColor
            | Self::UnityBackgroundImageTintColor
            | Self::UnityTextOutlineColor => COLOR,

            Self::Width
            | Self::Height
            | Self::MinWidth
            | Self::MinHeight
            | Self::Left
            | Self::Top
            | Self::Right
            | Self::Bottom
            | Self::MarginTop
            | Self::MarginRight
            | Self::MarginBottom
            | Self::MarginLeft
            | Self::FlexBasis => LENGTH_AUTO,
            Self::MaxWidth | Self::MaxHeight => LENGTH_NONE,
            Self::PaddingTop
            | Self::PaddingRight
            | Self::PaddingBottom
            | Self::PaddingLeft
            | Self::FontSize
            | Self::LetterSpacing
            | Self::BorderTopLeftRadius
            | Self::BorderTopRightRadius
            | Self::BorderBottomRightRadius
            | Self::BorderBottomLeftRadius => LENGTH,

            Self::Opacity | Self::FlexGrow | Self::FlexShrink | Self::UnitySliceScale => NUMBER,
            Self::BorderTopWidth
            | Self::BorderRightWidth
            | Self::BorderBottomWidth
            | Self::BorderLeftWidth
            | Self::UnityTextOutlineWidth => WIDTH,
            Self::UnitySliceLeft
            | Self::UnitySliceTop
            | Self::UnitySliceRight
            | Self::UnitySliceBottom => INTEGER,

            Self::Display => keywords(DisplayStyle::VARIANTS),
            Self::Position => keywords(Position::VARIANTS),
            Self::FlexDirection => keywords(FlexDirection::VARIANTS),
            Self::FlexWrap => keywords(Wrap::VARIANTS),
            Self::AlignItems | Self::AlignSelf | Self::AlignContent => keywords(Align::VARIANTS),
            Self::JustifyContent => keywords(Justify::VARIANTS),
            Self::Overflow => keywords(Overflow::VARIANTS),
            Self::Visibility => keywords(Visibility::VARIANTS),
            Self::WhiteSpace => keywords(WhiteSpace::VARIANTS),
            Self::UnityFontStyle => keywords(FontStyle::VARIANTS),
            Self::UnityTextAlign => keywords(TextAnchor::VARIANTS),
            Self::UnityBackgroundScaleMode => keywords(ScaleMode::VARIANTS),

            Self::UnityFont => FONT,
            Self::BackgroundImage => IMAGE,
            Self::Cursor => CURSOR,

            Self::Margin => box_of(LENGTH_AUTO),
            Self::Padding => box_of(LENGTH),
            Self::BorderWidth => box_of(WIDTH),
            Self::BorderColor => box_of(COLOR),
            Self::BorderRadius => ValueGrammar::repeated(
                ValueKinds::LENGTH.union(ValueKinds::PERCENT),
                &["auto", "none"],
                1,
                4,
            ),
            Self::Flex => ValueGrammar::repeated(
                ValueKinds::NUMBER
                    .union(ValueKinds::LENGTH)
                    .union(ValueKinds::PERCENT),
                &["auto", "none"],
                1,
                3,
            ),
            Self::UnityTextOutline => ValueGrammar::repeated(
                ValueKinds::NUMBER
                    .union(ValueKinds::LENGTH)
                    .union(ValueKinds::COLOR),
                &[],
                1,
                2,
            ),

            Self::Custom | Self::Unknown => return None,
        };
        Some(grammar)
    }
}

/// Property ids of every rule seen so far, keyed by sheet and rule index.
///
/// Entries are never invalidated individually: call [`clear`](Self::clear)
/// whenever any sheet's content is replaced.
#[derive(Debug, Default)]
pub struct PropertyIdCache {
    entries: HashMap<(SheetId, usize), Arc<[StylePropertyId]>>,
}

impl PropertyIdCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The ids of the properties of `sheet.rules()[rule_index]`, in
    /// declaration order. Repeated lookups return the same allocation.
    ///
    /// An out-of-range rule index yields an empty list and is not cached.
    pub fn get_or_build(&mut self, sheet: &StyleSheet, rule_index: usize) -> Arc<[StylePropertyId]> {
        if let Some(ids) = self.entries.get(&(sheet.id(), rule_index)) {
            return Arc::clone(ids);
        }
        let Some(rule) = sheet.rules().get(rule_index) else {
            tracing::error!(rule_index, "property ids requested for a missing rule");
            return Arc::from(Vec::new());
        };
        let ids: Arc<[StylePropertyId]> = rule
            .properties
            .iter()
            .map(|p| StylePropertyId::from_name(&p.name))
            .collect();
        let _ = self
            .entries
            .insert((sheet.id(), rule_index), Arc::clone(&ids));
        ids
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
