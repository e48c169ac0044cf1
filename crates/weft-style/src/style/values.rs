//! Typed style values.
//!
//! These are the types a [`ComputedStyle`](super::ComputedStyle) is made of:
//! colors, lengths and the keyword enums accepted by enum-valued properties.
//! Enum types derive their accepted keywords from their variant names, so the
//! property grammar table and the reader always agree on spelling.

use serde::Serialize;
use strum_macros::{EnumString, IntoStaticStr, VariantNames};

/// An sRGB color with alpha, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Fully transparent black, the default for unresolvable colors.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`. The leading `#` is optional.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let short = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            // Short forms replicate digits: #f80 is #ff8800.
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgb(long(0)?, long(2)?, long(4)?)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// Look up a named color, case-insensitively.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, color)| color)
    }

    /// Format as `#rrggbbaa`.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Named colors understood in style values.
const NAMED_COLORS: &[(&str, Color)] = &[
    ("transparent", Color::TRANSPARENT),
    ("clear", Color::TRANSPARENT),
    ("black", Color::BLACK),
    ("white", Color::WHITE),
    ("red", Color::RED),
    ("green", Color::rgb(0, 128, 0)),
    ("blue", Color::BLUE),
    ("yellow", Color::rgb(255, 255, 0)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("aqua", Color::rgb(0, 255, 255)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("fuchsia", Color::rgb(255, 0, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("lime", Color::rgb(0, 255, 0)),
    ("maroon", Color::rgb(128, 0, 0)),
    ("navy", Color::rgb(0, 0, 128)),
    ("olive", Color::rgb(128, 128, 0)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("silver", Color::rgb(192, 192, 192)),
    ("teal", Color::rgb(0, 128, 128)),
];

/// A length as read from a style value.
///
/// A bare number is read as pixels. `Auto` and `None` come from the
/// corresponding keywords; whether a property accepts them is decided by its
/// grammar, not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Length {
    /// Absolute length in pixels.
    Px(f32),
    /// Percentage of the containing dimension.
    Percent(f32),
    /// `auto`.
    #[default]
    Auto,
    /// `none`.
    None,
}

impl Length {
    /// Zero pixels.
    pub const ZERO: Self = Self::Px(0.0);

    /// Returns `true` for [`Length::Auto`].
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// `display`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DisplayStyle {
    /// Laid out by the flex algorithm.
    #[default]
    Flex,
    /// Not displayed.
    None,
}

/// `position`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    /// Placed by layout, offsets are relative to that placement.
    #[default]
    Relative,
    /// Placed relative to the parent.
    Absolute,
}

/// `flex-direction`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    /// Top to bottom.
    #[default]
    Column,
    /// Bottom to top.
    ColumnReverse,
    /// Left to right.
    Row,
    /// Right to left.
    RowReverse,
}

/// `flex-wrap`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Wrap {
    /// Single line.
    #[default]
    #[strum(serialize = "nowrap")]
    #[serde(rename = "nowrap")]
    NoWrap,
    /// Wrap onto new lines.
    Wrap,
    /// Wrap onto new lines in reverse order.
    WrapReverse,
}

/// `align-items`, `align-self` and `align-content`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    /// Defer to the parent's `align-items`.
    #[default]
    Auto,
    /// Start of the cross axis.
    FlexStart,
    /// Center of the cross axis.
    Center,
    /// End of the cross axis.
    FlexEnd,
    /// Fill the cross axis.
    Stretch,
}

/// `justify-content`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    /// Pack at the start of the main axis.
    #[default]
    FlexStart,
    /// Pack in the center.
    Center,
    /// Pack at the end.
    FlexEnd,
    /// Distribute with no space at the edges.
    SpaceBetween,
    /// Distribute with half spaces at the edges.
    SpaceAround,
}

/// `overflow`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Overflow {
    /// Content may draw outside the element.
    #[default]
    Visible,
    /// Content is clipped.
    Hidden,
}

/// `visibility`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// Drawn.
    #[default]
    Visible,
    /// Not drawn, still laid out.
    Hidden,
}

/// `white-space`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum WhiteSpace {
    /// Text wraps.
    #[default]
    Normal,
    /// Text stays on one line.
    #[strum(serialize = "nowrap")]
    #[serde(rename = "nowrap")]
    NoWrap,
}

/// `-unity-font-style`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    /// Regular weight, upright.
    #[default]
    Normal,
    /// Bold.
    Bold,
    /// Italic.
    Italic,
    /// Bold and italic.
    BoldAndItalic,
}

/// `-unity-text-align`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TextAnchor {
    /// Top left.
    #[default]
    UpperLeft,
    /// Top center.
    UpperCenter,
    /// Top right.
    UpperRight,
    /// Middle left.
    MiddleLeft,
    /// Middle center.
    MiddleCenter,
    /// Middle right.
    MiddleRight,
    /// Bottom left.
    LowerLeft,
    /// Bottom center.
    LowerCenter,
    /// Bottom right.
    LowerRight,
}

/// `-unity-background-scale-mode`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ScaleMode {
    /// Stretch to the element's box, ignoring aspect ratio.
    #[default]
    StretchToFill,
    /// Cover the box, cropping the image.
    ScaleAndCrop,
    /// Fit inside the box, letterboxing the image.
    ScaleToFit,
}

/// Built-in cursor shapes accepted by `cursor`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CursorKind {
    /// Standard arrow.
    #[default]
    Arrow,
    /// Text insertion beam.
    Text,
    /// Vertical resize arrows.
    ResizeVertical,
    /// Horizontal resize arrows.
    ResizeHorizontal,
    /// Pointing hand.
    Link,
    /// Arrow with a small slider.
    SlideArrow,
    /// Four-way move arrows.
    MoveArrow,
    /// Splitter resize, vertical.
    SplitResizeUpDown,
    /// Splitter resize, horizontal.
    SplitResizeLeftRight,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_hex_forms() {
        assert_eq!(Color::from_hex("#f80"), Some(Color::rgb(255, 136, 0)));
        assert_eq!(Color::from_hex("00ff0080"), Some(Color::rgba(0, 255, 0, 128)));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#zzz"), None);
    }

    #[test]
    fn test_named_colors_ignore_case() {
        assert_eq!(Color::from_named("Red"), Some(Color::RED));
        assert_eq!(Color::from_named("chartreuse-ish"), None);
    }

    #[test]
    fn test_enum_keywords() {
        assert_eq!(Wrap::from_str("nowrap"), Ok(Wrap::NoWrap));
        assert_eq!(TextAnchor::from_str("middle-center"), Ok(TextAnchor::MiddleCenter));
        let name: &'static str = FontStyle::BoldAndItalic.into();
        assert_eq!(name, "bold-and-italic");
        assert!(DisplayStyle::from_str("grid").is_err());
    }
}
