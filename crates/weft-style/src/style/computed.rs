//! Computed styles: one typed value per supported longhand.

use std::sync::LazyLock;

use serde::Serialize;
use strum::IntoEnumIterator;
use weft_common::warning::warn_once;

use super::reader::StylePropertyReader;
use super::resources::{Background, Cursor, Font};
use super::shorthand::{
    BoxArea, compile_border_radius, compile_box_colors, compile_box_floats, compile_box_lengths,
    compile_flex, compile_text_outline,
};
use super::{
    Align, Color, DisplayStyle, FlexDirection, FontStyle, Justify, Length, Overflow, Position,
    ScaleMode, TextAnchor, Visibility, WhiteSpace, Wrap,
};
use crate::properties::StylePropertyId;
use crate::sheet::StyleValueKeyword;

static INITIAL: LazyLock<ComputedStyle> = LazyLock::new(ComputedStyle::default);

/// The computed values of every supported property.
///
/// `Default` is the initial value of every property. Box shorthands are
/// stored per edge as [`BoxArea`]s; corners of `border-radius` run clockwise
/// from the top-left.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyle {
    pub color: Color,
    pub background_color: Color,
    pub border_color: BoxArea<Color>,
    pub background_image_tint_color: Color,
    pub text_outline_color: Color,

    pub width: Length,
    pub height: Length,
    pub min_width: Length,
    pub min_height: Length,
    pub max_width: Length,
    pub max_height: Length,
    pub left: Length,
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub margin: BoxArea<Length>,
    pub padding: BoxArea<Length>,
    pub border_radius: BoxArea<Length>,
    pub flex_basis: Length,
    pub font_size: Length,
    pub letter_spacing: Length,

    pub opacity: f32,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub border_width: BoxArea<f32>,
    pub text_outline_width: f32,
    pub slice_scale: f32,
    pub slice: BoxArea<i32>,

    pub display: DisplayStyle,
    pub position: Position,
    pub flex_direction: FlexDirection,
    pub flex_wrap: Wrap,
    pub align_items: Align,
    pub align_self: Align,
    pub align_content: Align,
    pub justify_content: Justify,
    pub overflow: Overflow,
    pub visibility: Visibility,
    pub white_space: WhiteSpace,
    pub font_style: FontStyle,
    pub text_align: TextAnchor,
    pub background_scale_mode: ScaleMode,

    pub font: Option<Font>,
    pub cursor: Cursor,
    pub background_image: Background,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            border_color: BoxArea::all(Color::BLACK),
            background_image_tint_color: Color::WHITE,
            text_outline_color: Color::TRANSPARENT,

            width: Length::Auto,
            height: Length::Auto,
            min_width: Length::Auto,
            min_height: Length::Auto,
            max_width: Length::None,
            max_height: Length::None,
            left: Length::Auto,
            top: Length::Auto,
            right: Length::Auto,
            bottom: Length::Auto,
            margin: BoxArea::all(Length::ZERO),
            padding: BoxArea::all(Length::ZERO),
            border_radius: BoxArea::all(Length::ZERO),
            flex_basis: Length::Auto,
            font_size: Length::Px(12.0),
            letter_spacing: Length::ZERO,

            opacity: 1.0,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            border_width: BoxArea::all(0.0),
            text_outline_width: 0.0,
            slice_scale: 1.0,
            slice: BoxArea::all(0),

            display: DisplayStyle::Flex,
            position: Position::Relative,
            flex_direction: FlexDirection::Column,
            flex_wrap: Wrap::NoWrap,
            align_items: Align::Stretch,
            align_self: Align::Auto,
            align_content: Align::FlexStart,
            justify_content: Justify::FlexStart,
            overflow: Overflow::Visible,
            visibility: Visibility::Visible,
            white_space: WhiteSpace::Normal,
            font_style: FontStyle::Normal,
            text_align: TextAnchor::UpperLeft,
            background_scale_mode: ScaleMode::StretchToFill,

            font: None,
            cursor: Cursor::default(),
            background_image: Background::None,
        }
    }
}

impl ComputedStyle {
    /// The shared initial style.
    #[must_use]
    pub fn initial() -> &'static Self {
        &INITIAL
    }

    /// A style whose inherited properties come from `parent` and every
    /// other property is initial.
    #[must_use]
    pub fn inherit_from(parent: &Self) -> Self {
        let mut style = Self::default();
        for id in StylePropertyId::iter().filter(|id| id.is_inherited() && !id.is_shorthand()) {
            style.copy_property(id, parent);
        }
        style
    }

    /// Copy one property (every longhand of a shorthand) from `from`.
    #[allow(clippy::too_many_lines)]
    pub fn copy_property(&mut self, id: StylePropertyId, from: &Self) {
        use StylePropertyId as P;
        match id {
            P::Margin
            | P::Padding
            | P::BorderWidth
            | P::BorderColor
            | P::BorderRadius
            | P::Flex
            | P::UnityTextOutline => {
                for &longhand in id.longhands() {
                    self.copy_property(longhand, from);
                }
            }

            P::Color => self.color = from.color,
            P::BackgroundColor => self.background_color = from.background_color,
            P::BorderTopColor => self.border_color.top = from.border_color.top,
            P::BorderRightColor => self.border_color.right = from.border_color.right,
            P::BorderBottomColor => self.border_color.bottom = from.border_color.bottom,
            P::BorderLeftColor => self.border_color.left = from.border_color.left,
            P::UnityBackgroundImageTintColor => {
                self.background_image_tint_color = from.background_image_tint_color;
            }
            P::UnityTextOutlineColor => self.text_outline_color = from.text_outline_color,

            P::Width => self.width = from.width,
            P::Height => self.height = from.height,
            P::MinWidth => self.min_width = from.min_width,
            P::MinHeight => self.min_height = from.min_height,
            P::MaxWidth => self.max_width = from.max_width,
            P::MaxHeight => self.max_height = from.max_height,
            P::Left => self.left = from.left,
            P::Top => self.top = from.top,
            P::Right => self.right = from.right,
            P::Bottom => self.bottom = from.bottom,
            P::MarginTop => self.margin.top = from.margin.top,
            P::MarginRight => self.margin.right = from.margin.right,
            P::MarginBottom => self.margin.bottom = from.margin.bottom,
            P::MarginLeft => self.margin.left = from.margin.left,
            P::PaddingTop => self.padding.top = from.padding.top,
            P::PaddingRight => self.padding.right = from.padding.right,
            P::PaddingBottom => self.padding.bottom = from.padding.bottom,
            P::PaddingLeft => self.padding.left = from.padding.left,
            P::FlexBasis => self.flex_basis = from.flex_basis,
            P::FontSize => self.font_size = from.font_size,
            P::LetterSpacing => self.letter_spacing = from.letter_spacing,
            P::BorderTopLeftRadius => self.border_radius.top = from.border_radius.top,
            P::BorderTopRightRadius => self.border_radius.right = from.border_radius.right,
            P::BorderBottomRightRadius => self.border_radius.bottom = from.border_radius.bottom,
            P::BorderBottomLeftRadius => self.border_radius.left = from.border_radius.left,

            P::Opacity => self.opacity = from.opacity,
            P::FlexGrow => self.flex_grow = from.flex_grow,
            P::FlexShrink => self.flex_shrink = from.flex_shrink,
            P::BorderTopWidth => self.border_width.top = from.border_width.top,
            P::BorderRightWidth => self.border_width.right = from.border_width.right,
            P::BorderBottomWidth => self.border_width.bottom = from.border_width.bottom,
            P::BorderLeftWidth => self.border_width.left = from.border_width.left,
            P::UnityTextOutlineWidth => self.text_outline_width = from.text_outline_width,
            P::UnitySliceScale => self.slice_scale = from.slice_scale,
            P::UnitySliceLeft => self.slice.left = from.slice.left,
            P::UnitySliceTop => self.slice.top = from.slice.top,
            P::UnitySliceRight => self.slice.right = from.slice.right,
            P::UnitySliceBottom => self.slice.bottom = from.slice.bottom,

            P::Display => self.display = from.display,
            P::Position => self.position = from.position,
            P::FlexDirection => self.flex_direction = from.flex_direction,
            P::FlexWrap => self.flex_wrap = from.flex_wrap,
            P::AlignItems => self.align_items = from.align_items,
            P::AlignSelf => self.align_self = from.align_self,
            P::AlignContent => self.align_content = from.align_content,
            P::JustifyContent => self.justify_content = from.justify_content,
            P::Overflow => self.overflow = from.overflow,
            P::Visibility => self.visibility = from.visibility,
            P::WhiteSpace => self.white_space = from.white_space,
            P::UnityFontStyle => self.font_style = from.font_style,
            P::UnityTextAlign => self.text_align = from.text_align,
            P::UnityBackgroundScaleMode => self.background_scale_mode = from.background_scale_mode,

            P::UnityFont => self.font.clone_from(&from.font),
            P::Cursor => self.cursor.clone_from(&from.cursor),
            P::BackgroundImage => self.background_image.clone_from(&from.background_image),

            P::Custom | P::Unknown => {}
        }
    }

    /// `initial`: reset to the initial value.
    pub fn apply_initial(&mut self, id: StylePropertyId) {
        self.copy_property(id, Self::initial());
    }

    /// `inherit`: take the parent's value, or the initial value at the root.
    pub fn apply_inherit(&mut self, id: StylePropertyId, parent: Option<&Self>) {
        self.copy_property(id, parent.unwrap_or(Self::initial()));
    }

    /// `unset`: `inherit` for inherited properties, `initial` otherwise.
    ///
    /// A shorthand is unset longhand by longhand.
    pub fn apply_unset(&mut self, id: StylePropertyId, parent: Option<&Self>) {
        if id.is_shorthand() {
            for &longhand in id.longhands() {
                self.apply_unset(longhand, parent);
            }
        } else if id.is_inherited() {
            self.apply_inherit(id, parent);
        } else {
            self.apply_initial(id);
        }
    }

    /// Apply every declaration `reader` yields, in order.
    pub fn apply_properties(&mut self, reader: &mut StylePropertyReader<'_, '_>, parent: Option<&Self>) {
        while reader.move_next_property() {
            let id = reader.property_id();
            match reader.global_keyword() {
                Some(StyleValueKeyword::Initial) => self.apply_initial(id),
                Some(StyleValueKeyword::Inherit) => self.apply_inherit(id, parent),
                Some(StyleValueKeyword::Unset) => self.apply_unset(id, parent),
                _ => self.apply_value(id, reader),
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn apply_value(&mut self, id: StylePropertyId, reader: &StylePropertyReader<'_, '_>) {
        use StylePropertyId as P;
        match id {
            P::Color => self.color = reader.read_color(0),
            P::BackgroundColor => self.background_color = reader.read_color(0),
            P::BorderTopColor => self.border_color.top = reader.read_color(0),
            P::BorderRightColor => self.border_color.right = reader.read_color(0),
            P::BorderBottomColor => self.border_color.bottom = reader.read_color(0),
            P::BorderLeftColor => self.border_color.left = reader.read_color(0),
            P::UnityBackgroundImageTintColor => self.background_image_tint_color = reader.read_color(0),
            P::UnityTextOutlineColor => self.text_outline_color = reader.read_color(0),

            P::Width => self.width = reader.read_length(0),
            P::Height => self.height = reader.read_length(0),
            P::MinWidth => self.min_width = reader.read_length(0),
            P::MinHeight => self.min_height = reader.read_length(0),
            P::MaxWidth => self.max_width = reader.read_length(0),
            P::MaxHeight => self.max_height = reader.read_length(0),
            P::Left => self.left = reader.read_length(0),
            P::Top => self.top = reader.read_length(0),
            P::Right => self.right = reader.read_length(0),
            P::Bottom => self.bottom = reader.read_length(0),
            P::MarginTop => self.margin.top = reader.read_length(0),
            P::MarginRight => self.margin.right = reader.read_length(0),
            P::MarginBottom => self.margin.bottom = reader.read_length(0),
            P::MarginLeft => self.margin.left = reader.read_length(0),
            P::PaddingTop => self.padding.top = reader.read_length(0),
            P::PaddingRight => self.padding.right = reader.read_length(0),
            P::PaddingBottom => self.padding.bottom = reader.read_length(0),
            P::PaddingLeft => self.padding.left = reader.read_length(0),
            P::FlexBasis => self.flex_basis = reader.read_length(0),
            P::FontSize => self.font_size = reader.read_length(0),
            P::LetterSpacing => self.letter_spacing = reader.read_length(0),
            P::BorderTopLeftRadius => self.border_radius.top = reader.read_length(0),
            P::BorderTopRightRadius => self.border_radius.right = reader.read_length(0),
            P::BorderBottomRightRadius => self.border_radius.bottom = reader.read_length(0),
            P::BorderBottomLeftRadius => self.border_radius.left = reader.read_length(0),

            P::Opacity => self.opacity = reader.read_float(0),
            P::FlexGrow => self.flex_grow = reader.read_float(0),
            P::FlexShrink => self.flex_shrink = reader.read_float(0),
            P::BorderTopWidth => self.border_width.top = reader.read_float(0),
            P::BorderRightWidth => self.border_width.right = reader.read_float(0),
            P::BorderBottomWidth => self.border_width.bottom = reader.read_float(0),
            P::BorderLeftWidth => self.border_width.left = reader.read_float(0),
            P::UnityTextOutlineWidth => self.text_outline_width = reader.read_float(0),
            P::UnitySliceScale => self.slice_scale = reader.read_float(0),
            P::UnitySliceLeft => self.slice.left = reader.read_int(0),
            P::UnitySliceTop => self.slice.top = reader.read_int(0),
            P::UnitySliceRight => self.slice.right = reader.read_int(0),
            P::UnitySliceBottom => self.slice.bottom = reader.read_int(0),

            P::Display => self.display = reader.read_enum(0),
            P::Position => self.position = reader.read_enum(0),
            P::FlexDirection => self.flex_direction = reader.read_enum(0),
            P::FlexWrap => self.flex_wrap = reader.read_enum(0),
            P::AlignItems => self.align_items = reader.read_enum(0),
            P::AlignSelf => self.align_self = reader.read_enum(0),
            P::AlignContent => self.align_content = reader.read_enum(0),
            P::JustifyContent => self.justify_content = reader.read_enum(0),
            P::Overflow => self.overflow = reader.read_enum(0),
            P::Visibility => self.visibility = reader.read_enum(0),
            P::WhiteSpace => self.white_space = reader.read_enum(0),
            P::UnityFontStyle => self.font_style = reader.read_enum(0),
            P::UnityTextAlign => self.text_align = reader.read_enum(0),
            P::UnityBackgroundScaleMode => self.background_scale_mode = reader.read_enum(0),

            P::UnityFont => self.font = reader.read_font(0),
            P::Cursor => self.cursor = reader.read_cursor(),
            P::BackgroundImage => self.background_image = reader.read_background(0),

            P::Margin => self.margin = compile_box_lengths(reader),
            P::Padding => self.padding = compile_box_lengths(reader),
            P::BorderWidth => self.border_width = compile_box_floats(reader),
            P::BorderColor => self.border_color = compile_box_colors(reader),
            P::BorderRadius => self.border_radius = compile_border_radius(reader),
            P::Flex => match compile_flex(reader) {
                Some(flex) => {
                    self.flex_grow = flex.grow;
                    self.flex_shrink = flex.shrink;
                    self.flex_basis = flex.basis;
                }
                None => warn_once("Style", "invalid 'flex' value ignored"),
            },
            P::UnityTextOutline => {
                (self.text_outline_width, self.text_outline_color) = compile_text_outline(reader);
            }

            P::Custom | P::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inherit_from_copies_only_inherited() {
        let parent = ComputedStyle {
            color: Color::RED,
            width: Length::Px(10.0),
            font_style: FontStyle::Bold,
            ..ComputedStyle::default()
        };
        let child = ComputedStyle::inherit_from(&parent);
        assert_eq!(child.color, Color::RED);
        assert_eq!(child.font_style, FontStyle::Bold);
        assert_eq!(child.width, Length::Auto);
    }

    #[test]
    fn test_unset_shorthand_resets_longhands() {
        let parent = ComputedStyle {
            margin: BoxArea::all(Length::Px(3.0)),
            text_outline_width: 2.0,
            ..ComputedStyle::default()
        };
        let mut style = ComputedStyle {
            margin: BoxArea::all(Length::Px(8.0)),
            ..ComputedStyle::default()
        };
        style.apply_unset(StylePropertyId::Margin, Some(&parent));
        style.apply_unset(StylePropertyId::UnityTextOutline, Some(&parent));
        assert_eq!(style.margin, BoxArea::all(Length::ZERO));
        assert!((style.text_outline_width - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_inherit_at_root_is_initial() {
        let mut style = ComputedStyle {
            color: Color::RED,
            ..ComputedStyle::default()
        };
        style.apply_inherit(StylePropertyId::Color, None);
        assert_eq!(style.color, Color::BLACK);
    }
}
