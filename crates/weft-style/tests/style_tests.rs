//! Integration tests for typed values, shorthands and computed styles.

use std::collections::HashMap;
use std::sync::Arc;

use weft_dom::{ElementData, ElementTree, NodeId};
use weft_style::style::{
    Background, BoxArea, Cursor, CursorKind, FilterMode, Font, FontStyle, ResourceLoader, Texture, VectorImage,
};
use weft_style::{
    Color, ComputedStyle, Length, ResolverOptions, StyleResolver, StyleSheet, StyleSheetBuilder,
    StyleValueKeyword,
};

/// Style of a `Label` child of the element the sheet is attached to.
fn label_style_with(resolver: &mut StyleResolver, sheet: StyleSheet) -> ComputedStyle {
    let mut tree = ElementTree::new(ElementData::new("Panel"));
    let label = tree.append(NodeId::ROOT, ElementData::new("Label"));
    let attachments = HashMap::from([(NodeId::ROOT, vec![Arc::new(sheet)])]);
    let styles = resolver.compute_styles(&tree, &attachments);
    styles.get(label).unwrap().clone()
}

fn label_style(sheet: StyleSheet) -> ComputedStyle {
    label_style_with(&mut StyleResolver::default(), sheet)
}

fn px(value: f32) -> Length {
    Length::Px(value)
}

#[test]
fn test_box_shorthand_table() {
    let one = label_style(StyleSheetBuilder::new().rule("Label").property("margin").px(1.0).build().unwrap());
    assert_eq!(one.margin, BoxArea::all(px(1.0)));

    let two = label_style(
        StyleSheetBuilder::new()
            .rule("Label")
            .property("margin")
            .px(1.0)
            .px(2.0)
            .build()
            .unwrap(),
    );
    assert_eq!(
        two.margin,
        BoxArea {
            top: px(1.0),
            right: px(2.0),
            bottom: px(1.0),
            left: px(2.0)
        }
    );

    let three = label_style(
        StyleSheetBuilder::new()
            .rule("Label")
            .property("padding")
            .px(1.0)
            .px(2.0)
            .px(3.0)
            .build()
            .unwrap(),
    );
    assert_eq!(
        three.padding,
        BoxArea {
            top: px(1.0),
            right: px(2.0),
            bottom: px(3.0),
            left: px(2.0)
        }
    );

    let four = label_style(
        StyleSheetBuilder::new()
            .rule("Label")
            .property("border-width")
            .float(1.0)
            .float(2.0)
            .float(3.0)
            .float(4.0)
            .build()
            .unwrap(),
    );
    assert_eq!(
        four.border_width,
        BoxArea {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0
        }
    );
}

#[test]
fn test_longhand_after_shorthand_overrides_one_edge() {
    let style = label_style(
        StyleSheetBuilder::new()
            .rule("Label")
            .property("margin")
            .px(5.0)
            .property("margin-left")
            .keyword(StyleValueKeyword::Auto)
            .build()
            .unwrap(),
    );
    assert_eq!(style.margin.top, px(5.0));
    assert_eq!(style.margin.left, Length::Auto);
}

#[test]
fn test_border_radius_rejects_auto() {
    let style = label_style(
        StyleSheetBuilder::new()
            .rule("Label")
            .property("border-radius")
            .px(4.0)
            .keyword(StyleValueKeyword::Auto)
            .build()
            .unwrap(),
    );
    assert_eq!(
        style.border_radius,
        BoxArea {
            top: px(4.0),
            right: Length::ZERO,
            bottom: px(4.0),
            left: Length::ZERO
        }
    );
}

fn flex_of(build: impl FnOnce(StyleSheetBuilder) -> StyleSheetBuilder) -> (f32, f32, Length) {
    let sheet = build(StyleSheetBuilder::new().rule("Label").property("flex"))
        .build()
        .unwrap();
    let style = label_style(sheet);
    (style.flex_grow, style.flex_shrink, style.flex_basis)
}

#[test]
fn test_flex_keywords() {
    assert_eq!(flex_of(|b| b.keyword(StyleValueKeyword::None)), (0.0, 0.0, Length::Auto));
    assert_eq!(flex_of(|b| b.keyword(StyleValueKeyword::Auto)), (1.0, 1.0, Length::Auto));
}

#[test]
fn test_flex_positional_forms() {
    assert_eq!(flex_of(|b| b.float(2.0)), (2.0, 1.0, Length::Auto));
    assert_eq!(flex_of(|b| b.float(2.0).float(3.0)), (2.0, 3.0, Length::Auto));
    assert_eq!(flex_of(|b| b.float(1.0).float(1.0).float(0.0)), (1.0, 1.0, Length::ZERO));
    assert_eq!(flex_of(|b| b.float(1.0).px(10.0)), (1.0, 1.0, px(10.0)));
    assert_eq!(flex_of(|b| b.percent(50.0).float(2.0)), (2.0, 1.0, Length::Percent(50.0)));
}

#[test]
fn test_flex_basis_must_be_last_after_grow() {
    // invalid: the declaration is ignored and initial values remain
    assert_eq!(flex_of(|b| b.float(1.0).px(10.0).float(2.0)), (0.0, 1.0, Length::Auto));
}

#[test]
fn test_text_outline_in_any_order() {
    let style = label_style(
        StyleSheetBuilder::new()
            .rule("Label")
            .property("-unity-text-outline")
            .ident("red")
            .px(2.0)
            .build()
            .unwrap(),
    );
    assert_eq!(style.text_outline_color, Color::RED);
    assert!((style.text_outline_width - 2.0).abs() < f32::EPSILON);
}

#[test]
fn test_keywords_and_named_colors() {
    let style = label_style(
        StyleSheetBuilder::new()
            .rule("Label")
            .property("display")
            .ident("none")
            .property("-unity-font-style")
            .ident("bold-and-italic")
            .property("background-color")
            .ident("teal")
            .property("-unity-slice-left")
            .float(3.0)
            .build()
            .unwrap(),
    );
    assert_eq!(style.display, weft_style::style::DisplayStyle::None);
    assert_eq!(style.font_style, FontStyle::BoldAndItalic);
    assert_eq!(style.background_color, Color::rgb(0, 128, 128));
    assert_eq!(style.slice.left, 3);
}

#[test]
fn test_inherited_and_non_inherited_properties() {
    let sheet = StyleSheetBuilder::new()
        .rule("Panel")
        .property("color")
        .color(Color::RED)
        .property("width")
        .px(100.0)
        .build()
        .unwrap();
    let style = label_style(sheet);
    assert_eq!(style.color, Color::RED);
    assert_eq!(style.width, Length::Auto);
}

#[test]
fn test_global_keywords() {
    let sheet = StyleSheetBuilder::new()
        .rule("Panel")
        .property("color")
        .color(Color::RED)
        .property("width")
        .px(100.0)
        .rule("Label")
        .property("width")
        .keyword(StyleValueKeyword::Inherit)
        .property("color")
        .keyword(StyleValueKeyword::Initial)
        .build()
        .unwrap();
    let style = label_style(sheet);
    assert_eq!(style.width, px(100.0));
    assert_eq!(style.color, Color::BLACK);
}

#[test]
fn test_invalid_variable_unsets_property() {
    let sheet = StyleSheetBuilder::new()
        .rule("Panel")
        .property("color")
        .color(Color::RED)
        .rule("Label")
        .property("--size")
        .px(3.0)
        .property("color")
        .color(Color::BLUE)
        .property("color")
        .var("--size")
        .build()
        .unwrap();
    // `color` inherits, so unset takes the parent's value
    assert_eq!(label_style(sheet).color, Color::RED);
}

struct FakeLoader;

impl ResourceLoader for FakeLoader {
    fn load_texture(&self, path: &str) -> Option<Texture> {
        path.ends_with(".png").then(|| Texture::new(path, 16, 16))
    }

    fn load_font(&self, path: &str) -> Option<Font> {
        Some(Font {
            path: path.to_string(),
            family: "Sans".to_string(),
        })
    }

    fn load_vector_image(&self, path: &str) -> Option<VectorImage> {
        path.ends_with(".svg").then(|| VectorImage {
            path: path.to_string(),
            width: 8.0,
            height: 8.0,
        })
    }
}

#[test]
fn test_resources_through_loader() {
    let options = ResolverOptions {
        dpi_scaling: 1.5,
        ..ResolverOptions::default()
    };
    let mut resolver = StyleResolver::new(options, Box::new(FakeLoader));
    let sheet = StyleSheetBuilder::new()
        .rule("Label")
        .property("background-image")
        .resource("icons/arrow.svg")
        .property("-unity-font")
        .asset("fonts/body.ttf")
        .property("cursor")
        .resource("cursors/hand.png")
        .float(3.0)
        .float(4.0)
        .build()
        .unwrap();
    let style = label_style_with(&mut resolver, sheet);

    assert!(matches!(style.background_image, Background::VectorImage(ref v) if v.path == "icons/arrow.svg"));
    assert_eq!(style.font.as_ref().map(|f| f.family.as_str()), Some("Sans"));
    let texture = style.cursor.texture.as_ref().unwrap();
    assert_eq!(texture.filter_mode, FilterMode::Bilinear);
    assert_eq!(style.cursor.hotspot, (3.0, 4.0));
}

#[test]
fn test_builtin_cursor() {
    let style = label_style(
        StyleSheetBuilder::new()
            .rule("Label")
            .property("cursor")
            .ident("resize-vertical")
            .build()
            .unwrap(),
    );
    assert_eq!(
        style.cursor,
        Cursor {
            default_cursor: CursorKind::ResizeVertical,
            ..Cursor::default()
        }
    );
}

#[test]
fn test_computed_style_serializes() {
    let style = ComputedStyle {
        color: Color::RED,
        ..ComputedStyle::default()
    };
    let json = serde_json::to_value(&style).unwrap();
    assert_eq!(json["color"]["r"], 255);
    assert_eq!(json["flex_wrap"], "nowrap");
    assert_eq!(json["max_width"], "none");
    assert_eq!(json["margin"]["top"]["px"], 0.0);
}

#[test]
fn test_unitless_length_through_variable() {
    let direct = label_style(StyleSheetBuilder::new().rule("Label").property("margin").float(5.0).build().unwrap());
    let through_var = label_style(
        StyleSheetBuilder::new()
            .rule("Label")
            .property("--m")
            .float(5.0)
            .property("margin")
            .var("--m")
            .build()
            .unwrap(),
    );
    assert_eq!(direct.margin, BoxArea::all(px(5.0)));
    assert_eq!(through_var.margin, direct.margin);
}
