//! Walks the properties of matched rules in cascade order and reads their
//! values as typed data.

use std::str::FromStr;
use std::sync::Arc;

use weft_common::warning::warn_once;

use super::resources::{
    Background, Cursor, FilterMode, Font, ResourceLoader, Texture, load_texture_for_scale,
    load_texture_or_placeholder,
};
use super::{Color, CursorKind, Length};
use crate::cascade::MatchRecord;
use crate::properties::{PropertyIdCache, StylePropertyId};
use crate::resolver::ResolverOptions;
use crate::sheet::{
    DimensionUnit, StyleProperty, StylePropertyValue, StyleSheet, StyleValueHandle, StyleValueKeyword,
    StyleValueType,
};
use crate::variables::{ResolveResult, VariableContext, VariableResolver};

/// Iterates the declarations of a list of matched rules.
///
/// Call [`move_next_property`](Self::move_next_property) until it returns
/// `false`; after each successful call the `read_*` methods read the values
/// of the current declaration, with `var()` calls already expanded. A
/// declaration whose variables cannot be resolved reads as a single `unset`
/// keyword. Custom and unknown properties are skipped.
///
/// Reads at a wrong index or of a wrong type log a warning and return a
/// default instead of failing.
pub struct StylePropertyReader<'a, 'c> {
    records: &'c [MatchRecord<'a>],
    variables: &'c VariableContext<'a>,
    property_ids: &'c mut PropertyIdCache,
    loader: &'c dyn ResourceLoader,
    options: &'c ResolverOptions,
    record_index: usize,
    next_property: usize,
    ids: Option<Arc<[StylePropertyId]>>,
    property: Option<&'a StyleProperty>,
    property_id: StylePropertyId,
    values: Vec<StylePropertyValue<'a>>,
}

impl<'a, 'c> StylePropertyReader<'a, 'c> {
    /// A reader over `records`, which must already be in cascade order.
    #[must_use]
    pub fn new(
        records: &'c [MatchRecord<'a>],
        variables: &'c VariableContext<'a>,
        property_ids: &'c mut PropertyIdCache,
        loader: &'c dyn ResourceLoader,
        options: &'c ResolverOptions,
    ) -> Self {
        Self {
            records,
            variables,
            property_ids,
            loader,
            options,
            record_index: 0,
            next_property: 0,
            ids: None,
            property: None,
            property_id: StylePropertyId::Unknown,
            values: Vec::new(),
        }
    }

    fn advance_record(&mut self) {
        self.record_index += 1;
        self.next_property = 0;
        self.ids = None;
    }

    /// Move to the next declaration. Returns `false` once every rule is exhausted.
    pub fn move_next_property(&mut self) -> bool {
        while let Some(record) = self.records.get(self.record_index).copied() {
            let Some(rule) = record.rule() else {
                self.advance_record();
                continue;
            };
            let ids = match &self.ids {
                Some(ids) => Arc::clone(ids),
                None => {
                    let ids = self
                        .property_ids
                        .get_or_build(record.sheet, record.complex_selector.rule_index());
                    self.ids = Some(Arc::clone(&ids));
                    ids
                }
            };
            let Some(property) = rule.properties.get(self.next_property) else {
                self.advance_record();
                continue;
            };
            let id = ids
                .get(self.next_property)
                .copied()
                .unwrap_or(StylePropertyId::Unknown);
            self.next_property += 1;

            match id {
                StylePropertyId::Custom => continue,
                StylePropertyId::Unknown => {
                    warn_once("Style", &format!("unknown property '{}'", property.name));
                    continue;
                }
                _ => {}
            }

            self.load_values(record.sheet, property);
            self.property = Some(property);
            self.property_id = id;
            return true;
        }
        self.property = None;
        self.values.clear();
        false
    }

    fn load_values(&mut self, sheet: &'a StyleSheet, property: &'a StyleProperty) {
        self.values.clear();
        if !property.requires_variable_resolution {
            self.values
                .extend(property.values.iter().map(|&h| StylePropertyValue::new(sheet, h)));
            return;
        }

        let mut resolver = VariableResolver::new(self.variables, self.options.max_variable_resolves);
        match resolver.resolve_property(sheet, property) {
            ResolveResult::Valid => self.values = resolver.take_resolved_values(),
            result => {
                tracing::debug!(
                    property = %property.name,
                    line = property.line,
                    ?result,
                    "variables did not resolve, declaration reads as unset"
                );
                self.values.push(StylePropertyValue::new(
                    sheet,
                    StyleValueHandle::keyword(StyleValueKeyword::Unset),
                ));
            }
        }
    }

    /// Id of the current declaration.
    #[must_use]
    pub const fn property_id(&self) -> StylePropertyId {
        self.property_id
    }

    /// The current declaration as written.
    #[must_use]
    pub const fn property(&self) -> Option<&'a StyleProperty> {
        self.property
    }

    /// Resolved values of the current declaration.
    #[must_use]
    pub fn values(&self) -> &[StylePropertyValue<'a>] {
        &self.values
    }

    /// Number of resolved values.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    fn property_name(&self) -> &str {
        self.property.map_or("", |p| p.name.as_str())
    }

    fn value(&self, index: usize) -> Option<StylePropertyValue<'a>> {
        let value = self.values.get(index).copied();
        if value.is_none() {
            warn_once(
                "Style",
                &format!("'{}' has no value at index {index}", self.property_name()),
            );
        }
        value
    }

    fn mismatch(&self, index: usize, expected: &str) {
        let found = self.values.get(index).map(|v| v.handle.value_type);
        warn_once(
            "Style",
            &format!(
                "'{}' value {index}: expected {expected}, found {found:?}",
                self.property_name()
            ),
        );
    }

    /// Type of the value at `index`.
    #[must_use]
    pub fn value_type(&self, index: usize) -> Option<StyleValueType> {
        self.values.get(index).map(|v| v.handle.value_type)
    }

    /// Whether the value at `index` is `keyword`.
    #[must_use]
    pub fn is_keyword(&self, index: usize, keyword: StyleValueKeyword) -> bool {
        self.values.get(index).is_some_and(|v| {
            v.handle.value_type == StyleValueType::Keyword && v.sheet.values().read_keyword(v.handle) == keyword
        })
    }

    /// The keyword at `index`, if the value is one.
    #[must_use]
    pub fn keyword(&self, index: usize) -> Option<StyleValueKeyword> {
        self.values
            .get(index)
            .filter(|v| v.handle.value_type == StyleValueType::Keyword)
            .map(|v| v.sheet.values().read_keyword(v.handle))
    }

    /// A global keyword (`initial`, `inherit`, `unset`) making up the whole
    /// declaration.
    #[must_use]
    pub fn global_keyword(&self) -> Option<StyleValueKeyword> {
        if self.values.len() != 1 {
            return None;
        }
        self.keyword(0).filter(|k| {
            matches!(
                k,
                StyleValueKeyword::Initial | StyleValueKeyword::Inherit | StyleValueKeyword::Unset
            )
        })
    }

    /// Read a number. Dimensions read as their numeric part.
    #[must_use]
    pub fn read_float(&self, index: usize) -> f32 {
        let Some(v) = self.value(index) else {
            return 0.0;
        };
        match v.handle.value_type {
            StyleValueType::Float | StyleValueType::Dimension => v.sheet.values().read_float(v.handle),
            _ => {
                self.mismatch(index, "a number");
                0.0
            }
        }
    }

    /// Read a whole number, rounding.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn read_int(&self, index: usize) -> i32 {
        self.read_float(index).round() as i32
    }

    /// Read a length. Bare numbers are pixels; `auto` and `none` map to
    /// their variants.
    #[must_use]
    pub fn read_length(&self, index: usize) -> Length {
        let Some(v) = self.value(index) else {
            return Length::ZERO;
        };
        let values = v.sheet.values();
        match v.handle.value_type {
            StyleValueType::Keyword => match values.read_keyword(v.handle) {
                StyleValueKeyword::Auto => Length::Auto,
                StyleValueKeyword::None => Length::None,
                _ => {
                    self.mismatch(index, "a length");
                    Length::ZERO
                }
            },
            StyleValueType::Float => Length::Px(values.read_float(v.handle)),
            StyleValueType::Dimension => {
                let dimension = values.read_dimension(v.handle);
                match dimension.unit {
                    DimensionUnit::Percent => Length::Percent(dimension.value),
                    DimensionUnit::Pixel | DimensionUnit::Unitless => Length::Px(dimension.value),
                }
            }
            _ => {
                self.mismatch(index, "a length");
                Length::ZERO
            }
        }
    }

    /// Read a color literal or a named color.
    #[must_use]
    pub fn read_color(&self, index: usize) -> Color {
        let Some(v) = self.value(index) else {
            return Color::TRANSPARENT;
        };
        let values = v.sheet.values();
        match v.handle.value_type {
            StyleValueType::Color => values.read_color(v.handle),
            StyleValueType::Enum | StyleValueType::String => {
                let name = values.read_as_string(v.handle);
                Color::from_named(&name).unwrap_or_else(|| {
                    warn_once("Style", &format!("unknown color name '{name}'"));
                    Color::TRANSPARENT
                })
            }
            _ => {
                self.mismatch(index, "a color");
                Color::TRANSPARENT
            }
        }
    }

    /// Whether the value at `index` can be read as a color.
    #[must_use]
    pub fn is_color(&self, index: usize) -> bool {
        self.values.get(index).is_some_and(|v| match v.handle.value_type {
            StyleValueType::Color => true,
            StyleValueType::Enum | StyleValueType::String => {
                Color::from_named(&v.sheet.values().read_as_string(v.handle)).is_some()
            }
            _ => false,
        })
    }

    /// Read an identifier as one of an enum's keywords.
    #[must_use]
    pub fn read_enum<T: FromStr + Default>(&self, index: usize) -> T {
        let Some(v) = self.value(index) else {
            return T::default();
        };
        match v.handle.value_type {
            StyleValueType::Enum | StyleValueType::Keyword | StyleValueType::String => {
                let text = v.sheet.values().read_as_string(v.handle);
                text.parse().unwrap_or_else(|_| {
                    warn_once(
                        "Style",
                        &format!("'{}' does not accept '{text}'", self.property_name()),
                    );
                    T::default()
                })
            }
            _ => {
                self.mismatch(index, "a keyword");
                T::default()
            }
        }
    }

    fn resource_path(&self, v: StylePropertyValue<'a>) -> Option<&'a str> {
        let values = v.sheet.values();
        match v.handle.value_type {
            StyleValueType::ResourcePath => Some(values.read_resource_path(v.handle)),
            StyleValueType::AssetReference => Some(values.read_asset_reference(v.handle)),
            StyleValueType::MissingAssetReference => {
                warn_once(
                    "Style",
                    &format!("missing asset '{}'", values.read_asset_reference(v.handle)),
                );
                None
            }
            _ => None,
        }
    }

    /// Read a font. `none` and missing fonts read as `None`.
    #[must_use]
    pub fn read_font(&self, index: usize) -> Option<Font> {
        let v = self.value(index)?;
        match v.handle.value_type {
            StyleValueType::Keyword if self.is_keyword(index, StyleValueKeyword::None) => None,
            StyleValueType::ResourcePath
            | StyleValueType::AssetReference
            | StyleValueType::MissingAssetReference => {
                let path = self.resource_path(v)?;
                let font = self.loader.load_font(path);
                if font.is_none() {
                    warn_once("Style", &format!("font '{path}' not found"));
                }
                font
            }
            _ => {
                self.mismatch(index, "a font");
                None
            }
        }
    }

    fn load_scalable(&self, normal: &str, high_resolution: &str) -> Option<Texture> {
        let scale = self.options.dpi_scaling;
        let mut texture = if scale > 1.0 {
            self.loader.load_texture(high_resolution).map(|mut t| {
                t.pixels_per_point = 2.0;
                t
            })
        } else {
            None
        };
        if texture.is_none() {
            texture = self.loader.load_texture(normal);
        }
        let mut texture = texture?;
        if scale.fract().abs() > f32::EPSILON {
            texture.filter_mode = FilterMode::Bilinear;
        }
        Some(texture)
    }

    /// Read a texture, picking a high density variant when scaling up.
    ///
    /// `none` reads as `None`. Textures that cannot be loaded read as
    /// [`Texture::placeholder`].
    #[must_use]
    pub fn read_texture(&self, index: usize) -> Option<Texture> {
        let v = self.value(index)?;
        let values = v.sheet.values();
        match v.handle.value_type {
            StyleValueType::Keyword if self.is_keyword(index, StyleValueKeyword::None) => None,
            StyleValueType::ResourcePath | StyleValueType::AssetReference => {
                let path = self.resource_path(v)?;
                Some(load_texture_or_placeholder(self.loader, path, self.options.dpi_scaling))
            }
            StyleValueType::MissingAssetReference => {
                let _ = self.resource_path(v);
                Some(Texture::placeholder())
            }
            StyleValueType::ScalableImage => {
                let image = values.read_scalable_image(v.handle)?;
                Some(
                    self.load_scalable(&image.normal_image, &image.high_resolution_image)
                        .unwrap_or_else(|| {
                            warn_once("Style", &format!("texture '{}' not found", image.normal_image));
                            Texture::placeholder()
                        }),
                )
            }
            _ => {
                self.mismatch(index, "a texture");
                None
            }
        }
    }

    /// Read `background-image`: a texture, else a vector image at the same path.
    #[must_use]
    pub fn read_background(&self, index: usize) -> Background {
        let Some(v) = self.value(index) else {
            return Background::None;
        };
        match v.handle.value_type {
            StyleValueType::Keyword if self.is_keyword(index, StyleValueKeyword::None) => Background::None,
            StyleValueType::ResourcePath | StyleValueType::AssetReference => {
                let Some(path) = self.resource_path(v) else {
                    return Background::None;
                };
                if let Some(texture) = load_texture_for_scale(self.loader, path, self.options.dpi_scaling) {
                    return Background::Texture(texture);
                }
                if let Some(image) = self.loader.load_vector_image(path) {
                    return Background::VectorImage(image);
                }
                warn_once("Style", &format!("background image '{path}' not found"));
                Background::Texture(Texture::placeholder())
            }
            StyleValueType::MissingAssetReference | StyleValueType::ScalableImage => self
                .read_texture(index)
                .map_or(Background::None, Background::Texture),
            _ => {
                self.mismatch(index, "an image");
                Background::None
            }
        }
    }

    /// Read `cursor`: a built-in shape, or a texture with an optional hotspot.
    #[must_use]
    pub fn read_cursor(&self) -> Cursor {
        match self.value_type(0) {
            Some(StyleValueType::Enum | StyleValueType::String) => Cursor {
                default_cursor: self.read_enum::<CursorKind>(0),
                ..Cursor::default()
            },
            Some(_) => {
                let hotspot = if self.value_count() >= 3 {
                    (self.read_float(1), self.read_float(2))
                } else {
                    (0.0, 0.0)
                };
                Cursor {
                    texture: self.read_texture(0),
                    hotspot,
                    default_cursor: CursorKind::default(),
                }
            }
            None => Cursor::default(),
        }
    }
}
