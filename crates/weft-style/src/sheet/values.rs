//! Flat typed value storage owned by a stylesheet.
//!
//! A property's value list is a sequence of [`StyleValueHandle`]s. Each handle
//! names a value kind and an index into the matching array of the
//! [`ValueStore`]. Keywords, functions and argument counts of `var()` are
//! encoded directly in the handle index or in the float array.
//!
//! Reading a handle with the wrong accessor is a recoverable error: it logs a
//! warning and returns the kind's default value.

use std::hash::{Hash, Hasher};

use serde::Serialize;
use strum_macros::{EnumString, FromRepr, IntoStaticStr};
use weft_common::warning::warn_once;

use crate::style::Color;

/// The kind of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StyleValueType {
    /// Global or property keyword, index is a [`StyleValueKeyword`].
    Keyword,
    /// Bare number, in the float array.
    Float,
    /// Number with unit, in the dimension array.
    Dimension,
    /// Color literal, in the color array.
    Color,
    /// Path to a resource, in the string array.
    ResourcePath,
    /// Reference to an imported asset, in the asset array.
    AssetReference,
    /// Identifier that is not a global keyword, in the string array.
    Enum,
    /// Custom property name inside `var()`, in the string array.
    Variable,
    /// Quoted string, in the string array.
    String,
    /// Function call head, index is a [`StyleValueFunction`].
    Function,
    /// `,` between arguments.
    CommaSeparator,
    /// Image with normal and high-density variants, in the scalable image array.
    ScalableImage,
    /// Asset reference whose target could not be found at import time.
    MissingAssetReference,
}

/// A typed index into a [`ValueStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleValueHandle {
    /// What kind of value this is.
    pub value_type: StyleValueType,
    /// Index into the array for `value_type`.
    pub value_index: usize,
}

impl StyleValueHandle {
    /// Build a handle.
    #[must_use]
    pub const fn new(value_type: StyleValueType, value_index: usize) -> Self {
        Self {
            value_type,
            value_index,
        }
    }

    /// A keyword handle, which needs no storage.
    #[must_use]
    pub const fn keyword(keyword: StyleValueKeyword) -> Self {
        Self::new(StyleValueType::Keyword, keyword as usize)
    }

    /// Returns `true` if this handle is the head of a `var()` call.
    #[must_use]
    pub const fn is_var_function(&self) -> bool {
        matches!(self.value_type, StyleValueType::Function)
            && self.value_index == StyleValueFunction::Var as usize
    }
}

/// Keywords stored inline in a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, FromRepr)]
#[strum(serialize_all = "lowercase")]
pub enum StyleValueKeyword {
    /// Take the parent's value.
    Inherit,
    /// Take the property's initial value.
    Initial,
    /// `auto`.
    Auto,
    /// Inherit for inherited properties, initial otherwise.
    Unset,
    /// `true`.
    True,
    /// `false`.
    False,
    /// `none`.
    None,
}

impl StyleValueKeyword {
    /// The keyword as written in a stylesheet.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Function heads stored inline in a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
pub enum StyleValueFunction {
    /// A function this engine does not evaluate.
    Unknown,
    /// `var(--name)` or `var(--name, fallback...)`.
    Var,
}

/// Units a [`Dimension`] may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DimensionUnit {
    /// No unit.
    #[default]
    Unitless,
    /// `px`.
    Pixel,
    /// `%`.
    Percent,
}

/// A number with a unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Dimension {
    /// The number.
    pub value: f32,
    /// The unit.
    pub unit: DimensionUnit,
}

impl Dimension {
    /// Build a dimension.
    #[must_use]
    pub const fn new(value: f32, unit: DimensionUnit) -> Self {
        Self { value, unit }
    }
}

/// An image asset with an optional high-density variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ScalableImage {
    /// Path used at scale 1.
    pub normal_image: String,
    /// Path used when the display scale is above 1. Empty if absent.
    pub high_resolution_image: String,
}

/// Typed value arrays of one stylesheet.
#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    pub(crate) floats: Vec<f32>,
    pub(crate) dimensions: Vec<Dimension>,
    pub(crate) colors: Vec<Color>,
    pub(crate) strings: Vec<String>,
    pub(crate) assets: Vec<String>,
    pub(crate) scalable_images: Vec<ScalableImage>,
}

impl ValueStore {
    fn check_access(handle: StyleValueHandle, expected: &[StyleValueType]) -> bool {
        if expected.contains(&handle.value_type) {
            return true;
        }
        warn_once(
            "Style",
            &format!(
                "trying to read value of type {:?} while reading a value of type {expected:?}",
                handle.value_type
            ),
        );
        false
    }

    fn index<T: Clone>(values: &[T], handle: StyleValueHandle) -> Option<&T> {
        let value = values.get(handle.value_index);
        if value.is_none() {
            warn_once(
                "Style",
                &format!(
                    "{:?} value index {} is out of range",
                    handle.value_type, handle.value_index
                ),
            );
        }
        value
    }

    /// Read a keyword.
    #[must_use]
    pub fn read_keyword(&self, handle: StyleValueHandle) -> StyleValueKeyword {
        if !Self::check_access(handle, &[StyleValueType::Keyword]) {
            return StyleValueKeyword::Initial;
        }
        StyleValueKeyword::from_repr(handle.value_index).unwrap_or(StyleValueKeyword::Initial)
    }

    /// Read a number. Dimensions yield their numeric part.
    #[must_use]
    pub fn read_float(&self, handle: StyleValueHandle) -> f32 {
        match handle.value_type {
            StyleValueType::Dimension => self.read_dimension(handle).value,
            _ if Self::check_access(handle, &[StyleValueType::Float]) => {
                Self::index(&self.floats, handle).copied().unwrap_or_default()
            }
            _ => 0.0,
        }
    }

    /// Read a dimension. Bare numbers read as unitless dimensions.
    #[must_use]
    pub fn read_dimension(&self, handle: StyleValueHandle) -> Dimension {
        match handle.value_type {
            StyleValueType::Float => Dimension::new(self.read_float(handle), DimensionUnit::Unitless),
            _ if Self::check_access(handle, &[StyleValueType::Dimension]) => {
                Self::index(&self.dimensions, handle)
                    .copied()
                    .unwrap_or_default()
            }
            _ => Dimension::default(),
        }
    }

    /// Read a color literal.
    #[must_use]
    pub fn read_color(&self, handle: StyleValueHandle) -> Color {
        if !Self::check_access(handle, &[StyleValueType::Color]) {
            return Color::TRANSPARENT;
        }
        Self::index(&self.colors, handle).copied().unwrap_or_default()
    }

    fn read_from_strings(&self, handle: StyleValueHandle, expected: StyleValueType) -> &str {
        if !Self::check_access(handle, &[expected]) {
            return "";
        }
        Self::index(&self.strings, handle).map_or("", String::as_str)
    }

    /// Read a quoted string.
    #[must_use]
    pub fn read_string(&self, handle: StyleValueHandle) -> &str {
        self.read_from_strings(handle, StyleValueType::String)
    }

    /// Read an identifier.
    #[must_use]
    pub fn read_enum(&self, handle: StyleValueHandle) -> &str {
        self.read_from_strings(handle, StyleValueType::Enum)
    }

    /// Read the custom property name of a `var()` argument.
    #[must_use]
    pub fn read_variable(&self, handle: StyleValueHandle) -> &str {
        self.read_from_strings(handle, StyleValueType::Variable)
    }

    /// Read a resource path.
    #[must_use]
    pub fn read_resource_path(&self, handle: StyleValueHandle) -> &str {
        self.read_from_strings(handle, StyleValueType::ResourcePath)
    }

    /// Read an asset reference, found or missing.
    #[must_use]
    pub fn read_asset_reference(&self, handle: StyleValueHandle) -> &str {
        if !Self::check_access(
            handle,
            &[
                StyleValueType::AssetReference,
                StyleValueType::MissingAssetReference,
            ],
        ) {
            return "";
        }
        Self::index(&self.assets, handle).map_or("", String::as_str)
    }

    /// Read a function head.
    #[must_use]
    pub fn read_function(&self, handle: StyleValueHandle) -> StyleValueFunction {
        if !Self::check_access(handle, &[StyleValueType::Function]) {
            return StyleValueFunction::Unknown;
        }
        StyleValueFunction::from_repr(handle.value_index).unwrap_or(StyleValueFunction::Unknown)
    }

    /// Read a scalable image.
    #[must_use]
    pub fn read_scalable_image(&self, handle: StyleValueHandle) -> Option<&ScalableImage> {
        if !Self::check_access(handle, &[StyleValueType::ScalableImage]) {
            return None;
        }
        Self::index(&self.scalable_images, handle)
    }

    /// Any identifier-like value as text: keywords, enums and strings.
    #[must_use]
    pub fn read_as_string(&self, handle: StyleValueHandle) -> String {
        match handle.value_type {
            StyleValueType::Keyword => self.read_keyword(handle).as_str().to_string(),
            StyleValueType::Enum => self.read_enum(handle).to_string(),
            StyleValueType::String => self.read_string(handle).to_string(),
            StyleValueType::Variable => self.read_variable(handle).to_string(),
            StyleValueType::ResourcePath => self.read_resource_path(handle).to_string(),
            StyleValueType::Float => self.read_float(handle).to_string(),
            StyleValueType::Dimension => {
                let d = self.read_dimension(handle);
                match d.unit {
                    DimensionUnit::Unitless => d.value.to_string(),
                    DimensionUnit::Pixel => format!("{}px", d.value),
                    DimensionUnit::Percent => format!("{}%", d.value),
                }
            }
            StyleValueType::Color => self.read_color(handle).to_hex_string(),
            StyleValueType::AssetReference | StyleValueType::MissingAssetReference => {
                self.read_asset_reference(handle).to_string()
            }
            StyleValueType::ScalableImage => self
                .read_scalable_image(handle)
                .map(|i| i.normal_image.clone())
                .unwrap_or_default(),
            StyleValueType::Function => format!("{:?}", self.read_function(handle)).to_lowercase(),
            StyleValueType::CommaSeparator => ",".to_string(),
        }
    }

    pub(crate) fn push_float(&mut self, value: f32) -> StyleValueHandle {
        self.floats.push(value);
        StyleValueHandle::new(StyleValueType::Float, self.floats.len() - 1)
    }

    pub(crate) fn set_float(&mut self, handle: StyleValueHandle, value: f32) {
        if let Some(slot) = self.floats.get_mut(handle.value_index) {
            *slot = value;
        }
    }

    pub(crate) fn push_dimension(&mut self, value: Dimension) -> StyleValueHandle {
        self.dimensions.push(value);
        StyleValueHandle::new(StyleValueType::Dimension, self.dimensions.len() - 1)
    }

    pub(crate) fn push_color(&mut self, value: Color) -> StyleValueHandle {
        self.colors.push(value);
        StyleValueHandle::new(StyleValueType::Color, self.colors.len() - 1)
    }

    pub(crate) fn push_string(&mut self, value_type: StyleValueType, value: &str) -> StyleValueHandle {
        self.strings.push(value.to_string());
        StyleValueHandle::new(value_type, self.strings.len() - 1)
    }

    pub(crate) fn push_asset(&mut self, value_type: StyleValueType, path: &str) -> StyleValueHandle {
        self.assets.push(path.to_string());
        StyleValueHandle::new(value_type, self.assets.len() - 1)
    }

    pub(crate) fn push_scalable_image(&mut self, image: ScalableImage) -> StyleValueHandle {
        self.scalable_images.push(image);
        StyleValueHandle::new(StyleValueType::ScalableImage, self.scalable_images.len() - 1)
    }

    /// Feed every stored value into `state`.
    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        for f in &self.floats {
            f.to_bits().hash(state);
        }
        for d in &self.dimensions {
            d.value.to_bits().hash(state);
            d.unit.hash(state);
        }
        self.colors.hash(state);
        self.strings.hash(state);
        self.assets.hash(state);
        self.scalable_images.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_handles_need_no_storage() {
        let store = ValueStore::default();
        let handle = StyleValueHandle::keyword(StyleValueKeyword::Unset);
        assert_eq!(store.read_keyword(handle), StyleValueKeyword::Unset);
    }

    #[test]
    fn test_type_mismatch_returns_default() {
        let mut store = ValueStore::default();
        let color = store.push_color(Color::RED);
        assert!((store.read_float(color) - 0.0).abs() < f32::EPSILON);
        assert_eq!(store.read_enum(color), "");
        assert_eq!(store.read_color(color), Color::RED);
    }

    #[test]
    fn test_float_and_dimension_interchange() {
        let mut store = ValueStore::default();
        let float = store.push_float(3.0);
        let dim = store.push_dimension(Dimension::new(50.0, DimensionUnit::Percent));
        assert_eq!(
            store.read_dimension(float),
            Dimension::new(3.0, DimensionUnit::Unitless)
        );
        assert!((store.read_float(dim) - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_out_of_range_index_is_default() {
        let store = ValueStore::default();
        let handle = StyleValueHandle::new(StyleValueType::String, 7);
        assert_eq!(store.read_string(handle), "");
    }

    #[test]
    fn test_var_function_detection() {
        let head = StyleValueHandle::new(StyleValueType::Function, StyleValueFunction::Var as usize);
        assert!(head.is_var_function());
        assert!(!StyleValueHandle::keyword(StyleValueKeyword::Auto).is_var_function());
    }
}
