use std::sync::Arc;

use super::values::{
    Dimension, DimensionUnit, ScalableImage, StyleValueFunction, StyleValueHandle,
    StyleValueKeyword, StyleValueType, ValueStore,
};
use super::{CUSTOM_PROPERTY_PREFIX, StyleProperty, StyleRule, StyleSheet};
use crate::error::StyleSheetError;
use crate::selector::{StyleComplexSelector, StyleSelector, parse_selector_list};
use crate::style::Color;

/// Builds a [`StyleSheet`] from pre-tokenized rules.
///
/// Calls chain by value. Mistakes are remembered and the first one is
/// returned by [`build`](Self::build).
///
/// ```
/// use weft_style::{Color, StyleSheetBuilder};
///
/// let sheet = StyleSheetBuilder::new()
///     .rule(".box > Label")
///     .property("--accent").color(Color::RED)
///     .property("color").var_with_fallback("--accent").ident("blue").end_var()
///     .property("margin").px(4.0).px(8.0)
///     .build()
///     .unwrap();
/// assert_eq!(sheet.rules().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StyleSheetBuilder {
    values: ValueStore,
    rules: Vec<StyleRule>,
    selectors: Vec<StyleComplexSelector>,
    imports: Vec<Arc<StyleSheet>>,
    is_default: bool,
    current_rule: Option<StyleRule>,
    current_property: Option<StyleProperty>,
    // (argument count handle, position of that handle in the property's values)
    open_vars: Vec<(StyleValueHandle, usize)>,
    line: u32,
    error: Option<StyleSheetError>,
}

impl StyleSheetBuilder {
    /// Start an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, error: StyleSheetError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn next_line(&mut self) -> u32 {
        self.line += 1;
        self.line
    }

    fn finish_property(&mut self) {
        let Some(property) = self.current_property.take() else {
            return;
        };
        if !self.open_vars.is_empty() {
            self.open_vars.clear();
            self.fail(StyleSheetError::UnclosedVarFunction {
                property: property.name.clone(),
            });
        }
        if let Some(rule) = self.current_rule.as_mut() {
            rule.properties.push(property);
        }
    }

    fn finish_rule(&mut self) {
        self.finish_property();
        if let Some(rule) = self.current_rule.take() {
            self.rules.push(rule);
        }
    }

    fn push(&mut self, handle: StyleValueHandle) {
        match self.current_property.as_mut() {
            Some(property) => property.values.push(handle),
            None => self.fail(StyleSheetError::ValueOutsideProperty),
        }
    }

    /// Mark the sheet as a base sheet.
    #[must_use]
    pub fn default_style_sheet(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Add an import. Imports are matched before the importing sheet.
    #[must_use]
    pub fn import(mut self, sheet: Arc<StyleSheet>) -> Self {
        self.imports.push(sheet);
        self
    }

    /// Start a rule selected by a comma-separated selector list.
    #[must_use]
    pub fn rule(self, selector_text: &str) -> Self {
        match parse_selector_list(selector_text) {
            Ok(list) => self.rule_with_selectors(list),
            Err(error) => {
                let mut this = self.rule_with_selectors(Vec::new());
                this.fail(error);
                this
            }
        }
    }

    /// Start a rule selected by already-built selectors, each a list of
    /// compounds from left to right.
    #[must_use]
    pub fn rule_with_selectors(mut self, selectors: Vec<Vec<StyleSelector>>) -> Self {
        self.finish_rule();
        let rule_index = self.rules.len();
        self.selectors.extend(
            selectors
                .into_iter()
                .map(|compounds| StyleComplexSelector::new(compounds, rule_index)),
        );
        let line = self.next_line();
        self.current_rule = Some(StyleRule {
            line,
            ..StyleRule::default()
        });
        self
    }

    /// Start a declaration in the current rule.
    #[must_use]
    pub fn property(mut self, name: &str) -> Self {
        self.finish_property();
        if self.current_rule.is_none() {
            self.fail(StyleSheetError::PropertyOutsideRule {
                name: name.to_string(),
            });
            return self;
        }
        let line = self.next_line();
        self.current_property = Some(StyleProperty {
            name: name.to_string(),
            line,
            values: Vec::new(),
            requires_variable_resolution: false,
        });
        self
    }

    /// Append a keyword.
    #[must_use]
    pub fn keyword(mut self, keyword: StyleValueKeyword) -> Self {
        self.push(StyleValueHandle::keyword(keyword));
        self
    }

    /// Append an identifier: a keyword if it names one, an enum value otherwise.
    #[must_use]
    pub fn ident(mut self, ident: &str) -> Self {
        let handle = match ident.parse::<StyleValueKeyword>() {
            Ok(keyword) => StyleValueHandle::keyword(keyword),
            Err(_) => self.values.push_string(StyleValueType::Enum, ident),
        };
        self.push(handle);
        self
    }

    /// Append a bare number.
    #[must_use]
    pub fn float(mut self, value: f32) -> Self {
        let handle = self.values.push_float(value);
        self.push(handle);
        self
    }

    /// Append a number with a unit.
    #[must_use]
    pub fn dimension(mut self, value: f32, unit: DimensionUnit) -> Self {
        let handle = self.values.push_dimension(Dimension::new(value, unit));
        self.push(handle);
        self
    }

    /// Append a pixel length.
    #[must_use]
    pub fn px(self, value: f32) -> Self {
        self.dimension(value, DimensionUnit::Pixel)
    }

    /// Append a percentage.
    #[must_use]
    pub fn percent(self, value: f32) -> Self {
        self.dimension(value, DimensionUnit::Percent)
    }

    /// Append a color literal.
    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        let handle = self.values.push_color(color);
        self.push(handle);
        self
    }

    /// Append a quoted string.
    #[must_use]
    pub fn string(mut self, value: &str) -> Self {
        let handle = self.values.push_string(StyleValueType::String, value);
        self.push(handle);
        self
    }

    /// Append a resource path (`resource("...")`).
    #[must_use]
    pub fn resource(mut self, path: &str) -> Self {
        let handle = self.values.push_string(StyleValueType::ResourcePath, path);
        self.push(handle);
        self
    }

    /// Append an asset reference (`url("...")`).
    #[must_use]
    pub fn asset(mut self, path: &str) -> Self {
        let handle = self.values.push_asset(StyleValueType::AssetReference, path);
        self.push(handle);
        self
    }

    /// Append an asset reference whose target is known to be missing.
    #[must_use]
    pub fn missing_asset(mut self, path: &str) -> Self {
        let handle = self
            .values
            .push_asset(StyleValueType::MissingAssetReference, path);
        self.push(handle);
        self
    }

    /// Append an image with a high-density variant.
    #[must_use]
    pub fn scalable_image(mut self, normal: &str, high_resolution: &str) -> Self {
        let handle = self.values.push_scalable_image(ScalableImage {
            normal_image: normal.to_string(),
            high_resolution_image: high_resolution.to_string(),
        });
        self.push(handle);
        self
    }

    /// Append an argument separator.
    #[must_use]
    pub fn comma(mut self) -> Self {
        self.push(StyleValueHandle::new(StyleValueType::CommaSeparator, 0));
        self
    }

    /// Append `var(name)`.
    #[must_use]
    pub fn var(self, name: &str) -> Self {
        self.begin_var(name).end_var()
    }

    /// Open `var(name, ` and append the separator. Values added until the
    /// matching [`end_var`](Self::end_var) form the fallback.
    #[must_use]
    pub fn var_with_fallback(self, name: &str) -> Self {
        self.begin_var(name).comma()
    }

    /// Open `var(name` without a separator.
    #[must_use]
    pub fn begin_var(mut self, name: &str) -> Self {
        if !name.starts_with(CUSTOM_PROPERTY_PREFIX) {
            self.fail(StyleSheetError::InvalidVariableName {
                name: name.to_string(),
            });
        }
        self.push(StyleValueHandle::new(
            StyleValueType::Function,
            StyleValueFunction::Var as usize,
        ));
        let count = self.values.push_float(0.0);
        self.push(count);
        let variable = self.values.push_string(StyleValueType::Variable, name);
        self.push(variable);
        if let Some(property) = self.current_property.as_mut() {
            property.requires_variable_resolution = true;
            // The name handle was just pushed after the count handle.
            let count_position = property.values.len() - 2;
            self.open_vars.push((count, count_position));
        }
        self
    }

    /// Close the innermost open `var()`, recording its argument count.
    #[must_use]
    pub fn end_var(mut self) -> Self {
        let Some((count, count_position)) = self.open_vars.pop() else {
            self.fail(StyleSheetError::UnbalancedVarFunction);
            return self;
        };
        let len = self.current_property.as_ref().map_or(0, |p| p.values.len());
        #[allow(clippy::cast_precision_loss)]
        let argc = (len - count_position - 1) as f32;
        self.values.set_float(count, argc);
        self
    }

    /// Finish the sheet.
    ///
    /// # Errors
    ///
    /// Returns the first mistake made while building: an invalid selector, a
    /// value or property outside its container, or an unbalanced `var()`.
    pub fn build(mut self) -> Result<StyleSheet, StyleSheetError> {
        self.finish_rule();
        if let Some(error) = self.error {
            return Err(error);
        }
        let mut sheet = StyleSheet::new(self.rules, self.selectors, self.values);
        sheet.set_imports(self.imports);
        if self.is_default {
            sheet.set_default_style_sheet(true);
        }
        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles(sheet: &StyleSheet) -> &[StyleValueHandle] {
        &sheet.rules()[0].properties[0].values
    }

    #[test]
    fn test_var_without_fallback_encoding() {
        let sheet = StyleSheetBuilder::new()
            .rule("*")
            .property("width")
            .var("--w")
            .build()
            .unwrap();
        let values = handles(&sheet);
        assert_eq!(values.len(), 3);
        assert!(values[0].is_var_function());
        assert!((sheet.values().read_float(values[1]) - 1.0).abs() < f32::EPSILON);
        assert_eq!(sheet.values().read_variable(values[2]), "--w");
        assert!(sheet.rules()[0].properties[0].requires_variable_resolution);
    }

    #[test]
    fn test_var_with_fallback_counts_nested_tokens() {
        let sheet = StyleSheetBuilder::new()
            .rule("*")
            .property("margin")
            .var_with_fallback("--m")
            .px(1.0)
            .var("--n")
            .end_var()
            .build()
            .unwrap();
        let values = handles(&sheet);
        // var, argc, --m, ',', 1px, var, argc, --n
        assert_eq!(values.len(), 8);
        assert!((sheet.values().read_float(values[1]) - 6.0).abs() < f32::EPSILON);
        assert!((sheet.values().read_float(values[6]) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ident_recognizes_keywords() {
        let sheet = StyleSheetBuilder::new()
            .rule("*")
            .property("display")
            .ident("none")
            .ident("flex")
            .build()
            .unwrap();
        let values = handles(&sheet);
        assert_eq!(values[0].value_type, StyleValueType::Keyword);
        assert_eq!(values[1].value_type, StyleValueType::Enum);
    }

    #[test]
    fn test_custom_property_count() {
        let sheet = StyleSheetBuilder::new()
            .rule(".a")
            .property("--x")
            .px(1.0)
            .property("width")
            .px(2.0)
            .property("--y")
            .px(3.0)
            .build()
            .unwrap();
        assert_eq!(sheet.rules()[0].custom_properties_count, 2);
    }

    #[test]
    fn test_selector_list_shares_rule() {
        let sheet = StyleSheetBuilder::new()
            .rule(".a, .b")
            .property("width")
            .px(1.0)
            .rule(".c")
            .build()
            .unwrap();
        let selectors = sheet.complex_selectors();
        assert_eq!(selectors.len(), 3);
        assert_eq!(selectors[0].rule_index(), 0);
        assert_eq!(selectors[1].rule_index(), 0);
        assert_eq!(selectors[2].rule_index(), 1);
        assert_eq!(selectors[2].order_in_style_sheet(), 2);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            StyleSheetBuilder::new().rule("> a").build(),
            Err(StyleSheetError::InvalidSelector { .. })
        ));
        assert_eq!(
            StyleSheetBuilder::new().property("width").build().unwrap_err(),
            StyleSheetError::PropertyOutsideRule {
                name: "width".into()
            }
        );
        assert_eq!(
            StyleSheetBuilder::new().rule("*").px(1.0).build().unwrap_err(),
            StyleSheetError::ValueOutsideProperty
        );
        assert!(matches!(
            StyleSheetBuilder::new()
                .rule("*")
                .property("width")
                .var_with_fallback("--w")
                .build(),
            Err(StyleSheetError::UnclosedVarFunction { .. })
        ));
        assert_eq!(
            StyleSheetBuilder::new()
                .rule("*")
                .property("width")
                .end_var()
                .build()
                .unwrap_err(),
            StyleSheetError::UnbalancedVarFunction
        );
        assert!(matches!(
            StyleSheetBuilder::new().rule("*").property("width").var("w").build(),
            Err(StyleSheetError::InvalidVariableName { .. })
        ));
    }
}
