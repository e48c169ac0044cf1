//! Integration tests for custom properties and `var()` resolution.

use weft_style::variables::DEFAULT_MAX_RESOLVES;
use weft_style::{
    Color, ResolveResult, StyleSheet, StyleSheetBuilder, StyleValueType, Variable, VariableContext,
    VariableResolver,
};

/// Collect every `--` declaration of the sheet into a context, in order.
fn context(sheet: &StyleSheet) -> VariableContext<'_> {
    let mut context = VariableContext::new();
    for rule in sheet.rules() {
        for property in rule.properties.iter().filter(|p| p.is_custom_property()) {
            context.add(Variable::from_property(sheet, property));
        }
    }
    context
}

/// Resolve the first non-custom property of the sheet.
fn resolve(sheet: &StyleSheet) -> (ResolveResult, Vec<StyleValueType>) {
    let context = context(sheet);
    let property = sheet
        .rules()
        .iter()
        .flat_map(|r| r.properties.iter())
        .find(|p| !p.is_custom_property())
        .unwrap();
    let mut resolver = VariableResolver::new(&context, DEFAULT_MAX_RESOLVES);
    let result = resolver.resolve_property(sheet, property);
    let types = resolver
        .resolved_values()
        .iter()
        .map(|v| v.handle.value_type)
        .collect();
    (result, types)
}

#[test]
fn test_simple_substitution() {
    let sheet = StyleSheetBuilder::new()
        .rule("*")
        .property("--accent")
        .color(Color::BLUE)
        .property("color")
        .var("--accent")
        .build()
        .unwrap();
    let (result, types) = resolve(&sheet);
    assert_eq!(result, ResolveResult::Valid);
    assert_eq!(types, vec![StyleValueType::Color]);
}

#[test]
fn test_self_reference_is_not_found() {
    let sheet = StyleSheetBuilder::new()
        .rule("*")
        .property("--x")
        .var("--x")
        .property("color")
        .var("--x")
        .build()
        .unwrap();
    let (result, types) = resolve(&sheet);
    assert_eq!(result, ResolveResult::NotFound);
    assert!(types.is_empty());
}

#[test]
fn test_mutual_cycle_uses_fallback() {
    let sheet = StyleSheetBuilder::new()
        .rule("*")
        .property("--a")
        .var("--b")
        .property("--b")
        .var("--a")
        .property("color")
        .var_with_fallback("--a")
        .color(Color::RED)
        .end_var()
        .build()
        .unwrap();
    let (result, types) = resolve(&sheet);
    assert_eq!(result, ResolveResult::Valid);
    assert_eq!(types, vec![StyleValueType::Color]);
}

#[test]
fn test_fallback_only_when_not_found() {
    let missing = StyleSheetBuilder::new()
        .rule("*")
        .property("width")
        .var_with_fallback("--size")
        .px(10.0)
        .end_var()
        .build()
        .unwrap();
    assert_eq!(resolve(&missing), (ResolveResult::Valid, vec![StyleValueType::Dimension]));

    // the variable exists but a color is no width: the fallback is not used
    let invalid = StyleSheetBuilder::new()
        .rule("*")
        .property("--size")
        .color(Color::RED)
        .property("width")
        .var_with_fallback("--size")
        .px(10.0)
        .end_var()
        .build()
        .unwrap();
    assert_eq!(resolve(&invalid).0, ResolveResult::Invalid);
}

#[test]
fn test_nested_fallbacks() {
    let sheet = StyleSheetBuilder::new()
        .rule("*")
        .property("--second")
        .px(4.0)
        .property("width")
        .var_with_fallback("--first")
        .var_with_fallback("--second")
        .px(1.0)
        .end_var()
        .end_var()
        .build()
        .unwrap();
    let context = context(&sheet);
    let property = &sheet.rules()[0].properties[1];
    let mut resolver = VariableResolver::new(&context, DEFAULT_MAX_RESOLVES);
    assert_eq!(resolver.resolve_property(&sheet, property), ResolveResult::Valid);
    let values = resolver.resolved_values();
    assert_eq!(values.len(), 1);
    let width = values[0].sheet.values().read_dimension(values[0].handle);
    assert!((width.value - 4.0).abs() < f32::EPSILON);
}

#[test]
fn test_most_recent_declaration_wins() {
    let sheet = StyleSheetBuilder::new()
        .rule("*")
        .property("--accent")
        .color(Color::RED)
        .rule("*")
        .property("--accent")
        .color(Color::BLUE)
        .property("color")
        .var("--accent")
        .build()
        .unwrap();
    let context = context(&sheet);
    let property = &sheet.rules()[1].properties[1];
    let mut resolver = VariableResolver::new(&context, DEFAULT_MAX_RESOLVES);
    assert_eq!(resolver.resolve_property(&sheet, property), ResolveResult::Valid);
    let value = resolver.resolved_values()[0];
    assert_eq!(value.sheet.values().read_color(value.handle), Color::BLUE);
}

#[test]
fn test_arity_checked_after_expansion() {
    let sheet = StyleSheetBuilder::new()
        .rule("*")
        .property("--pair")
        .px(1.0)
        .px(2.0)
        .property("width")
        .var("--pair")
        .build()
        .unwrap();
    assert_eq!(resolve(&sheet).0, ResolveResult::Invalid);

    let margin = StyleSheetBuilder::new()
        .rule("*")
        .property("--pair")
        .px(1.0)
        .px(2.0)
        .property("margin")
        .var("--pair")
        .build()
        .unwrap();
    assert_eq!(resolve(&margin).0, ResolveResult::Valid);
}

#[test]
fn test_variables_chain_through_other_variables() {
    let sheet = StyleSheetBuilder::new()
        .rule("*")
        .property("--base")
        .px(2.0)
        .property("--gap")
        .var("--base")
        .var("--base")
        .property("padding")
        .var("--gap")
        .px(3.0)
        .build()
        .unwrap();
    let (result, types) = resolve(&sheet);
    assert_eq!(result, ResolveResult::Valid);
    assert_eq!(types.len(), 3);
}

#[test]
fn test_expansion_cap_stops_exponential_growth() {
    // each level doubles the previous one: 2^8 tokens at the top
    let mut builder = StyleSheetBuilder::new().rule("*").property("--v0").px(1.0);
    for level in 1..=8 {
        let previous = format!("--v{}", level - 1);
        builder = builder
            .property(&format!("--v{level}"))
            .var(&previous)
            .var(&previous);
    }
    let sheet = builder.property("--out").var("--v8").build().unwrap();
    let (result, _) = resolve_custom(&sheet, "--out");
    assert_eq!(result, ResolveResult::Invalid);
}

fn resolve_custom(sheet: &StyleSheet, name: &str) -> (ResolveResult, usize) {
    let context = context(sheet);
    let property = sheet.rules()[0]
        .properties
        .iter()
        .find(|p| p.name == name)
        .unwrap();
    let mut resolver = VariableResolver::new(&context, DEFAULT_MAX_RESOLVES);
    let result = resolver.resolve_property(sheet, property);
    (result, resolver.resolved_values().len())
}

#[test]
fn test_custom_properties_accept_any_tokens() {
    let sheet = StyleSheetBuilder::new()
        .rule("*")
        .property("--mixed")
        .color(Color::RED)
        .px(3.0)
        .ident("bold")
        .property("--copy")
        .var("--mixed")
        .build()
        .unwrap();
    assert_eq!(resolve_custom(&sheet, "--copy"), (ResolveResult::Valid, 3));
}
