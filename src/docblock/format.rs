//! Type, parameter, and default-value formatting for annotation lines.
//!
//! Generated annotations use the shortest form the target file can resolve:
//! a class imported via `use` renders as its short name (or alias), anything
//! else as a leading-backslash FQN. Builtins pass through unchanged.

use crate::types::{DefaultValue, ParameterInfo, Relation};

/// Type names that never participate in import shortening. Includes the
/// relative keywords (`self`, `parent`, `static`), which are only meaningful
/// as written.
const PASSTHROUGH_TYPES: &[&str] = &[
    "string", "int", "float", "bool", "array", "object", "mixed", "void", "null", "callable",
    "iterable", "self", "parent", "static",
];

/// Format a parameter list for an annotation line: `Type $name = default`
/// entries joined with `", "`.
///
/// Variadic and by-reference markers are deliberately not rendered; the
/// annotation describes the call shape IDEs complete against.
pub fn format_parameters(parameters: &[ParameterInfo], usings: &[Relation]) -> String {
    let mut rendered = Vec::with_capacity(parameters.len());

    for parameter in parameters {
        let mut param = String::new();

        if !parameter.raw_type.is_empty() {
            param.push_str(&format_type_with_imports(&parameter.raw_type, usings));
            param.push(' ');
        }

        param.push('$');
        param.push_str(&parameter.name);

        if let Some(default) = &parameter.default {
            param.push_str(" = ");
            param.push_str(&format_default_value(default));
        }

        rendered.push(param);
    }

    rendered.join(", ")
}

/// Format a return-type union.
///
/// An empty union renders as `mixed`. Nullable members expand to
/// `member|null`; duplicates are dropped, first-seen order is kept.
pub fn format_return_type(return_types: &[Relation], usings: &[Relation]) -> String {
    if return_types.is_empty() {
        return "mixed".to_string();
    }

    let mut members: Vec<String> = Vec::new();
    for return_type in return_types {
        let formatted = format_single_type(return_type, usings);

        if return_type.is_nullable && return_type.name != "null" {
            members.push(formatted);
            members.push("null".to_string());
        } else {
            members.push(formatted);
        }
    }

    let mut seen = Vec::new();
    for member in members {
        if !seen.contains(&member) {
            seen.push(member);
        }
    }

    seen.join("|")
}

/// Format a raw type string (possibly `?`-prefixed, possibly a union) for an
/// annotation, shortening class names through the import table.
pub fn format_type_with_imports(raw_type: &str, usings: &[Relation]) -> String {
    let is_nullable = raw_type.starts_with('?');
    let clean = raw_type.trim_start_matches('?');

    let formatted = clean
        .split('|')
        .map(|member| format_single_type_string(member.trim(), usings))
        .collect::<Vec<_>>()
        .join("|");

    if is_nullable {
        format!("?{}", formatted)
    } else {
        formatted
    }
}

/// Format one type name: passthrough keywords and already-short names stay
/// as-is; qualified names shorten to the import's alias or short name on an
/// exact match, or render fully qualified with a leading backslash.
fn format_single_type_string(type_name: &str, usings: &[Relation]) -> String {
    if PASSTHROUGH_TYPES
        .iter()
        .any(|b| type_name.eq_ignore_ascii_case(b))
    {
        return type_name.to_string();
    }

    if !type_name.contains('\\') {
        return type_name.to_string();
    }

    let trimmed = type_name.trim_start_matches('\\');
    let (namespace, class_name) = match trimmed.rfind('\\') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => ("", trimmed),
    };

    for using in usings {
        let imported_namespace = using
            .namespace
            .as_deref()
            .unwrap_or("")
            .trim_start_matches('\\');

        if using.name == class_name && imported_namespace == namespace {
            return using.alias.clone().unwrap_or_else(|| class_name.to_string());
        }
    }

    format!("\\{}", trimmed)
}

/// Format a single union-member relation.
fn format_single_type(relation: &Relation, usings: &[Relation]) -> String {
    if relation.is_builtin {
        return relation.name.clone();
    }

    format_single_type_string(&relation.full_name(), usings)
}

/// Render a default value the way it should read in an annotation.
///
/// Array defaults always render as `[]`; the annotation records that a
/// default exists, not its contents.
pub fn format_default_value(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Null => "null".to_string(),
        DefaultValue::Bool(true) => "true".to_string(),
        DefaultValue::Bool(false) => "false".to_string(),
        DefaultValue::Str(s) => format!("'{}'", add_slashes(s)),
        DefaultValue::Array => "[]".to_string(),
        DefaultValue::Expr(text) => text.clone(),
    }
}

/// Backslash-escape quotes and backslashes for a single-quoted literal.
fn add_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || c == '\'' || c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::parse_union_type;

    fn import(full: &str, alias: Option<&str>) -> Relation {
        Relation::from_full_name(full, alias.map(str::to_string))
    }

    fn param(name: &str, raw_type: &str, default: Option<DefaultValue>) -> ParameterInfo {
        ParameterInfo {
            name: name.to_string(),
            raw_type: raw_type.to_string(),
            types: parse_union_type(raw_type),
            is_optional: default.is_some(),
            is_variadic: false,
            is_by_reference: false,
            default,
            position: 0,
        }
    }

    #[test]
    fn empty_union_renders_mixed() {
        assert_eq!(format_return_type(&[], &[]), "mixed");
    }

    #[test]
    fn nullable_return_expands_to_null_member() {
        assert_eq!(format_return_type(&parse_union_type("?string"), &[]), "string|null");
    }

    #[test]
    fn union_members_keep_order_and_dedupe() {
        assert_eq!(
            format_return_type(&parse_union_type("string|bool"), &[]),
            "string|bool"
        );
        // `?string|null` would expand to string|null|null without dedup
        assert_eq!(
            format_return_type(&parse_union_type("?string|null"), &[]),
            "string|null"
        );
    }

    #[test]
    fn imported_class_shortens_to_its_name() {
        let usings = vec![import("App\\Models\\User", None)];
        assert_eq!(
            format_return_type(&parse_union_type("App\\Models\\User"), &usings),
            "User"
        );
    }

    #[test]
    fn aliased_import_shortens_to_the_alias() {
        let usings = vec![import("App\\Models\\Order", Some("Purchase"))];
        assert_eq!(
            format_type_with_imports("App\\Models\\Order", &usings),
            "Purchase"
        );
    }

    #[test]
    fn unimported_class_renders_fully_qualified() {
        assert_eq!(
            format_type_with_imports("App\\Models\\User", &[]),
            "\\App\\Models\\User"
        );
    }

    #[test]
    fn nullable_parameter_type_keeps_question_mark() {
        assert_eq!(format_type_with_imports("?string", &[]), "?string");
        let usings = vec![import("App\\Models\\User", None)];
        assert_eq!(
            format_type_with_imports("?App\\Models\\User", &usings),
            "?User"
        );
    }

    #[test]
    fn parameters_render_types_names_and_defaults() {
        let params = vec![
            param("default", "string", Some(DefaultValue::Str("test".to_string()))),
            param("can_null", "?string", Some(DefaultValue::Null)),
            param("arr", "array", Some(DefaultValue::Array)),
        ];
        assert_eq!(
            format_parameters(&params, &[]),
            "string $default = 'test', ?string $can_null = null, array $arr = []"
        );
    }

    #[test]
    fn untyped_parameter_renders_mixed() {
        let params = vec![param("anything", "mixed", None)];
        assert_eq!(format_parameters(&params, &[]), "mixed $anything");
    }

    #[test]
    fn default_values_render_literal_shapes() {
        assert_eq!(format_default_value(&DefaultValue::Null), "null");
        assert_eq!(format_default_value(&DefaultValue::Bool(true)), "true");
        assert_eq!(format_default_value(&DefaultValue::Bool(false)), "false");
        assert_eq!(
            format_default_value(&DefaultValue::Str("it's".to_string())),
            "'it\\'s'"
        );
        assert_eq!(format_default_value(&DefaultValue::Array), "[]");
        assert_eq!(
            format_default_value(&DefaultValue::Expr("PHP_EOL".to_string())),
            "PHP_EOL"
        );
    }
}
