//! Class declaration extraction.
//!
//! Walks the AST (recursing into namespace bodies) and pulls out every
//! `class` declaration with the pieces the doc-block engine needs: methods
//! and their raw signature text, trait-use clauses, the preceding doc
//! comment, and the declaration's byte offset for in-place patching.
//!
//! Interfaces, traits, and enums are not candidates for generated `@method`
//! annotations and are skipped.

use mago_span::HasSpan;
use mago_syntax::ast::*;

use crate::types::Visibility;

use super::{DocComment, PhpClass, PhpMethod, PhpParameter};

/// Recursively walk statements and extract class declarations.
pub(crate) fn extract_classes<'a>(
    statements: impl Iterator<Item = &'a Statement<'a>>,
    classes: &mut Vec<PhpClass>,
    trivias: &[Trivia<'a>],
    content: &str,
) {
    for statement in statements {
        match statement {
            Statement::Class(class) => {
                let name = class.name.value.to_string();

                let extends = class
                    .extends
                    .as_ref()
                    .and_then(|ext| ext.types.first().map(|ident| ident.value().to_string()));

                let (methods, trait_uses) = extract_members(class.members.iter(), content);

                let decl_offset = class.span().start.offset;
                let doc_comment = doc_comment_before(trivias, content, decl_offset);

                classes.push(PhpClass {
                    name,
                    extends,
                    trait_uses,
                    methods,
                    doc_comment,
                    decl_offset,
                    is_abstract: class.modifiers.contains_abstract(),
                    is_final: class.modifiers.contains_final(),
                });
            }
            Statement::Namespace(namespace) => {
                extract_classes(namespace.statements().iter(), classes, trivias, content);
            }
            _ => {}
        }
    }
}

/// Extract methods and trait-use names from class members.
fn extract_members<'a>(
    members: impl Iterator<Item = &'a ClassLikeMember<'a>>,
    content: &str,
) -> (Vec<PhpMethod>, Vec<String>) {
    let mut methods = Vec::new();
    let mut trait_uses = Vec::new();

    for member in members {
        match member {
            ClassLikeMember::Method(method) => {
                let name = method.name.value.to_string();
                let parameters = extract_parameters(&method.parameter_list, content);
                let return_hint = method
                    .return_type_hint
                    .as_ref()
                    .map(|rth| hint_string(&rth.hint));

                methods.push(PhpMethod {
                    name,
                    visibility: extract_visibility(method.modifiers.iter()),
                    is_static: method.modifiers.iter().any(|m| m.is_static()),
                    is_abstract: method.modifiers.contains_abstract(),
                    is_final: method.modifiers.contains_final(),
                    return_hint,
                    parameters,
                });
            }
            ClassLikeMember::TraitUse(trait_use) => {
                for trait_name_ident in trait_use.trait_names.iter() {
                    trait_uses.push(trait_name_ident.value().to_string());
                }
            }
            _ => {}
        }
    }

    (methods, trait_uses)
}

/// Collect a method's parameters with their raw hint and default text.
fn extract_parameters(parameter_list: &FunctionLikeParameterList, content: &str) -> Vec<PhpParameter> {
    parameter_list
        .parameters
        .iter()
        .map(|param| {
            let raw_name = param.variable.name.to_string();
            let name = raw_name.strip_prefix('$').unwrap_or(&raw_name).to_string();

            // Keep the default expression exactly as written; the span covers
            // the whole `= <expr>` clause, so strip the assignment marker.
            let default = param.default_value.as_ref().map(|dv| {
                let span = dv.span();
                let text = content
                    .get(span.start.offset as usize..span.end.offset as usize)
                    .unwrap_or("");
                text.trim_start_matches('=').trim().to_string()
            });

            PhpParameter {
                name,
                hint: param.hint.as_ref().map(hint_string),
                is_variadic: param.ellipsis.is_some(),
                is_by_reference: param.ampersand.is_some(),
                default,
            }
        })
        .collect()
}

/// Read the visibility off a modifier list; PHP members without an explicit
/// modifier are public.
fn extract_visibility<'a>(modifiers: impl Iterator<Item = &'a Modifier<'a>>) -> Visibility {
    for m in modifiers {
        if m.is_private() {
            return Visibility::Private;
        }
        if m.is_protected() {
            return Visibility::Protected;
        }
        if m.is_public() {
            return Visibility::Public;
        }
    }
    Visibility::Public
}

/// Print a hint node the way it appears in source, rebuilding nullable,
/// union, intersection, and parenthesized forms around the leaf names.
fn hint_string(hint: &Hint) -> String {
    match hint {
        Hint::Identifier(ident) => ident.value().to_string(),
        Hint::Nullable(nullable) => {
            format!("?{}", hint_string(nullable.hint))
        }
        Hint::Union(union) => {
            let left = hint_string(union.left);
            let right = hint_string(union.right);
            format!("{}|{}", left, right)
        }
        Hint::Intersection(intersection) => {
            let left = hint_string(intersection.left);
            let right = hint_string(intersection.right);
            format!("{}&{}", left, right)
        }
        Hint::Void(ident)
        | Hint::Never(ident)
        | Hint::Float(ident)
        | Hint::Bool(ident)
        | Hint::Integer(ident)
        | Hint::String(ident)
        | Hint::Object(ident)
        | Hint::Mixed(ident)
        | Hint::Iterable(ident) => ident.value.to_string(),
        Hint::Null(keyword)
        | Hint::True(keyword)
        | Hint::False(keyword)
        | Hint::Array(keyword)
        | Hint::Callable(keyword)
        | Hint::Static(keyword)
        | Hint::Self_(keyword)
        | Hint::Parent(keyword) => keyword.value.to_string(),
        Hint::Parenthesized(paren) => {
            format!("({})", hint_string(paren.hint))
        }
    }
}

/// Find the doc comment immediately preceding `decl_offset`.
///
/// Only whitespace may separate the comment from the declaration; a line or
/// block comment in between detaches the doc comment.
fn doc_comment_before(trivias: &[Trivia], content: &str, decl_offset: u32) -> Option<DocComment> {
    let candidate_idx = trivias.partition_point(|t| t.span.start.offset < decl_offset);
    if candidate_idx == 0 {
        return None;
    }

    let content_bytes = content.as_bytes();
    let mut covered_from = decl_offset;

    for i in (0..candidate_idx).rev() {
        let t = &trivias[i];
        let t_end = t.span.end.offset;

        // Any non-whitespace content in the gap breaks adjacency.
        let gap = content_bytes
            .get(t_end as usize..covered_from as usize)
            .unwrap_or(&[]);
        if !gap.iter().all(u8::is_ascii_whitespace) {
            return None;
        }

        match t.kind {
            TriviaKind::DocBlockComment => {
                return Some(DocComment {
                    text: t.value.to_string(),
                    start: t.span.start.offset,
                    end: t.span.end.offset,
                });
            }
            TriviaKind::WhiteSpace => {
                covered_from = t.span.start.offset;
            }
            TriviaKind::SingleLineComment
            | TriviaKind::MultiLineComment
            | TriviaKind::HashComment => {
                return None;
            }
        }
    }

    None
}

// ─── Tests ──────────────────────────────────────────────────────────────────
