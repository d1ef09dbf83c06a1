//! `use` statement extraction.
//!
//! Builds the ordered list of import [`Relation`]s declared in a file,
//! handling simple (`use Foo\Bar;`), aliased (`use Foo\Bar as Baz;`),
//! comma-separated (`use A, B;`), and grouped (`use Foo\{Bar, Baz as Q};`)
//! forms. Function and constant imports are not type imports and are
//! skipped.

use mago_span::HasSpan;
use mago_syntax::ast::*;

use crate::types::Relation;

/// Walk statements and collect import relations in source order, each tagged
/// with its statement's byte offset so the caller can cut the list off at
/// the first type declaration.
pub(crate) fn extract_use_statements<'a>(
    statements: impl Iterator<Item = &'a Statement<'a>>,
    imports: &mut Vec<(u32, Relation)>,
) {
    for statement in statements {
        match statement {
            Statement::Use(use_stmt) => {
                let offset = use_stmt.span().start.offset;
                extract_use_items(&use_stmt.items, offset, imports);
            }
            Statement::Namespace(namespace) => {
                extract_use_statements(namespace.statements().iter(), imports);
            }
            _ => {}
        }
    }
}

/// Flatten a `UseItems` node into relations, ignoring anything that is
/// not a class-like import.
fn extract_use_items(items: &UseItems, offset: u32, imports: &mut Vec<(u32, Relation)>) {
    match items {
        UseItems::Sequence(seq) => {
            // Plain form, possibly comma-separated.
            for item in seq.items.iter() {
                register_use_item(item, None, offset, imports);
            }
        }
        UseItems::TypedSequence(seq) => {
            // Function and constant imports never name a class.
            if seq.r#type.is_function() || seq.r#type.is_const() {
                return;
            }
            for item in seq.items.iter() {
                register_use_item(item, None, offset, imports);
            }
        }
        UseItems::TypedList(list) => {
            // Grouped form where a single keyword types the whole braces.
            if list.r#type.is_function() || list.r#type.is_const() {
                return;
            }
            let prefix = list.namespace.value();
            for item in list.items.iter() {
                register_use_item(item, Some(prefix), offset, imports);
            }
        }
        UseItems::MixedList(list) => {
            // Grouped form where each item carries its own keyword.
            let prefix = list.namespace.value();
            for maybe_typed in list.items.iter() {
                if let Some(ref t) = maybe_typed.r#type
                    && (t.is_function() || t.is_const())
                {
                    continue;
                }
                register_use_item(&maybe_typed.item, Some(prefix), offset, imports);
            }
        }
    }
}

/// Turn one `UseItem` into a [`Relation`].
///
/// Items inside a group resolve relative to `group_prefix`, so `Bar` under
/// the prefix `Foo` becomes `Foo\Bar`. Grouped imports rooted in the global
/// namespace have an empty prefix and keep the item name untouched.
fn register_use_item(
    item: &UseItem,
    group_prefix: Option<&str>,
    offset: u32,
    imports: &mut Vec<(u32, Relation)>,
) {
    let item_name = item.name.value();

    let full_name = match group_prefix {
        Some(prefix) if !prefix.trim_matches('\\').is_empty() => {
            format!("{}\\{}", prefix.trim_matches('\\'), item_name)
        }
        _ => item_name.to_string(),
    };

    if full_name.trim_matches('\\').is_empty() {
        return;
    }

    let alias = item
        .alias
        .as_ref()
        .map(|alias| alias.identifier.value.to_string());

    imports.push((offset, Relation::from_full_name(&full_name, alias)));
}

// ─── Tests ──────────────────────────────────────────────────────────────────
