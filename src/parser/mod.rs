//! PHP parsing and extraction.
//!
//! This module parses PHP source text using the mago_syntax parser and
//! extracts what the doc-block engine needs: the file's namespace, its
//! `use` statement relations, and each class declaration (methods with raw
//! signature text, trait uses, the preceding doc comment, and the byte
//! offsets required for in-place patching).
//!
//! All extracted data is owned; nothing borrows the parser's arena.

mod classes;
mod use_statements;

use bumpalo::Bump;
use mago_syntax::ast::*;
use mago_syntax::parser::parse_file_content;

use crate::types::{Relation, Visibility};

/// A raw (unresolved) class declaration pulled out of one file.
///
/// Type hints are kept exactly as written in source; the analyser resolves
/// them against the file's imports and namespace afterwards.
#[derive(Debug, Clone)]
pub struct PhpClass {
    /// The short class name.
    pub name: String,
    /// The parent class name as written (e.g. "BaseAction", "\\Foo\\Bar").
    pub extends: Option<String>,
    /// Trait names from `use` clauses inside the class body, as written.
    pub trait_uses: Vec<String>,
    /// Methods declared directly on the class.
    pub methods: Vec<PhpMethod>,
    /// The `/** ... */` doc comment immediately preceding the declaration
    /// (only whitespace in between), if any.
    pub doc_comment: Option<DocComment>,
    /// Byte offset of the declaration's first token (`abstract`, `final`,
    /// or `class`).
    pub decl_offset: u32,
    pub is_abstract: bool,
    pub is_final: bool,
}

/// A doc comment together with its location in the source text.
#[derive(Debug, Clone)]
pub struct DocComment {
    /// The raw comment text including the `/**` and `*/` delimiters.
    pub text: String,
    /// Byte offset of the opening `/**`.
    pub start: u32,
    /// Byte offset just past the closing `*/`.
    pub end: u32,
}

/// A method declaration with raw signature text.
#[derive(Debug, Clone)]
pub struct PhpMethod {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    /// The return type hint as written, if any.
    pub return_hint: Option<String>,
    pub parameters: Vec<PhpParameter>,
}

/// A parameter declaration with raw hint and default-expression text.
#[derive(Debug, Clone)]
pub struct PhpParameter {
    /// The parameter name WITHOUT the `$` prefix.
    pub name: String,
    /// The type hint as written, if any.
    pub hint: Option<String>,
    pub is_variadic: bool,
    pub is_by_reference: bool,
    /// The default value expression text, if a default is declared.
    pub default: Option<String>,
}

/// Everything extracted from one PHP file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// The first namespace declaration found, if any.
    pub namespace: Option<String>,
    /// Import relations in source order.
    pub imports: Vec<Relation>,
    /// Class declarations in source order.
    pub classes: Vec<PhpClass>,
}

impl ParsedFile {
    /// Find a class by its short name.
    pub fn class(&self, name: &str) -> Option<&PhpClass> {
        self.classes.iter().find(|c| c.name == name)
    }
}

/// Parse PHP source text into an owned [`ParsedFile`].
///
/// An empty or syntactically broken file yields an empty result rather than
/// an error; the parser recovers what it can.
pub fn parse_source(content: &str) -> ParsedFile {
    let arena = Bump::new();
    let file_id = mago_database::file::FileId::new("input.php");
    let program = parse_file_content(&arena, file_id, content);

    let namespace = extract_namespace(program.statements.iter());

    let mut classes = Vec::new();
    classes::extract_classes(
        program.statements.iter(),
        &mut classes,
        program.trivia.as_slice(),
        content,
    );

    let mut tagged_imports = Vec::new();
    use_statements::extract_use_statements(program.statements.iter(), &mut tagged_imports);

    // Imports stop counting at the first class declaration; anything below
    // it never affects name resolution for these files.
    let cutoff = classes.first().map(|class| class.decl_offset);
    let imports = tagged_imports
        .into_iter()
        .filter(|(offset, _)| cutoff.is_none_or(|cutoff| *offset < cutoff))
        .map(|(_, relation)| relation)
        .collect();

    ParsedFile {
        namespace,
        imports,
        classes,
    }
}

/// Walk statements and extract the first namespace declaration found.
fn extract_namespace<'a>(statements: impl Iterator<Item = &'a Statement<'a>>) -> Option<String> {
    for statement in statements {
        if let Statement::Namespace(namespace) = statement {
            // Both implicit (`namespace Foo;`) and brace-delimited
            // (`namespace Foo { ... }`) forms may carry a name.
            if let Some(ident) = &namespace.name {
                let name = ident.value();
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
        }
    }
    None
}

// ─── Tests ──────────────────────────────────────────────────────────────────
