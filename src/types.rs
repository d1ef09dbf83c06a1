//! Data types shared across the analyser, generator, and updater.
//!
//! This module contains the "model" structs that represent analysed PHP
//! information (classes, methods, parameters, import relations) as well as
//! the small value types driving annotation generation (capability flags,
//! diff entries).

use std::path::PathBuf;

/// Visibility of a class member.
///
/// In PHP, members without an explicit visibility modifier default to `Public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// One resolved type reference: a `use` import, a parsed union member, or a
/// parent-class/trait reference.
///
/// Invariant: `is_builtin` implies `namespace == None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// The short name (last path segment), e.g. "Customer".
    pub name: String,
    /// The declaring namespace, e.g. "Klarna\\Rest". `None` for builtins and
    /// global-namespace names.
    pub namespace: Option<String>,
    /// Import alias from `use Foo\Bar as Baz;`, if any.
    pub alias: Option<String>,
    /// Whether this union member is nullable (`?Foo` or literal `null`).
    pub is_nullable: bool,
    /// Whether the name is a PHP builtin type keyword.
    pub is_builtin: bool,
}

impl Relation {
    /// Split a full name like `Klarna\Rest\Customer` into namespace and short
    /// name on the last separator. A name with no separator has no namespace.
    pub fn from_full_name(full_name: &str, alias: Option<String>) -> Relation {
        let full_name = full_name.trim_matches('\\');
        let (namespace, name) = match full_name.rfind('\\') {
            Some(idx) => (Some(full_name[..idx].to_string()), &full_name[idx + 1..]),
            None => (None, full_name),
        };

        Relation {
            name: name.to_string(),
            namespace,
            alias,
            is_nullable: false,
            is_builtin: false,
        }
    }

    /// Reconstruct the namespace-qualified name (no leading backslash).
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}\\{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

/// A parameter's default value, classified from its source expression.
///
/// Arrays deliberately degrade to `[]` regardless of their contents; the
/// annotation only records that a default exists, not its exact shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Null,
    Bool(bool),
    /// Decoded string contents (without surrounding quotes).
    Str(String),
    Array,
    /// Any other expression, kept as written (numbers, constants, `new Foo`).
    Expr(String),
}

/// One analysed method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    /// The parameter name WITHOUT the `$` prefix.
    pub name: String,
    /// The resolved type text, e.g. "?string" or "App\\User|null".
    /// `"mixed"` when the parameter is untyped.
    pub raw_type: String,
    /// One relation per union member, in declaration order.
    pub types: Vec<Relation>,
    /// Whether the parameter can be omitted at the call site.
    pub is_optional: bool,
    pub is_variadic: bool,
    pub is_by_reference: bool,
    /// The default value, when one is declared.
    pub default: Option<DefaultValue>,
    /// Zero-based position in the parameter list.
    pub position: usize,
}

/// One analysed method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub name: String,
    /// The resolved return type text; `"mixed"` when undeclared and `"void"`
    /// for constructors.
    pub raw_return_type: String,
    /// One relation per return-union member.
    pub return_types: Vec<Relation>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub parameters: Vec<ParameterInfo>,
}

/// Structured snapshot of one analysed class.
///
/// Built fresh per file per run; type resolution depends on the file's
/// imports, so snapshots are never reused across files.
#[derive(Debug, Clone)]
pub struct ClassSnapshot {
    /// The short class name, e.g. "SendWelcomeEmail".
    pub class_name: String,
    /// The declaring namespace, if any.
    pub namespace: Option<String>,
    /// Path of the file the class was parsed from.
    pub file_path: PathBuf,
    /// The raw `/** ... */` doc comment preceding the class, if any.
    pub doc_block: Option<String>,
    /// The parent class from the `extends` clause, resolved.
    pub extends: Option<Relation>,
    /// Import relations from the file's `use` statements, in source order.
    pub includes: Vec<Relation>,
    /// Traits composed directly into the class, resolved.
    pub traits: Vec<Relation>,
    /// All methods visible on the class (declared and inherited).
    pub methods: Vec<MethodInfo>,
}

impl ClassSnapshot {
    /// The namespace-qualified class name (no leading backslash).
    pub fn fully_qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}\\{}", ns, self.class_name),
            None => self.class_name.clone(),
        }
    }

    /// Find a method by name.
    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Which generated static entry points a class supports, derived from its
/// capability traits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilityFlags {
    /// The class supports synchronous invocation (`run`).
    pub supports_run: bool,
    /// The class supports asynchronous dispatch (`dispatch` / `dispatchOn`).
    pub supports_dispatch: bool,
}

impl CapabilityFlags {
    /// Whether any capability is present at all.
    pub fn any(self) -> bool {
        self.supports_run || self.supports_dispatch
    }
}

/// Whether a diff line is an addition or a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Added,
    Removed,
}

impl DiffKind {
    /// The `+`/`-` marker used in reports.
    pub fn symbol(self) -> char {
        match self {
            DiffKind::Added => '+',
            DiffKind::Removed => '-',
        }
    }
}

/// One line of a dry-run report: an annotation line to add or remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub kind: DiffKind,
    pub line: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_from_full_name_splits_on_last_separator() {
        let rel = Relation::from_full_name("Klarna\\Rest\\Customer", None);
        assert_eq!(rel.name, "Customer");
        assert_eq!(rel.namespace.as_deref(), Some("Klarna\\Rest"));
        assert_eq!(rel.alias, None);
    }

    #[test]
    fn relation_from_full_name_without_separator_has_no_namespace() {
        let rel = Relation::from_full_name("DateTime", Some("DT".to_string()));
        assert_eq!(rel.name, "DateTime");
        assert_eq!(rel.namespace, None);
        assert_eq!(rel.alias.as_deref(), Some("DT"));
    }

    #[test]
    fn relation_full_name_round_trips() {
        let rel = Relation::from_full_name("\\App\\Actions\\SendEmail", None);
        assert_eq!(rel.full_name(), "App\\Actions\\SendEmail");
    }
}
