//! Class analysis.
//!
//! Turns parsed PHP files into [`ClassSnapshot`]s: every type hint is
//! resolved to its fully-qualified form using the file's imports and
//! namespace, union types are split into per-member relations with
//! nullability and builtin classification, and methods inherited through the
//! `extends` chain are merged in (public/protected, child wins) by resolving
//! parent classes over the project's PSR-4 mappings.
//!
//! The analyser owns an explicit parse cache for the run; call
//! [`ClassAnalyser::clear_cache`] between runs (or tests) that touch the
//! same paths.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::composer::{self, Psr4Mapping};
use crate::error::{Result, SyncError};
use crate::parser::{self, ParsedFile, PhpClass, PhpMethod};
use crate::types::{ClassSnapshot, DefaultValue, MethodInfo, ParameterInfo, Relation};

/// Builtin type names recognised as union members. These never carry a
/// namespace; the comparison is case-insensitive but the original spelling
/// is preserved.
const UNION_BUILTINS: &[&str] = &[
    "string", "int", "float", "bool", "array", "object", "mixed", "void", "null", "callable",
    "iterable",
];

/// Ancestor chains deeper than this are cut off (also guards cycles).
const MAX_INHERITANCE_DEPTH: usize = 10;

/// Builds [`ClassSnapshot`]s from PHP source files.
pub struct ClassAnalyser {
    project_root: PathBuf,
    mappings: Vec<Psr4Mapping>,
    cache: HashMap<PathBuf, Arc<ParsedFile>>,
}

impl ClassAnalyser {
    /// Create an analyser for a project, loading its composer PSR-4 mappings.
    pub fn new(project_root: &Path) -> ClassAnalyser {
        let mappings = composer::parse_composer_json(project_root);
        ClassAnalyser {
            project_root: project_root.to_path_buf(),
            mappings,
            cache: HashMap::new(),
        }
    }

    /// The PSR-4 mappings loaded from the project's composer.json.
    pub fn mappings(&self) -> &[Psr4Mapping] {
        &self.mappings
    }

    /// Drop all cached parse results.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Analyse every class declared in `path`.
    pub fn analyse_file(&mut self, path: &Path) -> Result<Vec<ClassSnapshot>> {
        let parsed = self.parsed_file(path)?;

        let snapshots = parsed
            .classes
            .iter()
            .map(|class| self.build_snapshot(&parsed, class, path))
            .collect();

        Ok(snapshots)
    }

    /// Read and parse a file, consulting the cache first.
    fn parsed_file(&mut self, path: &Path) -> Result<Arc<ParsedFile>> {
        if let Some(parsed) = self.cache.get(path) {
            return Ok(Arc::clone(parsed));
        }

        let content = std::fs::read_to_string(path).map_err(|source| SyncError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = Arc::new(parser::parse_source(&content));
        self.cache.insert(path.to_path_buf(), Arc::clone(&parsed));
        Ok(parsed)
    }

    /// Assemble the snapshot for one class declaration.
    fn build_snapshot(&mut self, file: &ParsedFile, class: &PhpClass, path: &Path) -> ClassSnapshot {
        let namespace = file.namespace.clone();
        let imports = file.imports.clone();

        let extends_fqn = class
            .extends
            .as_deref()
            .map(|raw| resolve_class_name(raw, namespace.as_deref(), &imports));

        let traits = class
            .trait_uses
            .iter()
            .map(|raw| {
                Relation::from_full_name(
                    &resolve_class_name(raw, namespace.as_deref(), &imports),
                    None,
                )
            })
            .collect();

        let mut methods: Vec<MethodInfo> = class
            .methods
            .iter()
            .map(|m| build_method(m, namespace.as_deref(), &imports))
            .collect();

        // Reflection reports inherited methods as visible on the class, so
        // the parent chain is merged in here. Private members stay behind.
        let mut visited = HashSet::new();
        let fqn = match &namespace {
            Some(ns) => format!("{}\\{}", ns, class.name),
            None => class.name.clone(),
        };
        visited.insert(fqn);
        self.merge_inherited(&mut methods, extends_fqn.clone(), &mut visited, 0);

        ClassSnapshot {
            class_name: class.name.clone(),
            namespace,
            file_path: path.to_path_buf(),
            doc_block: class.doc_comment.as_ref().map(|d| d.text.clone()),
            extends: extends_fqn
                .as_deref()
                .map(|fqn| Relation::from_full_name(fqn, None)),
            includes: imports,
            traits,
            methods,
        }
    }

    /// Walk up the `extends` chain and append parent methods the class does
    /// not already declare. Parent signatures are resolved in the parent
    /// file's own import context.
    fn merge_inherited(
        &mut self,
        methods: &mut Vec<MethodInfo>,
        extends_fqn: Option<String>,
        visited: &mut HashSet<String>,
        depth: usize,
    ) {
        let Some(parent_fqn) = extends_fqn else {
            return;
        };
        if depth >= MAX_INHERITANCE_DEPTH || !visited.insert(parent_fqn.clone()) {
            return;
        }

        let Some(parent_path) =
            composer::resolve_class_path(&self.mappings, &self.project_root, &parent_fqn)
        else {
            return;
        };
        let Ok(parsed) = self.parsed_file(&parent_path) else {
            return;
        };

        let short_name = parent_fqn.rsplit('\\').next().unwrap_or(&parent_fqn);
        let Some(parent_class) = parsed.class(short_name) else {
            return;
        };

        let parent_ns = parsed.namespace.as_deref();
        for parent_method in &parent_class.methods {
            if parent_method.visibility == crate::types::Visibility::Private {
                continue;
            }
            if methods.iter().any(|m| m.name == parent_method.name) {
                continue;
            }
            methods.push(build_method(parent_method, parent_ns, &parsed.imports));
        }

        let grand_parent = parent_class
            .extends
            .as_deref()
            .map(|raw| resolve_class_name(raw, parent_ns, &parsed.imports));
        self.merge_inherited(methods, grand_parent, visited, depth + 1);
    }
}

// ─── Signature resolution ───────────────────────────────────────────────────

/// Build a [`MethodInfo`] from a raw method declaration, resolving all type
/// hints in the given file context.
fn build_method(method: &PhpMethod, namespace: Option<&str>, imports: &[Relation]) -> MethodInfo {
    let parameters = method
        .parameters
        .iter()
        .enumerate()
        .map(|(position, param)| {
            let raw_type = match &param.hint {
                Some(hint) => resolve_type_text(hint, namespace, imports),
                None => "mixed".to_string(),
            };
            let types = parse_union_type(&raw_type);
            let default = param.default.as_deref().map(classify_default);

            ParameterInfo {
                name: param.name.clone(),
                is_optional: default.is_some() || param.is_variadic,
                is_variadic: param.is_variadic,
                is_by_reference: param.is_by_reference,
                default,
                position,
                raw_type,
                types,
            }
        })
        .collect();

    // Constructors have no declared return type; they are reported as void.
    let raw_return_type = if method.name == "__construct" {
        "void".to_string()
    } else {
        match &method.return_hint {
            Some(hint) => resolve_type_text(hint, namespace, imports),
            None => "mixed".to_string(),
        }
    };

    MethodInfo {
        name: method.name.clone(),
        return_types: parse_union_type(&raw_return_type),
        raw_return_type,
        visibility: method.visibility,
        is_static: method.is_static,
        is_abstract: method.is_abstract,
        is_final: method.is_final,
        parameters,
    }
}

/// Resolve a type hint's class-name members to fully-qualified form,
/// preserving the `?` prefix and union structure.
fn resolve_type_text(raw: &str, namespace: Option<&str>, imports: &[Relation]) -> String {
    let is_nullable = raw.starts_with('?');
    let clean = raw.trim_start_matches('?');

    let resolved: Vec<String> = clean
        .split('|')
        .map(|member| resolve_class_name(member.trim(), namespace, imports))
        .collect();

    let joined = resolved.join("|");
    if is_nullable {
        format!("?{}", joined)
    } else {
        joined
    }
}

/// Resolve one class name the way PHP's compile-time name resolution does:
/// builtins pass through, a leading `\` makes the name absolute, otherwise
/// the first segment is matched against the import table and any remainder
/// falls back to the current namespace.
fn resolve_class_name(raw: &str, namespace: Option<&str>, imports: &[Relation]) -> String {
    if raw.is_empty() || composer::is_builtin_type(raw) || raw.contains('&') {
        return raw.to_string();
    }

    if let Some(absolute) = raw.strip_prefix('\\') {
        return absolute.to_string();
    }

    let (first_segment, rest) = match raw.find('\\') {
        Some(idx) => (&raw[..idx], Some(&raw[idx + 1..])),
        None => (raw, None),
    };

    let imported = imports.iter().find(|import| match &import.alias {
        Some(alias) => alias == first_segment,
        None => import.name == first_segment,
    });

    match (imported, rest) {
        (Some(import), Some(rest)) => format!("{}\\{}", import.full_name(), rest),
        (Some(import), None) => import.full_name(),
        (None, _) => match namespace {
            Some(ns) => format!("{}\\{}", ns, raw),
            None => raw.to_string(),
        },
    }
}

/// Split a resolved type string into one [`Relation`] per union member.
///
/// A leading `?` marks every member nullable; a literal `null` member is
/// nullable by itself. Builtins never carry a namespace. `self`, `static`,
/// and `parent` are not in the builtin list and pass through unresolved.
pub(crate) fn parse_union_type(raw_type: &str) -> Vec<Relation> {
    let is_nullable = raw_type.starts_with('?');
    let clean = raw_type.trim_start_matches('?');

    clean
        .split('|')
        .map(str::trim)
        .map(|member| {
            let is_builtin = UNION_BUILTINS
                .iter()
                .any(|b| member.eq_ignore_ascii_case(b));

            let (namespace, name) = if is_builtin {
                (None, member.to_string())
            } else {
                match member.rfind('\\') {
                    Some(idx) => (Some(member[..idx].to_string()), member[idx + 1..].to_string()),
                    None => (None, member.to_string()),
                }
            };

            Relation {
                name,
                namespace,
                alias: None,
                is_nullable: is_nullable || member.eq_ignore_ascii_case("null"),
                is_builtin,
            }
        })
        .collect()
}

/// Classify a default-value expression by its literal shape. Anything that
/// is not a recognisable literal is carried as opaque expression text.
fn classify_default(text: &str) -> DefaultValue {
    let t = text.trim();

    if t.eq_ignore_ascii_case("null") {
        return DefaultValue::Null;
    }
    if t.eq_ignore_ascii_case("true") {
        return DefaultValue::Bool(true);
    }
    if t.eq_ignore_ascii_case("false") {
        return DefaultValue::Bool(false);
    }
    if t.len() >= 2 {
        let first = t.chars().next().unwrap_or('\0');
        if (first == '\'' || first == '"') && t.ends_with(first) {
            return DefaultValue::Str(decode_string_literal(&t[1..t.len() - 1]));
        }
    }
    if t.starts_with('[') || t.to_ascii_lowercase().starts_with("array(") {
        return DefaultValue::Array;
    }

    DefaultValue::Expr(t.to_string())
}

/// Undo the backslash escapes of a quoted PHP string literal.
fn decode_string_literal(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('\'') => out.push('\''),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

// ─── Tests ──────────────────────────────────────────────────────────────────
