//! Composer autoload support.
//!
//! This module parses `composer.json` to extract PSR-4 autoload mappings and
//! uses them in both directions:
//!
//!   - class name → file path, for loading parent classes during analysis
//!   - namespace → candidate directories, for discovering action classes
//!
//! # PSR-4 resolution
//!
//! Given a mapping like `"App\\" => "app/"`, a class name `App\Actions\Send`
//! is resolved by stripping the prefix, converting the remaining namespace
//! separators to directory separators, appending `.php`, and prepending the
//! mapped base directory: `<root>/app/Actions/Send.php`.

use std::path::{Path, PathBuf};

/// A single PSR-4 namespace-to-directory mapping.
#[derive(Debug, Clone)]
pub struct Psr4Mapping {
    /// The namespace prefix, always ending with `\` (or empty for the root
    /// namespace fallback).
    pub prefix: String,
    /// The base directory path relative to the project root (e.g. `"src/"`).
    pub base_path: String,
}

/// Parse `composer.json` at the project root and extract all PSR-4 mappings
/// from both the `autoload` and `autoload-dev` sections.
///
/// Returns an empty `Vec` if the file doesn't exist, can't be read, or
/// contains no PSR-4 mappings.
pub fn parse_composer_json(project_root: &Path) -> Vec<Psr4Mapping> {
    let composer_path = project_root.join("composer.json");
    let content = match std::fs::read_to_string(&composer_path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let json: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    let mut mappings = Vec::new();

    for section_key in &["autoload", "autoload-dev"] {
        if let Some(section) = json.get(section_key)
            && let Some(psr4) = section.get("psr-4")
            && let Some(psr4_obj) = psr4.as_object()
        {
            for (prefix, paths) in psr4_obj {
                extract_psr4_entries(prefix, paths, &mut mappings);
            }
        }
    }

    // Sort by prefix length descending so longest-prefix-first matching works
    mappings.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

    mappings
}

/// Extract PSR-4 entries from a single prefix → path(s) pair.
///
/// The value can be either a string (`"src/"`) or an array of strings
/// (`["src/", "lib/"]`).
fn extract_psr4_entries(prefix: &str, paths: &serde_json::Value, mappings: &mut Vec<Psr4Mapping>) {
    // Normalise the prefix: ensure it ends with `\`
    let normalised_prefix = if prefix.ends_with('\\') || prefix.is_empty() {
        prefix.to_string()
    } else {
        format!("{}\\", prefix)
    };

    match paths {
        serde_json::Value::String(path) => {
            mappings.push(Psr4Mapping {
                prefix: normalised_prefix,
                base_path: normalise_path(path),
            });
        }
        serde_json::Value::Array(arr) => {
            for entry in arr {
                if let Some(path) = entry.as_str() {
                    mappings.push(Psr4Mapping {
                        prefix: normalised_prefix.clone(),
                        base_path: normalise_path(path),
                    });
                }
            }
        }
        _ => {}
    }
}

/// Normalise a directory path: forward slashes, trailing `/`.
fn normalise_path(path: &str) -> String {
    let p = path.replace('\\', "/");
    if p.ends_with('/') || p.is_empty() {
        p
    } else {
        format!("{}/", p)
    }
}

/// Resolve a fully-qualified PHP class name to a file path using PSR-4
/// mappings. A leading `\` is stripped if present.
///
/// Returns the first resolved path that exists on disk.
pub fn resolve_class_path(
    mappings: &[Psr4Mapping],
    project_root: &Path,
    class_name: &str,
) -> Option<PathBuf> {
    let name = class_name.strip_prefix('\\').unwrap_or(class_name);

    // Builtin type keywords are never real classes
    if is_builtin_type(name) {
        return None;
    }

    // Mappings are already sorted longest-prefix-first
    for mapping in mappings {
        let relative = if mapping.prefix.is_empty() {
            Some(name)
        } else {
            name.strip_prefix(&mapping.prefix)
        };

        if let Some(relative_class) = relative {
            let relative_path = relative_class.replace('\\', "/");
            let file_path = project_root
                .join(&mapping.base_path)
                .join(format!("{}.php", relative_path));

            if file_path.is_file() {
                return Some(file_path);
            }
        }
    }

    None
}

/// Candidate directories whose files may declare classes under `namespace`.
///
/// PSR-4 mappings whose prefix covers the namespace are consulted first, then
/// the conventional fallbacks: `app/<rest>` for `App\…`, `src/<path>`, and
/// `<path>` directly under the project root. Only directories that exist are
/// returned; duplicates are dropped.
pub fn namespace_candidate_dirs(
    mappings: &[Psr4Mapping],
    project_root: &Path,
    namespace: &str,
) -> Vec<PathBuf> {
    let namespace = namespace.trim_matches('\\');
    // Match prefixes against the namespace with a trailing separator so that
    // a prefix "App\" covers the namespace "App" itself.
    let probe = format!("{}\\", namespace);
    let namespace_path = namespace.replace('\\', "/");

    let mut dirs: Vec<PathBuf> = Vec::new();

    for mapping in mappings {
        let relative = if mapping.prefix.is_empty() {
            Some(namespace_path.as_str())
        } else if probe.starts_with(&mapping.prefix) {
            // Fine because the prefix always ends with a separator, so the
            // remainder is a whole-segment suffix.
            let rest = &namespace[mapping.prefix.len().min(namespace.len())..];
            Some(rest)
        } else {
            None
        };

        if let Some(rest) = relative {
            let dir = project_root
                .join(&mapping.base_path)
                .join(rest.replace('\\', "/"));
            push_dir(&mut dirs, dir);
        }
    }

    if let Some(rest) = namespace.strip_prefix("App") {
        let rest = rest.trim_start_matches('\\').replace('\\', "/");
        push_dir(&mut dirs, project_root.join("app").join(rest));
    }
    push_dir(&mut dirs, project_root.join("src").join(&namespace_path));
    push_dir(&mut dirs, project_root.join(&namespace_path));

    dirs
}

fn push_dir(dirs: &mut Vec<PathBuf>, dir: PathBuf) {
    if dir.is_dir() && !dirs.contains(&dir) {
        dirs.push(dir);
    }
}

/// Check if a name is a PHP builtin type keyword (never a class).
pub fn is_builtin_type(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "self"
            | "static"
            | "parent"
            | "string"
            | "int"
            | "float"
            | "bool"
            | "array"
            | "object"
            | "mixed"
            | "void"
            | "never"
            | "null"
            | "true"
            | "false"
            | "callable"
            | "iterable"
    )
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: create a temporary project with a composer.json and optional
    /// PHP class files.
    struct TestProject {
        dir: tempfile::TempDir,
    }

    impl TestProject {
        fn new(composer_json: &str) -> Self {
            let dir = tempfile::tempdir().expect("failed to create temp dir");
            fs::write(dir.path().join("composer.json"), composer_json)
                .expect("failed to write composer.json");
            TestProject { dir }
        }

        fn root(&self) -> &Path {
            self.dir.path()
        }

        fn create_php_file(&self, relative_path: &str, content: &str) {
            let full_path = self.dir.path().join(relative_path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).expect("failed to create dirs");
            }
            fs::write(&full_path, content).expect("failed to write PHP file");
        }
    }

    #[test]
    fn parses_basic_psr4() {
        let project = TestProject::new(
            r#"{
                "autoload": {
                    "psr-4": {
                        "App\\": "app/"
                    }
                }
            }"#,
        );

        let mappings = parse_composer_json(project.root());
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].prefix, "App\\");
        assert_eq!(mappings[0].base_path, "app/");
    }

    #[test]
    fn missing_composer_json_yields_no_mappings() {
        let dir = tempfile::tempdir().unwrap();
        assert!(parse_composer_json(dir.path()).is_empty());
    }

    #[test]
    fn resolves_class_to_existing_file() {
        let project = TestProject::new(
            r#"{"autoload": {"psr-4": {"App\\": "app/"}}}"#,
        );
        project.create_php_file("app/Actions/Send.php", "<?php class Send {}\n");

        let mappings = parse_composer_json(project.root());
        let path = resolve_class_path(&mappings, project.root(), "App\\Actions\\Send")
            .expect("class should resolve");
        assert!(path.ends_with("app/Actions/Send.php"));

        // Leading backslash form resolves too
        assert!(resolve_class_path(&mappings, project.root(), "\\App\\Actions\\Send").is_some());
        // Non-existent class does not
        assert!(resolve_class_path(&mappings, project.root(), "App\\Missing").is_none());
    }

    #[test]
    fn builtin_keywords_never_resolve() {
        let project = TestProject::new(r#"{"autoload": {"psr-4": {"": "src/"}}}"#);
        project.create_php_file("src/string.php", "<?php\n");

        let mappings = parse_composer_json(project.root());
        assert!(resolve_class_path(&mappings, project.root(), "string").is_none());
    }

    #[test]
    fn candidate_dirs_prefer_psr4_and_dedupe_fallbacks() {
        let project = TestProject::new(
            r#"{"autoload": {"psr-4": {"App\\": "app/"}}}"#,
        );
        project.create_php_file("app/Actions/Send.php", "<?php\n");

        let mappings = parse_composer_json(project.root());
        let dirs = namespace_candidate_dirs(&mappings, project.root(), "App\\Actions");
        assert_eq!(dirs.len(), 1, "only the PSR-4/app dir exists: {:?}", dirs);
        assert!(dirs[0].ends_with("app/Actions"));
    }

    #[test]
    fn candidate_dirs_include_src_fallback() {
        let project = TestProject::new("{}");
        project.create_php_file("src/Domain/Actions/Do.php", "<?php\n");

        let dirs = namespace_candidate_dirs(&[], project.root(), "Domain\\Actions");
        assert_eq!(dirs.len(), 1);
        assert!(dirs[0].ends_with("src/Domain/Actions"));
    }
}
