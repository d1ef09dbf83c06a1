//! Doc-comment patching.
//!
//! Takes the annotation lines produced for a class and either reports how
//! they differ from what the file currently carries, or rewrites the file's
//! doc comment in place. The rewrite replaces only the region between the
//! existing doc comment (if any) and the class declaration, so surrounding
//! code and indentation survive untouched.

use std::fs;
use std::path::Path;

use crate::error::{Result, SyncError};
use crate::parser;
use crate::types::{DiffEntry, DiffKind};

/// Line-set difference between the current and the generated annotation
/// lines, removals first. Order within each group follows first occurrence.
pub fn diff(current: &[String], new: &[String]) -> Vec<DiffEntry> {
    let mut entries = Vec::new();

    for line in current {
        if !new.contains(line) && !entries.iter().any(|e: &DiffEntry| &e.line == line) {
            entries.push(DiffEntry {
                kind: DiffKind::Removed,
                line: line.clone(),
            });
        }
    }

    let removed_count = entries.len();
    for line in new {
        if !current.contains(line)
            && !entries[removed_count..].iter().any(|e| &e.line == line)
        {
            entries.push(DiffEntry {
                kind: DiffKind::Added,
                line: line.clone(),
            });
        }
    }

    entries
}

/// Rewrite the doc comment of `class_name` inside `path` so that it carries
/// exactly `new_lines`. Returns `Ok(false)` without touching the file when
/// the lines already match.
pub fn apply(
    path: &Path,
    class_name: &str,
    current_lines: &[String],
    new_lines: &[String],
) -> Result<bool> {
    if current_lines == new_lines {
        return Ok(false);
    }

    let content = fs::read_to_string(path).map_err(|source| SyncError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = parser::parse_source(&content);
    let class = parsed
        .class(class_name)
        .ok_or_else(|| SyncError::ClassDeclarationNotFound {
            class: class_name.to_string(),
            path: path.to_path_buf(),
        })?;

    let decl_offset = class.decl_offset as usize;
    let region_start = match &class.doc_comment {
        Some(doc) => doc.start as usize,
        None => decl_offset,
    };

    // The class line's own leading whitespace sits inside the replaced
    // region, so the indentation has to come from the declaration line and
    // be restored by the replacement.
    let indentation = line_indentation(&content, decl_offset);

    // Whatever precedes `region_start` on its line stays in the file, so the
    // block's first line carries no indentation; every later line re-adds it.
    let replacement = match build_doc_block(new_lines, indentation) {
        Some(block) => format!("{block}\n{indentation}"),
        None => String::new(),
    };

    let mut updated = String::with_capacity(content.len() + replacement.len());
    updated.push_str(&content[..region_start]);
    updated.push_str(&replacement);
    updated.push_str(&content[decl_offset..]);

    fs::write(path, updated).map_err(|source| SyncError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(true)
}

/// Leading spaces and tabs of the line containing `offset`. Empty when the
/// offset is preceded by anything other than indentation on its line.
fn line_indentation(content: &str, offset: usize) -> &str {
    let line_start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &content[line_start..offset];

    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix
    } else {
        ""
    }
}

/// Render annotation lines back into a `/** ... */` comment. A leading
/// summary line becomes part of the opener; `None` when there is nothing to
/// render, which removes the doc comment entirely.
fn build_doc_block(lines: &[String], indentation: &str) -> Option<String> {
    if lines.is_empty() {
        return None;
    }

    let mut rendered = Vec::new();

    let first = strip_comment_markers(&lines[0]);
    if !first.is_empty() && !first.starts_with('@') {
        let mut opener = format!("/** {first}");
        if lines.len() == 1 {
            opener.push_str(" */");
            return Some(opener);
        }
        rendered.push(opener);
    } else if !first.is_empty() {
        rendered.push("/** ".to_string());
        rendered.push(format!("{indentation} * {first}"));
    } else {
        rendered.push("/** ".to_string());
    }

    for line in &lines[1..] {
        let cleaned = strip_comment_markers(line);
        if !cleaned.is_empty() {
            rendered.push(format!("{indentation} * {cleaned}"));
        }
    }

    rendered.push(format!("{indentation} */"));

    Some(rendered.join("\n"))
}

/// Single-line doc comments are extracted verbatim, so their markers have to
/// come off again before re-rendering.
fn strip_comment_markers(line: &str) -> String {
    let mut cleaned = line.trim();

    if let Some(rest) = cleaned.strip_prefix("/**") {
        cleaned = rest.trim();
    }
    if let Some(rest) = cleaned.strip_suffix("*/") {
        cleaned = rest.trim();
    }

    cleaned.to_string()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
