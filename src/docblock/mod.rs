//! Doc-comment line extraction and `@method` annotation matching.
//!
//! Doc comments are handled as flat lists of content lines: the delimiters
//! and leading `*` markers are stripped on the way in, and the updater
//! re-wraps lines into a properly indented block on the way out. In between,
//! everything operates on plain strings.

mod format;
mod processor;

pub use format::{
    format_default_value, format_parameters, format_return_type, format_type_with_imports,
};
pub use processor::DocBlockProcessor;

/// Strip a raw `/** ... */` doc comment down to its content lines.
///
/// Delimiter-only lines are dropped, leading `*` markers are removed, and
/// blank lines disappear. Remaining content is kept verbatim and in order.
pub fn extract_lines(docblock: &str) -> Vec<String> {
    let mut cleaned = Vec::new();

    for line in docblock.split('\n') {
        let line = line.trim();

        if line == "/**" || line == "*/" {
            continue;
        }

        let content = if let Some(rest) = line.strip_prefix("* ") {
            rest.trim()
        } else if let Some(rest) = line.strip_prefix('*') {
            rest.trim()
        } else {
            line
        };

        if !content.is_empty() {
            cleaned.push(content.to_string());
        }
    }

    cleaned
}

/// Indices of lines carrying an `@method` annotation for `method_name`.
pub fn find_method_lines(lines: &[String], method_name: &str) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| matches_method_line(line, method_name))
        .map(|(index, _)| index)
        .collect()
}

/// Whether a line contains `@method <...> <method_name>(`.
///
/// The method name must appear as a whitespace-delimited token after the
/// `@method` tag (with at least a return type's worth of separation) and be
/// immediately followed by an opening parenthesis, so `dispatch` never
/// matches a `dispatchOn(...)` line.
pub fn matches_method_line(line: &str, method_name: &str) -> bool {
    if method_name.is_empty() {
        return false;
    }

    let mut scan_from = 0;
    while let Some(rel) = line[scan_from..].find("@method") {
        let tag_end = scan_from + rel + "@method".len();
        let after = &line[tag_end..];

        if after.starts_with(|c: char| c.is_whitespace()) {
            let mut search_from = 0;
            while let Some(pos) = after[search_from..].find(method_name) {
                let name_start = search_from + pos;
                let preceded_by_ws = after[..name_start]
                    .chars()
                    .next_back()
                    .is_some_and(char::is_whitespace);

                if name_start >= 2 && preceded_by_ws {
                    let after_name = after[name_start + method_name.len()..].trim_start();
                    if after_name.starts_with('(') {
                        return true;
                    }
                }
                search_from = name_start + 1;
            }
        }

        scan_from = tag_end;
    }

    false
}

/// Render one canonical annotation line.
pub fn build_method_line(
    visibility: &str,
    return_type: &str,
    method_name: &str,
    parameters: &str,
) -> String {
    format!("@method {visibility} {return_type} {method_name}({parameters})")
}

// ─── Tests ──────────────────────────────────────────────────────────────────
