//! Ordered annotation-line editing.

use super::find_method_lines;

/// A stateful editor over the content lines of one doc comment.
///
/// Replacements keep the position of the first existing match and collapse
/// duplicates; new lines append at the end. Lines that do not look like
/// `@method` annotations for the name in question are never touched.
#[derive(Debug, Clone)]
pub struct DocBlockProcessor {
    lines: Vec<String>,
}

impl DocBlockProcessor {
    pub fn new(lines: Vec<String>) -> DocBlockProcessor {
        DocBlockProcessor { lines }
    }

    /// Remove every annotation line for `method_name` when `condition` holds.
    pub fn remove_method_if(&mut self, method_name: &str, condition: bool) {
        if condition {
            self.remove_method(method_name);
        }
    }

    /// Remove every annotation line for `method_name`, preserving the
    /// relative order of the remainder.
    pub fn remove_method(&mut self, method_name: &str) {
        let indices = find_method_lines(&self.lines, method_name);
        for index in indices.into_iter().rev() {
            self.lines.remove(index);
        }
    }

    /// Replace the first annotation line for `method_name` in place (deleting
    /// any further duplicates), or append `method_line` when none exists.
    ///
    /// `None` means the method is not applicable and the call is a no-op.
    pub fn add_or_replace_method(&mut self, method_name: &str, method_line: Option<String>) {
        let Some(method_line) = method_line else {
            return;
        };

        let existing = find_method_lines(&self.lines, method_name);
        match existing.first() {
            Some(&first) => {
                self.lines[first] = method_line;
                for index in existing[1..].iter().rev() {
                    self.lines.remove(*index);
                }
            }
            None => self.lines.push(method_line),
        }
    }

    /// The current annotation-line state.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn remove_method_deletes_all_matches_keeping_order() {
        let mut processor = DocBlockProcessor::new(lines(&[
            "@method static void run()",
            "Keep me",
            "@method static void run(string $old)",
            "@method static void dispatch()",
        ]));
        processor.remove_method("run");
        assert_eq!(
            processor.into_lines(),
            lines(&["Keep me", "@method static void dispatch()"])
        );
    }

    #[test]
    fn remove_method_if_respects_the_condition() {
        let mut processor = DocBlockProcessor::new(lines(&["@method static void run()"]));
        processor.remove_method_if("run", false);
        assert_eq!(processor.into_lines().len(), 1);
    }

    #[test]
    fn replace_keeps_the_first_position_and_collapses_duplicates() {
        let mut processor = DocBlockProcessor::new(lines(&[
            "Summary line",
            "@method static void run(string $stale)",
            "@method static void dispatch()",
            "@method static void run(int $other)",
        ]));
        processor.add_or_replace_method("run", Some("@method static array run()".to_string()));
        assert_eq!(
            processor.into_lines(),
            lines(&[
                "Summary line",
                "@method static array run()",
                "@method static void dispatch()",
            ])
        );
    }

    #[test]
    fn add_appends_when_no_match_exists() {
        let mut processor = DocBlockProcessor::new(lines(&["Summary line"]));
        processor.add_or_replace_method("run", Some("@method static void run()".to_string()));
        assert_eq!(
            processor.into_lines(),
            lines(&["Summary line", "@method static void run()"])
        );
    }

    #[test]
    fn none_line_is_a_no_op() {
        let mut processor = DocBlockProcessor::new(lines(&["@method static void run()"]));
        processor.add_or_replace_method("run", None);
        assert_eq!(processor.into_lines(), lines(&["@method static void run()"]));
    }
}
