//! Line-level helpers: indentation, directives and continuations.

use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing marker joining a line with the next one.
pub const CONTINUATION: char = '\\';

/// A full-line `%%{...}%%` directive. Group 1 is the body.
static DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*%%\{(.*?)\}%%\s*$").expect("valid directive pattern"));

/// Number of leading space characters. Tabs do not count.
pub fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Returns `true` for a full-line directive such as `%%{config: randomize}%%`.
pub fn is_directive(line: &str) -> bool {
    DIRECTIVE.is_match(line)
}

/// Returns the text between `%%{` and `}%%` of a directive line.
pub fn directive_body(line: &str) -> Option<&str> {
    DIRECTIVE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Joins every line ending in `\` with the line after it.
///
/// The marker is stripped, the continued line is trimmed, and the two are
/// joined with one space. The first line keeps its indentation, so the
/// joined line is measured where the statement started. A marker on the last
/// line is simply dropped.
pub fn join_continuations<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut joined = Vec::with_capacity(lines.len());
    let mut iter = lines.iter().map(AsRef::as_ref);

    while let Some(line) = iter.next() {
        if !line.ends_with(CONTINUATION) {
            joined.push(line.to_string());
            continue;
        }

        let mut current = line.trim_end_matches(CONTINUATION).to_string();
        for next in iter.by_ref() {
            let continues = next.ends_with(CONTINUATION);
            let piece = next.trim().trim_end_matches(CONTINUATION).trim_end();
            if current.trim().is_empty() {
                current.push_str(piece);
            } else {
                current.truncate(current.trim_end().len());
                current.push(' ');
                current.push_str(piece);
            }
            if !continues {
                break;
            }
        }
        joined.push(current);
    }

    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation() {
        assert_eq!(indentation(""), 0);
        assert_eq!(indentation("square"), 0);
        assert_eq!(indentation("  square"), 2);
        assert_eq!(indentation("    "), 4);
        assert_eq!(indentation("\tsquare"), 0);
    }

    #[test]
    fn test_directives() {
        assert!(is_directive("%%{config: randomize}%%"));
        assert!(is_directive("   %%{config: a=b}%%  "));
        assert!(!is_directive("square: side=10 %%{config: a=b}%%"));
        assert!(!is_directive("%%{unterminated"));
        assert_eq!(
            directive_body("%%{config: a=b}%%"),
            Some("config: a=b")
        );
        assert_eq!(directive_body("square"), None);
    }

    #[test]
    fn test_join_simple() {
        assert_eq!(
            join_continuations(&["square: \\", "side=50"]),
            vec!["square: side=50"]
        );
    }

    #[test]
    fn test_join_keeps_indentation_and_trims_continued_line() {
        assert_eq!(
            join_continuations(&["  rect: width=1 \\", "      height=2", "next"]),
            vec!["  rect: width=1 height=2", "next"]
        );
    }

    #[test]
    fn test_join_chain() {
        assert_eq!(
            join_continuations(&["a\\", "  b \\", "  c", "d"]),
            vec!["a b c", "d"]
        );
    }

    #[test]
    fn test_marker_on_last_line() {
        assert_eq!(join_continuations(&["a \\"]), vec!["a "]);
    }

    #[test]
    fn test_no_continuation_is_identity() {
        let lines = vec!["x: 1".to_string(), "  y".to_string(), String::new()];
        assert_eq!(join_continuations(&lines), lines);
    }
}
