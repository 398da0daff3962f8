//! Math typesetting hook.
//!
//! The compiler does not typeset math itself. It hands the substituted lines
//! to a [`MathRenderer`] before rendering entities. Renderers that build
//! new text may typeset it through the same hook.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::line::{indentation, is_directive};

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\$\$\s*$").expect("valid fence pattern"));

/// Text-to-text math typesetting.
pub trait MathRenderer: Send + Sync {
    /// Typesets the math embedded in `lines`.
    ///
    /// The result may have fewer lines than the input when block math spans
    /// several lines.
    fn render_math(&self, lines: Vec<String>) -> Vec<String>;

    /// Typesets the math in a single piece of text.
    fn render_text(&self, text: &str) -> String {
        self.render_math(vec![text.to_string()]).concat()
    }
}

/// Leaves every line unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMath;

impl MathRenderer for NoMath {
    fn render_math(&self, lines: Vec<String>) -> Vec<String> {
        lines
    }

    fn render_text(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Finds math delimiters and typesets each expression with a function.
///
/// - A line holding only `$$` opens block math, closed by the next such line.
///   The enclosed lines are joined with newlines, typeset once, and replace
///   the whole fence as one line indented like the opening fence.
/// - `$...$` inside a line is inline math. A `$` preceded by `\` is not a
///   delimiter.
/// - Directive lines are left alone.
///
/// ```
/// use quizmd::{MathPass, MathRenderer};
///
/// let math = MathPass::new(|tex: &str| format!("<m>{tex}</m>"));
/// assert_eq!(math.render_text("area $a^2$ and \\$5"), "area <m>a^2</m> and \\$5");
/// ```
pub struct MathPass<F> {
    typeset: F,
}

impl<F> MathPass<F>
where
    F: Fn(&str) -> String,
{
    pub fn new(typeset: F) -> Self {
        Self { typeset }
    }

    fn inline(&self, line: &str) -> String {
        let mut output = String::with_capacity(line.len());
        let mut rest = line;

        while let Some(open) = find_delimiter(rest, 0) {
            let Some(close) = find_delimiter(rest, open + 1) else {
                break;
            };
            if close == open + 1 {
                // `$$` inside text is not an expression.
                output.push_str(&rest[..=close]);
            } else {
                output.push_str(&rest[..open]);
                output.push_str(&(self.typeset)(&rest[open + 1..close]));
            }
            rest = &rest[close + 1..];
        }

        output.push_str(rest);
        output
    }
}

fn find_delimiter(text: &str, from: usize) -> Option<usize> {
    text[from..]
        .char_indices()
        .map(|(i, c)| (from + i, c))
        .find(|&(i, c)| c == '$' && (i == 0 || text.as_bytes()[i - 1] != b'\\'))
        .map(|(i, _)| i)
}

impl<F> MathRenderer for MathPass<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn render_math(&self, lines: Vec<String>) -> Vec<String> {
        let mut output = Vec::with_capacity(lines.len());
        let mut lines = lines.into_iter();

        while let Some(line) = lines.next() {
            if is_directive(&line) {
                output.push(line);
            } else if FENCE.is_match(&line) {
                let body: Vec<String> = lines.by_ref().take_while(|l| !FENCE.is_match(l)).collect();
                let typeset = (self.typeset)(&body.join("\n"));
                output.push(format!("{}{}", " ".repeat(indentation(&line)), typeset));
            } else {
                output.push(self.inline(&line));
            }
        }

        output
    }
}

impl<F> std::fmt::Debug for MathPass<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathPass").finish_non_exhaustive()
    }
}
