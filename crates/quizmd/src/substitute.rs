//! Placeholder substitution.
//!
//! Runs over the raw lines before any entity is parsed and resolves every
//! unescaped `{{...}}` span whose inside contains no brace:
//!
//! - **plain** placeholders (`{{11}}`, `{{2.5}}`, `{{Mary}}`) resolve through
//!   the [`Scope`]: the default text, or the variable's memoized random value
//!   when randomizing;
//! - every other placeholder is arithmetic (`{{2*(3+4)}}`) and goes to the
//!   [evaluator](crate::expr).
//!
//! Resolution repeats until the line has no placeholder left, always taking
//! the leftmost plain placeholder before any expression. Nested forms thus
//! reduce from the inside out: `{{{{3}}*2}}` becomes `{{3*2}}`, then `6`.
//!
//! `\{` and `\}` are literal braces and are unescaped once the line is done.

use once_cell::sync::Lazy;
use rand::RngCore;
use regex::Regex;

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{CompileError, Result};
use crate::expr::evaluate_to_string;
use crate::names::NameGenerator;
use crate::splitter::{split_blocks, Segment};
use crate::variable::Scope;

static PLAIN_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._\- \t]+$").expect("valid placeholder pattern"));
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid number pattern"));

/// Everything a substitution needs besides the lines and the scope.
pub struct SubstitutionContext<'a> {
    randomize: bool,
    rng: &'a mut dyn RngCore,
    names: &'a dyn NameGenerator,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> SubstitutionContext<'a> {
    pub fn new(
        randomize: bool,
        rng: &'a mut dyn RngCore,
        names: &'a dyn NameGenerator,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            randomize,
            rng,
            names,
            diagnostics,
        }
    }
}

/// A `{{...}}` span. `start..end` covers the braces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placeholder<'a> {
    start: usize,
    end: usize,
    inner: &'a str,
}

impl Placeholder<'_> {
    fn is_plain(&self) -> bool {
        is_plain(self.inner)
    }
}

/// Returns `true` if `inner` names a variable rather than an expression.
///
/// A plain placeholder uses only letters, digits, `.`, `_`, `-` and blanks,
/// and is either a number literal or contains a letter.
pub fn is_plain(inner: &str) -> bool {
    let token = inner.trim();
    PLAIN_CHARS.is_match(inner)
        && (NUMBER.is_match(token) || token.chars().any(|c| c.is_ascii_alphabetic()))
}

fn is_escaped(line: &str, index: usize) -> bool {
    index > 0 && line.as_bytes()[index - 1] == b'\\'
}

/// All placeholders of `line`, left to right.
fn placeholders(line: &str) -> Vec<Placeholder<'_>> {
    let bytes = line.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' && !is_escaped(line, i) {
            let inner_start = i + 2;
            let close = line[inner_start..]
                .find(|c: char| c == '{' || c == '}')
                .map(|offset| inner_start + offset);
            if let Some(close) = close {
                let inner = &line[inner_start..close];
                if line[close..].starts_with("}}")
                    && !inner.trim().is_empty()
                    && !inner.ends_with('\\')
                {
                    found.push(Placeholder {
                        start: i,
                        end: close + 2,
                        inner,
                    });
                    i = close + 2;
                    continue;
                }
            }
        }
        i += 1;
    }

    found
}

/// Replaces `\{` and `\}` with bare braces.
pub fn unescape_braces(line: &str) -> String {
    line.replace("\\{", "{").replace("\\}", "}")
}

/// Resolves every placeholder of one line.
///
/// # Errors
///
/// [`CompileError::Expression`] for a placeholder that is neither a variable
/// nor valid arithmetic.
pub fn substitute_line(
    line: &str,
    scope: &mut Scope,
    context: &mut SubstitutionContext<'_>,
) -> Result<String> {
    let mut current = line.to_string();
    let mut budget = line.len();

    loop {
        let found = placeholders(&current);
        let Some(next) = found
            .iter()
            .find(|placeholder| placeholder.is_plain())
            .or_else(|| found.first())
        else {
            break;
        };

        if budget == 0 {
            context.diagnostics.warn(Warning::SubstitutionLimit {
                line: line.to_string(),
            });
            break;
        }
        budget -= 1;

        let replacement = if next.is_plain() {
            scope.variable(next.inner.trim()).resolve(
                context.randomize,
                &mut *context.rng,
                context.names,
            )
        } else {
            evaluate_to_string(next.inner).map_err(|source| CompileError::Expression {
                placeholder: next.inner.to_string(),
                source,
            })?
        };

        let range = next.start..next.end;
        current.replace_range(range, &replacement);
    }

    if current != line {
        tracing::trace!(line, substituted = %current, "substituted placeholders");
    }

    Ok(unescape_braces(&current))
}

/// Resolves the placeholders of a block of lines.
///
/// Returns exactly one line per input line. Sibling head lines at one level
/// share a scope, in document order; each block's children work on a copy of
/// that scope as it stood after the block's head line, so draws inside one
/// branch never reach its siblings. `scope` receives the draws made by the
/// top level. Directive and blank lines are left untouched.
///
/// # Errors
///
/// See [`substitute_line`].
pub fn substitute<S: AsRef<str>>(
    lines: &[S],
    scope: &mut Scope,
    context: &mut SubstitutionContext<'_>,
) -> Result<Vec<String>> {
    let mut output = Vec::with_capacity(lines.len());
    substitute_level(lines, scope, context, &mut output)?;
    Ok(output)
}

fn substitute_level<S: AsRef<str>>(
    lines: &[S],
    scope: &mut Scope,
    context: &mut SubstitutionContext<'_>,
    output: &mut Vec<String>,
) -> Result<()> {
    for segment in split_blocks(lines) {
        match segment {
            Segment::Passthrough(line) => output.push(line),
            Segment::Block(block) => {
                output.push(substitute_line(&block.head, scope, context)?);
                let mut branch = scope.clone();
                substitute_level(&block.children, &mut branch, context, output)?;
            }
        }
    }
    Ok(())
}
