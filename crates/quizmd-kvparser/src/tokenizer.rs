//! Tokenizer for attribute strings.

use crate::error::KvError;

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A standalone `=`.
    Assign { offset: usize },
    /// A key, value or flag, with quotes removed and escapes resolved.
    Word { text: String, offset: usize },
}

/// Splits an attribute string into [`Token`]s.
///
/// Yields an error and stops at the first unterminated quote.
pub(crate) struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            failed: false,
        }
    }

    /// Characters that a backslash turns into literals.
    pub(crate) fn is_escapable(c: char) -> bool {
        matches!(c, '"' | '\'' | '=' | ' ')
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn quoted(&mut self, quote: char) -> Result<Token, KvError> {
        let start = self.pos;
        let body_start = start + quote.len_utf8();
        let mut text = String::new();
        let mut chars = self.input[body_start..].char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if c == '\\' {
                if let Some(&(_, next)) = chars.peek() {
                    if Self::is_escapable(next) {
                        text.push(next);
                        chars.next();
                        continue;
                    }
                }
                text.push(c);
            } else if c == quote {
                self.pos = body_start + i + c.len_utf8();
                return Ok(Token::Word {
                    text,
                    offset: start,
                });
            } else {
                text.push(c);
            }
        }

        Err(KvError::UnterminatedQuote {
            quote,
            offset: start,
        })
    }

    fn bare(&mut self) -> Token {
        let start = self.pos;
        let mut text = String::new();
        let mut end = self.input.len();
        let mut chars = self.input[start..].char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            if c == '\\' {
                if let Some(&(_, next)) = chars.peek() {
                    if Self::is_escapable(next) {
                        text.push(next);
                        chars.next();
                        continue;
                    }
                }
                text.push(c);
            } else if c.is_whitespace() || c == '=' || c == '"' || c == '\'' {
                end = start + i;
                break;
            } else {
                text.push(c);
            }
        }

        self.pos = end;
        Token::Word {
            text,
            offset: start,
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, KvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_whitespace();
        let c = self.input[self.pos..].chars().next()?;

        let token = match c {
            '=' => {
                let offset = self.pos;
                self.pos += 1;
                Ok(Token::Assign { offset })
            }
            '"' | '\'' => self.quoted(c),
            _ => Ok(self.bare()),
        };
        if token.is_err() {
            self.failed = true;
        }
        Some(token)
    }
}
