//! Folding tokens into an [`Attributes`] map.

use crate::attributes::{AttrValue, Attributes};
use crate::error::{KvError, KvWarning, Result};
use crate::tokenizer::{Token, Tokenizer};

/// Parses an attribute string, logging recoverable problems.
///
/// Warnings are sent to `tracing` only. Use [`parse_with_warnings`] to
/// collect them as values.
///
/// # Errors
///
/// [`KvError::UnterminatedQuote`] or [`KvError::EmptyKey`].
pub fn parse(input: &str) -> Result<Attributes> {
    let mut warnings = Vec::new();
    parse_with_warnings(input, &mut warnings)
}

/// Parses an attribute string, appending recoverable problems to `warnings`.
///
/// Tokens fold left to right:
///
/// - a key followed by `=` and a word stores a text value,
/// - a key followed by anything else (or nothing) is stored as a flag,
/// - an `=` with no key before it is reported and skipped.
pub fn parse_with_warnings(input: &str, warnings: &mut Vec<KvWarning>) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    let mut pending: Option<String> = None;
    let mut awaiting_value = false;

    for token in Tokenizer::new(input) {
        match token? {
            Token::Assign { offset } => {
                if pending.is_some() {
                    awaiting_value = true;
                } else {
                    let warning = KvWarning::MisplacedAssignment {
                        offset,
                        remainder: input[offset + 1..].trim().to_string(),
                    };
                    tracing::warn!(input, "{}", warning);
                    warnings.push(warning);
                }
            }
            Token::Word { text, offset } => match pending.take() {
                Some(key) if awaiting_value => {
                    attributes.insert(key, AttrValue::Text(text));
                    awaiting_value = false;
                }
                previous => {
                    if let Some(key) = previous {
                        attributes.insert(key, AttrValue::Flag);
                    }
                    if text.is_empty() {
                        return Err(KvError::EmptyKey { offset });
                    }
                    pending = Some(text);
                }
            },
        }
    }

    // A trailing key, with or without a dangling `=`, is a flag.
    if let Some(key) = pending {
        attributes.insert(key, AttrValue::Flag);
    }

    Ok(attributes)
}
