//! Error and warning types for attribute parsing.

use thiserror::Error;

/// Fatal attribute syntax errors.
///
/// Offsets are byte offsets into the parsed attribute string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KvError {
    /// A quoted key or value has no closing quote.
    #[error("unterminated {quote} quote starting at offset {offset}")]
    UnterminatedQuote { quote: char, offset: usize },

    /// A key is empty once its quotes are stripped (`""=value`).
    #[error("empty attribute key at offset {offset}")]
    EmptyKey { offset: usize },
}

/// Recoverable problems found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvWarning {
    /// An `=` with no key before it. The `=` is dropped.
    MisplacedAssignment { offset: usize, remainder: String },
}

impl std::fmt::Display for KvWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KvWarning::MisplacedAssignment { offset, remainder } => write!(
                f,
                "misplaced '=' at offset {} before '{}'",
                offset, remainder
            ),
        }
    }
}

/// Result type for attribute parsing.
pub type Result<T> = std::result::Result<T, KvError>;
