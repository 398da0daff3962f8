//! Error types for compilation.
//!
//! Errors are fatal to the render call that raised them and bubble up to the
//! caller of [`compile`](crate::compile). Recoverable problems are reported as
//! [`Warning`](crate::Warning)s instead and never abort rendering.

use quizmd_kvparser::KvError;
use thiserror::Error;

/// Errors raised while evaluating an arithmetic placeholder.
///
/// Positions are byte offsets into the expression text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A character outside the arithmetic grammar, e.g. a letter or quote.
    #[error("unsupported character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    /// The expression stopped where an operand or `)` was expected.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A well-formed token in the wrong place, e.g. `2 3` or `)`.
    #[error("unexpected '{token}' at position {pos}")]
    UnexpectedToken { token: String, pos: usize },

    /// A number literal that does not parse, e.g. `1.2.3`.
    #[error("invalid number '{literal}' at position {pos}")]
    InvalidNumber { literal: String, pos: usize },

    /// Parentheses or unary signs nest deeper than the evaluator allows.
    #[error("expression nests too deeply at position {pos}")]
    TooDeep { pos: usize },

    #[error("division by zero")]
    DivisionByZero,

    /// The result overflowed or is otherwise not a finite number.
    #[error("result is not a finite number")]
    NotFinite,
}

/// Errors that abort a compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// An entity line's attribute string is malformed.
    #[error("invalid attributes in line '{line}': {source}")]
    Attributes {
        line: String,
        #[source]
        source: KvError,
    },

    /// A `{{...}}` placeholder is neither a variable nor valid arithmetic.
    #[error("cannot evaluate placeholder '{{{{{placeholder}}}}}': {source}")]
    Expression {
        placeholder: String,
        #[source]
        source: ExprError,
    },

    /// A renderer needs an attribute the author did not give.
    #[error("{renderer}: required attribute '{attribute}' is missing")]
    MissingAttribute {
        renderer: String,
        attribute: String,
    },

    /// An attribute is present but unusable.
    #[error("{renderer}: invalid attribute '{attribute}': {message}")]
    InvalidAttribute {
        renderer: String,
        attribute: String,
        message: String,
    },

    /// A registered renderer does not produce an opening fragment. This is a
    /// bug in the renderer plugin, not in the document.
    #[error("renderer '{renderer}' does not implement render_opening")]
    ContractViolation { renderer: String },
}

impl CompileError {
    pub fn missing_attribute(renderer: impl Into<String>, attribute: impl Into<String>) -> Self {
        CompileError::MissingAttribute {
            renderer: renderer.into(),
            attribute: attribute.into(),
        }
    }

    pub fn invalid_attribute(
        renderer: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        CompileError::InvalidAttribute {
            renderer: renderer.into(),
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, CompileError>;
