//! Recoverable problems found during compilation.
//!
//! A [`Warning`] never stops rendering. Each one is logged through `tracing`
//! when recorded and collected in [`Diagnostics`], which the caller receives
//! alongside the output (see [`Compilation`](crate::Compilation)). Warnings are
//! never written into the markup itself.

use std::fmt;

use quizmd_kvparser::KvWarning;

/// A recoverable problem. The offending piece degrades to empty output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// An entity names a renderer that is not registered.
    UnknownRenderer { name: String },

    /// A stray `=` in an attribute string.
    MisplacedAssignment { line: String, detail: KvWarning },

    /// Substitution of a line stopped before all placeholders were resolved,
    /// because resolved values kept producing new placeholders.
    SubstitutionLimit { line: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownRenderer { name } => {
                write!(f, "no renderer registered for '{}'", name)
            }
            Warning::MisplacedAssignment { line, detail } => {
                write!(f, "{} in '{}'", detail, line)
            }
            Warning::SubstitutionLimit { line } => {
                write!(f, "placeholder substitution did not settle in '{}'", line)
            }
        }
    }
}

/// Collects warnings for one compilation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and records a warning.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        diagnostics.warn(Warning::UnknownRenderer { name: "a".into() });
        diagnostics.warn(Warning::UnknownRenderer { name: "b".into() });
        assert_eq!(
            diagnostics.into_warnings(),
            vec![
                Warning::UnknownRenderer { name: "a".into() },
                Warning::UnknownRenderer { name: "b".into() },
            ]
        );
    }

    #[test]
    fn test_display() {
        let warning = Warning::UnknownRenderer {
            name: "hexagon".into(),
        };
        assert_eq!(warning.to_string(), "no renderer registered for 'hexagon'");
    }
}
