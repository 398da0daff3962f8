//! Compilation options and `%%{config: ...}%%` directives.

use quizmd_kvparser::Attributes;
use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};
use crate::line::directive_body;

/// Prefix of the directive body that carries options.
const CONFIG_PREFIX: &str = "config:";

/// Options for one compilation.
///
/// All fields default to off, so a partial JSON or YAML document is enough:
///
/// ```
/// use quizmd::CompileOptions;
///
/// let options: CompileOptions = serde_json::from_str(r#"{"randomize": true}"#).unwrap();
/// assert!(options.randomize);
/// assert_eq!(options.seed, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Replace variables with random values and shuffle eligible children.
    pub randomize: bool,

    /// Render solutions distinctly from other alternatives.
    pub solution_view: bool,

    /// Seed for the random generator. Without one, every compilation draws
    /// fresh values.
    pub seed: Option<u64>,
}

impl CompileOptions {
    pub fn randomized() -> Self {
        Self {
            randomize: true,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Applies the settings of every `%%{config: ...}%%` line in `lines`.
    ///
    /// Recognised keys are `randomize`, `solution` (or `solution_view`) and
    /// `seed`. A bare key or `yes`/`true`/`on`/`1` turns a switch on; any
    /// other value turns it off. Later directives override earlier ones.
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// [`CompileError::Attributes`] when a directive body does not parse, and
    /// [`CompileError::InvalidAttribute`] for a seed that is not a number.
    pub fn apply_directives<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<()> {
        for line in lines.iter().map(AsRef::as_ref) {
            let Some(settings) = directive_body(line)
                .map(str::trim_start)
                .and_then(|body| body.strip_prefix(CONFIG_PREFIX))
            else {
                continue;
            };

            let attributes: Attributes = settings.parse().map_err(|source| {
                CompileError::Attributes {
                    line: line.trim().to_string(),
                    source,
                }
            })?;
            self.apply(&attributes)?;
        }
        Ok(())
    }

    fn apply(&mut self, attributes: &Attributes) -> Result<()> {
        if attributes.contains("randomize") {
            self.randomize = attributes.switch("randomize");
        }
        for key in ["solution", "solution_view"] {
            if attributes.contains(key) {
                self.solution_view = attributes.switch(key);
            }
        }
        if let Some(seed) = attributes.text("seed") {
            let seed = seed.trim().parse().map_err(|_| {
                CompileError::invalid_attribute(
                    "config",
                    "seed",
                    format!("'{seed}' is not a number"),
                )
            })?;
            self.seed = Some(seed);
        }
        tracing::debug!(options = ?self, "applied config directive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompileOptions::default();
        assert!(!options.randomize);
        assert!(!options.solution_view);
        assert_eq!(options.seed, None);
    }

    #[test]
    fn test_directive_flags() {
        let mut options = CompileOptions::default();
        options
            .apply_directives(&["%%{config: randomize solution seed=42}%%"])
            .unwrap();
        assert_eq!(
            options,
            CompileOptions {
                randomize: true,
                solution_view: true,
                seed: Some(42),
            }
        );
    }

    #[test]
    fn test_directive_can_switch_off() {
        let mut options = CompileOptions::randomized();
        options
            .apply_directives(&["%%{config: randomize=no}%%"])
            .unwrap();
        assert!(!options.randomize);
    }

    #[test]
    fn test_later_directive_wins() {
        let mut options = CompileOptions::default();
        options
            .apply_directives(&["%%{config: seed=1}%%", "%%{config: seed=2}%%"])
            .unwrap();
        assert_eq!(options.seed, Some(2));
    }

    #[test]
    fn test_non_config_lines_are_ignored() {
        let mut options = CompileOptions::default();
        options
            .apply_directives(&["square: randomize", "%%{theme: dark}%%", "randomize"])
            .unwrap();
        assert_eq!(options, CompileOptions::default());
    }

    #[test]
    fn test_bad_seed() {
        let mut options = CompileOptions::default();
        let err = options
            .apply_directives(&["%%{config: seed=abc}%%"])
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidAttribute { .. }));
    }

    #[test]
    fn test_bad_directive_body() {
        let mut options = CompileOptions::default();
        let err = options
            .apply_directives(&["%%{config: seed=\"1}%%"])
            .unwrap_err();
        assert!(matches!(err, CompileError::Attributes { .. }));
    }

    #[test]
    fn test_serde_round_trip() {
        let options = CompileOptions::randomized().with_seed(9);
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"randomize":true,"solution_view":false,"seed":9}"#);
        let yaml: CompileOptions = serde_yaml::from_str("solution_view: true\n").unwrap();
        assert!(yaml.solution_view);
        assert!(!yaml.randomize);
    }
}
