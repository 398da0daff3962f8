//! # quizmd-renderers - the built-in quizmd renderer plugins
//!
//! Two [`RendererPlugin`]s:
//!
//! - [`GeometryPlugin`]: `svg`, `circle`, `ellipse`, `rect`, `square`,
//!   `rhombus`, `polygon` and `polyline`, drawing SVG shapes.
//! - [`MultipleChoicePlugin`]: `mmchoice`, `mchoice`, `alternative` and
//!   `solution`, building HTML multiple-choice questions. Alternatives of an
//!   `mchoice` are shuffled when randomizing.
//!
//! ```rust
//! use quizmd::{compile, CompileOptions, Scope};
//! use quizmd_renderers::default_registry;
//!
//! let output = compile(
//!     &default_registry(),
//!     &["square: side=10"],
//!     Scope::new(),
//!     &CompileOptions::default(),
//! )?;
//! assert_eq!(
//!     output,
//!     r#"<rect width="10" height="10" x="0" y="0" fill="none" stroke-width="0.1" stroke="black"/>"#
//! );
//! # Ok::<(), quizmd::CompileError>(())
//! ```

pub mod geometry;
pub mod multiple_choice;
pub mod poly;

pub use geometry::GeometryPlugin;
pub use multiple_choice::MultipleChoicePlugin;

use quizmd::{Attributes, Renderer, RendererRegistry, Result};

/// A registry holding every built-in renderer.
pub fn default_registry() -> RendererRegistry {
    RendererRegistry::from_plugins(&[&GeometryPlugin, &MultipleChoicePlugin])
}

/// The value of `key`, or `default` when it is missing, a bare flag or empty.
pub(crate) fn text_or<'a>(config: &'a Attributes, key: &str, default: &'a str) -> &'a str {
    config
        .text(key)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
}

pub(crate) fn boxed<R: Renderer + 'static>(renderer: R) -> Result<Box<dyn Renderer>> {
    Ok(Box::new(renderer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_names() {
        let registry = default_registry();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "alternative",
                "circle",
                "ellipse",
                "mchoice",
                "mmchoice",
                "polygon",
                "polyline",
                "rect",
                "rhombus",
                "solution",
                "square",
                "svg",
            ]
        );
    }

    #[test]
    fn test_text_or() {
        let mut config = Attributes::new();
        config.insert("a", "1");
        config.insert("empty", "");
        config.insert("flag", quizmd::AttrValue::Flag);
        assert_eq!(text_or(&config, "a", "x"), "1");
        assert_eq!(text_or(&config, "empty", "x"), "x");
        assert_eq!(text_or(&config, "flag", "x"), "x");
        assert_eq!(text_or(&config, "missing", "x"), "x");
    }
}
