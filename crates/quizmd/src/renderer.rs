//! The renderer capability set and what a renderer sees at render time.

use std::fmt;
use std::sync::Arc;

use quizmd_kvparser::Attributes;

use crate::error::{CompileError, Result};
use crate::math::MathRenderer;
use crate::options::CompileOptions;

/// Information available while an entity renders.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// The registry name the entity was dispatched under.
    pub name: &'a str,

    /// Options of the current compilation, after directives were applied.
    pub options: &'a CompileOptions,

    /// Math typesetting for text a renderer generates itself. Content read
    /// from the document has already been through it.
    pub math: &'a dyn MathRenderer,
}

impl<'a> RenderContext<'a> {
    pub fn new(name: &'a str, options: &'a CompileOptions, math: &'a dyn MathRenderer) -> Self {
        Self {
            name,
            options,
            math,
        }
    }
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// One entity's renderer.
///
/// An entity renders as `opening + children + closing`, where the children
/// are the entity's child lines compiled recursively by the dispatcher.
pub trait Renderer {
    /// The fragment before the children.
    ///
    /// Every renderer must override this. The default reports a
    /// [`CompileError::ContractViolation`].
    fn render_opening(&self, context: &RenderContext<'_>) -> Result<String> {
        Err(CompileError::ContractViolation {
            renderer: context.name.to_string(),
        })
    }

    /// The fragment after the children. Empty by default.
    fn render_closing(&self, _context: &RenderContext<'_>) -> Result<String> {
        Ok(String::new())
    }

    /// Whether rendered children may be reordered when randomizing.
    fn shuffle_children(&self) -> bool {
        false
    }
}

/// Builds a renderer for one entity from its configuration.
pub type RendererFactory =
    Arc<dyn Fn(&Attributes) -> Result<Box<dyn Renderer>> + Send + Sync + 'static>;
