//! Renders entity trees through the registry.
//!
//! Each entity is looked up by name, rendered as opening fragment, children
//! and closing fragment, and the children are split and rendered the same
//! way. An unknown name is not an error: it is reported as a warning and
//! renders as nothing, so one bad line never takes its siblings down.

use rand::RngCore;

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::Result;
use crate::math::MathRenderer;
use crate::options::CompileOptions;
use crate::registry::RendererRegistry;
use crate::renderer::RenderContext;
use crate::shuffle::shuffle;
use crate::splitter::{split_entities, Entity};

/// State shared by every entity rendered in one compilation.
pub struct RenderSession<'a> {
    registry: &'a RendererRegistry,
    options: &'a CompileOptions,
    math: &'a dyn MathRenderer,
    rng: &'a mut dyn RngCore,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> RenderSession<'a> {
    pub fn new(
        registry: &'a RendererRegistry,
        options: &'a CompileOptions,
        math: &'a dyn MathRenderer,
        rng: &'a mut dyn RngCore,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            registry,
            options,
            math,
            rng,
            diagnostics,
        }
    }

    /// Splits `lines` into sibling entities and renders them in order.
    ///
    /// # Errors
    ///
    /// Malformed attributes and errors raised by renderers.
    pub fn render_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<String> {
        self.render_siblings(lines, false)
    }

    /// Renders one entity and, recursively, its children.
    ///
    /// # Errors
    ///
    /// Errors raised by the entity's renderer or by any descendant.
    pub fn render_entity(&mut self, entity: &Entity) -> Result<String> {
        let Some(factory) = self.registry.get(&entity.name) else {
            self.diagnostics.warn(Warning::UnknownRenderer {
                name: entity.name.clone(),
            });
            return Ok(String::new());
        };

        tracing::debug!(
            name = %entity.name,
            children = entity.child_lines.len(),
            "rendering entity"
        );

        let renderer = factory(&entity.config)?;
        let context = RenderContext::new(&entity.name, self.options, self.math);

        let opening = renderer.render_opening(&context)?;
        let children = self.render_siblings(&entity.child_lines, renderer.shuffle_children())?;
        let closing = renderer.render_closing(&context)?;

        Ok(opening + &children + &closing)
    }

    fn render_siblings<S: AsRef<str>>(&mut self, lines: &[S], shuffle_eligible: bool) -> Result<String> {
        if lines.is_empty() {
            return Ok(String::new());
        }

        let forest = split_entities(lines, self.diagnostics)?;
        let mut rendered = forest
            .entities
            .iter()
            .map(|entity| self.render_entity(entity))
            .collect::<Result<Vec<_>>>()?;

        if shuffle_eligible && self.options.randomize && rendered.len() > 1 {
            tracing::trace!(count = rendered.len(), "shuffling children");
            shuffle(&mut rendered, &mut *self.rng);
        }

        Ok(rendered.concat())
    }
}
