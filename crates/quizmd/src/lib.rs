//! # quizmd - a compiler for structured-quiz markup
//!
//! quizmd turns indentation-structured lines into nested SVG and HTML
//! fragments. Each line names a renderer; deeper-indented lines below it are
//! its children:
//!
//! ```text
//! %%{config: randomize}%%
//! mchoice:- What is {{12}} + {{30}}?
//!   alternative:- {{12+30}}
//!   alternative:- {{12*30}}
//! svg: width=50px height=50px
//!   square: side={{40}}
//! ```
//!
//! ## Pipeline
//!
//! 1. Continuation lines (ending in `\`) are joined.
//! 2. `%%{config: ...}%%` directives adjust the [`CompileOptions`].
//! 3. `{{...}}` placeholders are substituted: plain ones through the
//!    [`Scope`] of [`Variable`]s, arithmetic ones through a small
//!    [evaluator](expr) that knows numbers and `+ - * / ^ ( )` only.
//! 4. A [`MathRenderer`] typesets `$...$` math.
//! 5. Lines are split into [`Entity`] trees and dispatched through the
//!    [`RendererRegistry`]. Children of shuffle-eligible renderers are
//!    reordered when randomizing.
//!
//! Problems that only affect one entity, such as an unknown renderer name,
//! become [`Warning`]s and render as nothing. Everything else is a
//! [`CompileError`].
//!
//! ## Example
//!
//! ```rust
//! use quizmd::{
//!     compile, Attributes, CompileOptions, RenderContext, Renderer, RendererRegistry, Result, Scope,
//! };
//!
//! struct Echo(String);
//!
//! impl Renderer for Echo {
//!     fn render_opening(&self, _context: &RenderContext<'_>) -> Result<String> {
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! let mut registry = RendererRegistry::new();
//! registry.register("x", |config: &Attributes| {
//!     Ok(Box::new(Echo(config.text("content").unwrap_or_default().trim().to_string()))
//!         as Box<dyn Renderer>)
//! });
//!
//! let output = compile(&registry, &["x:- {{1*2*3}}"], Scope::new(), &CompileOptions::default())?;
//! assert_eq!(output, "6");
//! # Ok::<(), quizmd::CompileError>(())
//! ```

pub mod compiler;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod expr;
pub mod line;
pub mod math;
pub mod names;
pub mod options;
pub mod registry;
pub mod renderer;
pub mod shuffle;
pub mod splitter;
pub mod substitute;
pub mod variable;

pub use compiler::{compile, Compilation, Compiler};
pub use diagnostics::{Diagnostics, Warning};
pub use error::{CompileError, ExprError, Result};
pub use math::{MathPass, MathRenderer, NoMath};
pub use names::{NameGenerator, NameTable};
pub use options::CompileOptions;
pub use registry::{RendererPlugin, RendererRegistry};
pub use renderer::{RenderContext, Renderer, RendererFactory};
pub use splitter::{split_entities, Entity, Forest};
pub use substitute::{substitute, SubstitutionContext};
pub use variable::{Scope, Variable, VariableKind};

pub use quizmd_kvparser::{AttrValue, Attributes};
