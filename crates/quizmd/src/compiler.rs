//! The compilation pipeline.
//!
//! ```text
//! lines ─▶ join continuations ─▶ config directives ─▶ substitution
//!       ─▶ math ─▶ split + render ─▶ output
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::diagnostics::{Diagnostics, Warning};
use crate::dispatch::RenderSession;
use crate::error::Result;
use crate::line::join_continuations;
use crate::math::{MathRenderer, NoMath};
use crate::names::{NameGenerator, NameTable};
use crate::options::CompileOptions;
use crate::registry::RendererRegistry;
use crate::substitute::{substitute, SubstitutionContext};
use crate::variable::Scope;

/// Output of a compilation together with its warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compilation {
    pub output: String,
    pub warnings: Vec<Warning>,
}

/// A renderer registry plus the external collaborators of a compilation.
///
/// ```
/// use quizmd::{CompileOptions, Compiler, RendererRegistry, Scope};
///
/// let compiler = Compiler::new(RendererRegistry::new());
/// let result = compiler
///     .compile(&["circle: r=3"], Scope::new(), &CompileOptions::default())
///     .unwrap();
/// assert_eq!(result.output, "");
/// assert_eq!(result.warnings.len(), 1);
/// ```
pub struct Compiler {
    registry: RendererRegistry,
    math: Box<dyn MathRenderer>,
    names: Box<dyn NameGenerator>,
}

impl Compiler {
    /// A compiler without math typesetting, using the built-in name tables.
    pub fn new(registry: RendererRegistry) -> Self {
        Self {
            registry,
            math: Box::new(NoMath),
            names: Box::new(NameTable),
        }
    }

    pub fn with_math(mut self, math: impl MathRenderer + 'static) -> Self {
        self.math = Box::new(math);
        self
    }

    pub fn with_names(mut self, names: impl NameGenerator + 'static) -> Self {
        self.names = Box::new(names);
        self
    }

    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    /// Compiles `lines` into markup.
    ///
    /// `scope` may hold preloaded variables. `options` are the caller's
    /// defaults; `%%{config: ...}%%` lines override them for this call.
    ///
    /// # Errors
    ///
    /// The first [`CompileError`](crate::CompileError) raised by any stage.
    pub fn compile<S: AsRef<str>>(
        &self,
        lines: &[S],
        scope: Scope,
        options: &CompileOptions,
    ) -> Result<Compilation> {
        run(
            &self.registry,
            &*self.math,
            &*self.names,
            lines,
            scope,
            options,
        )
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Compiles `lines` with no math typesetting and the built-in name tables.
///
/// Warnings are logged and dropped; use [`Compiler`] to receive them.
///
/// # Errors
///
/// See [`Compiler::compile`].
pub fn compile<S: AsRef<str>>(
    registry: &RendererRegistry,
    lines: &[S],
    scope: Scope,
    options: &CompileOptions,
) -> Result<String> {
    run(registry, &NoMath, &NameTable, lines, scope, options).map(|compilation| compilation.output)
}

fn run<S: AsRef<str>>(
    registry: &RendererRegistry,
    math: &dyn MathRenderer,
    names: &dyn NameGenerator,
    lines: &[S],
    mut scope: Scope,
    options: &CompileOptions,
) -> Result<Compilation> {
    let lines = join_continuations(lines);

    let mut options = options.clone();
    options.apply_directives(&lines)?;

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut diagnostics = Diagnostics::new();

    tracing::debug!(lines = lines.len(), ?options, "compiling");

    let substituted = {
        let mut context =
            SubstitutionContext::new(options.randomize, &mut rng, names, &mut diagnostics);
        substitute(&lines, &mut scope, &mut context)?
    };
    let typeset = math.render_math(substituted);

    let output = RenderSession::new(registry, &options, math, &mut rng, &mut diagnostics)
        .render_lines(&typeset)?;

    Ok(Compilation {
        output,
        warnings: diagnostics.into_warnings(),
    })
}
