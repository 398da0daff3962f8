//! Multiple-choice questions.
//!
//! ```text
//! mmchoice:- Problem 1
//!   mchoice:- What is {{12}} + {{30}}?
//!     alternative:- {{12*30}}
//!     solution:- {{12+30}}
//! ```
//!
//! `mmchoice` groups several questions. An `mchoice` lists its
//! alternatives in an `<ol type="A">` and shuffles them when randomizing.
//! A `solution` is a correct alternative; it is marked with its own class
//! only in solution view, so students cannot spot it in the markup.
//! Content arrives already typeset, since the compiler runs its math pass
//! over every line before dispatch.

use quizmd::{Attributes, RenderContext, Renderer, RendererPlugin, RendererRegistry, Result};

use crate::boxed;

const MMCHOICE_CLASS: &str = "quizmd-multiple-choice-mmchoice";
const MCHOICE_CLASS: &str = "quizmd-multiple-choice-mchoice";
const ALTERNATIVE_CLASS: &str = "quizmd-multiple-choice-alternative";
const SOLUTION_CLASS: &str = "quizmd-multiple-choice-solution";

/// Contributes the multiple-choice renderers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipleChoicePlugin;

impl RendererPlugin for MultipleChoicePlugin {
    fn register(&self, registry: &mut RendererRegistry) {
        registry
            .register("mmchoice", |config: &Attributes| {
                boxed(Choice::new(ChoiceKind::Problem, config))
            })
            .register("mchoice", |config: &Attributes| {
                boxed(Choice::new(ChoiceKind::Question, config))
            })
            .register("alternative", |config: &Attributes| {
                boxed(Choice::new(ChoiceKind::Alternative, config))
            })
            .register("solution", |config: &Attributes| {
                boxed(Choice::new(ChoiceKind::Solution, config))
            });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    /// A group of questions (`mmchoice`).
    Problem,
    /// One question with alternatives (`mchoice`).
    Question,
    Alternative,
    Solution,
}

/// A multiple-choice element with its text content.
#[derive(Debug, Clone)]
pub struct Choice {
    kind: ChoiceKind,
    content: String,
}

impl Choice {
    pub fn new(kind: ChoiceKind, config: &Attributes) -> Self {
        Self {
            kind,
            content: config.text("content").unwrap_or_default().to_string(),
        }
    }
}

impl Renderer for Choice {
    fn render_opening(&self, context: &RenderContext<'_>) -> Result<String> {
        let content = &self.content;
        Ok(match self.kind {
            ChoiceKind::Problem => format!(r#"<div class="{MMCHOICE_CLASS}">{content}"#),
            ChoiceKind::Question => {
                format!(r#"<div class="{MCHOICE_CLASS}">{content}<ol type="A">"#)
            }
            ChoiceKind::Alternative => format!(r#"<li class="{ALTERNATIVE_CLASS}">{content}"#),
            ChoiceKind::Solution => {
                let class = if context.options.solution_view {
                    SOLUTION_CLASS
                } else {
                    ALTERNATIVE_CLASS
                };
                format!(r#"<li class="{class}">{content}"#)
            }
        })
    }

    fn render_closing(&self, _context: &RenderContext<'_>) -> Result<String> {
        Ok(match self.kind {
            ChoiceKind::Problem => "</div>",
            ChoiceKind::Question => "</ol></div>",
            ChoiceKind::Alternative | ChoiceKind::Solution => "</li>",
        }
        .to_string())
    }

    fn shuffle_children(&self) -> bool {
        self.kind == ChoiceKind::Question
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::tests::render;
    use quizmd::{compile, CompileOptions, Compiler, MathPass, Scope};

    #[test]
    fn test_alternative() {
        assert_eq!(
            render(&["alternative:- 42"]).unwrap(),
            format!(r#"<li class="{ALTERNATIVE_CLASS}"> 42</li>"#)
        );
    }

    #[test]
    fn test_question_wraps_alternatives() {
        assert_eq!(
            render(&["mchoice: content='Pick'", "  alternative: content=a"]).unwrap(),
            format!(
                r#"<div class="{MCHOICE_CLASS}">Pick<ol type="A"><li class="{ALTERNATIVE_CLASS}">a</li></ol></div>"#
            )
        );
    }

    #[test]
    fn test_problem_without_content() {
        assert_eq!(
            render(&["mmchoice"]).unwrap(),
            format!(r#"<div class="{MMCHOICE_CLASS}"></div>"#)
        );
    }

    #[test]
    fn test_solution_is_hidden_outside_solution_view() {
        let registry = crate::default_registry();
        let lines = ["solution: content=yes"];

        let hidden = compile(&registry, &lines, Scope::new(), &CompileOptions::default()).unwrap();
        assert_eq!(hidden, format!(r#"<li class="{ALTERNATIVE_CLASS}">yes</li>"#));

        let options = CompileOptions {
            solution_view: true,
            ..CompileOptions::default()
        };
        let shown = compile(&registry, &lines, Scope::new(), &options).unwrap();
        assert_eq!(shown, format!(r#"<li class="{SOLUTION_CLASS}">yes</li>"#));
    }

    #[test]
    fn test_content_is_typeset_once() {
        // Output that itself holds a delimiter shows a second pass.
        let compiler = Compiler::new(crate::default_registry())
            .with_math(MathPass::new(|tex: &str| format!("<m>${tex}$</m>")));
        let result = compiler
            .compile(&["alternative: content='$x$'"], Scope::new(), &CompileOptions::default())
            .unwrap();
        assert_eq!(
            result.output,
            format!(r#"<li class="{ALTERNATIVE_CLASS}"><m>$x$</m></li>"#)
        );
    }

    #[test]
    fn test_only_questions_shuffle() {
        let config = Attributes::new();
        assert!(Choice::new(ChoiceKind::Question, &config).shuffle_children());
        for kind in [ChoiceKind::Problem, ChoiceKind::Alternative, ChoiceKind::Solution] {
            assert!(!Choice::new(kind, &config).shuffle_children());
        }
    }
}
