//! Indentation splitter: groups lines into sibling entities.
//!
//! A call looks at one level only. The first non-directive line fixes the
//! sibling indentation; every line indented deeper than that is handed,
//! verbatim, to the entity above it. Child lines are split again only when the
//! entity's renderer asks for its children, so one call never recurses.
//!
//! ```text
//! mchoice:- Which is larger?      <- entity (indent 0)
//!   alternative:- {{3}}           <- child line
//!   alternative:- {{4}}           <- child line
//! svg: width=50                   <- entity (indent 0)
//!   square: side=10               <- child line
//! ```
//!
//! Splitting happens in two stages: [`split_blocks`] is the structural pass
//! (which lines belong together) and [`split_entities`] parses each block's
//! head line into an [`Entity`]. The substitution pass reuses the structural
//! pass to walk the same tree before any head is parsed.

use quizmd_kvparser::{parse_with_warnings, Attributes};

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{CompileError, Result};
use crate::line::{indentation, is_blank, is_directive, join_continuations};

/// Marker of the `name:- content` shorthand.
pub const SHORTHAND_MARKER: &str = ":-";

/// A head line and the deeper-indented lines below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub head: String,
    pub indent: usize,
    pub children: Vec<String>,
}

/// One item of a structural split, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A directive, or a blank line before the first block, passed through
    /// untouched.
    Passthrough(String),
    Block(Block),
}

/// One node of the document tree.
///
/// `child_lines` are owned by the entity until its renderer splits them into
/// child entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub config: Attributes,
    pub child_lines: Vec<String>,
    pub indent: usize,
}

/// Result of splitting one level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    /// `%%{...}%%` lines of this level, verbatim.
    pub directives: Vec<String>,
    pub entities: Vec<Entity>,
}

impl Forest {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// States of the structural splitter.
#[derive(Debug)]
enum SplitState {
    /// Before the first entity: directives and blank lines pass through.
    AwaitingDirective,
    /// The sibling level is known; the next line opens an entity.
    AwaitingEntity { base_indent: usize },
    /// Gathering lines indented deeper than `base_indent`.
    CollectingChildLines { base_indent: usize, block: Block },
}

/// Structural split of `lines` into passthrough lines and blocks.
///
/// Every input line lands in exactly one segment, in order. Directive lines
/// never open a block: at this level they pass through, indented deeper they
/// stay with the block being collected. Blank lines never open a block
/// either: before the first block they pass through, afterwards they stay
/// with the block being collected. Continuations are not joined here.
pub fn split_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut state = SplitState::AwaitingDirective;

    for line in lines.iter().map(|line| line.as_ref().to_string()) {
        // A line that closes a block is fed again to the next state.
        let mut pending = Some(line);
        while let Some(line) = pending.take() {
            state = match state {
                SplitState::AwaitingDirective => {
                    if is_directive(&line) || is_blank(&line) {
                        segments.push(Segment::Passthrough(line));
                        SplitState::AwaitingDirective
                    } else {
                        let base_indent = indentation(&line);
                        open_block(line, base_indent)
                    }
                }
                SplitState::AwaitingEntity { base_indent } => {
                    if is_directive(&line) {
                        segments.push(Segment::Passthrough(line));
                        SplitState::AwaitingEntity { base_indent }
                    } else {
                        open_block(line, base_indent)
                    }
                }
                SplitState::CollectingChildLines {
                    base_indent,
                    mut block,
                } => {
                    if is_blank(&line) || indentation(&line) > base_indent {
                        block.children.push(line);
                        SplitState::CollectingChildLines { base_indent, block }
                    } else {
                        segments.push(Segment::Block(block));
                        pending = Some(line);
                        SplitState::AwaitingEntity { base_indent }
                    }
                }
            };
        }
    }

    if let SplitState::CollectingChildLines { block, .. } = state {
        segments.push(Segment::Block(block));
    }

    segments
}

fn open_block(head: String, base_indent: usize) -> SplitState {
    let indent = indentation(&head);
    SplitState::CollectingChildLines {
        base_indent,
        block: Block {
            head,
            indent,
            children: Vec::new(),
        },
    }
}

/// Splits one level of `lines` into sibling entities.
///
/// Continuation lines are joined before indentation is measured. Unknown
/// entity names are not detected here; that is left to dispatch.
///
/// # Errors
///
/// [`CompileError::Attributes`] when a head line's attribute string is
/// malformed. Misplaced `=` signs are only recorded in `diagnostics`.
pub fn split_entities<S: AsRef<str>>(lines: &[S], diagnostics: &mut Diagnostics) -> Result<Forest> {
    let mut forest = Forest::default();
    let lines = join_continuations(lines);

    for segment in split_blocks(&lines) {
        match segment {
            Segment::Passthrough(line) => {
                if is_directive(&line) {
                    forest.directives.push(line);
                }
            }
            Segment::Block(block) => {
                let (name, config) = parse_head(&block.head, diagnostics)?;
                forest.entities.push(Entity {
                    name,
                    config,
                    child_lines: block.children,
                    indent: block.indent,
                });
            }
        }
    }

    Ok(forest)
}

/// Parses an entity head line into its name and configuration.
///
/// - `name:- text` gives `{content: " text"}`, the text kept as written.
/// - `name: attrs` gives the parsed attribute string.
/// - Anything else is a bare name with no configuration.
pub fn parse_head(line: &str, diagnostics: &mut Diagnostics) -> Result<(String, Attributes)> {
    let trimmed = line.trim();

    let Some(colon) = line.find(':') else {
        return Ok((trimmed.to_string(), Attributes::new()));
    };

    let name = line[..colon].trim().to_string();
    let tail = &line[colon..];

    if let Some(content) = tail.strip_prefix(SHORTHAND_MARKER) {
        return Ok((name, Attributes::content(content)));
    }

    let rest = &tail[1..];
    let mut warnings = Vec::new();
    let config = parse_with_warnings(rest, &mut warnings).map_err(|source| {
        CompileError::Attributes {
            line: trimmed.to_string(),
            source,
        }
    })?;
    for detail in warnings {
        diagnostics.warn(Warning::MisplacedAssignment {
            line: trimmed.to_string(),
            detail,
        });
    }

    Ok((name, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizmd_kvparser::AttrValue;

    fn entities(lines: &[&str]) -> Vec<Entity> {
        split_entities(lines, &mut Diagnostics::new())
            .unwrap()
            .entities
    }

    #[test]
    fn test_empty_input() {
        assert!(split_entities::<&str>(&[], &mut Diagnostics::new())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_only_directives() {
        let forest = split_entities(
            &["%%{config: randomize}%%", "%%{config: seed=1}%%"],
            &mut Diagnostics::new(),
        )
        .unwrap();
        assert!(forest.is_empty());
        assert_eq!(forest.directives.len(), 2);
    }

    #[test]
    fn test_single_entity_with_attributes() {
        let found = entities(&["square: side=50"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "square");
        assert_eq!(found[0].config.text("side"), Some("50"));
        assert!(found[0].child_lines.is_empty());
    }

    #[test]
    fn test_shorthand_keeps_leading_space() {
        let found = entities(&["alternative:- some text"]);
        assert_eq!(found[0].name, "alternative");
        assert_eq!(found[0].config.text("content"), Some(" some text"));
    }

    #[test]
    fn test_shorthand_keeps_trailing_space() {
        let found = entities(&["alternative:- text  "]);
        assert_eq!(found[0].config.text("content"), Some(" text  "));
    }

    #[test]
    fn test_shorthand_with_space_before_marker() {
        let found = entities(&["mmchoice :- main statement"]);
        assert_eq!(found[0].name, "mmchoice");
        assert_eq!(found[0].config.text("content"), Some(" main statement"));
    }

    #[test]
    fn test_shorthand_content_may_contain_colons() {
        let found = entities(&["mchoice:- ratio a:b is 1:2"]);
        assert_eq!(found[0].name, "mchoice");
        assert_eq!(found[0].config.text("content"), Some(" ratio a:b is 1:2"));
    }

    #[test]
    fn test_bare_name() {
        let found = entities(&["  svg  "]);
        assert_eq!(found[0].name, "svg");
        assert!(found[0].config.is_empty());
    }

    #[test]
    fn test_attribute_without_space_after_colon() {
        let found = entities(&["square:side=5"]);
        assert_eq!(found[0].config.text("side"), Some("5"));
    }

    #[test]
    fn test_children_keep_indentation() {
        let found = entities(&[
            "mmchoice:- main",
            "  mchoice:- problem 1",
            "    alternative:- A",
            "  mchoice:- problem 2",
            "svg",
        ]);
        assert_eq!(found.len(), 2);
        assert_eq!(
            found[0].child_lines,
            vec!["  mchoice:- problem 1", "    alternative:- A", "  mchoice:- problem 2"]
        );
        assert_eq!(found[1].name, "svg");
    }

    #[test]
    fn test_siblings_at_base_indent() {
        let found = entities(&["  mchoice:- problem 1", "    alternative:- A", "  mchoice:- problem 2"]);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].indent, 2);
        assert_eq!(found[0].child_lines, vec!["    alternative:- A"]);
        assert!(found[1].child_lines.is_empty());
    }

    #[test]
    fn test_shallower_line_starts_new_entity() {
        let found = entities(&["    a", "  b", "      c"]);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].name, "b");
        assert_eq!(found[1].child_lines, vec!["      c"]);
    }

    #[test]
    fn test_continuation_before_indent_measure() {
        let found = entities(&["square: \\", "side=50"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].config.text("side"), Some("50"));
    }

    #[test]
    fn test_leading_directives_pass_through() {
        let forest = split_entities(
            &["%%{config: randomize}%%", "square: side=1"],
            &mut Diagnostics::new(),
        )
        .unwrap();
        assert_eq!(forest.directives, vec!["%%{config: randomize}%%"]);
        assert_eq!(forest.entities.len(), 1);
    }

    #[test]
    fn test_directives_between_entities_pass_through() {
        let mut diagnostics = Diagnostics::new();
        let forest = split_entities(
            &["square: side=1", "%%{config: randomize}%%", "rect", "  %%{config: seed=3}%%"],
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(forest.directives, vec!["%%{config: randomize}%%"]);
        let names: Vec<&str> = forest.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["square", "rect"]);
        assert_eq!(forest.entities[1].child_lines, vec!["  %%{config: seed=3}%%"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_blank_lines_never_open_entities() {
        let found = entities(&["", "square", "", "  child", "", "rect"]);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].child_lines, vec!["", "  child", ""]);
    }

    #[test]
    fn test_flag_attributes() {
        let found = entities(&["svg: responsive width=30"]);
        assert_eq!(found[0].config.get("responsive"), Some(&AttrValue::Flag));
    }

    #[test]
    fn test_bad_attributes_fail() {
        let err = split_entities(&["square: side=\"50"], &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, CompileError::Attributes { .. }));
    }

    #[test]
    fn test_misplaced_assign_is_recorded() {
        let mut diagnostics = Diagnostics::new();
        let forest = split_entities(&["square: =5 side=3"], &mut diagnostics).unwrap();
        assert_eq!(forest.entities[0].config.text("side"), Some("3"));
        assert_eq!(diagnostics.warnings().len(), 1);
        assert!(matches!(
            diagnostics.warnings()[0],
            Warning::MisplacedAssignment { .. }
        ));
    }

    #[test]
    fn test_blocks_cover_every_line() {
        let lines = ["%%{config: a}%%", "", "a", "  b", "%%{config: b}%%", "c", "  d", "    e"];
        let segments = split_blocks(&lines);
        let count: usize = segments
            .iter()
            .map(|s| match s {
                Segment::Passthrough(_) => 1,
                Segment::Block(b) => 1 + b.children.len(),
            })
            .sum();
        assert_eq!(count, lines.len());
    }
}
