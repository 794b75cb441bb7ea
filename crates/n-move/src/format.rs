//! Formatters: the collaborator that fixes indentation after a move.
//!
//! A [`Formatter`] receives the buffer and an inclusive [`LineSpan`] and
//! rewrites indentation inside it. It must edit through the [`Buffer`] so that
//! tracked ranges (moved block, caret, selection) follow its edits.
//!
//! Two implementations ship here, and any
//! `FnMut(&mut Buffer, LineSpan) -> Result<(), ReformatError>` closure is a
//! formatter too:
//!
//! - [`KeepIndent`] leaves the text alone.
//! - [`SyntaxIndenter`] parses the buffer with tree-sitter and indents every
//!   non-blank line by its bracket nesting depth.
//!
//! # Design choices
//!
//! - **Depths first, edits second.** The tree is built once per call and all
//!   depths are computed before any line is touched. Reindenting only rewrites
//!   leading whitespace, so line numbers stay valid throughout.
//! - **Full reparse.** The buffer is converted to a `String` and parsed from
//!   scratch on every call. A move edits a handful of lines, and tree-sitter
//!   is fast enough for that not to matter.

use n_text::{Buffer, LineSpan};
use ropey::Rope;
use tracing::{debug, trace};
use tree_sitter::{Node, Parser};

use crate::error::ReformatError;
use crate::options::MoveOptions;

// ---------------------------------------------------------------------------
// Formatter
// ---------------------------------------------------------------------------

/// Reindents a span of lines in place.
pub trait Formatter {
    /// Reindent lines `span.first..=span.last`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReformatError`] when the span can't be reindented. Edits
    /// made before the failure stay in the buffer.
    fn reindent(&mut self, buffer: &mut Buffer, span: LineSpan) -> Result<(), ReformatError>;
}

impl<F> Formatter for F
where
    F: FnMut(&mut Buffer, LineSpan) -> Result<(), ReformatError>,
{
    fn reindent(&mut self, buffer: &mut Buffer, span: LineSpan) -> Result<(), ReformatError> {
        self(buffer, span)
    }
}

/// A formatter that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepIndent;

impl Formatter for KeepIndent {
    fn reindent(&mut self, _buffer: &mut Buffer, _span: LineSpan) -> Result<(), ReformatError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SyntaxIndenter
// ---------------------------------------------------------------------------

/// Node kinds whose contents sit one level deeper than their first line.
const INDENT_NODES: &[&str] = &[
    "block",
    "declaration_list",
    "field_declaration_list",
    "ordered_field_declaration_list",
    "enum_variant_list",
    "field_initializer_list",
    "match_block",
    "use_list",
    "arguments",
    "parameters",
    "array_expression",
    "tuple_expression",
    "token_tree",
];

/// Node kinds whose interior lines are text, not code.
const VERBATIM_NODES: &[&str] = &["string_literal", "raw_string_literal", "block_comment"];

/// Tree-sitter driven indenter.
///
/// A line's depth is the number of enclosing [`INDENT_NODES`] that opened on
/// an earlier line. A container that closes on the line itself doesn't count
/// when the line starts with the closing bracket.
pub struct SyntaxIndenter {
    parser: Parser,
    options: MoveOptions,
}

impl std::fmt::Debug for SyntaxIndenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxIndenter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SyntaxIndenter {
    /// Create an indenter for `language_name`.
    ///
    /// Returns `None` if the language is not supported.
    #[must_use]
    pub fn new(language_name: &str, options: MoveOptions) -> Option<Self> {
        let ts_language: tree_sitter::Language = match language_name {
            "rust" => tree_sitter_rust::LANGUAGE.into(),
            _ => return None,
        };
        let mut parser = Parser::new();
        parser.set_language(&ts_language).ok()?;
        Some(Self { parser, options })
    }

    /// The options indentation is computed with.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> &MoveOptions {
        &self.options
    }

    /// Target nesting depth of every non-blank line in `span`.
    fn depths(
        &mut self,
        buffer: &Buffer,
        span: LineSpan,
    ) -> Result<Vec<(usize, usize)>, ReformatError> {
        let source = rope_to_string(buffer.rope());
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| ReformatError::new(span, "parser produced no tree"))?;
        let root = tree.root_node();

        let mut depths = Vec::with_capacity(span.len());
        for line in span.lines() {
            if buffer.is_blank_line(line) {
                continue;
            }
            let indent = buffer.leading_whitespace(line).len();
            let byte = buffer.rope().line_to_byte(line) + indent;
            let Some(node) = root.descendant_for_byte_range(byte, byte + 1) else {
                continue;
            };
            let closes = matches!(source.as_bytes().get(byte), Some(b'}' | b')' | b']'));
            if let Some(depth) = nesting_depth(node, line, closes) {
                depths.push((line, depth));
            }
        }
        Ok(depths)
    }
}

impl Formatter for SyntaxIndenter {
    fn reindent(&mut self, buffer: &mut Buffer, span: LineSpan) -> Result<(), ReformatError> {
        if span.last >= buffer.line_count() {
            return Err(ReformatError::new(
                span,
                format!("buffer has only {} lines", buffer.line_count()),
            ));
        }

        let depths = self.depths(buffer, span)?;
        let width = self.options.effective_shiftwidth();
        let mut changed = 0usize;
        for (line, depth) in depths {
            let Some(start) = buffer.line_start_offset(line) else {
                continue;
            };
            let current = buffer.leading_whitespace(line);
            let wanted = self.options.indent_string(depth * width);
            if current != wanted {
                trace!(line, depth, "reindenting line");
                buffer.replace_text(start, start + current.chars().count(), &wanted);
                changed += 1;
            }
        }
        debug!(%span, changed, "reindent done");
        Ok(())
    }
}

/// Count indenting ancestors of `node` that opened before `line`.
///
/// `None` when `line` starts inside a multi-line string or comment; those
/// lines are left as they are.
fn nesting_depth(node: Node<'_>, line: usize, closes: bool) -> Option<usize> {
    let mut depth = 0;
    let mut current = Some(node);
    while let Some(n) = current {
        let opened_before = n.start_position().row < line;
        if opened_before && VERBATIM_NODES.contains(&n.kind()) {
            return None;
        }
        if opened_before
            && INDENT_NODES.contains(&n.kind())
            && (n.end_position().row > line || !closes)
        {
            depth += 1;
        }
        current = n.parent();
    }
    Some(depth)
}

/// Convert a rope to a String for tree-sitter parsing.
fn rope_to_string(rope: &Rope) -> String {
    let mut s = String::with_capacity(rope.len_bytes());
    for chunk in rope.chunks() {
        s.push_str(chunk);
    }
    s
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
