//! Reindent-span resolution.
//!
//! After an exchange the moved block sits at a new nesting level and the
//! formatter has to fix it up. This module decides *which* lines it gets:
//! the block's lines minus blank lines at either edge.
//!
//! # Design choices
//!
//! - **Clamp, don't skip.** An all-blank block resolves to a single line
//!   (`first == last`) rather than to nothing. Formatters leave blank lines
//!   alone, so the call is a no-op either way, and callers never have to
//!   handle an inverted span.
//! - **Embedded documents.** With the embedded flag set, every non-blank line
//!   becomes its own one-line span. Blank lines are dropped entirely there.

use n_text::{Buffer, LineSpan, Span};

/// Inclusive line span covered by a char span that ends in a line break.
///
/// An empty span resolves to the line containing its start.
#[must_use]
pub fn block_lines(buffer: &Buffer, moved: Span) -> LineSpan {
    let last_char = if moved.is_empty() {
        moved.start
    } else {
        moved.end - 1
    };
    let first = buffer.char_to_line(moved.start).unwrap_or(0);
    let last = buffer.char_to_line(last_char).unwrap_or(first);
    LineSpan::new(first, last.max(first))
}

/// Shrink `span` past blank lines at both edges.
///
/// `first` advances while blank and short of `last`; `last` retreats while
/// blank and still after `first`.
#[must_use]
pub fn trim_blank_edges(buffer: &Buffer, span: LineSpan) -> LineSpan {
    let LineSpan { mut first, mut last } = span;
    while first < last && buffer.is_blank_line(first) {
        first += 1;
    }
    while last > first && buffer.is_blank_line(last) {
        last -= 1;
    }
    LineSpan::new(first, last)
}

/// The span the formatter should reindent after the block now at `moved`.
#[must_use]
pub fn resolve_span(buffer: &Buffer, moved: Span) -> LineSpan {
    trim_blank_edges(buffer, block_lines(buffer, moved))
}

/// Spans to hand to the formatter, one call each.
///
/// Normally a single trimmed span. With `embedded` set, one single-line span
/// per non-blank line of the block.
#[must_use]
pub fn resolve_spans(buffer: &Buffer, moved: Span, embedded: bool) -> Vec<LineSpan> {
    let span = resolve_span(buffer, moved);
    if !embedded {
        return vec![span];
    }
    span.lines()
        .filter(|&line| !buffer.is_blank_line(line))
        .map(LineSpan::single)
        .collect()
}
