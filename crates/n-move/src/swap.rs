//! The line swap engine: exchange two adjacent line ranges in place.
//!
//! # Algorithm
//!
//! 1. Validate the request against the buffer. Nothing is touched when the
//!    ranges are empty, out of bounds, overlapping, or not adjacent.
//! 2. Map both line ranges to char spans. An `end` equal to the line count
//!    maps to the end of the text.
//! 3. Copy out both texts, appending the buffer's line ending to a text that
//!    lacks one (only the buffer's last line can).
//! 4. Attach a tracked range over each span with [`Gravity::for_pair`].
//! 5. Rewrite range 1 (insert the secondary text at its start, delete what
//!    follows up to its end), then range 2 the same way with the primary
//!    text. Range 2's bounds are only right after range 1's edit has moved
//!    them, so the order is fixed.
//!
//! The result is an [`Exchange`] with both tracked ranges still attached, so
//! later steps (reindentation) keep them current. Call
//! [`Exchange::release`] to detach them.
//!
//! ```text
//! before:  a  [b]  (c)  d        primary = [b], secondary = (c)
//! step 5a: a  (c)c      d        range 1 rewritten, range 2 pushed along
//! step 5b: a  (c)  [b]  d        range 2 rewritten
//! ```

use n_text::buffer::ends_with_line_break;
use n_text::{Buffer, Gravity, LineRange, MarkerId, Span};
use tracing::{debug, trace};

use crate::error::{MoveError, RangeProblem};

// ---------------------------------------------------------------------------
// MoveRequest
// ---------------------------------------------------------------------------

/// What a range locator asks for: exchange `primary` (the lines being moved)
/// with `secondary` (the slot they move into).
///
/// Both ranges refer to the buffer *before* the edit and must be disjoint and
/// adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub primary: LineRange,
    pub secondary: LineRange,
}

impl MoveRequest {
    /// Create a request.
    #[inline]
    #[must_use]
    pub const fn new(primary: LineRange, secondary: LineRange) -> Self {
        Self { primary, secondary }
    }

    /// True when the primary block moves towards the end of the buffer.
    #[inline]
    #[must_use]
    pub const fn is_down(&self) -> bool {
        self.primary.start < self.secondary.start
    }

    /// Check the request against `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidRange`] naming the first broken rule.
    pub fn validate(&self, buffer: &Buffer) -> Result<(), MoveError> {
        let problem = self.problem(buffer.line_count());
        match problem {
            None => Ok(()),
            Some(problem) => Err(MoveError::InvalidRange {
                primary: self.primary,
                secondary: self.secondary,
                problem,
            }),
        }
    }

    const fn problem(&self, line_count: usize) -> Option<RangeProblem> {
        let (a, b) = (self.primary, self.secondary);
        if a.is_empty() || b.is_empty() {
            Some(RangeProblem::Empty)
        } else if a.end > line_count || b.end > line_count {
            Some(RangeProblem::OutOfBounds { line_count })
        } else if a.overlaps(b) {
            Some(RangeProblem::Overlapping)
        } else if !a.is_adjacent_to(b) {
            Some(RangeProblem::NotAdjacent)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// A completed text exchange whose tracked ranges are still attached.
///
/// - `displaced` was created over the primary lines; it now holds the
///   secondary text.
/// - `moved` was created over the secondary lines; it now holds the primary
///   text.
#[derive(Debug)]
#[must_use = "an exchange keeps tracked ranges attached until released"]
pub struct Exchange {
    displaced: MarkerId,
    moved: MarkerId,
    original_primary_start: usize,
}

impl Exchange {
    /// Where the primary lines started before the edit.
    #[inline]
    #[must_use]
    pub const fn original_primary_start(&self) -> usize {
        self.original_primary_start
    }

    /// Current span of the moved (primary) text.
    #[must_use]
    pub fn moved(&self, buffer: &Buffer) -> Span {
        span_of(buffer, self.moved)
    }

    /// Current span of the displaced (secondary) text.
    #[must_use]
    pub fn displaced(&self, buffer: &Buffer) -> Span {
        span_of(buffer, self.displaced)
    }

    /// Detach both tracked ranges and return their final spans as
    /// `(moved, displaced)`.
    pub fn release(self, buffer: &mut Buffer) -> (Span, Span) {
        let moved = self.moved(buffer);
        let displaced = self.displaced(buffer);
        buffer.untrack(self.moved);
        buffer.untrack(self.displaced);
        (moved, displaced)
    }
}

/// Span of an attached tracked range.
///
/// # Panics
///
/// Panics if the range was detached. An exchange owns its ranges until
/// [`Exchange::release`] consumes it.
fn span_of(buffer: &Buffer, id: MarkerId) -> Span {
    buffer
        .tracked(id)
        .expect("exchange range detached before release")
        .span
}

// ---------------------------------------------------------------------------
// exchange
// ---------------------------------------------------------------------------

/// Exchange the text of `request.primary` and `request.secondary`.
///
/// # Errors
///
/// Returns [`MoveError::InvalidRange`] if the request is invalid. The buffer
/// is untouched in that case.
pub fn exchange(buffer: &mut Buffer, request: MoveRequest) -> Result<Exchange, MoveError> {
    request.validate(buffer)?;

    let primary = char_span(buffer, request.primary);
    let secondary = char_span(buffer, request.secondary);
    let primary_text = whole_lines(buffer, primary);
    let secondary_text = whole_lines(buffer, secondary);

    debug!(
        primary = ?request.primary,
        secondary = ?request.secondary,
        down = request.is_down(),
        "exchanging line ranges"
    );

    let (primary_gravity, secondary_gravity) = Gravity::for_pair(primary.start, secondary.start);
    let displaced = buffer.track(primary, primary_gravity);
    let moved = buffer.track(secondary, secondary_gravity);

    rewrite(buffer, displaced, &secondary_text);
    rewrite(buffer, moved, &primary_text);

    let exchange = Exchange {
        displaced,
        moved,
        original_primary_start: primary.start,
    };
    trace!(
        moved = ?exchange.moved(buffer),
        displaced = ?exchange.displaced(buffer),
        "exchange complete"
    );
    Ok(exchange)
}

/// Char span covered by a validated line range.
fn char_span(buffer: &Buffer, lines: LineRange) -> Span {
    let start = buffer.line_start_safe_offset(lines.start);
    let end = buffer.line_start_safe_offset(lines.end);
    match (start, end) {
        (Some(start), Some(end)) => Span::new(start, end),
        _ => unreachable!("line range {lines:?} validated against the buffer"),
    }
}

/// Text of `span`, terminated with a line break.
fn whole_lines(buffer: &Buffer, span: Span) -> String {
    let mut text = buffer.text(span).unwrap_or_default();
    if !ends_with_line_break(&text) {
        text.push_str(buffer.line_ending().as_str());
    }
    text
}

/// Replace the content of tracked range `id` with `text`: insert at its
/// start, then delete the stale remainder up to its end.
fn rewrite(buffer: &mut Buffer, id: MarkerId, text: &str) {
    let start = span_of(buffer, id).start;
    buffer.insert_text(start, text);
    let Span { start, end } = span_of(buffer, id);
    buffer.delete_text(start + text.chars().count(), end);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(primary: (usize, usize), secondary: (usize, usize)) -> MoveRequest {
        MoveRequest::new(
            LineRange::new(primary.0, primary.1),
            LineRange::new(secondary.0, secondary.1),
        )
    }

    fn run(text: &str, req: MoveRequest) -> (Buffer, Span, Span) {
        let mut buf = Buffer::from_text(text);
        let ex = exchange(&mut buf, req).unwrap();
        let (moved, displaced) = ex.release(&mut buf);
        (buf, moved, displaced)
    }

    // -- Validation ---------------------------------------------------------

    #[test]
    fn rejects_empty_range() {
        let buf = Buffer::from_text("a\nb\nc\n");
        let err = request((1, 1), (1, 2)).validate(&buf).unwrap_err();
        assert_eq!(err.range_problem(), Some(RangeProblem::Empty));
    }

    #[test]
    fn rejects_out_of_bounds() {
        let buf = Buffer::from_text("a\nb");
        let err = request((1, 2), (2, 3)).validate(&buf).unwrap_err();
        assert_eq!(
            err.range_problem(),
            Some(RangeProblem::OutOfBounds { line_count: 2 })
        );
    }

    #[test]
    fn rejects_overlap() {
        let buf = Buffer::from_text("a\nb\nc\n");
        let err = request((0, 2), (1, 3)).validate(&buf).unwrap_err();
        assert_eq!(err.range_problem(), Some(RangeProblem::Overlapping));
    }

    #[test]
    fn rejects_gap() {
        let buf = Buffer::from_text("a\nb\nc\nd\n");
        let err = request((0, 1), (2, 3)).validate(&buf).unwrap_err();
        assert_eq!(err.range_problem(), Some(RangeProblem::NotAdjacent));
    }

    #[test]
    fn invalid_request_leaves_buffer_alone() {
        let mut buf = Buffer::from_text("a\nb\nc\nd\n");
        assert!(exchange(&mut buf, request((0, 1), (3, 4))).is_err());
        assert_eq!(buf.contents(), "a\nb\nc\nd\n");
        assert!(!buf.is_modified());
        assert_eq!(buf.tracked_count(), 0);
    }

    #[test]
    fn direction() {
        assert!(request((1, 2), (2, 3)).is_down());
        assert!(!request((2, 3), (1, 2)).is_down());
    }

    // -- Exchange -----------------------------------------------------------

    #[test]
    fn move_single_line_down() {
        let (buf, moved, displaced) = run("a\nb\nc\nd\n", request((1, 2), (2, 3)));
        assert_eq!(buf.contents(), "a\nc\nb\nd\n");
        assert_eq!(moved, Span::new(4, 6));
        assert_eq!(displaced, Span::new(2, 4));
    }

    #[test]
    fn move_single_line_up() {
        let (buf, moved, displaced) = run("a\nb\nc\nd\n", request((2, 3), (1, 2)));
        assert_eq!(buf.contents(), "a\nc\nb\nd\n");
        assert_eq!(moved, Span::new(2, 4));
        assert_eq!(displaced, Span::new(4, 6));
    }

    #[test]
    fn move_block_down_over_shorter_line() {
        let (buf, moved, displaced) = run("a\nb\nc\nd\ne\n", request((1, 3), (3, 4)));
        assert_eq!(buf.contents(), "a\nd\nb\nc\ne\n");
        assert_eq!(buf.text(moved).unwrap(), "b\nc\n");
        assert_eq!(buf.text(displaced).unwrap(), "d\n");
    }

    #[test]
    fn move_block_up_over_longer_block() {
        let (buf, moved, displaced) = run("1\n22\n333\n4444\n5\n", request((3, 5), (0, 3)));
        assert_eq!(buf.contents(), "4444\n5\n1\n22\n333\n");
        assert_eq!(buf.text(moved).unwrap(), "4444\n5\n");
        assert_eq!(buf.text(displaced).unwrap(), "1\n22\n333\n");
    }

    #[test]
    fn last_line_without_newline_moves_up() {
        let (buf, moved, displaced) = run("a\nb\nc", request((2, 3), (1, 2)));
        assert_eq!(buf.contents(), "a\nc\nb\n");
        assert!(!buf.contents().contains("\n\n"));
        assert_eq!(buf.text(moved).unwrap(), "c\n");
        assert_eq!(buf.text(displaced).unwrap(), "b\n");
    }

    #[test]
    fn line_moves_down_onto_last_line_without_newline() {
        let (buf, moved, _) = run("a\nb\nc", request((1, 2), (2, 3)));
        assert_eq!(buf.contents(), "a\nc\nb\n");
        assert_eq!(buf.text(moved).unwrap(), "b\n");
    }

    #[test]
    fn crlf_buffer_appends_crlf() {
        let (buf, _, _) = run("a\r\nb\r\nc", request((2, 3), (1, 2)));
        assert_eq!(buf.contents(), "a\r\nc\r\nb\r\n");
    }

    #[test]
    fn form_feed_and_line_separator_stay_inside_their_line() {
        let (buf, moved, displaced) = run("a\x0c\nb\nc\n", request((0, 1), (1, 2)));
        assert_eq!(buf.contents(), "b\na\x0c\nc\n");
        assert_eq!(buf.len_chars(), 7);
        assert_eq!(buf.text(moved).unwrap(), "a\x0c\n");
        assert_eq!(buf.text(displaced).unwrap(), "b\n");

        let (buf, moved, _) = run("a\u{2028}b\nc\n", request((0, 1), (1, 2)));
        assert_eq!(buf.contents(), "c\na\u{2028}b\n");
        assert_eq!(buf.len_chars(), 6);
        assert_eq!(buf.char_to_line(moved.start), Some(1));
        assert_eq!(buf.line_count(), 3);
    }

    #[test]
    fn multibyte_text_uses_char_offsets() {
        let (buf, moved, _) = run("café\nñandú\nx\n", request((0, 1), (1, 2)));
        assert_eq!(buf.contents(), "ñandú\ncafé\nx\n");
        assert_eq!(moved, Span::new(6, 11));
    }

    #[test]
    fn exchange_keeps_ranges_attached_until_release() {
        let mut buf = Buffer::from_text("a\nb\nc\n");
        let ex = exchange(&mut buf, request((0, 1), (1, 2))).unwrap();
        assert_eq!(buf.tracked_count(), 2);
        assert_eq!(ex.original_primary_start(), 0);

        // The leading range absorbs text typed at its start; the other one
        // is pushed along.
        buf.insert_text(0, "zz\n");
        assert_eq!(ex.displaced(&buf), Span::new(0, 5));
        assert_eq!(ex.moved(&buf), Span::new(5, 7));

        let _ = ex.release(&mut buf);
        assert_eq!(buf.tracked_count(), 0);
    }

    #[test]
    fn nothing_outside_the_ranges_changes() {
        let (buf, _, _) = run("head\nx\ny\ntail\n", request((1, 2), (2, 3)));
        let text = buf.contents();
        assert!(text.starts_with("head\n"));
        assert!(text.ends_with("tail\n"));
    }
}
