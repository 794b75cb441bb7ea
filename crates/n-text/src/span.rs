//! Line and offset span types.
//!
//! All coordinates are **0-indexed**. Line 0 is the first line; offset 0 is
//! the first character. Offsets count Unicode scalar values (chars), not bytes
//! or grapheme clusters. This matches how `ropey` indexes text and gives
//! O(log n) access through the rope's internal tree.
//!
//! Three shapes show up when moving blocks of lines around:
//!
//! - [`LineRange`] - half-open `[start, end)` over whole lines. This is what a
//!   range locator hands to the mover.
//! - [`Span`] - half-open `[start, end)` over char offsets. Tracked ranges
//!   and the caret/selection live in this space.
//! - [`LineSpan`] - inclusive `first..=last` line span handed to formatters.
//!
//! Display layers should convert to 1-indexed for the user; the `Display`
//! impls here do that, `Debug` stays 0-indexed.

use std::fmt;
use std::ops::RangeInclusive;

// ---------------------------------------------------------------------------
// LineRange
// ---------------------------------------------------------------------------

/// A half-open range of whole lines: `[start, end)`.
///
/// `end` may equal the buffer's line count, meaning "up to the end of the
/// buffer"; the last line may or may not carry a line break.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// Create a line range. Panics in debug if `start > end`.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "LineRange::new requires start <= end");
        Self { start, end }
    }

    /// A range covering exactly one line.
    #[inline]
    #[must_use]
    pub const fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line + 1,
        }
    }

    /// Number of lines in the range.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the range covers no lines.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// True when `line` falls within `[start, end)`.
    #[inline]
    #[must_use]
    pub const fn contains_line(self, line: usize) -> bool {
        line >= self.start && line < self.end
    }

    /// True when the two ranges share at least one line.
    #[inline]
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when one range ends exactly where the other begins.
    #[inline]
    #[must_use]
    pub const fn is_adjacent_to(self, other: Self) -> bool {
        self.end == other.start || other.end == self.start
    }
}

impl fmt::Debug for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lines({}..{})", self.start, self.end)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed, inclusive, the way a status line reports it.
        if self.is_empty() {
            write!(f, "{}", self.start + 1)
        } else {
            write!(f, "{}-{}", self.start + 1, self.end)
        }
    }
}

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A half-open char-offset span: `[start, end)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a span. Panics in debug if `start > end`.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "Span::new requires start <= end");
        Self { start, end }
    }

    /// Create a span from two arbitrary offsets, swapping if needed so that
    /// `start <= end`. A selection dragged backwards comes in this way.
    #[inline]
    #[must_use]
    pub const fn ordered(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A zero-width span at `offset`.
    #[inline]
    #[must_use]
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Number of chars covered.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    /// True when the span covers zero chars.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// True when `offset` falls within `[start, end)`.
    #[inline]
    #[must_use]
    pub const fn contains(self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// LineSpan
// ---------------------------------------------------------------------------

/// An inclusive line span: `first..=last`.
///
/// Formatters receive these. A degenerate span (`first == last`) still names
/// one line; reindenting a blank line is a no-op for every formatter here.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    pub first: usize,
    pub last: usize,
}

impl LineSpan {
    /// Create a line span. Panics in debug if `first > last`.
    #[inline]
    #[must_use]
    pub const fn new(first: usize, last: usize) -> Self {
        debug_assert!(first <= last, "LineSpan::new requires first <= last");
        Self { first, last }
    }

    /// A span naming exactly one line.
    #[inline]
    #[must_use]
    pub const fn single(line: usize) -> Self {
        Self {
            first: line,
            last: line,
        }
    }

    /// Number of lines named by the span. Never zero.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.last - self.first + 1
    }

    /// Iterate the line indices in the span.
    #[inline]
    #[must_use]
    pub fn lines(self) -> RangeInclusive<usize> {
        self.first..=self.last
    }
}

impl fmt::Debug for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineSpan({}..={})", self.first, self.last)
    }
}

impl fmt::Display for LineSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first + 1, self.last + 1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
