//! Text buffer: rope storage with tracked ranges.
//!
//! A `Buffer` wraps a [`ropey::Rope`] with the char-offset editing surface the
//! move engine needs, plus the [`MarkerSet`] of tracked ranges that follow
//! every edit.
//!
//! # Design choices
//!
//! - **Storage is a `ropey::Rope`.** Swapping blocks near the end of a large
//!   file costs O(log n) per edit, and line/char index conversion comes with
//!   the rope.
//!
//! - **Offsets are char offsets**, not byte offsets. Offset 3 of `"café"` is
//!   `'é'`, not a byte in the middle of its UTF-8 encoding. Byte offsets never
//!   leak into the public API.
//!
//! - **The buffer is the only mutation entry point.** [`insert_text`],
//!   [`delete_text`] and [`replace_text`] run the tracked-range adjustment
//!   pass before returning, so every live [`TrackedRange`] is consistent with
//!   the content whenever control is back with the caller.
//!
//! - **Line endings are detected on construction.** The rope stores whatever
//!   bytes it was given; `line_ending` records the dominant style for code
//!   that needs to synthesize a line break.
//!
//! [`insert_text`]: Buffer::insert_text
//! [`delete_text`]: Buffer::delete_text
//! [`replace_text`]: Buffer::replace_text

use std::fmt;

use ropey::{Rope, RopeSlice};

use crate::marker::{Gravity, MarkerId, MarkerSet, TrackedRange};
use crate::span::Span;

// ---------------------------------------------------------------------------
// Line ending detection
// ---------------------------------------------------------------------------

/// Line ending style of a buffer.
///
/// Detected on construction by scanning for the first occurrence. Defaults to
/// `Lf` for text without any line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    /// `\n` - Unix, macOS, Linux.
    Lf,
    /// `\r\n` - Windows, DOS.
    CrLf,
    /// `\r` - Classic Mac (pre-OS X). Rare but we handle it.
    Cr,
}

impl LineEnding {
    /// The string representation of this line ending.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Detect the dominant line ending in a string by finding the first
    /// occurrence. Returns `Lf` if no line endings are found.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        for (i, &byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => {
                    if i > 0 && bytes[i - 1] == b'\r' {
                        return Self::CrLf;
                    }
                    return Self::Lf;
                }
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        return Self::CrLf;
                    }
                    return Self::Cr;
                }
                _ => {}
            }
        }
        Self::Lf
    }

    /// Char length of this line ending.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(self) -> usize {
        match self {
            Self::Lf | Self::Cr => 1,
            Self::CrLf => 2,
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lf => f.write_str("LF"),
            Self::CrLf => f.write_str("CRLF"),
            Self::Cr => f.write_str("CR"),
        }
    }
}

/// True when `text` ends with a line break (`\n` or a lone `\r`).
#[inline]
#[must_use]
pub fn ends_with_line_break(text: &str) -> bool {
    text.ends_with('\n') || text.ends_with('\r')
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A text buffer backed by a rope.
///
/// The buffer tracks:
///
/// - The text content (via `ropey::Rope`)
/// - Whether the content has been modified since creation
/// - The line ending style
/// - The tracked ranges currently attached to it
///
/// # Coordinate system
///
/// Lines are 0-indexed. An empty buffer has 1 line, and a buffer ending with
/// a line break has a trailing empty line. Offsets are char indices into the
/// whole text.
pub struct Buffer {
    rope: Rope,
    markers: MarkerSet,
    modified: bool,
    line_ending: LineEnding,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            markers: MarkerSet::new(),
            modified: false,
            line_ending: LineEnding::Lf,
        }
    }

    /// Create a buffer from a string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            line_ending: LineEnding::detect(text),
            rope: Rope::from_str(text),
            markers: MarkerSet::new(),
            modified: false,
        }
    }

    // -- Text access --------------------------------------------------------

    /// The underlying rope. Prefer the typed accessors below, but this is
    /// available when you need direct rope operations (byte offsets for a
    /// parser, chunk iteration).
    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Total number of lines. An empty buffer has 1 line (the empty line).
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count (Unicode scalar values, not bytes).
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the buffer contains no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get a line by 0-indexed line number, including its trailing line
    /// ending (if any). Returns `None` if `line >= line_count()`.
    #[inline]
    #[must_use]
    pub fn line(&self, line: usize) -> Option<RopeSlice<'_>> {
        if line < self.rope.len_lines() {
            Some(self.rope.line(line))
        } else {
            None
        }
    }

    /// Number of chars in a line **including** the trailing line ending.
    #[inline]
    #[must_use]
    pub fn line_len(&self, line: usize) -> Option<usize> {
        self.line(line).map(|l| l.len_chars())
    }

    /// Number of chars in a line **excluding** any trailing line ending
    /// (`\n`, `\r\n`, `\r`). Returns `None` if the line doesn't exist.
    #[must_use]
    pub fn line_content_len(&self, line: usize) -> Option<usize> {
        self.line(line).map(|rope_line| {
            let total = rope_line.len_chars();
            if total == 0 {
                return 0;
            }
            match rope_line.char(total - 1) {
                '\n' if total >= 2 && rope_line.char(total - 2) == '\r' => total - 2,
                '\n' | '\r' => total - 1,
                // Last line with no trailing line break.
                _ => total,
            }
        })
    }

    /// True when the line holds nothing but whitespace (or nothing at all).
    /// A line that doesn't exist is not blank.
    #[must_use]
    pub fn is_blank_line(&self, line: usize) -> bool {
        self.line(line)
            .is_some_and(|l| l.chars().all(char::is_whitespace))
    }

    /// The run of spaces and tabs at the start of a line. Empty for lines
    /// that don't exist.
    #[must_use]
    pub fn leading_whitespace(&self, line: usize) -> String {
        self.line(line)
            .map(|l| l.chars().take_while(|c| *c == ' ' || *c == '\t').collect())
            .unwrap_or_default()
    }

    /// Text in `span`. Returns `None` if the span reaches past the end.
    #[must_use]
    pub fn text(&self, span: Span) -> Option<String> {
        if span.start > span.end || span.end > self.rope.len_chars() {
            return None;
        }
        Some(self.rope.slice(span.start..span.end).to_string())
    }

    /// Collect all text into a `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Offset of the first char of `line`. Returns `None` if the line doesn't
    /// exist.
    #[must_use]
    pub fn line_start_offset(&self, line: usize) -> Option<usize> {
        (line < self.rope.len_lines()).then(|| self.rope.line_to_char(line))
    }

    /// Like [`line_start_offset`](Self::line_start_offset), but a line index
    /// equal to `line_count()` maps to `len_chars()`, the exclusive end of a
    /// line range that runs to the end of the buffer. Returns `None` past
    /// that.
    #[must_use]
    pub fn line_start_safe_offset(&self, line: usize) -> Option<usize> {
        if line == self.rope.len_lines() {
            return Some(self.rope.len_chars());
        }
        self.line_start_offset(line)
    }

    /// Offset just past the last content char of `line` (before its line
    /// ending). Returns `None` if the line doesn't exist.
    #[must_use]
    pub fn line_end_offset(&self, line: usize) -> Option<usize> {
        let start = self.line_start_offset(line)?;
        Some(start + self.line_content_len(line)?)
    }

    /// Line containing `offset`. An offset equal to `len_chars()` belongs to
    /// the last line. Returns `None` past that.
    #[must_use]
    pub fn char_to_line(&self, offset: usize) -> Option<usize> {
        (offset <= self.rope.len_chars()).then(|| self.rope.char_to_line(offset))
    }

    // -- Editing ------------------------------------------------------------

    /// Insert text at a char offset.
    ///
    /// Tracked ranges are adjusted per their gravity before this returns.
    ///
    /// # Panics
    ///
    /// Panics if `offset > len_chars()`.
    pub fn insert_text(&mut self, offset: usize, text: &str) {
        assert!(
            offset <= self.rope.len_chars(),
            "insert offset {offset} out of bounds (len {})",
            self.rope.len_chars()
        );
        if text.is_empty() {
            return;
        }
        self.rope.insert(offset, text);
        self.markers.on_insert(offset, text.chars().count());
        self.modified = true;
    }

    /// Delete the chars in `[start, end)`. An empty span is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or `end > len_chars()`.
    pub fn delete_text(&mut self, start: usize, end: usize) {
        assert!(
            start <= end && end <= self.rope.len_chars(),
            "delete span {start}..{end} out of bounds (len {})",
            self.rope.len_chars()
        );
        if start == end {
            return;
        }
        self.rope.remove(start..end);
        self.markers.on_delete(start, end);
        self.modified = true;
    }

    /// Replace the chars in `[start, end)` with `text`.
    ///
    /// Runs as a delete followed by an insert at `start`, so tracked ranges
    /// see both edits.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or `end > len_chars()`.
    pub fn replace_text(&mut self, start: usize, end: usize, text: &str) {
        self.delete_text(start, end);
        self.insert_text(start, text);
    }

    // -- Tracked ranges -----------------------------------------------------

    /// Attach a tracked range over `span`.
    ///
    /// # Panics
    ///
    /// Panics if `span` reaches past the end of the buffer.
    pub fn track(&mut self, span: Span, gravity: Gravity) -> MarkerId {
        assert!(
            span.start <= span.end && span.end <= self.rope.len_chars(),
            "tracked span {span:?} out of bounds (len {})",
            self.rope.len_chars()
        );
        self.markers.insert(span, gravity)
    }

    /// Current bounds of a tracked range, or `None` once it is detached.
    #[inline]
    #[must_use]
    pub fn tracked(&self, id: MarkerId) -> Option<TrackedRange> {
        self.markers.get(id)
    }

    /// Change the gravity of a tracked range. Returns `false` if `id` is not
    /// attached.
    pub fn set_gravity(&mut self, id: MarkerId, gravity: Gravity) -> bool {
        self.markers.set_gravity(id, gravity)
    }

    /// Detach a tracked range, returning its final bounds.
    pub fn untrack(&mut self, id: MarkerId) -> Option<TrackedRange> {
        self.markers.remove(id)
    }

    /// Number of tracked ranges currently attached.
    #[inline]
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.markers.len()
    }

    // -- Metadata -----------------------------------------------------------

    /// True if the buffer has been modified since creation.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// The detected (or configured) line ending style.
    #[inline]
    #[must_use]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .field("modified", &self.modified)
            .field("line_ending", &self.line_ending)
            .field("tracked", &self.markers.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // -- LineEnding ---------------------------------------------------------

    #[test]
    fn detects_the_first_line_break_style() {
        for (text, expected) in [
            ("one\ntwo\n", LineEnding::Lf),
            ("one\r\ntwo\r\n", LineEnding::CrLf),
            ("one\rtwo", LineEnding::Cr),
            ("mixed\r\nthen\n", LineEnding::CrLf),
            ("mixed\nthen\r\n", LineEnding::Lf),
            ("single line", LineEnding::Lf),
            ("", LineEnding::Lf),
        ] {
            assert_eq!(LineEnding::detect(text), expected, "{text:?}");
        }
    }

    #[test]
    fn line_ending_text_and_width() {
        let widths: Vec<_> = [LineEnding::Lf, LineEnding::CrLf, LineEnding::Cr]
            .iter()
            .map(|e| (e.as_str(), e.len(), e.to_string()))
            .collect();
        assert_eq!(
            widths,
            vec![
                ("\n", 1, "LF".to_string()),
                ("\r\n", 2, "CRLF".to_string()),
                ("\r", 1, "CR".to_string()),
            ]
        );
    }

    #[test]
    fn ends_with_line_break_variants() {
        assert!(ends_with_line_break("a\n"));
        assert!(ends_with_line_break("a\r\n"));
        assert!(ends_with_line_break("a\r"));
        assert!(!ends_with_line_break("a"));
        assert!(!ends_with_line_break(""));
    }

    // -- Construction & access ----------------------------------------------

    #[test]
    fn new_buffer_is_empty() {
        let buf = Buffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.line_count(), 1);
        assert!(!buf.is_modified());
        assert_eq!(buf.tracked_count(), 0);
        assert!(Buffer::default().is_empty());
    }

    #[test]
    fn from_text_counts_lines() {
        let buf = Buffer::from_text("hello\nworld\n");
        assert_eq!(buf.len_chars(), 12);
        assert_eq!(buf.line_count(), 3);
        assert_eq!(Buffer::from_text("hello").line_count(), 1);
    }

    #[test]
    fn line_and_lengths() {
        let buf = Buffer::from_text("first\r\nsecond\nthird");
        assert_eq!(buf.line(1).unwrap().to_string(), "second\n");
        assert_eq!(buf.line_len(0), Some(7));
        assert_eq!(buf.line_content_len(0), Some(5));
        assert_eq!(buf.line_content_len(1), Some(6));
        assert_eq!(buf.line_content_len(2), Some(5));
        assert!(buf.line(3).is_none());
    }

    #[test]
    fn blank_lines() {
        let buf = Buffer::from_text("a\n   \n\t\n\nb");
        assert!(!buf.is_blank_line(0));
        assert!(buf.is_blank_line(1));
        assert!(buf.is_blank_line(2));
        assert!(buf.is_blank_line(3));
        assert!(!buf.is_blank_line(4));
        assert!(!buf.is_blank_line(9));
    }

    #[test]
    fn leading_whitespace_mixed() {
        let buf = Buffer::from_text("\t  x = 1\nnone\n");
        assert_eq!(buf.leading_whitespace(0), "\t  ");
        assert_eq!(buf.leading_whitespace(1), "");
        assert_eq!(buf.leading_whitespace(7), "");
    }

    #[test]
    fn text_of_span() {
        let buf = Buffer::from_text("café\nbar");
        assert_eq!(buf.text(Span::new(3, 6)).as_deref(), Some("é\nb"));
        assert!(buf.text(Span::new(3, 20)).is_none());
    }

    // -- Offsets ------------------------------------------------------------

    #[test]
    fn line_offsets() {
        let buf = Buffer::from_text("ab\ncd\r\nef");
        assert_eq!(buf.line_start_offset(0), Some(0));
        assert_eq!(buf.line_start_offset(1), Some(3));
        assert_eq!(buf.line_start_offset(2), Some(7));
        assert_eq!(buf.line_start_offset(3), None);
        assert_eq!(buf.line_end_offset(1), Some(5));
        assert_eq!(buf.line_end_offset(2), Some(9));
    }

    #[test]
    fn line_start_safe_offset_at_line_count() {
        let buf = Buffer::from_text("a\nb\nc");
        assert_eq!(buf.line_start_safe_offset(2), Some(4));
        assert_eq!(buf.line_start_safe_offset(3), Some(5));
        assert_eq!(buf.line_start_safe_offset(4), None);
    }

    #[test]
    fn char_to_line_bounds() {
        let buf = Buffer::from_text("a\nb\n");
        assert_eq!(buf.char_to_line(0), Some(0));
        assert_eq!(buf.char_to_line(1), Some(0));
        assert_eq!(buf.char_to_line(2), Some(1));
        assert_eq!(buf.char_to_line(4), Some(2));
        assert_eq!(buf.char_to_line(5), None);
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_and_delete() {
        let mut buf = Buffer::from_text("hello world");
        buf.insert_text(5, ",");
        assert_eq!(buf.contents(), "hello, world");
        assert!(buf.is_modified());
        buf.delete_text(0, 7);
        assert_eq!(buf.contents(), "world");
    }

    #[test]
    fn empty_edits_do_not_mark_modified() {
        let mut buf = Buffer::from_text("abc");
        buf.insert_text(1, "");
        buf.delete_text(2, 2);
        assert!(!buf.is_modified());
    }

    #[test]
    fn replace_text_swaps_content() {
        let mut buf = Buffer::from_text("    x\n");
        buf.replace_text(0, 4, "\t");
        assert_eq!(buf.contents(), "\tx\n");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn insert_past_end_panics() {
        let mut buf = Buffer::from_text("abc");
        buf.insert_text(4, "x");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn delete_past_end_panics() {
        let mut buf = Buffer::from_text("abc");
        buf.delete_text(1, 9);
    }

    // -- Tracked ranges -----------------------------------------------------

    #[test]
    fn tracked_range_follows_inserts_and_deletes() {
        let mut buf = Buffer::from_text("aaa\nbbb\nccc\n");
        let id = buf.track(Span::new(4, 8), Gravity::NONE);

        buf.insert_text(0, "xx");
        assert_eq!(buf.tracked(id).unwrap().span, Span::new(6, 10));

        buf.delete_text(0, 2);
        assert_eq!(buf.tracked(id).unwrap().span, Span::new(4, 8));
        assert_eq!(buf.text(buf.tracked(id).unwrap().span).unwrap(), "bbb\n");
    }

    #[test]
    fn tracked_range_uses_its_gravity() {
        let mut buf = Buffer::from_text("0123456789");
        let absorbing = buf.track(Span::new(2, 4), Gravity::BOTH);
        let pushed = buf.track(Span::new(2, 4), Gravity::NONE);

        buf.insert_text(2, "ab");
        assert_eq!(buf.tracked(absorbing).unwrap().span, Span::new(2, 6));
        assert_eq!(buf.tracked(pushed).unwrap().span, Span::new(4, 6));
    }

    #[test]
    fn replace_text_updates_tracked_ranges() {
        let mut buf = Buffer::from_text("    a\nb\n");
        let id = buf.track(Span::new(6, 8), Gravity::NONE);
        buf.replace_text(0, 4, "  ");
        assert_eq!(buf.tracked(id).unwrap().span, Span::new(4, 6));
    }

    #[test]
    fn set_gravity_and_untrack() {
        let mut buf = Buffer::from_text("abc");
        let id = buf.track(Span::new(1, 2), Gravity::NONE);
        assert!(buf.set_gravity(id, Gravity::BOTH));
        assert_eq!(buf.tracked_count(), 1);
        let last = buf.untrack(id).unwrap();
        assert_eq!(last.gravity, Gravity::BOTH);
        assert_eq!(buf.tracked_count(), 0);
        assert!(buf.tracked(id).is_none());
    }

    #[test]
    fn debug_shows_summary() {
        let buf = Buffer::from_text("a\nb");
        let dbg = format!("{buf:?}");
        assert!(dbg.contains("lines: 2"));
        assert!(dbg.contains("tracked: 0"));
    }
}
