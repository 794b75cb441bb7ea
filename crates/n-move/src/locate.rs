//! Range locators: decide which lines a move command swaps.
//!
//! The swap engine never decides what to move. A [`RangeLocator`] looks at the
//! caret and selection and either proposes a [`MoveRequest`] or declines with
//! `None` (top of file, nothing to swap with, ...). Language-aware movers
//! (whole statements, whole items) are just other locators.

use n_text::{Buffer, LineRange};

use crate::remap::SelectionState;
use crate::swap::MoveRequest;

/// Which way the lines travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// True for [`Direction::Down`].
    #[inline]
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::Down)
    }
}

/// Finds the adjacent line ranges a move should exchange.
pub trait RangeLocator {
    /// Propose a move for `state` in `direction`, or `None` if there is no
    /// valid target.
    fn locate(
        &self,
        buffer: &Buffer,
        state: &SelectionState,
        direction: Direction,
    ) -> Option<MoveRequest>;
}

// ---------------------------------------------------------------------------
// LineLocator
// ---------------------------------------------------------------------------

/// The plain line mover: the lines under the caret or selection trade places
/// with the single line above or below them.
///
/// - A selection that ends at column 0 doesn't include that line.
/// - The empty line after a final line break is not a line you can move or
///   move past.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineLocator;

impl LineLocator {
    /// Lines `[first, last]` covered by the caret or selection.
    fn covered_lines(buffer: &Buffer, state: &SelectionState) -> Option<(usize, usize)> {
        match state.selection.filter(|s| !s.is_empty()) {
            Some(sel) => {
                let first = buffer.char_to_line(sel.start)?;
                let mut last = buffer.char_to_line(sel.end)?;
                if last > first && buffer.line_start_offset(last) == Some(sel.end) {
                    last -= 1;
                }
                Some((first, last))
            }
            None => {
                let line = buffer.char_to_line(state.caret)?;
                Some((line, line))
            }
        }
    }
}

/// Number of lines holding text, not counting the empty line that follows a
/// final line break.
#[must_use]
pub fn content_line_count(buffer: &Buffer) -> usize {
    let lines = buffer.line_count();
    match buffer.line_len(lines - 1) {
        Some(0) => lines - 1,
        _ => lines,
    }
}

impl RangeLocator for LineLocator {
    fn locate(
        &self,
        buffer: &Buffer,
        state: &SelectionState,
        direction: Direction,
    ) -> Option<MoveRequest> {
        let content = content_line_count(buffer);
        let (first, last) = Self::covered_lines(buffer, state)?;
        if first >= content {
            return None;
        }
        let last = last.min(content - 1);
        let primary = LineRange::new(first, last + 1);

        let secondary = match direction {
            Direction::Up if first > 0 => LineRange::single(first - 1),
            Direction::Down if last + 1 < content => LineRange::single(last + 1),
            _ => return None,
        };
        Some(MoveRequest::new(primary, secondary))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
