//! Caret and selection remapping after a swap.
//!
//! The caret and selection are remembered relative to where the moved block
//! started *before* the swap, then re-anchored on where that block starts
//! *after* it. Pure arithmetic, no buffer access.

use n_text::Span;

/// Caret offset plus an optional selection, in absolute char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub caret: usize,
    pub selection: Option<Span>,
}

impl SelectionState {
    /// A bare caret with no selection.
    #[inline]
    #[must_use]
    pub const fn caret(caret: usize) -> Self {
        Self {
            caret,
            selection: None,
        }
    }

    /// A caret with a selection.
    #[inline]
    #[must_use]
    pub const fn with_selection(caret: usize, selection: Span) -> Self {
        Self {
            caret,
            selection: Some(selection),
        }
    }

    /// True when a selection is present.
    #[inline]
    #[must_use]
    pub const fn has_selection(&self) -> bool {
        self.selection.is_some()
    }
}

/// Signed distance from `anchor` to `offset`.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn relative(offset: usize, anchor: usize) -> isize {
    if offset >= anchor {
        (offset - anchor) as isize
    } else {
        -((anchor - offset) as isize)
    }
}

/// `anchor + delta`, kept inside `0..=len`.
const fn rebase(anchor: usize, delta: isize, len: usize) -> usize {
    let offset = anchor.saturating_add_signed(delta);
    if offset > len { len } else { offset }
}

/// Recompute caret and selection after the block that started at
/// `original_anchor` now starts at `new_anchor`.
///
/// - caret: `new_anchor + caret_relative`
/// - selection start: `new_anchor + (selection.start - original_anchor)`
/// - selection end: selection start plus the original selection length
///
/// A selection given back to front is normalised first. `len` is the
/// buffer's length after the swap; results never exceed it.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn remap(
    caret_relative: isize,
    selection: Option<Span>,
    new_anchor: usize,
    original_anchor: usize,
    len: usize,
) -> SelectionState {
    let caret = rebase(new_anchor, caret_relative, len);
    let selection = match selection {
        Some(span) => {
            let span = Span::ordered(span.start, span.end);
            let start = rebase(new_anchor, relative(span.start, original_anchor), len);
            let end = rebase(start, span.len() as isize, len);
            Some(Span { start, end })
        }
        None => None,
    };
    SelectionState { caret, selection }
}
