//! The mover: one swap from request to reindented result.
//!
//! ```text
//! locate ──► exchange ──► remap caret/selection ──► resolve span(s)
//!                                                      │
//!            release ◄── read back ◄── formatter ◄─────┘
//! ```
//!
//! Everything the formatter might shift (the moved block, the displaced
//! block, the caret and the selection) is held as a tracked range while it
//! runs, and every tracked range is detached before `swap` returns, on
//! success or failure.

use n_text::{Buffer, Gravity, LineRange, MarkerId, Span};
use tracing::{debug, trace, warn};

use crate::error::{MoveError, ReformatError};
use crate::format::{Formatter, KeepIndent};
use crate::locate::{Direction, RangeLocator};
use crate::options::MoveOptions;
use crate::reindent::resolve_spans;
use crate::remap::{SelectionState, relative, remap};
use crate::swap::{Exchange, MoveRequest, exchange};

// ---------------------------------------------------------------------------
// SwapResult
// ---------------------------------------------------------------------------

/// Where things ended up after a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapResult {
    /// Span now holding the moved (primary) lines.
    pub primary: Span,
    /// Span now holding the lines that made room (secondary).
    pub secondary: Span,
    /// Remapped caret and selection, if one was passed in.
    pub selection: Option<SelectionState>,
}

impl SwapResult {
    /// Line range of [`primary`](Self::primary) in `buffer`.
    #[must_use]
    pub fn primary_lines(&self, buffer: &Buffer) -> LineRange {
        span_lines(buffer, self.primary)
    }

    /// Line range of [`secondary`](Self::secondary) in `buffer`.
    #[must_use]
    pub fn secondary_lines(&self, buffer: &Buffer) -> LineRange {
        span_lines(buffer, self.secondary)
    }
}

/// Lines of a whole-line span. The span's end is the start of the line after.
fn span_lines(buffer: &Buffer, span: Span) -> LineRange {
    let start = buffer.char_to_line(span.start).unwrap_or(0);
    let end = buffer.char_to_line(span.end).unwrap_or(start).max(start);
    LineRange::new(start, end)
}

// ---------------------------------------------------------------------------
// Mover
// ---------------------------------------------------------------------------

/// Runs swaps with a set of [`MoveOptions`] and a [`Formatter`].
#[derive(Debug)]
pub struct Mover<F> {
    options: MoveOptions,
    formatter: F,
}

impl Default for Mover<KeepIndent> {
    fn default() -> Self {
        Self::new(MoveOptions::default(), KeepIndent)
    }
}

impl<F: Formatter> Mover<F> {
    /// Create a mover.
    #[must_use]
    pub const fn new(options: MoveOptions, formatter: F) -> Self {
        Self { options, formatter }
    }

    /// Current options.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> &MoveOptions {
        &self.options
    }

    /// Mutable options, for applying `:set` directives.
    #[inline]
    pub const fn options_mut(&mut self) -> &mut MoveOptions {
        &mut self.options
    }

    /// Exchange `request.primary` with `request.secondary`, carry `selection`
    /// along with the moved lines and reindent them.
    ///
    /// # Errors
    ///
    /// - [`MoveError::InvalidRange`] if the request is invalid. Nothing was
    ///   edited.
    /// - [`MoveError::Reformat`] if the formatter failed. The lines are
    ///   swapped and whatever the formatter did before failing stays.
    pub fn swap(
        &mut self,
        buffer: &mut Buffer,
        request: MoveRequest,
        selection: Option<SelectionState>,
    ) -> Result<SwapResult, MoveError> {
        let exchange = exchange(buffer, request)?;
        let anchor = exchange.original_primary_start();
        let moved = exchange.moved(buffer);

        let remapped = selection.map(|state| {
            remap(
                relative(state.caret, anchor),
                state.selection,
                moved.start,
                anchor,
                buffer.len_chars(),
            )
        });
        let carried = remapped.map(|state| Carried::track(buffer, state));

        let formatted = if self.options.reindent {
            self.reformat(buffer, &exchange)
        } else {
            Ok(())
        };

        let selection = carried.map(|carried| carried.release(buffer));
        let (primary, secondary) = exchange.release(buffer);
        if let Err(err) = formatted {
            warn!(%err, "reindent after move failed");
            return Err(err.into());
        }

        debug!(?primary, ?secondary, ?selection, "swap complete");
        Ok(SwapResult {
            primary,
            secondary,
            selection,
        })
    }

    /// Ask `locator` what to move for `state` and swap it.
    ///
    /// Returns `Ok(None)` when the locator finds no valid target.
    ///
    /// # Errors
    ///
    /// See [`swap`](Self::swap).
    pub fn move_lines(
        &mut self,
        buffer: &mut Buffer,
        locator: &impl RangeLocator,
        state: &SelectionState,
        direction: Direction,
    ) -> Result<Option<SwapResult>, MoveError> {
        let Some(request) = locator.locate(buffer, state, direction) else {
            trace!(?direction, "no move target");
            return Ok(None);
        };
        self.swap(buffer, request, Some(*state)).map(Some)
    }

    /// Run the formatter over the moved block.
    fn reformat(
        &mut self,
        buffer: &mut Buffer,
        exchange: &Exchange,
    ) -> Result<(), ReformatError> {
        let spans = resolve_spans(
            buffer,
            exchange.moved(buffer),
            self.options.embedded_document,
        );
        for span in spans {
            trace!(%span, "reindent");
            self.formatter.reindent(buffer, span)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Carried caret/selection
// ---------------------------------------------------------------------------

/// Caret and selection held as tracked ranges across reindentation.
///
/// The caret sticks to the text after it, so indentation inserted in front
/// of it pushes it along. The selection grows to cover indentation inserted
/// at its start but not at its end.
struct Carried {
    caret: MarkerId,
    selection: Option<MarkerId>,
}

impl Carried {
    fn track(buffer: &mut Buffer, state: SelectionState) -> Self {
        let caret = buffer.track(Span::point(state.caret), Gravity::new(false, true));
        let selection = state
            .selection
            .map(|span| buffer.track(span, Gravity::new(true, false)));
        Self { caret, selection }
    }

    fn release(self, buffer: &mut Buffer) -> SelectionState {
        let caret = buffer.untrack(self.caret).map_or(0, |r| r.start());
        let selection = self
            .selection
            .and_then(|id| buffer.untrack(id))
            .map(|r| r.span);
        SelectionState { caret, selection }
    }
}

// ---------------------------------------------------------------------------
// swap
// ---------------------------------------------------------------------------

/// Exchange two adjacent line ranges and remap the caret/selection, without
/// reindenting.
///
/// # Errors
///
/// Returns [`MoveError::InvalidRange`] if the ranges are empty, out of
/// bounds, overlapping or not adjacent. The buffer is untouched then.
pub fn swap(
    buffer: &mut Buffer,
    primary: LineRange,
    secondary: LineRange,
    selection: Option<SelectionState>,
) -> Result<SwapResult, MoveError> {
    let options = MoveOptions {
        reindent: false,
        ..MoveOptions::default()
    };
    Mover::new(options, KeepIndent).swap(buffer, MoveRequest::new(primary, secondary), selection)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
