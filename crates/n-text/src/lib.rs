//! # n-text: Text buffer core for n-move
//!
//! The storage layer the line mover edits through:
//!
//! - **[`span`]** - `LineRange` (half-open lines), `Span` (half-open char
//!   offsets) and `LineSpan` (inclusive lines), all 0-indexed
//! - **[`buffer`]** - `Buffer` wrapping a rope with a char-offset editing
//!   surface and line-ending detection
//! - **[`marker`]** - tracked ranges with per-edge gravity, kept consistent by
//!   the buffer's own insert/delete operations

pub mod buffer;
pub mod marker;
pub mod span;

pub use buffer::{Buffer, LineEnding};
pub use marker::{Gravity, MarkerId, TrackedRange};
pub use span::{LineRange, LineSpan, Span};
