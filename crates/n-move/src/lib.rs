//! # n-move: Move lines up and down without losing your place
//!
//! The engine behind "move line up/down": two adjacent line ranges trade
//! places in a [`Buffer`](n_text::Buffer), the caret and selection travel with
//! the moved text, and the moved block is reindented for its new surroundings.
//!
//! - **[`swap`](mod@swap)** - validates a [`MoveRequest`] and exchanges the text through
//!   two tracked ranges
//! - **[`remap`]** - caret/selection arithmetic relative to the moved block
//! - **[`reindent`]** - which lines the formatter gets (blank edges trimmed)
//! - **[`format`]** - the [`Formatter`] seam and a tree-sitter indenter
//! - **[`locate`]** - [`RangeLocator`]s that turn a caret into a request
//! - **[`mover`]** - [`Mover`] ties it together; [`swap()`] is the bare form
//! - **[`options`]** - `:set`-style [`MoveOptions`]
//! - **[`error`]** - [`MoveError`], [`ReformatError`], [`OptionError`]
//!
//! The library logs through `tracing` and installs no subscriber.

pub mod error;
pub mod format;
pub mod locate;
pub mod mover;
pub mod options;
pub mod reindent;
pub mod remap;
pub mod swap;

pub use error::{MoveError, OptionError, RangeProblem, ReformatError};
pub use format::{Formatter, KeepIndent, SyntaxIndenter};
pub use locate::{Direction, LineLocator, RangeLocator};
pub use mover::{Mover, SwapResult, swap};
pub use options::MoveOptions;
pub use remap::SelectionState;
pub use swap::{Exchange, MoveRequest};
