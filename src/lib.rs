//! natter - chat message formatting and terminal rendering
//!
//! Two pieces do the real work here:
//! - [`markup`]: a single-pass, total lexer that turns raw chat-service
//!   message text into plain content plus compact style spans
//! - [`canvas`]: a word-wrapping layout engine that places styled runs
//!   onto a terminal grid, measured first against a no-op sink so each
//!   message's vertical position is known before it is drawn
//!
//! The surrounding modules supply the message model, colour selection,
//! the terminal cell writer, and configuration.

pub mod canvas;
pub mod config;
pub mod error;
pub mod markup;
pub mod message;
pub mod style;
pub mod terminal;

pub use canvas::{Canvas, UNBOUNDED};
pub use error::{RenderError, Result};
pub use markup::{Directory, FormatSpan, Formatter, Lookup, SpanKind};
pub use message::{draw_message, message_lines, Message};
pub use style::Color;
pub use terminal::{CellWriter, NullWriter, Terminal};
