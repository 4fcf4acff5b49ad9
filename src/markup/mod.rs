//! Message markup module
//!
//! This module turns raw chat-service message text into plain content
//! plus compact style spans:
//! - Span codec: packed `(start, end, kind)` annotations
//! - Lexer: the single-pass markup scanner
//! - Emoji: the fixed shortcode substitution table

mod emoji;
mod lexer;
mod span;

pub use lexer::{Directory, Formatter, Lookup};
pub use span::{FormatSpan, SpanKind};
