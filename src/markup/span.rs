//! Packed format-span representation
//!
//! A loaded channel can retain many thousands of spans across its message
//! history, so each span is packed into a single word:
//!
//! ```text
//! ----------------------------------------------------
//! | kind (4 bits) | end (16 bits) | start (16 bits)  |
//! ----------------------------------------------------
//! ```
//!
//! Offsets are in units of the formatted *output* content, never the raw
//! input. Positions beyond 65535 saturate at the field limit.

use std::fmt;

/// The style attached to a span of formatted message content
// NOTE: Stored in 4 bits so max of 16 values!
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SpanKind {
    Bold = 0,
    Strikethrough,
    Underlined,
    Italic,
    Monospaced,
    Preformatted,
    Channel,
    User,
    Variable,
    Emoji,
    Link,
    Unknown,
}

impl SpanKind {
    /// Get a human-readable name for this span kind
    pub fn name(&self) -> &'static str {
        match self {
            SpanKind::Bold => "Bold",
            SpanKind::Strikethrough => "Strikethrough",
            SpanKind::Underlined => "Underlined",
            SpanKind::Italic => "Italic",
            SpanKind::Monospaced => "Monospaced",
            SpanKind::Preformatted => "Preformatted",
            SpanKind::Channel => "Channel",
            SpanKind::User => "User",
            SpanKind::Variable => "Variable",
            SpanKind::Emoji => "Emoji",
            SpanKind::Link => "Link",
            SpanKind::Unknown => "Unknown",
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => SpanKind::Bold,
            1 => SpanKind::Strikethrough,
            2 => SpanKind::Underlined,
            3 => SpanKind::Italic,
            4 => SpanKind::Monospaced,
            5 => SpanKind::Preformatted,
            6 => SpanKind::Channel,
            7 => SpanKind::User,
            8 => SpanKind::Variable,
            9 => SpanKind::Emoji,
            10 => SpanKind::Link,
            _ => SpanKind::Unknown,
        }
    }
}

/// A half-open styled range over formatted message content
///
/// Immutable once produced; a message edit re-runs formatting and
/// replaces the whole span list rather than patching spans in place.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FormatSpan(u64);

impl FormatSpan {
    /// Create a new span over `[start, end)` with the given kind
    ///
    /// Positions saturate at `u16::MAX` rather than silently truncating.
    pub fn new(start: usize, end: usize, kind: SpanKind) -> Self {
        let start = start.min(u16::MAX as usize) as u64;
        let end = end.min(u16::MAX as usize) as u64;
        FormatSpan(start | end << 16 | (kind as u64) << 32)
    }

    /// Start offset (inclusive) into the content buffer
    pub fn start(&self) -> usize {
        (self.0 & 0xFFFF) as usize
    }

    /// End offset (exclusive) into the content buffer
    pub fn end(&self) -> usize {
        ((self.0 >> 16) & 0xFFFF) as usize
    }

    /// The style kind of this span
    pub fn kind(&self) -> SpanKind {
        SpanKind::from_bits(((self.0 >> 32) & 0xF) as u8)
    }

    /// Get the length of this span in scalar values
    pub fn len(&self) -> usize {
        self.end().saturating_sub(self.start())
    }

    /// Check if the span covers no content
    pub fn is_empty(&self) -> bool {
        self.start() >= self.end()
    }
}

impl fmt::Debug for FormatSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.kind().name(), self.start(), self.end())
    }
}
