//! Colour types and span colour selection
//!
//! The canvas tracks one foreground and one background colour at a
//! time; this module picks the pair for each span kind. User names get
//! a stable colour from a hash of the name so the same author always
//! renders the same way.

use crate::markup::SpanKind;

/// Terminal colours (ANSI 16-colour palette plus 256-colour values)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    /// A value from the 256-colour palette
    Ansi(u8),
}

/// Monospaced and preformatted text colours
const MONO_FG: Color = Color::Ansi(197);
const MONO_BG: Color = Color::Ansi(239);

/// Foreground and background colours for a span
///
/// `text` is the span's content; user spans hash the name (minus its
/// `@` sigil) into a stable palette colour.
pub fn colours_for(kind: SpanKind, text: &[char]) -> (Color, Color) {
    match kind {
        SpanKind::Channel => (Color::Ansi(118), Color::Default),
        SpanKind::User => {
            let name: String = text.iter().skip(1).collect();
            (name_colour(&name), Color::Default)
        }
        SpanKind::Monospaced | SpanKind::Preformatted => (MONO_FG, MONO_BG),
        SpanKind::Variable => (Color::Black, Color::Yellow),
        SpanKind::Emoji => (Color::Ansi(227), Color::Default),
        SpanKind::Link => (Color::BrightBlue, Color::Default),
        _ => (Color::Default, Color::Default),
    }
}

/// A stable colour for a display name
pub fn name_colour(name: &str) -> Color {
    const PALETTE: [Color; 7] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Ansi(227),
        Color::Ansi(200),
        Color::Ansi(171),
    ];
    PALETTE[fnv1a(name.as_bytes()) as usize % PALETTE.len()]
}

/// 32-bit FNV-1a; colour choice must be stable across runs, which
/// rules out the std hasher's random seeding
fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for &b in bytes {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}
