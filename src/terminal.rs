//! Terminal abstraction using crossterm
//!
//! The canvas draws through the [`CellWriter`] capability, which has
//! exactly two implementations: the real crossterm-backed [`Terminal`]
//! and the [`NullWriter`] used for measurement-only layout passes.

use std::io::{self, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyEvent},
    execute, queue,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use unicode_width::UnicodeWidthChar;

use crate::error::Result;
use crate::style::Color;

/// Writes one styled character cell and reports its display width
pub trait CellWriter {
    /// Place `ch` at `(x, y)` with the given colours
    ///
    /// Returns the character's display width in columns (1 or 2, never
    /// less than 1). Out-of-bounds cells are ignored but still report
    /// their width so layout stays consistent.
    fn set(&mut self, ch: char, x: i32, y: i32, fg: Color, bg: Color) -> i32;
}

/// Display width of a character in terminal columns
pub fn display_width(ch: char) -> i32 {
    UnicodeWidthChar::width(ch).unwrap_or(1).max(1) as i32
}

/// A cell writer that discards everything
///
/// Used to replay a render against nothing but the width arithmetic,
/// so a message's row count can be measured before drawing it.
#[derive(Debug, Default)]
pub struct NullWriter;

impl CellWriter for NullWriter {
    fn set(&mut self, ch: char, _x: i32, _y: i32, _fg: Color, _bg: Color) -> i32 {
        display_width(ch)
    }
}

/// Terminal wrapper for cross-platform terminal I/O
pub struct Terminal {
    /// Terminal width in columns
    cols: u16,
    /// Terminal height in rows
    rows: u16,
}

impl Terminal {
    /// Create a new terminal instance and enter raw mode
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size()?;

        let term = Self { cols, rows };
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        Ok(term)
    }

    /// Get terminal width
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Get terminal height
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Clear the entire screen
    pub fn clear(&mut self) -> Result<()> {
        queue!(io::stdout(), terminal::Clear(ClearType::All))?;
        Ok(())
    }

    /// Flush output buffer to terminal
    pub fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    /// Read a key event (blocking)
    pub fn read_key(&mut self) -> Result<KeyEvent> {
        loop {
            match event::read()? {
                Event::Key(key_event) => return Ok(key_event),
                Event::Resize(cols, rows) => {
                    self.cols = cols;
                    self.rows = rows;
                    // Continue waiting for key event
                }
                _ => {
                    // Ignore other events (mouse, focus, etc.)
                }
            }
        }
    }
}

impl CellWriter for Terminal {
    fn set(&mut self, ch: char, x: i32, y: i32, fg: Color, bg: Color) -> i32 {
        let width = display_width(ch);
        if x < 0 || y < 0 || x >= i32::from(self.cols) || y >= i32::from(self.rows) {
            return width;
        }

        // Write failures surface at the next flush
        let _ = queue!(
            io::stdout(),
            cursor::MoveTo(x as u16, y as u16),
            SetForegroundColor(convert(fg)),
            SetBackgroundColor(convert(bg)),
            Print(ch),
        );
        width
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn convert(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as C;
    match color {
        Color::Default => C::Reset,
        Color::Black => C::Black,
        Color::Red => C::DarkRed,
        Color::Green => C::DarkGreen,
        Color::Yellow => C::DarkYellow,
        Color::Blue => C::DarkBlue,
        Color::Magenta => C::DarkMagenta,
        Color::Cyan => C::DarkCyan,
        Color::White => C::Grey,
        Color::BrightBlack => C::DarkGrey,
        Color::BrightRed => C::Red,
        Color::BrightGreen => C::Green,
        Color::BrightYellow => C::Yellow,
        Color::BrightBlue => C::Blue,
        Color::BrightMagenta => C::Magenta,
        Color::BrightCyan => C::Cyan,
        Color::BrightWhite => C::White,
        Color::Ansi(value) => C::AnsiValue(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_never_below_one() {
        assert_eq!(display_width('a'), 1);
        assert_eq!(display_width(' '), 1);
        // Control characters have no printable width but still count as 1
        assert_eq!(display_width('\u{0}'), 1);
    }

    #[test]
    fn test_display_width_wide_glyphs() {
        assert_eq!(display_width('漢'), 2);
        assert_eq!(display_width('🍕'), 2);
    }

    #[test]
    fn test_null_writer_reports_width() {
        let mut writer = NullWriter;
        assert_eq!(writer.set('a', 0, 0, Color::Default, Color::Default), 1);
        assert_eq!(writer.set('漢', -5, -5, Color::Default, Color::Default), 2);
    }
}
