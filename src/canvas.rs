//! Word-wrapping layout canvas
//!
//! A per-render state machine that places styled runs of characters
//! onto a bounded-width grid through a [`CellWriter`]. Characters that
//! are not spaces or newlines collect in a pending word buffer and are
//! only committed when the word is known to fit (or cannot fit at all),
//! which is what produces word wrapping.
//!
//! Wrap decisions depend only on the cursor's offset from the origin
//! column and the width, never on absolute coordinates. That is the
//! component's central contract: replaying an identical sequence of
//! `printf`/`background` calls against a `NullWriter` and against the
//! real terminal at any origin makes bit-identical wrap decisions, so a
//! message's row count can be measured before it is drawn.

use std::mem;

use tracing::trace;

use crate::error::{RenderError, Result};
use crate::style::Color;
use crate::terminal::CellWriter;

/// Sentinel height for measurement-only canvases
pub const UNBOUNDED: i32 = i32::MAX;

/// A word-wrapping render canvas
pub struct Canvas<'a> {
    x0: i32,
    y0: i32,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    buf: Vec<char>,
    fg: Color,
    bg: Color,
    writer: &'a mut dyn CellWriter,
}

impl<'a> Canvas<'a> {
    /// Create a canvas of width `w` at origin `(x0, y)`
    ///
    /// A non-positive width is rejected: no placement rule is defined
    /// for it. Pass [`UNBOUNDED`] as the height for measuring passes.
    pub fn new(writer: &'a mut dyn CellWriter, x0: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w <= 0 {
            return Err(RenderError::InvalidWidth(w));
        }
        Ok(Self {
            x0,
            y0: y,
            x: x0,
            y,
            w,
            h,
            buf: Vec::new(),
            fg: Color::Default,
            bg: Color::Default,
            writer,
        })
    }

    /// Place a run of characters under the given colours
    ///
    /// Any word still buffered from a previous call is flushed under
    /// the previous colours first.
    pub fn printf(&mut self, runs: &[char], fg: Color, bg: Color) {
        trace!(x = self.x, y = self.y, w = self.w, len = runs.len(), "printf");
        self.set_colours(fg, bg);
        for &ch in runs {
            self.print(ch);
        }
        self.flush();
    }

    /// Place a string under the given colours
    pub fn prints(&mut self, s: &str, fg: Color, bg: Color) {
        let runs: Vec<char> = s.chars().collect();
        self.printf(&runs, fg, bg);
    }

    /// Paint `line_count + 1` background-filled rows of `width` columns
    ///
    /// Painting starts at the current row and the cursor ends back on
    /// it, so the rows can then be drawn over. Used to give a
    /// preformatted block a background across its full box width.
    pub fn background(&mut self, width: i32, line_count: i32, bg: Color) {
        let row: Vec<char> = vec![' '; width.max(0) as usize];
        for _ in 0..=line_count {
            self.printf(&row, Color::Default, bg);
        }
        self.y -= line_count + 1;
    }

    /// Flush any still-buffered word
    pub fn flush(&mut self) {
        self.print_buf();
    }

    /// Nudge the cursor between sub-parts of one render
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Current cursor position
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Cursor offset from the origin column
    pub fn column(&self) -> i32 {
        self.x - self.x0
    }

    /// Canvas width and height
    pub fn size(&self) -> (i32, i32) {
        (self.w, self.h)
    }

    /// Number of rows consumed since creation
    pub fn lines(&self) -> i32 {
        self.y - self.y0 + 1
    }

    fn print(&mut self, ch: char) {
        // Buffer all non-space characters
        match ch {
            '\n' => {
                // Flush in place if the buffered word still fits here
                if self.x - self.x0 + (self.buf.len() as i32) < self.w {
                    self.print_buf();
                }
                self.new_line();
            }
            ' ' => {
                self.print_buf();
                self.put(ch);
            }
            _ => {
                if self.buf.len() as i32 + 1 == self.w {
                    // An unbroken word as wide as the whole canvas
                    self.print_buf();
                    self.new_line();
                }
                self.buf.push(ch);
            }
        }
    }

    fn print_buf(&mut self) {
        if self.x - self.x0 + self.buf.len() as i32 >= self.w {
            self.new_line();
        }
        let word = mem::take(&mut self.buf);
        for &ch in &word {
            self.put(ch);
        }
        self.buf = word;
        self.buf.clear();
    }

    fn put(&mut self, ch: char) {
        self.x += self.writer.set(ch, self.x, self.y, self.fg, self.bg);
    }

    fn new_line(&mut self) {
        self.y += 1;
        self.x = self.x0;
    }

    fn set_colours(&mut self, fg: Color, bg: Color) {
        // Commit pending content before changing colour
        self.flush();
        self.fg = fg;
        self.bg = bg;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::{display_width, NullWriter};

    /// Records every cell placement for assertions
    #[derive(Default)]
    struct Recorder {
        cells: Vec<(char, i32, i32)>,
    }

    impl CellWriter for Recorder {
        fn set(&mut self, ch: char, x: i32, y: i32, _fg: Color, _bg: Color) -> i32 {
            self.cells.push((ch, x, y));
            display_width(ch)
        }
    }

    impl Recorder {
        fn row(&self, y: i32) -> String {
            let mut cells: Vec<_> = self
                .cells
                .iter()
                .filter(|&&(_, _, cy)| cy == y)
                .collect();
            cells.sort_by_key(|&&(_, x, _)| x);
            cells.iter().map(|&&(ch, _, _)| ch).collect()
        }
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    const DEF: Color = Color::Default;

    #[test]
    fn test_rejects_non_positive_width() {
        let mut writer = NullWriter;
        assert!(Canvas::new(&mut writer, 0, 0, 0, UNBOUNDED).is_err());
        let mut writer = NullWriter;
        assert!(Canvas::new(&mut writer, 0, 0, -3, UNBOUNDED).is_err());
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        let mut rec = Recorder::default();
        let mut c = Canvas::new(&mut rec, 0, 0, 10, UNBOUNDED).unwrap();
        c.printf(&chars("ab cd"), DEF, DEF);
        assert_eq!(c.lines(), 1);
        drop(c);
        assert_eq!(rec.row(0), "ab cd");
    }

    #[test]
    fn test_word_of_full_width_forces_wrap() {
        // An unbroken ten-character word on a ten-column canvas splits
        // before its last character
        let mut rec = Recorder::default();
        let mut c = Canvas::new(&mut rec, 0, 0, 10, UNBOUNDED).unwrap();
        c.printf(&chars("abcdefghij"), DEF, DEF);
        assert_eq!(c.lines(), 2);
        drop(c);
        assert_eq!(rec.row(0), "abcdefghi");
        assert_eq!(rec.row(1), "j");
    }

    #[test]
    fn test_two_words_fit_only_within_width() {
        // 6 + space + 2 = 9 columns: both words share the row
        let mut rec = Recorder::default();
        let mut c = Canvas::new(&mut rec, 0, 0, 10, UNBOUNDED).unwrap();
        c.printf(&chars("abcdef gh"), DEF, DEF);
        assert_eq!(c.lines(), 1);
        drop(c);
        assert_eq!(rec.row(0), "abcdef gh");

        // 9 + space + 2 = 12 columns: the second word wraps
        let mut rec = Recorder::default();
        let mut c = Canvas::new(&mut rec, 0, 0, 10, UNBOUNDED).unwrap();
        c.printf(&chars("abcdefghi jk"), DEF, DEF);
        assert_eq!(c.lines(), 2);
        drop(c);
        assert_eq!(rec.row(0), "abcdefghi ");
        assert_eq!(rec.row(1), "jk");
    }

    #[test]
    fn test_newline_flushes_in_place_when_word_fits() {
        let mut rec = Recorder::default();
        let mut c = Canvas::new(&mut rec, 0, 0, 10, UNBOUNDED).unwrap();
        c.printf(&chars("ab\ncd"), DEF, DEF);
        assert_eq!(c.lines(), 2);
        drop(c);
        assert_eq!(rec.row(0), "ab");
        assert_eq!(rec.row(1), "cd");
    }

    #[test]
    fn test_newline_carries_overflowing_word_to_next_row() {
        // The word pending at the newline no longer fits on the current
        // row, so it stays buffered and lands after the line advance
        let mut rec = Recorder::default();
        let mut c = Canvas::new(&mut rec, 0, 0, 5, UNBOUNDED).unwrap();
        c.printf(&chars("abcd ef\ng"), DEF, DEF);
        assert_eq!(c.lines(), 2);
        drop(c);
        assert_eq!(rec.row(0), "abcd ");
        assert_eq!(rec.row(1), "efg");
    }

    #[test]
    fn test_wide_glyph_advances_two_columns() {
        let mut rec = Recorder::default();
        let mut c = Canvas::new(&mut rec, 0, 0, 10, UNBOUNDED).unwrap();
        c.printf(&chars("漢x"), DEF, DEF);
        drop(c);
        assert_eq!(rec.cells, vec![('漢', 0, 0), ('x', 2, 0)]);
    }

    #[test]
    fn test_oversized_glyph_placed_whole() {
        // A double-width glyph on a two-column canvas is still placed
        // whole; nothing finer than a character ever splits
        let mut rec = Recorder::default();
        let mut c = Canvas::new(&mut rec, 0, 0, 2, UNBOUNDED).unwrap();
        c.printf(&chars("a漢"), DEF, DEF);
        drop(c);
        assert_eq!(rec.cells, vec![('a', 0, 0), ('漢', 0, 1)]);
    }

    #[test]
    fn test_colour_change_flushes_under_prior_style() {
        struct Styled {
            cells: Vec<(char, Color)>,
        }
        impl CellWriter for Styled {
            fn set(&mut self, ch: char, _x: i32, _y: i32, fg: Color, _bg: Color) -> i32 {
                self.cells.push((ch, fg));
                display_width(ch)
            }
        }

        let mut rec = Styled { cells: Vec::new() };
        let mut c = Canvas::new(&mut rec, 0, 0, 20, UNBOUNDED).unwrap();
        c.printf(&chars("ab"), Color::Red, DEF);
        c.printf(&chars("cd"), Color::Blue, DEF);
        drop(c);
        assert_eq!(
            rec.cells,
            vec![
                ('a', Color::Red),
                ('b', Color::Red),
                ('c', Color::Blue),
                ('d', Color::Blue),
            ]
        );
    }

    #[test]
    fn test_background_restores_cursor_row() {
        let mut rec = Recorder::default();
        let mut c = Canvas::new(&mut rec, 0, 0, 5, UNBOUNDED).unwrap();
        c.background(5, 2, Color::Ansi(239));
        assert_eq!(c.position(), (0, 0));
        drop(c);
        // Three full rows of spaces painted
        for y in 0..3 {
            assert_eq!(rec.row(y), "     ");
        }
    }

    #[test]
    fn test_move_by_and_position() {
        let mut writer = NullWriter;
        let mut c = Canvas::new(&mut writer, 1, 4, 10, UNBOUNDED).unwrap();
        assert_eq!(c.position(), (1, 4));
        c.move_by(2, 1);
        assert_eq!(c.position(), (3, 5));
        assert_eq!(c.column(), 2);
    }

    #[test]
    fn test_dual_pass_lines_agree() {
        // Replaying the identical call sequence against a no-op sink
        // and against a recorder at a shifted origin must make the
        // same wrap decisions
        let messages = [
            "hello world",
            "an unbreakable-quite-long-word and more text after it",
            "line\nbreaks\nhere",
            "exactly__9 ab",
            "a  b   c    d",
            "trailing spaces   ",
        ];
        for msg in messages {
            for w in [4, 7, 10, 23] {
                let runs = chars(msg);

                let mut null = NullWriter;
                let mut measure = Canvas::new(&mut null, 0, 0, w, UNBOUNDED).unwrap();
                measure.printf(&runs, DEF, DEF);
                let measured = measure.lines();

                let mut rec = Recorder::default();
                let mut draw = Canvas::new(&mut rec, 3, 7, w, UNBOUNDED).unwrap();
                draw.printf(&runs, DEF, DEF);
                let drawn = draw.lines();

                assert_eq!(measured, drawn, "msg {:?} width {}", msg, w);
                drop(draw);
                // Every cell lands inside the measured rows
                for &(_, _, y) in &rec.cells {
                    assert!(y >= 7 && y < 7 + measured, "msg {:?} width {}", msg, w);
                }
            }
        }
    }
}
