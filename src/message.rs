//! Chat message model and rendering
//!
//! A [`Message`] owns the formatted content and spans produced by the
//! lexer. [`draw_message`] replays one message through a canvas:
//! timestamp, author, edited marker, then the body with each span in
//! its kind's colours. Row counts come from replaying the identical
//! sequence against a measuring canvas first.

use chrono::{DateTime, Local};

use crate::canvas::{Canvas, UNBOUNDED};
use crate::error::Result;
use crate::markup::{FormatSpan, Formatter, Lookup, SpanKind};
use crate::style::{colours_for, name_colour, Color};
use crate::terminal::NullWriter;

const DEF: Color = Color::Default;
const EDITED_COLOUR: Color = Color::Blue;

/// One retained chat message
///
/// The content and spans are immutable once formatted; an edit re-runs
/// formatting and replaces both wholesale.
#[derive(Debug)]
pub struct Message {
    /// Author display name
    pub user: String,
    /// Formatted message content
    pub text: Vec<char>,
    /// Style spans over `text`, ascending and disjoint
    pub spans: Vec<FormatSpan>,
    /// When the message was sent
    pub time: DateTime<Local>,
    /// Whether the message has been edited
    pub edited: bool,
}

impl Message {
    /// Format `raw` into a new message
    pub fn format<L: Lookup>(
        user: impl Into<String>,
        raw: &str,
        time: DateTime<Local>,
        formatter: &mut Formatter<L>,
    ) -> Self {
        let (text, spans) = formatter.format(raw);
        Self {
            user: user.into(),
            text,
            spans,
            time,
            edited: false,
        }
    }

    /// Replace the message content with newly formatted text
    ///
    /// The span list is replaced as a whole, never patched in place.
    pub fn edit<L: Lookup>(&mut self, raw: &str, formatter: &mut Formatter<L>) {
        let (text, spans) = formatter.format(raw);
        self.text = text;
        self.spans = spans;
        self.edited = true;
    }
}

/// Rows a plain run of characters occupies at the given width
pub fn required_lines(w: i32, runs: &[char]) -> Result<i32> {
    let mut writer = NullWriter;
    let mut canvas = Canvas::new(&mut writer, 0, 0, w, UNBOUNDED)?;
    canvas.printf(runs, DEF, DEF);
    Ok(canvas.lines())
}

/// Rows a full message render occupies at the given width
///
/// Replays [`draw_message`] against a no-op sink; drawing the same
/// message at the same width afterwards consumes exactly this many
/// rows.
pub fn message_lines(msg: &Message, w: i32) -> Result<i32> {
    let mut writer = NullWriter;
    let mut canvas = Canvas::new(&mut writer, 0, 0, w, UNBOUNDED)?;
    draw_message(msg, &mut canvas)?;
    Ok(canvas.lines())
}

/// Render one message through a canvas
pub fn draw_message(msg: &Message, c: &mut Canvas<'_>) -> Result<()> {
    // Message prefix
    c.prints(&format_timestamp(&msg.time), DEF, DEF);
    c.move_by(1, 0);
    c.prints(&msg.user, name_colour(&msg.user), DEF);
    c.move_by(1, 0);
    if msg.edited {
        c.prints("(edited)", EDITED_COLOUR, DEF);
        c.move_by(1, 0);
    }

    if msg.spans.is_empty() {
        c.printf(&msg.text, DEF, DEF);
        return Ok(());
    }

    let mut pos = 0;
    for span in &msg.spans {
        // Spans are valid by construction; clamp anyway so a malformed
        // list cannot slice out of bounds
        let end = span.end().min(msg.text.len());
        let start = span.start().min(end);

        if start > pos {
            c.printf(&msg.text[pos..start], DEF, DEF);
        }

        let styled = &msg.text[start..end];
        let (fg, bg) = colours_for(span.kind(), styled);

        // Preformatted text has background across the whole remaining
        // width, on every row the block will occupy
        if span.kind() == SpanKind::Preformatted {
            let (w, _) = c.size();
            let bg_width = w - c.column();
            if bg_width > 0 {
                let rows = required_lines(bg_width, styled)?;
                c.background(bg_width, rows - 1, bg);
            }
        }

        c.printf(styled, fg, bg);
        pos = end;
    }
    c.printf(&msg.text[pos..], DEF, DEF);
    Ok(())
}

/// A message timestamp, fixed at eight columns (` 3:04 PM`)
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format("%l:%M %p").to_string()
}

/// A full-width day separator line (`├──── Jan 2 ─┤`)
pub fn day_separator(w: i32, date: &DateTime<Local>) -> String {
    let label = date.format("%b %-d").to_string();
    let dashes = (w as usize)
        .saturating_sub(5)
        .saturating_sub(label.chars().count());
    format!("├{} {} ─┤", "─".repeat(dashes), label)
}

/// Status line for users currently typing
pub fn format_users_typing(users: &[String]) -> String {
    match users.len() {
        0 => String::new(),
        n => {
            let conj = if n > 1 { "are" } else { "is" };
            format!("{} {} typing...", users.join(","), conj)
        }
    }
}
