//! Message markup lexer
//!
//! Turns raw chat-service message text into plain content plus an
//! ordered list of [`FormatSpan`]s in a single forward pass. Six
//! overlapping escape grammars are recognised:
//!
//! - `<...>` references: users, channels, variables and bare links
//! - `` `mono` `` and ```` ```preformatted``` ```` runs
//! - `&name;` entity escapes
//! - `:shortcode:` emoji
//! - `*bold*`, `_italic_`, `~strikethrough~` emphasis
//!
//! The lexer is total: it never fails and never backtracks beyond
//! bounded lookahead. Malformed or unbalanced markup of every kind
//! degrades to literal passthrough of only the triggering character,
//! with scanning resuming immediately after. Chat text is untrusted
//! and must always render something.

use std::mem;

use regex::Regex;

use super::emoji;
use super::span::{FormatSpan, SpanKind};

/// Resolves chat-service identifiers to display names
///
/// Called only when an inline reference omits an explicit label.
/// Assumed in-memory and non-blocking.
pub trait Lookup {
    /// Display name for a user id
    fn user_name(&self, id: &str) -> String;
    /// Display name for a channel id
    fn channel_name(&self, id: &str) -> String;
}

/// Interior shape of a `<...>` reference: sigil, id, optional label
const REFERENCE_PATTERN: &str = "^([#!@])([^|]+)\\|?(.+)?$";

/// Valid emoji shortcode names
const SHORTCODE_PATTERN: &str = "^[+_a-z0-9]+$";

/// The markup lexer
///
/// Scratch buffers are reused across calls; the produced content and
/// span list are handed to the caller on each [`format`](Self::format).
pub struct Formatter<L> {
    lookup: L,
    reference_re: Regex,
    shortcode_re: Regex,
    content: Vec<char>,
    spans: Vec<FormatSpan>,
    buf: Vec<char>,
    pos: usize,
}

impl<L: Lookup> Formatter<L> {
    /// Create a formatter resolving unlabelled references through `lookup`
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            reference_re: Regex::new(REFERENCE_PATTERN).expect("reference pattern compiles"),
            shortcode_re: Regex::new(SHORTCODE_PATTERN).expect("shortcode pattern compiles"),
            content: Vec::new(),
            spans: Vec::new(),
            buf: Vec::new(),
            pos: 0,
        }
    }

    /// Lex `raw` into plain content and its ordered format spans
    ///
    /// Span offsets are in units of the returned content, not the raw
    /// input. Spans come out in ascending start order and never overlap.
    pub fn format(&mut self, raw: &str) -> (Vec<char>, Vec<FormatSpan>) {
        self.buf.clear();
        self.buf.extend(raw.chars());
        self.content.clear();
        self.spans.clear();
        self.pos = 0;

        while let Some(ch) = self.next() {
            match ch {
                '<' => self.reference(),
                '`' => self.mono_or_preformatted(),
                '&' => self.entity(),
                ':' => self.shortcode(),
                c if is_emphasis(c) && is_word(self.peek()) => self.emphasis(c),
                c => self.push(c),
            }
        }

        (mem::take(&mut self.content), mem::take(&mut self.spans))
    }

    /// `<[@|#|!]id[|label]>` references and bare links
    fn reference(&mut self) {
        let Some(end) = self.find('>') else {
            // Just a lone less-than...
            self.push('<');
            return;
        };

        let seq: Vec<char> = self.buf[self.pos..end].to_vec();
        let text: String = seq.iter().collect();
        if let Some(caps) = self.reference_re.captures(&text) {
            let kind = kind_for_sigil(&caps[1]);
            let mut label: Vec<char> = caps
                .get(3)
                .map(|m| m.as_str().chars().collect())
                .unwrap_or_default();

            if label.is_empty() {
                // No explicit label - ask the directory
                label = self.resolve(kind, &caps[2]).chars().collect();
            } else if kind == SpanKind::Channel && label[0] != '#' {
                // The service sends <#Cxxxx|channel> without a '#' prefix
                label.insert(0, '#');
            }
            self.push_span(&label, kind);
        } else if !seq.is_empty() {
            // Anything else inside <...> is a bare link
            self.push('🔗');
            self.push_span(&seq, SpanKind::Link);
        }
        self.discard(seq.len() + 1);
    }

    /// `` `mono` `` runs and ```` ```preformatted``` ```` blocks
    fn mono_or_preformatted(&mut self) {
        if self.peek_run(&['`', '`']) {
            let Some(close) = self.find_run(&['`', '`', '`']) else {
                // Preformatted block unclosed
                self.push('`');
                return;
            };
            self.discard(2);
            let body: Vec<char> = if close > self.pos {
                self.buf[self.pos..close].to_vec()
            } else {
                Vec::new()
            };

            // A preformatted block renders as an isolated paragraph:
            // surround it with newlines unless its neighbours already
            // provide them.
            if self.content.is_empty()
                || (self.content.last() != Some(&'\n') && self.peek() != Some('\n'))
            {
                self.push('\n');
            }
            self.push_span(&body, SpanKind::Preformatted);
            self.discard(body.len() + 3);
            if self.content.last() != Some(&'\n') && self.peek() != Some('\n') {
                self.push('\n');
            }
            return;
        }

        if let Some(end) = self.find('`') {
            let seq: Vec<char> = self.buf[self.pos..end].to_vec();
            self.push_span(&seq, SpanKind::Monospaced);
            self.discard(seq.len() + 1);
            return;
        }

        // Just a lone backtick...
        self.push('`');
    }

    /// `&name;` entity escapes
    fn entity(&mut self) {
        let Some(end) = self.find(';') else {
            // Just a lone ampersand...
            self.push('&');
            return;
        };

        let seq: Vec<char> = self.buf[self.pos..end].to_vec();
        let name: String = seq.iter().collect();
        match name.as_str() {
            "amp" => self.push('&'),
            "lt" => self.push('<'),
            "gt" => self.push('>'),
            _ => {
                // Unknown escape - reproduce verbatim with delimiters
                self.push('&');
                self.push_all(&seq);
                self.push(';');
            }
        }
        self.discard(seq.len() + 1);
    }

    /// `:shortcode:` emoji
    fn shortcode(&mut self) {
        let Some(end) = self.find(':') else {
            // Just a lone colon...
            self.push(':');
            return;
        };

        let seq: Vec<char> = self.buf[self.pos..end].to_vec();
        let name: String = seq.iter().collect();
        if !self.shortcode_re.is_match(&name) {
            // Not a shortcode; emit the colon and resume right after it
            // without consuming anything else
            self.push(':');
            return;
        }

        match emoji::glyph(&name) {
            Some(glyph) => self.push_span(&[glyph], SpanKind::Emoji),
            None => self.push_span(&seq, SpanKind::Emoji),
        }
        self.discard(seq.len() + 1);
    }

    /// `*bold*`, `_italic_`, `~strikethrough~` emphasis
    fn emphasis(&mut self, delim: char) {
        if let Some(end) = self.find(delim) {
            let seq: Vec<char> = self.buf[self.pos..end].to_vec();
            self.push_span(&seq, kind_for_delimiter(delim));
            self.discard(seq.len() + 1);
            return;
        }

        // Just a lone markup character...
        self.push(delim);
    }

    fn resolve(&self, kind: SpanKind, id: &str) -> String {
        match kind {
            SpanKind::User => format!("@{}", self.lookup.user_name(id)),
            SpanKind::Channel => format!("#{}", self.lookup.channel_name(id)),
            _ => id.to_string(),
        }
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.buf.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek(&self) -> Option<char> {
        self.buf.get(self.pos).copied()
    }

    /// Check whether the unconsumed input starts with `run`
    fn peek_run(&self, run: &[char]) -> bool {
        self.buf[self.pos..].starts_with(run)
    }

    /// Find the next occurrence of `ch` at or after the cursor
    fn find(&self, ch: char) -> Option<usize> {
        self.buf[self.pos..]
            .iter()
            .position(|&c| c == ch)
            .map(|i| self.pos + i)
    }

    /// Find the next occurrence of `run` at or after the cursor
    fn find_run(&self, run: &[char]) -> Option<usize> {
        self.buf[self.pos..]
            .windows(run.len())
            .position(|w| w == run)
            .map(|i| self.pos + i)
    }

    fn discard(&mut self, n: usize) {
        self.pos += n;
    }

    fn push(&mut self, ch: char) {
        self.content.push(ch);
    }

    fn push_all(&mut self, chars: &[char]) {
        self.content.extend_from_slice(chars);
    }

    /// Append `chars` to the content and record a span over them
    fn push_span(&mut self, chars: &[char], kind: SpanKind) {
        let start = self.content.len();
        self.spans
            .push(FormatSpan::new(start, start + chars.len(), kind));
        self.push_all(chars);
    }
}

fn is_emphasis(ch: char) -> bool {
    ch == '_' || ch == '*' || ch == '~'
}

/// Emphasis only triggers when followed by a word character, so
/// standalone punctuation passes through untouched
fn is_word(ch: Option<char>) -> bool {
    matches!(ch, Some(c) if c == '_' || c.is_alphanumeric())
}

fn kind_for_delimiter(delim: char) -> SpanKind {
    match delim {
        '*' => SpanKind::Bold,
        '_' => SpanKind::Italic,
        '~' => SpanKind::Strikethrough,
        _ => SpanKind::Unknown,
    }
}

fn kind_for_sigil(sigil: &str) -> SpanKind {
    match sigil {
        "@" => SpanKind::User,
        "#" => SpanKind::Channel,
        "!" => SpanKind::Variable,
        _ => SpanKind::Unknown,
    }
}

/// An in-memory directory of user and channel display names
///
/// Unknown ids resolve to a fixed placeholder so a message always
/// renders something.
#[derive(Debug, Default)]
pub struct Directory {
    users: std::collections::HashMap<String, String>,
    channels: std::collections::HashMap<String, String>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.users.insert(id.into(), name.into());
    }

    pub fn add_channel(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.channels.insert(id.into(), name.into());
    }
}

/// Placeholder display name for unresolved ids
const UNKNOWN_NAME: &str = "unknown";

impl Lookup for Directory {
    fn user_name(&self, id: &str) -> String {
        self.users
            .get(id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    fn channel_name(&self, id: &str) -> String {
        self.channels
            .get(id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }
}
