//! natter - render chat message markup in the terminal
//!
//! Formats message arguments (or a built-in demo transcript) and lays
//! them out bottom-up inside a bordered box, wrapped to the terminal
//! width. Press any key to exit.

use std::env;
use std::path::PathBuf;
use std::process;

use chrono::{DateTime, Duration, Local};

use natter::canvas::Canvas;
use natter::config::Config;
use natter::error::Result;
use natter::markup::{Directory, Formatter};
use natter::message::{day_separator, draw_message, message_lines, Message};
use natter::style::Color;
use natter::terminal::{CellWriter, Terminal};

const LINE_COLOUR: Color = Color::Yellow;
const DEF: Color = Color::Default;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse command line arguments
    let args: Vec<String> = env::args().skip(1).collect();
    let mut width_override = 0;
    let mut raw_messages: Vec<String> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                print_version();
                return Ok(());
            }
            "--width" | "-w" => {
                if let Some(n) = iter.next().and_then(|v| v.parse::<i32>().ok()) {
                    width_override = n.max(0);
                }
            }
            other => raw_messages.push(other.to_string()),
        }
    }

    let config = Config::load();

    // Keep the log worker alive for the whole run
    let _guard = if config.debug_log {
        init_logging()
    } else {
        None
    };

    let messages = build_messages(&raw_messages);

    let mut terminal = Terminal::new()?;
    let configured = if width_override > 0 {
        width_override
    } else {
        config.width
    };
    let width = match configured {
        0 => i32::from(terminal.cols()),
        n => n.min(i32::from(terminal.cols())),
    };

    draw_transcript(&mut terminal, &messages, width, config.separators)?;
    terminal.read_key()?;

    Ok(())
}

/// Set up a debug log under ~/.natter/, mirroring nothing to the screen
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let home = env::var("HOME").ok()?;
    let dir = PathBuf::from(home).join(".natter");
    let appender = tracing_appender::rolling::never(dir, "app.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .init();
    Some(guard)
}

/// Format the given markup strings, or a demo transcript if none
fn build_messages(raws: &[String]) -> Vec<Message> {
    let mut directory = Directory::new();
    directory.add_user("U024", "ada");
    directory.add_channel("C137", "general");
    let mut formatter = Formatter::new(directory);

    let now = Local::now();
    if !raws.is_empty() {
        return raws
            .iter()
            .map(|raw| Message::format("you", raw, now, &mut formatter))
            .collect();
    }

    let demo: &[(&str, i64, &str)] = &[
        ("ada", 9, "morning! did anyone look at <#C137> yet?"),
        ("grace", 8, "yes - the *wrap logic* in `canvas.rs` needed a fix"),
        (
            "grace",
            7,
            "```words collect in a buffer\nand flush when they fit```",
        ),
        ("ada", 3, "nice work :tada: see &lt;docs&gt; at <https://example.org/wrap>"),
        ("you", 0, "_reviewing_ now, back in ~ten~ five minutes :pizza:"),
    ];
    demo.iter()
        .map(|(user, mins_ago, raw)| {
            let time = now - Duration::minutes(*mins_ago);
            Message::format(*user, raw, time, &mut formatter)
        })
        .collect()
}

/// Lay the transcript out bottom-up inside a border
///
/// Each message is measured against a no-op sink first, then drawn at
/// the vertical offset that measurement dictates.
fn draw_transcript(
    terminal: &mut Terminal,
    messages: &[Message],
    width: i32,
    separators: bool,
) -> Result<()> {
    terminal.clear()?;

    let w = width;
    let h = i32::from(terminal.rows());
    print_border(terminal, 0, 0, w, h);

    let body_width = w - 2;
    let x = 1;
    let mut y = h - 1;
    let mut prev: Option<DateTime<Local>> = None;

    for msg in messages.iter().rev() {
        // Separator when the day changes between adjacent messages
        if separators {
            if let Some(newer) = prev {
                if newer.date_naive() > msg.time.date_naive() {
                    y -= 2;
                    print_string(terminal, &day_separator(w, &newer), 0, y, LINE_COLOUR, DEF);
                    y -= 1;
                }
            }
        }
        prev = Some(msg.time);

        y -= message_lines(msg, body_width)?;
        if y < 1 {
            break;
        }
        let mut canvas = Canvas::new(terminal, x, y, body_width, h)?;
        draw_message(msg, &mut canvas)?;
    }

    terminal.flush()
}

fn print_border(terminal: &mut Terminal, x: i32, y: i32, w: i32, h: i32) {
    terminal.set('╭', x, y, LINE_COLOUR, DEF);
    terminal.set('╮', w - 1, y, LINE_COLOUR, DEF);
    terminal.set('╰', x, h - 1, LINE_COLOUR, DEF);
    terminal.set('╯', w - 1, h - 1, LINE_COLOUR, DEF);
    for i in x + 1..w - 1 {
        terminal.set('─', i, y, LINE_COLOUR, DEF);
        terminal.set('─', i, h - 1, LINE_COLOUR, DEF);
    }
    for i in y + 1..h - 1 {
        terminal.set('│', x, i, LINE_COLOUR, DEF);
        terminal.set('│', w - 1, i, LINE_COLOUR, DEF);
    }
}

fn print_string(terminal: &mut Terminal, s: &str, x: i32, y: i32, fg: Color, bg: Color) -> i32 {
    let mut x = x;
    for ch in s.chars() {
        x += terminal.set(ch, x, y, fg, bg);
    }
    x
}

fn print_usage() {
    println!("natter {} - chat message markup renderer", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: natter [OPTIONS] [MESSAGE]...");
    println!();
    println!("Each MESSAGE argument is rendered as one chat message; with no");
    println!("arguments a demo transcript is shown. Press any key to exit.");
    println!();
    println!("Options:");
    println!("  -h, --help       Show this help message");
    println!("  -V, --version    Show version information");
    println!("  -w, --width N    Wrap at N columns instead of the terminal width");
    println!();
    println!("Markup:");
    println!("  *bold*  _italic_  ~strike~  `mono`  ```preformatted```");
    println!("  <@id|name>  <#id|channel>  <!here|@here>  <https://a.link>");
    println!("  &amp; &lt; &gt;  :shortcode:");
}

fn print_version() {
    println!("natter {}", env!("CARGO_PKG_VERSION"));
}
