//! Console feedback for the operator. Everything goes to stdout; the
//! persistent trail is the `log` table (`db::log::ttlog`).

use std::fmt::Display;

const RESET: &str = "\x1b[0m";

#[derive(Clone, Copy)]
enum Tone {
    Info,
    Success,
    Warning,
    Skipped,
}

impl Tone {
    /// (style prefix, icon)
    fn style(self) -> (&'static str, &'static str) {
        match self {
            Tone::Info => ("\x1b[1;34m", "ℹ️"),
            Tone::Success => ("\x1b[1;32m", "✅"),
            Tone::Warning => ("\x1b[1;33m", "⚠️"),
            Tone::Skipped => ("\x1b[2m", "⏭️"),
        }
    }
}

fn emit(tone: Tone, msg: &dyn Display) {
    let (style, icon) = tone.style();
    match tone {
        // dimmed lines keep the style over the whole text
        Tone::Skipped => println!("{style}{icon} {msg}{RESET}"),
        _ => println!("{style}{icon}{RESET} {msg}"),
    }
}

pub fn info(msg: impl Display) {
    emit(Tone::Info, &msg);
}

pub fn success(msg: impl Display) {
    emit(Tone::Success, &msg);
}

pub fn warning(msg: impl Display) {
    emit(Tone::Warning, &msg);
}

/// Row-level skip during an import: the row is counted and the run goes on.
pub fn skipped(msg: impl Display) {
    emit(Tone::Skipped, &msg);
}

pub fn header(title: impl Display) {
    let title = title.to_string();
    let rule = "─".repeat(unicode_width::UnicodeWidthStr::width(title.as_str()).max(12));
    println!("\x1b[1;34m{title}\n{rule}{RESET}\n");
}
