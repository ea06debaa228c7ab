//! Terminal styling for the CLI.
//!
//! Raw ANSI escape codes. Respects `NO_COLOR` (https://no-color.org/) and
//! `TERM=dumb`.

use std::sync::OnceLock;

use crate::types::Classification;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

pub fn color_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        if std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        !matches!(std::env::var("TERM").as_deref(), Ok("dumb"))
    })
}

// ---------------------------------------------------------------------------
// ANSI escape helpers
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const FG_RED: &str = "\x1b[31m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_BLUE: &str = "\x1b[34m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_CYAN: &str = "\x1b[36m";
const FG_WHITE: &str = "\x1b[37m";

fn styled(codes: &[&str], text: &str) -> String {
    if !color_enabled() || codes.is_empty() {
        return text.to_string();
    }
    let prefix: String = codes.concat();
    format!("{}{}{}", prefix, text, RESET)
}

pub fn dim(text: &str) -> String { styled(&[DIM], text) }
pub fn bold_red(text: &str) -> String { styled(&[BOLD, FG_RED], text) }
pub fn bold_white(text: &str) -> String { styled(&[BOLD, FG_WHITE], text) }
pub fn bold_cyan(text: &str) -> String { styled(&[BOLD, FG_CYAN], text) }

pub mod icon {
    pub const PROMPT: &str = "◆";
    pub const STEP: &str = "▸";
    pub const SECTION: &str = "▰▰▰";
}

// ---------------------------------------------------------------------------
// Formatting primitives
// ---------------------------------------------------------------------------

/// Section header with a horizontal rule.
///
/// ```text
/// ── after phrase merging ──────────────────
/// ```
pub fn section(title: &str) -> String {
    let rule_len = 48usize.saturating_sub(title.chars().count() + 6);
    format!("{} {} {}", dim("──"), bold_white(title), dim(&"─".repeat(rule_len)))
}

/// A fragment with its classification, for stage listings.
///
/// ```text
///   1 ▸ NounPhrase  the dog and the cat
/// ```
pub fn fragment_line(index: usize, class: Classification, text: &str) -> String {
    let num = dim(&format!("{:>3}", index));
    let label = format!("{:<10}", class.to_string());
    format!("{} {} {}  {}", num, dim(icon::STEP), classification(class, &label), text.replace('\n', " / "))
}

/// Classification name colored by kind.
pub fn classification(class: Classification, text: &str) -> String {
    let color = match class {
        Classification::NounPhrase => FG_BLUE,
        Classification::VerbPhrase => FG_MAGENTA,
        Classification::Clause => FG_GREEN,
        Classification::Other => FG_YELLOW,
    };
    styled(&[color], text)
}

pub fn error(message: &str) -> String {
    format!("{} {}", bold_red("error:"), message)
}

pub fn prompt() -> String {
    format!("{} ", bold_cyan(icon::PROMPT))
}

pub fn banner(name: &str, version: &str) -> String {
    format!("{} {} {}", bold_cyan(icon::SECTION), bold_white(name), dim(version))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
