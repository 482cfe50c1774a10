//! Text normalization for model output.
//!
//! The model's markdown-flavored responses wrap values in emphasis markers
//! and decorate lists with a zoo of bullet glyphs. Normalization makes the
//! downstream line-oriented parsing format-agnostic. Both entry points are
//! total and idempotent: `normalize(normalize(x)) == normalize(x)`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parsing::NOT_AVAILABLE;

/// Bullet prefix: a dedicated glyph, or `-`/`*`/`+` followed by whitespace
/// (the whitespace requirement keeps bold markers like `**Skills**` intact).
static BULLET_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[•●▪‣◦○·]\s*|[-–—*+]\s+)").unwrap());

/// Removes markdown emphasis markers. Single underscores are left alone —
/// they are load-bearing in emails and identifiers like `snake_case`.
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "")
        .replace("__", "")
        .replace(['*', '`'], "")
}

/// Cleans a single-value field: strips emphasis, trims stray structural
/// punctuation from both ends. An empty result becomes the `N/A` sentinel.
pub fn clean_field(raw: &str) -> String {
    let stripped = strip_emphasis(raw);
    let trimmed = stripped.trim_matches(|c: char| {
        c.is_whitespace()
            || matches!(
                c,
                '[' | ']' | '(' | ')' | '{' | '}' | '"' | '\'' | ',' | ':' | ';' | '-' | '–' | '—'
                    | '>'
            )
    });
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Cleans a multi-line field: normalizes every bullet glyph to a `- ` prefix,
/// strips emphasis per line, drops blank lines. An empty result stays empty.
pub fn clean_block(raw: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(m) = BULLET_PREFIX.find(line) {
            let rest = clean_block_line(&line[m.end()..]);
            if !rest.is_empty() {
                out.push(format!("- {rest}"));
            }
        } else {
            let rest = clean_block_line(line);
            if !rest.is_empty() {
                out.push(rest);
            }
        }
    }
    out.join("\n")
}

fn clean_block_line(line: &str) -> String {
    let stripped = strip_emphasis(line);
    stripped
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | '"' | '\''))
        .to_string()
}
