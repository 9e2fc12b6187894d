//! Splits a raw article into its frontmatter block and Markdown body.
//!
//! ```text
//! ---
//! title: Hello
//! author: "Ada"
//! ---
//! # Body starts here
//! ```
//!
//! Only flat `key: value` lines are understood. Anything that does not look
//! like a complete delimited block at the very start of the text is left in
//! the body untouched, so splitting never fails.

use crate::domain::{Frontmatter, ParsedArticle};

const DELIMITER: &str = "---";

/// Split `raw` into frontmatter and body.
///
/// Without a well-formed leading block the frontmatter is empty and the body
/// is `raw` verbatim.
pub fn split(raw: &str) -> ParsedArticle {
    match find_block(raw) {
        Some((block, body)) => ParsedArticle {
            frontmatter: parse_block(block),
            body: body.to_string(),
        },
        None => ParsedArticle {
            frontmatter: Frontmatter::new(),
            body: raw.to_string(),
        },
    }
}

/// Locate the delimited block. Returns `(block, body)` slices of `raw`.
fn find_block(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix(DELIMITER)?;
    let rest = rest.trim_start_matches([' ', '\t']);
    let first_newline = newline_len(rest);
    if first_newline == 0 {
        return None;
    }
    let content = &rest[first_newline..];

    // The closing delimiter must sit on its own line, preceded by a newline
    // that belongs to the block, and be followed by at least one newline.
    // The earliest such line wins.
    let mut search_from = 0;
    while let Some(offset) = content[search_from..].find('\n') {
        let line_start = search_from + offset + 1;
        if let Some(after) = content[line_start..].strip_prefix(DELIMITER) {
            if newline_len(after) > 0 {
                let block = content[..line_start].trim_end_matches(['\r', '\n']);
                return Some((block, skip_newlines(after)));
            }
        }
        search_from = line_start;
    }

    None
}

/// Length of the newline sequence (`\n` or `\r\n`) at the start of `s`.
fn newline_len(s: &str) -> usize {
    if s.starts_with("\r\n") {
        2
    } else if s.starts_with('\n') {
        1
    } else {
        0
    }
}

fn skip_newlines(mut s: &str) -> &str {
    loop {
        let n = newline_len(s);
        if n == 0 {
            return s;
        }
        s = &s[n..];
    }
}

fn parse_block(block: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::new();
    for line in block.lines() {
        if let Some((key, value)) = parse_line(line) {
            frontmatter.insert(key, value);
        }
    }
    frontmatter
}

/// Parse one `key: value` line. Splits on the first colon only.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, strip_quotes(value.trim())))
}

/// Remove one pair of matching `"` or `'` around a value.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
