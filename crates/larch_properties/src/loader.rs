//! Reading manifest properties from text.

use std::path::Path;

use crate::error::PropertiesError;
use crate::properties::Properties;

/// Loads properties from a file.
pub fn load_properties(path: &Path) -> Result<Properties, PropertiesError> {
    let content = std::fs::read_to_string(path)?;
    let properties = parse_properties(&content)?;
    tracing::trace!(path = %path.display(), entries = properties.len(), "loaded properties");
    Ok(properties)
}

/// Parses properties from a string.
///
/// Each logical line is `key=value` or `key:value`; the first unescaped
/// separator wins and both sides are trimmed. `\:`, `\=`, `\\` and `\ `
/// stand for the escaped character in keys and values; other backslashes are
/// kept as written. Lines starting with `#` or `!` are comments. A line
/// ending in a backslash continues on the next line, whose leading
/// whitespace is dropped. A later duplicate key replaces an earlier one.
pub fn parse_properties(content: &str) -> Result<Properties, PropertiesError> {
    let mut properties = Properties::new();
    let mut lines = content.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let line_no = index + 1;
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = String::from(trimmed);
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let Some(sep) = find_separator(&logical) else {
            return Err(PropertiesError::ParseError {
                line: line_no,
                reason: "missing '=' or ':' separator".to_string(),
            });
        };
        let key = unescape(trim_unescaped(&logical[..sep]));
        if key.is_empty() {
            return Err(PropertiesError::ParseError {
                line: line_no,
                reason: "empty key".to_string(),
            });
        }
        let value = unescape(trim_unescaped(&logical[sep + 1..]));
        properties.insert(key, value);
    }

    Ok(properties)
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Byte offset of the first `=` or `:` not preceded by a backslash escape.
fn find_separator(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (at, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' | ':' => return Some(at),
            _ => {}
        }
    }
    None
}

/// Trims surrounding whitespace, keeping a trailing escaped space.
fn trim_unescaped(text: &str) -> &str {
    let mut text = text.trim_start();
    while let Some(rest) = text.strip_suffix(char::is_whitespace) {
        if ends_with_continuation(rest) {
            break;
        }
        text = rest;
    }
    text
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&next @ (':' | '=' | '\\' | ' '))) => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}
