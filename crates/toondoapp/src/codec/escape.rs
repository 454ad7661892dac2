//! Value quoting for the tabular row format.
//!
//! A value is written bare unless reading it back bare would change it. In
//! that case it is wrapped in double quotes, and inside the quotes only five
//! escapes exist: `\\`, `\"`, `\n`, `\r` and `\t`.

use super::DELIMITER;
use std::borrow::Cow;

const QUOTE: char = '"';
const BACKSLASH: char = '\\';

fn needs_quoting(value: &str) -> bool {
    if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
        return true;
    }
    value
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == BACKSLASH || c.is_control())
}

/// Render a single value as it appears inside a row.
pub(super) fn quote(value: &str) -> Cow<'_, str> {
    if !needs_quoting(value) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push(QUOTE);
    for c in value.chars() {
        match c {
            QUOTE => out.push_str("\\\""),
            BACKSLASH => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push(QUOTE);
    Cow::Owned(out)
}

/// Split one row into its values, undoing [`quote`].
///
/// Bare values are taken verbatim up to the next delimiter. A quote only has
/// meaning as the first character of a value.
pub(super) fn split_row(line: &str) -> Result<Vec<String>, String> {
    let mut values = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        let mut value = String::new();

        if chars.peek() == Some(&QUOTE) {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    QUOTE => {
                        closed = true;
                        break;
                    }
                    BACKSLASH => match chars.next() {
                        Some('"') => value.push(QUOTE),
                        Some('\\') => value.push(BACKSLASH),
                        Some('n') => value.push('\n'),
                        Some('r') => value.push('\r'),
                        Some('t') => value.push('\t'),
                        Some(other) => return Err(format!("unknown escape '\\{}'", other)),
                        None => return Err("dangling escape at end of row".to_string()),
                    },
                    other => value.push(other),
                }
            }
            if !closed {
                return Err("unterminated quoted value".to_string());
            }
            match chars.next() {
                None => {
                    values.push(value);
                    return Ok(values);
                }
                Some(DELIMITER) => values.push(value),
                Some(other) => {
                    return Err(format!("unexpected '{}' after closing quote", other));
                }
            }
        } else {
            loop {
                match chars.next() {
                    None => {
                        values.push(value);
                        return Ok(values);
                    }
                    Some(DELIMITER) => break,
                    Some(c) => value.push(c),
                }
            }
            values.push(value);
        }
    }
}
