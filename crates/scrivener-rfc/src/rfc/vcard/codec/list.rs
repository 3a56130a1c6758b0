//! Flat lists: comma lists (CATEGORIES, NICKNAME) and semicolon lists
//! without sub-values (ORG, GENDER).

use super::structured::{find_unescaped, push_escaped, split_component};
use super::text::unescape_text;

/// Encodes a comma-separated list.
#[must_use]
pub fn encode_list<S: AsRef<str>>(values: &[S]) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_escaped(&mut out, value.as_ref());
    }
    out
}

/// Decodes a comma-separated list.
#[must_use]
pub fn decode_list(raw: &str) -> Vec<String> {
    split_component(raw)
}

/// Encodes a semicolon-separated list.
///
/// Without `include_trailing_empty`, trailing empty values are dropped.
#[must_use]
pub fn encode_semi<S: AsRef<str>>(values: &[S], include_trailing_empty: bool) -> String {
    let keep = if include_trailing_empty {
        values.len()
    } else {
        values
            .iter()
            .rposition(|v| !v.as_ref().is_empty())
            .map_or(0, |last| last + 1)
    };

    let mut out = String::new();
    for (i, value) in values[..keep].iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        push_escaped(&mut out, value.as_ref());
    }
    out
}

/// Splits a semicolon-separated list and unescapes each value.
///
/// With a `limit`, at most that many values are produced and the last one
/// holds the rest of the input.
#[must_use]
pub fn split(raw: &str, limit: Option<usize>) -> Vec<String> {
    let mut values = Vec::new();
    let mut rest = raw;

    loop {
        if limit.is_some_and(|limit| values.len() + 1 >= limit) {
            values.push(unescape_text(rest));
            break;
        }
        match find_unescaped(rest, ';') {
            Some(pos) => {
                values.push(unescape_text(&rest[..pos]));
                rest = &rest[pos + 1..];
            }
            None => {
                values.push(unescape_text(rest));
                break;
            }
        }
    }

    values
}
