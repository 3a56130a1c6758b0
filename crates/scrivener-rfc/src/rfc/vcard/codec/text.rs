//! Escaping for single text values.

use crate::rfc::vcard::core::VCardVersion;

/// Escapes a text value for a content line.
///
/// Newlines become `\n`. vCard 2.1 has no comma escape, so only `;` and
/// `\` are escaped there.
#[must_use]
pub fn escape_text(value: &str, version: VCardVersion) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => result.push_str("\\\\"),
            ';' => result.push_str("\\;"),
            ',' if version != VCardVersion::V2_1 => result.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                result.push_str("\\n");
            }
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }

    result
}

/// Unescapes a vCard text value.
///
/// Recognized escapes: `\n`, `\N` (newline), `\,`, `\;`, `\\`. A backslash
/// before anything else is kept as is.
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n' | 'N') => {
                    chars.next();
                    result.push('\n');
                }
                Some(&escaped @ (',' | ';' | '\\')) => {
                    chars.next();
                    result.push(escaped);
                }
                _ => result.push(c),
            }
        } else {
            result.push(c);
        }
    }

    result
}
