//! Content line tokenizer.
//!
//! Works on one logical line; unfolding is the document reader's job.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::vcard::core::VCardParameters;
use crate::rfc::vcard::core::parameter::names as param;

/// Nameless 2.1 parameter values that belong to ENCODING rather than TYPE.
const ENCODING_VALUES: &[&str] = &["BASE64", "B", "QUOTED-PRINTABLE", "7BIT", "8BIT"];

/// Nameless 2.1 parameter values that belong to VALUE rather than TYPE.
const VALUE_VALUES: &[&str] = &["URL", "CONTENT-ID", "CID", "INLINE"];

/// A tokenized content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Property group (e.g., "item1" in "item1.TEL").
    pub group: Option<String>,
    /// Property name, case preserved.
    pub name: String,
    pub parameters: VCardParameters,
    /// Value after the first unquoted colon, still escaped.
    pub value: String,
}

/// Parses `[group.]name[;param[=value[,value]]]*:value`.
///
/// With `caret_decoding`, parameter values are decoded per RFC 6868
/// (`^n`, `^'`, `^^`).
///
/// ## Errors
/// Returns an error if the colon is missing or the name is malformed.
pub fn parse_content_line(line: &str, line_num: usize, caret_decoding: bool) -> ParseResult<ContentLine> {
    let colon_pos = find_value_separator(line).ok_or_else(|| ParseError::missing_separator(line_num))?;

    let (head, value) = line.split_at(colon_pos);
    let value = &value[1..];

    let (group, head) = parse_group(head);

    let (name, params_str) = match head.split_once(';') {
        Some((name, params)) => (name, Some(params)),
        None => (head, None),
    };

    if !is_token(name) {
        return Err(ParseError::invalid_name(line_num, name));
    }

    let parameters = match params_str {
        Some(params_str) => parse_parameters(params_str, line_num, caret_decoding)?,
        None => VCardParameters::new(),
    };

    Ok(ContentLine {
        group: group.map(String::from),
        name: name.to_string(),
        parameters,
        value: value.to_string(),
    })
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Finds the colon that separates name/params from value, skipping quoted
/// parameter values.
fn find_value_separator(line: &str) -> Option<usize> {
    let mut in_quotes = false;

    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(i),
            _ => {}
        }
    }

    None
}

fn parse_group(s: &str) -> (Option<&str>, &str) {
    let name_end = s.find(';').unwrap_or(s.len());
    if let Some(dot_pos) = s[..name_end].find('.') {
        let group = &s[..dot_pos];
        if is_token(group) {
            return (Some(group), &s[dot_pos + 1..]);
        }
    }
    (None, s)
}

fn parse_parameters(s: &str, line_num: usize, caret_decoding: bool) -> ParseResult<VCardParameters> {
    let mut parameters = VCardParameters::new();
    let mut remaining = s;

    while !remaining.is_empty() {
        let (name, values, rest) = parse_single_parameter(remaining, line_num, caret_decoding)?;
        match name {
            Some(name) => parameters.put_all(name, values),
            None => {
                for value in values {
                    parameters.put(nameless_parameter(&value), value);
                }
            }
        }
        remaining = rest;
    }

    Ok(parameters)
}

/// Picks the parameter a nameless (vCard 2.1 style) value belongs to.
fn nameless_parameter(value: &str) -> &'static str {
    let is = |set: &[&str]| set.iter().any(|v| v.eq_ignore_ascii_case(value));
    if is(ENCODING_VALUES) {
        param::ENCODING
    } else if is(VALUE_VALUES) {
        param::VALUE
    } else {
        param::TYPE
    }
}

type SingleParameter<'a> = (Option<&'a str>, Vec<String>, &'a str);

fn parse_single_parameter(s: &str, line_num: usize, caret_decoding: bool) -> ParseResult<SingleParameter<'_>> {
    let name_end = s.find(['=', ';']).unwrap_or(s.len());
    let name = &s[..name_end];

    if !is_token(name) {
        return Err(ParseError::new(
            ParseErrorKind::InvalidParameter,
            line_num,
            format!("invalid parameter name: {name:?}"),
        ));
    }

    match s[name_end..].strip_prefix('=') {
        Some(after_eq) => {
            let (values, rest) = parse_param_values(after_eq, caret_decoding);
            Ok((Some(name), values, rest))
        }
        None => {
            let rest = s[name_end..].strip_prefix(';').unwrap_or_default();
            Ok((None, vec![name.to_string()], rest))
        }
    }
}

/// Parses comma-separated, possibly quoted, parameter values. Returns the
/// values and the input after the terminating `;`.
fn parse_param_values(s: &str, caret_decoding: bool) -> (Vec<String>, &str) {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = s.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => values.push(std::mem::take(&mut current)),
            ';' if !in_quotes => {
                values.push(current);
                return (values, &s[i + 1..]);
            }
            '^' if caret_decoding => match chars.peek().map(|&(_, next)| next) {
                Some('n' | 'N') => {
                    chars.next();
                    current.push('\n');
                }
                Some('\'') => {
                    chars.next();
                    current.push('"');
                }
                Some('^') => {
                    chars.next();
                    current.push('^');
                }
                _ => current.push('^'),
            },
            _ => current.push(c),
        }
    }

    values.push(current);
    (values, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ContentLine {
        parse_content_line(line, 1, true).unwrap()
    }

    #[test]
    fn parse_simple_line() {
        let line = parse("FN:John Doe");
        assert!(line.group.is_none());
        assert_eq!(line.name, "FN");
        assert!(line.parameters.is_empty());
        assert_eq!(line.value, "John Doe");
    }

    #[test]
    fn parse_grouped_line() {
        let line = parse("item1.ADR;TYPE=work:;;1 Main St");
        assert_eq!(line.group.as_deref(), Some("item1"));
        assert_eq!(line.name, "ADR");
        assert_eq!(line.parameters.types(), vec!["work"]);
    }

    #[test]
    fn name_case_is_preserved() {
        assert_eq!(parse("x-Custom:1").name, "x-Custom");
    }

    #[test]
    fn parse_with_parameters() {
        let line = parse("EMAIL;TYPE=home,work;PREF=1:john@example.com");
        assert_eq!(line.parameters.values("TYPE"), vec!["home", "work"]);
        assert_eq!(line.parameters.pref(), Some(1));
    }

    #[test]
    fn quoted_value_may_hold_separators() {
        let line = parse("ADR;LABEL=\"1 Main St;Suite 2: rear\":;;1 Main St");
        assert_eq!(line.parameters.label(), Some("1 Main St;Suite 2: rear"));
        assert_eq!(line.value, ";;1 Main St");
    }

    #[test]
    fn caret_decoding() {
        let line = parse("ADR;LABEL=1 Main^nSpringfield ^'IL^' ^^:;;1 Main");
        assert_eq!(line.parameters.label(), Some("1 Main\nSpringfield \"IL\" ^"));

        let raw = parse_content_line("ADR;LABEL=a^nb:x", 1, false).unwrap();
        assert_eq!(raw.parameters.label(), Some("a^nb"));
    }

    #[test]
    fn nameless_parameters() {
        let line = parse("PHOTO;JPEG;ENCODING=BASE64:AAAA");
        assert_eq!(line.parameters.types(), vec!["JPEG"]);
        assert_eq!(line.parameters.encoding(), Some("BASE64"));

        let line = parse("KEY;PGP;BASE64:AAAA");
        assert_eq!(line.parameters.types(), vec!["PGP"]);
        assert_eq!(line.parameters.encoding(), Some("BASE64"));

        let line = parse("SOUND;URL:http://example.com/hi.wav");
        assert_eq!(line.parameters.first("VALUE"), Some("URL"));
    }

    #[test]
    fn colon_in_value() {
        assert_eq!(parse("NOTE:see https://example.com:8080/").value, "see https://example.com:8080/");
    }

    #[test]
    fn errors() {
        let err = parse_content_line("NO SEPARATOR", 3, true).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingSeparator);
        assert_eq!(err.line, 3);

        let err = parse_content_line("BAD NAME:x", 1, true).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidPropertyName);

        let err = parse_content_line("FN;=x:y", 1, true).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidParameter);
    }
}
