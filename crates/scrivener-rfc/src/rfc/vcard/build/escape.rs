//! Parameter value escaping.

/// Escapes one parameter value for a content line.
///
/// With `caret_encoding`, newlines, double quotes and carets are written
/// per RFC 6868. Without it, newlines become spaces and double quotes
/// become single quotes, since neither can be represented. The value is
/// quoted when it contains `,`, `;` or `:`.
#[must_use]
pub fn escape_param_value(value: &str, caret_encoding: bool) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, caret_encoding) {
            ('^', true) => escaped.push_str("^^"),
            ('"', true) => escaped.push_str("^'"),
            ('"', false) => escaped.push('\''),
            ('\r', _) if chars.peek() == Some(&'\n') => {}
            ('\n' | '\r', true) => escaped.push_str("^n"),
            ('\n' | '\r', false) => escaped.push(' '),
            _ => escaped.push(c),
        }
    }

    if escaped.contains([',', ';', ':']) {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_value_is_unchanged() {
        assert_eq!(escape_param_value("work", true), "work");
    }

    #[test]
    fn separators_are_quoted() {
        assert_eq!(escape_param_value("a,b", true), "\"a,b\"");
        assert_eq!(escape_param_value("1 Main St; Apt 2", false), "\"1 Main St; Apt 2\"");
    }

    #[test]
    fn caret_encoding() {
        assert_eq!(
            escape_param_value("1 Main\r\nSpringfield \"IL\" ^", true),
            "1 Main^nSpringfield ^'IL^' ^^"
        );
        assert_eq!(
            escape_param_value("1 Main\nSpringfield \"IL\" ^", false),
            "1 Main Springfield 'IL' ^"
        );
    }
}
