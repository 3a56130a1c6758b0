//! Multi-component structured values (N, ADR).
//!
//! A structured value is an ordered list of components, each an ordered list
//! of zero or more strings. On the wire, sub-values are joined by `,` and
//! components by `;`; both delimiters and the backslash are escaped inside
//! sub-values.

/// Appends `value` with `\`, `,`, `;` and newlines escaped.
pub(crate) fn push_escaped(out: &mut String, value: &str) {
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' | ',' | ';' => {
                out.push('\\');
                out.push(c);
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
}

/// Encodes components into a structured value.
///
/// Without `include_trailing_empty`, trailing components that encode to
/// nothing are dropped. Interior empty components always keep their `;`.
#[must_use]
pub fn encode<C, S>(components: &[C], include_trailing_empty: bool) -> String
where
    C: AsRef<[S]>,
    S: AsRef<str>,
{
    let encoded: Vec<String> = components
        .iter()
        .map(|component| {
            let mut out = String::new();
            for (i, value) in component.as_ref().iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_escaped(&mut out, value.as_ref());
            }
            out
        })
        .collect();

    let keep = if include_trailing_empty {
        encoded.len()
    } else {
        encoded
            .iter()
            .rposition(|c| !c.is_empty())
            .map_or(0, |last| last + 1)
    };

    encoded[..keep].join(";")
}

/// Decodes a structured value.
#[must_use]
pub fn decode(raw: &str) -> StructuredIterator<'_> {
    StructuredIterator::from_text(raw)
}

/// Finds the byte offset of the first `delimiter` not preceded by an
/// escaping backslash.
pub(crate) fn find_unescaped(s: &str, delimiter: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == delimiter {
            return Some(i);
        }
    }
    None
}

/// Splits a component on unescaped commas and unescapes each sub-value.
///
/// An empty component yields no sub-values.
#[must_use]
pub fn split_component(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some(&escaped @ (',' | ';' | '\\')) => {
                    chars.next();
                    current.push(escaped);
                }
                Some('n' | 'N') => {
                    chars.next();
                    current.push('\n');
                }
                _ => current.push(c),
            }
        } else if c == ',' {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    parts.push(current);
    parts
}

#[derive(Debug, Clone)]
enum Source<'a> {
    Text(Option<&'a str>),
    Components(std::vec::IntoIter<Vec<String>>),
}

/// Pull-based reader over the components of a structured value.
///
/// Asking for more components than the value has is not an error; the
/// missing ones come back empty, which is how omitted trailing components
/// are reconstructed.
#[derive(Debug, Clone)]
pub struct StructuredIterator<'a> {
    source: Source<'a>,
}

impl<'a> StructuredIterator<'a> {
    /// Reads from a text-syntax value; segments are split lazily.
    #[must_use]
    pub fn from_text(raw: &'a str) -> Self {
        Self {
            source: Source::Text(Some(raw)),
        }
    }

    /// Reads from components that were already split (jCard, xCard).
    #[must_use]
    pub fn from_components(components: Vec<Vec<String>>) -> Self {
        Self {
            source: Source::Components(components.into_iter()),
        }
    }

    /// Returns whether another component is available.
    #[must_use]
    pub fn has_next(&self) -> bool {
        match &self.source {
            Source::Text(rest) => rest.is_some(),
            Source::Components(iter) => iter.len() > 0,
        }
    }

    /// Consumes the next component; empty once the value is exhausted.
    pub fn next_component(&mut self) -> Vec<String> {
        self.next().unwrap_or_default()
    }

    /// Consumes the next component and returns its first sub-value.
    pub fn next_value(&mut self) -> Option<String> {
        self.next_component().into_iter().next()
    }
}

impl Iterator for StructuredIterator<'_> {
    type Item = Vec<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.source {
            Source::Text(rest) => {
                let current = rest.take()?;
                let segment = match find_unescaped(current, ';') {
                    Some(pos) => {
                        *rest = Some(&current[pos + 1..]);
                        &current[..pos]
                    }
                    None => current,
                };
                Some(split_component(segment))
            }
            Source::Components(iter) => iter.next(),
        }
    }
}
