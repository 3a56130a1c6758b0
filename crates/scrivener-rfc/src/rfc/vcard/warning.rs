//! Parse and validation warnings.
//!
//! Malformed input never aborts a parse. Scribes record what went wrong
//! here, with a stable numeric code callers can match on.

use std::fmt;

use super::core::VCardVersion;

/// The catalog of recoverable problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A scribe declined the value; it was kept as a raw property.
    Unparseable,
    /// A scribe dropped the property.
    Skipped,
    /// A content line could not be tokenized.
    MalformedLine,
    /// Base64 content could not be decoded.
    InvalidBase64,
    /// A `data:` URI could not be decoded.
    InvalidDataUri,
    /// The sex component of GENDER is not one of M, F, O, N, U.
    InvalidSex,
    /// A JSON value has an unexpected shape.
    UnexpectedJson,
    /// An XML property element has none of the expected children.
    MissingXmlValue,
    /// The VERSION property holds an unknown value.
    UnknownVersion,
    /// The property has no value.
    NoValue,
    /// The property holds a reference where the version only allows inline content.
    ReferenceNotSupported,
    /// The property is not defined for the version.
    UnsupportedVersion,
    /// PREF is not an integer between 1 and 100.
    InvalidPref,
}

impl WarningKind {
    /// Stable numeric code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Unparseable => 1,
            Self::Skipped => 2,
            Self::MalformedLine => 3,
            Self::InvalidBase64 => 4,
            Self::InvalidDataUri => 5,
            Self::InvalidSex => 6,
            Self::UnexpectedJson => 7,
            Self::MissingXmlValue => 8,
            Self::UnknownVersion => 9,
            Self::NoValue => 20,
            Self::ReferenceNotSupported => 21,
            Self::UnsupportedVersion => 22,
            Self::InvalidPref => 23,
        }
    }

    const fn template(self) -> &'static str {
        match self {
            Self::Unparseable => "Value could not be parsed and was kept verbatim: {0}",
            Self::Skipped => "Property was skipped: {0}",
            Self::MalformedLine => "Content line could not be parsed: {0}",
            Self::InvalidBase64 => "Inline data is not valid base64: {0}",
            Self::InvalidDataUri => "Data URI could not be decoded: {0}",
            Self::InvalidSex => "Unrecognized sex value \"{0}\"",
            Self::UnexpectedJson => "Unexpected JSON value: {0}",
            Self::MissingXmlValue => "Element has no <{0}> child",
            Self::UnknownVersion => "Unknown version \"{0}\"",
            Self::NoValue => "Property has no value",
            Self::ReferenceNotSupported => "{0} cannot hold a URL in vCard {1}",
            Self::UnsupportedVersion => "{0} is not defined in vCard {1}",
            Self::InvalidPref => "PREF must be an integer between 1 and 100, found \"{0}\"",
        }
    }

    /// Renders the message, substituting `{0}`, `{1}`, ... with `args`.
    #[must_use]
    pub fn message(self, args: &[&str]) -> String {
        args.iter()
            .enumerate()
            .fold(self.template().to_string(), |message, (i, arg)| {
                message.replace(&format!("{{{i}}}"), arg)
            })
    }
}

/// A problem found while reading a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub code: u16,
    pub message: String,
    /// Name of the property being read.
    pub property: Option<String>,
    /// Source line number, when the syntax has lines.
    pub line: Option<usize>,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "Line {line}")?;
            if let Some(property) = &self.property {
                write!(f, " ({property} property)")?;
            }
            write!(f, ": ")?;
        } else if let Some(property) = &self.property {
            write!(f, "{property} property: ")?;
        }
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// A problem found by explicit validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: u16,
    pub message: String,
}

impl ValidationWarning {
    #[must_use]
    pub fn new(kind: WarningKind, args: &[&str]) -> Self {
        Self {
            code: kind.code(),
            message: kind.message(args),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// State threaded through a parse: the version being read, where the
/// reader is, and the caller's warning sink.
#[derive(Debug)]
pub struct ParseContext<'a> {
    pub version: VCardVersion,
    pub property_name: Option<String>,
    pub line: Option<usize>,
    warnings: &'a mut Vec<ParseWarning>,
}

impl<'a> ParseContext<'a> {
    #[must_use]
    pub fn new(version: VCardVersion, warnings: &'a mut Vec<ParseWarning>) -> Self {
        Self {
            version,
            property_name: None,
            line: None,
            warnings,
        }
    }

    /// Records a warning against the current property and line.
    pub fn add_warning(&mut self, kind: WarningKind, args: &[&str]) {
        let warning = ParseWarning {
            code: kind.code(),
            message: kind.message(args),
            property: self.property_name.clone(),
            line: self.line,
        };
        tracing::debug!(%warning, "Parse warning");
        self.warnings.push(warning);
    }

    /// Warnings recorded so far, including earlier ones in the sink.
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_substitutes_arguments() {
        assert_eq!(
            WarningKind::ReferenceNotSupported.message(&["KEY", "3.0"]),
            "KEY cannot hold a URL in vCard 3.0"
        );
        assert_eq!(WarningKind::NoValue.message(&[]), "Property has no value");
    }

    #[test]
    fn context_tags_property_and_line() {
        let mut sink = Vec::new();
        let mut ctx = ParseContext::new(VCardVersion::V3_0, &mut sink);
        ctx.property_name = Some("GENDER".to_string());
        ctx.line = Some(4);
        ctx.add_warning(WarningKind::InvalidSex, &["X"]);

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].code, 6);
        assert_eq!(
            sink[0].to_string(),
            "Line 4 (GENDER property): [6] Unrecognized sex value \"X\""
        );
    }

    #[test]
    fn codes_are_unique() {
        let kinds = [
            WarningKind::Unparseable,
            WarningKind::Skipped,
            WarningKind::MalformedLine,
            WarningKind::InvalidBase64,
            WarningKind::InvalidDataUri,
            WarningKind::InvalidSex,
            WarningKind::UnexpectedJson,
            WarningKind::MissingXmlValue,
            WarningKind::UnknownVersion,
            WarningKind::NoValue,
            WarningKind::ReferenceNotSupported,
            WarningKind::UnsupportedVersion,
            WarningKind::InvalidPref,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }
}
