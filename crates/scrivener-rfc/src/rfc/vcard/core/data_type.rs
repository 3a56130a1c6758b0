//! Property value data types (the `VALUE` parameter).

use std::fmt;

/// The data type of a property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VCardDataType {
    Text,
    Uri,
    /// vCard 2.1 only.
    Url,
    /// vCard 2.1 only.
    ContentId,
    /// vCard 3.0 only.
    Binary,
    Date,
    Time,
    DateTime,
    DateAndOrTime,
    Timestamp,
    Boolean,
    Integer,
    Float,
    UtcOffset,
    LanguageTag,
    /// Extension or unrecognized data type, stored lowercase.
    Other(String),
}

impl VCardDataType {
    /// Parses a data type name (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "uri" => Self::Uri,
            "url" => Self::Url,
            "content-id" | "cid" => Self::ContentId,
            "binary" => Self::Binary,
            "date" => Self::Date,
            "time" => Self::Time,
            "date-time" => Self::DateTime,
            "date-and-or-time" => Self::DateAndOrTime,
            "timestamp" => Self::Timestamp,
            "boolean" => Self::Boolean,
            "integer" => Self::Integer,
            "float" => Self::Float,
            "utc-offset" => Self::UtcOffset,
            "language-tag" => Self::LanguageTag,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the lowercase name used in `VALUE`, xCard element names and
    /// jCard type slots.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Uri => "uri",
            Self::Url => "url",
            Self::ContentId => "content-id",
            Self::Binary => "binary",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date-time",
            Self::DateAndOrTime => "date-and-or-time",
            Self::Timestamp => "timestamp",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::UtcOffset => "utc-offset",
            Self::LanguageTag => "language-tag",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for VCardDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
