//! Content line errors.

use std::fmt;

pub type ParseResult<T> = Result<T, ParseError>;

/// A content line that could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Line number where the error occurred (1-based).
    pub line: usize,
    pub message: String,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn missing_separator(line: usize) -> Self {
        Self::new(
            ParseErrorKind::MissingSeparator,
            line,
            "missing colon separator",
        )
    }

    #[must_use]
    pub fn invalid_name(line: usize, name: &str) -> Self {
        Self::new(
            ParseErrorKind::InvalidPropertyName,
            line,
            format!("invalid property name: {name:?}"),
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No unquoted colon between the name and the value.
    MissingSeparator,
    InvalidPropertyName,
    InvalidParameter,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "missing separator"),
            Self::InvalidPropertyName => write!(f, "invalid property name"),
            Self::InvalidParameter => write!(f, "invalid parameter"),
        }
    }
}
