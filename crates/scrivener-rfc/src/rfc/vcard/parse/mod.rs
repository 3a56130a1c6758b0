//! Reading text content lines.
//!
//! ```rust
//! use scrivener_rfc::rfc::vcard::parse::parse_content_line;
//!
//! let line = parse_content_line("item1.EMAIL;TYPE=work:jdoe@example.com", 1, true).unwrap();
//! assert_eq!(line.group.as_deref(), Some("item1"));
//! assert_eq!(line.name, "EMAIL");
//! assert_eq!(line.parameters.types(), vec!["work"]);
//! ```

mod error;
mod lexer;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{ContentLine, parse_content_line};
