//! vCard marshalling (RFC 2426, RFC 6350, RFC 6351, RFC 7095).
//!
//! Typed properties are moved to and from four syntaxes: text content
//! lines (2.1, 3.0, 4.0), xCard, jCard and hCard. Each property type has a
//! scribe; the [`ScribeIndex`] finds the scribe for a name or a type and
//! keeps anything it does not know as a [`RawProperty`].
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use scrivener_rfc::rfc::vcard::{FormattedName, ScribeIndex, TextMarshaller, VCard, VCardVersion};
//!
//! let marshaller = TextMarshaller::new(Arc::new(ScribeIndex::standard()), VCardVersion::V4_0);
//!
//! let mut card = VCard::new();
//! card.add_property(FormattedName::new("Jane Doe"));
//! let text = marshaller.write(&card).unwrap();
//! assert!(text.contains("FN:Jane Doe\r\n"));
//!
//! let mut warnings = Vec::new();
//! let cards = marshaller.read(&text, &mut warnings);
//! assert_eq!(cards[0].property::<FormattedName>(), Some(&FormattedName::new("Jane Doe")));
//! ```
//!
//! ## Submodules
//!
//! - [`core`] - Property model (`VCard`, parameters, typed properties)
//! - [`codec`] - Escaping and structured/list value encoding
//! - [`scribe`] - Per-property marshallers and the registry
//! - [`normalize`] - Version-dependent parameter handling on write
//! - [`parse`] / [`build`] - Text content lines
//! - [`xcard`], [`jcard`], [`hcard`] - The other syntaxes

pub mod build;
pub mod codec;
pub mod core;
pub mod hcard;
pub mod jcard;
pub mod normalize;
pub mod parse;
pub mod rules;
pub mod scribe;
pub mod warning;
pub mod xcard;

#[cfg(test)]
mod tests;

pub use build::TextMarshaller;
pub use core::{
    Address, Categories, Email, FormattedName, Gender, Key, Label, Logo, Nickname, Note,
    Organization, Photo, RawProperty, Role, Sex, Sound, StructuredName, Title, VCard,
    VCardDataType, VCardParameter, VCardParameters, VCardProperty, VCardVersion,
};
pub use hcard::read_hcard;
pub use jcard::{read_jcard, write_jcard};
pub use parse::{ParseError, ParseResult, parse_content_line};
pub use scribe::{PropertyScribe, ScribeError, ScribeIndex, WriteContext};
pub use warning::{ParseWarning, ValidationWarning, WarningKind};
pub use xcard::{read_xcard, write_xcard};
