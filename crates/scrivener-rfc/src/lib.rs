//! vCard property marshalling across the text, xCard, jCard and hCard syntaxes.
//!
//! The [`rfc::vcard`] module holds the typed property model, the structured
//! value codec, the per-property scribes and the registry that ties them
//! together.

pub mod error;
pub mod rfc;
