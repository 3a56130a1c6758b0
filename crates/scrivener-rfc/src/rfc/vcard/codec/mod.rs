//! Value codecs shared by the text and JSON syntaxes.

mod list;
mod structured;
mod text;

pub use list::{decode_list, encode_list, encode_semi, split};
pub use structured::{StructuredIterator, decode, encode, split_component};
pub(crate) use structured::find_unescaped;
pub use text::{escape_text, unescape_text};
