//! Core vCard data model.

pub mod binary;
pub mod data_type;
pub mod parameter;
pub mod property;
pub mod raw;
pub mod structured;
pub mod text;
pub mod vcard;
pub mod version;

pub use binary::{
    BinaryKind, BinaryProperty, BinaryValue, ImageType, Key, KeyKind, KeyType, Logo, LogoKind,
    MediaType, MediaTypeInfo, Photo, PhotoKind, Sound, SoundKind, SoundType,
};
pub use data_type::VCardDataType;
pub use parameter::{VCardParameter, VCardParameters};
pub use property::VCardProperty;
pub use raw::RawProperty;
pub use structured::{Address, Gender, Organization, Sex, StructuredName};
pub use text::{
    Categories, Email, FormattedName, Label, ListProperty, Nickname, Note, Role, TextProperty,
    Title,
};
pub use vcard::VCard;
pub use version::VCardVersion;
