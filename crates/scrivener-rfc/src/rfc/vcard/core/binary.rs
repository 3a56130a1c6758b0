//! Binary-or-reference properties (PHOTO, LOGO, SOUND, KEY).
//!
//! The value is a tagged union: a remote reference, inline bytes, or (KEY
//! only) inline text. Every mutator replaces the whole value, so at most one
//! branch is ever populated. A property with no value yet is valid in memory
//! and reported by validation.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use super::parameter::VCardParameters;
use super::property::{VCardProperty, names};
use super::vcard::VCard;
use super::version::VCardVersion;
use crate::rfc::vcard::rules;
use crate::rfc::vcard::warning::{ValidationWarning, WarningKind};

/// Content type metadata shared by all media type families.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaTypeInfo {
    /// Value used in the `TYPE` parameter by vCard 2.1 and 3.0 (e.g. "JPEG").
    pub value: Option<Cow<'static, str>>,
    /// MIME type used in the `MEDIATYPE` parameter by vCard 4.0.
    pub media_type: Option<Cow<'static, str>>,
    /// Usual file extension, without the dot.
    pub extension: Option<Cow<'static, str>>,
}

impl MediaTypeInfo {
    const fn known(value: &'static str, media_type: &'static str, extension: &'static str) -> Self {
        Self {
            value: Some(Cow::Borrowed(value)),
            media_type: Some(Cow::Borrowed(media_type)),
            extension: Some(Cow::Borrowed(extension)),
        }
    }

    fn matches(&self, value: Option<&str>, media_type: Option<&str>, extension: Option<&str>) -> bool {
        fn eq(have: Option<&Cow<'static, str>>, want: Option<&str>) -> bool {
            want.is_none_or(|w| have.is_some_and(|h| h.eq_ignore_ascii_case(w)))
        }

        (value.is_some() || media_type.is_some() || extension.is_some())
            && eq(self.value.as_ref(), value)
            && eq(self.media_type.as_ref(), media_type)
            && eq(self.extension.as_ref(), extension)
    }
}

/// A family of content types (image types, key types, ...).
pub trait MediaType: fmt::Debug + Clone + PartialEq + Send + Sync + 'static {
    /// The well-known members of the family.
    fn known() -> &'static [Self];

    fn info(&self) -> &MediaTypeInfo;

    fn from_info(info: MediaTypeInfo) -> Self;

    /// Finds a well-known member matching every given criterion.
    #[must_use]
    fn find(value: Option<&str>, media_type: Option<&str>, extension: Option<&str>) -> Option<Self> {
        Self::known()
            .iter()
            .find(|k| k.info().matches(value, media_type, extension))
            .cloned()
    }

    /// Finds a well-known member or builds a custom one from the inputs.
    #[must_use]
    fn get(value: Option<&str>, media_type: Option<&str>, extension: Option<&str>) -> Self {
        Self::find(value, media_type, extension).unwrap_or_else(|| {
            Self::from_info(MediaTypeInfo {
                value: value.map(|v| Cow::Owned(v.to_string())),
                media_type: media_type.map(|v| Cow::Owned(v.to_string())),
                extension: extension.map(|v| Cow::Owned(v.to_string())),
            })
        })
    }

    /// The legacy `TYPE` value.
    fn value(&self) -> Option<&str> {
        self.info().value.as_deref()
    }

    /// The MIME type.
    fn media_type(&self) -> Option<&str> {
        self.info().media_type.as_deref()
    }
}

macro_rules! media_type_family {
    ($(#[$meta:meta])* $name:ident { $($konst:ident => ($value:literal, $mime:literal, $ext:literal)),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(MediaTypeInfo);

        impl $name {
            $(pub const $konst: Self = Self(MediaTypeInfo::known($value, $mime, $ext));)*

            const KNOWN: &'static [Self] = &[$(Self::$konst),*];
        }

        impl MediaType for $name {
            fn known() -> &'static [Self] {
                Self::KNOWN
            }

            fn info(&self) -> &MediaTypeInfo {
                &self.0
            }

            fn from_info(info: MediaTypeInfo) -> Self {
                Self(info)
            }
        }
    };
}

media_type_family!(
    /// Image content types (PHOTO, LOGO).
    ImageType {
        JPEG => ("JPEG", "image/jpeg", "jpg"),
        GIF => ("GIF", "image/gif", "gif"),
        PNG => ("PNG", "image/png", "png"),
    }
);

media_type_family!(
    /// Audio content types (SOUND).
    SoundType {
        AAC => ("AAC", "audio/aac", "aac"),
        MIDI => ("MIDI", "audio/midi", "mid"),
        MP3 => ("MP3", "audio/mp3", "mp3"),
        MPEG => ("MPEG", "audio/mpeg", "mpeg"),
        OGG => ("OGG", "audio/ogg", "ogg"),
        WAV => ("WAV", "audio/wav", "wav"),
    }
);

media_type_family!(
    /// Key content types (KEY).
    KeyType {
        PGP => ("PGP", "application/pgp-keys", "pgp"),
        GPG => ("GPG", "application/gpg", "gpg"),
        X509 => ("X509", "application/x-x509-ca-cert", "crt"),
    }
);

/// Ties a binary property to its name and content type family.
pub trait BinaryKind: fmt::Debug + Clone + Default + PartialEq + Send + Sync + 'static {
    type Media: MediaType;

    /// Registration name of the property.
    const NAME: &'static str;

    /// Whether the property may hold inline text.
    const ALLOWS_TEXT: bool = false;
}

macro_rules! binary_kind {
    ($kind:ident, $media:ty, $name:expr, $text:expr) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $kind;

        impl BinaryKind for $kind {
            type Media = $media;
            const NAME: &'static str = $name;
            const ALLOWS_TEXT: bool = $text;
        }
    };
}

binary_kind!(PhotoKind, ImageType, names::PHOTO, false);
binary_kind!(LogoKind, ImageType, names::LOGO, false);
binary_kind!(SoundKind, SoundType, names::SOUND, false);
binary_kind!(KeyKind, KeyType, names::KEY, true);

/// The populated state of a binary property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryValue {
    /// A URL or URI pointing at the content.
    Reference(String),
    /// The content itself.
    Inline(Vec<u8>),
    /// A plain-text rendering of the content (KEY only).
    Text(String),
}

/// A property backed by an attachment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryProperty<K: BinaryKind> {
    pub parameters: VCardParameters,
    pub group: Option<String>,
    value: Option<BinaryValue>,
    content_type: Option<K::Media>,
    kind: PhantomData<K>,
}

pub type Photo = BinaryProperty<PhotoKind>;
pub type Logo = BinaryProperty<LogoKind>;
pub type Sound = BinaryProperty<SoundKind>;
pub type Key = BinaryProperty<KeyKind>;

impl<K: BinaryKind> BinaryProperty<K> {
    /// Creates a property with no value.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parameters: VCardParameters::new(),
            group: None,
            value: None,
            content_type: None,
            kind: PhantomData,
        }
    }

    /// Creates a property pointing at a URL.
    #[must_use]
    pub fn from_url(url: impl Into<String>, content_type: Option<K::Media>) -> Self {
        let mut property = Self::new();
        property.set_url(url, content_type);
        property
    }

    /// Creates a property holding inline data.
    #[must_use]
    pub fn from_data(data: Vec<u8>, content_type: Option<K::Media>) -> Self {
        let mut property = Self::new();
        property.set_data(data, content_type);
        property
    }

    /// Points the property at a URL, discarding any inline content.
    pub fn set_url(&mut self, url: impl Into<String>, content_type: Option<K::Media>) {
        self.value = Some(BinaryValue::Reference(url.into()));
        self.content_type = content_type;
    }

    /// Stores inline data, discarding any reference or text.
    pub fn set_data(&mut self, data: Vec<u8>, content_type: Option<K::Media>) {
        self.value = Some(BinaryValue::Inline(data));
        self.content_type = content_type;
    }

    /// Returns the URL if the property holds a reference.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match &self.value {
            Some(BinaryValue::Reference(url)) => Some(url),
            _ => None,
        }
    }

    /// Returns the data if the property holds inline content.
    #[must_use]
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Some(BinaryValue::Inline(data)) => Some(data),
            _ => None,
        }
    }

    /// Returns the current value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&BinaryValue> {
        self.value.as_ref()
    }

    /// Returns whether no value has been set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&K::Media> {
        self.content_type.as_ref()
    }

    pub fn set_content_type(&mut self, content_type: Option<K::Media>) {
        self.content_type = content_type;
    }

    /// Scribe entry point; text is only accepted when the kind allows it.
    pub(crate) fn set_value(&mut self, value: BinaryValue, content_type: Option<K::Media>) {
        debug_assert!(K::ALLOWS_TEXT || !matches!(value, BinaryValue::Text(_)));
        self.value = Some(value);
        self.content_type = content_type;
    }

    fn validate_value(&self, version: VCardVersion, warnings: &mut Vec<ValidationWarning>) {
        match &self.value {
            None => warnings.push(ValidationWarning::new(WarningKind::NoValue, &[])),
            Some(BinaryValue::Reference(_)) if !rules::reference_supported(K::NAME, version) => {
                warnings.push(ValidationWarning::new(
                    WarningKind::ReferenceNotSupported,
                    &[K::NAME, version.as_str()],
                ));
            }
            Some(_) => {}
        }
    }
}

impl BinaryProperty<KeyKind> {
    /// Creates a key holding its plain-text form.
    #[must_use]
    pub fn from_text(text: impl Into<String>, content_type: Option<KeyType>) -> Self {
        let mut property = Self::new();
        property.set_text(text, content_type);
        property
    }

    /// Stores the key as plain text, discarding any reference or data.
    pub fn set_text(&mut self, text: impl Into<String>, content_type: Option<KeyType>) {
        self.value = Some(BinaryValue::Text(text.into()));
        self.content_type = content_type;
    }

    /// Returns the text if the key holds plain text.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(BinaryValue::Text(text)) => Some(text),
            _ => None,
        }
    }
}

impl<K: BinaryKind> VCardProperty for BinaryProperty<K> {
    fn parameters(&self) -> &VCardParameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut VCardParameters {
        &mut self.parameters
    }

    fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    fn set_group(&mut self, group: Option<String>) {
        self.group = group;
    }

    fn validate(&self, version: VCardVersion, _card: &VCard, warnings: &mut Vec<ValidationWarning>) {
        self.validate_value(version, warnings);
    }

    fn clone_box(&self) -> Box<dyn VCardProperty> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
