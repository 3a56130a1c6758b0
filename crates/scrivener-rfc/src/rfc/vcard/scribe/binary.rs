//! Binary-or-reference properties (PHOTO, LOGO, SOUND, KEY).
//!
//! The wire form depends heavily on the version:
//!
//! | value     | 2.1                     | 3.0                  | 4.0                 |
//! |-----------|-------------------------|----------------------|---------------------|
//! | reference | `VALUE=URL`, `TYPE=`    | `VALUE=uri`, `TYPE=` | `MEDIATYPE=`        |
//! | inline    | `ENCODING=BASE64;TYPE=` | `ENCODING=b;TYPE=`   | `data:` URI         |
//! | text      | `VALUE=text`            | `VALUE=text`         | `VALUE=text`        |

use std::marker::PhantomData;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{PropertyScribe, ScribeError, ScribeResult, WriteContext};
use crate::rfc::vcard::codec::{escape_text, unescape_text};
use crate::rfc::vcard::core::parameter::names as param;
use crate::rfc::vcard::core::{
    BinaryKind, BinaryProperty, BinaryValue, KeyKind, LogoKind, MediaType, PhotoKind, SoundKind,
    VCardDataType, VCardParameters, VCardVersion,
};
use crate::rfc::vcard::hcard::HCardElement;
use crate::rfc::vcard::jcard::JCardValue;
use crate::rfc::vcard::warning::{ParseContext, WarningKind};
use crate::rfc::vcard::xcard::XCardElement;

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug)]
pub struct BinaryScribe<K> {
    marker: PhantomData<fn() -> K>,
}

impl<K: BinaryKind> BinaryScribe<K> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<K: BinaryKind> Default for BinaryScribe<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryScribe<PhotoKind> {
    #[must_use]
    pub const fn photo() -> Self {
        Self::new()
    }
}

impl BinaryScribe<LogoKind> {
    #[must_use]
    pub const fn logo() -> Self {
        Self::new()
    }
}

impl BinaryScribe<SoundKind> {
    #[must_use]
    pub const fn sound() -> Self {
        Self::new()
    }
}

impl BinaryScribe<KeyKind> {
    #[must_use]
    pub const fn key() -> Self {
        Self::new()
    }
}

/// Builds a `data:` URI.
fn data_uri(media_type: Option<&str>, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        media_type.unwrap_or(OCTET_STREAM),
        STANDARD.encode(data)
    )
}

/// Splits a `data:` URI into its media type and decoded content.
fn parse_data_uri(uri: &str) -> Option<(Option<String>, Vec<u8>)> {
    let head = uri.get(..5)?;
    if !head.eq_ignore_ascii_case("data:") {
        return None;
    }
    let (meta, data) = uri[5..].split_once(',')?;
    let mut parts = meta.split(';');
    let media_type = parts
        .next()
        .filter(|mt| !mt.is_empty())
        .map(str::to_string);
    let bytes = if parts.any(|p| p.eq_ignore_ascii_case("base64")) {
        decode_base64(data).ok()?
    } else {
        data.as_bytes().to_vec()
    };
    Some((media_type, bytes))
}

fn decode_base64(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact)
}

fn is_data_uri(value: &str) -> bool {
    value
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case("data:"))
}

/// A scheme followed by a colon, e.g. `http:` or `urn:`.
fn looks_like_uri(value: &str) -> bool {
    value.split_once(':').is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

fn extension_of(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    let file = path.rsplit('/').next()?;
    file.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
}

impl<K: BinaryKind> BinaryScribe<K> {
    /// Reads the content type from the parameters, consuming them.
    fn take_content_type(parameters: &mut VCardParameters, version: VCardVersion) -> Option<K::Media> {
        if let Some(media_type) = parameters.remove_all(param::MEDIATYPE).into_iter().next() {
            return Some(K::Media::get(None, Some(&media_type), None));
        }
        if version == VCardVersion::V4_0 {
            return None;
        }
        let type_value = parameters.first(param::TYPE)?.to_string();
        parameters.remove_value(param::TYPE, &type_value);
        Some(K::Media::get(Some(&type_value), None, None))
    }

    /// Decides which branch a value belongs to. `value` is unescaped.
    fn interpret(
        value: &str,
        data_type: Option<&VCardDataType>,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<BinaryProperty<K>> {
        let encoding = parameters.remove_all(param::ENCODING).into_iter().next();
        let content_type = Self::take_content_type(parameters, ctx.version);
        let mut property = BinaryProperty::<K>::new();

        if is_data_uri(value) {
            if let Some((media_type, data)) = parse_data_uri(value) {
                let content_type = media_type
                    .map(|mt| K::Media::get(None, Some(&mt), None))
                    .or(content_type);
                property.set_value(BinaryValue::Inline(data), content_type);
                return Ok(property);
            }
            ctx.add_warning(WarningKind::InvalidDataUri, &[value]);
            property.set_value(BinaryValue::Reference(value.to_string()), content_type);
            return Ok(property);
        }

        if encoding
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case("b") || e.eq_ignore_ascii_case("base64"))
        {
            return match decode_base64(value) {
                Ok(data) => {
                    property.set_value(BinaryValue::Inline(data), content_type);
                    Ok(property)
                }
                Err(err) => {
                    let message = err.to_string();
                    ctx.add_warning(WarningKind::InvalidBase64, &[&message]);
                    Err(ScribeError::CannotParse(message))
                }
            };
        }

        let reference = match data_type {
            Some(VCardDataType::Text) if K::ALLOWS_TEXT => false,
            Some(VCardDataType::Uri | VCardDataType::Url | VCardDataType::ContentId) => true,
            _ => !K::ALLOWS_TEXT || looks_like_uri(value),
        };

        if reference {
            let content_type =
                content_type.or_else(|| extension_of(value).and_then(|ext| K::Media::find(None, None, Some(ext))));
            property.set_value(BinaryValue::Reference(value.to_string()), content_type);
        } else {
            property.set_value(BinaryValue::Text(value.to_string()), content_type);
        }
        Ok(property)
    }

    /// The value without text escaping.
    fn plain_value(property: &BinaryProperty<K>, version: VCardVersion) -> String {
        match property.value() {
            None => String::new(),
            Some(BinaryValue::Reference(url)) => url.clone(),
            Some(BinaryValue::Text(text)) => text.clone(),
            Some(BinaryValue::Inline(data)) => {
                if version == VCardVersion::V4_0 {
                    data_uri(property.content_type().and_then(MediaType::media_type), data)
                } else {
                    STANDARD.encode(data)
                }
            }
        }
    }

    fn put_content_type(
        property: &BinaryProperty<K>,
        parameters: &mut VCardParameters,
        version: VCardVersion,
    ) {
        let Some(content_type) = property.content_type() else {
            return;
        };
        if version == VCardVersion::V4_0 {
            if let Some(media_type) = content_type.media_type() {
                parameters.replace(param::MEDIATYPE, media_type);
            }
        } else {
            parameters.remove_all(param::MEDIATYPE);
            if let Some(value) = content_type.value() {
                parameters.replace(param::TYPE, value);
            }
        }
    }
}

impl<K: BinaryKind> PropertyScribe for BinaryScribe<K> {
    type Property = BinaryProperty<K>;

    fn name(&self) -> &str {
        K::NAME
    }

    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType> {
        match version {
            VCardVersion::V2_1 | VCardVersion::V3_0 => Some(VCardDataType::Binary),
            VCardVersion::V4_0 => Some(VCardDataType::Uri),
        }
    }

    fn data_type(&self, property: &BinaryProperty<K>, version: VCardVersion) -> Option<VCardDataType> {
        match (property.value(), version) {
            (Some(BinaryValue::Reference(_)), VCardVersion::V2_1) => Some(VCardDataType::Url),
            (Some(BinaryValue::Reference(_)), _) => Some(VCardDataType::Uri),
            (Some(BinaryValue::Text(_)), _) => Some(VCardDataType::Text),
            (Some(BinaryValue::Inline(_)) | None, VCardVersion::V4_0) => Some(VCardDataType::Uri),
            (Some(BinaryValue::Inline(_)) | None, _) => None,
        }
    }

    fn prepare_parameters(
        &self,
        property: &BinaryProperty<K>,
        parameters: &mut VCardParameters,
        version: VCardVersion,
    ) {
        match property.value() {
            None => {}
            Some(BinaryValue::Reference(_) | BinaryValue::Text(_)) => {
                parameters.remove_all(param::ENCODING);
                Self::put_content_type(property, parameters, version);
            }
            Some(BinaryValue::Inline(_)) => {
                match version {
                    VCardVersion::V2_1 => parameters.replace(param::ENCODING, "BASE64"),
                    VCardVersion::V3_0 => parameters.replace(param::ENCODING, "b"),
                    VCardVersion::V4_0 => {
                        parameters.remove_all(param::ENCODING);
                    }
                }
                if version == VCardVersion::V4_0 {
                    parameters.remove_all(param::MEDIATYPE);
                } else {
                    Self::put_content_type(property, parameters, version);
                }
            }
        }
    }

    fn write_text(&self, property: &BinaryProperty<K>, ctx: &WriteContext) -> String {
        match property.value() {
            Some(BinaryValue::Text(text)) => escape_text(text, ctx.version),
            _ => Self::plain_value(property, ctx.version),
        }
    }

    fn parse_text(
        &self,
        value: &str,
        data_type: Option<&VCardDataType>,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<BinaryProperty<K>> {
        Self::interpret(&unescape_text(value), data_type, parameters, ctx)
    }

    fn write_xml(&self, property: &BinaryProperty<K>, element: &mut XCardElement, ctx: &WriteContext) {
        let data_type = self.data_type(property, ctx.version);
        element.append(
            super::xml_type_name(data_type.as_ref()),
            &Self::plain_value(property, ctx.version),
        );
    }

    fn parse_xml(
        &self,
        element: &XCardElement,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<BinaryProperty<K>> {
        let (type_name, value) = element.first_value().ok_or_else(|| {
            ScribeError::CannotParse(format!("<{}> has no value", element.name()))
        })?;
        let data_type = VCardDataType::parse(&type_name);
        Self::interpret(&value, Some(&data_type), parameters, ctx)
    }

    fn write_json(&self, property: &BinaryProperty<K>, ctx: &WriteContext) -> JCardValue {
        JCardValue::single(Self::plain_value(property, ctx.version))
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        data_type: Option<&VCardDataType>,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<BinaryProperty<K>> {
        Self::interpret(&value.as_single(), data_type, parameters, ctx)
    }

    fn parse_html(
        &self,
        element: HCardElement<'_>,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<BinaryProperty<K>> {
        let source = match element.tag_name().as_str() {
            "img" | "audio" | "video" | "source" | "embed" => element.attr("src"),
            "object" => element.attr("data"),
            "a" | "link" => element.attr("href"),
            _ => None,
        };

        match source {
            Some(url) => {
                let data_type = (!is_data_uri(url)).then_some(VCardDataType::Uri);
                Self::interpret(url, data_type.as_ref(), parameters, ctx)
            }
            None => Self::interpret(&element.value(), None, parameters, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::{ImageType, Key, KeyType, Photo};
    use crate::rfc::vcard::normalize::DocumentContext;
    use crate::rfc::vcard::scribe::DynScribe;
    use crate::rfc::vcard::scribe::test_support::with_ctx;

    fn prepared(
        scribe: &dyn DynScribe,
        property: &dyn crate::rfc::vcard::core::VCardProperty,
        version: VCardVersion,
    ) -> VCardParameters {
        scribe
            .prepare_parameters(property, version, &DocumentContext::empty())
            .unwrap()
    }

    #[test]
    fn inline_encoding_per_version() {
        let scribe = BinaryScribe::photo();
        let photo = Photo::from_data(b"abc".to_vec(), Some(ImageType::JPEG));

        let v21 = prepared(&scribe, &photo, VCardVersion::V2_1);
        assert_eq!(v21.encoding(), Some("BASE64"));
        assert_eq!(v21.types(), vec!["JPEG"]);

        let v30 = prepared(&scribe, &photo, VCardVersion::V3_0);
        assert_eq!(v30.encoding(), Some("b"));

        let v40 = prepared(&scribe, &photo, VCardVersion::V4_0);
        assert!(v40.encoding().is_none());
        assert!(v40.media_type().is_none());

        let ctx = WriteContext::new(VCardVersion::V4_0);
        assert_eq!(
            PropertyScribe::write_text(&scribe, &photo, &ctx),
            "data:image/jpeg;base64,YWJj"
        );
        let ctx = WriteContext::new(VCardVersion::V3_0);
        assert_eq!(PropertyScribe::write_text(&scribe, &photo, &ctx), "YWJj");
    }

    #[test]
    fn reference_drops_encoding() {
        let scribe = BinaryScribe::photo();
        let mut photo = Photo::from_url("http://example.com/me.png", Some(ImageType::PNG));
        photo.parameters.put("ENCODING", "b");

        let v30 = prepared(&scribe, &photo, VCardVersion::V3_0);
        assert!(v30.encoding().is_none());
        assert_eq!(v30.types(), vec!["PNG"]);

        let v40 = prepared(&scribe, &photo, VCardVersion::V4_0);
        assert_eq!(v40.media_type(), Some("image/png"));

        assert_eq!(
            PropertyScribe::data_type(&scribe, &photo, VCardVersion::V2_1),
            Some(VCardDataType::Url)
        );
        assert_eq!(
            PropertyScribe::data_type(&scribe, &photo, VCardVersion::V3_0),
            Some(VCardDataType::Uri)
        );
    }

    #[test]
    fn parse_base64_with_type() {
        let scribe = BinaryScribe::photo();
        let mut parameters = VCardParameters::new();
        parameters.put("ENCODING", "b");
        parameters.put("TYPE", "JPEG");

        let (parsed, warnings) = with_ctx(VCardVersion::V3_0, |ctx| {
            PropertyScribe::parse_text(&scribe, "YWJj", None, &mut parameters, ctx)
        });
        let photo = parsed.unwrap();
        assert_eq!(photo.data(), Some(&b"abc"[..]));
        assert_eq!(photo.content_type(), Some(&ImageType::JPEG));
        assert!(parameters.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn parse_data_uri_in_v4() {
        let scribe = BinaryScribe::key();
        let (parsed, _) = with_ctx(VCardVersion::V4_0, |ctx| {
            PropertyScribe::parse_text(
                &scribe,
                "data:application/pgp-keys;base64,YWJj",
                None,
                &mut VCardParameters::new(),
                ctx,
            )
        });
        let key = parsed.unwrap();
        assert_eq!(key.data(), Some(&b"abc"[..]));
        assert_eq!(key.content_type(), Some(&KeyType::PGP));
    }

    #[test]
    fn bad_base64_is_declined() {
        let scribe = BinaryScribe::photo();
        let mut parameters = VCardParameters::new();
        parameters.put("ENCODING", "BASE64");

        let (parsed, warnings) = with_ctx(VCardVersion::V2_1, |ctx| {
            PropertyScribe::parse_text(&scribe, "!!not base64!!", None, &mut parameters, ctx)
        });
        assert!(matches!(parsed, Err(ScribeError::CannotParse(_))));
        assert_eq!(warnings[0].code, WarningKind::InvalidBase64.code());
    }

    #[test]
    fn key_text_and_url() {
        let scribe = BinaryScribe::key();

        let (text, _) = with_ctx(VCardVersion::V3_0, |ctx| {
            PropertyScribe::parse_text(
                &scribe,
                "-----BEGIN PGP PUBLIC KEY BLOCK-----",
                None,
                &mut VCardParameters::new(),
                ctx,
            )
        });
        assert_eq!(text.unwrap().text(), Some("-----BEGIN PGP PUBLIC KEY BLOCK-----"));

        let (url, _) = with_ctx(VCardVersion::V4_0, |ctx| {
            PropertyScribe::parse_text(
                &scribe,
                "http://example.com/key.pgp",
                Some(&VCardDataType::Uri),
                &mut VCardParameters::new(),
                ctx,
            )
        });
        let url = url.unwrap();
        assert_eq!(url.url(), Some("http://example.com/key.pgp"));
        assert_eq!(url.content_type(), Some(&KeyType::PGP));

        let key = Key::from_text("abc", None);
        assert_eq!(
            PropertyScribe::data_type(&scribe, &key, VCardVersion::V4_0),
            Some(VCardDataType::Text)
        );
    }

    #[test]
    fn html_image_source() {
        let root = crate::rfc::vcard::xcard::XmlElement::parse(
            "<img class=\"photo\" src=\"http://example.com/me.gif\" alt=\"me\"/>",
        )
        .unwrap();
        let (parsed, _) = with_ctx(VCardVersion::V3_0, |ctx| {
            PropertyScribe::parse_html(
                &BinaryScribe::<PhotoKind>::photo(),
                HCardElement::new(&root),
                &mut VCardParameters::new(),
                ctx,
            )
        });
        let photo = parsed.unwrap();
        assert_eq!(photo.url(), Some("http://example.com/me.gif"));
        assert_eq!(photo.content_type(), Some(&ImageType::GIF));
    }

    #[test]
    fn uri_detection() {
        assert!(looks_like_uri("http://example.com"));
        assert!(looks_like_uri("urn:uuid:123"));
        assert!(!looks_like_uri("-----BEGIN PGP"));
        assert!(!looks_like_uri("no colon"));
        assert_eq!(extension_of("http://x.com/a/key.pgp?x=1"), Some("pgp"));
    }
}
