//! Single-text properties (FN, NOTE, TITLE, ROLE, EMAIL, LABEL).

use std::marker::PhantomData;

use super::{PropertyScribe, ScribeError, ScribeResult, WriteContext};
use crate::rfc::vcard::codec::{escape_text, unescape_text};
use crate::rfc::vcard::core::property::names;
use crate::rfc::vcard::core::{
    Email, FormattedName, Label, Note, Role, TextProperty, Title, VCardDataType, VCardParameters,
    VCardVersion,
};
use crate::rfc::vcard::hcard::HCardElement;
use crate::rfc::vcard::jcard::JCardValue;
use crate::rfc::vcard::warning::ParseContext;
use crate::rfc::vcard::xcard::XCardElement;

/// Scribe for any [`TextProperty`].
#[derive(Debug)]
pub struct TextScribe<P> {
    name: &'static str,
    pref_aware: bool,
    /// In hCard, an `<a>` whose href starts with this prefix carries the value.
    href_prefix: Option<&'static str>,
    marker: PhantomData<fn() -> P>,
}

impl<P: TextProperty> TextScribe<P> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            pref_aware: false,
            href_prefix: None,
            marker: PhantomData,
        }
    }

    /// Marks the property as taking part in PREF handling.
    #[must_use]
    pub const fn pref_aware(mut self) -> Self {
        self.pref_aware = true;
        self
    }

    #[must_use]
    pub const fn with_href_prefix(mut self, prefix: &'static str) -> Self {
        self.href_prefix = Some(prefix);
        self
    }

    fn build(value: String) -> P {
        let mut property = P::default();
        property.set_value(Some(value));
        property
    }
}

impl TextScribe<FormattedName> {
    #[must_use]
    pub const fn formatted_name() -> Self {
        Self::new(names::FN)
    }
}

impl TextScribe<Note> {
    #[must_use]
    pub const fn note() -> Self {
        Self::new(names::NOTE)
    }
}

impl TextScribe<Title> {
    #[must_use]
    pub const fn title() -> Self {
        Self::new(names::TITLE)
    }
}

impl TextScribe<Role> {
    #[must_use]
    pub const fn role() -> Self {
        Self::new(names::ROLE)
    }
}

impl TextScribe<Email> {
    #[must_use]
    pub const fn email() -> Self {
        Self::new(names::EMAIL)
            .pref_aware()
            .with_href_prefix("mailto:")
    }
}

impl TextScribe<Label> {
    #[must_use]
    pub const fn label() -> Self {
        Self::new(names::LABEL)
    }
}

impl<P: TextProperty> PropertyScribe for TextScribe<P> {
    type Property = P;

    fn name(&self) -> &str {
        self.name
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn prefers(&self) -> bool {
        self.pref_aware
    }

    fn write_text(&self, property: &P, ctx: &WriteContext) -> String {
        escape_text(property.value().unwrap_or_default(), ctx.version)
    }

    fn parse_text(
        &self,
        value: &str,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<P> {
        Ok(Self::build(unescape_text(value)))
    }

    fn write_xml(&self, property: &P, element: &mut XCardElement, _ctx: &WriteContext) {
        element.append("text", property.value().unwrap_or_default());
    }

    fn parse_xml(
        &self,
        element: &XCardElement,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<P> {
        element
            .first("text")
            .map(Self::build)
            .ok_or_else(|| ScribeError::CannotParse(format!("<{}> has no <text>", element.name())))
    }

    fn write_json(&self, property: &P, _ctx: &WriteContext) -> JCardValue {
        JCardValue::single(property.value().unwrap_or_default())
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<P> {
        Ok(Self::build(value.as_single()))
    }

    fn parse_html(
        &self,
        element: HCardElement<'_>,
        parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<P> {
        let from_href = self.href_prefix.and_then(|prefix| {
            let href = element.attr("href").filter(|_| element.tag_name() == "a")?;
            let head = href.get(..prefix.len())?;
            head.eq_ignore_ascii_case(prefix)
                .then(|| strip_query(&href[prefix.len()..]).to_string())
        });

        parameters.put_all(
            crate::rfc::vcard::core::parameter::names::TYPE,
            element.types(),
        );
        Ok(Self::build(from_href.unwrap_or_else(|| element.value())))
    }
}

/// Drops a `?subject=...` style suffix from a mailto address.
fn strip_query(address: &str) -> &str {
    address.split_once('?').map_or(address, |(head, _)| head)
}
