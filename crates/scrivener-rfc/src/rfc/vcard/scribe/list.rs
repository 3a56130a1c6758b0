//! Comma-list properties (CATEGORIES, NICKNAME).

use std::marker::PhantomData;

use super::{PropertyScribe, ScribeResult, WriteContext};
use crate::rfc::vcard::codec::{decode_list, encode_list};
use crate::rfc::vcard::core::property::names;
use crate::rfc::vcard::core::{
    Categories, ListProperty, Nickname, VCardDataType, VCardParameters, VCardVersion,
};
use crate::rfc::vcard::hcard::HCardElement;
use crate::rfc::vcard::jcard::JCardValue;
use crate::rfc::vcard::warning::ParseContext;
use crate::rfc::vcard::xcard::XCardElement;

/// Scribe for any [`ListProperty`].
#[derive(Debug)]
pub struct ListScribe<P> {
    name: &'static str,
    /// hCard class of one list item, when items are marked up separately.
    html_item_class: Option<&'static str>,
    marker: PhantomData<fn() -> P>,
}

impl<P: ListProperty> ListScribe<P> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            html_item_class: None,
            marker: PhantomData,
        }
    }

    fn build(values: Vec<String>) -> P {
        let mut property = P::default();
        *property.values_mut() = values;
        property
    }
}

impl ListScribe<Categories> {
    #[must_use]
    pub const fn categories() -> Self {
        Self {
            html_item_class: Some("category"),
            ..Self::new(names::CATEGORIES)
        }
    }
}

impl ListScribe<Nickname> {
    #[must_use]
    pub const fn nickname() -> Self {
        Self::new(names::NICKNAME)
    }
}

impl<P: ListProperty> PropertyScribe for ListScribe<P> {
    type Property = P;

    fn name(&self) -> &str {
        self.name
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, property: &P, _ctx: &WriteContext) -> String {
        encode_list(property.values())
    }

    fn parse_text(
        &self,
        value: &str,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<P> {
        Ok(Self::build(decode_list(value)))
    }

    fn write_xml(&self, property: &P, element: &mut XCardElement, _ctx: &WriteContext) {
        element.append_all("text", property.values());
    }

    fn parse_xml(
        &self,
        element: &XCardElement,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<P> {
        Ok(Self::build(element.all("text")))
    }

    fn write_json(&self, property: &P, _ctx: &WriteContext) -> JCardValue {
        if property.values().is_empty() {
            return JCardValue::single("");
        }
        JCardValue::multi(property.values())
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<P> {
        let values = value
            .as_multi()
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect();
        Ok(Self::build(values))
    }

    fn parse_html(
        &self,
        element: HCardElement<'_>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<P> {
        let values = self
            .html_item_class
            .map(|class| element.all_values(class))
            .filter(|values| !values.is_empty())
            .unwrap_or_else(|| decode_list(&element.value()));
        Ok(Self::build(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::scribe::test_support::with_ctx;

    #[test]
    fn write_and_parse_text() {
        let scribe = ListScribe::categories();
        let cats = Categories::new(["work", "a,b"]);
        let text = scribe.write_text(&cats, &WriteContext::new(VCardVersion::V4_0));
        assert_eq!(text, "work,a\\,b");

        let (parsed, _) = with_ctx(VCardVersion::V4_0, |ctx| {
            scribe.parse_text(&text, None, &mut VCardParameters::new(), ctx)
        });
        assert_eq!(parsed.unwrap(), cats);
    }

    #[test]
    fn xml_round_trip_and_empty_list() {
        let scribe = ListScribe::nickname();
        let ctx = WriteContext::new(VCardVersion::V4_0);

        let mut element = XCardElement::new("nickname");
        scribe.write_xml(&Nickname::new(["Jim", "Jimmie"]), &mut element, &ctx);
        assert_eq!(element.all("text"), vec!["Jim", "Jimmie"]);

        let mut empty = XCardElement::new("nickname");
        scribe.write_xml(&Nickname::default(), &mut empty, &ctx);
        assert_eq!(empty.element().children.len(), 1);

        let (parsed, _) = with_ctx(VCardVersion::V4_0, |pctx| {
            scribe.parse_xml(&empty, &mut VCardParameters::new(), pctx)
        });
        assert!(parsed.unwrap().values.is_empty());
    }

    #[test]
    fn json_values_are_separate_slots() {
        let scribe = ListScribe::categories();
        let value = scribe.write_json(
            &Categories::new(["a", "b"]),
            &WriteContext::new(VCardVersion::V4_0),
        );
        assert_eq!(value.values().len(), 2);
    }
}
