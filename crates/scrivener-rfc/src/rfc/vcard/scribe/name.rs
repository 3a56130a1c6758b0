//! N.

use super::{PropertyScribe, ScribeResult, WriteContext};
use crate::rfc::vcard::codec::{StructuredIterator, decode, encode};
use crate::rfc::vcard::core::property::names;
use crate::rfc::vcard::core::{StructuredName, VCardDataType, VCardParameters, VCardVersion};
use crate::rfc::vcard::hcard::HCardElement;
use crate::rfc::vcard::jcard::JCardValue;
use crate::rfc::vcard::warning::ParseContext;
use crate::rfc::vcard::xcard::XCardElement;

const FIELDS: [(&str, &str); 5] = [
    ("surname", "family-name"),
    ("given", "given-name"),
    ("additional", "additional-name"),
    ("prefix", "honorific-prefix"),
    ("suffix", "honorific-suffix"),
];

#[derive(Debug, Default)]
pub struct StructuredNameScribe;

fn from_components(mut it: StructuredIterator<'_>) -> StructuredName {
    StructuredName {
        family: it.next_component(),
        given: it.next_component(),
        additional: it.next_component(),
        prefixes: it.next_component(),
        suffixes: it.next_component(),
        ..StructuredName::default()
    }
}

fn fields_mut(name: &mut StructuredName) -> [&mut Vec<String>; 5] {
    [
        &mut name.family,
        &mut name.given,
        &mut name.additional,
        &mut name.prefixes,
        &mut name.suffixes,
    ]
}

impl PropertyScribe for StructuredNameScribe {
    type Property = StructuredName;

    fn name(&self) -> &str {
        names::N
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, property: &StructuredName, ctx: &WriteContext) -> String {
        encode(&property.components(), ctx.include_trailing_semicolons)
    }

    fn parse_text(
        &self,
        value: &str,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<StructuredName> {
        Ok(from_components(decode(value)))
    }

    fn write_xml(&self, property: &StructuredName, element: &mut XCardElement, _ctx: &WriteContext) {
        for ((name, _), values) in FIELDS.iter().zip(property.components()) {
            element.append_all(name, values);
        }
    }

    fn parse_xml(
        &self,
        element: &XCardElement,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<StructuredName> {
        let mut name = StructuredName::default();
        for ((child, _), field) in FIELDS.iter().zip(fields_mut(&mut name)) {
            *field = element.all(child);
        }
        Ok(name)
    }

    fn write_json(&self, property: &StructuredName, _ctx: &WriteContext) -> JCardValue {
        JCardValue::structured(&property.components())
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<StructuredName> {
        Ok(from_components(StructuredIterator::from_components(
            value.as_structured(),
        )))
    }

    fn parse_html(
        &self,
        element: HCardElement<'_>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<StructuredName> {
        let mut name = StructuredName::default();
        for ((_, class), field) in FIELDS.iter().zip(fields_mut(&mut name)) {
            *field = element.all_values(class);
        }
        Ok(name)
    }
}
