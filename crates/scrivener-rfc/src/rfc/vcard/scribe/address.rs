//! ADR.

use super::{PropertyScribe, ScribeResult, WriteContext};
use crate::rfc::vcard::codec::{StructuredIterator, decode, encode};
use crate::rfc::vcard::core::parameter::names as param;
use crate::rfc::vcard::core::property::names;
use crate::rfc::vcard::core::{Address, VCardDataType, VCardParameters, VCardVersion};
use crate::rfc::vcard::hcard::HCardElement;
use crate::rfc::vcard::jcard::JCardValue;
use crate::rfc::vcard::warning::ParseContext;
use crate::rfc::vcard::xcard::XCardElement;

/// xCard element and hCard class of each component, in wire order.
const FIELDS: [(&str, &str); 7] = [
    ("pobox", "post-office-box"),
    ("ext", "extended-address"),
    ("street", "street-address"),
    ("locality", "locality"),
    ("region", "region"),
    ("code", "postal-code"),
    ("country", "country-name"),
];

#[derive(Debug, Default)]
pub struct AddressScribe;

fn from_components(mut it: StructuredIterator<'_>) -> Address {
    Address {
        po_box: it.next_component(),
        extended: it.next_component(),
        street: it.next_component(),
        locality: it.next_component(),
        region: it.next_component(),
        postal_code: it.next_component(),
        country: it.next_component(),
        ..Address::default()
    }
}

fn fields_mut(address: &mut Address) -> [&mut Vec<String>; 7] {
    [
        &mut address.po_box,
        &mut address.extended,
        &mut address.street,
        &mut address.locality,
        &mut address.region,
        &mut address.postal_code,
        &mut address.country,
    ]
}

impl PropertyScribe for AddressScribe {
    type Property = Address;

    fn name(&self) -> &str {
        names::ADR
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn prefers(&self) -> bool {
        true
    }

    fn write_text(&self, property: &Address, ctx: &WriteContext) -> String {
        encode(&property.components(), ctx.include_trailing_semicolons)
    }

    fn parse_text(
        &self,
        value: &str,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Address> {
        Ok(from_components(decode(value)))
    }

    fn write_xml(&self, property: &Address, element: &mut XCardElement, _ctx: &WriteContext) {
        for ((name, _), values) in FIELDS.iter().zip(property.components()) {
            element.append_all(name, values);
        }
    }

    fn parse_xml(
        &self,
        element: &XCardElement,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Address> {
        let mut address = Address::default();
        for ((name, _), field) in FIELDS.iter().zip(fields_mut(&mut address)) {
            *field = element.all(name);
        }
        Ok(address)
    }

    fn write_json(&self, property: &Address, _ctx: &WriteContext) -> JCardValue {
        JCardValue::structured(&property.components())
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Address> {
        Ok(from_components(StructuredIterator::from_components(
            value.as_structured(),
        )))
    }

    fn parse_html(
        &self,
        element: HCardElement<'_>,
        parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Address> {
        let mut address = Address::default();
        for ((_, class), field) in FIELDS.iter().zip(fields_mut(&mut address)) {
            *field = element.all_values(class);
        }
        parameters.put_all(param::TYPE, element.types());
        Ok(address)
    }
}
