//! Catch-all for properties no scribe claims.

use serde_json::Value;

use super::{PropertyScribe, ScribeError, ScribeResult, WriteContext, xml_type_name};
use crate::rfc::vcard::codec::{decode, encode, escape_text, find_unescaped, split_component, unescape_text};
use crate::rfc::vcard::core::{RawProperty, VCardDataType, VCardParameters, VCardVersion};
use crate::rfc::vcard::hcard::HCardElement;
use crate::rfc::vcard::jcard::JCardValue;
use crate::rfc::vcard::warning::ParseContext;
use crate::rfc::vcard::xcard::XCardElement;

/// Shape of a raw value in content-line form. Unescaped `;` separates
/// components and unescaped `,` separates values.
enum Shape {
    Single(String),
    Multi(Vec<String>),
    Structured(Vec<Vec<String>>),
}

impl Shape {
    fn of(value: &str) -> Self {
        if find_unescaped(value, ';').is_some() {
            Self::Structured(decode(value).collect())
        } else if find_unescaped(value, ',').is_some() {
            Self::Multi(split_component(value))
        } else {
            Self::Single(unescape_text(value))
        }
    }
}

/// Joins values into one component, escaping the delimiters.
fn join_values(values: Vec<String>) -> String {
    encode(&[values], true)
}

/// Keeps a property verbatim. Text values pass through untouched, so a
/// property read and written in the same syntax comes out byte for byte.
#[derive(Debug, Clone, Default)]
pub struct RawScribe {
    name: String,
}

impl RawScribe {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn build(&self, value: String, data_type: Option<&VCardDataType>) -> RawProperty {
        RawProperty {
            data_type: data_type.cloned(),
            ..RawProperty::new(self.name.clone(), value)
        }
    }
}

impl PropertyScribe for RawScribe {
    type Property = RawProperty;

    fn name(&self) -> &str {
        &self.name
    }

    fn property_name(&self, property: &RawProperty) -> String {
        property.name.clone()
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        None
    }

    fn data_type(&self, property: &RawProperty, _version: VCardVersion) -> Option<VCardDataType> {
        property.data_type.clone()
    }

    fn write_text(&self, property: &RawProperty, _ctx: &WriteContext) -> String {
        property.value.clone()
    }

    fn parse_text(
        &self,
        value: &str,
        data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<RawProperty> {
        Ok(self.build(value.to_string(), data_type))
    }

    /// Several value children are kept as a comma-joined list.
    fn parse_xml(
        &self,
        element: &XCardElement,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<RawProperty> {
        let values = element.values();
        let Some((type_name, _)) = values.first() else {
            return Err(ScribeError::CannotParse(format!("<{}> has no value", element.name())));
        };
        let data_type = (type_name != "unknown").then(|| VCardDataType::parse(type_name));
        let value = join_values(values.into_iter().map(|(_, text)| text).collect());
        Ok(self.build(value, data_type.as_ref()))
    }

    fn write_xml(&self, property: &RawProperty, element: &mut XCardElement, _ctx: &WriteContext) {
        let name = xml_type_name(property.data_type.as_ref());
        match Shape::of(&property.value) {
            Shape::Multi(values) => element.append_all(name, &values),
            Shape::Single(_) | Shape::Structured(_) => {
                element.append(name, &unescape_text(&property.value));
            }
        }
    }

    /// A single array slot is a structured value; several slots are a list.
    fn parse_json(
        &self,
        value: &JCardValue,
        data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<RawProperty> {
        let text = match value.values() {
            [Value::Array(_)] => encode(&value.as_structured(), true),
            _ => join_values(value.as_multi()),
        };
        Ok(self.build(text, data_type))
    }

    fn write_json(&self, property: &RawProperty, _ctx: &WriteContext) -> JCardValue {
        match Shape::of(&property.value) {
            Shape::Single(value) => JCardValue::single(value),
            Shape::Multi(values) => JCardValue::multi(&values),
            Shape::Structured(components) => JCardValue::structured(&components),
        }
    }

    fn parse_html(
        &self,
        element: HCardElement<'_>,
        _parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<RawProperty> {
        Ok(self.build(escape_text(&element.value(), ctx.version), None))
    }
}
