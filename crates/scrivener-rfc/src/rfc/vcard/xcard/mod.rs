//! xCard (RFC 6351): vCard 4.0 as XML.
//!
//! ```xml
//! <vcards xmlns="urn:ietf:params:xml:ns:vcard-4.0">
//!   <vcard>
//!     <fn><text>John Doe</text></fn>
//!     <group name="item1">
//!       <email>
//!         <parameters><type><text>work</text></type></parameters>
//!         <text>john@example.com</text>
//!       </email>
//!     </group>
//!   </vcard>
//! </vcards>
//! ```

pub mod element;
pub mod tree;

pub use element::XCardElement;
pub use tree::{XmlElement, XmlNode};

use std::collections::HashMap;

use crate::error::RfcResult;
use crate::rfc::vcard::core::parameter::names as param;
use crate::rfc::vcard::core::version::XCARD_NS;
use crate::rfc::vcard::core::{VCard, VCardParameters, VCardVersion};
use crate::rfc::vcard::normalize::DocumentContext;
use crate::rfc::vcard::scribe::{RawPropertyUnit, RawValue, ScribeIndex, WriteContext};
use crate::rfc::vcard::warning::{ParseContext, ParseWarning, WarningKind};

const PARAMETERS: &str = "parameters";
const GROUP: &str = "group";

/// Value element used for a parameter in `<parameters>`.
fn parameter_type(name: &str) -> &'static str {
    if name.eq_ignore_ascii_case(param::PREF) {
        "integer"
    } else {
        "text"
    }
}

/// Builds the `<parameters>` element. `VALUE` is left out; xCard states
/// the data type through the value element instead.
#[must_use]
pub fn write_parameters(parameters: &VCardParameters) -> Option<XmlElement> {
    let mut element = XmlElement::in_namespace(XCARD_NS, PARAMETERS);

    for parameter in parameters {
        if parameter.name.eq_ignore_ascii_case(param::VALUE) {
            continue;
        }
        let child = element.push_element(XmlElement::in_namespace(
            XCARD_NS,
            parameter.name.to_ascii_lowercase(),
        ));
        let value_type = parameter_type(&parameter.name);
        for value in &parameter.values {
            child
                .push_element(XmlElement::in_namespace(XCARD_NS, value_type))
                .push_text(value);
        }
    }

    let has_parameters = element.elements().next().is_some();
    has_parameters.then_some(element)
}

/// Reads a `<parameters>` element. Each child is a parameter; its values
/// are the texts of its value elements, or its own text when it has none.
#[must_use]
pub fn read_parameters(element: &XmlElement) -> VCardParameters {
    let mut parameters = VCardParameters::new();

    for child in element.elements() {
        let name = child.name.to_ascii_uppercase();
        let mut values = child.elements().map(XmlElement::text).peekable();
        if values.peek().is_some() {
            parameters.put_all(&name, values);
        } else {
            parameters.put(&name, child.text());
        }
    }

    parameters
}

fn is_xcard(element: &XmlElement) -> bool {
    element.namespace.as_deref().is_none_or(|ns| ns == XCARD_NS)
}

/// Writes cards as an xCard document. xCard only exists for 4.0, so the
/// version in `ctx` is ignored.
///
/// ## Errors
/// [`RfcError::UnregisteredProperty`](crate::error::RfcError::UnregisteredProperty)
/// if a card holds a property type without a scribe, checked before
/// anything is written; [`RfcError::Xml`](crate::error::RfcError::Xml) if
/// serialization fails.
#[tracing::instrument(skip(cards, index, ctx), fields(cards = cards.len()))]
pub fn write_xcard(cards: &[VCard], index: &ScribeIndex, ctx: &WriteContext) -> RfcResult<String> {
    for card in cards {
        index.check_document(card)?;
    }

    let ctx = WriteContext {
        version: VCardVersion::V4_0,
        ..*ctx
    };
    let mut root = XmlElement::in_namespace(XCARD_NS, "vcards");

    for card in cards {
        let doc = DocumentContext::new(card);
        let vcard = root.push_element(XmlElement::in_namespace(XCARD_NS, "vcard"));
        let mut groups: HashMap<String, usize> = HashMap::new();

        for property in card.properties() {
            let property = property.as_ref();
            let scribe = index.by_property(property)?;
            let prepared = index.prepare(property, ctx.version, &doc)?;
            if !ctx.writes(&prepared.name) {
                tracing::debug!(name = %prepared.name, "Dropping property the version does not define");
                continue;
            }

            let mut element = XCardElement::new(&prepared.name);
            scribe.write_xml(property, &mut element, &ctx)?;
            let mut element = element.into_element();
            if let Some(parameters) = write_parameters(&prepared.parameters) {
                element.children.insert(0, XmlNode::Element(parameters));
            }

            match &prepared.group {
                None => {
                    vcard.push_element(element);
                }
                Some(group) => {
                    let position = *groups.entry(group.clone()).or_insert_with(|| {
                        let mut wrapper = XmlElement::in_namespace(XCARD_NS, GROUP);
                        wrapper.set_attr("name", group);
                        vcard.children.push(XmlNode::Element(wrapper));
                        vcard.children.len() - 1
                    });
                    if let XmlNode::Element(wrapper) = &mut vcard.children[position] {
                        wrapper.push_element(element);
                    }
                }
            }
        }
    }

    root.to_xml()
}

/// Reads every `<vcard>` in an xCard document.
///
/// ## Errors
/// [`RfcError::Xml`](crate::error::RfcError::Xml) if the input is not
/// well-formed XML. Problems with individual properties become warnings.
#[tracing::instrument(skip(xml, index, warnings), fields(xml_len = xml.len()))]
pub fn read_xcard(
    xml: &str,
    index: &ScribeIndex,
    warnings: &mut Vec<ParseWarning>,
) -> RfcResult<Vec<VCard>> {
    let root = XmlElement::parse(xml)?;
    let vcards: Vec<&XmlElement> = if root.name == "vcard" {
        vec![&root]
    } else {
        root.elements_named("vcard").collect()
    };

    let mut cards = Vec::with_capacity(vcards.len());
    for vcard in vcards {
        let mut card = VCard::with_version(VCardVersion::V4_0);

        for child in vcard.elements().filter(|e| is_xcard(e)) {
            if child.name == GROUP {
                let group = child.attr("name").map(str::to_string);
                for property in child.elements().filter(|e| is_xcard(e)) {
                    read_property(property, group.clone(), index, &mut card, warnings);
                }
            } else {
                read_property(child, None, index, &mut card, warnings);
            }
        }

        cards.push(card);
    }

    tracing::debug!(cards = cards.len(), "Read xCard document");
    Ok(cards)
}

fn read_property(
    element: &XmlElement,
    group: Option<String>,
    index: &ScribeIndex,
    card: &mut VCard,
    warnings: &mut Vec<ParseWarning>,
) {
    let parameters = element
        .first_element(PARAMETERS)
        .map(read_parameters)
        .unwrap_or_default();
    let wrapped = XCardElement::wrap(element.clone());

    if wrapped.first_value().is_none() {
        let mut ctx = ParseContext::new(VCardVersion::V4_0, warnings);
        ctx.property_name = Some(element.name.to_ascii_uppercase());
        ctx.add_warning(WarningKind::MissingXmlValue, &["value"]);
    }

    let unit = RawPropertyUnit {
        group,
        parameters,
        ..RawPropertyUnit::new(
            element.name.to_ascii_uppercase(),
            RawValue::Xml(&wrapped),
            VCardVersion::V4_0,
        )
    };
    if let Some(property) = index.unmarshal(unit, warnings) {
        card.add_boxed(property);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::{Email, FormattedName, RawProperty, StructuredName};

    #[test_log::test]
    fn parameters_round_trip() {
        let mut parameters = VCardParameters::new();
        parameters.add_type("work");
        parameters.add_type("voice");
        parameters.set_pref(Some(1));
        parameters.put("VALUE", "uri");

        let element = write_parameters(&parameters).unwrap();
        let xml = element.to_xml().unwrap();
        assert!(xml.contains("<pref><integer>1</integer></pref>"));
        assert!(!xml.contains("value"));

        let read = read_parameters(&element);
        assert_eq!(read.values("TYPE"), vec!["work", "voice"]);
        assert_eq!(read.pref(), Some(1));
        assert!(!read.contains("VALUE"));

        assert!(write_parameters(&VCardParameters::new()).is_none());
    }

    #[test_log::test]
    fn document_round_trip_with_groups() {
        let mut card = VCard::new();
        card.add_property(FormattedName::new("John Doe"));
        card.add_property(StructuredName::simple("Doe", "John"));
        let mut email = Email::new("john@example.com");
        email.group = Some("item1".to_string());
        email.parameters.add_type("work");
        card.add_property(email.clone());
        card.add_property(RawProperty {
            group: Some("item1".to_string()),
            ..RawProperty::new("X-ABLABEL", "Office")
        });

        let index = ScribeIndex::standard();
        let xml = write_xcard(
            std::slice::from_ref(&card),
            &index,
            &WriteContext::new(VCardVersion::V3_0),
        )
        .unwrap();
        assert!(xml.starts_with("<vcards xmlns=\"urn:ietf:params:xml:ns:vcard-4.0\">"));
        assert_eq!(xml.matches("<group name=\"item1\">").count(), 1);

        let mut warnings = Vec::new();
        let cards = read_xcard(&xml, &index, &mut warnings).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");

        let read = &cards[0];
        assert_eq!(read.len(), 4);
        assert_eq!(read.property::<Email>(), Some(&email));
        assert_eq!(
            read.property::<StructuredName>(),
            Some(&StructuredName::simple("Doe", "John"))
        );
        let raw = read.property::<RawProperty>().unwrap();
        assert_eq!(raw.name, "X-ABLABEL");
        assert_eq!(raw.value, "Office");
        assert_eq!(raw.group.as_deref(), Some("item1"));
    }

    #[test_log::test]
    fn unknown_property_keeps_every_value_element() {
        let xml = "<vcards xmlns=\"urn:ietf:params:xml:ns:vcard-4.0\"><vcard>\
            <x-foo><text>a</text><text>b,c</text></x-foo></vcard></vcards>";
        let index = ScribeIndex::standard();
        let mut warnings = Vec::new();
        let cards = read_xcard(xml, &index, &mut warnings).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");

        let written = write_xcard(&cards, &index, &WriteContext::new(VCardVersion::V4_0)).unwrap();
        assert!(
            written.contains("<x-foo><text>a</text><text>b,c</text></x-foo>"),
            "{written}"
        );
    }

    #[test_log::test]
    fn property_without_value_is_kept_with_warning() {
        let xml = "<vcard xmlns=\"urn:ietf:params:xml:ns:vcard-4.0\"><note/><fn><text>A</text></fn></vcard>";
        let mut warnings = Vec::new();
        let cards = read_xcard(xml, &ScribeIndex::standard(), &mut warnings).unwrap();

        assert_eq!(cards[0].len(), 1);
        let codes: Vec<u16> = warnings.iter().map(|w| w.code).collect();
        assert!(codes.contains(&WarningKind::MissingXmlValue.code()));
        assert!(codes.contains(&WarningKind::Unparseable.code()));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let mut warnings = Vec::new();
        assert!(read_xcard("<vcards><vcard>", &ScribeIndex::standard(), &mut warnings).is_err());
    }
}
