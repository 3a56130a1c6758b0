//! hCard: vCard properties embedded in HTML through class names.
//!
//! Reading only. The page must be well-formed (XHTML); every element
//! classed `vcard` becomes one card, and every descendant whose class names
//! a registered property becomes one property of it.

pub mod element;

pub use element::HCardElement;

use crate::error::RfcResult;
use crate::rfc::vcard::core::property::names;
use crate::rfc::vcard::core::{VCard, VCardVersion};
use crate::rfc::vcard::scribe::{RawPropertyUnit, RawValue, ScribeIndex};
use crate::rfc::vcard::warning::ParseWarning;
use crate::rfc::vcard::xcard::XmlElement;

use element::classes;

const VCARD_CLASS: &str = "vcard";

/// hCard class names that differ from the property name.
fn property_name(class: &str) -> String {
    if class.eq_ignore_ascii_case("category") {
        names::CATEGORIES.to_string()
    } else {
        class.to_ascii_uppercase()
    }
}

fn is_vcard(element: &XmlElement) -> bool {
    classes(element).any(|c| c.eq_ignore_ascii_case(VCARD_CLASS))
}

/// Elements classed `vcard`, outermost first.
fn find_vcards(root: &XmlElement) -> Vec<&XmlElement> {
    let mut found = Vec::new();
    if is_vcard(root) {
        found.push(root);
    }
    found.extend(root.descendants().into_iter().filter(|e| is_vcard(e)));
    found
}

/// Descendants of a card element, leaving out nested cards.
fn card_elements<'a>(element: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in element.elements() {
        if is_vcard(child) {
            continue;
        }
        out.push(child);
        card_elements(child, out);
    }
}

/// Reads every hCard on the page.
///
/// Properties are parsed under vCard 4.0 rules. Classes that name no
/// registered scribe are ignored rather than kept raw, since most class
/// names on a page are not vCard properties.
///
/// ## Errors
/// [`RfcError::Xml`](crate::error::RfcError::Xml) if the page is not
/// well-formed.
#[tracing::instrument(skip(html, index, warnings), fields(html_len = html.len()))]
pub fn read_hcard(
    html: &str,
    index: &ScribeIndex,
    warnings: &mut Vec<ParseWarning>,
) -> RfcResult<Vec<VCard>> {
    let root = XmlElement::parse(html)?;

    let mut cards = Vec::new();
    for vcard in find_vcards(&root) {
        let mut card = VCard::with_version(VCardVersion::V4_0);
        let mut elements = Vec::new();
        card_elements(vcard, &mut elements);

        for element in elements {
            for class in classes(element) {
                let name = property_name(class);
                if index.by_name(&name).is_none() {
                    continue;
                }
                let unit = RawPropertyUnit::new(
                    name,
                    RawValue::Html(HCardElement::new(element)),
                    VCardVersion::V4_0,
                );
                if let Some(property) = index.unmarshal(unit, warnings) {
                    card.add_boxed(property);
                }
            }
        }

        cards.push(card);
    }

    tracing::debug!(cards = cards.len(), "Read hCard page");
    Ok(cards)
}
