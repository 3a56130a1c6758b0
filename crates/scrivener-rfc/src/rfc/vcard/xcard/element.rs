//! Accessor and builder for one xCard property element.

use super::tree::XmlElement;
use crate::rfc::vcard::core::version::XCARD_NS;

/// Wraps the element of one property in the xCard namespace.
///
/// Scribes read and write value children through this type so that every
/// value element lands in the right namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XCardElement {
    element: XmlElement,
}

impl XCardElement {
    /// Creates an empty property element (`<adr/>`, `<fn/>`, ...).
    #[must_use]
    pub fn new(property_name: &str) -> Self {
        Self {
            element: XmlElement::in_namespace(XCARD_NS, property_name.to_ascii_lowercase()),
        }
    }

    #[must_use]
    pub fn wrap(element: XmlElement) -> Self {
        Self { element }
    }

    #[must_use]
    pub fn element(&self) -> &XmlElement {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut XmlElement {
        &mut self.element
    }

    #[must_use]
    pub fn into_element(self) -> XmlElement {
        self.element
    }

    /// Local name of the property element.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.element.name
    }

    /// Appends `<name>value</name>`.
    pub fn append(&mut self, name: &str, value: &str) -> &mut XmlElement {
        let child = self.element.push_element(XmlElement::in_namespace(XCARD_NS, name));
        child.push_text(value);
        child
    }

    /// Appends one `<name>` per value. An empty list still produces one
    /// empty element, so the field is present in the output.
    pub fn append_all<S: AsRef<str>>(&mut self, name: &str, values: &[S]) {
        if values.is_empty() {
            self.append(name, "");
            return;
        }
        for value in values {
            self.append(name, value.as_ref());
        }
    }

    /// Text of the first `<name>` child, which may be empty.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<String> {
        self.element.first_element(name).map(XmlElement::text)
    }

    /// Text of every `<name>` child, skipping empty ones.
    #[must_use]
    pub fn all(&self, name: &str) -> Vec<String> {
        self.element
            .elements_named(name)
            .map(XmlElement::text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Name and text of the first value child, ignoring `<parameters>`.
    #[must_use]
    pub fn first_value(&self) -> Option<(String, String)> {
        self.values().into_iter().next()
    }

    /// Name and text of every value child, ignoring `<parameters>`.
    #[must_use]
    pub fn values(&self) -> Vec<(String, String)> {
        self.element
            .elements()
            .filter(|child| child.name != "parameters")
            .map(|child| (child.name.clone(), child.text()))
            .collect()
    }
}
