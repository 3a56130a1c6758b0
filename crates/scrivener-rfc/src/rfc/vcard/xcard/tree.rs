//! A small owned XML element tree over quick-xml.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::{NsReader, Writer};

use crate::error::{RfcError, RfcResult};

/// A node inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element with its resolved namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Local name (no prefix).
    pub name: String,
    /// Namespace URI the element is bound to.
    pub namespace: Option<String>,
    /// Attributes other than namespace declarations, in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn in_namespace(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
            ..Self::default()
        }
    }

    /// Returns an attribute value by local name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|(key, _)| *key == name) {
            existing.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Child elements with the given local name.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |element| element.name == name)
    }

    #[must_use]
    pub fn first_element(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    /// Every descendant element in document order, excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        for child in self.elements() {
            found.push(child);
            found.extend(child.descendants());
        }
        found
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Appends a child element and returns it.
    pub fn push_element(&mut self, element: XmlElement) -> &mut XmlElement {
        self.children.push(XmlNode::Element(element));
        match self.children.last_mut() {
            Some(XmlNode::Element(element)) => element,
            _ => unreachable!("an element was just pushed"),
        }
    }

    /// Appends text, merging with a preceding text node.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(XmlNode::Text(existing)) = self.children.last_mut() {
            existing.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }

    /// Parses a document and returns its root element.
    ///
    /// ## Errors
    /// Returns [`RfcError::Xml`] if the document is not well-formed or has
    /// no root element.
    #[tracing::instrument(skip(xml), fields(xml_len = xml.len()))]
    pub fn parse(xml: &str) -> RfcResult<Self> {
        let mut reader = NsReader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_resolved_event().map_err(xml_error)? {
                (ns, Event::Start(e)) => stack.push(start_element(&ns, &e)?),
                (ns, Event::Empty(e)) => {
                    let element = start_element(&ns, &e)?;
                    attach(&mut stack, &mut root, element);
                }
                (_, Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| RfcError::Xml("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, element);
                }
                (_, Event::Text(t)) => {
                    if let Some(parent) = stack.last_mut() {
                        let raw = std::str::from_utf8(&t).map_err(xml_error)?;
                        let text = quick_xml::escape::unescape(raw).map_err(xml_error)?;
                        parent.push_text(&text);
                    }
                }
                (_, Event::CData(c)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(std::str::from_utf8(&c).map_err(xml_error)?);
                    }
                }
                (_, Event::GeneralRef(r)) => {
                    if let Some(parent) = stack.last_mut() {
                        let name = std::str::from_utf8(&r).map_err(xml_error)?;
                        parent.push_text(&resolve_reference(name));
                    }
                }
                (_, Event::Eof) => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(RfcError::Xml("unclosed element".to_string()));
        }
        root.ok_or_else(|| RfcError::Xml("document has no root element".to_string()))
    }

    /// Serializes the element and its subtree.
    ///
    /// ## Errors
    /// Returns [`RfcError::Xml`] if the writer fails.
    pub fn to_xml(&self) -> RfcResult<String> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self, None)?;
        String::from_utf8(writer.into_inner()).map_err(xml_error)
    }
}

fn xml_error(err: impl std::fmt::Display) -> RfcError {
    RfcError::Xml(err.to_string())
}

fn start_element(ns: &ResolveResult<'_>, e: &BytesStart<'_>) -> RfcResult<XmlElement> {
    let name = std::str::from_utf8(e.local_name().as_ref())
        .map_err(xml_error)?
        .to_string();
    let namespace = match ns {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    };

    let mut element = XmlElement {
        name,
        namespace,
        ..XmlElement::default()
    };

    for attr in e.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(xml_error)?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let local = std::str::from_utf8(attr.key.local_name().as_ref())
            .map_err(xml_error)?
            .to_string();
        let raw = std::str::from_utf8(&attr.value).map_err(xml_error)?;
        let value = quick_xml::escape::unescape(raw).map_err(xml_error)?;
        element.attributes.push((local, value.into_owned()));
    }

    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    }
}

/// Resolves an entity or character reference name (without `&` and `;`).
fn resolve_reference(name: &str) -> String {
    let numeric = name
        .strip_prefix("#x")
        .or_else(|| name.strip_prefix("#X"))
        .map(|hex| u32::from_str_radix(hex, 16))
        .or_else(|| name.strip_prefix('#').map(str::parse::<u32>));

    match numeric {
        Some(Ok(code)) => char::from_u32(code).map_or_else(|| format!("&{name};"), String::from),
        Some(Err(_)) => format!("&{name};"),
        None => quick_xml::escape::resolve_predefined_entity(name)
            .map_or_else(|| format!("&{name};"), str::to_string),
    }
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &XmlElement,
    parent_ns: Option<&str>,
) -> RfcResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    if let Some(ns) = element.namespace.as_deref()
        && Some(ns) != parent_ns
    {
        start.push_attribute(("xmlns", ns));
    }
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_error);
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    let ns = element.namespace.as_deref().or(parent_ns);
    for child in &element.children {
        match child {
            XmlNode::Element(child) => write_element(writer, child, ns)?,
            XmlNode::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(xml_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(xml_error)
}
