//! Accessor over one hCard property element.

use crate::rfc::vcard::xcard::XmlElement;

/// A borrowed view of an HTML element carrying an hCard class.
#[derive(Debug, Clone, Copy)]
pub struct HCardElement<'a> {
    element: &'a XmlElement,
}

impl<'a> HCardElement<'a> {
    #[must_use]
    pub fn new(element: &'a XmlElement) -> Self {
        Self { element }
    }

    #[must_use]
    pub fn element(&self) -> &'a XmlElement {
        self.element
    }

    /// Lowercased tag name.
    #[must_use]
    pub fn tag_name(&self) -> String {
        self.element.name.to_ascii_lowercase()
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.attr(name)
    }

    /// Whether the element carries `class` in its class list.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        has_class(self.element, class)
    }

    /// The microformat value of the element.
    ///
    /// Children classed `value` take precedence; `abbr` contributes its
    /// title and `data`/`input` their value attribute; anything else its
    /// text with whitespace collapsed and `<br>` as a newline.
    #[must_use]
    pub fn value(&self) -> String {
        element_value(self.element)
    }

    /// Values of every descendant carrying `class`.
    #[must_use]
    pub fn all_values(&self, class: &str) -> Vec<String> {
        self.element
            .descendants()
            .into_iter()
            .filter(|e| has_class(e, class))
            .map(element_value)
            .collect()
    }

    /// Value of the first descendant carrying `class`.
    #[must_use]
    pub fn first_value(&self, class: &str) -> Option<String> {
        self.element
            .descendants()
            .into_iter()
            .find(|e| has_class(e, class))
            .map(element_value)
    }

    /// Lowercased values of `type` descendants.
    #[must_use]
    pub fn types(&self) -> Vec<String> {
        self.all_values("type")
            .into_iter()
            .map(|t| t.to_ascii_lowercase())
            .collect()
    }
}

/// Whitespace-separated class names of an element.
pub(crate) fn classes(element: &XmlElement) -> impl Iterator<Item = &str> {
    element.attr("class").unwrap_or_default().split_whitespace()
}

fn has_class(element: &XmlElement, class: &str) -> bool {
    classes(element).any(|c| c.eq_ignore_ascii_case(class))
}

fn element_value(element: &XmlElement) -> String {
    let value_parts: Vec<String> = element
        .descendants()
        .into_iter()
        .filter(|e| has_class(e, "value"))
        .map(element_value)
        .collect();
    if !value_parts.is_empty() {
        return value_parts.concat();
    }

    match element.name.to_ascii_lowercase().as_str() {
        "abbr" => {
            if let Some(title) = element.attr("title") {
                return title.to_string();
            }
        }
        "data" | "input" => {
            if let Some(value) = element.attr("value") {
                return value.to_string();
            }
        }
        _ => {}
    }

    let mut raw = String::new();
    collect_visible_text(element, &mut raw);
    raw.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn collect_visible_text(element: &XmlElement, out: &mut String) {
    use crate::rfc::vcard::xcard::XmlNode;

    for node in &element.children {
        match node {
            XmlNode::Text(text) => out.push_str(&text.replace('\n', " ")),
            XmlNode::Element(child) if child.name.eq_ignore_ascii_case("br") => out.push('\n'),
            XmlNode::Element(child) => collect_visible_text(child, out),
        }
    }
}
