//! Properties with no dedicated scribe.

use super::data_type::VCardDataType;
use super::parameter::VCardParameters;
use super::property::impl_vcard_property;

/// A property kept verbatim because no scribe claims it, or because its
/// scribe could not parse the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProperty {
    pub parameters: VCardParameters,
    pub group: Option<String>,
    /// Property name as it appeared in the source (case preserved).
    pub name: String,
    /// Unparsed value in content-line form (still escaped).
    pub value: String,
    /// Data type reported by the source, if any.
    pub data_type: Option<VCardDataType>,
}

impl_vcard_property!(RawProperty);

impl RawProperty {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Returns whether the property carries the given name (case-insensitive).
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
