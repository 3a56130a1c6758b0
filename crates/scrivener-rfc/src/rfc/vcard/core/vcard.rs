//! The vCard document.

use super::property::VCardProperty;
use super::version::VCardVersion;

/// A vCard: a version and an ordered list of typed properties.
///
/// Property order is preserved end to end; it is also what decides PREF
/// ties on the write path.
#[derive(Debug, Clone, Default)]
pub struct VCard {
    /// Version the card was read as, or is meant to be written as.
    pub version: VCardVersion,
    properties: Vec<Box<dyn VCardProperty>>,
}

impl VCard {
    /// Creates an empty 4.0 card.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_version(version: VCardVersion) -> Self {
        Self {
            version,
            properties: Vec::new(),
        }
    }

    /// Appends a property.
    pub fn add_property<P: VCardProperty>(&mut self, property: P) {
        self.properties.push(Box::new(property));
    }

    /// Appends an already boxed property.
    pub fn add_boxed(&mut self, property: Box<dyn VCardProperty>) {
        self.properties.push(property);
    }

    /// All properties in document order.
    #[must_use]
    pub fn properties(&self) -> &[Box<dyn VCardProperty>] {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Vec<Box<dyn VCardProperty>> {
        &mut self.properties
    }

    /// All properties of concrete type `T`, in document order.
    pub fn properties_of<T: VCardProperty>(&self) -> impl Iterator<Item = &T> {
        self.properties.iter().filter_map(|p| p.downcast_ref::<T>())
    }

    /// The first property of concrete type `T`.
    #[must_use]
    pub fn property<T: VCardProperty>(&self) -> Option<&T> {
        self.properties_of::<T>().next()
    }

    /// Removes every property of concrete type `T`, returning how many went.
    pub fn remove_properties<T: VCardProperty>(&mut self) -> usize {
        let before = self.properties.len();
        self.properties.retain(|p| !p.is::<T>());
        before - self.properties.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
