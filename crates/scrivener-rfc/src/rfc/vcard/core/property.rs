//! The typed property contract.

use std::any::Any;
use std::fmt;

use super::parameter::VCardParameters;
use super::vcard::VCard;
use super::version::VCardVersion;
use crate::rfc::vcard::warning::ValidationWarning;

/// A typed vCard property.
///
/// Every concrete property carries its parameters and an optional group
/// label. Properties know nothing about syntaxes or versions; scribes do the
/// marshalling and the normalizer does the version rewrites.
pub trait VCardProperty: Any + fmt::Debug + Send + Sync {
    /// The property's parameters.
    fn parameters(&self) -> &VCardParameters;

    /// Mutable access to the property's parameters.
    fn parameters_mut(&mut self) -> &mut VCardParameters;

    /// Optional property group (e.g., "item1" in "item1.TEL").
    fn group(&self) -> Option<&str>;

    /// Sets or clears the group.
    fn set_group(&mut self, group: Option<String>);

    /// Appends warnings about questionable state for the target version.
    fn validate(
        &self,
        _version: VCardVersion,
        _card: &VCard,
        _warnings: &mut Vec<ValidationWarning>,
    ) {
    }

    /// Rust type name of the concrete property, for diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Clones into a new box.
    fn clone_box(&self) -> Box<dyn VCardProperty>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn VCardProperty {
    /// Returns the property as `T` if that is its concrete type.
    #[must_use]
    pub fn downcast_ref<T: VCardProperty>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutable variant of [`downcast_ref`](Self::downcast_ref).
    pub fn downcast_mut<T: VCardProperty>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Returns whether the concrete type is `T`.
    #[must_use]
    pub fn is<T: VCardProperty>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl Clone for Box<dyn VCardProperty> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Implements the bookkeeping half of [`VCardProperty`] for a struct with
/// `parameters` and `group` fields. Pass `validate = path` to hook in a
/// validation function with the trait method's signature.
macro_rules! impl_vcard_property {
    ($ty:ty) => {
        impl_vcard_property!($ty, validate = |_, _, _, _| {});
    };
    ($ty:ty, validate = $validate:expr) => {
        impl $crate::rfc::vcard::core::VCardProperty for $ty {
            fn parameters(&self) -> &$crate::rfc::vcard::core::VCardParameters {
                &self.parameters
            }

            fn parameters_mut(&mut self) -> &mut $crate::rfc::vcard::core::VCardParameters {
                &mut self.parameters
            }

            fn group(&self) -> Option<&str> {
                self.group.as_deref()
            }

            fn set_group(&mut self, group: Option<String>) {
                self.group = group;
            }

            fn validate(
                &self,
                version: $crate::rfc::vcard::core::VCardVersion,
                card: &$crate::rfc::vcard::core::VCard,
                warnings: &mut Vec<$crate::rfc::vcard::warning::ValidationWarning>,
            ) {
                let validate: fn(
                    &Self,
                    $crate::rfc::vcard::core::VCardVersion,
                    &$crate::rfc::vcard::core::VCard,
                    &mut Vec<$crate::rfc::vcard::warning::ValidationWarning>,
                ) = $validate;
                validate(self, version, card, warnings);
            }

            fn clone_box(&self) -> Box<dyn $crate::rfc::vcard::core::VCardProperty> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }
    };
}

pub(crate) use impl_vcard_property;

/// Common property names as constants.
pub mod names {
    // Identification properties
    pub const FN: &str = "FN";
    pub const N: &str = "N";
    pub const NICKNAME: &str = "NICKNAME";
    pub const PHOTO: &str = "PHOTO";
    pub const GENDER: &str = "GENDER";

    // Delivery addressing
    pub const ADR: &str = "ADR";
    pub const LABEL: &str = "LABEL";

    // Communications
    pub const EMAIL: &str = "EMAIL";

    // Organizational
    pub const TITLE: &str = "TITLE";
    pub const ROLE: &str = "ROLE";
    pub const LOGO: &str = "LOGO";
    pub const ORG: &str = "ORG";

    // Explanatory
    pub const CATEGORIES: &str = "CATEGORIES";
    pub const NOTE: &str = "NOTE";
    pub const SOUND: &str = "SOUND";

    // Security
    pub const KEY: &str = "KEY";

    // General/structural
    pub const BEGIN: &str = "BEGIN";
    pub const END: &str = "END";
    pub const VERSION: &str = "VERSION";
}
