//! Single-text and text-list properties.

use super::parameter::VCardParameters;
use super::property::impl_vcard_property;

/// A property whose value is one text string.
pub trait TextProperty: super::VCardProperty + Clone + Default {
    fn value(&self) -> Option<&str>;
    fn set_value(&mut self, value: Option<String>);
}

/// A property whose value is a comma-separated list of text strings.
pub trait ListProperty: super::VCardProperty + Clone + Default {
    fn values(&self) -> &[String];
    fn values_mut(&mut self) -> &mut Vec<String>;
}

macro_rules! text_property {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub parameters: VCardParameters,
            pub group: Option<String>,
            pub value: Option<String>,
        }

        impl_vcard_property!($name);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self {
                    value: Some(value.into()),
                    ..Self::default()
                }
            }
        }

        impl TextProperty for $name {
            fn value(&self) -> Option<&str> {
                self.value.as_deref()
            }

            fn set_value(&mut self, value: Option<String>) {
                self.value = value;
            }
        }
    };
}

macro_rules! list_property {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub parameters: VCardParameters,
            pub group: Option<String>,
            pub values: Vec<String>,
        }

        impl_vcard_property!($name);

        impl $name {
            #[must_use]
            pub fn new<I, S>(values: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                Self {
                    values: values.into_iter().map(Into::into).collect(),
                    ..Self::default()
                }
            }
        }

        impl ListProperty for $name {
            fn values(&self) -> &[String] {
                &self.values
            }

            fn values_mut(&mut self) -> &mut Vec<String> {
                &mut self.values
            }
        }
    };
}

text_property!(
    /// Formatted name (FN property).
    FormattedName
);
text_property!(
    /// Free-form note (NOTE property).
    Note
);
text_property!(
    /// Job title (TITLE property).
    Title
);
text_property!(
    /// Role or occupation (ROLE property).
    Role
);
text_property!(
    /// Email address (EMAIL property).
    Email
);
text_property!(
    /// Formatted delivery address (LABEL property, vCard 2.1 and 3.0).
    ///
    /// vCard 4.0 folds this into the `LABEL` parameter of ADR; writers
    /// targeting older versions synthesize it from that parameter.
    Label
);

list_property!(
    /// Tags (CATEGORIES property).
    Categories
);
list_property!(
    /// Nicknames (NICKNAME property).
    Nickname
);
