//! Property scribes: per-type marshalling for every syntax.
//!
//! A [`PropertyScribe`] turns one property type into text, xCard, jCard and
//! back, and reads it from hCard. Scribes never look at other properties and
//! never rewrite parameters themselves beyond their own hook; the registry
//! ([`ScribeIndex`]) drives the normalizer and handles fallbacks.
//!
//! Parsing is lenient. Data problems go to the [`ParseContext`] as warnings;
//! a scribe that cannot make sense of a value returns
//! [`ScribeError::CannotParse`] and the registry keeps the value as a
//! [`RawProperty`](crate::rfc::vcard::core::RawProperty).

mod address;
mod binary;
mod gender;
mod index;
mod list;
mod name;
mod organization;
mod raw;
mod text;

use std::any::TypeId;

use scrivener_core::config::MarshalConfig;

pub use address::AddressScribe;
pub use binary::BinaryScribe;
pub use gender::GenderScribe;
pub use index::{PreparedProperty, RawPropertyUnit, ScribeIndex};
pub use list::ListScribe;
pub use name::StructuredNameScribe;
pub use organization::OrganizationScribe;
pub use raw::RawScribe;
pub use text::TextScribe;

use crate::error::{RfcError, RfcResult};
use crate::rfc::vcard::codec::{escape_text, unescape_text};
use crate::rfc::vcard::core::{VCardDataType, VCardParameters, VCardProperty, VCardVersion};
use crate::rfc::vcard::hcard::HCardElement;
use crate::rfc::vcard::jcard::JCardValue;
use crate::rfc::vcard::normalize::{DocumentContext, normalize_parameters};
use crate::rfc::vcard::rules;
use crate::rfc::vcard::warning::ParseContext;
use crate::rfc::vcard::xcard::XCardElement;

/// Settings for the write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteContext {
    /// Version being written.
    pub version: VCardVersion,
    /// Keep empty trailing components of structured values.
    pub include_trailing_semicolons: bool,
    /// Drop properties the target version does not define.
    pub version_strict: bool,
}

impl WriteContext {
    #[must_use]
    pub fn new(version: VCardVersion) -> Self {
        Self {
            version,
            include_trailing_semicolons: false,
            version_strict: true,
        }
    }

    /// ## Errors
    /// Returns [`RfcError::CoreError`] if the configuration is invalid.
    pub fn from_config(config: &MarshalConfig) -> RfcResult<Self> {
        config.validate()?;
        Ok(Self {
            version: config.version.parse()?,
            include_trailing_semicolons: config.include_trailing_semicolons,
            version_strict: config.version_strict,
        })
    }
}

/// Why a scribe gave up on a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScribeError {
    /// The value is unusable; keep it verbatim as a raw property.
    #[error("Cannot parse value: {0}")]
    CannotParse(String),
    /// The property should be dropped.
    #[error("Property skipped: {0}")]
    Skip(String),
}

pub type ScribeResult<T> = Result<T, ScribeError>;

/// The syntax-specific value of a property being read.
#[derive(Debug, Clone, Copy)]
pub enum RawValue<'a> {
    /// Unfolded text after the colon, still escaped.
    Text(&'a str),
    Xml(&'a XCardElement),
    Json(&'a JCardValue),
    Html(HCardElement<'a>),
}

/// Marshals one property type.
///
/// Only `name`, `default_data_type`, `write_text` and `parse_text` are
/// required. The xCard, jCard and hCard defaults treat the value as a single
/// text string carried under the property's data type.
pub trait PropertyScribe: Send + Sync + 'static {
    type Property: VCardProperty + Clone;

    /// Canonical uppercase registration name.
    fn name(&self) -> &str;

    /// Name to write for `property`; only differs from [`name`](Self::name)
    /// for properties that carry their own name.
    fn property_name(&self, _property: &Self::Property) -> String {
        PropertyScribe::name(self).to_string()
    }

    /// Data type a value has when no `VALUE` parameter says otherwise.
    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType>;

    /// Data type `property` is written as.
    fn data_type(&self, _property: &Self::Property, version: VCardVersion) -> Option<VCardDataType> {
        PropertyScribe::default_data_type(self, version)
    }

    /// Whether PREF and `TYPE=pref` are rewritten for the target version.
    fn prefers(&self) -> bool {
        false
    }

    /// Scribe-specific adjustments to the already copied parameters.
    fn prepare_parameters(
        &self,
        _property: &Self::Property,
        _parameters: &mut VCardParameters,
        _version: VCardVersion,
    ) {
    }

    fn write_text(&self, property: &Self::Property, ctx: &WriteContext) -> String;

    /// Reads a text value. `parameters` belong to the property being built;
    /// the scribe may consume the ones it interprets.
    ///
    /// ## Errors
    /// [`ScribeError`] when the value cannot be used.
    fn parse_text(
        &self,
        value: &str,
        data_type: Option<&VCardDataType>,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Self::Property>;

    fn write_xml(&self, property: &Self::Property, element: &mut XCardElement, ctx: &WriteContext) {
        let value = unescape_text(&PropertyScribe::write_text(self, property, ctx));
        let data_type = PropertyScribe::data_type(self, property, ctx.version);
        element.append(xml_type_name(data_type.as_ref()), &value);
    }

    /// ## Errors
    /// [`ScribeError`] when the value cannot be used.
    fn parse_xml(
        &self,
        element: &XCardElement,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Self::Property> {
        let data_type = PropertyScribe::default_data_type(self, ctx.version);
        let value = element
            .first(xml_type_name(data_type.as_ref()))
            .or_else(|| element.first_value().map(|(_, text)| text))
            .ok_or_else(|| ScribeError::CannotParse(format!("<{}> has no value", element.name())))?;
        PropertyScribe::parse_text(
            self,
            &escape_text(&value, ctx.version),
            data_type.as_ref(),
            parameters,
            ctx,
        )
    }

    fn write_json(&self, property: &Self::Property, ctx: &WriteContext) -> JCardValue {
        JCardValue::single(unescape_text(&PropertyScribe::write_text(self, property, ctx)))
    }

    /// ## Errors
    /// [`ScribeError`] when the value cannot be used.
    fn parse_json(
        &self,
        value: &JCardValue,
        data_type: Option<&VCardDataType>,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Self::Property> {
        let text = escape_text(&value.as_single(), ctx.version);
        PropertyScribe::parse_text(self, &text, data_type, parameters, ctx)
    }

    /// ## Errors
    /// [`ScribeError`] when the element cannot be used.
    fn parse_html(
        &self,
        element: HCardElement<'_>,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Self::Property> {
        let text = escape_text(&element.value(), ctx.version);
        let data_type = PropertyScribe::default_data_type(self, ctx.version);
        PropertyScribe::parse_text(self, &text, data_type.as_ref(), parameters, ctx)
    }
}

impl WriteContext {
    /// Whether a property named `name` is written at all.
    #[must_use]
    pub fn writes(&self, name: &str) -> bool {
        !self.version_strict || rules::supported(name, self.version)
    }
}

/// Element name for a data type in xCard.
pub(crate) fn xml_type_name(data_type: Option<&VCardDataType>) -> &str {
    data_type.map_or("unknown", VCardDataType::as_str)
}

/// Type-erased view of a [`PropertyScribe`] so scribes of different
/// property types share one registry.
pub trait DynScribe: Send + Sync {
    fn name(&self) -> &str;

    /// `TypeId` of the property type this scribe handles.
    fn property_type(&self) -> TypeId;

    fn handles(&self, property: &dyn VCardProperty) -> bool {
        property.as_any().type_id() == self.property_type()
    }

    fn prefers(&self) -> bool;

    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType>;

    /// ## Errors
    /// [`RfcError::InvalidArgument`] if `property` is of another type.
    fn property_name(&self, property: &dyn VCardProperty) -> RfcResult<String>;

    /// ## Errors
    /// [`RfcError::InvalidArgument`] if `property` is of another type.
    fn data_type(
        &self,
        property: &dyn VCardProperty,
        version: VCardVersion,
    ) -> RfcResult<Option<VCardDataType>>;

    /// Copies and rewrites the parameters of `property` for `version`.
    ///
    /// ## Errors
    /// [`RfcError::InvalidArgument`] if `property` is of another type.
    fn prepare_parameters(
        &self,
        property: &dyn VCardProperty,
        version: VCardVersion,
        ctx: &DocumentContext<'_>,
    ) -> RfcResult<VCardParameters>;

    /// ## Errors
    /// [`RfcError::InvalidArgument`] if `property` is of another type.
    fn write_text(&self, property: &dyn VCardProperty, ctx: &WriteContext) -> RfcResult<String>;

    /// ## Errors
    /// [`RfcError::InvalidArgument`] if `property` is of another type.
    fn write_xml(
        &self,
        property: &dyn VCardProperty,
        element: &mut XCardElement,
        ctx: &WriteContext,
    ) -> RfcResult<()>;

    /// ## Errors
    /// [`RfcError::InvalidArgument`] if `property` is of another type.
    fn write_json(&self, property: &dyn VCardProperty, ctx: &WriteContext) -> RfcResult<JCardValue>;

    /// Reads a value in whichever syntax it arrived in.
    ///
    /// ## Errors
    /// [`ScribeError`] when the value cannot be used.
    fn parse(
        &self,
        value: RawValue<'_>,
        data_type: Option<&VCardDataType>,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Box<dyn VCardProperty>>;
}

fn downcast<'p, S: PropertyScribe>(
    scribe: &S,
    property: &'p dyn VCardProperty,
) -> RfcResult<&'p S::Property> {
    property.downcast_ref::<S::Property>().ok_or_else(|| {
        RfcError::InvalidArgument(format!(
            "{} scribe cannot marshal {}",
            PropertyScribe::name(scribe),
            property.type_name()
        ))
    })
}

impl<S: PropertyScribe> DynScribe for S {
    fn name(&self) -> &str {
        PropertyScribe::name(self)
    }

    fn property_type(&self) -> TypeId {
        TypeId::of::<S::Property>()
    }

    fn prefers(&self) -> bool {
        PropertyScribe::prefers(self)
    }

    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType> {
        PropertyScribe::default_data_type(self, version)
    }

    fn property_name(&self, property: &dyn VCardProperty) -> RfcResult<String> {
        Ok(PropertyScribe::property_name(self, downcast(self, property)?))
    }

    fn data_type(
        &self,
        property: &dyn VCardProperty,
        version: VCardVersion,
    ) -> RfcResult<Option<VCardDataType>> {
        Ok(PropertyScribe::data_type(self, downcast(self, property)?, version))
    }

    fn prepare_parameters(
        &self,
        property: &dyn VCardProperty,
        version: VCardVersion,
        ctx: &DocumentContext<'_>,
    ) -> RfcResult<VCardParameters> {
        let typed = downcast(self, property)?;
        let mut parameters = normalize_parameters(
            property,
            &PropertyScribe::property_name(self, typed),
            PropertyScribe::prefers(self),
            version,
            ctx,
        );
        PropertyScribe::prepare_parameters(self, typed, &mut parameters, version);
        Ok(parameters)
    }

    fn write_text(&self, property: &dyn VCardProperty, ctx: &WriteContext) -> RfcResult<String> {
        Ok(PropertyScribe::write_text(self, downcast(self, property)?, ctx))
    }

    fn write_xml(
        &self,
        property: &dyn VCardProperty,
        element: &mut XCardElement,
        ctx: &WriteContext,
    ) -> RfcResult<()> {
        PropertyScribe::write_xml(self, downcast(self, property)?, element, ctx);
        Ok(())
    }

    fn write_json(&self, property: &dyn VCardProperty, ctx: &WriteContext) -> RfcResult<JCardValue> {
        Ok(PropertyScribe::write_json(self, downcast(self, property)?, ctx))
    }

    fn parse(
        &self,
        value: RawValue<'_>,
        data_type: Option<&VCardDataType>,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Box<dyn VCardProperty>> {
        let property = match value {
            RawValue::Text(text) => self.parse_text(text, data_type, parameters, ctx)?,
            RawValue::Xml(element) => self.parse_xml(element, parameters, ctx)?,
            RawValue::Json(json) => self.parse_json(json, data_type, parameters, ctx)?,
            RawValue::Html(element) => self.parse_html(element, parameters, ctx)?,
        };
        Ok(Box::new(property))
    }
}
