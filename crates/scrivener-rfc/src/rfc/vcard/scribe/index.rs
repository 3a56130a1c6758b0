//! The scribe registry.
//!
//! Maps registration names to scribes for the read path and property types
//! to scribes for the write path. Names nobody registered resolve to a
//! [`RawScribe`], so unknown properties survive a round trip untouched.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{
    AddressScribe, BinaryScribe, DynScribe, GenderScribe, ListScribe, OrganizationScribe,
    PropertyScribe, RawScribe, RawValue, ScribeError, StructuredNameScribe, TextScribe,
};
use crate::error::{RfcError, RfcResult};
use crate::rfc::vcard::core::parameter::names as param;
use crate::rfc::vcard::core::{
    RawProperty, VCard, VCardDataType, VCardParameters, VCardProperty, VCardVersion,
};
use crate::rfc::vcard::normalize::DocumentContext;
use crate::rfc::vcard::rules;
use crate::rfc::vcard::warning::{ParseContext, ParseWarning, ValidationWarning, WarningKind};

/// One property as a reader extracted it, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawPropertyUnit<'a> {
    pub group: Option<String>,
    /// Name as it appeared in the source.
    pub name: String,
    pub parameters: VCardParameters,
    /// Data type carried by the syntax itself (xCard element name, jCard
    /// type slot). Text syntax leaves this empty and uses `VALUE`.
    pub data_type: Option<VCardDataType>,
    pub value: RawValue<'a>,
    pub version: VCardVersion,
    /// Source line, when the syntax has lines.
    pub line: Option<usize>,
}

impl<'a> RawPropertyUnit<'a> {
    #[must_use]
    pub fn new(name: impl Into<String>, value: RawValue<'a>, version: VCardVersion) -> Self {
        Self {
            group: None,
            name: name.into(),
            parameters: VCardParameters::new(),
            data_type: None,
            value,
            version,
            line: None,
        }
    }
}

/// Everything a writer needs about a property besides its value.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedProperty {
    pub group: Option<String>,
    pub name: String,
    /// Version-adjusted copy of the property's parameters.
    pub parameters: VCardParameters,
    pub data_type: Option<VCardDataType>,
    pub default_data_type: Option<VCardDataType>,
}

impl PreparedProperty {
    /// The data type a text writer must state in `VALUE`: only when it
    /// differs from the default and the parameters do not already carry one.
    #[must_use]
    pub fn explicit_data_type(&self) -> Option<&VCardDataType> {
        if self.parameters.contains(param::VALUE) || self.data_type == self.default_data_type {
            return None;
        }
        self.data_type.as_ref()
    }
}

/// Registry of scribes, shared read-only once built.
#[derive(Clone)]
pub struct ScribeIndex {
    by_name: HashMap<String, Arc<dyn DynScribe>>,
    by_type: HashMap<TypeId, Arc<dyn DynScribe>>,
}

impl fmt::Debug for ScribeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.by_name.keys().collect();
        names.sort();
        f.debug_struct("ScribeIndex").field("names", &names).finish()
    }
}

impl Default for ScribeIndex {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScribeIndex {
    /// A registry holding only the raw catch-all.
    #[must_use]
    pub fn empty() -> Self {
        let mut by_type: HashMap<TypeId, Arc<dyn DynScribe>> = HashMap::new();
        by_type.insert(TypeId::of::<RawProperty>(), Arc::new(RawScribe::default()));
        Self {
            by_name: HashMap::new(),
            by_type,
        }
    }

    /// A registry with every built-in scribe.
    #[must_use]
    pub fn standard() -> Self {
        let mut index = Self::empty();
        index.insert(Arc::new(TextScribe::formatted_name()));
        index.insert(Arc::new(StructuredNameScribe));
        index.insert(Arc::new(ListScribe::nickname()));
        index.insert(Arc::new(BinaryScribe::photo()));
        index.insert(Arc::new(GenderScribe));
        index.insert(Arc::new(AddressScribe));
        index.insert(Arc::new(TextScribe::label()));
        index.insert(Arc::new(TextScribe::email()));
        index.insert(Arc::new(TextScribe::title()));
        index.insert(Arc::new(TextScribe::role()));
        index.insert(Arc::new(BinaryScribe::logo()));
        index.insert(Arc::new(OrganizationScribe));
        index.insert(Arc::new(ListScribe::categories()));
        index.insert(Arc::new(TextScribe::note()));
        index.insert(Arc::new(BinaryScribe::sound()));
        index.insert(Arc::new(BinaryScribe::key()));
        index
    }

    fn insert(&mut self, scribe: Arc<dyn DynScribe>) {
        self.by_name
            .insert(scribe.name().to_ascii_uppercase(), Arc::clone(&scribe));
        self.by_type.insert(scribe.property_type(), scribe);
    }

    /// Adds a scribe.
    ///
    /// ## Errors
    /// [`RfcError::DuplicateRegistration`] if its name or property type is
    /// already taken.
    pub fn register<S: PropertyScribe>(&mut self, scribe: S) -> RfcResult<()> {
        let name = PropertyScribe::name(&scribe).to_ascii_uppercase();
        if self.by_name.contains_key(&name)
            || self.by_type.contains_key(&TypeId::of::<S::Property>())
        {
            return Err(RfcError::DuplicateRegistration(name));
        }
        tracing::debug!(%name, "Registered scribe");
        self.insert(Arc::new(scribe));
        Ok(())
    }

    /// Looks up the scribe registered under `name` (case-insensitive).
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Arc<dyn DynScribe>> {
        self.by_name.get(&name.to_ascii_uppercase())
    }

    /// Looks up the scribe for the concrete type of `property`.
    ///
    /// ## Errors
    /// [`RfcError::UnregisteredProperty`] if no scribe handles the type.
    pub fn by_property(&self, property: &dyn VCardProperty) -> RfcResult<&Arc<dyn DynScribe>> {
        self.by_type
            .get(&property.as_any().type_id())
            .ok_or_else(|| RfcError::UnregisteredProperty(property.type_name().to_string()))
    }

    /// Whether every property of `card` has a scribe.
    ///
    /// ## Errors
    /// [`RfcError::UnregisteredProperty`] naming the first one that does not.
    pub fn check_document(&self, card: &VCard) -> RfcResult<()> {
        card.properties()
            .iter()
            .try_for_each(|property| self.by_property(property.as_ref()).map(|_| ()))
    }

    /// Turns a raw unit into a typed property.
    ///
    /// Returns `None` when the property was skipped. A value the scribe
    /// declines is kept as a [`RawProperty`]; both cases leave a warning.
    #[tracing::instrument(
        skip(self, unit, warnings),
        fields(name = %unit.name, version = %unit.version)
    )]
    pub fn unmarshal(
        &self,
        unit: RawPropertyUnit<'_>,
        warnings: &mut Vec<ParseWarning>,
    ) -> Option<Box<dyn VCardProperty>> {
        let RawPropertyUnit {
            group,
            name,
            parameters,
            data_type,
            value,
            version,
            line,
        } = unit;

        let mut ctx = ParseContext::new(version, warnings);
        ctx.property_name = Some(name.clone());
        ctx.line = line;

        let Some(scribe) = self.by_name(&name) else {
            tracing::trace!("No scribe registered, keeping raw");
            let data_type = data_type.or_else(|| parameters.value_type());
            let mut property = keep_raw(&name, value, data_type.as_ref(), parameters, &mut ctx)?;
            property.set_group(group);
            return Some(property);
        };

        let original = parameters.clone();
        let mut parameters = parameters;
        let explicit = data_type.or_else(|| {
            parameters
                .remove_all(param::VALUE)
                .first()
                .map(|v| VCardDataType::parse(v))
        });
        let effective = explicit.clone().or_else(|| scribe.default_data_type(version));

        let mut property = match scribe.parse(value, effective.as_ref(), &mut parameters, &mut ctx) {
            Ok(mut property) => {
                *property.parameters_mut() = parameters;
                property
            }
            Err(ScribeError::CannotParse(reason)) => {
                tracing::warn!(%reason, "Scribe declined value, keeping raw");
                ctx.add_warning(WarningKind::Unparseable, &[&reason]);
                keep_raw(&name, value, explicit.as_ref(), original, &mut ctx)?
            }
            Err(ScribeError::Skip(reason)) => {
                tracing::debug!(%reason, "Scribe skipped property");
                ctx.add_warning(WarningKind::Skipped, &[&reason]);
                return None;
            }
        };

        property.set_group(group);
        Some(property)
    }

    /// Name, parameters and data types `property` is written with.
    ///
    /// ## Errors
    /// [`RfcError::UnregisteredProperty`] if no scribe handles the type.
    pub fn prepare(
        &self,
        property: &dyn VCardProperty,
        version: VCardVersion,
        ctx: &DocumentContext<'_>,
    ) -> RfcResult<PreparedProperty> {
        let scribe = self.by_property(property)?;
        Ok(PreparedProperty {
            group: property.group().map(str::to_string),
            name: scribe.property_name(property)?,
            parameters: scribe.prepare_parameters(property, version, ctx)?,
            data_type: scribe.data_type(property, version)?,
            default_data_type: scribe.default_data_type(version),
        })
    }

    /// Runs explicit validation over `card` for `version`. Each warning is
    /// paired with the name of the property it concerns.
    ///
    /// ## Errors
    /// [`RfcError::UnregisteredProperty`] if a property has no scribe.
    pub fn validate(
        &self,
        card: &VCard,
        version: VCardVersion,
    ) -> RfcResult<Vec<(String, ValidationWarning)>> {
        let mut found = Vec::new();

        for property in card.properties() {
            let property = property.as_ref();
            let name = self.by_property(property)?.property_name(property)?;

            let mut warnings = Vec::new();
            property.validate(version, card, &mut warnings);

            if !rules::supported(&name, version) {
                warnings.push(ValidationWarning::new(
                    WarningKind::UnsupportedVersion,
                    &[&name, version.as_str()],
                ));
            }

            if let Some(pref) = property.parameters().first(param::PREF)
                && !pref.parse::<u32>().is_ok_and(|p| (1..=100).contains(&p))
            {
                warnings.push(ValidationWarning::new(WarningKind::InvalidPref, &[pref]));
            }

            found.extend(warnings.into_iter().map(|w| (name.clone(), w)));
        }

        Ok(found)
    }
}

fn keep_raw(
    name: &str,
    value: RawValue<'_>,
    data_type: Option<&VCardDataType>,
    parameters: VCardParameters,
    ctx: &mut ParseContext<'_>,
) -> Option<Box<dyn VCardProperty>> {
    let mut scratch = parameters.clone();
    match DynScribe::parse(&RawScribe::new(name), value, data_type, &mut scratch, ctx) {
        Ok(mut property) => {
            *property.parameters_mut() = parameters;
            Some(property)
        }
        Err(err) => {
            ctx.add_warning(WarningKind::Skipped, &[&err.to_string()]);
            None
        }
    }
}
