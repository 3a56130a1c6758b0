//! Version-conditional rules as data.
//!
//! Rewrites and availability checks that depend on the target version live
//! in these tables so scribes stay free of per-version branches.

use super::core::parameter::names as param;
use super::core::property::names as prop;
use super::core::{VCardParameters, VCardVersion};

const LEGACY: &[VCardVersion] = &[VCardVersion::V2_1, VCardVersion::V3_0];
const SINCE_V3: &[VCardVersion] = &[VCardVersion::V3_0, VCardVersion::V4_0];
const V4_ONLY: &[VCardVersion] = &[VCardVersion::V4_0];

/// A parameter rewrite applied on the write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterAction {
    /// Remove every value of the named parameter.
    StripParameter(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct ParameterRule {
    pub property: &'static str,
    pub versions: &'static [VCardVersion],
    pub action: ParameterAction,
}

/// ADR carries its label in a LABEL parameter only in 4.0; older versions
/// get a separate LABEL property instead.
pub const PARAMETER_RULES: &[ParameterRule] = &[ParameterRule {
    property: prop::ADR,
    versions: LEGACY,
    action: ParameterAction::StripParameter(param::LABEL),
}];

/// First version in which a property may hold a reference instead of
/// inline content. Properties not listed accept references everywhere.
const REFERENCE_SINCE: &[(&str, VCardVersion)] = &[(prop::KEY, VCardVersion::V4_0)];

/// Versions that define a property. Properties not listed exist in all.
const SUPPORTED_VERSIONS: &[(&str, &[VCardVersion])] = &[
    (prop::LABEL, LEGACY),
    (prop::GENDER, V4_ONLY),
    (prop::NICKNAME, SINCE_V3),
    (prop::CATEGORIES, SINCE_V3),
];

/// Rules that apply to `property` when writing `version`.
pub fn parameter_rules(
    property: &str,
    version: VCardVersion,
) -> impl Iterator<Item = &'static ParameterRule> {
    PARAMETER_RULES
        .iter()
        .filter(move |rule| rule.property.eq_ignore_ascii_case(property))
        .filter(move |rule| rule.versions.contains(&version))
}

/// Applies every matching rule to `parameters`.
pub fn apply_parameter_rules(
    property: &str,
    version: VCardVersion,
    parameters: &mut VCardParameters,
) {
    for rule in parameter_rules(property, version) {
        match rule.action {
            ParameterAction::StripParameter(name) => {
                parameters.remove_all(name);
            }
        }
    }
}

/// Whether `property` may hold a reference in `version`.
#[must_use]
pub fn reference_supported(property: &str, version: VCardVersion) -> bool {
    REFERENCE_SINCE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(property))
        .is_none_or(|(_, since)| version >= *since)
}

/// Whether `version` defines `property`.
#[must_use]
pub fn supported(property: &str, version: VCardVersion) -> bool {
    SUPPORTED_VERSIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(property))
        .is_none_or(|(_, versions)| versions.contains(&version))
}
