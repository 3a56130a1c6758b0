//! Write-path parameter normalization.
//!
//! The model keeps one parameter set per property regardless of version.
//! Before a property is written, its parameters are copied and rewritten for
//! the target version; the property itself is never touched.

use std::any::TypeId;
use std::collections::HashMap;

use super::core::parameter::names;
use super::core::{VCard, VCardParameters, VCardProperty, VCardVersion};
use super::rules;

const PREF_TYPE: &str = "pref";

/// Per-document facts the normalizer needs, gathered in one read-only scan.
#[derive(Debug, Default)]
pub struct DocumentContext<'a> {
    most_preferred: HashMap<TypeId, &'a dyn VCardProperty>,
}

impl<'a> DocumentContext<'a> {
    /// Scans `card` for the property with the lowest PREF of each type.
    /// A `TYPE=pref` without a PREF ranks as 1. The first one wins a tie.
    #[must_use]
    pub fn new(card: &'a VCard) -> Self {
        let mut lowest: HashMap<TypeId, (u32, &'a dyn VCardProperty)> = HashMap::new();

        for property in card.properties() {
            let parameters = property.parameters();
            let Some(pref) = parameters
                .pref()
                .or_else(|| parameters.has_type(PREF_TYPE).then_some(1))
            else {
                continue;
            };
            let property: &'a dyn VCardProperty = property.as_ref();
            lowest
                .entry(property.as_any().type_id())
                .and_modify(|best| {
                    if pref < best.0 {
                        *best = (pref, property);
                    }
                })
                .or_insert((pref, property));
        }

        tracing::trace!(types = lowest.len(), "Computed most preferred properties");

        Self {
            most_preferred: lowest
                .into_iter()
                .map(|(type_id, (_, property))| (type_id, property))
                .collect(),
        }
    }

    /// A context for writing a property outside of any document.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `property` has the lowest PREF among its siblings of the
    /// same type.
    #[must_use]
    pub fn is_most_preferred(&self, property: &dyn VCardProperty) -> bool {
        self.most_preferred
            .get(&property.as_any().type_id())
            .is_some_and(|best| std::ptr::addr_eq(*best, property))
    }
}

/// Rewrites preference markers for `version`.
///
/// 4.0 uses a numeric PREF; a legacy `TYPE=pref` becomes `PREF=1`. Older
/// versions only know `TYPE=pref`, so PREF is dropped everywhere, the most
/// preferred sibling gets the type value and every other sibling loses it.
pub fn handle_pref_param(
    property: &dyn VCardProperty,
    parameters: &mut VCardParameters,
    version: VCardVersion,
    ctx: &DocumentContext<'_>,
) {
    if version.supports_numeric_pref() {
        if parameters.has_type(PREF_TYPE) {
            parameters.remove_value(names::TYPE, PREF_TYPE);
            if parameters.pref().is_none() {
                parameters.set_pref(Some(1));
            }
        }
        return;
    }

    parameters.remove_all(names::PREF);
    if !ctx.is_most_preferred(property) {
        parameters.remove_value(names::TYPE, PREF_TYPE);
    } else if !parameters.has_type(PREF_TYPE) {
        parameters.add_type(PREF_TYPE);
    }
}

/// Produces the parameters `property` is written with: a copy of its own,
/// with preference handling (when `pref_aware`) and the version rule table
/// applied.
#[must_use]
pub fn normalize_parameters(
    property: &dyn VCardProperty,
    name: &str,
    pref_aware: bool,
    version: VCardVersion,
    ctx: &DocumentContext<'_>,
) -> VCardParameters {
    let mut parameters = property.parameters().clone();
    if pref_aware {
        handle_pref_param(property, &mut parameters, version, ctx);
    }
    rules::apply_parameter_rules(name, version, &mut parameters);
    parameters
}
