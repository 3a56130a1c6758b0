//! ORG.

use super::{PropertyScribe, ScribeResult, WriteContext};
use crate::rfc::vcard::codec::{encode_semi, split};
use crate::rfc::vcard::core::property::names;
use crate::rfc::vcard::core::{Organization, VCardDataType, VCardParameters, VCardVersion};
use crate::rfc::vcard::hcard::HCardElement;
use crate::rfc::vcard::jcard::JCardValue;
use crate::rfc::vcard::warning::ParseContext;
use crate::rfc::vcard::xcard::XCardElement;

#[derive(Debug, Default)]
pub struct OrganizationScribe;

impl PropertyScribe for OrganizationScribe {
    type Property = Organization;

    fn name(&self) -> &str {
        names::ORG
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, property: &Organization, ctx: &WriteContext) -> String {
        encode_semi(&property.values, ctx.include_trailing_semicolons)
    }

    fn parse_text(
        &self,
        value: &str,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Organization> {
        Ok(Organization {
            values: split(value, None),
            ..Organization::default()
        })
    }

    fn write_xml(&self, property: &Organization, element: &mut XCardElement, _ctx: &WriteContext) {
        element.append_all("text", &property.values);
    }

    fn parse_xml(
        &self,
        element: &XCardElement,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Organization> {
        Ok(Organization {
            values: element.all("text"),
            ..Organization::default()
        })
    }

    fn write_json(&self, property: &Organization, _ctx: &WriteContext) -> JCardValue {
        match property.values.as_slice() {
            [] => JCardValue::single(""),
            [name] => JCardValue::single(name.as_str()),
            values => {
                let components: Vec<[&String; 1]> = values.iter().map(|v| [v]).collect();
                JCardValue::structured(&components)
            }
        }
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Organization> {
        let values = value
            .as_structured()
            .into_iter()
            .map(|component| component.into_iter().next().unwrap_or_default())
            .collect();
        Ok(Organization {
            values,
            ..Organization::default()
        })
    }

    fn parse_html(
        &self,
        element: HCardElement<'_>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Organization> {
        let mut values = Vec::new();
        values.extend(element.first_value("organization-name"));
        values.extend(element.all_values("organization-unit"));
        if values.is_empty() {
            values.push(element.value());
        }
        Ok(Organization {
            values,
            ..Organization::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::scribe::test_support::with_ctx;

    #[test]
    fn units_keep_escaped_delimiters() {
        let org = Organization::with_units("Acme, Inc.", vec!["R;D".to_string()]);
        let text = OrganizationScribe.write_text(&org, &WriteContext::new(VCardVersion::V3_0));
        assert_eq!(text, "Acme\\, Inc.;R\\;D");

        let (parsed, _) = with_ctx(VCardVersion::V3_0, |ctx| {
            OrganizationScribe.parse_text(&text, None, &mut VCardParameters::new(), ctx)
        });
        assert_eq!(parsed.unwrap(), org);
    }

    #[test]
    fn json_single_name_is_a_string() {
        let ctx = WriteContext::new(VCardVersion::V4_0);
        let value = OrganizationScribe.write_json(&Organization::new("Acme"), &ctx);
        assert_eq!(value.values(), &[serde_json::json!("Acme")]);

        let org = Organization::with_units("Acme", vec!["Sales".to_string()]);
        let value = OrganizationScribe.write_json(&org, &ctx);
        assert_eq!(value.values(), &[serde_json::json!(["Acme", "Sales"])]);

        let (parsed, _) = with_ctx(VCardVersion::V4_0, |pctx| {
            OrganizationScribe.parse_json(&value, None, &mut VCardParameters::new(), pctx)
        });
        assert_eq!(parsed.unwrap(), org);
    }
}
