//! GENDER.

use super::{PropertyScribe, ScribeError, ScribeResult, WriteContext};
use crate::rfc::vcard::codec::{encode_semi, split};
use crate::rfc::vcard::core::property::names;
use crate::rfc::vcard::core::{Gender, Sex, VCardDataType, VCardParameters, VCardVersion};
use crate::rfc::vcard::hcard::HCardElement;
use crate::rfc::vcard::jcard::JCardValue;
use crate::rfc::vcard::warning::{ParseContext, WarningKind};
use crate::rfc::vcard::xcard::XCardElement;

#[derive(Debug, Default)]
pub struct GenderScribe;

impl GenderScribe {
    fn build(
        sex: &str,
        identity: Option<String>,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Gender> {
        let sex = if sex.trim().is_empty() {
            None
        } else {
            let parsed = Sex::parse(sex);
            if parsed.is_none() {
                ctx.add_warning(WarningKind::InvalidSex, &[sex]);
                return Err(ScribeError::CannotParse(format!("invalid sex \"{sex}\"")));
            }
            parsed
        };

        Ok(Gender {
            sex,
            identity: identity.filter(|i| !i.is_empty()),
            ..Gender::default()
        })
    }

    fn sex_text(property: &Gender) -> String {
        property.sex.map(|s| s.as_char().to_string()).unwrap_or_default()
    }
}

impl PropertyScribe for GenderScribe {
    type Property = Gender;

    fn name(&self) -> &str {
        names::GENDER
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, property: &Gender, ctx: &WriteContext) -> String {
        let sex = Self::sex_text(property);
        match &property.identity {
            Some(identity) => encode_semi(
                &[sex.as_str(), identity.as_str()],
                ctx.include_trailing_semicolons,
            ),
            None => encode_semi(&[sex.as_str()], ctx.include_trailing_semicolons),
        }
    }

    fn parse_text(
        &self,
        value: &str,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Gender> {
        let mut parts = split(value, Some(2)).into_iter();
        let sex = parts.next().unwrap_or_default();
        Self::build(&sex, parts.next(), ctx)
    }

    fn write_xml(&self, property: &Gender, element: &mut XCardElement, _ctx: &WriteContext) {
        element.append("sex", &Self::sex_text(property));
        element.append("identity", property.identity.as_deref().unwrap_or_default());
    }

    fn parse_xml(
        &self,
        element: &XCardElement,
        _parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Gender> {
        let sex = element.first("sex").ok_or_else(|| {
            ScribeError::CannotParse(format!("<{}> has no <sex>", element.name()))
        })?;
        Self::build(&sex, element.first("identity"), ctx)
    }

    fn write_json(&self, property: &Gender, _ctx: &WriteContext) -> JCardValue {
        let sex = Self::sex_text(property);
        match &property.identity {
            Some(identity) => JCardValue::structured(&[[sex.as_str()], [identity.as_str()]]),
            None => JCardValue::single(sex),
        }
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Gender> {
        let mut components = value.as_structured().into_iter();
        let sex = components
            .next()
            .and_then(|c| c.into_iter().next())
            .unwrap_or_default();
        let identity = components.next().and_then(|c| c.into_iter().next());
        Self::build(&sex, identity, ctx)
    }

    fn parse_html(
        &self,
        element: HCardElement<'_>,
        parameters: &mut VCardParameters,
        ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Gender> {
        match element.first_value("sex") {
            Some(sex) => Self::build(&sex, element.first_value("gender-identity"), ctx),
            None => self.parse_text(&element.value(), None, parameters, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::scribe::test_support::with_ctx;

    #[test]
    fn text_forms() {
        let ctx = WriteContext::new(VCardVersion::V4_0);
        assert_eq!(GenderScribe.write_text(&Gender::sex(Sex::Male), &ctx), "M");
        assert_eq!(
            GenderScribe.write_text(&Gender::full(Sex::Other, "intersex; fluid"), &ctx),
            "O;intersex\\; fluid"
        );
        assert_eq!(
            GenderScribe.write_text(&Gender::identity("it's complicated"), &ctx),
            ";it's complicated"
        );
    }

    #[test]
    fn identity_keeps_semicolons_past_the_limit() {
        let (parsed, _) = with_ctx(VCardVersion::V4_0, |ctx| {
            GenderScribe.parse_text("F;one;two", None, &mut VCardParameters::new(), ctx)
        });
        assert_eq!(parsed.unwrap(), Gender::full(Sex::Female, "one;two"));
    }

    #[test]
    fn invalid_sex_is_declined_with_warning() {
        let (parsed, warnings) = with_ctx(VCardVersion::V4_0, |ctx| {
            GenderScribe.parse_text("X;whatever", None, &mut VCardParameters::new(), ctx)
        });
        assert!(matches!(parsed, Err(ScribeError::CannotParse(_))));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningKind::InvalidSex.code());
    }

    #[test]
    fn xml_and_json_round_trip() {
        let gender = Gender::full(Sex::Female, "woman");
        let wctx = WriteContext::new(VCardVersion::V4_0);

        let mut element = XCardElement::new("gender");
        GenderScribe.write_xml(&gender, &mut element, &wctx);
        let (from_xml, _) = with_ctx(VCardVersion::V4_0, |ctx| {
            GenderScribe.parse_xml(&element, &mut VCardParameters::new(), ctx)
        });
        assert_eq!(from_xml.unwrap(), gender);

        let json = GenderScribe.write_json(&gender, &wctx);
        let (from_json, _) = with_ctx(VCardVersion::V4_0, |ctx| {
            GenderScribe.parse_json(&json, None, &mut VCardParameters::new(), ctx)
        });
        assert_eq!(from_json.unwrap(), gender);
    }
}
