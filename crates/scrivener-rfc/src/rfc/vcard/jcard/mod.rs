//! jCard (RFC 7095): vCard 4.0 as JSON.
//!
//! A card is `["vcard", [property, ...]]` and each property is
//! `[name, {parameters}, type, value, ...]`. The property group travels as
//! the `group` parameter.

pub mod value;

pub use value::JCardValue;

use serde_json::{Map, Value, json};

use crate::error::RfcResult;
use crate::rfc::vcard::core::parameter::names as param;
use crate::rfc::vcard::core::property::names;
use crate::rfc::vcard::core::{VCard, VCardDataType, VCardParameters, VCardVersion};
use crate::rfc::vcard::normalize::DocumentContext;
use crate::rfc::vcard::scribe::{RawPropertyUnit, RawValue, ScribeIndex, WriteContext, xml_type_name};
use crate::rfc::vcard::warning::{ParseContext, ParseWarning, WarningKind};

const VCARD: &str = "vcard";
const GROUP: &str = "group";

/// Builds the parameter object. `VALUE` is left out; the type slot
/// carries it.
#[must_use]
pub fn write_parameters(parameters: &VCardParameters, group: Option<&str>) -> Map<String, Value> {
    let mut object = Map::new();

    for parameter in parameters {
        if parameter.name.eq_ignore_ascii_case(param::VALUE) {
            continue;
        }
        let value = match parameter.values.as_slice() {
            [single] => json!(single),
            values => json!(values),
        };
        object.insert(parameter.name.to_ascii_lowercase(), value);
    }

    if let Some(group) = group {
        object.insert(GROUP.to_string(), json!(group));
    }

    object
}

/// Reads a parameter object, returning the parameters and the group.
#[must_use]
pub fn read_parameters(object: &Map<String, Value>) -> (VCardParameters, Option<String>) {
    let mut parameters = VCardParameters::new();
    let mut group = None;

    for (name, value) in object {
        if name.eq_ignore_ascii_case(GROUP) {
            group = value.as_str().map(str::to_string);
            continue;
        }
        let name = name.to_ascii_uppercase();
        match value {
            Value::Array(values) => parameters.put_all(&name, values.iter().map(scalar_text)),
            other => parameters.put(&name, scalar_text(other)),
        }
    }

    (parameters, group)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn write_card(card: &VCard, index: &ScribeIndex, ctx: &WriteContext) -> RfcResult<Value> {
    let doc = DocumentContext::new(card);
    let mut properties = vec![json!([
        names::VERSION.to_ascii_lowercase(),
        {},
        VCardDataType::Text.as_str(),
        ctx.version.as_str()
    ])];

    for property in card.properties() {
        let property = property.as_ref();
        let scribe = index.by_property(property)?;
        let prepared = index.prepare(property, ctx.version, &doc)?;
        if !ctx.writes(&prepared.name) {
            tracing::debug!(name = %prepared.name, "Dropping property the version does not define");
            continue;
        }

        let mut array = vec![
            Value::String(prepared.name.to_ascii_lowercase()),
            Value::Object(write_parameters(&prepared.parameters, prepared.group.as_deref())),
            Value::String(xml_type_name(prepared.data_type.as_ref()).to_string()),
        ];
        array.extend(scribe.write_json(property, ctx)?.into_values());
        properties.push(Value::Array(array));
    }

    Ok(json!([VCARD, properties]))
}

/// Writes cards as jCard. One card becomes a single `["vcard", ...]`
/// array, several become an array of those. jCard only exists for 4.0, so
/// the version in `ctx` is ignored.
///
/// ## Errors
/// [`RfcError::UnregisteredProperty`](crate::error::RfcError::UnregisteredProperty)
/// if a card holds a property type without a scribe, checked before
/// anything is written.
#[tracing::instrument(skip(cards, index, ctx), fields(cards = cards.len()))]
pub fn write_jcard(cards: &[VCard], index: &ScribeIndex, ctx: &WriteContext) -> RfcResult<String> {
    for card in cards {
        index.check_document(card)?;
    }

    let ctx = WriteContext {
        version: VCardVersion::V4_0,
        ..*ctx
    };
    let mut written = cards
        .iter()
        .map(|card| write_card(card, index, &ctx))
        .collect::<RfcResult<Vec<_>>>()?;

    let document = if written.len() == 1 {
        written.remove(0)
    } else {
        Value::Array(written)
    };
    Ok(serde_json::to_string(&document)?)
}

/// Reads one card or an array of cards.
///
/// ## Errors
/// [`RfcError::Json`](crate::error::RfcError::Json) if the input is not
/// JSON. Properties with the wrong shape are skipped with a warning.
#[tracing::instrument(skip(json, index, warnings), fields(json_len = json.len()))]
pub fn read_jcard(
    json: &str,
    index: &ScribeIndex,
    warnings: &mut Vec<ParseWarning>,
) -> RfcResult<Vec<VCard>> {
    let document: Value = serde_json::from_str(json)?;

    let is_card = |value: &Value| value.get(0).and_then(Value::as_str) == Some(VCARD);
    let cards: Vec<&Value> = if is_card(&document) {
        vec![&document]
    } else {
        document.as_array().map(|a| a.iter().collect()).unwrap_or_default()
    };

    let mut read = Vec::with_capacity(cards.len());
    for card_value in cards {
        let mut ctx = ParseContext::new(VCardVersion::V4_0, warnings);
        let Some(properties) = card_value
            .as_array()
            .filter(|_| is_card(card_value))
            .and_then(|a| a.get(1))
            .and_then(Value::as_array)
        else {
            ctx.add_warning(WarningKind::UnexpectedJson, &["expected [\"vcard\", [...]]"]);
            continue;
        };

        let mut card = VCard::with_version(VCardVersion::V4_0);
        for property in properties {
            read_property(property, index, &mut card, warnings);
        }
        read.push(card);
    }

    tracing::debug!(cards = read.len(), "Read jCard document");
    Ok(read)
}

fn read_property(property: &Value, index: &ScribeIndex, card: &mut VCard, warnings: &mut Vec<ParseWarning>) {
    let shape = property.as_array().and_then(|array| match array.as_slice() {
        [Value::String(name), Value::Object(params), Value::String(data_type), values @ ..]
            if !values.is_empty() =>
        {
            Some((name, params, data_type, values))
        }
        _ => None,
    });

    let Some((name, params, data_type, values)) = shape else {
        let mut ctx = ParseContext::new(VCardVersion::V4_0, warnings);
        ctx.add_warning(WarningKind::UnexpectedJson, &[&property.to_string()]);
        return;
    };

    if name.eq_ignore_ascii_case(names::VERSION) {
        if values.first().and_then(Value::as_str).and_then(VCardVersion::parse) != Some(VCardVersion::V4_0) {
            let mut ctx = ParseContext::new(VCardVersion::V4_0, warnings);
            ctx.property_name = Some(names::VERSION.to_string());
            ctx.add_warning(WarningKind::UnknownVersion, &[&scalar_text(&values[0])]);
        }
        return;
    }

    let (parameters, group) = read_parameters(params);
    let value = JCardValue::from_values(values.to_vec());
    let data_type = (data_type != "unknown").then(|| VCardDataType::parse(data_type));

    let unit = RawPropertyUnit {
        group,
        parameters,
        data_type,
        ..RawPropertyUnit::new(name.to_ascii_uppercase(), RawValue::Json(&value), VCardVersion::V4_0)
    };
    if let Some(property) = index.unmarshal(unit, warnings) {
        card.add_boxed(property);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::{Address, Categories, Email, FormattedName, RawProperty};

    #[test_log::test]
    fn writes_rfc_shape() {
        let mut card = VCard::new();
        card.add_property(FormattedName::new("John Doe"));
        let mut email = Email::new("john@example.com");
        email.group = Some("item1".to_string());
        email.parameters.add_type("work");
        email.parameters.add_type("home");
        card.add_property(email);

        let json = write_jcard(
            std::slice::from_ref(&card),
            &ScribeIndex::standard(),
            &WriteContext::new(VCardVersion::V4_0),
        )
        .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            json!(["vcard", [
                ["version", {}, "text", "4.0"],
                ["fn", {}, "text", "John Doe"],
                ["email", {"type": ["work", "home"], "group": "item1"}, "text", "john@example.com"]
            ]])
        );
    }

    #[test_log::test]
    fn round_trip_keeps_structure() {
        let mut card = VCard::new();
        card.add_property(Address {
            street: vec!["1 Main St".to_string()],
            locality: vec!["Springfield".to_string()],
            ..Address::default()
        });
        card.add_property(Categories::new(["a", "b"]));
        card.add_property(RawProperty::new("X-PET", "cat"));

        let index = ScribeIndex::standard();
        let json = write_jcard(
            std::slice::from_ref(&card),
            &index,
            &WriteContext::new(VCardVersion::V4_0),
        )
        .unwrap();

        let mut warnings = Vec::new();
        let cards = read_jcard(&json, &index, &mut warnings).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
        let read = &cards[0];
        assert_eq!(read.property::<Address>(), card.property::<Address>());
        assert_eq!(read.property::<Categories>(), card.property::<Categories>());
        assert_eq!(read.property::<RawProperty>().map(|p| p.value.as_str()), Some("cat"));
    }

    #[test_log::test]
    fn unknown_property_keeps_every_value() {
        let index = ScribeIndex::standard();
        let ctx = WriteContext::new(VCardVersion::V4_0);

        for property in [
            json!(["x-foo", {}, "text", "a", "b"]),
            json!(["x-foo", {}, "unknown", ["a", "b"]]),
            json!(["x-foo", {}, "unknown", ["a", "", ["b", "c"]]]),
        ] {
            let document = json!(["vcard", [property.clone()]]).to_string();
            let mut warnings = Vec::new();
            let cards = read_jcard(&document, &index, &mut warnings).unwrap();
            assert!(warnings.is_empty(), "{warnings:?}");

            let written: Value = serde_json::from_str(&write_jcard(&cards, &index, &ctx).unwrap()).unwrap();
            assert_eq!(
                written,
                json!(["vcard", [["version", {}, "text", "4.0"], property]])
            );
        }
    }

    #[test_log::test]
    fn bad_shapes_become_warnings() {
        let json = r#"[["vcard", [["fn", {}, "text", "A"], ["broken"], 7]], ["not a card"]]"#;
        let mut warnings = Vec::new();
        let cards = read_jcard(json, &ScribeIndex::standard(), &mut warnings).unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].len(), 1);
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().all(|w| w.code == WarningKind::UnexpectedJson.code()));
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut warnings = Vec::new();
        assert!(read_jcard("[\"vcard\"", &ScribeIndex::standard(), &mut warnings).is_err());
    }
}
