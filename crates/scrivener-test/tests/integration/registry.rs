//! Tests for registering custom scribes.

use std::any::Any;
use std::sync::Arc;

use scrivener_test::component::error::RfcError;
use scrivener_test::component::vcard::scribe::{ScribeResult, WriteContext};
use scrivener_test::component::vcard::warning::ParseContext;
use scrivener_test::component::vcard::{
    PropertyScribe, RawProperty, ScribeError, ScribeIndex, TextMarshaller, VCard, VCardDataType,
    VCardParameters, VCardProperty, VCardVersion, WarningKind, read_xcard, write_xcard,
};

/// `X-SCORE`, an integer-valued extension property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Score {
    parameters: VCardParameters,
    group: Option<String>,
    value: i64,
}

impl VCardProperty for Score {
    fn parameters(&self) -> &VCardParameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut VCardParameters {
        &mut self.parameters
    }

    fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    fn set_group(&mut self, group: Option<String>) {
        self.group = group;
    }

    fn clone_box(&self) -> Box<dyn VCardProperty> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct ScoreScribe;

impl PropertyScribe for ScoreScribe {
    type Property = Score;

    fn name(&self) -> &str {
        "X-SCORE"
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Integer)
    }

    fn write_text(&self, property: &Score, _ctx: &WriteContext) -> String {
        property.value.to_string()
    }

    fn parse_text(
        &self,
        value: &str,
        _data_type: Option<&VCardDataType>,
        _parameters: &mut VCardParameters,
        _ctx: &mut ParseContext<'_>,
    ) -> ScribeResult<Score> {
        let value = value
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ScribeError::CannotParse(e.to_string()))?;
        Ok(Score {
            value,
            ..Score::default()
        })
    }
}

fn registered() -> Arc<ScribeIndex> {
    let mut index = ScribeIndex::standard();
    index.register(ScoreScribe).expect("name is free");
    Arc::new(index)
}

fn score(value: i64) -> Score {
    Score {
        value,
        ..Score::default()
    }
}

/// ## Summary
/// A registered scribe reads and writes its property in every syntax.
#[test_log::test]
fn custom_scribe_round_trips() {
    let index = registered();
    let marshaller = TextMarshaller::new(Arc::clone(&index), VCardVersion::V4_0);

    let mut warnings = Vec::new();
    let cards = marshaller.read(
        "BEGIN:VCARD\r\nVERSION:4.0\r\nX-SCORE:42\r\nEND:VCARD\r\n",
        &mut warnings,
    );
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(cards[0].property::<Score>(), Some(&score(42)));

    let xml = write_xcard(&cards, &index, &WriteContext::new(VCardVersion::V4_0)).expect("writes");
    assert!(xml.contains("<x-score><integer>42</integer></x-score>"), "{xml}");

    let read = read_xcard(&xml, &index, &mut warnings).expect("parses");
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(read[0].property::<Score>(), Some(&score(42)));
}

/// ## Summary
/// A value the scribe declines is kept raw, with a warning.
#[test_log::test]
fn declined_value_is_kept_raw() {
    let marshaller = TextMarshaller::new(registered(), VCardVersion::V4_0);
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nX-SCORE;X-SRC=web:lots\r\nEND:VCARD\r\n";

    let mut warnings = Vec::new();
    let cards = marshaller.read(input, &mut warnings);

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, WarningKind::Unparseable.code());
    assert_eq!(warnings[0].line, Some(3));

    let raw = cards[0].property::<RawProperty>().expect("kept raw");
    assert_eq!(raw.value, "lots");
    assert_eq!(marshaller.write(&cards[0]).expect("writes"), input);
}

/// ## Summary
/// Names and property types can only be registered once.
#[test]
fn duplicate_registration_is_rejected() {
    let mut index = ScribeIndex::standard();
    index.register(ScoreScribe).expect("name is free");

    let err = index.register(ScoreScribe).expect_err("already registered");
    assert!(matches!(err, RfcError::DuplicateRegistration(name) if name == "X-SCORE"));
}

/// ## Summary
/// Writing a property nobody registered fails before any output.
#[test]
fn unregistered_property_fails_write() {
    let mut card = VCard::new();
    card.add_property(score(1));

    let marshaller = TextMarshaller::new(Arc::new(ScribeIndex::standard()), VCardVersion::V4_0);
    let err = marshaller.write(&card).expect_err("no scribe for Score");
    assert!(matches!(err, RfcError::UnregisteredProperty(name) if name.ends_with("Score")));
}
