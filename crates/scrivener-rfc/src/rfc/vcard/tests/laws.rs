//! Behavior every marshaller relies on, checked end to end.

use std::sync::Arc;

use crate::rfc::vcard::codec::{decode, encode};
use crate::rfc::vcard::core::{Address, Email, Key, RawProperty, VCard, VCardVersion};
use crate::rfc::vcard::normalize::DocumentContext;
use crate::rfc::vcard::scribe::{RawPropertyUnit, RawValue, ScribeIndex};
use crate::rfc::vcard::TextMarshaller;

#[test]
fn structured_round_trip_keeps_empty_sub_values() {
    let components = vec![
        vec!["".to_string(), "x".to_string()],
        vec!["a".to_string()],
        vec![],
        vec!["b".to_string(), "".to_string()],
    ];
    let encoded = encode(&components, true);
    let decoded: Vec<Vec<String>> = decode(&encoded).collect();
    assert_eq!(decoded, components);
}

#[test]
fn special_characters_survive_encoding() {
    let components = [vec!["a;b", "c,d"]];
    let encoded = encode(&components, true);
    assert_eq!(encoded, "a\\;b,c\\,d");

    let decoded: Vec<Vec<String>> = decode(&encoded).collect();
    assert_eq!(decoded, vec![vec!["a;b".to_string(), "c,d".to_string()]]);

    let backslash = [vec!["C:\\dir"]];
    let decoded: Vec<Vec<String>> = decode(&encode(&backslash, true)).collect();
    assert_eq!(decoded, vec![vec!["C:\\dir".to_string()]]);
}

#[test]
fn short_values_pad_with_empty_components() {
    let mut it = decode("a;b");
    let components: Vec<Vec<String>> = (0..7).map(|_| it.next_component()).collect();

    let mut expected = vec![vec!["a".to_string()], vec!["b".to_string()]];
    expected.resize(7, Vec::new());
    assert_eq!(components, expected);
}

#[test]
fn trailing_empty_components_are_omitted() {
    let components: Vec<Vec<&str>> = vec![
        vec!["a"],
        vec![],
        vec!["c"],
        vec!["d"],
        vec![],
        vec![],
        vec![],
    ];
    let encoded = encode(&components, false);
    assert_eq!(encoded.split(';').count(), 4);
    assert_eq!(encode(&components, true).split(';').count(), 7);
}

#[test]
fn reference_replaces_inline_data() {
    let mut key = Key::from_data(vec![1, 2, 3], None);
    assert!(key.data().is_some());

    key.set_url("http://example.com/key.asc", None);
    assert!(key.data().is_none());
    assert!(key.text().is_none());
    assert_eq!(key.url(), Some("http://example.com/key.asc"));

    key.set_text("-----BEGIN PGP-----", None);
    assert!(key.url().is_none());
    assert_eq!(key.text(), Some("-----BEGIN PGP-----"));
}

#[test_log::test]
fn only_lowest_pref_is_marked_for_legacy_versions() {
    let mut card = VCard::new();
    for (value, pref) in [("a@example.com", 20), ("b@example.com", 10), ("c@example.com", 30)] {
        let mut email = Email::new(value);
        email.parameters.set_pref(Some(pref));
        if pref == 20 {
            email.parameters.add_type("pref");
        }
        card.add_property(email);
    }

    let marshaller = TextMarshaller::new(Arc::new(ScribeIndex::standard()), VCardVersion::V3_0);
    let lines = marshaller.write_lines(&card).unwrap();
    let emails: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|l| l.starts_with("EMAIL"))
        .collect();
    assert_eq!(
        emails,
        vec![
            "EMAIL:a@example.com",
            "EMAIL;TYPE=pref:b@example.com",
            "EMAIL:c@example.com",
        ]
    );

    // The card itself keeps its preferences.
    let prefs: Vec<Option<u32>> = card
        .properties_of::<Email>()
        .map(|e| e.parameters.pref())
        .collect();
    assert_eq!(prefs, vec![Some(20), Some(10), Some(30)]);
    assert!(card.property::<Email>().is_some_and(|e| e.parameters.has_type("pref")));
}

#[test_log::test]
fn label_is_stripped_from_a_copy() {
    let mut address = Address {
        street: vec!["1 Main St".to_string()],
        ..Address::default()
    };
    address.set_label(Some("1 Main St\nSpringfield"));
    let mut card = VCard::new();
    card.add_property(address);

    let index = ScribeIndex::standard();
    let property = card.properties()[0].as_ref();
    let doc = DocumentContext::new(&card);

    for version in [VCardVersion::V2_1, VCardVersion::V3_0] {
        let prepared = index.prepare(property, version, &doc).unwrap();
        assert!(prepared.parameters.label().is_none());
    }
    let prepared = index.prepare(property, VCardVersion::V4_0, &doc).unwrap();
    assert_eq!(prepared.parameters.label(), Some("1 Main St\nSpringfield"));

    assert_eq!(
        card.property::<Address>().and_then(Address::label),
        Some("1 Main St\nSpringfield")
    );
}

#[test_log::test]
fn unknown_names_come_back_byte_for_byte() {
    let index = ScribeIndex::standard();
    let value = "a\\;b;c\\,d\\n\\\\ ^e";

    for version in [VCardVersion::V2_1, VCardVersion::V3_0, VCardVersion::V4_0] {
        let mut warnings = Vec::new();
        let property = index
            .unmarshal(RawPropertyUnit::new("X-UNKNOWN", RawValue::Text(value), version), &mut warnings)
            .unwrap();
        assert!(warnings.is_empty());

        let raw = property.downcast_ref::<RawProperty>().unwrap();
        assert_eq!(raw.name, "X-UNKNOWN");
        assert_eq!(raw.value, value);
    }

    let line = "item2.X-Custom;X-A=1;VALUE=text:a\\;b;c\\,d";
    let input = format!("BEGIN:VCARD\r\nVERSION:4.0\r\n{line}\r\nEND:VCARD\r\n");
    let marshaller = TextMarshaller::new(Arc::new(index), VCardVersion::V4_0);
    let mut warnings = Vec::new();
    let cards = marshaller.read(&input, &mut warnings);
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(marshaller.write(&cards[0]).unwrap(), input);
}
