//! Tests for converting documents between syntaxes and versions.

use scrivener_test::component::config::OutputSyntax;
use scrivener_test::component::convert::{ConvertError, InputSyntax};
use scrivener_test::component::vcard::{
    Address, Categories, Email, FormattedName, Gender, Label, Note, Organization, RawProperty, Sex,
    StructuredName, VCardDataType, VCardVersion, WarningKind,
};

use super::helpers::*;

// ============================================================================
// Text input
// ============================================================================

/// ## Summary
/// A 3.0 card keeps its group, its legacy preference and its LABEL.
#[test_log::test]
fn reads_legacy_text() {
    let (cards, warnings) = read_text(TEXT_30);
    assert!(warnings.is_empty(), "{warnings:?}");

    let card = &cards[0];
    assert_eq!(card.version, VCardVersion::V3_0);
    assert_eq!(card.len(), 7);

    let email = card.property::<Email>().expect("email");
    assert_eq!(email.group.as_deref(), Some("item1"));
    assert!(email.parameters.has_type("pref"));

    let label = card.property::<RawProperty>().expect("extension");
    assert_eq!(label.name, "X-ABLABEL");
    assert_eq!(label.group.as_deref(), Some("item1"));

    assert_eq!(
        card.property::<Label>().and_then(|l| l.value.as_deref()),
        Some("2 Side Rd\nShelbyville")
    );
    assert_eq!(
        card.property::<Organization>().map(Organization::units),
        Some(&["Research".to_string()][..])
    );
}

/// ## Summary
/// Upgrading to 4.0 turns `TYPE=pref` into `PREF=1` and drops LABEL.
#[test_log::test]
fn upgrades_text_to_4_0() {
    let converted = converter(OutputSyntax::Text, "4.0")
        .convert(TEXT_30)
        .expect("conversion succeeds");

    let output = &converted.output;
    assert!(output.contains("VERSION:4.0\r\n"));
    assert!(output.contains("item1.EMAIL;TYPE=internet;PREF=1:jane@example.com\r\n"), "{output}");
    assert!(output.contains("item1.X-ABLABEL:Work\r\n"), "{output}");
    assert!(!output.contains("LABEL;"), "{output}");
    assert!(
        converted
            .validation
            .iter()
            .any(|(name, w)| name == "LABEL" && w.code == WarningKind::UnsupportedVersion.code())
    );
}

/// ## Summary
/// Text in, xCard out, xCard back in: the cards match.
#[test_log::test]
fn text_through_xcard() {
    let xml = converter(OutputSyntax::Xml, "4.0")
        .convert(TEXT_30)
        .expect("conversion succeeds")
        .output;
    assert!(xml.contains("<group name=\"item1\">"));

    let converter = converter(OutputSyntax::Text, "3.0");
    let mut warnings = Vec::new();
    let (syntax, cards) = converter.read(&xml, &mut warnings).expect("xCard parses");
    assert_eq!(syntax, InputSyntax::XCard);
    assert!(warnings.is_empty(), "{warnings:?}");

    let (original, _) = read_text(TEXT_30);
    assert_eq!(cards[0].property::<Email>().map(|e| e.value.clone()), original[0].property::<Email>().map(|e| e.value.clone()));
    assert_eq!(cards[0].property::<Address>(), original[0].property::<Address>());
    assert_eq!(cards[0].property::<StructuredName>(), original[0].property::<StructuredName>());
}

// ============================================================================
// Other syntaxes
// ============================================================================

/// ## Summary
/// xCard structured values and parameters arrive typed.
#[test_log::test]
fn reads_xcard() {
    let (cards, warnings) = {
        let mut warnings = Vec::new();
        let (_, cards) = converter(OutputSyntax::Text, "4.0")
            .read(XCARD, &mut warnings)
            .expect("xCard parses");
        (cards, warnings)
    };
    assert!(warnings.is_empty(), "{warnings:?}");

    let card = &cards[0];
    assert_eq!(
        card.property::<StructuredName>(),
        Some(&StructuredName::simple("Doe", "John"))
    );
    assert_eq!(card.property::<Email>().and_then(|e| e.parameters.pref()), Some(1));
    assert_eq!(card.property::<Gender>().and_then(|g| g.sex), Some(Sex::Male));
}

/// ## Summary
/// jCard multi-values and unknown typed properties survive into text.
#[test_log::test]
fn jcard_to_text() {
    let converted = converter(OutputSyntax::Text, "4.0")
        .convert(JCARD)
        .expect("conversion succeeds");
    assert_eq!(converted.input, InputSyntax::JCard);
    assert!(converted.warnings.is_empty(), "{:?}", converted.warnings);

    let output = &converted.output;
    assert!(output.contains("FN:Ann Lee\r\n"));
    assert!(output.contains("CATEGORIES:friend,neighbor\r\n"));
    assert!(output.contains("X-SHOE-SIZE;VALUE=integer:42\r\n"), "{output}");

    let (cards, _) = read_text(output);
    let raw = cards[0].property::<RawProperty>().expect("extension");
    assert_eq!(raw.data_type, Some(VCardDataType::Integer));
    assert_eq!(
        cards[0].property::<Categories>().map(|c| c.values.clone()),
        Some(vec!["friend".to_string(), "neighbor".to_string()])
    );
}

/// ## Summary
/// An hCard page becomes a card; one element may carry several properties.
#[test_log::test]
fn hcard_to_jcard() {
    let converted = converter(OutputSyntax::Json, "4.0")
        .convert(HCARD)
        .expect("conversion succeeds");
    assert_eq!(converted.input, InputSyntax::HCard);

    let value: serde_json::Value = serde_json::from_str(&converted.output).expect("valid JSON");
    let properties = value[1].as_array().expect("property list");
    let find = |name: &str| {
        properties
            .iter()
            .find(|p| p[0] == name)
            .map(|p| p[3].clone())
    };
    assert_eq!(find("fn"), Some(serde_json::json!("Sam Poe")));
    assert_eq!(find("email"), Some(serde_json::json!("sam@example.com")));
    assert_eq!(find("org"), Some(serde_json::json!("Poe Industries")));
    assert_eq!(find("note"), Some(serde_json::json!("Met at the conference")));
}

/// ## Summary
/// Input with no card is an error rather than empty output.
#[test]
fn empty_input() {
    let err = converter(OutputSyntax::Text, "4.0")
        .convert("NOTE:orphan\r\n")
        .expect_err("no cards");
    assert!(matches!(err, ConvertError::NoCards(InputSyntax::Text)));
}

/// ## Summary
/// Properties the target version lacks are dropped, or kept when
/// `version_strict` is off.
#[test_log::test]
fn version_strict_controls_dropping() {
    let (cards, _) = read_text("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:A\r\nGENDER:F\r\nNOTE:n\r\nEND:VCARD\r\n");
    let card = &cards[0];
    assert!(card.property::<Note>().is_some());
    assert!(card.property::<FormattedName>().is_some());

    let strict = marshaller(VCardVersion::V2_1).write(card).expect("writes");
    assert!(!strict.contains("GENDER"));

    let lenient = marshaller(VCardVersion::V2_1)
        .with_version_strict(false)
        .write(card)
        .expect("writes");
    assert!(lenient.contains("GENDER:F\r\n"));
}
