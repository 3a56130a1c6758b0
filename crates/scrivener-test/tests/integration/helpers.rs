#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides sample documents in each syntax and shortcuts for building
//! marshallers and converters with the standard registry.

use std::sync::Arc;

use scrivener_test::component::config::{MarshalConfig, OutputSyntax};
use scrivener_test::component::convert::Converter;
use scrivener_test::component::vcard::{ParseWarning, ScribeIndex, TextMarshaller, VCard, VCardVersion};

pub const TEXT_30: &str = "\
BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
FN:Jane Roe\r\n\
N:Roe;Jane;;;\r\n\
item1.EMAIL;TYPE=internet,pref:jane@example.com\r\n\
item1.X-ABLABEL:Work\r\n\
ADR;TYPE=work:;;2 Side Rd;Shelbyville;;;\r\n\
LABEL;TYPE=work:2 Side Rd\\nShelbyville\r\n\
ORG:Example Corp;Research\r\n\
END:VCARD\r\n";

pub const XCARD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<vcards xmlns="urn:ietf:params:xml:ns:vcard-4.0">
  <vcard>
    <fn><text>John Doe</text></fn>
    <n>
      <surname>Doe</surname>
      <given>John</given>
      <additional/>
      <prefix/>
      <suffix/>
    </n>
    <email>
      <parameters><type><text>work</text></type><pref><integer>1</integer></pref></parameters>
      <text>john@example.com</text>
    </email>
    <gender><sex>M</sex></gender>
  </vcard>
</vcards>"#;

pub const JCARD: &str = r#"["vcard",[
  ["version",{},"text","4.0"],
  ["fn",{},"text","Ann Lee"],
  ["categories",{},"text","friend","neighbor"],
  ["x-shoe-size",{},"integer",42]
]]"#;

pub const HCARD: &str = r#"<html xmlns="http://www.w3.org/1999/xhtml"><body>
<div class="vcard">
  <a class="fn email" href="mailto:sam@example.com">Sam Poe</a>
  <div class="org">Poe Industries</div>
  <div class="note">Met at the <b>conference</b></div>
</div>
</body></html>"#;

pub fn index() -> Arc<ScribeIndex> {
    Arc::new(ScribeIndex::standard())
}

pub fn marshaller(version: VCardVersion) -> TextMarshaller {
    TextMarshaller::new(index(), version)
}

pub fn read_text(input: &str) -> (Vec<VCard>, Vec<ParseWarning>) {
    let mut warnings = Vec::new();
    let cards = marshaller(VCardVersion::V4_0).read(input, &mut warnings);
    (cards, warnings)
}

pub fn converter(output: OutputSyntax, version: &str) -> Converter {
    let config = MarshalConfig {
        version: version.to_string(),
        output,
        ..MarshalConfig::default()
    };
    Converter::new(index(), &config).expect("valid configuration")
}
