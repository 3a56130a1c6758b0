//! Writing and reading unfolded text content lines.
//!
//! [`TextMarshaller`] drives the scribes over whole cards. Line folding and
//! charset handling are left to the caller: every logical line is written
//! on one physical line and read back the same way.

mod escape;

use std::sync::Arc;

use scrivener_core::config::MarshalConfig;

pub use escape::escape_param_value;

use crate::error::RfcResult;
use crate::rfc::vcard::core::parameter::names as param;
use crate::rfc::vcard::core::property::names;
use crate::rfc::vcard::core::{Address, Label, VCard, VCardProperty, VCardVersion};
use crate::rfc::vcard::normalize::DocumentContext;
use crate::rfc::vcard::parse::parse_content_line;
use crate::rfc::vcard::rules;
use crate::rfc::vcard::scribe::{PreparedProperty, RawPropertyUnit, RawValue, ScribeIndex, WriteContext};
use crate::rfc::vcard::warning::{ParseContext, ParseWarning, WarningKind};

const CRLF: &str = "\r\n";
const VCARD: &str = "VCARD";

/// Reads and writes cards as content lines.
#[derive(Debug, Clone)]
pub struct TextMarshaller {
    index: Arc<ScribeIndex>,
    ctx: WriteContext,
    caret_encoding: bool,
}

impl TextMarshaller {
    /// A marshaller for `version` with the default settings.
    #[must_use]
    pub fn new(index: Arc<ScribeIndex>, version: VCardVersion) -> Self {
        Self {
            index,
            ctx: WriteContext::new(version),
            caret_encoding: true,
        }
    }

    /// ## Errors
    /// Returns [`RfcError::CoreError`](crate::error::RfcError::CoreError)
    /// if the configuration is invalid.
    pub fn from_config(index: Arc<ScribeIndex>, config: &MarshalConfig) -> RfcResult<Self> {
        Ok(Self {
            index,
            ctx: WriteContext::from_config(config)?,
            caret_encoding: config.caret_encoding,
        })
    }

    #[must_use]
    pub fn with_caret_encoding(mut self, caret_encoding: bool) -> Self {
        self.caret_encoding = caret_encoding;
        self
    }

    #[must_use]
    pub fn with_version_strict(mut self, version_strict: bool) -> Self {
        self.ctx.version_strict = version_strict;
        self
    }

    #[must_use]
    pub fn with_trailing_semicolons(mut self, include: bool) -> Self {
        self.ctx.include_trailing_semicolons = include;
        self
    }

    #[must_use]
    pub fn version(&self) -> VCardVersion {
        self.ctx.version
    }

    /// Writes `card` as content lines for the marshaller's version,
    /// `BEGIN` through `END`.
    ///
    /// ## Errors
    /// [`RfcError::UnregisteredProperty`](crate::error::RfcError::UnregisteredProperty)
    /// if the card holds a property type without a scribe. Nothing is
    /// written in that case.
    #[tracing::instrument(skip(self, card), fields(properties = card.len(), version = %self.ctx.version))]
    pub fn write_lines(&self, card: &VCard) -> RfcResult<Vec<String>> {
        self.index.check_document(card)?;

        let version = self.ctx.version;
        let doc = DocumentContext::new(card);
        let mut lines = vec![
            format!("{}:{VCARD}", names::BEGIN),
            format!("{}:{}", names::VERSION, version),
        ];

        for property in card.properties() {
            let property = property.as_ref();
            self.write_property(property, &doc, &mut lines)?;

            if rules::supported(names::LABEL, version)
                && let Some(address) = property.downcast_ref::<Address>()
                && let Some(label) = address.label()
            {
                let mut synthesized = Label::new(label);
                synthesized.group.clone_from(&address.group);
                synthesized
                    .parameters
                    .put_all(param::TYPE, address.parameters.types());
                self.write_property(&synthesized, &doc, &mut lines)?;
            }
        }

        lines.push(format!("{}:{VCARD}", names::END));
        tracing::debug!(lines = lines.len(), "Wrote vCard");
        Ok(lines)
    }

    /// Writes `card` as a CRLF-terminated string.
    ///
    /// ## Errors
    /// See [`write_lines`](Self::write_lines).
    pub fn write(&self, card: &VCard) -> RfcResult<String> {
        let mut out = String::new();
        for line in self.write_lines(card)? {
            out.push_str(&line);
            out.push_str(CRLF);
        }
        Ok(out)
    }

    /// Writes several cards back to back.
    ///
    /// ## Errors
    /// See [`write_lines`](Self::write_lines).
    pub fn write_all(&self, cards: &[VCard]) -> RfcResult<String> {
        cards.iter().map(|card| self.write(card)).collect()
    }

    fn write_property(
        &self,
        property: &dyn VCardProperty,
        doc: &DocumentContext<'_>,
        lines: &mut Vec<String>,
    ) -> RfcResult<()> {
        let version = self.ctx.version;
        let scribe = self.index.by_property(property)?;

        let name = scribe.property_name(property)?;
        if !self.ctx.writes(&name) {
            tracing::debug!(%name, %version, "Dropping property the version does not define");
            return Ok(());
        }

        let prepared = self.index.prepare(property, version, doc)?;
        let value = scribe.write_text(property, &self.ctx)?;
        lines.push(self.content_line(&prepared, &value));
        Ok(())
    }

    fn content_line(&self, prepared: &PreparedProperty, value: &str) -> String {
        let mut line = String::new();
        if let Some(group) = &prepared.group {
            line.push_str(group);
            line.push('.');
        }
        line.push_str(&prepared.name);

        if let Some(data_type) = prepared.explicit_data_type() {
            let data_type = match self.ctx.version {
                VCardVersion::V2_1 => data_type.as_str().to_ascii_uppercase(),
                _ => data_type.as_str().to_string(),
            };
            self.push_parameter(&mut line, param::VALUE, &[data_type]);
        }

        for parameter in &prepared.parameters {
            self.push_parameter(&mut line, &parameter.name, &parameter.values);
        }

        line.push(':');
        line.push_str(value);
        line
    }

    /// 2.1 has no comma-separated parameter values, so each value gets its
    /// own parameter there.
    fn push_parameter(&self, line: &mut String, name: &str, values: &[String]) {
        let escaped = values
            .iter()
            .map(|value| escape_param_value(value, self.caret_encoding));

        if self.ctx.version == VCardVersion::V2_1 {
            for value in escaped {
                line.push(';');
                line.push_str(name);
                line.push('=');
                line.push_str(&value);
            }
        } else {
            line.push(';');
            line.push_str(name);
            line.push('=');
            line.push_str(&escaped.collect::<Vec<_>>().join(","));
        }
    }

    /// Reads every card in `input`, one content line per physical line.
    ///
    /// Properties before a `VERSION` line are read as 2.1. Malformed lines
    /// and lines outside `BEGIN:VCARD`/`END:VCARD` are skipped with a
    /// warning; a card missing its `END` is kept.
    #[tracing::instrument(skip(self, input, warnings), fields(input_len = input.len()))]
    pub fn read(&self, input: &str, warnings: &mut Vec<ParseWarning>) -> Vec<VCard> {
        let mut cards = Vec::new();
        let mut current: Option<VCard> = None;

        for (index, line) in input.lines().enumerate() {
            let line_num = index + 1;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let version = current.as_ref().map_or(VCardVersion::V2_1, |card| card.version);
            let mut ctx = ParseContext::new(version, warnings);
            ctx.line = Some(line_num);

            let content = match parse_content_line(line, line_num, self.caret_encoding) {
                Ok(content) => content,
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping malformed line");
                    ctx.add_warning(WarningKind::MalformedLine, &[&err.message]);
                    continue;
                }
            };
            ctx.property_name = Some(content.name.clone());

            if content.name.eq_ignore_ascii_case(names::BEGIN) {
                if content.value.eq_ignore_ascii_case(VCARD) {
                    cards.extend(current.replace(VCard::with_version(VCardVersion::V2_1)));
                }
                continue;
            }
            if content.name.eq_ignore_ascii_case(names::END) {
                if content.value.eq_ignore_ascii_case(VCARD) {
                    cards.extend(current.take());
                }
                continue;
            }

            let Some(card) = current.as_mut() else {
                ctx.add_warning(WarningKind::MalformedLine, &["outside of BEGIN:VCARD"]);
                continue;
            };

            if content.name.eq_ignore_ascii_case(names::VERSION) {
                match VCardVersion::parse(&content.value) {
                    Some(version) => card.version = version,
                    None => ctx.add_warning(WarningKind::UnknownVersion, &[&content.value]),
                }
                continue;
            }

            let unit = RawPropertyUnit {
                group: content.group,
                name: content.name,
                parameters: content.parameters,
                data_type: None,
                value: RawValue::Text(&content.value),
                version: card.version,
                line: Some(line_num),
            };
            if let Some(property) = self.index.unmarshal(unit, warnings) {
                card.add_boxed(property);
            }
        }

        cards.extend(current);
        tracing::debug!(cards = cards.len(), warnings = warnings.len(), "Read vCards");
        cards
    }
}
