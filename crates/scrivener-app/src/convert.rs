//! Reads cards in whatever syntax the input is in and writes them in the
//! configured one.

use std::sync::Arc;

use scrivener_core::config::{MarshalConfig, OutputSyntax};
use scrivener_rfc::error::RfcError;
use scrivener_rfc::rfc::vcard::core::version::XCARD_NS;
use scrivener_rfc::rfc::vcard::{
    ParseWarning, ScribeIndex, TextMarshaller, VCard, VCardVersion, ValidationWarning, WriteContext,
    read_hcard, read_jcard, read_xcard, write_jcard, write_xcard,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Rfc(#[from] RfcError),

    #[error("No vCards found in {0:?} input")]
    NoCards(InputSyntax),
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Syntax of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSyntax {
    Text,
    XCard,
    JCard,
    HCard,
}

impl InputSyntax {
    /// Guesses the syntax from the start of the document. Markup in the
    /// xCard namespace is xCard; any other markup is treated as an hCard
    /// page.
    #[must_use]
    pub fn detect(input: &str) -> Self {
        let trimmed = input.trim_start_matches('\u{feff}').trim_start();
        if trimmed.starts_with('[') {
            Self::JCard
        } else if trimmed.starts_with('<') {
            if trimmed.contains(XCARD_NS) {
                Self::XCard
            } else {
                Self::HCard
            }
        } else {
            Self::Text
        }
    }
}

/// Result of one conversion.
#[derive(Debug, Clone)]
pub struct Converted {
    pub input: InputSyntax,
    pub cards: usize,
    pub warnings: Vec<ParseWarning>,
    /// Validation findings for the target version, with the property name.
    pub validation: Vec<(String, ValidationWarning)>,
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct Converter {
    index: Arc<ScribeIndex>,
    text: TextMarshaller,
    ctx: WriteContext,
    output: OutputSyntax,
}

impl Converter {
    /// ## Errors
    /// Returns an error if the configured version is unknown.
    pub fn new(index: Arc<ScribeIndex>, config: &MarshalConfig) -> ConvertResult<Self> {
        Ok(Self {
            text: TextMarshaller::from_config(Arc::clone(&index), config)?,
            ctx: WriteContext::from_config(config)?,
            output: config.output,
            index,
        })
    }

    /// Reads every card in `input`.
    ///
    /// ## Errors
    /// Returns an error if markup or JSON input is malformed.
    pub fn read(&self, input: &str, warnings: &mut Vec<ParseWarning>) -> ConvertResult<(InputSyntax, Vec<VCard>)> {
        let syntax = InputSyntax::detect(input);
        tracing::debug!(?syntax, "Detected input syntax");

        let cards = match syntax {
            InputSyntax::Text => self.text.read(input, warnings),
            InputSyntax::XCard => read_xcard(input, &self.index, warnings)?,
            InputSyntax::JCard => read_jcard(input, &self.index, warnings)?,
            InputSyntax::HCard => read_hcard(input, &self.index, warnings)?,
        };
        Ok((syntax, cards))
    }

    /// Writes `cards` in the configured output syntax.
    ///
    /// ## Errors
    /// Returns an error if a card holds a property without a scribe.
    pub fn write(&self, cards: &[VCard]) -> ConvertResult<String> {
        let output = match self.output {
            OutputSyntax::Text => self.text.write_all(cards)?,
            OutputSyntax::Json => write_jcard(cards, &self.index, &self.ctx)?,
            OutputSyntax::Xml => write_xcard(cards, &self.index, &self.ctx)?,
        };
        Ok(output)
    }

    /// Reads `input`, validates the cards for the target version and writes
    /// them out.
    ///
    /// ## Errors
    /// [`ConvertError::NoCards`] if the input holds no card, otherwise see
    /// [`read`](Self::read) and [`write`](Self::write).
    #[tracing::instrument(skip(self, input), fields(input_len = input.len(), output = ?self.output))]
    pub fn convert(&self, input: &str) -> ConvertResult<Converted> {
        let mut warnings = Vec::new();
        let (syntax, cards) = self.read(input, &mut warnings)?;
        if cards.is_empty() {
            return Err(ConvertError::NoCards(syntax));
        }

        let target = match self.output {
            OutputSyntax::Text => self.text.version(),
            OutputSyntax::Json | OutputSyntax::Xml => VCardVersion::V4_0,
        };
        let mut validation = Vec::new();
        for card in &cards {
            validation.extend(self.index.validate(card, target)?);
        }

        Ok(Converted {
            input: syntax,
            cards: cards.len(),
            output: self.write(&cards)?,
            warnings,
            validation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter(output: OutputSyntax, version: &str) -> Converter {
        let config = MarshalConfig {
            version: version.to_string(),
            output,
            ..MarshalConfig::default()
        };
        Converter::new(Arc::new(ScribeIndex::standard()), &config).unwrap()
    }

    #[test]
    fn detects_syntax() {
        assert_eq!(InputSyntax::detect("BEGIN:VCARD\r\n"), InputSyntax::Text);
        assert_eq!(InputSyntax::detect("  [\"vcard\", []]"), InputSyntax::JCard);
        assert_eq!(
            InputSyntax::detect("<vcards xmlns=\"urn:ietf:params:xml:ns:vcard-4.0\"/>"),
            InputSyntax::XCard
        );
        assert_eq!(InputSyntax::detect("<html><body/></html>"), InputSyntax::HCard);
    }

    #[test_log::test]
    fn text_to_jcard() {
        let converted = converter(OutputSyntax::Json, "4.0")
            .convert("BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Jane\r\nEND:VCARD\r\n")
            .unwrap();

        assert_eq!(converted.input, InputSyntax::Text);
        assert_eq!(converted.cards, 1);
        assert_eq!(
            converted.output,
            r#"["vcard",[["version",{},"text","4.0"],["fn",{},"text","Jane"]]]"#
        );
    }

    #[test_log::test]
    fn validation_is_reported_for_target_version() {
        let converted = converter(OutputSyntax::Text, "3.0")
            .convert("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane\r\nGENDER:F\r\nEND:VCARD\r\n")
            .unwrap();

        assert!(converted.validation.iter().any(|(name, _)| name == "GENDER"));
        assert!(!converted.output.contains("GENDER"));
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = converter(OutputSyntax::Text, "4.0").convert("").unwrap_err();
        assert!(matches!(err, ConvertError::NoCards(InputSyntax::Text)));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let config = MarshalConfig {
            version: "5.0".to_string(),
            ..MarshalConfig::default()
        };
        assert!(Converter::new(Arc::new(ScribeIndex::standard()), &config).is_err());
    }
}
