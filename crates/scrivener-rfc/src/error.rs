use thiserror::Error;

/// vCard marshalling errors.
///
/// Data-quality problems in parsed input never surface here; they become
/// warnings. These variants cover setup mistakes and misuse of the write path.
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("No scribe registered for property type {0}")]
    UnregisteredProperty(String),

    #[error("A scribe is already registered for {0}")]
    DuplicateRegistration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Content line error: {0}")]
    ContentLine(#[from] crate::rfc::vcard::parse::ParseError),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    CoreError(#[from] scrivener_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
