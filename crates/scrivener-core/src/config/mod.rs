use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub marshal: MarshalConfig,
    pub logging: LoggingConfig,
}

/// Syntax the command line tool writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSyntax {
    Text,
    Json,
    Xml,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarshalConfig {
    /// Target vCard version for writes ("2.1", "3.0" or "4.0").
    pub version: String,
    /// Keep empty trailing components of structured values.
    pub include_trailing_semicolons: bool,
    /// Apply RFC 6868 caret encoding to parameter values.
    pub caret_encoding: bool,
    /// Drop properties the target version does not define.
    pub version_strict: bool,
    pub output: OutputSyntax,
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            version: "4.0".to_string(),
            include_trailing_semicolons: false,
            caret_encoding: true,
            version_strict: true,
            output: OutputSyntax::Text,
        }
    }
}

impl MarshalConfig {
    /// ## Errors
    /// [`CoreError::InvalidConfiguration`] if the version is not one of
    /// "2.1", "3.0" or "4.0".
    pub fn validate(&self) -> CoreResult<()> {
        match self.version.trim() {
            "2.1" | "3.0" | "4.0" => Ok(()),
            other => Err(CoreError::InvalidConfiguration(format!(
                "marshal.version must be 2.1, 3.0 or 4.0, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional
    /// `scrivener.toml` into a `Settings`. Environment variables take
    /// precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> CoreResult<Self> {
        let settings: Self = Config::builder()
            .set_default("marshal.version", "4.0")?
            .set_default("marshal.include_trailing_semicolons", false)?
            .set_default("marshal.caret_encoding", true)?
            .set_default("marshal.version_strict", true)?
            .set_default("marshal.output", "text")?
            .set_default("logging.level", "info")?
            // TOML file
            .add_source(config::File::with_name("scrivener.toml").required(false))
            // Env file
            .add_source(
                config::Environment::with_prefix("SCRIVENER")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.marshal.validate()?;
        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> CoreResult<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
