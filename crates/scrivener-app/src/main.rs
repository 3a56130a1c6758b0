use std::io::Read;
use std::sync::Arc;

use scrivener_app::convert::Converter;
use scrivener_core::config::load_config;
use scrivener_core::logging;
use scrivener_rfc::rfc::vcard::ScribeIndex;

fn main() -> anyhow::Result<()> {
    let filter_handle = logging::init("info")?;

    let config = load_config()?;
    tracing::debug!(config = ?config, "Configuration loaded");
    logging::apply_level(&filter_handle, &config.logging.level);

    let input = match std::env::args().nth(1) {
        Some(path) if path != "-" => {
            tracing::info!(%path, "Reading input file");
            std::fs::read_to_string(&path)?
        }
        _ => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            input
        }
    };

    let converter = Converter::new(Arc::new(ScribeIndex::standard()), &config.marshal)?;
    let converted = converter.convert(&input)?;

    for warning in &converted.warnings {
        tracing::warn!(code = warning.code, "{warning}");
    }
    for (property, warning) in &converted.validation {
        tracing::warn!(%property, code = warning.code, "{warning}");
    }
    tracing::info!(
        cards = converted.cards,
        warnings = converted.warnings.len(),
        from = ?converted.input,
        "Converted"
    );

    print!("{}", converted.output);
    Ok(())
}
