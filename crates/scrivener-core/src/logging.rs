//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Handle used to swap the active filter once configuration is loaded.
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// ## Summary
/// Installs the global subscriber with a reloadable filter starting at
/// `initial_level`.
///
/// ## Errors
/// Returns an error if a global subscriber is already installed.
pub fn init(initial_level: &str) -> anyhow::Result<FilterHandle> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new(initial_level));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()?;

    Ok(filter_handle)
}

/// ## Summary
/// Applies a configured level to a running subscriber. Invalid levels keep
/// the current filter.
pub fn apply_level(handle: &FilterHandle, level: &str) {
    if let Ok(filter) = EnvFilter::try_new(level) {
        if let Err(e) = handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %level, "Invalid log level in config, keeping current filter");
    }
}
