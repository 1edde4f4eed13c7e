//! Logging and tracing bootstrap.

use anyhow::Context;
use shelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter. Installing twice is an error,
/// so callers that may race (tests) should use [`try_init`].
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = build_filter(&settings.log_filter)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    result
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| "failed to install tracing subscriber")?;

    tracing::info!(
        target: "shelf-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );

    Ok(())
}

/// Like [`init`] but ignores an already-installed subscriber.
pub fn try_init(settings: &TelemetrySettings) {
    init(settings).ok();
}

fn build_filter(directives: &str) -> anyhow::Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.is_empty() => EnvFilter::try_new(from_env)
            .with_context(|| format!("invalid {} directives", EnvFilter::DEFAULT_ENV)),
        _ => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter '{}'", directives)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_accepted() {
        let settings = TelemetrySettings::default();
        assert!(EnvFilter::try_new(&settings.log_filter).is_ok());
    }

    #[test]
    fn second_init_is_tolerated_by_try_init() {
        let settings = TelemetrySettings::default();
        try_init(&settings);
        try_init(&settings);
    }
}
