//! Tracing and metrics bootstrap, run once at startup.

use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static DESCRIBE_ONCE: Once = Once::new();

/// Install the global tracing subscriber.
///
/// The configured level acts as the default directive; `RUST_LOG` still
/// overrides individual targets.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    let filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default());

    let installed = match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact().with_target(true)).try_init(),
    };
    installed.map_err(|err| InfraError::telemetry(format!("subscriber install: {err}")))?;

    describe_metrics();
    Ok(())
}

fn describe_metrics() {
    DESCRIBE_ONCE.call_once(|| {
        describe_counter!(
            "brezza_cache_hit_total",
            Unit::Count,
            "View-data cache hits by key."
        );
        describe_counter!(
            "brezza_cache_miss_total",
            Unit::Count,
            "View-data cache misses by key."
        );
        describe_histogram!(
            "brezza_cache_consume_ms",
            Unit::Milliseconds,
            "Latency of one cache event consumption batch."
        );
    });
}
