use std::sync::Once;

use metrics::{Unit, describe_counter};
use thiserror::Error;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

static METRIC_DESCRIPTIONS: Once = Once::new();

#[derive(Debug, Error)]
#[error("telemetry initialization failed: {0}")]
pub struct TelemetryError(String);

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), TelemetryError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| TelemetryError(format!("failed to install tracing subscriber: {err}")))
}

/// Register descriptions for every metric the crate emits. Idempotent.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "partialcache_bypass_total",
            Unit::Count,
            "Renders served directly because caching is disabled."
        );
        describe_counter!(
            "partialcache_render_total",
            Unit::Count,
            "View renders performed by the cache facade."
        );
        describe_counter!(
            "partialcache_lookup_total",
            Unit::Count,
            "Cache lookups issued to the store, by scope."
        );
        describe_counter!(
            "partialcache_forget_total",
            Unit::Count,
            "Forget operations issued to the store, by scope."
        );
        describe_counter!(
            "partialcache_flush_total",
            Unit::Count,
            "Tag flushes issued to the store."
        );
        describe_counter!(
            "partialcache_store_hit_total",
            Unit::Count,
            "In-memory store hits."
        );
        describe_counter!(
            "partialcache_store_miss_total",
            Unit::Count,
            "In-memory store misses."
        );
        describe_counter!(
            "partialcache_store_evict_total",
            Unit::Count,
            "In-memory store evictions due to capacity."
        );
    });
}
