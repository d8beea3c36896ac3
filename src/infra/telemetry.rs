use std::{io, sync::Once};

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::{
    application::render::{
        METRIC_RENDER_DEGRADED_TOTAL, METRIC_RENDER_DOCUMENTS_TOTAL, METRIC_RENDER_MS,
    },
    config::{LogFormat, LoggingSettings},
};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
/// Logs go to stderr so rendered output on stdout stays clean.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
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
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// Register metric descriptions with the installed recorder. Idempotent.
pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_RENDER_DOCUMENTS_TOTAL,
            Unit::Count,
            "Total number of documents rendered."
        );
        describe_counter!(
            METRIC_RENDER_DEGRADED_TOTAL,
            Unit::Count,
            "Total number of nodes rendered as nothing or as a fallback, by reason."
        );
        describe_histogram!(
            METRIC_RENDER_MS,
            Unit::Milliseconds,
            "Document render latency in milliseconds."
        );
    });
}
