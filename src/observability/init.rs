//! Subscriber setup.

use super::exporter;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name reported in the trace resource.
pub const SERVICE_NAME: &str = "tabsift";

/// Installs the global subscriber with OTLP file export.
///
/// The filter comes from `RUST_LOG` when set, then `config.trace_level`,
/// then `"info"`. Spans go to `<data_dir>/tabsift-otlp.json`.
///
/// Tracing is optional: if the data directory cannot be created the
/// function returns without installing anything. Calling it twice is
/// harmless; only the first subscriber is kept.
///
/// # Example
///
/// ```rust,no_run
/// use tabsift::observability::init_tracing;
/// use tabsift::Config;
///
/// init_tracing(&Config::default());
/// tracing::info!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or("info"))
    });

    let data_dir = crate::infrastructure::paths::data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        SERVICE_NAME,
    )]);

    let provider =
        exporter::create_tracer_provider(data_dir.join("tabsift-otlp.json"), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init();
}
