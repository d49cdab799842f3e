use color_eyre::eyre::WrapErr as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig as _;
use opentelemetry_sdk::{trace::Tracer, Resource};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{
    layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter, Registry,
};
use tracing_tree::HierarchicalLayer;

/// Initialise Sentry when `SENTRY_DSN` is set. Keep the guard alive for the
/// lifetime of the process so queued events get flushed.
pub fn setup_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok()?;

    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            traces_sample_rate: 1.0,
            ..Default::default()
        },
    )))
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr as an indented tree. When `OTEL_EXPORTER_OTLP_ENDPOINT`
/// is set, spans are also exported over OTLP/HTTP.
pub fn setup_tracing(crate_name: &str) -> color_eyre::Result<()> {
    let rust_log = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("info,{}=debug,tower_http=debug", crate_name));
    let env_filter = EnvFilter::try_new(&rust_log)
        .wrap_err_with(|| format!("Invalid RUST_LOG directive {:?}", rust_log))?;

    let otel_layer = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(endpoint) => Some(otel_layer(endpoint, crate_name)?),
        Err(_) => None,
    };

    let tree_layer = HierarchicalLayer::new(2)
        .with_targets(true)
        .with_bracketed_fields(true);

    tracing_subscriber::registry()
        .with(otel_layer)
        .with(tree_layer)
        .with(env_filter)
        .try_init()
        .wrap_err("Failed to install tracing subscriber")?;

    Ok(())
}

fn otel_layer(
    endpoint: String,
    service_name: &str,
) -> color_eyre::Result<OpenTelemetryLayer<Registry, Tracer>> {
    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .http()
                .with_endpoint(endpoint),
        )
        .with_trace_config(opentelemetry_sdk::trace::config().with_resource(Resource::new(
            vec![KeyValue::new("service.name", service_name.to_string())],
        )))
        .install_batch(opentelemetry_sdk::runtime::Tokio)
        .wrap_err("Failed to install OTLP exporter")?;

    Ok(tracing_opentelemetry::layer().with_tracer(tracer))
}
