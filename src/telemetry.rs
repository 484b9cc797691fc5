//! Opt-in `tracing` subscriber setup for applications embedding Beacon.
//!
//! The library crates only emit events; nothing is installed unless the
//! application calls [`init_subscriber`].

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Service name reported on exported spans.
#[cfg(feature = "otel")]
pub const SERVICE_NAME: &str = "beacon";

/// Install a global fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// With the `otel` feature and `otlp_endpoint` set, spans are also exported
/// over OTLP/gRPC. If the exporter cannot be built the fmt subscriber is
/// installed alone and the failure is logged through it.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_subscriber(
    otlp_endpoint: Option<&str>,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer();

    #[cfg(feature = "otel")]
    let exporter_error = match otlp_endpoint.map(otlp_tracer) {
        Some(Ok(tracer)) => {
            return tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .try_init();
        }
        Some(Err(e)) => Some(e),
        None => None,
    };

    #[cfg(not(feature = "otel"))]
    let _ = otlp_endpoint;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    #[cfg(feature = "otel")]
    {
        if let Some(e) = exporter_error {
            tracing::warn!("OTLP exporter unavailable, logging to stdout only: {e}");
        }
    }

    Ok(())
}

/// Build a batch-exporting tracer for `endpoint` and register its provider
/// globally.
#[cfg(feature = "otel")]
fn otlp_tracer(
    endpoint: &str,
) -> Result<opentelemetry_sdk::trace::SdkTracer, opentelemetry_otlp::ExporterBuildError> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_otlp::WithExportConfig as _;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();
    let tracer = provider.tracer(SERVICE_NAME);
    opentelemetry::global::set_tracer_provider(provider);
    Ok(tracer)
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns the global subscriber for this binary.
    #[test]
    fn second_init_reports_error() {
        #[cfg(feature = "otel")]
        let endpoint = Some("http://[::1");
        #[cfg(not(feature = "otel"))]
        let endpoint = None;

        let _ = init_subscriber(endpoint);
        assert!(init_subscriber(None).is_err());
    }

    #[cfg(feature = "otel")]
    #[tokio::test]
    async fn malformed_otlp_endpoint_is_rejected() {
        assert!(otlp_tracer("http://[::1").is_err());
    }
}
