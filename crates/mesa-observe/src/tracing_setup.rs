//! Logging for the `mesa` binary: `tracing` to stderr, filtered by the
//! `-v`/`-q` flags or `RUST_LOG`, with opt-in OpenTelemetry span export.
//!
//! # Usage
//!
//! ```no_run
//! // Warnings and errors only, RUST_LOG wins when set
//! mesa_observe::tracing_setup::init_tracing("warn", false).unwrap();
//!
//! // `mesa -v --otel chat`
//! mesa_observe::tracing_setup::init_tracing("info,mesa_core=debug", true).unwrap();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use std::sync::OnceLock;

/// Set once `--otel` is enabled.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Map CLI verbosity flags to a filter directive.
pub fn verbosity_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,mesa_core=debug,mesa_infra=debug",
        _ => "trace",
    }
}

/// `RUST_LOG` when set and valid, otherwise `default_directive`.
pub fn build_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the global subscriber: a compact stderr `fmt` layer, plus an
/// OpenTelemetry bridge exporting spans to stdout when `enable_otel` is set.
///
/// Stderr keeps log lines out of the chat transcript. Each `chat_send` span
/// logs its duration on close.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(default_directive: &str, enable_otel: bool) -> Result<(), Box<dyn std::error::Error>> {
    let otel_layer = enable_otel.then(|| {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("mesa");
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);
        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(build_filter(default_directive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_span_events(FmtSpan::CLOSE),
        )
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Export buffered spans before exit. Does nothing without `--otel`.
pub fn shutdown_tracing() {
    let Some(provider) = TRACER_PROVIDER.get() else {
        return;
    };
    if let Err(e) = provider.shutdown() {
        eprintln!("Warning: failed to flush traces: {e}");
    }
}
