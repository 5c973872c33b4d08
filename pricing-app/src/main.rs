//! # Rates Proxy
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize tracing (and OTLP export when configured)
//! - Build the upstream rate source
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{
    metrics::SdkMeterProvider, propagation::TraceContextPropagator, trace as sdktrace,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pricing_hex::inbound::HttpServer;
use pricing_repo::{ExchangeRateHostSource, ProviderConfig, StaticRateSource};
use pricing_types::RateSource;

use config::Config;

struct Telemetry {
    tracer_provider: sdktrace::SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl Telemetry {
    fn shutdown(self) {
        let _ = self.tracer_provider.shutdown();
        let _ = self.meter_provider.shutdown();
    }
}

/// OTLP span and metric exporters, reading the endpoint from the standard
/// `OTEL_EXPORTER_OTLP_*` variables.
fn init_telemetry() -> anyhow::Result<(sdktrace::Tracer, Telemetry)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let span_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;
    let tracer_provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .build();
    global::set_tracer_provider(tracer_provider.clone());

    // HTTP metrics from axum-otel-metrics go through the global meter provider
    let metric_exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .build()?;
    let meter_provider = SdkMeterProvider::builder()
        .with_periodic_exporter(metric_exporter)
        .build();
    global::set_meter_provider(meter_provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    let tracer = tracer_provider.tracer("storefront-rates-proxy");
    Ok((
        tracer,
        Telemetry {
            tracer_provider,
            meter_provider,
        },
    ))
}

fn build_source(config: &Config) -> anyhow::Result<Arc<dyn RateSource>> {
    if config.offline {
        tracing::warn!("RATES_OFFLINE set, serving reference rates");
        return Ok(Arc::new(StaticRateSource::reference()));
    }
    let source = ExchangeRateHostSource::new(ProviderConfig {
        base_url: config.provider_url.clone(),
        access_key: config.provider_access_key.clone(),
        timeout: config.upstream_timeout,
    })?;
    Ok(Arc::new(source))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    let (tracer, telemetry) = if config.otlp_endpoint.is_some() {
        let (tracer, telemetry) = init_telemetry()?;
        (Some(tracer), Some(telemetry))
    } else {
        (None, None)
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pricing_app=debug,pricing_hex=debug".into()),
        )
        .with((!config.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .with(
            config
                .json_logs
                .then(|| tracing_subscriber::fmt::layer().json()),
        )
        .with(tracer.map(|t| tracing_opentelemetry::layer().with_tracer(t)))
        .init();

    tracing::info!("Starting rates proxy on port {}", config.port);
    tracing::info!(
        provider = %config.provider_url,
        timeout = ?config.upstream_timeout,
        rate_limit = config.rate_limit_per_minute,
        "Upstream configured"
    );

    let source = build_source(&config)?;

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(source, config.rate_limit_per_minute);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces and metrics are flushed before exit
    if let Some(telemetry) = telemetry {
        telemetry.shutdown();
    }
    Ok(())
}
