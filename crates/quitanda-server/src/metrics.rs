//! Metrics registration and Prometheus exporter

use std::net::{Ipv4Addr, SocketAddr};

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Register metric descriptions so the exporter renders HELP text.
pub fn init_metrics() {
    describe_counter!("orders_placed_total", "Orders accepted by the API");
    describe_counter!(
        "inventory_reservations_verified_total",
        "Orders whose stock was deducted"
    );
    describe_counter!(
        "inventory_reservations_rejected_total",
        "Orders rejected for insufficient live stock"
    );
    describe_counter!("payments_completed_total", "Payments that completed");
    describe_counter!("payments_failed_total", "Payments that were declined");
    describe_counter!(
        "outbox_publications_recorded_total",
        "Publication rows written by the event publisher"
    );
    describe_counter!(
        "outbox_publications_dispatched_total",
        "Publications completed by the relay"
    );
    describe_counter!(
        "outbox_dispatch_failures_total",
        "Publications parked after exhausting their retries"
    );
    describe_histogram!(
        "outbox_dispatch_duration_seconds",
        "Listener dispatch latency including retries"
    );
}

/// Install the Prometheus exporter on its own listener port.
///
/// The exporter serves `GET /metrics` and runs for the process lifetime.
pub fn install_exporter(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}
