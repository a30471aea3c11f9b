use std::net::SocketAddr;

// ── Write-path metrics ──────────────────────────────────────────

/// Counter: events accepted at the write boundary.
pub const EVENTS_SAVED_TOTAL: &str = "paddock_events_saved_total";

/// Counter: event saves rejected because a member or vehicle was occupied.
pub const CONFLICTS_REJECTED_TOTAL: &str = "paddock_conflicts_rejected_total";

/// Counter: championship/city deletes blocked by referencing events.
pub const DELETES_BLOCKED_TOTAL: &str = "paddock_deletes_blocked_total";

// ── Import metrics ──────────────────────────────────────────────

/// Counter: committed import batches.
pub const IMPORTS_TOTAL: &str = "paddock_imports_total";

/// Counter: events inserted by committed imports.
pub const IMPORT_EVENTS_TOTAL: &str = "paddock_import_events_total";

/// Counter: cities/championships/members minted by committed imports.
pub const IMPORT_ENTITIES_MINTED_TOTAL: &str = "paddock_import_entities_minted_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init_metrics(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Install the default fmt subscriber. Safe to call more than once.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt::try_init();
}
