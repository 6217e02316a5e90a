use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings created.
pub const BOOKINGS_CREATED_TOTAL: &str = "innkeep_bookings_created_total";

/// Counter: bookings soft-cancelled.
pub const BOOKINGS_CANCELLED_TOTAL: &str = "innkeep_bookings_cancelled_total";

/// Counter: bookings physically removed (admin hard delete).
pub const BOOKINGS_DELETED_TOTAL: &str = "innkeep_bookings_deleted_total";

/// Counter: payments confirmed.
pub const PAYMENTS_CONFIRMED_TOTAL: &str = "innkeep_payments_confirmed_total";

/// Counter: room records created.
pub const ROOMS_CREATED_TOTAL: &str = "innkeep_rooms_created_total";

/// Counter: availability checks evaluated.
pub const AVAILABILITY_CHECKS_TOTAL: &str = "innkeep_availability_checks_total";

/// Histogram: availability check latency in seconds.
pub const AVAILABILITY_CHECK_DURATION_SECONDS: &str =
    "innkeep_availability_check_duration_seconds";

/// Histogram: items returned per booking-list page.
pub const BOOKING_LIST_PAGE_SIZE: &str = "innkeep_booking_list_page_size";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Console tracing for embedders and tests that have not installed their own
/// subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
