//! Lock-free request metrics for the mock backend
//!
//! Uses atomics for hot-path operations to avoid mutex contention.
//! Monotonic counters feed the Prometheus endpoint; the periodic log line
//! swaps the per-interval counters to zero.
//!
//! All atomics use Relaxed ordering. These are statistical counters only and
//! must not drive request handling.

use crate::mock::ErrorCode;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Prometheus-style exponential bucket boundaries (microseconds)
/// Buckets: ≤100, ≤200, ≤400, ≤800, ≤1600, ≤3200, ≤6400, ≤12800, ≤25600, ≤51200, >51200
pub const METRICS_BUCKET_BOUNDS: [u64; 10] =
    [100, 200, 400, 800, 1600, 3200, 6400, 12800, 25600, 51200];
pub const METRICS_NUM_BUCKETS: usize = 11;

/// Compute bucket index for a latency value using binary search
#[inline]
fn bucket_index(latency_us: u64) -> usize {
    METRICS_BUCKET_BOUNDS.partition_point(|&bound| bound < latency_us)
}

/// Update an atomic max value using compare-and-swap loop
#[inline]
fn update_atomic_max(atomic_max: &AtomicU64, new_value: u64) {
    let mut current_max = atomic_max.load(Ordering::Relaxed);
    while new_value > current_max {
        match atomic_max.compare_exchange_weak(
            current_max,
            new_value,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(actual) => current_max = actual,
        }
    }
}

/// Load all bucket values without resetting
#[inline]
fn load_buckets(buckets: &[AtomicU64; METRICS_NUM_BUCKETS]) -> [u64; METRICS_NUM_BUCKETS] {
    let mut result = [0u64; METRICS_NUM_BUCKETS];
    for (i, bucket) in buckets.iter().enumerate() {
        result[i] = bucket.load(Ordering::Relaxed);
    }
    result
}

/// Compute percentile from histogram buckets
/// Returns the upper bound of the bucket containing the percentile
fn percentile_from_buckets(buckets: &[u64; METRICS_NUM_BUCKETS], percentile: f64) -> u64 {
    let total: u64 = buckets.iter().sum();
    if total == 0 {
        return 0;
    }

    let target = ((total as f64 * percentile).ceil() as u64).max(1);
    let mut cumulative = 0u64;

    // Upper bounds for each bucket (last bucket uses 2x the previous bound)
    const BUCKET_UPPER_BOUNDS: [u64; METRICS_NUM_BUCKETS] =
        [100, 200, 400, 800, 1600, 3200, 6400, 12800, 25600, 51200, 102400];

    for (i, &count) in buckets.iter().enumerate() {
        cumulative += count;
        if cumulative >= target {
            return BUCKET_UPPER_BOUNDS[i];
        }
    }
    BUCKET_UPPER_BOUNDS[METRICS_NUM_BUCKETS - 1]
}

/// Lock-free metrics collector
pub struct Metrics {
    /// Procedure calls answered (monotonic)
    calls_total: AtomicU64,
    calls_since_report: AtomicU64,
    /// Failed calls by error code (monotonic)
    bad_request_total: AtomicU64,
    not_found_total: AtomicU64,
    other_errors_total: AtomicU64,
    /// Requests for paths outside the catalog
    unknown_procedure_total: AtomicU64,
    bookings_created_total: AtomicU64,
    /// Handler latency histogram (monotonic)
    latency_buckets: [AtomicU64; METRICS_NUM_BUCKETS],
    latency_sum_us: AtomicU64,
    latency_max_us: AtomicU64,
    last_report_time: Mutex<Instant>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            calls_total: AtomicU64::new(0),
            calls_since_report: AtomicU64::new(0),
            bad_request_total: AtomicU64::new(0),
            not_found_total: AtomicU64::new(0),
            other_errors_total: AtomicU64::new(0),
            unknown_procedure_total: AtomicU64::new(0),
            bookings_created_total: AtomicU64::new(0),
            latency_buckets: Default::default(),
            latency_sum_us: AtomicU64::new(0),
            latency_max_us: AtomicU64::new(0),
            last_report_time: Mutex::new(Instant::now()),
        }
    }

    /// Record one answered call and its handler latency
    pub fn record_call(&self, latency_us: u64, error: Option<ErrorCode>) {
        self.calls_total.fetch_add(1, Ordering::Relaxed);
        self.calls_since_report.fetch_add(1, Ordering::Relaxed);
        self.latency_buckets[bucket_index(latency_us)].fetch_add(1, Ordering::Relaxed);
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        update_atomic_max(&self.latency_max_us, latency_us);

        let counter = match error {
            None => return,
            Some(ErrorCode::BadRequest) => &self.bad_request_total,
            Some(ErrorCode::NotFound) => &self.not_found_total,
            Some(_) => &self.other_errors_total,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unknown_procedure(&self) {
        self.unknown_procedure_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_booking_created(&self) {
        self.bookings_created_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn unknown_procedure_total(&self) -> u64 {
        self.unknown_procedure_total.load(Ordering::Relaxed)
    }

    pub fn bookings_created_total(&self) -> u64 {
        self.bookings_created_total.load(Ordering::Relaxed)
    }

    /// Snapshot for reporting. Resets only the per-interval call counter.
    pub fn report(&self) -> MetricsSummary {
        let interval_calls = self.calls_since_report.swap(0, Ordering::Relaxed);
        let elapsed = {
            let mut last = self.last_report_time.lock();
            let elapsed = last.elapsed();
            *last = Instant::now();
            elapsed
        };
        let calls_per_sec = if elapsed.as_secs_f64() > 0.0 {
            interval_calls as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        self.summary(calls_per_sec)
    }

    /// Monotonic totals without touching the interval state. `calls_per_sec` is zero.
    pub fn snapshot(&self) -> MetricsSummary {
        self.summary(0.0)
    }

    fn summary(&self, calls_per_sec: f64) -> MetricsSummary {
        let calls_total = self.calls_total.load(Ordering::Relaxed);
        let latency_buckets = load_buckets(&self.latency_buckets);
        let latency_sum = self.latency_sum_us.load(Ordering::Relaxed);

        MetricsSummary {
            calls_total,
            calls_per_sec,
            bad_request_total: self.bad_request_total.load(Ordering::Relaxed),
            not_found_total: self.not_found_total.load(Ordering::Relaxed),
            other_errors_total: self.other_errors_total.load(Ordering::Relaxed),
            unknown_procedure_total: self.unknown_procedure_total.load(Ordering::Relaxed),
            bookings_created_total: self.bookings_created_total.load(Ordering::Relaxed),
            latency_avg_us: if calls_total > 0 { latency_sum / calls_total } else { 0 },
            latency_max_us: self.latency_max_us.load(Ordering::Relaxed),
            latency_p99_us: percentile_from_buckets(&latency_buckets, 0.99),
            latency_buckets,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time metrics snapshot
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub calls_total: u64,
    pub calls_per_sec: f64,
    pub bad_request_total: u64,
    pub not_found_total: u64,
    pub other_errors_total: u64,
    pub unknown_procedure_total: u64,
    pub bookings_created_total: u64,
    pub latency_buckets: [u64; METRICS_NUM_BUCKETS],
    pub latency_avg_us: u64,
    pub latency_max_us: u64,
    pub latency_p99_us: u64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            calls_total = %self.calls_total,
            calls_per_sec = format!("{:.1}", self.calls_per_sec),
            bad_request = %self.bad_request_total,
            not_found = %self.not_found_total,
            unknown_procedure = %self.unknown_procedure_total,
            bookings_created = %self.bookings_created_total,
            avg_latency_us = %self.latency_avg_us,
            p99_us = %self.latency_p99_us,
            "metrics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        let summary = metrics.report();
        assert_eq!(summary.calls_total, 0);
        assert_eq!(summary.latency_p99_us, 0);
    }

    #[test]
    fn test_bucket_index() {
        assert_eq!(bucket_index(0), 0);
        assert_eq!(bucket_index(100), 0);
        assert_eq!(bucket_index(101), 1);
        assert_eq!(bucket_index(1_000_000), METRICS_NUM_BUCKETS - 1);
    }

    #[test]
    fn test_record_call_by_code() {
        let metrics = Metrics::new();
        metrics.record_call(50, None);
        metrics.record_call(150, Some(ErrorCode::NotFound));
        metrics.record_call(150, Some(ErrorCode::BadRequest));
        metrics.record_call(900, Some(ErrorCode::InternalServerError));

        let summary = metrics.report();
        assert_eq!(summary.calls_total, 4);
        assert_eq!(summary.not_found_total, 1);
        assert_eq!(summary.bad_request_total, 1);
        assert_eq!(summary.other_errors_total, 1);
        assert_eq!(summary.latency_max_us, 900);
        assert_eq!(summary.latency_avg_us, 312);
        assert_eq!(summary.latency_buckets.iter().sum::<u64>(), 4);
    }

    #[test]
    fn test_report_keeps_monotonic_totals() {
        let metrics = Metrics::new();
        metrics.record_call(10, None);
        metrics.record_booking_created();
        metrics.record_unknown_procedure();
        let _ = metrics.report();
        let summary = metrics.report();
        assert_eq!(summary.calls_total, 1);
        assert_eq!(summary.bookings_created_total, 1);
        assert_eq!(summary.unknown_procedure_total, 1);
    }

    #[test]
    fn test_snapshot_leaves_interval_state() {
        let metrics = Metrics::new();
        metrics.record_call(10, None);
        metrics.record_call(20, Some(ErrorCode::BadRequest));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.calls_total, 2);
        assert_eq!(snapshot.bad_request_total, 1);
        assert_eq!(metrics.calls_since_report.load(Ordering::Relaxed), 2);

        let _ = metrics.report();
        assert_eq!(metrics.calls_since_report.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.snapshot().calls_total, 2);
    }

    #[test]
    fn test_percentile() {
        let mut buckets = [0u64; METRICS_NUM_BUCKETS];
        buckets[0] = 99;
        buckets[5] = 1;
        assert_eq!(percentile_from_buckets(&buckets, 0.5), 100);
        assert_eq!(percentile_from_buckets(&buckets, 0.99), 100);
        assert_eq!(percentile_from_buckets(&buckets, 1.0), 3200);
    }
}
