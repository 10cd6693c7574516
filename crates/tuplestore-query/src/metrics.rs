//! Query execution metrics

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// Counters for one [`QueryExecutor`](crate::QueryExecutor)
#[derive(Debug, Default)]
pub struct QueryMetrics {
    query_count: AtomicU64,
    query_latency_us: AtomicU64,
    query_errors: AtomicU64,
    slow_queries: AtomicU64,
    rows_returned: AtomicU64,
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one execution; `rows` is `None` when it failed
    pub fn record_query(&self, duration: Duration, rows: Option<usize>) {
        self.query_count.fetch_add(1, Ordering::Relaxed);
        self.query_latency_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        match rows {
            Some(rows) => {
                self.rows_returned.fetch_add(rows as u64, Ordering::Relaxed);
            },
            None => {
                self.query_errors.fetch_add(1, Ordering::Relaxed);
            },
        }
    }

    pub fn record_slow_query(&self) {
        self.slow_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Get metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let query_count = self.query_count.load(Ordering::Relaxed);
        let query_latency_us = self.query_latency_us.load(Ordering::Relaxed);

        MetricsSnapshot {
            query_count,
            query_avg_latency_us: if query_count > 0 { query_latency_us / query_count } else { 0 },
            query_errors: self.query_errors.load(Ordering::Relaxed),
            slow_queries: self.slow_queries.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.query_count.store(0, Ordering::Relaxed);
        self.query_latency_us.store(0, Ordering::Relaxed);
        self.query_errors.store(0, Ordering::Relaxed);
        self.slow_queries.store(0, Ordering::Relaxed);
        self.rows_returned.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub query_count: u64,
    pub query_avg_latency_us: u64,
    pub query_errors: u64,
    pub slow_queries: u64,
    pub rows_returned: u64,
}

/// Helper to measure operation duration
pub struct OpTimer {
    start: Instant,
}

impl OpTimer {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for OpTimer {
    fn default() -> Self {
        Self::new()
    }
}
