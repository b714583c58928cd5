//! Metrics collection for parse outcomes and upstream failures

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::upstream_errors::ErrorKind;

/// Point-in-time copy of the counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Bets analyzed
    pub analyses: u64,
    /// Parse outcomes
    pub parses_primary: u64,
    pub parses_cached: u64,
    pub parses_fallback: u64,
    /// Upstream failures by kind
    pub upstream_errors_total: u64,
    pub upstream_rate_limited: u64,
    pub upstream_unauthorized: u64,
    pub upstream_ai_unavailable: u64,
    pub upstream_network: u64,
    pub upstream_not_found: u64,
    pub upstream_unknown: u64,
}

/// Thread-safe metrics collector
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    analyses: AtomicU64,
    parses_primary: AtomicU64,
    parses_cached: AtomicU64,
    parses_fallback: AtomicU64,
    upstream_rate_limited: AtomicU64,
    upstream_unauthorized: AtomicU64,
    upstream_ai_unavailable: AtomicU64,
    upstream_network: AtomicU64,
    upstream_not_found: AtomicU64,
    upstream_unknown: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_analyses(&self) {
        self.inner.analyses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_parses_primary(&self) {
        self.inner.parses_primary.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_parses_cached(&self) {
        self.inner.parses_cached.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_parses_fallback(&self) {
        self.inner.parses_fallback.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_upstream_error(&self, kind: ErrorKind) {
        let counter = match kind {
            ErrorKind::RateLimited => &self.inner.upstream_rate_limited,
            ErrorKind::Unauthorized => &self.inner.upstream_unauthorized,
            ErrorKind::AiUnavailable => &self.inner.upstream_ai_unavailable,
            ErrorKind::Network => &self.inner.upstream_network,
            ErrorKind::NotFound => &self.inner.upstream_not_found,
            ErrorKind::Unknown => &self.inner.upstream_unknown,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        let inner = &self.inner;

        let upstream_rate_limited = load(&inner.upstream_rate_limited);
        let upstream_unauthorized = load(&inner.upstream_unauthorized);
        let upstream_ai_unavailable = load(&inner.upstream_ai_unavailable);
        let upstream_network = load(&inner.upstream_network);
        let upstream_not_found = load(&inner.upstream_not_found);
        let upstream_unknown = load(&inner.upstream_unknown);

        MetricsSnapshot {
            analyses: load(&inner.analyses),
            parses_primary: load(&inner.parses_primary),
            parses_cached: load(&inner.parses_cached),
            parses_fallback: load(&inner.parses_fallback),
            upstream_errors_total: upstream_rate_limited
                + upstream_unauthorized
                + upstream_ai_unavailable
                + upstream_network
                + upstream_not_found
                + upstream_unknown,
            upstream_rate_limited,
            upstream_unauthorized,
            upstream_ai_unavailable,
            upstream_network,
            upstream_not_found,
            upstream_unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let metrics = Metrics::new();
        let handle = metrics.clone();

        handle.inc_parses_fallback();
        handle.inc_upstream_error(ErrorKind::RateLimited);
        handle.inc_upstream_error(ErrorKind::NotFound);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.parses_fallback, 1);
        assert_eq!(snapshot.upstream_rate_limited, 1);
        assert_eq!(snapshot.upstream_not_found, 1);
        assert_eq!(snapshot.upstream_errors_total, 2);
    }
}
