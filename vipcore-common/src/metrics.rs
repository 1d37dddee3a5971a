//! Cache counters rendered in the Prometheus text exposition format.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

/// Exposition type of a [`Metric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Monotonic count
    Counter,
    /// Point-in-time value
    Gauge,
}

impl MetricKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
        }
    }
}

/// A named value updated without locking.
#[derive(Debug)]
pub struct Metric {
    name: String,
    help: &'static str,
    kind: MetricKind,
    value: AtomicU64,
}

impl Metric {
    fn new(name: String, help: &'static str, kind: MetricKind) -> Self {
        Self {
            name,
            help,
            kind,
            value: AtomicU64::new(0),
        }
    }

    /// Add one.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Overwrite the value.
    pub fn set(&self, value: u64) {
        self.value.store(value, Ordering::Relaxed);
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Metric name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exposition type.
    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        self.kind
    }

    fn render(&self, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, self.help);
        let _ = writeln!(out, "# TYPE {} {}", self.name, self.kind.as_str());
        let _ = writeln!(out, "{} {}", self.name, self.get());
    }
}

/// Lookup outcomes and size of one cache.
#[derive(Debug)]
pub struct CacheMetrics {
    /// Lookups answered from the cache
    pub hits: Metric,
    /// Lookups that found nothing usable
    pub misses: Metric,
    /// Entries dropped because they outlived the TTL
    pub expirations: Metric,
    /// Entries currently stored
    pub size: Metric,
}

impl CacheMetrics {
    /// Metrics named `{cache}_...`.
    #[must_use]
    pub fn new(cache: &str) -> Self {
        Self {
            hits: Metric::new(
                format!("{cache}_hits_total"),
                "Lookups served from the cache",
                MetricKind::Counter,
            ),
            misses: Metric::new(
                format!("{cache}_misses_total"),
                "Lookups that went to vip-core",
                MetricKind::Counter,
            ),
            expirations: Metric::new(
                format!("{cache}_expirations_total"),
                "Entries evicted on access after their TTL",
                MetricKind::Counter,
            ),
            size: Metric::new(
                format!("{cache}_entries"),
                "Entries currently stored",
                MetricKind::Gauge,
            ),
        }
    }

    /// Count a hit.
    pub fn record_hit(&self) {
        self.hits.inc();
    }

    /// Count a miss.
    pub fn record_miss(&self) {
        self.misses.inc();
    }

    /// Count an eviction of an expired entry.
    pub fn record_expiration(&self) {
        self.expirations.inc();
    }

    /// Track the number of stored entries.
    pub fn update_size(&self, size: usize) {
        self.size.set(u64::try_from(size).unwrap_or(u64::MAX));
    }

    /// Share of lookups served from the cache, `None` before the first lookup.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> Option<f64> {
        let hits = self.hits.get();
        let lookups = hits + self.misses.get();
        (lookups > 0).then(|| hits as f64 / lookups as f64)
    }

    /// All four metrics in the Prometheus text format.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        let mut out = String::new();
        for metric in [&self.hits, &self.misses, &self.expirations, &self.size] {
            metric.render(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording() {
        let metrics = CacheMetrics::new("vipcore_rule_sets");

        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_expiration();
        metrics.update_size(12);

        assert_eq!(metrics.hits.get(), 2);
        assert_eq!(metrics.misses.get(), 1);
        assert_eq!(metrics.expirations.get(), 1);
        assert_eq!(metrics.size.get(), 12);
        assert_eq!(metrics.hits.name(), "vipcore_rule_sets_hits_total");
        assert_eq!(metrics.size.kind(), MetricKind::Gauge);
    }

    #[test]
    fn test_hit_ratio() {
        let metrics = CacheMetrics::new("vipcore_information");
        assert_eq!(metrics.hit_ratio(), None);

        metrics.record_miss();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        assert_eq!(metrics.hit_ratio(), Some(0.75));
    }

    #[test]
    fn test_prometheus_format() {
        let metrics = CacheMetrics::new("vipcore_information");
        metrics.record_miss();

        let output = metrics.to_prometheus();
        assert!(output.contains("# TYPE vipcore_information_misses_total counter\n"));
        assert!(output.contains("\nvipcore_information_misses_total 1\n"));
        assert!(output.contains("# TYPE vipcore_information_entries gauge\n"));
        assert_eq!(output.lines().count(), 12);
    }
}
