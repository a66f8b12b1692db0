//! Metrics sink handed to the store at construction.

use dashmap::DashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    NotFound,
    Cancelled,
    Error,
}

pub trait StoreMetrics: Send + Sync {
    /// One finished invocation of `op`.
    fn observe_operation(&self, op: &'static str, elapsed: Duration, outcome: Outcome);
    /// A size observed while running `op` (ranges scanned, rows matched, ...).
    fn observe_count(&self, op: &'static str, field: &'static str, count: usize);
}

pub struct NoopStoreMetrics;

impl StoreMetrics for NoopStoreMetrics {
    fn observe_operation(&self, _op: &'static str, _elapsed: Duration, _outcome: Outcome) {}

    fn observe_count(&self, _op: &'static str, _field: &'static str, _count: usize) {}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationStats {
    pub calls: u64,
    pub errors: u64,
    pub cancelled: u64,
    pub total_time: Duration,
}

/// Keeps per-operation counters in memory.
#[derive(Default)]
pub struct InMemoryMetrics {
    operations: DashMap<&'static str, OperationStats>,
    counts: DashMap<(&'static str, &'static str), usize>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operation(&self, op: &str) -> Option<OperationStats> {
        self.operations.get(op).map(|s| s.value().clone())
    }

    /// Last value reported for `field` by `op`.
    pub fn count(&self, op: &'static str, field: &'static str) -> Option<usize> {
        self.counts.get(&(op, field)).map(|c| *c)
    }
}

impl StoreMetrics for InMemoryMetrics {
    fn observe_operation(&self, op: &'static str, elapsed: Duration, outcome: Outcome) {
        let mut stats = self.operations.entry(op).or_default();
        stats.calls += 1;
        stats.total_time += elapsed;
        match outcome {
            Outcome::Ok | Outcome::NotFound => {}
            Outcome::Cancelled => stats.cancelled += 1,
            Outcome::Error => stats.errors += 1,
        }
    }

    fn observe_count(&self, op: &'static str, field: &'static str, count: usize) {
        self.counts.insert((op, field), count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_metrics_accumulate() {
        let metrics = InMemoryMetrics::new();
        metrics.observe_operation("Op", Duration::from_millis(2), Outcome::Ok);
        metrics.observe_operation("Op", Duration::from_millis(3), Outcome::Error);
        metrics.observe_operation("Op", Duration::from_millis(1), Outcome::Cancelled);
        metrics.observe_count("Op", "rows", 4);
        metrics.observe_count("Op", "rows", 9);

        let stats = metrics.operation("Op").unwrap();
        assert_eq!(stats.calls, 3);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.total_time, Duration::from_millis(6));
        assert_eq!(metrics.count("Op", "rows"), Some(9));
        assert!(metrics.operation("Other").is_none());
    }
}
