use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Process-wide counters for draws and dispatches
#[derive(Debug, Default)]
pub struct ExchangeMetrics {
    pub shuffles: AtomicU64,
    pub dispatch_attempts: AtomicU64,
    pub dispatch_successes: AtomicU64,
    pub dispatch_failures: AtomicU64,
    pub refusals: AtomicU64,
}

impl ExchangeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_shuffle(&self) {
        self.shuffles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch_attempt(&self) {
        self.dispatch_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch_success(&self) {
        self.dispatch_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch_failure(&self) {
        self.dispatch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refusal(&self) {
        self.refusals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> ExchangeStats {
        ExchangeStats {
            shuffles: self.shuffles.load(Ordering::Relaxed),
            dispatch_attempts: self.dispatch_attempts.load(Ordering::Relaxed),
            dispatch_successes: self.dispatch_successes.load(Ordering::Relaxed),
            dispatch_failures: self.dispatch_failures.load(Ordering::Relaxed),
            refusals: self.refusals.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            shuffles = stats.shuffles,
            dispatch_attempts = stats.dispatch_attempts,
            dispatch_successes = stats.dispatch_successes,
            dispatch_failures = stats.dispatch_failures,
            refusals = stats.refusals,
            "Exchange metrics"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeStats {
    pub shuffles: u64,
    pub dispatch_attempts: u64,
    pub dispatch_successes: u64,
    pub dispatch_failures: u64,
    pub refusals: u64,
}

static EXCHANGE_METRICS: std::sync::LazyLock<ExchangeMetrics> =
    std::sync::LazyLock::new(ExchangeMetrics::new);

pub fn exchange_metrics() -> &'static ExchangeMetrics {
    &EXCHANGE_METRICS
}

/// Time an operation and log how long it took
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis() as u64,
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = ExchangeMetrics::new();
        metrics.record_shuffle();
        metrics.record_shuffle();
        metrics.record_dispatch_attempt();
        metrics.record_dispatch_failure();
        metrics.record_refusal();

        assert_eq!(
            metrics.get_stats(),
            ExchangeStats {
                shuffles: 2,
                dispatch_attempts: 1,
                dispatch_successes: 0,
                dispatch_failures: 1,
                refusals: 1,
            }
        );
    }
}
