use std::collections::VecDeque;

/// Samples kept before the oldest ones are dropped.
pub const DEFAULT_LATENCY_WINDOW: usize = 4_096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyPercentiles {
    pub count: usize,
    pub p50_micros: u64,
    pub p90_micros: u64,
    pub p95_micros: u64,
    pub p99_micros: u64,
    pub max_micros: u64,
}

/// Rolling window of tick durations.
#[derive(Debug, Clone)]
pub struct TickLatencyMetrics {
    window: usize,
    latencies_micros: VecDeque<u64>,
}

impl Default for TickLatencyMetrics {
    fn default() -> Self {
        Self::with_window(DEFAULT_LATENCY_WINDOW)
    }
}

impl TickLatencyMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            latencies_micros: VecDeque::with_capacity(window.min(DEFAULT_LATENCY_WINDOW)),
        }
    }

    pub fn record_latency_micros(&mut self, latency_micros: u64) {
        if self.latencies_micros.len() == self.window {
            self.latencies_micros.pop_front();
        }
        self.latencies_micros.push_back(latency_micros);
    }

    pub fn len(&self) -> usize {
        self.latencies_micros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latencies_micros.is_empty()
    }

    pub fn percentiles(&self) -> Option<LatencyPercentiles> {
        if self.latencies_micros.is_empty() {
            return None;
        }

        let mut sorted: Vec<u64> = self.latencies_micros.iter().copied().collect();
        sorted.sort_unstable();
        let count = sorted.len();

        Some(LatencyPercentiles {
            count,
            p50_micros: percentile_nearest_rank(&sorted, 50),
            p90_micros: percentile_nearest_rank(&sorted, 90),
            p95_micros: percentile_nearest_rank(&sorted, 95),
            p99_micros: percentile_nearest_rank(&sorted, 99),
            max_micros: sorted[count - 1],
        })
    }
}

fn percentile_nearest_rank(sorted: &[u64], percentile: usize) -> u64 {
    let count = sorted.len();
    let rank = (percentile * count).div_ceil(100);
    sorted[rank.saturating_sub(1)]
}

#[cfg(test)]
mod tests {
    use super::TickLatencyMetrics;

    #[test]
    fn window_drops_oldest_samples() {
        let mut metrics = TickLatencyMetrics::with_window(3);

        for latency in [500, 1, 2, 3] {
            metrics.record_latency_micros(latency);
        }

        let report = metrics.percentiles().unwrap();
        assert_eq!(report.count, 3);
        assert_eq!(report.max_micros, 3);
    }

    #[test]
    fn empty_metrics_have_no_percentiles() {
        assert!(TickLatencyMetrics::new().percentiles().is_none());
    }
}
