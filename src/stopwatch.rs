use std::time::Instant;

use tdigest::TDigest;

/// Which path served a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    ColdStart,
    Neighbors,
}

#[derive(Clone)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch {
            start_time: Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = Instant::now();
    }

    pub fn elapsed_micros(&self) -> f64 {
        self.start_time.elapsed().as_micros() as f64
    }
}

pub type StrategyDurationMicros = (Strategy, f64);

/// Request latencies, tagged with the strategy that served them.
#[derive(Clone, Default)]
pub struct LatencyLog {
    durations: Vec<StrategyDurationMicros>,
}

impl LatencyLog {
    pub fn new() -> LatencyLog {
        LatencyLog::default()
    }

    pub fn record(&mut self, strategy: Strategy, duration_micros: f64) {
        self.durations.push((strategy, duration_micros));
    }

    pub fn get_n(&self, strategy: Strategy) -> usize {
        self.durations
            .iter()
            .filter(|(recorded, _)| *recorded == strategy)
            .count()
    }

    /// Estimated latency percentile, `q` in `[0, 1]`. Returns `None` when no
    /// request was served with `strategy`.
    pub fn get_percentile_in_micros(&self, strategy: Strategy, q: f64) -> Option<f64> {
        let durations: Vec<f64> = self
            .durations
            .iter()
            .filter(|(recorded, _)| *recorded == strategy)
            .map(|(_, micros)| *micros)
            .collect();
        if durations.is_empty() {
            return None;
        }
        let digest = TDigest::new_with_size(100).merge_unsorted(durations);
        Some(digest.estimate_quantile(q))
    }
}

#[cfg(test)]
mod stopwatch_test {
    use super::*;

    #[test]
    fn should_separate_strategies() {
        let mut log = LatencyLog::new();
        log.record(Strategy::ColdStart, 5.0);
        log.record(Strategy::Neighbors, 100.0);
        log.record(Strategy::Neighbors, 100.0);

        assert_eq!(1, log.get_n(Strategy::ColdStart));
        assert_eq!(2, log.get_n(Strategy::Neighbors));
        let p50 = log.get_percentile_in_micros(Strategy::Neighbors, 0.5).unwrap();
        assert!((100.0 - p50).abs() < 1e-9);
    }

    #[test]
    fn should_return_none_without_samples() {
        let log = LatencyLog::new();
        assert_eq!(None, log.get_percentile_in_micros(Strategy::ColdStart, 0.9));
    }
}
