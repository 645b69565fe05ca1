//! `MetricsAccumulator` — per-run wait and throughput statistics.

use crate::ScenarioResult;

/// Collects waits and counts for one run.
///
/// The accumulator lives inside the run's world state, so a fresh run always
/// starts from a fresh accumulator.  [`reset`][Self::reset] exists for callers
/// that want to reuse the allocation.
#[derive(Debug, Clone, Default)]
pub struct MetricsAccumulator {
    waits:      Vec<f64>,
    wait_sum:   f64,
    max_wait:   f64,
    arrivals:   u64,
    departures: u64,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_arrival(&mut self) {
        self.arrivals += 1;
    }

    /// Record the time one patient spent queueing before service started.
    pub fn record_wait(&mut self, duration: f64) {
        self.waits.push(duration);
        self.wait_sum += duration;
        self.max_wait = self.max_wait.max(duration);
    }

    pub fn record_departure(&mut self) {
        self.departures += 1;
    }

    /// `(mean_wait, total_departed)`.  The mean over zero samples is `0.0`.
    pub fn summary(&self) -> (f64, u64) {
        (self.mean_wait(), self.departures)
    }

    pub fn mean_wait(&self) -> f64 {
        if self.waits.is_empty() {
            0.0
        } else {
            self.wait_sum / self.waits.len() as f64
        }
    }

    pub fn max_wait(&self) -> f64 {
        self.max_wait
    }

    /// Every recorded wait, in recording order.
    pub fn samples(&self) -> &[f64] {
        &self.waits
    }

    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    /// Patients that started service (one per recorded wait).
    pub fn started(&self) -> u64 {
        self.waits.len() as u64
    }

    pub fn departures(&self) -> u64 {
        self.departures
    }

    pub fn reset(&mut self) {
        self.waits.clear();
        self.wait_sum = 0.0;
        self.max_wait = 0.0;
        self.arrivals = 0;
        self.departures = 0;
    }

    /// Freeze the statistics into a [`ScenarioResult`].
    pub fn into_result(self, label: impl Into<String>) -> ScenarioResult {
        let (mean_wait, total_departed) = self.summary();
        let total_started = self.started();
        ScenarioResult {
            label: label.into(),
            mean_wait,
            total_departed,
            total_arrived: self.arrivals,
            total_started,
            max_wait: self.max_wait,
            wait_samples: self.waits,
        }
    }
}
