//! Per-scenario summary.

/// What one scenario run produced.
///
/// `wait_samples` holds one entry per patient that started service before the
/// horizon, in service-start order (which, with a FIFO pool, is arrival
/// order).  `mean_wait` is their arithmetic mean, or `0.0` when nobody was
/// served.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    pub label:          String,
    pub mean_wait:      f64,
    pub total_departed: u64,
    pub total_arrived:  u64,
    pub total_started:  u64,
    pub max_wait:       f64,
    pub wait_samples:   Vec<f64>,
}

impl ScenarioResult {
    /// Patients still in service when the horizon was reached.
    pub fn in_service(&self) -> u64 {
        self.total_started - self.total_departed
    }

    /// Patients that arrived but never reached a doctor.
    pub fn still_waiting(&self) -> u64 {
        self.total_arrived - self.total_started
    }
}
