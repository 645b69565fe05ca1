//! Scenario configuration.

use crate::{ConfigError, ConfigResult};

/// Parameters of one simulation run.
///
/// Typically built in code by the driver or loaded from CSV by
/// `qn_sim::load_scenarios_csv`, then handed to the scenario runner, which
/// calls [`validate`][Self::validate] before constructing anything.  The
/// runner only ever borrows a config, so it cannot change once a run starts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioConfig {
    /// Human-readable name carried through to the result.
    pub label: String,

    /// Number of servers (doctors).  Must be ≥ 1.
    pub capacity: usize,

    /// Mean time between arrivals.  Must be > 0; `f64::INFINITY` means no
    /// arrival ever happens.
    pub mean_interarrival: f64,

    /// Mean service duration.  Must be > 0.
    pub mean_service: f64,

    /// Virtual time at which the run stops.  Must be finite and ≥ 0.  Events
    /// scheduled strictly after this never execute.
    pub horizon: f64,

    /// Seed for the run's variate source.  The same seed always produces
    /// identical results.
    pub seed: u64,
}

impl ScenarioConfig {
    /// Horizon, seed, and mean service time of the reference hospital scenarios.
    pub const HOSPITAL_HORIZON: f64 = 100.0;
    pub const HOSPITAL_SEED: u64 = 42;
    pub const HOSPITAL_MEAN_SERVICE: f64 = 10.0;

    /// A hospital scenario with `doctors` servers and patients arriving every
    /// `interval` time units on average.  Label format: `doctors2_interval5`.
    pub fn hospital(doctors: usize, interval: f64) -> Self {
        Self {
            label:             format!("doctors{doctors}_interval{interval}"),
            capacity:          doctors,
            mean_interarrival: interval,
            mean_service:      Self::HOSPITAL_MEAN_SERVICE,
            horizon:           Self::HOSPITAL_HORIZON,
            seed:              Self::HOSPITAL_SEED,
        }
    }

    /// The scenario comparison set: (2, 5), (3, 5), (2, 3).
    pub fn hospital_defaults() -> Vec<Self> {
        vec![Self::hospital(2, 5.0), Self::hospital(3, 5.0), Self::hospital(2, 3.0)]
    }

    /// Check every parameter, reporting the first that is out of range.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.label.trim().is_empty() {
            return Err(ConfigError::EmptyLabel);
        }
        if self.capacity < 1 {
            return Err(ConfigError::CapacityTooSmall(self.capacity));
        }
        if !(self.mean_interarrival > 0.0) {
            return Err(ConfigError::NonPositiveMean {
                what:  "mean inter-arrival time",
                value: self.mean_interarrival,
            });
        }
        if !(self.mean_service > 0.0) {
            return Err(ConfigError::NonPositiveMean {
                what:  "mean service time",
                value: self.mean_service,
            });
        }
        if !(self.horizon >= 0.0 && self.horizon.is_finite()) {
            return Err(ConfigError::InvalidHorizon(self.horizon));
        }
        Ok(())
    }
}
