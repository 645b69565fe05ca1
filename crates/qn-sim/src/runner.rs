//! `ScenarioRunner` — executes scenarios as isolated simulation runs.

use qn_core::{ConfigError, ScenarioConfig};
use qn_engine::Simulation;
use tracing::{info, warn};

use crate::clinic::{ArrivalGenerator, ClinicState};
use crate::{ScenarioResult, SimError, SimResult};

/// Per-scenario outcome of a batch: a configuration problem is reported in
/// its own slot and does not stop the other scenarios.
pub type ScenarioOutcome = Result<ScenarioResult, ConfigError>;

/// Run one scenario from a clean slate.
///
/// Validates `config`, builds a fresh simulation (clock, doctor pool,
/// metrics, both draw channels), starts the arrival generator at `t = 0`,
/// runs to the horizon, tears the clock down, and summarizes.
pub fn run_scenario(config: &ScenarioConfig) -> SimResult<ScenarioResult> {
    config.validate()?;
    info!(
        label = %config.label,
        capacity = config.capacity,
        mean_interarrival = config.mean_interarrival,
        mean_service = config.mean_service,
        horizon = config.horizon,
        seed = config.seed,
        "scenario start"
    );

    let mut sim = Simulation::new(ClinicState::new(config));
    let doctors = sim.add_resource(config.capacity)?;
    sim.spawn(ArrivalGenerator::new(doctors))?;
    let executed = sim.run(config.horizon)?;
    let aborted = sim.teardown()?;

    let result = sim.into_state().metrics.into_result(config.label.as_str());
    info!(
        label = %result.label,
        executed,
        aborted,
        arrived = result.total_arrived,
        served = result.total_departed,
        mean_wait = result.mean_wait,
        "scenario finished"
    );
    Ok(result)
}

/// Runs a list of scenarios, preserving input order.
///
/// # Example
///
/// ```rust,ignore
/// let outcomes = ScenarioRunner::new(ScenarioConfig::hospital_defaults()).run()?;
/// for outcome in outcomes {
///     let r = outcome?;
///     println!("{}: mean wait {:.2}", r.label, r.mean_wait);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    configs: Vec<ScenarioConfig>,
}

impl ScenarioRunner {
    pub fn new(configs: Vec<ScenarioConfig>) -> Self {
        Self { configs }
    }

    pub fn push(&mut self, config: ScenarioConfig) -> &mut Self {
        self.configs.push(config);
        self
    }

    pub fn configs(&self) -> &[ScenarioConfig] {
        &self.configs
    }

    /// Execute every scenario.  See [`run_all`].
    pub fn run(&self) -> SimResult<Vec<ScenarioOutcome>> {
        run_all(&self.configs)
    }
}

/// Execute every config as its own run and collect the outcomes in input
/// order.
///
/// Configuration errors land in the scenario's slot.  Any other error is an
/// invariant violation and aborts the batch.
#[cfg(not(feature = "parallel"))]
pub fn run_all(configs: &[ScenarioConfig]) -> SimResult<Vec<ScenarioOutcome>> {
    let mut outcomes = Vec::with_capacity(configs.len());
    for config in configs {
        outcomes.push(into_outcome(config, run_scenario(config))?);
    }
    Ok(outcomes)
}

/// Execute every config as its own run on Rayon's pool and collect the
/// outcomes in input order.
///
/// Configuration errors land in the scenario's slot.  Any other error is an
/// invariant violation and fails the batch.
#[cfg(feature = "parallel")]
pub fn run_all(configs: &[ScenarioConfig]) -> SimResult<Vec<ScenarioOutcome>> {
    use rayon::prelude::*;

    let results: Vec<SimResult<ScenarioResult>> = configs.par_iter().map(run_scenario).collect();
    configs
        .iter()
        .zip(results)
        .map(|(config, result)| into_outcome(config, result))
        .collect()
}

fn into_outcome(config: &ScenarioConfig, result: SimResult<ScenarioResult>) -> SimResult<ScenarioOutcome> {
    match result {
        Ok(r) => Ok(Ok(r)),
        Err(SimError::Config(e)) => {
            warn!(label = %config.label, error = %e, "scenario skipped");
            Ok(Err(e))
        }
        Err(other) => Err(other),
    }
}
