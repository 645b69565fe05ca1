//! The hospital clinic model: a Poisson stream of patients competing for a
//! pool of doctors.
//!
//! Two process types run against [`ClinicState`]:
//!
//! | Process              | Lifecycle                                                  |
//! |----------------------|------------------------------------------------------------|
//! | [`ArrivalGenerator`] | draw gap → sleep → spawn [`Patient`] → repeat              |
//! | [`Patient`]          | acquire doctor → record wait → draw service → sleep → release |
//!
//! The generator never terminates on its own; the run horizon is what stops
//! it, since its resumptions past the horizon are never executed.

use qn_core::{ResourceId, ScenarioConfig, SimTime, VariateSource};
use qn_engine::{EngineResult, Process, ProcessContext, Step};
use tracing::debug;

use crate::MetricsAccumulator;

/// Draw channel for inter-arrival gaps.
pub const ARRIVAL_CHANNEL: u64 = 0;
/// Draw channel for service durations.
pub const SERVICE_CHANNEL: u64 = 1;

// ── World state ───────────────────────────────────────────────────────────────

/// Per-run world state shared by every clinic process.
#[derive(Debug, Clone)]
pub struct ClinicState {
    pub arrivals:          VariateSource,
    pub service:           VariateSource,
    pub metrics:           MetricsAccumulator,
    pub mean_interarrival: f64,
    pub mean_service:      f64,
    /// Number handed to the next patient, starting at 1.
    pub next_patient:      u64,
}

impl ClinicState {
    /// Fresh state for `config`: both draw channels seeded from
    /// `config.seed`, empty metrics.
    pub fn new(config: &ScenarioConfig) -> Self {
        Self {
            arrivals:          VariateSource::channel(config.seed, ARRIVAL_CHANNEL),
            service:           VariateSource::channel(config.seed, SERVICE_CHANNEL),
            metrics:           MetricsAccumulator::new(),
            mean_interarrival: config.mean_interarrival,
            mean_service:      config.mean_service,
            next_patient:      1,
        }
    }
}

// ── Arrival generator ─────────────────────────────────────────────────────────

/// Spawns one [`Patient`] per exponentially distributed inter-arrival gap.
#[derive(Debug)]
pub struct ArrivalGenerator {
    doctors:  ResourceId,
    sleeping: bool,
}

impl ArrivalGenerator {
    pub fn new(doctors: ResourceId) -> Self {
        Self { doctors, sleeping: false }
    }
}

impl Process<ClinicState> for ArrivalGenerator {
    fn resume(&mut self, ctx: &mut ProcessContext<'_, ClinicState>) -> EngineResult<Step> {
        if self.sleeping {
            let now = ctx.now();
            let state = ctx.state();
            let number = state.next_patient;
            state.next_patient += 1;
            state.metrics.record_arrival();
            ctx.spawn(Patient::new(number, self.doctors, now))?;
        }

        let state = ctx.state();
        let gap = state.arrivals.next_exponential(state.mean_interarrival)?;
        self.sleeping = true;
        Ok(Step::Timeout(gap))
    }
}

// ── Patient ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Arriving,
    Queued,
    InService,
}

/// One served entity: waits for a doctor, is treated, leaves.
#[derive(Debug)]
pub struct Patient {
    number:  u64,
    doctors: ResourceId,
    arrived: SimTime,
    service: f64,
    phase:   Phase,
}

impl Patient {
    pub fn new(number: u64, doctors: ResourceId, arrived: SimTime) -> Self {
        Self {
            number,
            doctors,
            arrived,
            service: 0.0,
            phase: Phase::Arriving,
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }
}

impl Process<ClinicState> for Patient {
    fn resume(&mut self, ctx: &mut ProcessContext<'_, ClinicState>) -> EngineResult<Step> {
        let now = ctx.now();
        match self.phase {
            Phase::Arriving => {
                debug!(patient = self.number, %now, "arrives");
                self.phase = Phase::Queued;
                Ok(Step::Acquire(self.doctors))
            }
            Phase::Queued => {
                let wait = now.since(self.arrived);
                let state = ctx.state();
                state.metrics.record_wait(wait);
                self.service = state.service.next_exponential(state.mean_service)?;
                debug!(patient = self.number, %now, wait, service = self.service, "starts treatment");
                self.phase = Phase::InService;
                Ok(Step::Timeout(self.service))
            }
            Phase::InService => {
                ctx.release(self.doctors)?;
                ctx.state().metrics.record_departure();
                debug!(patient = self.number, %now, "leaves");
                Ok(Step::Done)
            }
        }
    }
}
