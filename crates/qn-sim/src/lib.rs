//! `qn-sim` — the hospital clinic model and scenario runner for the rust_qn
//! queueing simulator.
//!
//! # Run lifecycle
//!
//! ```text
//! for each ScenarioConfig (input order):
//!   ① Validate   — ConfigError lands in the scenario's slot; the rest go on.
//!   ② Build      — fresh Simulation<ClinicState>: clock at 0, one doctor
//!                  pool of `capacity`, empty metrics, both draw channels
//!                  seeded from `seed`.
//!   ③ Run        — ArrivalGenerator spawned at t = 0; every event with
//!                  fire time ≤ horizon executes.
//!   ④ Teardown   — still-queued patients are withdrawn, doctors released,
//!                  the clock is closed.
//!   ⑤ Summarize  — MetricsAccumulator → ScenarioResult.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | `run_all` executes scenarios on Rayon's thread pool.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use qn_core::ScenarioConfig;
//! use qn_sim::run_scenario;
//!
//! let result = run_scenario(&ScenarioConfig::hospital(2, 5.0))?;
//! println!("{} served, mean wait {:.2}", result.total_departed, result.mean_wait);
//! ```

pub mod clinic;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod result;
pub mod runner;


pub use clinic::{ArrivalGenerator, ClinicState, Patient};
pub use error::{SimError, SimResult};
pub use loader::{load_scenarios_csv, load_scenarios_reader};
pub use metrics::MetricsAccumulator;
pub use result::ScenarioResult;
pub use runner::{run_all, run_scenario, ScenarioOutcome, ScenarioRunner};
