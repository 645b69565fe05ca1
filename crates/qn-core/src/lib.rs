//! `qn-core` — foundational types for the `rust_qn` queueing simulator.
//!
//! This crate is a dependency of every other `qn-*` crate.  It has no `qn-*`
//! dependencies and only a handful of external ones (`rand`, `rand_distr`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`ids`]     | `ProcessId`, `ResourceId`                               |
//! | [`time`]    | `SimTime` (virtual time, totally ordered `f64`)         |
//! | [`rng`]     | `VariateSource` (seeded exponential draws)              |
//! | [`config`]  | `ScenarioConfig` and its validation                     |
//! | [`error`]   | `ConfigError`, `ConfigResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to `SimTime`, ids, and      |
//! |         | `ScenarioConfig`.                                          |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::ScenarioConfig;
pub use error::{ConfigError, ConfigResult};
pub use ids::{ProcessId, ResourceId};
pub use rng::VariateSource;
pub use time::SimTime;
