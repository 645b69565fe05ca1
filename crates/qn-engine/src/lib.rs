//! `qn-engine` — the discrete-event kernel of the rust_qn simulator.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`queue`]     | `Event`, `EventQueue` (min-heap on `(fire_time, seq)`)      |
//! | [`resource`]  | `ResourcePool` (bounded, FIFO-fair), `Request`              |
//! | [`process`]   | `Process<S>` trait, `Step`, `ProcessContext<'_, S>`         |
//! | [`sim`]       | `Simulation<S>` — clock, process table, run loop            |
//! | [`error`]     | `EngineError`, `EngineResult<T>`                            |
//!
//! # Execution model
//!
//! ```text
//! run(until):
//!   while next event time ≤ until:
//!     pop (fire_time, seq, pid) → clock = fire_time
//!     resume pid until it returns a Step:
//!       Timeout(d)  → push (now + d, next seq, pid)
//!       Acquire(r)  → granted: resume again at the same instant
//!                     busy:    park pid on r's FIFO wait list
//!       Done        → release everything pid still holds, drop it
//! ```
//!
//! Exactly one process runs at a time and always to its next suspension
//! point.  Events at equal times run in the order they were scheduled, so a
//! run is fully determined by its initial processes and the world state `S`
//! they draw from.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use qn_engine::{Process, ProcessContext, Simulation, Step, EngineResult};
//!
//! struct Ticker;
//!
//! impl Process<u32> for Ticker {
//!     fn resume(&mut self, ctx: &mut ProcessContext<'_, u32>) -> EngineResult<Step> {
//!         *ctx.state() += 1;
//!         Ok(Step::Timeout(1.0))
//!     }
//! }
//!
//! let mut sim = Simulation::new(0u32);
//! sim.spawn(Ticker)?;
//! sim.run(10.0)?;
//! assert_eq!(*sim.state(), 11);
//! ```

pub mod error;
pub mod process;
pub mod queue;
pub mod resource;
pub mod sim;

#[cfg(test)]
mod tests;

pub use error::{EngineError, EngineResult};
pub use process::{Process, ProcessContext, Step};
pub use queue::{Event, EventQueue};
pub use resource::{Request, ResourcePool};
pub use sim::Simulation;
