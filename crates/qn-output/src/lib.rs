//! `qn-output` — result sinks for the rust_qn queueing simulator.
//!
//! | Sink         | Destination                                        |
//! |--------------|----------------------------------------------------|
//! | `MemorySink` | a `Vec<ScenarioResult>`                            |
//! | `CsvSink`    | `scenario_summary.csv`, `wait_samples.csv`         |
//!
//! All sinks implement [`ReportSink`] and are driven by [`run_into`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use qn_output::{run_into, CsvSink};
//!
//! let mut sink = CsvSink::new(Path::new("./output"))?;
//! let outcomes = run_into(&ScenarioConfig::hospital_defaults(), &mut sink)?;
//! ```

pub mod csv;
pub mod error;
pub mod report;
pub mod row;
pub mod sink;


pub use crate::csv::CsvSink;
pub use error::{OutputError, OutputResult};
pub use report::run_into;
pub use row::{ScenarioSummaryRow, WaitSampleRow};
pub use sink::{MemorySink, ReportSink};
