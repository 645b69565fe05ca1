//! CSV scenario loader.
//!
//! # CSV format
//!
//! One row per scenario, in run order:
//!
//! ```csv
//! label,capacity,mean_interarrival,mean_service,horizon,seed
//! doctors2_interval5,2,5,10,100,42
//! doctors3_interval5,3,5,10,100,42
//! quiet,2,inf,10,100,7
//! ```
//!
//! `inf` is accepted for the mean inter-arrival time and means no patient
//! ever arrives.  Rows are only parsed here; range checks (capacity ≥ 1,
//! positive means, non-negative horizon) happen per scenario in the runner so
//! that one bad row does not hide the others.

use std::io::Read;
use std::path::Path;

use qn_core::ScenarioConfig;

use crate::{SimError, SimResult};

/// Load scenarios from a CSV file.
pub fn load_scenarios_csv(path: &Path) -> SimResult<Vec<ScenarioConfig>> {
    let file = std::fs::File::open(path)?;
    load_scenarios_reader(file)
}

/// Like [`load_scenarios_csv`] but accepts any `Read` source.
pub fn load_scenarios_reader<R: Read>(reader: R) -> SimResult<Vec<ScenarioConfig>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<ScenarioConfig>()
        .map(|row| row.map_err(|e| SimError::Parse(e.to_string())))
        .collect()
}
