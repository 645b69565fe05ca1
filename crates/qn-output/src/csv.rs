//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `scenario_summary.csv`: one row per scenario
//! - `wait_samples.csv`: one row per patient that started service

use std::fs::File;
use std::path::Path;

use csv::Writer;
use qn_sim::ScenarioResult;

use crate::row::{ScenarioSummaryRow, WaitSampleRow};
use crate::sink::ReportSink;
use crate::OutputResult;

pub const SUMMARY_FILE: &str = "scenario_summary.csv";
pub const SAMPLES_FILE: &str = "wait_samples.csv";

/// Writes scenario results to two CSV files.
pub struct CsvSink {
    summaries: Writer<File>,
    samples:   Writer<File>,
    finished:  bool,
}

impl CsvSink {
    /// Create (or truncate) the two CSV files in `dir` and write the header
    /// rows.  `dir` must already exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut summaries = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summaries.write_record([
            "label",
            "total_arrived",
            "total_started",
            "total_departed",
            "mean_wait",
            "max_wait",
        ])?;

        let mut samples = Writer::from_path(dir.join(SAMPLES_FILE))?;
        samples.write_record(["label", "index", "wait"])?;

        Ok(Self {
            summaries,
            samples,
            finished: false,
        })
    }

    fn write_summary(&mut self, row: &ScenarioSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.label.clone(),
            row.total_arrived.to_string(),
            row.total_started.to_string(),
            row.total_departed.to_string(),
            row.mean_wait.to_string(),
            row.max_wait.to_string(),
        ])?;
        Ok(())
    }

    fn write_sample(&mut self, row: &WaitSampleRow<'_>) -> OutputResult<()> {
        self.samples.write_record(&[
            row.label.to_owned(),
            row.index.to_string(),
            row.wait.to_string(),
        ])?;
        Ok(())
    }
}

impl ReportSink for CsvSink {
    fn submit(&mut self, result: &ScenarioResult) -> OutputResult<()> {
        self.write_summary(&ScenarioSummaryRow::from(result))?;
        for row in WaitSampleRow::all(result) {
            self.write_sample(&row)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.samples.flush()?;
        Ok(())
    }
}
