//! The `ReportSink` trait and the in-memory sink.

use qn_sim::ScenarioResult;

use crate::OutputResult;

/// Destination for finished scenario results.
///
/// Results arrive one at a time in scenario input order.  `finish` flushes
/// whatever the sink buffers; it is idempotent.
pub trait ReportSink {
    fn submit(&mut self, result: &ScenarioResult) -> OutputResult<()>;

    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// A [`ReportSink`] that keeps every result in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    results: Vec<ScenarioResult>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[ScenarioResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<ScenarioResult> {
        self.results
    }
}

impl ReportSink for MemorySink {
    fn submit(&mut self, result: &ScenarioResult) -> OutputResult<()> {
        self.results.push(result.clone());
        Ok(())
    }
}
