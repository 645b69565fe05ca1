//! `run_into` — drives a scenario batch into a [`ReportSink`].

use qn_core::ScenarioConfig;
use qn_sim::{run_all, ScenarioOutcome};
use tracing::debug;

use crate::sink::ReportSink;
use crate::OutputResult;

/// Run every scenario, submit each successful result to `sink` in input
/// order, then finish the sink.
///
/// Returns the full outcome list so the caller can still see which scenarios
/// were rejected.  An invariant violation aborts before anything is
/// submitted.
pub fn run_into<K: ReportSink + ?Sized>(
    configs: &[ScenarioConfig],
    sink:    &mut K,
) -> OutputResult<Vec<ScenarioOutcome>> {
    let outcomes = run_all(configs)?;
    let mut submitted = 0usize;
    for result in outcomes.iter().flatten() {
        sink.submit(result)?;
        submitted += 1;
    }
    sink.finish()?;
    debug!(submitted, rejected = outcomes.len() - submitted, "results reported");
    Ok(outcomes)
}
