//! Flat row types written by the sinks.

use qn_sim::ScenarioResult;

/// One row of `scenario_summary.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummaryRow {
    pub label:          String,
    pub total_arrived:  u64,
    pub total_started:  u64,
    pub total_departed: u64,
    pub mean_wait:      f64,
    pub max_wait:       f64,
}

impl From<&ScenarioResult> for ScenarioSummaryRow {
    fn from(r: &ScenarioResult) -> Self {
        Self {
            label:          r.label.clone(),
            total_arrived:  r.total_arrived,
            total_started:  r.total_started,
            total_departed: r.total_departed,
            mean_wait:      r.mean_wait,
            max_wait:       r.max_wait,
        }
    }
}

/// One row of `wait_samples.csv`: the `index`-th patient (0-based, service
/// start order) of scenario `label` waited `wait` time units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitSampleRow<'a> {
    pub label: &'a str,
    pub index: usize,
    pub wait:  f64,
}

impl<'a> WaitSampleRow<'a> {
    /// All wait rows of `result`, in sample order.
    pub fn all(result: &'a ScenarioResult) -> impl Iterator<Item = WaitSampleRow<'a>> + 'a {
        result
            .wait_samples
            .iter()
            .enumerate()
            .map(move |(index, &wait)| WaitSampleRow { label: &result.label, index, wait })
    }
}
