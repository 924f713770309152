//! Metric definitions and aggregation

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use domain_review::ReviewKind;

use crate::activity::ReviewActivity;

/// Which milestone places a review inside a reporting range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityField {
    Received,
    Established,
    Decided,
}

impl ActivityField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityField::Received => "received",
            ActivityField::Established => "established",
            ActivityField::Decided => "decided",
        }
    }
}

/// Subset of reviews a metric counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityFilter {
    All,
    Kind(ReviewKind),
    DtaClaims,
}

impl ActivityFilter {
    pub fn matches(&self, activity: &ReviewActivity) -> bool {
        match self {
            ActivityFilter::All => true,
            ActivityFilter::Kind(kind) => activity.kind == *kind,
            ActivityFilter::DtaClaims => activity.is_dta_claim,
        }
    }
}

/// Elapsed time between two milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    TimeToEstablish,
    TimeToDecision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Count,
    DistinctVeterans,
    /// Nearest-rank percentile of a measure, in seconds
    Percentile { measure: Measure, pct: u8 },
}

/// One named metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDefinition {
    pub name: &'static str,
    pub field: ActivityField,
    pub filter: ActivityFilter,
    pub aggregation: Aggregation,
}

impl MetricDefinition {
    /// Computes the metric over activity already restricted to the range
    ///
    /// Percentiles of an empty selection have no value.
    pub fn evaluate(&self, activity: &[ReviewActivity]) -> Option<f64> {
        let selected = activity.iter().filter(|row| self.filter.matches(row));
        match self.aggregation {
            Aggregation::Count => Some(selected.count() as f64),
            Aggregation::DistinctVeterans => {
                let veterans: HashSet<&str> = selected.map(|row| row.veteran_file_number.as_str()).collect();
                Some(veterans.len() as f64)
            }
            Aggregation::Percentile { measure, pct } => {
                let mut values: Vec<f64> = selected.filter_map(|row| row.measure_seconds(measure)).collect();
                percentile(&mut values, pct)
            }
        }
    }
}

/// Nearest-rank percentile; sorts `values` in place
pub fn percentile(values: &mut [f64], pct: u8) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let rank = (f64::from(pct.min(100)) / 100.0 * values.len() as f64).ceil() as usize;
    let index = rank.clamp(1, values.len()) - 1;
    Some(values[index])
}
