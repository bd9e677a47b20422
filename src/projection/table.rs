//! Projection output: per-year records and the derivations read by the presentation layer

use crate::params::ScenarioMultiplier;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column label for the calendar year
pub const YEAR_COLUMN: &str = "Year";

/// Column labels of the fixed per-year amounts, in export order
pub const SUMMARY_COLUMNS: [&str; 7] = [
    "Staffing Costs",
    "Other Costs",
    "Total Revenue",
    "Total Costs",
    "Margin",
    "Total Subsidy",
    "Avg Subsidy per Partner",
];

/// Column label of a product stream's revenue
pub fn revenue_column(stream: &str) -> String {
    format!("{} Revenue", stream)
}

/// One year of the projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// Calendar year (base year + offset)
    pub year: i32,

    /// Revenue per product stream, in product order
    pub revenues: IndexMap<String, f64>,

    // Costs
    pub staffing_costs: f64,
    pub other_costs: f64,

    // Totals
    pub total_revenue: f64,
    pub total_costs: f64,
    pub margin: f64,

    // Subsidy
    pub total_subsidy: f64,
    pub avg_subsidy_per_partner: f64,
}

impl YearRecord {
    /// Revenue of a single stream, if the stream exists
    pub fn revenue(&self, stream: &str) -> Option<f64> {
        self.revenues.get(stream).copied()
    }

    /// Whether revenue covers costs in this year
    pub fn breaks_even(&self) -> bool {
        self.total_revenue >= self.total_costs
    }
}

/// Ordered year-by-year result of a projection run
///
/// Records are only added by the engine; consumers get read-only access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTable {
    scenario: ScenarioMultiplier,
    stream_names: Vec<String>,
    records: Vec<YearRecord>,
}

impl ProjectionTable {
    pub(crate) fn new(scenario: ScenarioMultiplier, stream_names: Vec<String>, capacity: usize) -> Self {
        Self {
            scenario,
            stream_names,
            records: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn add_record(&mut self, record: YearRecord) {
        self.records.push(record);
    }

    /// Scenario the table was computed under
    pub fn scenario(&self) -> ScenarioMultiplier {
        self.scenario
    }

    /// Product stream names in input order
    pub fn stream_names(&self) -> &[String] {
        &self.stream_names
    }

    pub fn records(&self) -> &[YearRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Last year of the projection; `None` for an empty table
    pub fn final_year(&self) -> Option<&YearRecord> {
        self.records.last()
    }

    /// First year in which total revenue is at least total costs
    ///
    /// `None` means no break-even within the horizon.
    pub fn break_even_year(&self) -> Option<i32> {
        self.records.iter().find(|r| r.breaks_even()).map(|r| r.year)
    }

    /// Record for a given calendar year
    pub fn record_for_year(&self, year: i32) -> Option<&YearRecord> {
        self.records.iter().find(|r| r.year == year)
    }

    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// Revenue series for one stream; `None` if no stream has that name
    pub fn stream_revenue(&self, stream: &str) -> Option<Vec<f64>> {
        if !self.stream_names.iter().any(|name| name == stream) {
            return None;
        }
        Some(self.records.iter().filter_map(|r| r.revenue(stream)).collect())
    }

    pub fn total_revenue(&self) -> Vec<f64> {
        self.series(|r| r.total_revenue)
    }

    pub fn total_costs(&self) -> Vec<f64> {
        self.series(|r| r.total_costs)
    }

    pub fn margin(&self) -> Vec<f64> {
        self.series(|r| r.margin)
    }

    pub fn total_subsidy(&self) -> Vec<f64> {
        self.series(|r| r.total_subsidy)
    }

    pub fn avg_subsidy_per_partner(&self) -> Vec<f64> {
        self.series(|r| r.avg_subsidy_per_partner)
    }

    fn series(&self, field: impl Fn(&YearRecord) -> f64) -> Vec<f64> {
        self.records.iter().map(field).collect()
    }

    /// Cumulative totals over the horizon plus the final-year and break-even figures
    pub fn summary(&self) -> ProjectionSummary {
        let cumulative_revenue: f64 = self.records.iter().map(|r| r.total_revenue).sum();
        let cumulative_costs: f64 = self.records.iter().map(|r| r.total_costs).sum();
        let cumulative_subsidy: f64 = self.records.iter().map(|r| r.total_subsidy).sum();

        ProjectionSummary {
            scenario: self.scenario,
            total_years: self.records.len() as u32,
            cumulative_revenue,
            cumulative_costs,
            cumulative_margin: cumulative_revenue - cumulative_costs,
            cumulative_subsidy,
            final_year: self.final_year().cloned(),
            break_even_year: self.break_even_year(),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub scenario: ScenarioMultiplier,
    pub total_years: u32,
    pub cumulative_revenue: f64,
    pub cumulative_costs: f64,
    pub cumulative_margin: f64,
    pub cumulative_subsidy: f64,
    pub final_year: Option<YearRecord>,
    pub break_even_year: Option<i32>,
}
