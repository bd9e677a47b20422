//! Core projection engine for annual revenue, cost and subsidy projections

use crate::error::{ProjectionError, Result};
use crate::params::{
    ensure_finite, OtherCosts, PartnershipModel, ProductStream, ProjectionParams, ScenarioMultiplier,
    StaffingModel,
};
use super::table::{ProjectionTable, YearRecord};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Default number of projected years (2025-2030)
pub const DEFAULT_HORIZON: u32 = 6;

/// Default first projected year
pub const DEFAULT_BASE_YEAR: i32 = 2025;

/// Share of positive margin paid out as partner subsidy
pub const DEFAULT_SUBSIDY_FRACTION: f64 = 0.5;

/// Longest horizon accepted, in years
pub const MAX_HORIZON: u32 = 1_000;

/// Configuration for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Number of years to project
    pub horizon: u32,

    /// Calendar year of the first record
    pub base_year: i32,

    /// Fraction of positive margin allocated to subsidy
    pub subsidy_fraction: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            base_year: DEFAULT_BASE_YEAR,
            subsidy_fraction: DEFAULT_SUBSIDY_FRACTION,
        }
    }
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_finite("subsidy_fraction", self.subsidy_fraction)?;
        if self.horizon > MAX_HORIZON {
            return Err(ProjectionError::invalid(format!(
                "horizon {} exceeds the maximum of {} years",
                self.horizon, MAX_HORIZON
            )));
        }
        let last_offset = i32::try_from(self.horizon.saturating_sub(1)).ok();
        if last_offset.and_then(|offset| self.base_year.checked_add(offset)).is_none() {
            return Err(ProjectionError::invalid(format!(
                "horizon {} from base year {} overflows the calendar",
                self.horizon, self.base_year
            )));
        }
        Ok(())
    }
}

/// Compound growth factor after `years` at `rate_percent` per year
fn growth_factor(rate_percent: f64, years: u32) -> f64 {
    (1.0 + rate_percent / 100.0).powi(years as i32)
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the projection for one parameter set
    ///
    /// Parameters are validated up front; on error no table is produced.
    pub fn project(&self, params: &ProjectionParams) -> Result<ProjectionTable> {
        self.config.validate()?;
        params.validate()?;

        debug!(
            "projecting {} streams over {} years from {} ({} scenario)",
            params.products.len(),
            self.config.horizon,
            self.config.base_year,
            params.scenario
        );

        let stream_names = params.products.iter().map(|p| p.name.clone()).collect();
        let mut table = ProjectionTable::new(params.scenario, stream_names, self.config.horizon as usize);

        for offset in 0..self.config.horizon {
            let record = self.calculate_year(params, offset);
            ensure_record_finite(&record)?;
            table.add_record(record);
        }

        Ok(table)
    }

    /// Calculate the record for year index `offset`
    fn calculate_year(&self, params: &ProjectionParams, offset: u32) -> YearRecord {
        let multiplier = params.scenario.multiplier();

        // Scenario scales the growth rate before compounding
        let revenues: IndexMap<String, f64> = params
            .products
            .iter()
            .map(|p| {
                let revenue = p.initial_revenue * growth_factor(p.growth_rate_percent * multiplier, offset);
                (p.name.clone(), revenue)
            })
            .collect();

        // Costs are not scenario-adjusted
        let staffing_costs =
            params.staffing.base_cost() * growth_factor(params.staffing.cost_growth_percent, offset);
        let other_costs =
            params.other_costs.initial * growth_factor(params.other_costs.growth_rate_percent, offset);

        let total_revenue: f64 = revenues.values().sum();
        let total_costs = staffing_costs + other_costs;
        let margin = total_revenue - total_costs;
        let total_subsidy = (margin * self.config.subsidy_fraction).max(0.0);

        let avg_subsidy_per_partner = match params.partnerships.num_partners {
            0 => 0.0,
            n => total_subsidy / n as f64,
        };

        YearRecord {
            year: self.config.base_year + offset as i32,
            revenues,
            staffing_costs,
            other_costs,
            total_revenue,
            total_costs,
            margin,
            total_subsidy,
            avg_subsidy_per_partner,
        }
    }
}

/// Reject a record whose amounts overflowed during compounding
fn ensure_record_finite(record: &YearRecord) -> Result<()> {
    for (name, revenue) in &record.revenues {
        ensure_finite(&format!("{} {} revenue", record.year, name), *revenue)?;
    }
    for (field, value) in [
        ("staffing_costs", record.staffing_costs),
        ("other_costs", record.other_costs),
        ("total_revenue", record.total_revenue),
        ("total_costs", record.total_costs),
        ("margin", record.margin),
        ("total_subsidy", record.total_subsidy),
        ("avg_subsidy_per_partner", record.avg_subsidy_per_partner),
    ] {
        ensure_finite(&format!("{} {}", record.year, field), value)?;
    }
    Ok(())
}

/// Compute a projection from the default base year with the default subsidy fraction
///
/// A negative `horizon` is rejected as an invalid parameter.
pub fn compute(
    horizon: i64,
    scenario: ScenarioMultiplier,
    products: &[ProductStream],
    staffing: StaffingModel,
    other_costs: OtherCosts,
    partnerships: PartnershipModel,
) -> Result<ProjectionTable> {
    let horizon = u32::try_from(horizon).map_err(|_| {
        ProjectionError::invalid(format!("horizon must be a non-negative number of years, got {}", horizon))
    })?;

    let params = ProjectionParams {
        scenario,
        products: products.to_vec(),
        staffing,
        other_costs,
        partnerships,
    };
    let config = ProjectionConfig {
        horizon,
        ..Default::default()
    };

    ProjectionEngine::new(config).project(&params)
}
