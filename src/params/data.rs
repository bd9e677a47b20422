//! Business parameters driving a projection run

use crate::error::{ProjectionError, Result};
use crate::projection::{revenue_column, SUMMARY_COLUMNS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Optimism scenario applied to every product's growth rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScenarioMultiplier {
    Optimistic,
    #[default]
    #[serde(rename = "Most Likely", alias = "MostLikely")]
    MostLikely,
    Pessimistic,
}

impl ScenarioMultiplier {
    /// All scenarios, most optimistic first
    pub const ALL: [ScenarioMultiplier; 3] = [
        ScenarioMultiplier::Optimistic,
        ScenarioMultiplier::MostLikely,
        ScenarioMultiplier::Pessimistic,
    ];

    /// Factor applied to nominal growth rates before compounding
    pub fn multiplier(&self) -> f64 {
        match self {
            ScenarioMultiplier::Optimistic => 1.2,
            ScenarioMultiplier::MostLikely => 1.0,
            ScenarioMultiplier::Pessimistic => 0.8,
        }
    }

    /// Display label, e.g. "Most Likely"
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioMultiplier::Optimistic => "Optimistic",
            ScenarioMultiplier::MostLikely => "Most Likely",
            ScenarioMultiplier::Pessimistic => "Pessimistic",
        }
    }
}

impl fmt::Display for ScenarioMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioMultiplier {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        // Accept "Most Likely", "MostLikely", "most-likely", "most_likely"
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "optimistic" => Ok(ScenarioMultiplier::Optimistic),
            "mostlikely" => Ok(ScenarioMultiplier::MostLikely),
            "pessimistic" => Ok(ScenarioMultiplier::Pessimistic),
            _ => Err(ProjectionError::invalid(format!("unknown scenario: {}", s))),
        }
    }
}

/// One revenue-generating product line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStream {
    /// Label used as the column key; must be unique within a run
    pub name: String,

    /// Revenue in the base year
    pub initial_revenue: f64,

    /// Nominal annual growth rate in percent (20.0 = 20%)
    #[serde(alias = "growth_rate")]
    pub growth_rate_percent: f64,
}

impl ProductStream {
    pub fn new(name: impl Into<String>, initial_revenue: f64, growth_rate_percent: f64) -> Self {
        Self {
            name: name.into(),
            initial_revenue,
            growth_rate_percent,
        }
    }
}

/// Staffing cost model: headcount times salary, compounding annually
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaffingModel {
    pub num_employees: u32,
    pub avg_salary: f64,
    /// Annual salary growth in percent
    #[serde(alias = "cost_growth")]
    pub cost_growth_percent: f64,
}

impl StaffingModel {
    /// Staffing cost in the base year
    pub fn base_cost(&self) -> f64 {
        self.num_employees as f64 * self.avg_salary
    }
}

/// Non-staff costs, compounding annually
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OtherCosts {
    pub initial: f64,
    #[serde(alias = "growth_rate")]
    pub growth_rate_percent: f64,
}

/// Partner organisations sharing the subsidy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipModel {
    pub num_partners: u32,
}

/// Complete, immutable input for one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub scenario: ScenarioMultiplier,
    pub products: Vec<ProductStream>,
    pub staffing: StaffingModel,
    pub other_costs: OtherCosts,
    pub partnerships: PartnershipModel,
}

impl ProjectionParams {
    /// Reference configuration: three product lines, five staff, five partners
    pub fn reference() -> Self {
        Self {
            scenario: ScenarioMultiplier::MostLikely,
            products: vec![
                ProductStream::new("B2B Research", 200_000.0, 20.0),
                ProductStream::new("Events", 150_000.0, 15.0),
                ProductStream::new("B2C Products", 100_000.0, 25.0),
            ],
            staffing: StaffingModel {
                num_employees: 5,
                avg_salary: 80_000.0,
                cost_growth_percent: 3.0,
            },
            other_costs: OtherCosts {
                initial: 100_000.0,
                growth_rate_percent: 5.0,
            },
            partnerships: PartnershipModel { num_partners: 5 },
        }
    }

    /// Same parameters under a different scenario
    pub fn with_scenario(&self, scenario: ScenarioMultiplier) -> Self {
        Self {
            scenario,
            ..self.clone()
        }
    }

    /// Check the parameter contract: at least one product, unique names, finite numbers
    pub fn validate(&self) -> Result<()> {
        if self.products.is_empty() {
            return Err(ProjectionError::invalid("at least one product stream is required"));
        }

        let mut seen = HashSet::with_capacity(self.products.len());
        for product in &self.products {
            if !seen.insert(product.name.as_str()) {
                return Err(ProjectionError::invalid(format!(
                    "duplicate product stream name: {}",
                    product.name
                )));
            }
            if SUMMARY_COLUMNS.contains(&revenue_column(&product.name).as_str()) {
                return Err(ProjectionError::invalid(format!(
                    "product stream name {:?} collides with the {:?} column",
                    product.name,
                    revenue_column(&product.name)
                )));
            }
            ensure_finite(&format!("{} initial_revenue", product.name), product.initial_revenue)?;
            ensure_finite(
                &format!("{} growth_rate_percent", product.name),
                product.growth_rate_percent,
            )?;
        }

        ensure_finite("staffing avg_salary", self.staffing.avg_salary)?;
        ensure_finite("staffing cost_growth_percent", self.staffing.cost_growth_percent)?;
        ensure_finite("other_costs initial", self.other_costs.initial)?;
        ensure_finite("other_costs growth_rate_percent", self.other_costs.growth_rate_percent)?;

        Ok(())
    }
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self::reference()
    }
}

pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::invalid(format!("{} must be finite, got {}", field, value)))
    }
}
