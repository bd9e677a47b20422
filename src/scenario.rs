//! Scenario runner for comparing projections
//!
//! Holds one run configuration and evaluates it against every scenario, or against
//! a batch of parameter sets, in parallel.

use crate::error::Result;
use crate::params::{ProjectionParams, ScenarioMultiplier};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionTable};
use log::info;
use rayon::prelude::*;

/// Runner sharing a single configuration across many projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let comparison = runner.run_scenarios(&ProjectionParams::reference())?;
/// for table in comparison.tables() {
///     println!("{}: {:?}", table.scenario(), table.break_even_year());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the default configuration (2025, six years, 50% subsidy)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        self.engine.config()
    }

    /// Run a single projection
    pub fn run(&self, params: &ProjectionParams) -> Result<ProjectionTable> {
        self.engine.project(params)
    }

    /// Run projections for several parameter sets; results keep input order
    pub fn run_batch(&self, batch: &[ProjectionParams]) -> Vec<Result<ProjectionTable>> {
        info!("running batch of {} projections", batch.len());
        batch.par_iter().map(|params| self.engine.project(params)).collect()
    }

    /// Run the same parameters under every scenario
    ///
    /// The scenario in `params` is ignored. Parameters are validated once, so an
    /// invalid set fails before any scenario runs.
    pub fn run_scenarios(&self, params: &ProjectionParams) -> Result<ScenarioComparison> {
        self.engine.config().validate()?;
        params.validate()?;

        info!("running {} scenarios", ScenarioMultiplier::ALL.len());
        let tables = ScenarioMultiplier::ALL
            .par_iter()
            .map(|&scenario| self.engine.project(&params.with_scenario(scenario)))
            .collect::<Result<Vec<_>>>()?;

        Ok(ScenarioComparison { tables })
    }
}

/// One table per scenario, most optimistic first
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioComparison {
    tables: Vec<ProjectionTable>,
}

impl ScenarioComparison {
    pub fn tables(&self) -> &[ProjectionTable] {
        &self.tables
    }

    pub fn get(&self, scenario: ScenarioMultiplier) -> Option<&ProjectionTable> {
        self.tables.iter().find(|t| t.scenario() == scenario)
    }

    /// Break-even year of each scenario
    pub fn break_even_years(&self) -> Vec<(ScenarioMultiplier, Option<i32>)> {
        self.tables.iter().map(|t| (t.scenario(), t.break_even_year())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_scenarios_order() {
        let runner = ScenarioRunner::new();
        let comparison = runner.run_scenarios(&ProjectionParams::reference()).unwrap();

        let scenarios: Vec<_> = comparison.tables().iter().map(|t| t.scenario()).collect();
        assert_eq!(scenarios, ScenarioMultiplier::ALL.to_vec());

        // Higher multiplier should give higher final revenue
        let final_revenue = |s: ScenarioMultiplier| comparison.get(s).unwrap().final_year().unwrap().total_revenue;
        assert!(final_revenue(ScenarioMultiplier::Optimistic) > final_revenue(ScenarioMultiplier::MostLikely));
        assert!(final_revenue(ScenarioMultiplier::MostLikely) > final_revenue(ScenarioMultiplier::Pessimistic));
    }

    #[test]
    fn test_run_scenarios_matches_single_runs() {
        let runner = ScenarioRunner::new();
        let params = ProjectionParams::reference();
        let comparison = runner.run_scenarios(&params).unwrap();

        for scenario in ScenarioMultiplier::ALL {
            let single = runner.run(&params.with_scenario(scenario)).unwrap();
            assert_eq!(comparison.get(scenario), Some(&single));
        }
    }

    #[test]
    fn test_run_scenarios_invalid_params() {
        let mut params = ProjectionParams::reference();
        params.products.clear();

        let err = ScenarioRunner::new().run_scenarios(&params).unwrap_err();
        assert!(err.is_invalid_parameters());
    }

    #[test]
    fn test_run_batch_keeps_order_and_errors() {
        let runner = ScenarioRunner::with_config(ProjectionConfig {
            horizon: 3,
            ..Default::default()
        });

        let mut invalid = ProjectionParams::reference();
        invalid.products.clear();
        let mut fewer_partners = ProjectionParams::reference();
        fewer_partners.partnerships.num_partners = 1;

        let results = runner.run_batch(&[ProjectionParams::reference(), invalid, fewer_partners]);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().len(), 3);
        assert!(results[1].is_err());
        let per_partner = |i: usize| results[i].as_ref().unwrap().records()[2].avg_subsidy_per_partner;
        assert!(per_partner(2) > per_partner(0));
    }
}
