//! Earned Revenue Projections CLI
//!
//! Loads projection parameters (reference configuration by default), runs the
//! projection and prints the table, final-year key metrics and break-even year.

use anyhow::{Context, Result};
use clap::Parser;
use earned_revenue_projections::{
    output::{self, ProjectionReport},
    params::{load_params, load_products, LoadedParameters},
    ProjectionConfig, ProjectionError, ProjectionParams, ProjectionTable, ScenarioMultiplier,
    ScenarioRunner,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "earned-revenue-projections", version, about)]
struct Cli {
    /// JSON parameter file; omitted sections use the reference configuration
    #[arg(long)]
    params: Option<PathBuf>,

    /// CSV file of product streams (name,initial_revenue,growth_rate_percent)
    #[arg(long)]
    products: Option<PathBuf>,

    /// Scenario: "Optimistic", "Most Likely" or "Pessimistic"
    #[arg(long)]
    scenario: Option<ScenarioMultiplier>,

    /// Number of years to project
    #[arg(long, allow_negative_numbers = true)]
    horizon: Option<i64>,

    /// First projected calendar year
    #[arg(long)]
    base_year: Option<i32>,

    /// Share of positive margin paid out as subsidy
    #[arg(long)]
    subsidy_fraction: Option<f64>,

    /// Run every scenario and compare them
    #[arg(long)]
    all_scenarios: bool,

    /// Write the projection table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Build parameters and config from files, then apply flag overrides
    fn load(&self) -> Result<LoadedParameters> {
        let mut loaded = match &self.params {
            Some(path) => load_params(path)
                .with_context(|| format!("loading parameters from {}", path.display()))?,
            None => LoadedParameters {
                params: ProjectionParams::reference(),
                config: ProjectionConfig::default(),
            },
        };

        if let Some(path) = &self.products {
            loaded.params.products = load_products(path)
                .with_context(|| format!("loading products from {}", path.display()))?;
        }
        if let Some(scenario) = self.scenario {
            loaded.params.scenario = scenario;
        }
        if let Some(horizon) = self.horizon {
            loaded.config.horizon = u32::try_from(horizon).map_err(|_| {
                ProjectionError::InvalidParameters(format!(
                    "horizon must be a non-negative number of years, got {}",
                    horizon
                ))
            })?;
        }
        if let Some(base_year) = self.base_year {
            loaded.config.base_year = base_year;
        }
        if let Some(fraction) = self.subsidy_fraction {
            loaded.config.subsidy_fraction = fraction;
        }

        Ok(loaded)
    }
}

fn print_table(table: &ProjectionTable) {
    let mut header = format!("{:>6}", "Year");
    for name in table.stream_names() {
        header.push_str(&format!(" {:>14}", truncate(name, 14)));
    }
    for label in ["Staffing", "Other Costs", "Total Rev", "Total Costs", "Margin", "Subsidy", "Per Partner"] {
        header.push_str(&format!(" {:>14}", label));
    }
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    for record in table.records() {
        let mut line = format!("{:>6}", record.year);
        for value in record.revenues.values() {
            line.push_str(&format!(" {:>14}", output::format_currency(*value)));
        }
        for value in [
            record.staffing_costs,
            record.other_costs,
            record.total_revenue,
            record.total_costs,
            record.margin,
            record.total_subsidy,
            record.avg_subsidy_per_partner,
        ] {
            line.push_str(&format!(" {:>14}", output::format_currency(value)));
        }
        println!("{}", line);
    }
}

fn truncate(name: &str, width: usize) -> String {
    name.chars().take(width).collect()
}

fn print_single(table: &ProjectionTable, config: &ProjectionConfig) {
    println!("Earned Revenue Projections ({} Scenario)", table.scenario());
    println!("=========================================\n");

    if table.is_empty() {
        println!("Projection horizon is empty; nothing to show.");
        return;
    }

    print_table(table);

    if let Some(metrics) = output::key_metrics_text(table) {
        println!("\n{}", metrics);
    }
    println!("\n{}", output::break_even_text(table));
    println!(
        "\nNote: {:.0}% of positive margin goes towards the partner subsidy. \
         The scenario adjusts revenue growth rates only.",
        config.subsidy_fraction * 100.0
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let LoadedParameters { params, config } = cli.load()?;
    let runner = ScenarioRunner::with_config(config);

    if cli.all_scenarios {
        let comparison = runner.run_scenarios(&params)?;

        if cli.json {
            let reports: Vec<_> = comparison
                .tables()
                .iter()
                .map(|table| ProjectionReport::new(table, runner.config()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else {
            println!("Scenario Comparison");
            println!("===================\n");
            for table in comparison.tables() {
                let final_revenue = table
                    .final_year()
                    .map(|r| output::format_currency(r.total_revenue))
                    .unwrap_or_else(|| "-".to_string());
                let break_even = table
                    .break_even_year()
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "none".to_string());
                println!(
                    "  {:<12} final revenue {:>14}   break-even {}",
                    table.scenario().as_str(),
                    final_revenue,
                    break_even
                );
            }
        }

        if let Some(path) = &cli.csv {
            // One file per scenario alongside the requested path
            for table in comparison.tables() {
                let scenario_path = scenario_csv_path(path, table.scenario());
                output::write_csv_path(table, &scenario_path)
                    .with_context(|| format!("writing {}", scenario_path.display()))?;
            }
        }
        return Ok(());
    }

    let table = runner.run(&params)?;

    if cli.json {
        println!("{}", ProjectionReport::new(&table, runner.config()).to_json()?);
    } else {
        print_single(&table, runner.config());
    }

    if let Some(path) = &cli.csv {
        output::write_csv_path(&table, path).with_context(|| format!("writing {}", path.display()))?;
        if !cli.json {
            println!("\nFull results written to: {}", path.display());
        }
    }

    Ok(())
}

fn scenario_csv_path(path: &Path, scenario: ScenarioMultiplier) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("projection");
    let suffix = scenario.as_str().to_ascii_lowercase().replace(' ', "_");
    path.with_file_name(format!("{}_{}.csv", stem, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_horizon_flag_is_invalid_parameters() {
        let cli = Cli::try_parse_from(["earned-revenue-projections", "--horizon", "-1"]).unwrap();
        let err = cli.load().unwrap_err();

        let projection_err = err.downcast_ref::<ProjectionError>().expect("ProjectionError");
        assert!(projection_err.is_invalid_parameters(), "{}", projection_err);
    }

    #[test]
    fn test_flags_override_reference() {
        let cli = Cli::try_parse_from([
            "earned-revenue-projections",
            "--horizon",
            "3",
            "--base-year",
            "2040",
            "--scenario",
            "pessimistic",
        ])
        .unwrap();
        let loaded = cli.load().unwrap();

        assert_eq!(loaded.config.horizon, 3);
        assert_eq!(loaded.config.base_year, 2040);
        assert_eq!(loaded.params.scenario, ScenarioMultiplier::Pessimistic);
    }

    #[test]
    fn test_scenario_csv_path() {
        let path = Path::new("out/proj.csv");

        assert_eq!(
            scenario_csv_path(path, ScenarioMultiplier::MostLikely),
            PathBuf::from("out/proj_most_likely.csv")
        );
        assert_eq!(
            scenario_csv_path(path, ScenarioMultiplier::Optimistic),
            PathBuf::from("out/proj_optimistic.csv")
        );
        assert_eq!(
            scenario_csv_path(Path::new("results"), ScenarioMultiplier::Pessimistic),
            PathBuf::from("results_pessimistic.csv")
        );
    }
}
