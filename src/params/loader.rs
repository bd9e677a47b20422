//! Load projection parameters from JSON parameter files and CSV product lists
//!
//! Counts and the horizon are read as signed integers so that a negative value in a
//! file is reported as an invalid parameter instead of a parse failure.

use super::{OtherCosts, PartnershipModel, ProductStream, ProjectionParams, ScenarioMultiplier, StaffingModel};
use crate::error::{ProjectionError, Result};
use crate::projection::ProjectionConfig;
use csv::Reader;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default location of the reference parameter file
pub const DEFAULT_PARAMS_PATH: &str = "data/reference_params.json";

/// Parameters and run configuration read from one parameter file
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedParameters {
    pub params: ProjectionParams,
    pub config: ProjectionConfig,
}

/// Raw parameter file; any omitted section falls back to the reference configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParams {
    #[serde(default)]
    scenario: ScenarioMultiplier,
    #[serde(default = "default_products")]
    products: Vec<ProductStream>,
    #[serde(default)]
    staffing: RawStaffing,
    #[serde(default = "default_other_costs")]
    other_costs: OtherCosts,
    #[serde(default)]
    partnerships: RawPartnerships,
    #[serde(default = "default_horizon")]
    horizon: i64,
    #[serde(default = "default_base_year")]
    base_year: i32,
    #[serde(default = "default_subsidy_fraction")]
    subsidy_fraction: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStaffing {
    num_employees: i64,
    avg_salary: f64,
    #[serde(alias = "cost_growth")]
    cost_growth_percent: f64,
}

impl Default for RawStaffing {
    fn default() -> Self {
        let reference = ProjectionParams::reference().staffing;
        Self {
            num_employees: reference.num_employees as i64,
            avg_salary: reference.avg_salary,
            cost_growth_percent: reference.cost_growth_percent,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPartnerships {
    num_partners: i64,
}

impl Default for RawPartnerships {
    fn default() -> Self {
        Self {
            num_partners: ProjectionParams::reference().partnerships.num_partners as i64,
        }
    }
}

fn default_products() -> Vec<ProductStream> {
    ProjectionParams::reference().products
}
fn default_other_costs() -> OtherCosts {
    ProjectionParams::reference().other_costs
}
fn default_horizon() -> i64 {
    ProjectionConfig::default().horizon as i64
}
fn default_base_year() -> i32 {
    ProjectionConfig::default().base_year
}
fn default_subsidy_fraction() -> f64 {
    ProjectionConfig::default().subsidy_fraction
}

/// Convert a signed count from an input file into an unsigned one
pub(crate) fn non_negative_count(field: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        ProjectionError::invalid(format!("{} must be a non-negative count, got {}", field, value))
    })
}

impl RawParams {
    fn into_loaded(self) -> Result<LoadedParameters> {
        let params = ProjectionParams {
            scenario: self.scenario,
            products: self.products,
            staffing: StaffingModel {
                num_employees: non_negative_count("num_employees", self.staffing.num_employees)?,
                avg_salary: self.staffing.avg_salary,
                cost_growth_percent: self.staffing.cost_growth_percent,
            },
            other_costs: self.other_costs,
            partnerships: PartnershipModel {
                num_partners: non_negative_count("num_partners", self.partnerships.num_partners)?,
            },
        };
        let config = ProjectionConfig {
            horizon: non_negative_count("horizon", self.horizon)?,
            base_year: self.base_year,
            subsidy_fraction: self.subsidy_fraction,
        };

        params.validate()?;
        config.validate()?;

        Ok(LoadedParameters { params, config })
    }
}

/// Load a JSON parameter file
pub fn load_params<P: AsRef<Path>>(path: P) -> Result<LoadedParameters> {
    let file = File::open(path)?;
    load_params_from_reader(BufReader::new(file))
}

/// Load JSON parameters from any reader (e.g. stdin, string buffer)
pub fn load_params_from_reader<R: Read>(reader: R) -> Result<LoadedParameters> {
    let raw: RawParams = serde_json::from_reader(reader)?;
    raw.into_loaded()
}

/// Load product streams from a CSV file with columns
/// `name,initial_revenue,growth_rate_percent`
pub fn load_products<P: AsRef<Path>>(path: P) -> Result<Vec<ProductStream>> {
    let file = File::open(path)?;
    load_products_from_reader(file)
}

/// Load product streams from CSV in any reader
pub fn load_products_from_reader<R: Read>(reader: R) -> Result<Vec<ProductStream>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut products = Vec::new();

    for result in csv_reader.deserialize() {
        let product: ProductStream = result?;
        products.push(product);
    }

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_yields_reference() {
        let loaded = load_params_from_reader("{}".as_bytes()).unwrap();

        assert_eq!(loaded.params, ProjectionParams::reference());
        assert_eq!(loaded.config, ProjectionConfig::default());
    }

    #[test]
    fn test_full_parameter_file() {
        let json = r#"{
            "scenario": "Optimistic",
            "products": [
                {"name": "Licensing", "initial_revenue": 50000, "growth_rate": 10}
            ],
            "staffing": {"num_employees": 2, "avg_salary": 60000, "cost_growth": 4},
            "other_costs": {"initial": 20000, "growth_rate_percent": 2},
            "partnerships": {"num_partners": 0},
            "horizon": 10,
            "base_year": 2030
        }"#;

        let loaded = load_params_from_reader(json.as_bytes()).unwrap();

        assert_eq!(loaded.params.scenario, ScenarioMultiplier::Optimistic);
        assert_eq!(loaded.params.products, vec![ProductStream::new("Licensing", 50_000.0, 10.0)]);
        assert_eq!(loaded.params.staffing.num_employees, 2);
        assert_eq!(loaded.params.staffing.cost_growth_percent, 4.0);
        assert_eq!(loaded.params.partnerships.num_partners, 0);
        assert_eq!(loaded.config.horizon, 10);
        assert_eq!(loaded.config.base_year, 2030);
        assert_eq!(loaded.config.subsidy_fraction, 0.5);
    }

    #[test]
    fn test_most_likely_label() {
        let loaded = load_params_from_reader(r#"{"scenario": "Most Likely"}"#.as_bytes()).unwrap();
        assert_eq!(loaded.params.scenario, ScenarioMultiplier::MostLikely);
    }

    #[test]
    fn test_negative_counts_are_invalid_parameters() {
        for json in [
            r#"{"horizon": -1}"#,
            r#"{"partnerships": {"num_partners": -3}}"#,
            r#"{"staffing": {"num_employees": -1, "avg_salary": 1, "cost_growth_percent": 0}}"#,
        ] {
            let err = load_params_from_reader(json.as_bytes()).unwrap_err();
            assert!(err.is_invalid_parameters(), "{}: {}", json, err);
        }
    }

    #[test]
    fn test_empty_product_list_rejected() {
        let err = load_params_from_reader(r#"{"products": []}"#.as_bytes()).unwrap_err();
        assert!(err.is_invalid_parameters());
    }

    #[test]
    fn test_malformed_json() {
        let err = load_params_from_reader("{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, ProjectionError::Json(_)));
    }

    #[test]
    fn test_misspelled_keys_rejected() {
        for json in [
            r#"{"partnership": {"num_partners": 2}}"#,
            r#"{"partnerships": {"num_partner": 2}}"#,
            r#"{"staffing": {"num_employees": 1, "avg_salary": 1, "cost_growth_percent": 0, "bonus": 5}}"#,
        ] {
            let err = load_params_from_reader(json.as_bytes()).unwrap_err();
            assert!(matches!(err, ProjectionError::Json(_)), "{}: {}", json, err);
        }
    }

    #[test]
    fn test_reference_files_match_builtin() {
        let loaded = load_params(DEFAULT_PARAMS_PATH).expect("Failed to load reference parameters");
        assert_eq!(loaded.params, ProjectionParams::reference());
        assert_eq!(loaded.config, ProjectionConfig::default());

        let products = load_products("data/products.csv").expect("Failed to load products");
        assert_eq!(products, ProjectionParams::reference().products);
    }

    #[test]
    fn test_load_products_csv() {
        let csv = "name,initial_revenue,growth_rate_percent\nWorkshops,40000,12.5\nGrants,0,0\n";
        let products = load_products_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0], ProductStream::new("Workshops", 40_000.0, 12.5));
        assert_eq!(products[1].name, "Grants");
    }
}
