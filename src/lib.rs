//! Earned Revenue Projections - annual projection engine for earned revenue product lines
//!
//! This library provides:
//! - Compound-growth revenue projections per product stream under an optimism scenario
//! - Staffing and other cost projections
//! - Margin, partner subsidy and break-even derivations
//! - Scenario comparison and batch runs
//! - Parameter loading (JSON, CSV) and table export (CSV, JSON)

pub mod error;
pub mod output;
pub mod params;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::ProjectionError;
pub use params::{
    OtherCosts, PartnershipModel, ProductStream, ProjectionParams, ScenarioMultiplier, StaffingModel,
};
pub use projection::{compute, ProjectionConfig, ProjectionEngine, ProjectionTable, YearRecord};
pub use scenario::{ScenarioComparison, ScenarioRunner};
