//! Projection parameters and their loaders

mod data;
pub mod loader;

pub use data::{
    OtherCosts, PartnershipModel, ProductStream, ProjectionParams, ScenarioMultiplier, StaffingModel,
};
pub(crate) use data::ensure_finite;
pub use loader::{load_params, load_params_from_reader, load_products, load_products_from_reader, LoadedParameters};
