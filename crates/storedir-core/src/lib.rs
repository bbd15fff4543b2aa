pub mod app_config;
pub mod categories;
pub mod config;
pub mod filters;
pub mod query;
pub mod stores;

pub use app_config::{AppConfig, Environment};
pub use categories::{Category, CategoryId};
pub use config::{load_app_config, load_app_config_from_env};
pub use filters::{FilterKey, FilterParam, FilterState, FlagFilter, SortField, FILTER_PARAMS};
pub use query::Location;
pub use stores::{AmountType, Store, StoreId, StoreStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Returned when a user-facing name does not map to a known variant.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
