use engine_core::{CompileError, ConfigError};
use planner::catalog::CatalogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load the engine configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid field catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{kind}: {0}", kind = .0.kind())]
    Compile(#[from] CompileError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Unknown entity '{0}' (expected note, class or saved_query)")]
    UnknownEntity(String),
}
