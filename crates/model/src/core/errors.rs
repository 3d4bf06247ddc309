use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unsupported SQL dialect: '{0}'")]
    UnknownDialect(String),

    #[error("unknown entity kind: '{0}'")]
    UnknownEntity(String),
}
