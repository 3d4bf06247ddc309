//! Entry point of the filter compiler.
//!
//! ```text
//! expression ── tokenize ── parse ── bind ── typecheck ── render ──▶ CompiledStatement
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod statement;

pub use config::{CacheConfig, ConfigError, EngineConfig};
pub use engine::{FilterEngine, FilterEngineBuilder};
pub use error::{CompileError, ErrorKind};
pub use statement::{CompiledStatement, RenderOptions};
pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod tests;
