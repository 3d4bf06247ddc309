use filter_syntax::{
    MAX_DEPTH_CEILING, ParserLimits,
    parser::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_TOKENS},
};
use model::core::data_type::SqlDialect;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("max_depth {requested} exceeds the supported maximum of {max}")]
    DepthLimit { requested: usize, max: usize },
}

/// Engine settings, loadable from TOML. Every key is optional.
///
/// ```toml
/// max_depth = 64
/// dialects = ["postgres", "sqlite"]
///
/// [cache]
/// capacity = 256
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_depth: usize,
    pub max_tokens: usize,
    pub cache: CacheConfig,
    pub dialects: Vec<SqlDialect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Maximum number of cached statements; 0 disables the cache.
    pub capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_tokens: DEFAULT_MAX_TOKENS,
            cache: CacheConfig::default(),
            dialects: SqlDialect::ALL.to_vec(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl CacheConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.enabled && self.capacity > 0
    }
}

impl EngineConfig {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth > MAX_DEPTH_CEILING {
            return Err(ConfigError::DepthLimit {
                requested: self.max_depth,
                max: MAX_DEPTH_CEILING,
            });
        }
        Ok(())
    }

    pub fn limits(&self) -> ParserLimits {
        ParserLimits {
            max_depth: self.max_depth,
            max_tokens: self.max_tokens,
        }
    }
}
