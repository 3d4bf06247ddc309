use crate::{
    cache::{CacheKey, StatementCache},
    config::EngineConfig,
    error::CompileError,
    statement::{CompiledStatement, RenderOptions},
};
use filter_syntax::{ParserLimits, parse, tokenize};
use model::core::{data_type::SqlDialect, entity::EntityKind};
use planner::{
    bind::{bind, typecheck},
    catalog::{CatalogError, FieldCatalog, defaults::default_catalog},
    query::renderer::predicate::render_predicate,
};
use std::collections::{BTreeSet, HashMap};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Compiles filter expressions into parameterized SQL predicates.
///
/// The engine owns one catalog per entity and is immutable once built, so a
/// single instance can be shared by reference across threads.
pub struct FilterEngine {
    catalogs: HashMap<EntityKind, FieldCatalog>,
    dialects: BTreeSet<SqlDialect>,
    limits: ParserLimits,
    cache: Option<StatementCache>,
}

pub struct FilterEngineBuilder {
    config: EngineConfig,
    catalogs: HashMap<EntityKind, FieldCatalog>,
}

impl FilterEngineBuilder {
    /// Registers `catalog`, replacing any previous one for the same entity.
    pub fn catalog(mut self, catalog: FieldCatalog) -> Self {
        self.catalogs.insert(catalog.entity(), catalog);
        self
    }

    pub fn default_catalogs(mut self) -> Result<Self, CatalogError> {
        for entity in EntityKind::ALL {
            self.catalogs.insert(entity, default_catalog(entity)?);
        }
        Ok(self)
    }

    pub fn build(self) -> FilterEngine {
        let config = self.config;

        if config.dialects.is_empty() {
            warn!("no SQL dialects enabled; every compile will be rejected");
        }
        if self.catalogs.is_empty() {
            warn!("no field catalogs registered; every compile will be rejected");
        }

        let cache = if config.cache.is_active() {
            StatementCache::new(config.cache.capacity)
        } else {
            None
        };

        debug!(
            catalogs = self.catalogs.len(),
            dialects = ?config.dialects,
            cache = cache.is_some(),
            "filter engine ready"
        );

        FilterEngine {
            catalogs: self.catalogs,
            dialects: config.dialects.iter().copied().collect(),
            limits: config.limits(),
            cache,
        }
    }
}

impl FilterEngine {
    pub fn builder(config: EngineConfig) -> FilterEngineBuilder {
        FilterEngineBuilder {
            config,
            catalogs: HashMap::new(),
        }
    }

    /// Engine with the built-in catalogs for every entity.
    pub fn new(config: EngineConfig) -> Result<Self, CatalogError> {
        Ok(Self::builder(config).default_catalogs()?.build())
    }

    pub fn catalog(&self, entity: EntityKind) -> Option<&FieldCatalog> {
        self.catalogs.get(&entity)
    }

    pub fn cached_statements(&self) -> usize {
        self.cache.as_ref().map_or(0, StatementCache::len)
    }

    /// Compiles `expression` for `entity`.
    ///
    /// Stages run in order and the first failure is returned as-is.
    /// `cancel` is checked before lexing and again after each stage.
    pub fn compile(
        &self,
        cancel: &CancellationToken,
        entity: EntityKind,
        expression: &str,
        options: &RenderOptions,
    ) -> Result<CompiledStatement, CompileError> {
        let dialect = options
            .dialect
            .ok_or(CompileError::UnsupportedDialect { name: None })?;
        if !self.dialects.contains(&dialect) {
            return Err(CompileError::dialect_not_enabled(dialect));
        }
        let catalog = self
            .catalogs
            .get(&entity)
            .ok_or_else(|| CompileError::UnknownEntity(entity.to_string()))?;
        checkpoint(cancel, "start")?;

        let key = CacheKey {
            entity,
            catalog_version: catalog.version(),
            dialect,
            param_offset: options.param_offset,
            expression: expression.to_string(),
        };
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(&key)) {
            trace!(%entity, %dialect, "filter cache hit");
            return Ok(hit);
        }

        debug!(%entity, %dialect, len = expression.len(), "compiling filter");

        let tokens = tokenize(expression)?;
        debug!(tokens = tokens.len(), "lexed");
        checkpoint(cancel, "lex")?;

        let ast = parse(&tokens, &self.limits)?;
        debug!("parsed");
        checkpoint(cancel, "parse")?;

        let bound = typecheck(bind(&ast, catalog)?)?;
        debug!(version = catalog.version(), "bound and type checked");
        checkpoint(cancel, "typecheck")?;

        let (fragment, parameters) = render_predicate(&bound, dialect, options.param_offset);
        debug!(params = parameters.len(), "rendered");

        let statement = CompiledStatement {
            fragment,
            parameters,
            referenced_fields: bound.referenced_fields(),
        };

        if let Some(cache) = &self.cache {
            cache.insert(key, statement.clone());
        }
        Ok(statement)
    }

    /// Runs the full pipeline and discards the statement.
    pub fn validate(
        &self,
        cancel: &CancellationToken,
        entity: EntityKind,
        expression: &str,
        options: &RenderOptions,
    ) -> Result<(), CompileError> {
        self.compile(cancel, entity, expression, options).map(|_| ())
    }
}

fn checkpoint(cancel: &CancellationToken, stage: &'static str) -> Result<(), CompileError> {
    if cancel.is_cancelled() {
        debug!(stage, "filter compilation cancelled");
        return Err(CompileError::Cancelled);
    }
    Ok(())
}
