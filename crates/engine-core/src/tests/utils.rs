use crate::{
    CancellationToken, CompileError, CompiledStatement, EngineConfig, ErrorKind, FilterEngine,
    RenderOptions,
};
use model::core::{data_type::SqlDialect, entity::EntityKind, value::Value};

pub fn engine() -> FilterEngine {
    FilterEngine::new(EngineConfig::default()).expect("default catalogs build")
}

pub fn uncached_engine() -> FilterEngine {
    let config = EngineConfig {
        cache: crate::CacheConfig::disabled(),
        ..EngineConfig::default()
    };
    FilterEngine::new(config).expect("default catalogs build")
}

pub fn compile_with(
    engine: &FilterEngine,
    entity: EntityKind,
    input: &str,
    dialect: SqlDialect,
) -> Result<CompiledStatement, CompileError> {
    engine.compile(
        &CancellationToken::new(),
        entity,
        input,
        &RenderOptions::new(dialect),
    )
}

/// Compiles against the note catalog, panicking on failure.
pub fn compile_note(input: &str, dialect: SqlDialect) -> CompiledStatement {
    compile_with(&engine(), EntityKind::Note, input, dialect)
        .unwrap_or_else(|e| panic!("{input:?} failed to compile: {e}"))
}

pub fn error_kind(entity: EntityKind, input: &str, dialect: SqlDialect) -> ErrorKind {
    match compile_with(&engine(), entity, input, dialect) {
        Ok(stmt) => panic!("{input:?} compiled to {:?}", stmt.fragment),
        Err(e) => e.kind(),
    }
}

/// Number of placeholders in `fragment`. Counts `?` for positional
/// dialects and distinct `$n` markers for Postgres.
pub fn placeholder_count(fragment: &str, dialect: SqlDialect) -> usize {
    match dialect {
        SqlDialect::Postgres => {
            let mut seen = std::collections::BTreeSet::new();
            let bytes = fragment.as_bytes();
            let mut i = 0;
            while i < bytes.len() {
                if bytes[i] == b'$' {
                    let start = i + 1;
                    let mut end = start;
                    while end < bytes.len() && bytes[end].is_ascii_digit() {
                        end += 1;
                    }
                    if end > start {
                        seen.insert(&fragment[start..end]);
                    }
                    i = end.max(i + 1);
                } else {
                    i += 1;
                }
            }
            seen.len()
        }
        SqlDialect::MySql | SqlDialect::Sqlite => fragment.matches('?').count(),
    }
}

/// Whether two parameter lists bind the same values, treating a native
/// boolean and its 0/1 integer encoding as equal.
pub fn params_equivalent(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len()
        && left.iter().zip(right).all(|pair| match pair {
            (Value::Boolean(b), Value::Int32(n)) | (Value::Int32(n), Value::Boolean(b)) => {
                i32::from(*b) == *n
            }
            (l, r) => l == r,
        })
}
