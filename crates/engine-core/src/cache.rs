//! Memoizes compiled statements across calls.
//!
//! Hits only take the read lock (`peek` doesn't touch recency); a miss is
//! compiled outside any lock and inserted under a short write lock, so
//! concurrent compiles of different expressions never wait on each other.

use crate::statement::CompiledStatement;
use lru::LruCache;
use model::core::{data_type::SqlDialect, entity::EntityKind};
use parking_lot::RwLock;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub entity: EntityKind,
    pub catalog_version: u32,
    pub dialect: SqlDialect,
    pub param_offset: usize,
    pub expression: String,
}

pub struct StatementCache {
    entries: RwLock<LruCache<CacheKey, CompiledStatement>>,
}

impl StatementCache {
    /// Returns `None` for a zero capacity.
    pub fn new(capacity: usize) -> Option<Self> {
        let capacity = NonZeroUsize::new(capacity)?;
        Some(Self {
            entries: RwLock::new(LruCache::new(capacity)),
        })
    }

    pub fn get(&self, key: &CacheKey) -> Option<CompiledStatement> {
        self.entries.read().peek(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, statement: CompiledStatement) {
        self.entries.write().put(key, statement);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn key(expression: &str) -> CacheKey {
        CacheKey {
            entity: EntityKind::Note,
            catalog_version: 1,
            dialect: SqlDialect::Sqlite,
            param_offset: 0,
            expression: expression.to_string(),
        }
    }

    fn statement(fragment: &str) -> CompiledStatement {
        CompiledStatement {
            fragment: fragment.to_string(),
            parameters: Vec::new(),
            referenced_fields: BTreeSet::new(),
        }
    }

    #[test]
    fn test_zero_capacity_is_no_cache() {
        assert!(StatementCache::new(0).is_none());
    }

    #[test]
    fn test_get_and_insert() {
        let cache = StatementCache::new(4).unwrap();
        assert!(cache.get(&key("a")).is_none());

        cache.insert(key("a"), statement("A"));
        assert_eq!(cache.get(&key("a")).unwrap().fragment, "A");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_key_includes_version_and_dialect() {
        let cache = StatementCache::new(4).unwrap();
        cache.insert(key("a"), statement("A"));

        let mut other_version = key("a");
        other_version.catalog_version = 2;
        assert!(cache.get(&other_version).is_none());

        let mut other_dialect = key("a");
        other_dialect.dialect = SqlDialect::MySql;
        assert!(cache.get(&other_dialect).is_none());
    }

    #[test]
    fn test_evicts_least_recently_inserted() {
        let cache = StatementCache::new(2).unwrap();
        cache.insert(key("a"), statement("A"));
        cache.insert(key("b"), statement("B"));
        cache.insert(key("c"), statement("C"));

        assert!(cache.get(&key("a")).is_none());
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
