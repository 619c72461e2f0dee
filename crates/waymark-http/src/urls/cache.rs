//! Memoized expression compilation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use waymark_core::WaymarkResult;

use super::compiler::{compile, CompiledExpression};

/// A thread-safe cache of compiled expressions keyed by expression text.
///
/// Failed compilations are not cached, so a bad expression reports its error
/// on every lookup.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use waymark_http::urls::cache::ExpressionCache;
///
/// let cache = ExpressionCache::new();
/// let a = cache.get_or_compile("post/<id>").unwrap();
/// let b = cache.get_or_compile("post/<id>").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ExpressionCache {
    entries: RwLock<HashMap<String, Arc<CompiledExpression>>>,
}

impl ExpressionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled form of `expression`, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Propagates compilation errors, see [`compile`].
    pub fn get_or_compile(&self, expression: &str) -> WaymarkResult<Arc<CompiledExpression>> {
        {
            let entries = self
                .entries
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(compiled) = entries.get(expression) {
                return Ok(Arc::clone(compiled));
            }
        }

        let compiled = Arc::new(compile(expression)?);
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // Another thread may have won the race; keep its entry.
        let entry = entries
            .entry(expression.to_string())
            .or_insert(compiled);
        Ok(Arc::clone(entry))
    }

    /// Returns the number of cached expressions.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached expression.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}
