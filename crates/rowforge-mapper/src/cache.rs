//! Type-keyed compile caches.
//!
//! Strategies that pay a one-time preparation cost (closure construction,
//! code emission, binding-table resolution) store their artifact here, keyed
//! by destination `TypeId`. Building happens under the lock, so concurrent
//! first lookups for the same type still build exactly once.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use rowforge_core::Result;

pub struct TypeCache<V: ?Sized> {
    inner: Mutex<HashMap<TypeId, Arc<V>>>,
}

impl<V: ?Sized> Default for TypeCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ?Sized> TypeCache<V> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached artifact for `T`, building it on first use.
    /// `build` runs at most once per type for the lifetime of the cache.
    pub fn get_or_try_insert<T: 'static>(
        &self,
        build: impl FnOnce() -> Result<Arc<V>>,
    ) -> Result<Arc<V>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = map.get(&TypeId::of::<T>()) {
            return Ok(Arc::clone(existing));
        }
        let built = build()?;
        map.insert(TypeId::of::<T>(), Arc::clone(&built));
        Ok(built)
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_builds_once_per_type() {
        let cache: TypeCache<i64> = TypeCache::new();
        let builds = AtomicUsize::new(0);
        for _ in 0..3 {
            let v = cache
                .get_or_try_insert::<String>(|| {
                    builds.fetch_add(1, Ordering::SeqCst);
                    Ok(Arc::new(7))
                })
                .unwrap();
            assert_eq!(*v, 7);
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);

        cache
            .get_or_try_insert::<u32>(|| Ok(Arc::new(9)))
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_build_failure_not_cached() {
        let cache: TypeCache<i64> = TypeCache::new();
        let err = cache.get_or_try_insert::<String>(|| {
            Err(rowforge_core::RowForgeError::Internal("boom".into()))
        });
        assert!(err.is_err());
        assert!(cache.is_empty());

        let v = cache
            .get_or_try_insert::<String>(|| Ok(Arc::new(3)))
            .unwrap();
        assert_eq!(*v, 3);
    }
}
