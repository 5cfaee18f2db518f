//! Instance construction strategies.
//!
//! Five ways to produce a default instance of a destination type, from the
//! zero-cost static call down to runtime code emission. All of them observe
//! construct-once semantics: every call yields a fresh, independent instance.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;
use tracing::debug;

use rowforge_core::{Record, Result, RowForgeError, Shape};
use rowforge_jit::{compile_defaults, decode_record, JitConstructor};

use crate::cache::TypeCache;

/// How a default instance gets made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructStrategy {
    /// Static `T::default()` call. The baseline every other strategy chases.
    Direct,
    /// Registry lookup on every call, boxed result downcast back to `T`.
    Lookup,
    /// Registry lookup that reports absence as `None` instead of an error.
    Activate,
    /// Monomorphic closure built once per type and cached.
    Closure,
    /// Cranelift-emitted constructor writing a flat default buffer.
    Emitted,
}

impl ConstructStrategy {
    pub const ALL: [ConstructStrategy; 5] = [
        ConstructStrategy::Direct,
        ConstructStrategy::Lookup,
        ConstructStrategy::Activate,
        ConstructStrategy::Closure,
        ConstructStrategy::Emitted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructStrategy::Direct => "direct",
            ConstructStrategy::Lookup => "lookup",
            ConstructStrategy::Activate => "activate",
            ConstructStrategy::Closure => "closure",
            ConstructStrategy::Emitted => "emitted",
        }
    }
}

impl fmt::Display for ConstructStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The direct strategy: a plain static call.
#[inline]
pub fn construct_direct<T: Default>() -> T {
    T::default()
}

type BoxedFactory = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

/// A runtime registry of type-erased factories.
///
/// Every [`ConstructorRegistry::invoke`] pays the full cost again: a map
/// lookup, a boxed allocation, and a downcast. That repeated cost is the
/// point; the registry is the slow baseline the cached strategies beat.
#[derive(Default)]
pub struct ConstructorRegistry {
    factories: Mutex<HashMap<TypeId, BoxedFactory>>,
}

impl ConstructorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Default + Send + 'static>(&self) {
        let mut map = self
            .factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        map.insert(
            TypeId::of::<T>(),
            Arc::new(|| Box::new(T::default()) as Box<dyn Any + Send>),
        );
    }

    /// The lookup strategy. Fails with `MissingConstructor` when `T` was
    /// never registered.
    pub fn invoke<T: Any>(&self) -> Result<T> {
        let factory = self
            .factory_of::<T>()
            .ok_or_else(|| RowForgeError::MissingConstructor(type_name::<T>().to_string()))?;
        let boxed = factory();
        boxed
            .downcast::<T>()
            .map(|b| *b)
            .map_err(|_| {
                RowForgeError::Internal(format!(
                    "registered factory for '{}' produced a different type",
                    type_name::<T>()
                ))
            })
    }

    /// The activate strategy: absence is an expected outcome, not an error.
    pub fn activate<T: Any>(&self) -> Option<T> {
        let factory = self.factory_of::<T>()?;
        factory().downcast::<T>().ok().map(|b| *b)
    }

    fn factory_of<T: Any>(&self) -> Option<BoxedFactory> {
        self.factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .cloned()
    }
}

/// A monomorphic constructor closure: no lookup, no boxing, no downcast once
/// built.
pub type Constructor<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Builds the closure strategy's artifact for `T`.
pub fn build_constructor<T: Default + 'static>() -> Constructor<T> {
    debug!(target_type = type_name::<T>(), "building constructor closure");
    Arc::new(T::default)
}

/// Owner-held cache for the closure strategy. First request per type builds,
/// later requests clone the cached `Arc`.
#[derive(Default)]
pub struct ConstructorCache {
    inner: TypeCache<dyn Any + Send + Sync>,
}

impl ConstructorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constructor<T: Default + 'static>(&self) -> Result<Constructor<T>> {
        let entry = self
            .inner
            .get_or_try_insert::<T>(|| Ok(Arc::new(build_constructor::<T>())))?;
        entry
            .downcast_ref::<Constructor<T>>()
            .cloned()
            .ok_or_else(|| {
                RowForgeError::Internal(format!(
                    "constructor cache entry for '{}' has a different type",
                    type_name::<T>()
                ))
            })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// The emitted strategy: a native default constructor for a runtime shape.
pub struct EmittedConstructor {
    shape: Shape,
    inner: JitConstructor,
}

impl EmittedConstructor {
    pub fn emit(shape: &Shape) -> Result<Self> {
        let inner = compile_defaults(shape)?;
        Ok(Self {
            shape: shape.clone(),
            inner,
        })
    }

    /// Produces a fresh default record: every field `Value::None`.
    pub fn construct(&self) -> Result<Record> {
        decode_record(&self.shape, &self.inner.invoke())
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowforge_core::{ColumnType, FieldDef, Value};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Order {
        order_id: i64,
        ship_name: Option<String>,
    }

    #[test]
    fn test_direct() {
        let order: Order = construct_direct();
        assert_eq!(order, Order::default());
    }

    #[test]
    fn test_registry_invoke() {
        let registry = ConstructorRegistry::new();
        registry.register::<Order>();
        let order: Order = registry.invoke().unwrap();
        assert_eq!(order, Order::default());
    }

    #[test]
    fn test_registry_missing() {
        let registry = ConstructorRegistry::new();
        let err = registry.invoke::<Order>().unwrap_err();
        assert!(matches!(err, RowForgeError::MissingConstructor(_)));
        assert!(err.to_string().contains("Order"));
    }

    #[test]
    fn test_activate_absent_is_none() {
        let registry = ConstructorRegistry::new();
        assert!(registry.activate::<Order>().is_none());
        registry.register::<Order>();
        assert_eq!(registry.activate::<Order>(), Some(Order::default()));
    }

    #[test]
    fn test_closure_instances_independent() {
        let ctor = build_constructor::<Order>();
        let mut a = ctor();
        let b = ctor();
        a.order_id = 183;
        assert_eq!(b.order_id, 0);
    }

    #[test]
    fn test_constructor_cache_single_entry() {
        let cache = ConstructorCache::new();
        let first = cache.constructor::<Order>().unwrap();
        let second = cache.constructor::<Order>().unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(first(), second());
    }

    #[test]
    fn test_emitted_defaults() {
        let shape = Shape::new(
            "Order",
            vec![
                FieldDef::new("OrderId", ColumnType::I64),
                FieldDef::new("ShipVia", ColumnType::I64),
            ],
        );
        let ctor = EmittedConstructor::emit(&shape).unwrap();
        let record = ctor.construct().unwrap();
        assert_eq!(record.fields, vec![Value::None, Value::None]);
    }

    #[test]
    fn test_strategy_names() {
        let names: Vec<&str> = ConstructStrategy::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec!["direct", "lookup", "activate", "closure", "emitted"]
        );
    }

    #[test]
    fn test_strategy_list_from_toml() {
        #[derive(Deserialize)]
        struct Config {
            construct: Vec<ConstructStrategy>,
        }

        let config: Config = toml::from_str("construct = [\"direct\", \"emitted\"]").unwrap();
        assert_eq!(
            config.construct,
            vec![ConstructStrategy::Direct, ConstructStrategy::Emitted]
        );
        assert!(toml::from_str::<Config>("construct = [\"jit\"]").is_err());
    }
}
