use super::DependencyKey;
use crate::error::{DependencyInjectionError, Result};
use serde_json::json;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

struct Entry {
    name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

/// Write-once store for the dependencies of schema `S`.
///
/// Built once at the composition root and shared by reference (or `Arc`)
/// with everything that needs lookups. Writes are expected during start-up,
/// before concurrent readers exist; the interior lock only makes sharing
/// across threads sound.
pub struct Container<S> {
    entries: RwLock<HashMap<TypeId, Entry>>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: 'static> Container<S> {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            _schema: PhantomData,
        }
    }

    /// Get a dependency from the container.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyInjectionError`] if `K` has not been injected.
    pub fn get<K>(&self) -> Result<K::Value, DependencyInjectionError>
    where
        K: DependencyKey<Schema = S>,
    {
        self.read()
            .get(&TypeId::of::<K>())
            .and_then(|entry| entry.value.downcast_ref::<K::Value>())
            .cloned()
            .ok_or_else(|| error::<K>(format!("Dependency {} not found", K::NAME)))
    }

    /// Check if a dependency has already been injected.
    pub fn has<K>(&self) -> bool
    where
        K: DependencyKey<Schema = S>,
    {
        self.read().contains_key(&TypeId::of::<K>())
    }

    /// Put a dependency in the container.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyInjectionError`] if `K` is already present; the
    /// stored value is left untouched.
    pub fn inject<K>(&self, value: K::Value) -> Result<(), DependencyInjectionError>
    where
        K: DependencyKey<Schema = S>,
    {
        let mut entries = self.write();
        if entries.contains_key(&TypeId::of::<K>()) {
            return Err(error::<K>(format!(
                "Dependency {} already injected. Did you mean to replace it?",
                K::NAME
            )));
        }

        entries.insert(TypeId::of::<K>(), entry::<K>(value));
        debug!(dependency = K::NAME, "Dependency injected");
        Ok(())
    }

    /// Replace the dependency stored under `K`.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyInjectionError`] if `K` has not been injected yet.
    pub fn replace<K>(&self, value: K::Value) -> Result<(), DependencyInjectionError>
    where
        K: DependencyKey<Schema = S>,
    {
        let mut entries = self.write();
        if !entries.contains_key(&TypeId::of::<K>()) {
            return Err(error::<K>(format!(
                "Dependency {} not found. Did you mean to inject it?",
                K::NAME
            )));
        }

        entries.insert(TypeId::of::<K>(), entry::<K>(value));
        debug!(dependency = K::NAME, "Dependency replaced");
        Ok(())
    }

    /// Number of injected dependencies.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether nothing has been injected yet.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Names of the injected dependencies, sorted.
    pub fn injected(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.read().values().map(|entry| entry.name).collect();
        names.sort_unstable();
        names
    }

    // Entries are only ever swapped whole, so a poisoned lock still guards
    // a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypeId, Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: 'static> Default for Container<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> fmt::Debug for Container<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("schema", &std::any::type_name::<S>())
            .field("injected", &self.injected())
            .finish()
    }
}

fn entry<K: DependencyKey>(value: K::Value) -> Entry {
    Entry {
        name: K::NAME,
        value: Box::new(value),
    }
}

fn error<K: DependencyKey>(message: String) -> DependencyInjectionError {
    DependencyInjectionError::new(message).with_details(json!({ "key": K::NAME }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Encapsulated;
    use std::sync::Arc;
    use std::thread;

    crate::dependency_schema! {
        Schema {
            Name("name") => String,
            Counter("counter") => Arc<u32>,
        }
    }

    #[test]
    fn test_inject_then_get() {
        let deps = Container::<Schema>::new();
        deps.inject::<Name>("alpha".to_string()).unwrap();
        assert_eq!(deps.get::<Name>().unwrap(), "alpha");
        assert!(deps.has::<Name>());
    }

    #[test]
    fn test_second_inject_fails_and_keeps_value() {
        let deps = Container::<Schema>::new();
        deps.inject::<Name>("alpha".to_string()).unwrap();

        let err = deps.inject::<Name>("beta".to_string()).unwrap_err();
        assert_eq!(
            err.message(),
            "Dependency name already injected. Did you mean to replace it?"
        );
        assert!(!err.is_retryable());
        assert_eq!(deps.get::<Name>().unwrap(), "alpha");
    }

    #[test]
    fn test_replace_absent_fails() {
        let deps = Container::<Schema>::new();
        let err = deps.replace::<Name>("alpha".to_string()).unwrap_err();
        assert_eq!(
            err.message(),
            "Dependency name not found. Did you mean to inject it?"
        );
        assert!(!deps.has::<Name>());
    }

    #[test]
    fn test_replace_present_updates_value() {
        let deps = Container::<Schema>::new();
        deps.inject::<Name>("alpha".to_string()).unwrap();
        deps.replace::<Name>("beta".to_string()).unwrap();
        assert_eq!(deps.get::<Name>().unwrap(), "beta");
        assert!(deps.has::<Name>());
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn test_get_absent_fails_and_has_is_false() {
        let deps = Container::<Schema>::new();
        let err = deps.get::<Counter>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "DependencyInjectionError: Dependency counter not found"
        );
        assert_eq!(err.details(), Some(&json!({"key": "counter"})));
        assert!(!deps.has::<Counter>());
    }

    #[test]
    fn test_keys_are_independent() {
        let deps = Container::<Schema>::new();
        deps.inject::<Counter>(Arc::new(7)).unwrap();
        assert!(!deps.has::<Name>());
        assert_eq!(*deps.get::<Counter>().unwrap(), 7);
        assert_eq!(deps.injected(), vec!["counter"]);
    }

    #[test]
    fn test_schema_keys() {
        assert_eq!(Schema::KEYS, &["name", "counter"]);
        assert_eq!(<Name as DependencyKey>::NAME, "name");
    }

    #[test]
    fn test_empty_container() {
        let deps = Container::<Schema>::default();
        assert!(deps.is_empty());
        assert!(deps.injected().is_empty());
        assert!(format!("{deps:?}").contains("injected: []"));
    }

    #[test]
    fn test_shared_readers_after_initialisation() {
        let deps = Arc::new(Container::<Schema>::new());
        deps.inject::<Counter>(Arc::new(42)).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let deps = Arc::clone(&deps);
                thread::spawn(move || *deps.get::<Counter>().unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 42);
        }
    }
}
