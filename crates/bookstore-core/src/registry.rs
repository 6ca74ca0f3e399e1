//! Storage provider registry.
//!
//! Maps a provider name to a shared [`BookStore`] instance so the storage
//! backend can be chosen by configuration at startup. Two structurings are
//! supported:
//!
//! - an explicit [`StoreRegistry`] value owned by whoever wires up the
//!   application and passed around by reference;
//! - a process-wide instance reachable through [`global`], [`register`] and
//!   [`lookup`].
//!
//! Registering a name twice is a startup programming error and panics.
//! Looking up a name that was never registered is a configuration error and
//! is reported as [`StoreError::UnknownProvider`].
//!
//! # Example
//!
//! ```rust
//! use bookstore_core::{register_builtin_providers, StoreRegistry};
//!
//! let registry = StoreRegistry::new();
//! register_builtin_providers(&registry);
//!
//! let store = registry.lookup("mem").unwrap();
//! assert!(registry.lookup("postgres").is_err());
//! # drop(store);
//! ```

use crate::config::ProviderConfig;
use crate::error::{Result, StoreError};
use crate::store::{BookStore, MemoryBookStore};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::debug;

/// Name-to-provider lookup table.
///
/// Entries are immutable once added and live as long as the registry.
#[derive(Default)]
pub struct StoreRegistry {
    providers: RwLock<HashMap<String, Arc<dyn BookStore>>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `store` under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    pub fn register(&self, name: impl Into<String>, store: Arc<dyn BookStore>) {
        let name = name.into();

        // Panic only after the guard is gone so the lock is not poisoned.
        let duplicate = {
            let mut providers = self
                .providers
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if providers.contains_key(&name) {
                true
            } else {
                providers.insert(name.clone(), store);
                false
            }
        };

        if duplicate {
            panic!("store: register called twice for provider {}", name);
        }
        debug!("Registered storage provider '{}'", name);
    }

    /// Return the instance registered under `name`.
    ///
    /// This hands out the registered instance itself, not a fresh store.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn BookStore>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::unknown_provider(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered provider names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

/// Register every provider that ships with this crate.
///
/// Currently that is the in-memory backend under
/// [`ProviderConfig::MEMORY`]. Each call registers fresh instances, so calling
/// it twice on the same registry panics like any duplicate registration.
pub fn register_builtin_providers(registry: &StoreRegistry) {
    registry.register(ProviderConfig::MEMORY, Arc::new(MemoryBookStore::new()));
}

static GLOBAL: LazyLock<StoreRegistry> = LazyLock::new(StoreRegistry::new);

/// The process-wide registry. Starts empty and is never torn down.
pub fn global() -> &'static StoreRegistry {
    &GLOBAL
}

/// Register `store` under `name` in the process-wide registry.
///
/// # Panics
///
/// Panics if `name` is already registered.
pub fn register(name: impl Into<String>, store: Arc<dyn BookStore>) {
    GLOBAL.register(name, store);
}

/// Look up `name` in the process-wide registry.
pub fn lookup(name: &str) -> Result<Arc<dyn BookStore>> {
    GLOBAL.lookup(name)
}
