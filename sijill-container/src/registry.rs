//! # The Registry
//!
//! Maps service names to factories, builds each service on first request
//! and hands out the same instance from then on.
//!
//! # Architecture
//! ```text
//! RegistryBuilder ──build()──> Registry ──get(name)──> Slot ──factory(&lookup)──> Service
//!                                 ▲                                 │
//!                                 └───────── lookup(dep) ───────────┘
//! ```
//!
//! The table lock only guards which slot a name points at. Construction is
//! exclusive per slot: independent services build in parallel, the same
//! service is built by one thread while the others wait for it.
//!
//! # Examples
//! ```rust
//! use sijill_container::prelude::*;
//! use std::sync::Arc;
//!
//! struct Foo { foo_message: String }
//! struct Bar { bar_message: String, foo: Arc<Foo> }
//!
//! let registry = Registry::builder()
//!     .service("Foo", Factory::new(|_| Ok(Foo { foo_message: "fooMessage".into() })))
//!     .service("Bar", Factory::new(|lookup| {
//!         Ok(Bar { bar_message: "barMessage".into(), foo: lookup.lookup_as("Foo")? })
//!     }))
//!     .build();
//!
//! let bar: Arc<Bar> = registry.get_as("Bar").expect("Bar is registered");
//! assert_eq!(bar.bar_message, "barMessage");
//! assert_eq!(bar.foo.foo_message, "fooMessage");
//!
//! let foo: Arc<Foo> = registry.get_as("Foo").expect("Foo is registered");
//! assert!(Arc::ptr_eq(&foo, &bar.foo));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use sijill_support::rendering::suggest_similar;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{CyclicDependencyError, Result, ServiceNotFoundError, SijillError};
use crate::graph::WaitGraph;
use crate::key::ServiceKey;
use crate::lookup::{Lookup, downcast_service};
use crate::provider::Provider;
use crate::service::{Factory, Service, ServiceMap};
use crate::settings::RegistrySettings;
use crate::slot::Slot;
use crate::table::ServiceTable;

// ============================================================
// RegistryBuilder
// ============================================================

/// Builds a [`Registry`] with an initial set of services.
///
/// The registry stays open for [`update`](Registry::update) afterwards;
/// the builder is a convenience for wiring everything in one expression.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    services: ServiceMap,
    settings: RegistrySettings,
}

impl RegistryBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `name`.
    pub fn service(mut self, name: impl Into<ServiceKey>, factory: Factory) -> Self {
        self.services.insert(name, factory);
        self
    }

    /// Registers every entry of `services`.
    pub fn services(mut self, services: ServiceMap) -> Self {
        self.services.extend(services);
        self
    }

    /// Registers the services of a [`Provider`].
    pub fn provider(self, provider: &dyn Provider) -> Self {
        debug!(provider = provider.name(), "Adding provider");
        self.services(provider.services())
    }

    /// Replaces all settings.
    pub fn settings(mut self, settings: RegistrySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Turns "did you mean?" hints on not-found errors on or off.
    pub fn suggestions(mut self, enabled: bool) -> Self {
        self.settings.suggestions = enabled;
        self
    }

    /// Caps the number of "did you mean?" hints.
    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.settings.max_suggestions = max;
        self
    }

    /// Builds the registry.
    #[instrument(skip(self), name = "registry_build")]
    pub fn build(self) -> Registry {
        info!(registered = self.services.len(), "Building registry");
        let registry = Registry::with_settings(self.settings);
        registry.update(self.services);
        registry
    }
}

// ═══════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════

/// Thread-safe, name-keyed registry of lazily built singletons.
pub struct Registry {
    table: RwLock<ServiceTable>,
    waits: WaitGraph,
    settings: RegistrySettings,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::with_settings(RegistrySettings::default())
    }

    /// Creates an empty registry with custom settings.
    pub fn with_settings(settings: RegistrySettings) -> Self {
        Self {
            table: RwLock::new(ServiceTable::new()),
            waits: WaitGraph::new(),
            settings,
        }
    }

    /// Creates a registry pre-seeded with `services`.
    pub fn with_services(services: ServiceMap) -> Self {
        let registry = Self::new();
        registry.update(services);
        registry
    }

    /// Create a new builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Merges `services` into the registry.
    ///
    /// Every given name gets a fresh, unbuilt entry. An existing entry is
    /// replaced silently, and its cached instance (if any) is dropped from
    /// the registry. A build already running for the old entry finishes and
    /// returns its value to its own caller only.
    ///
    /// ```
    /// use sijill_container::prelude::*;
    ///
    /// let registry = Registry::new();
    /// registry.update(ServiceMap::new().with("Port", Factory::value(80u16)));
    /// assert_eq!(*registry.get_as::<u16>("Port").unwrap(), 80);
    ///
    /// registry.update([("Port", Factory::value(8080u16))]);
    /// assert_eq!(*registry.get_as::<u16>("Port").unwrap(), 8080);
    /// ```
    pub fn update<K, I>(&self, services: I)
    where
        K: Into<ServiceKey>,
        I: IntoIterator<Item = (K, Factory)>,
    {
        let mut table = self.table.write();
        for (name, factory) in services {
            table.insert(name.into(), factory);
        }
    }

    /// Registers the services of a [`Provider`].
    pub fn add_provider(&self, provider: &dyn Provider) {
        debug!(provider = provider.name(), "Adding provider");
        self.update(provider.services());
    }

    /// Resolves `name` to its singleton, building it on first access.
    ///
    /// # Errors
    /// - [`SijillError::ServiceNotFound`] if `name` was never registered
    /// - [`SijillError::CyclicDependency`] if building `name` needs `name`
    /// - whatever the factory returned, unchanged; nothing is cached and a
    ///   later call tries again
    ///
    /// A panicking factory unwinds through this call; the entry stays
    /// unbuilt. Callers that treat a missing service as a programming error
    /// should use [`require`](Self::require), which panics instead.
    pub fn get(&self, name: &str) -> Result<Service> {
        self.resolve(name, &[])
    }

    /// Resolves `name` and downcasts it to `T`.
    ///
    /// # Errors
    /// As [`get`](Self::get), plus [`SijillError::TypeMismatch`].
    pub fn get_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        let service = self.get(name)?;
        downcast_service(name, &service)
    }

    /// Resolves the service registered under the canonical name of `T`.
    ///
    /// ```
    /// use sijill_container::prelude::*;
    ///
    /// struct Clock;
    ///
    /// let registry = Registry::with_services(ServiceMap::new().with_type(|_| Ok(Clock)));
    /// assert!(registry.get_type::<Clock>().is_ok());
    /// ```
    pub fn get_type<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.get_as(ServiceKey::of::<T>().as_str())
    }

    /// Resolves `name`, treating any failure as a programming error.
    ///
    /// # Panics
    /// If [`get`](Self::get) fails, with the error message.
    ///
    /// ```should_panic
    /// use sijill_container::prelude::*;
    ///
    /// Registry::new().require("missing"); // panics: unknown service
    /// ```
    pub fn require(&self, name: &str) -> Service {
        match self.get(name) {
            Ok(service) => service,
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.table.read().get(name).is_some()
    }

    /// Returns `true` if `name` is registered and already built.
    pub fn is_built(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|slot| slot.is_built())
    }

    /// Returns the number of registered services.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Registered names, sorted.
    pub fn keys(&self) -> Vec<ServiceKey> {
        self.table.read().keys()
    }

    fn slot(&self, name: &str) -> Option<Arc<Slot>> {
        self.table.read().get(name).cloned()
    }

    /// Internal resolve. `path` is the chain of services whose factories
    /// led to this request, outermost first.
    fn resolve(&self, name: &str, path: &[ServiceKey]) -> Result<Service> {
        trace!(service = name, depth = path.len(), "Resolving");

        let slot = self.slot(name).ok_or_else(|| self.not_found(name, path))?;

        if let Some(start) = path.iter().position(|key| key == name) {
            let mut chain = path[start..].to_vec();
            chain.push(slot.key().clone());
            warn!(cycle = ?chain, "Cyclic dependency detected");
            return Err(SijillError::CyclicDependency(CyclicDependencyError { chain }));
        }

        slot.get_or_build(&self.waits, |factory| {
            let mut child_path = path.to_vec();
            child_path.push(slot.key().clone());
            let lookup = RegistryLookup { registry: self, path: child_path };

            let started = Instant::now();
            let outcome = factory.build(&lookup);
            match &outcome {
                Ok(service) => debug!(
                    service = name,
                    type_name = service.type_name(),
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "Constructed service"
                ),
                Err(err) => debug!(service = name, error = %err, "Factory failed"),
            }
            outcome
        })
    }

    fn not_found(&self, name: &str, path: &[ServiceKey]) -> SijillError {
        let limit = self.settings.suggestion_limit();
        let suggestions = if limit == 0 {
            vec![]
        } else {
            let keys = self.keys();
            let available: Vec<&str> = keys.iter().map(ServiceKey::as_str).collect();
            suggest_similar(name, &available, limit)
        };

        SijillError::ServiceNotFound(ServiceNotFoundError {
            requested: ServiceKey::new(name),
            required_by: path.last().cloned(),
            suggestions,
        })
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("registered", &self.len())
            .field("settings", &self.settings)
            .finish()
    }
}

// ═══════════════════════════════════════════
// RegistryLookup (internal bridge)
// ═══════════════════════════════════════════

/// Lookup passed to factories: the registry plus the resolution path so far.
struct RegistryLookup<'a> {
    registry: &'a Registry,
    path: Vec<ServiceKey>,
}

impl Lookup for RegistryLookup<'_> {
    fn lookup(&self, name: &str) -> Result<Service> {
        self.registry.resolve(name, &self.path)
    }
}

impl Lookup for Registry {
    fn lookup(&self, name: &str) -> Result<Service> {
        self.get(name)
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Registry, RegistryBuilder};
    pub use crate::error::{Result, SijillError};
    pub use crate::key::ServiceKey;
    pub use crate::lookup::Lookup;
    pub use crate::naming::{name_of, type_name_of};
    pub use crate::provider::Provider;
    pub use crate::service::{Factory, Service, ServiceMap};
    pub use crate::settings::RegistrySettings;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
