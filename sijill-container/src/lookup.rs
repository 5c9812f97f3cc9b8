//! The lookup capability handed to factories.
//!
//! A factory never sees the [`Registry`](crate::registry::Registry) itself,
//! only something that can resolve a name. That keeps factories narrow and
//! lets them be exercised in isolation with a stub lookup.

use std::sync::Arc;

use crate::error::{Result, ServiceNotFoundError, SijillError};
use crate::key::ServiceKey;
use crate::naming::type_name_of;
use crate::service::Service;

/// Resolves a service by name.
///
/// Inside a factory this runs the same get/construct/cache logic as
/// [`Registry::get`](crate::registry::Registry::get), so dependencies are
/// built on demand, in whatever order the factory asks for them.
pub trait Lookup: Send + Sync {
    /// Resolves `name` to its singleton.
    fn lookup(&self, name: &str) -> Result<Service>;
}

impl dyn Lookup + '_ {
    /// Resolves `name` and downcasts it to `T`.
    ///
    /// ```
    /// use sijill_container::prelude::*;
    /// use std::sync::Arc;
    ///
    /// struct Foo { message: String }
    /// struct Bar { foo: Arc<Foo> }
    ///
    /// let registry = Registry::with_services(
    ///     ServiceMap::new()
    ///         .with("Foo", Factory::new(|_| Ok(Foo { message: "fooMessage".into() })))
    ///         .with("Bar", Factory::new(|lookup| Ok(Bar { foo: lookup.lookup_as("Foo")? }))),
    /// );
    ///
    /// let bar: Arc<Bar> = registry.get_as("Bar").unwrap();
    /// assert_eq!(bar.foo.message, "fooMessage");
    /// ```
    pub fn lookup_as<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        let service = self.lookup(name)?;
        downcast_service(name, &service)
    }

    /// Resolves the service registered under the canonical name of `T`.
    pub fn lookup_type<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.lookup_as(ServiceKey::of::<T>().as_str())
    }
}

/// Downcasts a resolved service, reporting a [`SijillError::TypeMismatch`]
/// when the stored value is not a `T`.
pub(crate) fn downcast_service<T: Send + Sync + 'static>(name: &str, service: &Service) -> Result<Arc<T>> {
    service.downcast::<T>().ok_or_else(|| SijillError::TypeMismatch {
        key: ServiceKey::new(name),
        expected: type_name_of::<T>().into_owned(),
        found: service.type_name().to_string(),
    })
}

/// Lookup that serves a fixed set of pre-built services.
///
/// Handy for running a factory against hand-picked dependencies:
///
/// ```
/// use sijill_container::lookup::{Lookup, StaticLookup};
/// use sijill_container::service::Service;
///
/// let lookup = StaticLookup::new().with("Port", Service::new(8080u16));
/// let port = (&lookup as &dyn Lookup).lookup_as::<u16>("Port").unwrap();
/// assert_eq!(*port, 8080);
/// assert!(lookup.lookup("Host").is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct StaticLookup {
    services: Vec<(ServiceKey, Service)>,
}

impl StaticLookup {
    /// Creates an empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a service under `name`.
    pub fn with(mut self, name: impl Into<ServiceKey>, service: Service) -> Self {
        self.services.push((name.into(), service));
        self
    }
}

impl Lookup for StaticLookup {
    fn lookup(&self, name: &str) -> Result<Service> {
        self.services
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, service)| service.clone())
            .ok_or_else(|| {
                SijillError::ServiceNotFound(ServiceNotFoundError {
                    requested: ServiceKey::new(name),
                    required_by: None,
                    suggestions: vec![],
                })
            })
    }
}
