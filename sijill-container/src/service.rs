//! Services, factories and registration maps.
//!
//! A [`Service`] is the shared, type-erased value the registry hands out.
//! A [`Factory`] builds one, given a [`Lookup`] for its own dependencies.
//! A [`ServiceMap`] is a batch of named factories for bulk registration.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::key::ServiceKey;
use crate::lookup::Lookup;
use crate::naming::type_name_of;

/// A constructed service: a shared value plus the name of its concrete type.
///
/// Cloning is cheap and keeps identity; use [`Service::ptr_eq`] to check
/// that two handles are the same singleton.
#[derive(Clone)]
pub struct Service {
    value: Arc<dyn Any + Send + Sync>,
    type_name: Cow<'static, str>,
}

impl Service {
    /// Wraps a value.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared value without re-allocating.
    pub fn from_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: type_name_of::<T>(),
        }
    }

    /// Returns the value as `Arc<T>` if it is a `T`.
    ///
    /// ```
    /// use sijill_container::service::Service;
    ///
    /// let service = Service::new(42u32);
    /// assert_eq!(service.downcast::<u32>().as_deref(), Some(&42));
    /// assert!(service.downcast::<i64>().is_none());
    /// ```
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value.clone().downcast::<T>().ok()
    }

    /// Returns a reference to the value if it is a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Returns `true` if the value is a `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Canonical name of the concrete type stored.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns `true` if both handles point at the same instance.
    pub fn ptr_eq(&self, other: &Service) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

type FactoryFn = dyn Fn(&dyn Lookup) -> Result<Service> + Send + Sync;

/// Builds a service, given a lookup for its dependencies.
///
/// Factories are shared between threads, so the closure lives behind an
/// `Arc` and cloning a factory does not clone the closure.
///
/// # Examples
/// ```
/// use sijill_container::service::Factory;
///
/// struct Config { url: String }
///
/// let config = Factory::new(|_| Ok(Config { url: "postgres://localhost".into() }));
/// let port = Factory::value(5432u16);
/// ```
#[derive(Clone)]
pub struct Factory(Arc<FactoryFn>);

impl Factory {
    /// Creates a factory from a closure returning a plain value.
    pub fn new<T, F>(build: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Lookup) -> Result<T> + Send + Sync + 'static,
    {
        Self(Arc::new(move |lookup: &dyn Lookup| build(lookup).map(Service::new)))
    }

    /// Creates a factory from a closure returning an `Arc`.
    pub fn shared<T, F>(build: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Lookup) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self(Arc::new(move |lookup: &dyn Lookup| build(lookup).map(Service::from_arc)))
    }

    /// Creates a factory from a closure that builds the [`Service`] itself.
    pub fn erased<F>(build: F) -> Self
    where
        F: Fn(&dyn Lookup) -> Result<Service> + Send + Sync + 'static,
    {
        Self(Arc::new(build))
    }

    /// Creates a factory that hands out a pre-built value.
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        let service = Service::new(value);
        Self(Arc::new(move |_: &dyn Lookup| Ok(service.clone())))
    }

    /// Runs the factory.
    pub(crate) fn build(&self, lookup: &dyn Lookup) -> Result<Service> {
        (self.0)(lookup)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Factory(..)")
    }
}

/// An ordered batch of named factories.
///
/// Registering the same name twice in one map keeps the last factory.
///
/// ```
/// use sijill_container::service::{Factory, ServiceMap};
///
/// let services = ServiceMap::new()
///     .with("Port", Factory::value(8080u16))
///     .with("Host", Factory::value(String::from("localhost")));
/// assert_eq!(services.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServiceMap {
    entries: Vec<(ServiceKey, Factory)>,
}

impl ServiceMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory under `name`, builder style.
    pub fn with(mut self, name: impl Into<ServiceKey>, factory: Factory) -> Self {
        self.insert(name, factory);
        self
    }

    /// Adds a factory keyed by the canonical name of `T`.
    pub fn with_type<T, F>(self, build: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Lookup) -> Result<T> + Send + Sync + 'static,
    {
        self.with(ServiceKey::of::<T>(), Factory::new(build))
    }

    /// Adds or replaces a factory under `name`.
    pub fn insert(&mut self, name: impl Into<ServiceKey>, factory: Factory) {
        let key = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((key, factory)),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.entries.iter().map(|(key, _)| key)
    }
}

impl IntoIterator for ServiceMap {
    type Item = (ServiceKey, Factory);
    type IntoIter = std::vec::IntoIter<(ServiceKey, Factory)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<ServiceKey>> FromIterator<(K, Factory)> for ServiceMap {
    fn from_iter<I: IntoIterator<Item = (K, Factory)>>(iter: I) -> Self {
        let mut map = ServiceMap::new();
        for (name, factory) in iter {
            map.insert(name, factory);
        }
        map
    }
}

impl<K: Into<ServiceKey>> Extend<(K, Factory)> for ServiceMap {
    fn extend<I: IntoIterator<Item = (K, Factory)>>(&mut self, iter: I) {
        for (name, factory) in iter {
            self.insert(name, factory);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SijillError;

    struct NoLookup;

    impl Lookup for NoLookup {
        fn lookup(&self, name: &str) -> Result<Service> {
            Err(SijillError::construction(format!("no {name} here")))
        }
    }

    #[derive(Debug, PartialEq)]
    struct Foo {
        message: String,
    }

    #[test]
    fn service_downcasts_to_its_type() {
        let service = Service::new(Foo { message: "hi".into() });
        assert!(service.is::<Foo>());
        assert_eq!(service.downcast_ref::<Foo>().map(|f| f.message.as_str()), Some("hi"));
        assert!(service.downcast::<String>().is_none());
    }

    #[test]
    fn service_records_concrete_type() {
        let service = Service::new(Foo { message: String::new() });
        assert_eq!(service.type_name(), "sijill_container::service::tests.Foo");
    }

    #[test]
    fn clones_share_identity() {
        let a = Service::new(1u8);
        let b = a.clone();
        let c = Service::new(1u8);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn from_arc_keeps_the_allocation() {
        let shared = Arc::new(Foo { message: "x".into() });
        let service = Service::from_arc(shared.clone());
        let back = service.downcast::<Foo>().unwrap();
        assert!(Arc::ptr_eq(&shared, &back));
    }

    #[test]
    fn factory_new_builds_fresh_values() {
        let factory = Factory::new(|_| Ok(Foo { message: "built".into() }));
        let a = factory.build(&NoLookup).unwrap();
        let b = factory.build(&NoLookup).unwrap();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a.downcast_ref::<Foo>().unwrap().message, "built");
    }

    #[test]
    fn factory_value_hands_out_one_instance() {
        let factory = Factory::value(7u64);
        let a = factory.build(&NoLookup).unwrap();
        let b = factory.build(&NoLookup).unwrap();
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn factory_error_passes_through() {
        let factory = Factory::new(|lookup| lookup.lookup("Db").map(|_| 0u8));
        let err = factory.build(&NoLookup).unwrap_err();
        assert_eq!(err.to_string(), "no Db here");
    }

    #[test]
    fn map_keeps_last_factory_for_a_name() {
        let map = ServiceMap::new()
            .with("A", Factory::value(1u8))
            .with("B", Factory::value(2u8))
            .with("A", Factory::value(3u8));

        assert_eq!(map.len(), 2);
        let (_, factory) = map.into_iter().next().unwrap();
        let value = factory.build(&NoLookup).unwrap();
        assert_eq!(value.downcast_ref::<u8>(), Some(&3));
    }

    #[test]
    fn map_collects_from_pairs() {
        let map: ServiceMap = [("A", Factory::value(1u8)), ("B", Factory::value(2u8))]
            .into_iter()
            .collect();
        let keys: Vec<&str> = map.keys().map(ServiceKey::as_str).collect();
        assert_eq!(keys, ["A", "B"]);
    }

    #[test]
    fn map_with_type_uses_canonical_key() {
        let map = ServiceMap::new().with_type(|_| Ok(Foo { message: String::new() }));
        assert_eq!(map.keys().next(), Some(&ServiceKey::of::<Foo>()));
    }
}
