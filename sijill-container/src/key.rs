//! Service identification keys.
//!
//! [`ServiceKey`] is the name a service is registered and resolved under.
//! Keys are plain strings: either hand-written (`"Mailer"`) or derived from
//! a type through the [type namer](crate::naming).

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::naming::type_name_of;

/// Uniquely identifies a service in the registry.
///
/// Cloning is cheap (the name is shared). Two keys are equal when their
/// names are equal.
///
/// # Examples
/// ```
/// use sijill_container::key::ServiceKey;
///
/// let key = ServiceKey::new("Mailer");
/// assert_eq!(key.as_str(), "Mailer");
///
/// // Keys derived from types use the canonical type name
/// struct Pool;
/// let key = ServiceKey::of::<Pool>();
/// assert!(key.as_str().ends_with(".Pool"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey(Arc<str>);

impl ServiceKey {
    /// Creates a key from any string-like name.
    #[inline]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Creates a key for type `T` using its canonical type name.
    ///
    /// ```
    /// use sijill_container::key::ServiceKey;
    ///
    /// assert_eq!(ServiceKey::of::<String>(), ServiceKey::of::<String>());
    /// assert_ne!(ServiceKey::of::<String>(), ServiceKey::of::<i32>());
    /// ```
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(type_name_of::<T>().as_ref())
    }

    /// Returns the name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ServiceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ServiceKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&String> for ServiceKey {
    fn from(name: &String) -> Self {
        Self::new(name.as_str())
    }
}

impl From<Arc<str>> for ServiceKey {
    fn from(name: Arc<str>) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for ServiceKey {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ServiceKey {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceKey({:?})", &*self.0)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MyStruct;

    #[test]
    fn key_of_type() {
        let key = ServiceKey::of::<MyStruct>();
        assert!(key.as_str().ends_with(".MyStruct"));
    }

    #[test]
    fn key_equality_by_name() {
        assert_eq!(ServiceKey::new("Foo"), ServiceKey::from(String::from("Foo")));
        assert_ne!(ServiceKey::new("Foo"), ServiceKey::new("foo"));
    }

    #[test]
    fn key_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(ServiceKey::new("Foo"), 1);
        map.insert(ServiceKey::new("Bar"), 2);
        assert_eq!(map.get("Foo"), Some(&1));
        assert_eq!(map.get("Baz"), None);
    }

    #[test]
    fn key_formatting() {
        let key = ServiceKey::new("Mailer");
        assert_eq!(format!("{key}"), "Mailer");
        assert_eq!(format!("{key:?}"), "ServiceKey(\"Mailer\")");
    }

    #[test]
    fn keys_sort_by_name() {
        let mut keys = vec![ServiceKey::new("b"), ServiceKey::new("a")];
        keys.sort();
        assert_eq!(keys, vec![ServiceKey::new("a"), ServiceKey::new("b")]);
    }
}
