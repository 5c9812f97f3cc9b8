//! Provider trait: a module of related service registrations.
//!
//! Providers group factories that belong together so an application can
//! wire itself up one concern at a time.
//!
//! # Examples
//! ```rust
//! use sijill_container::prelude::*;
//!
//! struct Pool { url: String }
//!
//! struct StorageProvider;
//!
//! impl Provider for StorageProvider {
//!     fn services(&self) -> ServiceMap {
//!         ServiceMap::new()
//!             .with("DatabaseUrl", Factory::value(String::from("postgres://localhost")))
//!             .with("Pool", Factory::new(|lookup| {
//!                 let url = lookup.lookup_as::<String>("DatabaseUrl")?;
//!                 Ok(Pool { url: url.to_string() })
//!             }))
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.add_provider(&StorageProvider);
//! assert_eq!(registry.get_as::<Pool>("Pool").unwrap().url, "postgres://localhost");
//! ```

use crate::service::ServiceMap;

/// A module that contributes a batch of services.
pub trait Provider: Send + Sync {
    /// The factories this provider registers.
    ///
    /// Called each time the provider is added to a registry.
    fn services(&self) -> ServiceMap;

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
