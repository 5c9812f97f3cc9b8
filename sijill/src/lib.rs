//! # Sijill: a name-keyed service registry for Rust
//!
//! Register factories under names, ask for a name, get the one shared
//! instance. Factories resolve their own dependencies through a narrow
//! [`Lookup`](sijill_container::lookup::Lookup), so services are built
//! lazily, on first use, in whatever order they need each other.
//!
//! ```rust
//! use sijill::prelude::*;
//!
//! let registry = Registry::builder()
//!     .service("Greeting", Factory::value(String::from("hello")))
//!     .service("Shout", Factory::new(|lookup| {
//!         let greeting = lookup.lookup_as::<String>("Greeting")?;
//!         Ok(greeting.to_uppercase())
//!     }))
//!     .build();
//!
//! assert_eq!(*registry.get_as::<String>("Shout").unwrap(), "HELLO");
//! ```

pub use sijill_container::*;
pub use sijill_support::*;
