//! Core registry implementation for Sijill.

pub mod error;
mod graph;
pub mod key;
pub mod lookup;
pub mod naming;
pub mod provider;
pub mod registry;
pub mod service;
pub mod settings;
mod slot;
mod table;

pub use error::{Result, SijillError};
pub use key::ServiceKey;
pub use registry::{Registry, RegistryBuilder, prelude};
