//! Error types for Sijill registry operations.
//!
//! Resolution failures say which service was asked for, who asked,
//! and what was probably meant.

use std::fmt;

use sijill_support::rendering::render_chain;

use crate::key::ServiceKey;

/// Boxed error a factory can report as a construction failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for all Sijill operations.
#[derive(Debug, thiserror::Error)]
pub enum SijillError {
    /// Requested service was never registered.
    #[error("{}", .0)]
    ServiceNotFound(ServiceNotFoundError),

    /// Resolving the service would require the service itself.
    #[error("{}", .0)]
    CyclicDependency(CyclicDependencyError),

    /// A factory failed. The registry passes this through untouched.
    #[error(transparent)]
    Construction(BoxError),

    /// A typed accessor found a value of a different type.
    #[error("Service {key} has type {found}, expected {expected}")]
    TypeMismatch {
        key: ServiceKey,
        expected: String,
        found: String,
    },
}

impl SijillError {
    /// Wraps any error as a construction failure.
    ///
    /// ```
    /// use sijill_container::error::SijillError;
    ///
    /// let err = SijillError::construction(std::fmt::Error);
    /// assert!(matches!(err, SijillError::Construction(_)));
    /// ```
    pub fn construction(source: impl Into<BoxError>) -> Self {
        SijillError::Construction(source.into())
    }

    /// Returns the unknown service name if this is a not-found error.
    pub fn missing_service(&self) -> Option<&ServiceKey> {
        match self {
            SijillError::ServiceNotFound(err) => Some(&err.requested),
            _ => None,
        }
    }
}

/// Error when a service was not registered.
#[derive(Debug)]
pub struct ServiceNotFoundError {
    /// The service that was requested
    pub requested: ServiceKey,
    /// The service whose factory asked for it (if any)
    pub required_by: Option<ServiceKey>,
    /// Registered names that look similar
    pub suggestions: Vec<String>,
}

impl fmt::Display for ServiceNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attempt to get unknown service \"{}\"", self.requested)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: register \"{}\" before the first get",
            self.requested
        )
    }
}

/// Error when resolution loops back to a service already being built.
#[derive(Debug)]
pub struct CyclicDependencyError {
    /// The loop, first and last element equal.
    /// Example: ["A", "B", "A"]
    pub chain: Vec<ServiceKey>,
}

impl fmt::Display for CyclicDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cyclic dependency detected:\n  {}", render_chain(&self.chain))?;
        write!(
            f,
            "\n  Hint: break the loop by resolving one side lazily, outside its factory"
        )
    }
}

/// Convenient Result type for Sijill operations.
pub type Result<T> = std::result::Result<T, SijillError>;
