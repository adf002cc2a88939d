use std::error::Error as StdError;

use thiserror::Error;

/// A boxed error produced by user construction logic.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The error type for registration and resolution.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// No entry exists for the requested service.
  #[error("service not registered: {service}")]
  NotRegistered { service: &'static str },

  /// The service already has an entry and the registry rejects duplicates.
  #[error("service already registered: {service}")]
  DuplicateRegistration { service: &'static str },

  /// The service was requested again while it was still being resolved on
  /// the same thread. `chain` runs from the first occurrence to the repeat.
  #[error("circular dependency detected: {}", .chain.join(" -> "))]
  CircularDependency { chain: Vec<&'static str> },

  /// A factory or constructor reported a failure of its own.
  #[error("service construction failed: {0}")]
  Construction(#[source] BoxError),

  /// A stored instance did not have the type it was registered under.
  #[error("registered instance has unexpected type for service: {service}")]
  TypeMismatch { service: &'static str },
}

impl RegistryError {
  /// Wraps a user error as a construction failure.
  ///
  /// ```
  /// use fibre_registry::RegistryError;
  ///
  /// let err = RegistryError::construction("database unreachable");
  /// assert_eq!(err.to_string(), "service construction failed: database unreachable");
  /// ```
  pub fn construction(source: impl Into<BoxError>) -> Self {
    RegistryError::Construction(source.into())
  }
}

/// A specialized `Result` type for `fibre_registry` operations.
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
