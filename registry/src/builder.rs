use crate::registry::Registry;

/// What a registry does when a service is registered a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
  /// Fail the second registration with
  /// [`RegistryError::DuplicateRegistration`](crate::RegistryError::DuplicateRegistration).
  #[default]
  Reject,
  /// Replace the existing entry. The replacement starts with no cached
  /// singleton; instances already handed out are unaffected.
  Overwrite,
}

/// A builder for creating [`Registry`] instances.
///
/// ```
/// use fibre_registry::{DuplicatePolicy, Registry};
///
/// let registry = Registry::builder()
///   .duplicates(DuplicatePolicy::Overwrite)
///   .capacity(32)
///   .build();
///
/// assert_eq!(registry.duplicate_policy(), DuplicatePolicy::Overwrite);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
  duplicates: DuplicatePolicy,
  capacity: usize,
}

impl RegistryBuilder {
  /// Creates a builder with the default configuration.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the policy for registering a service that already has an entry.
  pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
    self.duplicates = policy;
    self
  }

  /// Sets the number of services to reserve room for up front.
  pub fn capacity(mut self, capacity: usize) -> Self {
    self.capacity = capacity;
    self
  }

  /// Creates an empty `Registry` with this configuration.
  pub fn build(self) -> Registry {
    Registry::with_config(self.duplicates, self.capacity)
  }
}
