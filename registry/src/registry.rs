//! The main `Registry` struct and its associated methods.

use crate::builder::{DuplicatePolicy, RegistryBuilder};
use crate::core::{Entry, Factory, Instance, ResolutionGuard, ServiceKey, SingletonState};
use crate::error::{RegistryError, Result};
use crate::wiring::{Constructor, Dependencies, Implements};

use dashmap::mapref::entry::Entry as Slot;
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A dependency injection registry.
///
/// Maps service types, usually trait objects such as `dyn Greeter`, to the
/// logic that builds them. Services are resolved either as fresh instances
/// with [`resolve`](Registry::resolve) or as a shared, lazily built instance
/// with [`singleton`](Registry::singleton).
///
/// The registry is `Send + Sync`. Factories run without any registry lock
/// held, so they may resolve their own dependencies from the same registry
/// and a slow constructor never blocks resolution of other services.
pub struct Registry {
  entries: DashMap<ServiceKey, Arc<Entry>>,
  duplicates: DuplicatePolicy,
}

impl Default for Registry {
  fn default() -> Self {
    RegistryBuilder::default().build()
  }
}

impl fmt::Debug for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registry")
      .field("entries", &self.entries.len())
      .field("duplicates", &self.duplicates)
      .finish()
  }
}

impl Registry {
  /// Creates a new, empty `Registry` that rejects duplicate registrations.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns a builder for configuring a `Registry`.
  pub fn builder() -> RegistryBuilder {
    RegistryBuilder::default()
  }

  pub(crate) fn with_config(duplicates: DuplicatePolicy, capacity: usize) -> Self {
    Self {
      entries: DashMap::with_capacity(capacity),
      duplicates,
    }
  }

  // --- PRIVATE HELPERS ---

  fn insert(&self, key: ServiceKey, kind: &'static str, factory: Factory) -> Result<()> {
    match self.entries.entry(key) {
      Slot::Occupied(mut occupied) => match self.duplicates {
        DuplicatePolicy::Reject => Err(RegistryError::DuplicateRegistration {
          service: key.name(),
        }),
        DuplicatePolicy::Overwrite => {
          let replaced = occupied.insert(Arc::new(Entry::new(key, factory)));
          // Release the shard before the old entry, and any singleton it
          // cached, is dropped.
          drop(occupied);
          drop(replaced);
          tracing::debug!(service = key.name(), kind, "service registration replaced");
          Ok(())
        }
      },
      Slot::Vacant(vacant) => {
        vacant.insert(Arc::new(Entry::new(key, factory)));
        tracing::debug!(service = key.name(), kind, "service registered");
        Ok(())
      }
    }
  }

  fn add_factory_internal<I, F>(&self, kind: &'static str, factory: F) -> Result<()>
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Registry) -> Result<Arc<I>> + Send + Sync + 'static,
  {
    let factory: Factory =
      Box::new(move |registry: &Registry| Ok(Box::new(factory(registry)?) as Instance));
    self.insert(ServiceKey::of::<I>(), kind, factory)
  }

  // Clones the entry out of the map so no shard lock outlives the lookup.
  fn entry(&self, key: &ServiceKey) -> Result<Arc<Entry>> {
    self
      .entries
      .get(key)
      .map(|entry| Arc::clone(entry.value()))
      .ok_or(RegistryError::NotRegistered { service: key.name() })
  }

  // --- PUBLIC API ---

  // --- Registration ---

  /// Registers `C` as the implementation of `I`.
  ///
  /// Every resolution of `I` resolves `C::Deps` from this registry and
  /// passes them to [`Constructor::construct`]. Dependencies are looked up
  /// when an instance is built, not here, so they may be registered later.
  pub fn register<I, C>(&self) -> Result<()>
  where
    I: ?Sized + Any + Send + Sync,
    C: Constructor + Implements<I>,
  {
    let factory: Factory = Box::new(|registry: &Registry| {
      let deps = <C::Deps as Dependencies>::resolve(registry)?;
      let instance: Arc<I> = <C as Implements<I>>::upcast(Arc::new(C::construct(deps)?));
      Ok(Box::new(instance) as Instance)
    });
    self.insert(ServiceKey::of::<I>(), "auto-wired", factory)
  }

  /// Registers `C` as its own implementation.
  pub fn register_self<C: Constructor>(&self) -> Result<()> {
    self.register::<C, C>()
  }

  /// Registers a factory for `I`.
  ///
  /// The factory is called on every [`resolve`](Registry::resolve) and once
  /// for [`singleton`](Registry::singleton). Errors it returns reach the
  /// caller unchanged.
  pub fn register_factory<I, F>(&self, factory: F) -> Result<()>
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Registry) -> Result<Arc<I>> + Send + Sync + 'static,
  {
    self.add_factory_internal("factory", factory)
  }

  /// Registers an existing instance for `I`. Every resolution returns a
  /// clone of the same `Arc`.
  pub fn register_instance<I: ?Sized + Any + Send + Sync>(&self, instance: Arc<I>) -> Result<()> {
    self.add_factory_internal("instance", move |_: &Registry| Ok(Arc::clone(&instance)))
  }

  // --- Resolution ---

  /// Builds a new instance of `I`.
  ///
  /// Once `I` has been initialized as a singleton, this returns the
  /// singleton instead.
  pub fn resolve<I: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<I>> {
    let key = ServiceKey::of::<I>();
    tracing::trace!(service = key.name(), "resolving service");
    let entry = self.entry(&key)?;
    let _guard = ResolutionGuard::enter(self, key)?;
    entry.produce(self)
  }

  /// Returns the shared instance of `I`, building it on first use.
  ///
  /// The factory runs exactly once no matter how many threads race the first
  /// call. If it fails, nothing is cached and a later call tries again.
  pub fn singleton<I: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<I>> {
    let key = ServiceKey::of::<I>();
    tracing::trace!(service = key.name(), "resolving singleton");
    let entry = self.entry(&key)?;
    let _guard = ResolutionGuard::enter(self, key)?;
    entry.singleton(self)
  }

  // --- Introspection ---

  /// Reports the singleton lifecycle state of `I`.
  pub fn singleton_state<I: ?Sized + Any + Send + Sync>(&self) -> Result<SingletonState> {
    Ok(self.entry(&ServiceKey::of::<I>())?.state())
  }

  /// Returns `true` if `I` has an entry.
  pub fn is_registered<I: ?Sized + Any + Send + Sync>(&self) -> bool {
    self.entries.contains_key(&ServiceKey::of::<I>())
  }

  /// The number of registered services.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` if nothing has been registered.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// The policy applied when a service is registered twice.
  pub fn duplicate_policy(&self) -> DuplicatePolicy {
    self.duplicates
  }
}
