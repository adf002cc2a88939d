//! Core, non-public data structures for the registry.

use crate::error::{RegistryError, Result};
use crate::registry::Registry;

use once_cell::sync::OnceCell;
use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A type-erased `Arc<I>` as produced by an entry's factory.
pub(crate) type Instance = Box<dyn Any + Send + Sync>;

/// The construction logic stored for one service.
pub(crate) type Factory = Box<dyn Fn(&Registry) -> Result<Instance> + Send + Sync>;

thread_local! {
  // Services currently being resolved on this thread, outermost first, each
  // tagged with the address of the registry resolving it.
  static RESOLVING_STACK: RefCell<Vec<(usize, ServiceKey)>> = const { RefCell::new(Vec::new()) };
}

/// Identifies a service by the type it is registered and resolved as.
///
/// Equality and hashing only look at the `TypeId`; the name is kept for
/// error messages and log output.
#[derive(Clone, Copy)]
pub(crate) struct ServiceKey {
  type_id: TypeId,
  name: &'static str,
}

impl ServiceKey {
  pub(crate) fn of<I: ?Sized + Any>() -> Self {
    Self {
      type_id: TypeId::of::<I>(),
      name: type_name::<I>(),
    }
  }

  pub(crate) fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for ServiceKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id
  }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
  }
}

impl fmt::Debug for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ServiceKey({})", self.name)
  }
}

/// An RAII guard that detects re-entrant resolution of a service.
///
/// Creating the guard pushes `(registry, key)` onto the thread-local
/// resolution stack and fails if that pair is already on it. The same type
/// resolved through a different registry is not a cycle. Dropping the guard
/// pops the pair.
pub(crate) struct ResolutionGuard {
  frame: (usize, ServiceKey),
}

impl ResolutionGuard {
  pub(crate) fn enter(registry: &Registry, key: ServiceKey) -> Result<Self> {
    let frame = (registry as *const Registry as usize, key);
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(first) = stack.iter().position(|f| *f == frame) {
        let mut chain: Vec<&'static str> = stack[first..].iter().map(|(_, k)| k.name()).collect();
        chain.push(key.name());
        return Err(RegistryError::CircularDependency { chain });
      }
      stack.push(frame);
      Ok(Self { frame })
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(pos) = stack.iter().rposition(|f| *f == self.frame) {
        stack.remove(pos);
      }
    });
  }
}

/// Where an entry is on its singleton lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingletonState {
  /// `singleton` has not produced a value yet.
  Untouched,
  /// A caller is running the factory to produce the singleton.
  Initializing,
  /// The singleton is cached and will be returned from now on.
  Initialized,
}

/// The registry's record for one service.
pub(crate) struct Entry {
  key: ServiceKey,
  factory: Factory,
  singleton: OnceCell<Instance>,
  initializing: AtomicBool,
}

impl Entry {
  pub(crate) fn new(key: ServiceKey, factory: Factory) -> Self {
    Self {
      key,
      factory,
      singleton: OnceCell::new(),
      initializing: AtomicBool::new(false),
    }
  }

  pub(crate) fn state(&self) -> SingletonState {
    // The flag is read before the cell. It is only lowered after the cell is
    // filled, so a lowered flag followed by an empty cell means untouched.
    let initializing = self.initializing.load(Ordering::Acquire);
    if self.singleton.get().is_some() {
      SingletonState::Initialized
    } else if initializing {
      SingletonState::Initializing
    } else {
      SingletonState::Untouched
    }
  }

  /// Returns the cached singleton if there is one, otherwise a fresh instance.
  pub(crate) fn produce<I: ?Sized + Any + Send + Sync>(&self, registry: &Registry) -> Result<Arc<I>> {
    if let Some(instance) = self.singleton.get() {
      return self.downcast_ref(instance);
    }
    let instance = (self.factory)(registry)?;
    instance
      .downcast::<Arc<I>>()
      .map(|arc_in_a_box| *arc_in_a_box)
      .map_err(|_| RegistryError::TypeMismatch { service: self.key.name() })
  }

  /// Returns the singleton, running the factory if this caller wins the cell.
  ///
  /// Callers that lose block on the cell until the winner publishes the
  /// value. If the winner fails the cell stays empty and the next caller in
  /// line runs the factory itself.
  pub(crate) fn singleton<I: ?Sized + Any + Send + Sync>(&self, registry: &Registry) -> Result<Arc<I>> {
    // Lowered when this function returns or unwinds, after the cell has
    // been filled on success.
    let mut flag = None;
    let instance = self.singleton.get_or_try_init(|| {
      flag = Some(InitializingFlag::raise(&self.initializing));
      (self.factory)(registry)
    })?;
    if flag.is_some() {
      tracing::debug!(service = self.key.name(), "singleton initialized");
    }
    self.downcast_ref(instance)
  }

  fn downcast_ref<I: ?Sized + Any + Send + Sync>(&self, instance: &Instance) -> Result<Arc<I>> {
    instance
      .downcast_ref::<Arc<I>>()
      .cloned()
      .ok_or(RegistryError::TypeMismatch { service: self.key.name() })
  }
}

// Holds `initializing` high until dropped, including when the factory fails
// or panics.
struct InitializingFlag<'a>(&'a AtomicBool);

impl<'a> InitializingFlag<'a> {
  fn raise(flag: &'a AtomicBool) -> Self {
    flag.store(true, Ordering::Release);
    Self(flag)
  }
}

impl Drop for InitializingFlag<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}
