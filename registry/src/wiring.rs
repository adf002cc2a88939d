//! Constructor wiring for auto-registered services.
//!
//! A type opts into auto-wiring by implementing [`Constructor`]: it names the
//! services its constructor needs as a [`Dependencies`] type, and the registry
//! resolves them each time it builds an instance. [`Implements`] connects a
//! concrete type to the interface it is registered under.
//!
//! ```
//! use fibre_registry::{implements, Constructor, Registry, Result};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!   fn now(&self) -> u64;
//! }
//!
//! struct FixedClock;
//! impl Clock for FixedClock {
//!   fn now(&self) -> u64 {
//!     42
//!   }
//! }
//! impl Constructor for FixedClock {
//!   type Deps = ();
//!   fn construct(_: ()) -> Result<Self> {
//!     Ok(FixedClock)
//!   }
//! }
//! implements!(FixedClock => dyn Clock);
//!
//! struct Scheduler {
//!   clock: Arc<dyn Clock>,
//! }
//! impl Constructor for Scheduler {
//!   type Deps = Arc<dyn Clock>;
//!   fn construct(clock: Arc<dyn Clock>) -> Result<Self> {
//!     Ok(Scheduler { clock })
//!   }
//! }
//!
//! let registry = Registry::new();
//! registry.register::<dyn Clock, FixedClock>()?;
//! registry.register_self::<Scheduler>()?;
//!
//! let scheduler = registry.resolve::<Scheduler>()?;
//! assert_eq!(scheduler.clock.now(), 42);
//! # Ok::<(), fibre_registry::RegistryError>(())
//! ```
//!
//! A type without a `Constructor` impl cannot be auto-wired; the registration
//! itself is rejected:
//!
//! ```compile_fail
//! use fibre_registry::Registry;
//!
//! struct Widget;
//!
//! let registry = Registry::new();
//! registry.register_self::<Widget>();
//! ```
//!
//! The same registration is accepted once `Widget` has a constructor:
//!
//! ```
//! use fibre_registry::{Constructor, Registry, Result};
//!
//! struct Widget;
//!
//! impl Constructor for Widget {
//!   type Deps = ();
//!   fn construct(_: ()) -> Result<Self> {
//!     Ok(Widget)
//!   }
//! }
//!
//! let registry = Registry::new();
//! registry.register_self::<Widget>().unwrap();
//! ```

use crate::error::Result;
use crate::registry::Registry;

use std::any::Any;
use std::sync::Arc;

/// A set of services resolved from the registry as one constructor argument
/// list.
///
/// Implemented for `()`, for `Arc<T>` of any registered `T`, and for tuples of
/// up to eight dependencies. Tuple members are resolved left to right and the
/// first failure is returned unchanged.
pub trait Dependencies: Sized {
  fn resolve(registry: &Registry) -> Result<Self>;
}

impl Dependencies for () {
  fn resolve(_registry: &Registry) -> Result<Self> {
    Ok(())
  }
}

impl<T: ?Sized + Any + Send + Sync> Dependencies for Arc<T> {
  fn resolve(registry: &Registry) -> Result<Self> {
    registry.resolve::<T>()
  }
}

macro_rules! impl_dependencies_for_tuple {
  ($($dep:ident),+) => {
    impl<$($dep: Dependencies),+> Dependencies for ($($dep,)+) {
      fn resolve(registry: &Registry) -> Result<Self> {
        Ok(($($dep::resolve(registry)?,)+))
      }
    }
  };
}

impl_dependencies_for_tuple!(A);
impl_dependencies_for_tuple!(A, B);
impl_dependencies_for_tuple!(A, B, C);
impl_dependencies_for_tuple!(A, B, C, D);
impl_dependencies_for_tuple!(A, B, C, D, E);
impl_dependencies_for_tuple!(A, B, C, D, E, F);
impl_dependencies_for_tuple!(A, B, C, D, E, F, G);
impl_dependencies_for_tuple!(A, B, C, D, E, F, G, H);

/// The single constructor the registry uses to build `Self`.
pub trait Constructor: Sized + Send + Sync + 'static {
  /// The services the constructor takes, resolved at construction time.
  type Deps: Dependencies;

  fn construct(deps: Self::Deps) -> Result<Self>;
}

/// Converts a shared concrete instance into the interface `I`.
///
/// Every type implements itself. Trait-object interfaces are declared with
/// [`implements!`](crate::implements).
pub trait Implements<I: ?Sized>: Send + Sync + 'static {
  fn upcast(self: Arc<Self>) -> Arc<I>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
  fn upcast(self: Arc<Self>) -> Arc<T> {
    self
  }
}

/// Declares that a concrete type can be registered under one or more
/// trait-object interfaces.
///
/// ```
/// use fibre_registry::implements;
///
/// trait Reader: Send + Sync {}
/// trait Writer: Send + Sync {}
///
/// struct File;
/// impl Reader for File {}
/// impl Writer for File {}
///
/// implements!(File => dyn Reader, dyn Writer);
/// ```
#[macro_export]
macro_rules! implements {
  ($concrete:ty => $($interface:ty),+ $(,)?) => {
    $(
      impl $crate::Implements<$interface> for $concrete {
        fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$interface> {
          self
        }
      }
    )+
  };
}
