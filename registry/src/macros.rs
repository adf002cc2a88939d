//! Panicking shorthands for resolving from the global registry.

/// Resolves a fresh instance from the global registry.
///
/// # Panics
///
/// Panics if [`Registry::resolve`](crate::Registry::resolve) fails. For a
/// fallible version, use `global().resolve::<T>()` directly.
///
/// # Examples
///
/// ```
/// use fibre_registry::{global, resolve};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// global()
///   .register_factory::<dyn Greeter, _>(|_| Ok(Arc::new(EnglishGreeter)))
///   .unwrap();
///
/// let greeter = resolve!(trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  // resolve!(trait MyTrait)
  (trait $trait_ident:ident) => {
    $crate::global()
      .resolve::<dyn $trait_ident>()
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required trait service {}: {}",
          ::std::any::type_name::<dyn $trait_ident>(),
          err
        )
      })
  };

  // resolve!(MyService)
  ($type:ty) => {
    $crate::global()
      .resolve::<$type>()
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required service {}: {}",
          ::std::any::type_name::<$type>(),
          err
        )
      })
  };
}

/// Resolves the shared instance from the global registry.
///
/// # Panics
///
/// Panics if [`Registry::singleton`](crate::Registry::singleton) fails.
///
/// # Examples
///
/// ```
/// use fibre_registry::{global, singleton};
/// use std::sync::Arc;
///
/// struct Settings { verbose: bool }
///
/// global()
///   .register_factory(|_| Ok(Arc::new(Settings { verbose: true })))
///   .unwrap();
///
/// let first = singleton!(Settings);
/// let second = singleton!(Settings);
/// assert!(first.verbose);
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[macro_export]
macro_rules! singleton {
  // singleton!(trait MyTrait)
  (trait $trait_ident:ident) => {
    $crate::global()
      .singleton::<dyn $trait_ident>()
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required trait singleton {}: {}",
          ::std::any::type_name::<dyn $trait_ident>(),
          err
        )
      })
  };

  // singleton!(MyService)
  ($type:ty) => {
    $crate::global()
      .singleton::<$type>()
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required singleton {}: {}",
          ::std::any::type_name::<$type>(),
          err
        )
      })
  };
}
