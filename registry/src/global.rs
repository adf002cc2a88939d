//! The process-wide default registry.

use crate::registry::Registry;
use once_cell::sync::Lazy;

// Created on first access with the default configuration and never dropped.
static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::default);

/// Provides a reference to the global registry.
///
/// Prefer passing a [`Registry`] explicitly where possible; the global is a
/// convenience for applications that want one shared registry without
/// threading it through every call.
///
/// # Examples
///
/// ```
/// use fibre_registry::global;
/// use std::sync::Arc;
///
/// struct GlobalGreeting(&'static str);
///
/// global().register_instance(Arc::new(GlobalGreeting("Hello from global!"))).unwrap();
/// assert_eq!(global().resolve::<GlobalGreeting>().unwrap().0, "Hello from global!");
/// ```
pub fn global() -> &'static Registry {
  &GLOBAL_REGISTRY
}
