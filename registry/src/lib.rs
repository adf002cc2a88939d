//! # Fibre Registry
//!
//! A minimal, thread-safe dependency injection registry for Rust.
//!
//! Services are registered under the type they are resolved as, usually a
//! trait object, and built on demand. Every resolution can produce a fresh
//! instance, or a service can be resolved as a singleton that is built
//! exactly once, even when many threads ask for it at the same time.
//!
//! ## Core Concepts
//!
//! - **Registry**: the map from service types to construction logic.
//! - **Auto-wiring**: a type implementing [`Constructor`] declares the
//!   services it needs, and the registry resolves them when it builds it.
//! - **Factories**: closures for anything auto-wiring can't express, such as
//!   configuration values or objects built outside the registry.
//! - **Singletons**: [`Registry::singleton`] builds once and shares the
//!   result; [`Registry::resolve`] builds a new instance each time.
//! - **Global Registry**: a process-wide registry, accessible via [`global()`].
//!
//! ## Quick Start
//!
//! ```
//! use fibre_registry::{implements, Constructor, Registry, Result};
//! use std::sync::Arc;
//!
//! trait Calculator: Send + Sync {
//!   fn add(&self, a: i32, b: i32) -> i32;
//! }
//!
//! struct BasicCalculator;
//! impl Calculator for BasicCalculator {
//!   fn add(&self, a: i32, b: i32) -> i32 {
//!     a + b
//!   }
//! }
//! impl Constructor for BasicCalculator {
//!   type Deps = ();
//!   fn construct(_: ()) -> Result<Self> {
//!     Ok(BasicCalculator)
//!   }
//! }
//! implements!(BasicCalculator => dyn Calculator);
//!
//! fn main() -> Result<()> {
//!   let registry = Registry::new();
//!   registry.register::<dyn Calculator, BasicCalculator>()?;
//!
//!   // A fresh instance per call.
//!   let a = registry.resolve::<dyn Calculator>()?;
//!   let b = registry.resolve::<dyn Calculator>()?;
//!   assert!(!Arc::ptr_eq(&a, &b));
//!
//!   // One shared instance.
//!   let s1 = registry.singleton::<dyn Calculator>()?;
//!   let s2 = registry.singleton::<dyn Calculator>()?;
//!   assert!(Arc::ptr_eq(&s1, &s2));
//!   assert_eq!(s1.add(2, 3), 5);
//!   Ok(())
//! }
//! ```

mod builder;
mod core;
mod error;
mod global;
mod macros;
mod registry;
mod wiring;

pub use builder::{DuplicatePolicy, RegistryBuilder};
pub use crate::core::SingletonState;
pub use error::{BoxError, RegistryError, Result};
pub use global::global;
pub use registry::Registry;
pub use wiring::{Constructor, Dependencies, Implements};
