use fibre_registry::{implements, Constructor, Registry, RegistryError, Result};
use pretty_assertions::assert_eq;
use std::any::type_name;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Fixtures ---

// Interfaces must be Send + Sync for the registry to accept them.
trait Calculator: Send + Sync {
  fn add(&self, a: i32, b: i32) -> i32;
}

struct BasicCalculator {
  offset: i32,
}

impl Calculator for BasicCalculator {
  fn add(&self, a: i32, b: i32) -> i32 {
    a + b + self.offset
  }
}

impl Constructor for BasicCalculator {
  type Deps = ();
  fn construct(_: ()) -> Result<Self> {
    Ok(BasicCalculator { offset: 0 })
  }
}

implements!(BasicCalculator => dyn Calculator);

trait Complex: Send + Sync {
  fn calculator(&self) -> &Arc<dyn Calculator>;
}

struct ComplexService {
  calculator: Arc<dyn Calculator>,
}

impl Complex for ComplexService {
  fn calculator(&self) -> &Arc<dyn Calculator> {
    &self.calculator
  }
}

impl Constructor for ComplexService {
  type Deps = Arc<dyn Calculator>;
  fn construct(calculator: Arc<dyn Calculator>) -> Result<Self> {
    Ok(ComplexService { calculator })
  }
}

implements!(ComplexService => dyn Complex);

// A plain configuration value, registered as an instance.
struct ReportConfig {
  title: &'static str,
}

// A service with more than one constructor argument.
struct ReportService {
  calculator: Arc<dyn Calculator>,
  config: Arc<ReportConfig>,
}

impl ReportService {
  fn render(&self) -> String {
    format!("{}: {}", self.config.title, self.calculator.add(20, 22))
  }
}

impl Constructor for ReportService {
  type Deps = (Arc<dyn Calculator>, Arc<ReportConfig>);
  fn construct((calculator, config): Self::Deps) -> Result<Self> {
    Ok(ReportService { calculator, config })
  }
}

// --- Basic Tests ---

#[test]
fn test_resolve_registered_service_returns_instance() {
  // Arrange
  let registry = Registry::new();
  registry.register::<dyn Calculator, BasicCalculator>().unwrap();

  // Act
  let calculator = registry.resolve::<dyn Calculator>().unwrap();

  // Assert
  assert_eq!(calculator.add(2, 3), 5);
}

#[test]
fn test_resolve_unregistered_service_fails() {
  let registry = Registry::new();

  match registry.resolve::<dyn Calculator>() {
    Err(RegistryError::NotRegistered { service }) => {
      assert_eq!(service, type_name::<dyn Calculator>());
    }
    _ => panic!("expected NotRegistered"),
  }
}

#[test]
fn test_resolve_twice_returns_distinct_instances() {
  // Arrange
  let registry = Registry::new();
  registry.register::<dyn Calculator, BasicCalculator>().unwrap();

  // Act
  let first = registry.resolve::<dyn Calculator>().unwrap();
  let second = registry.resolve::<dyn Calculator>().unwrap();

  // Assert
  assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_singleton_unregistered_service_fails() {
  let registry = Registry::new();

  assert!(matches!(
    registry.singleton::<dyn Calculator>(),
    Err(RegistryError::NotRegistered { .. })
  ));
}

#[test]
fn test_singleton_twice_returns_same_instance_and_constructs_once() {
  // Arrange
  let registry = Registry::new();
  let constructions = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&constructions);
  registry
    .register_factory::<dyn Calculator, _>(move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
      Ok(Arc::new(BasicCalculator { offset: 0 }))
    })
    .unwrap();

  // Act
  let first = registry.singleton::<dyn Calculator>().unwrap();
  let second = registry.singleton::<dyn Calculator>().unwrap();

  // Assert
  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(constructions.load(Ordering::SeqCst), 1);
}

#[test]
fn test_factory_registration_is_used_for_resolution() {
  // Arrange
  let registry = Registry::new();
  registry
    .register_factory::<dyn Calculator, _>(|_| Ok(Arc::new(BasicCalculator { offset: 100 })))
    .unwrap();

  // Act
  let calculator = registry.resolve::<dyn Calculator>().unwrap();

  // Assert: the offset proves our factory built it, not the auto-wired path.
  assert_eq!(calculator.add(1, 1), 102);
}

#[test]
fn test_premade_instance_is_returned_by_reference() {
  // Arrange
  let registry = Registry::new();
  let premade: Arc<dyn Calculator> = Arc::new(BasicCalculator { offset: 0 });
  let captured = Arc::clone(&premade);
  registry
    .register_factory::<dyn Calculator, _>(move |_| Ok(Arc::clone(&captured)))
    .unwrap();

  // Act
  let resolved = registry.resolve::<dyn Calculator>().unwrap();

  // Assert
  assert!(Arc::ptr_eq(&premade, &resolved));
}

#[test]
fn test_registered_instance_is_shared_by_every_resolution() {
  let registry = Registry::new();
  let config = Arc::new(ReportConfig { title: "totals" });
  registry.register_instance(Arc::clone(&config)).unwrap();

  let first = registry.resolve::<ReportConfig>().unwrap();
  let second = registry.resolve::<ReportConfig>().unwrap();

  assert!(Arc::ptr_eq(&config, &first));
  assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_factory_can_resolve_its_own_dependencies() {
  // Arrange
  let registry = Registry::new();
  registry.register::<dyn Calculator, BasicCalculator>().unwrap();
  registry
    .register_factory::<dyn Complex, _>(|registry| {
      Ok(Arc::new(ComplexService {
        calculator: registry.resolve()?,
      }))
    })
    .unwrap();

  // Act
  let complex = registry.resolve::<dyn Complex>().unwrap();

  // Assert
  assert_eq!(complex.calculator().add(4, 4), 8);
}

#[test]
fn test_auto_wired_dependency_is_resolved() {
  // Arrange
  let registry = Registry::new();
  registry.register::<dyn Calculator, BasicCalculator>().unwrap();
  registry.register::<dyn Complex, ComplexService>().unwrap();

  // Act
  let complex = registry.resolve::<dyn Complex>().unwrap();

  // Assert
  assert_eq!(complex.calculator().add(1, 2), 3);
}

#[test]
fn test_auto_wired_dependency_can_be_registered_after_dependent() {
  // Wiring happens when an instance is built, so registration order is free.
  let registry = Registry::new();
  registry.register::<dyn Complex, ComplexService>().unwrap();
  registry.register::<dyn Calculator, BasicCalculator>().unwrap();

  let complex = registry.resolve::<dyn Complex>().unwrap();

  assert_eq!(complex.calculator().add(5, 5), 10);
}

#[test]
fn test_auto_wired_dependencies_are_fresh_per_resolution() {
  let registry = Registry::new();
  registry.register::<dyn Calculator, BasicCalculator>().unwrap();
  registry.register::<dyn Complex, ComplexService>().unwrap();

  let first = registry.resolve::<dyn Complex>().unwrap();
  let second = registry.resolve::<dyn Complex>().unwrap();

  assert!(!Arc::ptr_eq(first.calculator(), second.calculator()));
}

#[test]
fn test_auto_wired_singleton_dependency_is_shared() {
  // After the dependency is initialized as a singleton, wiring receives it.
  let registry = Registry::new();
  registry.register::<dyn Calculator, BasicCalculator>().unwrap();
  registry.register::<dyn Complex, ComplexService>().unwrap();

  let shared = registry.singleton::<dyn Calculator>().unwrap();
  let complex = registry.resolve::<dyn Complex>().unwrap();

  assert!(Arc::ptr_eq(&shared, complex.calculator()));
}

#[test]
fn test_tuple_dependencies_are_resolved() {
  let registry = Registry::new();
  registry.register::<dyn Calculator, BasicCalculator>().unwrap();
  registry
    .register_instance(Arc::new(ReportConfig { title: "answer" }))
    .unwrap();
  registry.register_self::<ReportService>().unwrap();

  let report = registry.resolve::<ReportService>().unwrap();

  assert_eq!(report.render(), "answer: 42");
}

#[test]
fn test_self_registration_resolves_concrete_type() {
  let registry = Registry::new();
  registry.register_self::<BasicCalculator>().unwrap();

  let calculator = registry.resolve::<BasicCalculator>().unwrap();

  assert_eq!(calculator.offset, 0);
  // The concrete type and the interface are separate services.
  assert!(!registry.is_registered::<dyn Calculator>());
}

#[test]
fn test_missing_dependency_reports_the_dependency() {
  // Arrange
  static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

  struct Audited {
    _calculator: Arc<dyn Calculator>,
  }
  impl Constructor for Audited {
    type Deps = Arc<dyn Calculator>;
    fn construct(calculator: Arc<dyn Calculator>) -> Result<Self> {
      CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
      Ok(Audited { _calculator: calculator })
    }
  }

  let registry = Registry::new();
  registry.register_self::<Audited>().unwrap();

  // Act
  let result = registry.resolve::<Audited>();

  // Assert: the dependency's error reaches the caller unchanged.
  match result {
    Err(RegistryError::NotRegistered { service }) => {
      assert_eq!(service, type_name::<dyn Calculator>());
    }
    _ => panic!("expected NotRegistered for the dependency"),
  }
  assert_eq!(CONSTRUCTIONS.load(Ordering::SeqCst), 0);
}

#[test]
fn test_introspection_reflects_registrations() {
  let registry = Registry::new();
  assert!(registry.is_empty());

  registry.register::<dyn Calculator, BasicCalculator>().unwrap();
  registry.register::<dyn Complex, ComplexService>().unwrap();

  assert_eq!(registry.len(), 2);
  assert!(registry.is_registered::<dyn Calculator>());
  assert!(!registry.is_registered::<ReportService>());
}
