use fibre_registry::{implements, Constructor, Registry, Result};
use std::sync::Arc;

// The application's contracts.
trait MessageStore: Send + Sync {
  fn load(&self, id: u32) -> String;
}

trait Notifier: Send + Sync {
  fn notify(&self, id: u32) -> String;
}

// A configuration value the registry can't build by itself.
struct StoreConfig {
  prefix: &'static str,
}

struct InMemoryStore {
  config: Arc<StoreConfig>,
}

impl MessageStore for InMemoryStore {
  fn load(&self, id: u32) -> String {
    format!("{}-{}", self.config.prefix, id)
  }
}

impl Constructor for InMemoryStore {
  type Deps = Arc<StoreConfig>;
  fn construct(config: Arc<StoreConfig>) -> Result<Self> {
    Ok(InMemoryStore { config })
  }
}

implements!(InMemoryStore => dyn MessageStore);

struct ConsoleNotifier {
  store: Arc<dyn MessageStore>,
}

impl Notifier for ConsoleNotifier {
  fn notify(&self, id: u32) -> String {
    format!("new message: {}", self.store.load(id))
  }
}

impl Constructor for ConsoleNotifier {
  type Deps = Arc<dyn MessageStore>;
  fn construct(store: Arc<dyn MessageStore>) -> Result<Self> {
    Ok(ConsoleNotifier { store })
  }
}

implements!(ConsoleNotifier => dyn Notifier);

fn main() -> Result<()> {
  // RUST_LOG=fibre_registry=debug shows registrations and singleton setup.
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let registry = Registry::new();
  registry.register_instance(Arc::new(StoreConfig { prefix: "msg" }))?;
  registry.register::<dyn MessageStore, InMemoryStore>()?;
  registry.register::<dyn Notifier, ConsoleNotifier>()?;

  let notifier = registry.singleton::<dyn Notifier>()?;
  println!("{}", notifier.notify(7));

  assert!(Arc::ptr_eq(&notifier, &registry.singleton::<dyn Notifier>()?));
  Ok(())
}
