use std::cell::RefCell;

use rust_types::{define_module, registry::Registry};
use tracing_subscriber::EnvFilter;

#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub fn new_registry() -> Registry {
    init_tracing();
    let mut registry = Registry::new();
    define_module(&mut registry).unwrap();
    registry
}

thread_local! {
    #[doc(hidden)]
    pub static REGISTRY: RefCell<Registry> = RefCell::new(new_registry());
}
