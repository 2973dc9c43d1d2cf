//! A class with mutable state.

use std::sync::Arc;

/// Holds a message that can be replaced.
///
/// Dropping a `World` prints the message it held at that moment.
#[derive(Debug)]
pub struct World {
    msg: String,
}

impl World {
    /// Create a new `World` that holds `msg`.
    pub fn new(msg: impl Into<String>) -> Self {
        World { msg: msg.into() }
    }

    /// Replace the message.
    pub fn set(&mut self, msg: String) {
        self.msg = msg;
    }

    /// The current message.
    pub fn greet(&self) -> String {
        self.msg.clone()
    }

    /// The line printed when this `World` is dropped.
    pub fn drop_message(&self) -> String {
        format!("Destroying World with message {}", self.msg)
    }
}

impl Default for World {
    fn default() -> Self {
        World::new("default hello")
    }
}

impl Drop for World {
    fn drop(&mut self) {
        println!("{}", self.drop_message());
    }
}

/// A `World` owned by the caller.
pub fn world_factory() -> World {
    World::new("factory hello")
}

/// A reference-counted `World`.
pub fn shared_world_factory() -> Arc<World> {
    Arc::new(World::new("shared factory hello"))
}

/// A heap-allocated `World` whose ownership is moved to the caller.
pub fn unique_world_factory() -> Box<World> {
    Box::new(World::new("unique factory hello"))
}

/// `greet` for a shared `World`.
pub fn greet_shared(world: Arc<World>) -> String {
    world.greet()
}
