//! Events, synchronous fan-out, and the decide/apply helper.

pub mod bus;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, ListenerId, Subscription};
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::InMemoryEventBus;
