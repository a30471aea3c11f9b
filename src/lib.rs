pub mod engine;
pub mod extract;
pub mod model;
pub mod observability;
pub mod store;

pub use engine::{Engine, EngineError};
pub use model::{Id, Snapshot};
pub use store::{DataStore, InMemoryStore};
