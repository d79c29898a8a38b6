//! In-memory adapter implementing the store and event feed ports.

mod store;

pub use store::InMemoryTaskStore;
