//! Adapter implementations of the task store and event feed ports.

pub mod memory;
pub mod postgres;
