//! Heijunka: WIP-limited task lifecycle engine.
//!
//! This crate implements admission control, completion recording, and daily
//! batch reconciliation for per-user work items moving through a small status
//! lifecycle (`Queued` → `Active` → `Done`, with ageing into `Archived`).
//! Only a bounded number of high-priority items may be active per owner at
//! once; the engine enforces that cap best-effort and levels the remaining
//! work through a daily triage pass.
//!
//! # Architecture
//!
//! Heijunka follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, database)
//!
//! The rendering/session layer that creates and displays tasks is an external
//! collaborator; it reaches the engine only through the task store.

pub mod task;
