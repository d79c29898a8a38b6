//! WIP-limited task lifecycle engine.
//!
//! The engine accepts or reverts transitions into the `Active` status under
//! per-owner WIP limits, stamps completion times, and reconciles the whole
//! collection once a day: a triage pass demotes unfinished active work and
//! re-promotes queued work oldest-first per owner, then an archival pass
//! retires queued tasks past the retention threshold. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Engine services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
