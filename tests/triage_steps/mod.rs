//! Step definitions and shared world for daily triage behaviour tests.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
