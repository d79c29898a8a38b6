//! Unit tests for the task lifecycle engine.

mod batching_tests;
mod support;
