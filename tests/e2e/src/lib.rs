//! Shared harness for Reprise end-to-end tests

pub mod mocks;

pub use mocks::fixtures;
