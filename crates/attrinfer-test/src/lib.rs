//! Shared test fixtures for attrinfer crates.
//!
//! This crate provides pure functions and small data types for testing. It
//! does NOT depend on a real host domain model, mirroring the reference
//! architecture's own test-fixtures crate: a `solverforge-test` dependency
//! never pulls in a particular problem's entity types, just generic
//! building blocks every crate's tests can share.
//!
//! - [`primitives`] — the sample scoring primitives from the spec's
//!   illustrative helpers section (`score_for_count`, `recency_of`, ...).
//! - [`strategies`] — `proptest` strategies for generating `Candidate`s.
//! - [`fixtures`] — a minimal `EntityAttributes`-implementing entity.
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! attrinfer-test = { workspace = true }
//! ```

pub mod fixtures;
pub mod primitives;
pub mod strategies;

pub use fixtures::FixtureEntity;
