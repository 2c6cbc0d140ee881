//! Core value types and error taxonomy shared by the attrinfer workspace.
//!
//! This crate carries no dependency on the declaration/evaluation machinery
//! in `attrinfer-engine` — it is the bottom layer every other attrinfer crate
//! depends on, the same role the reference architecture's own `*-core` crate
//! plays for its domain/score types.

mod dataset;
mod error;
mod value;

pub use dataset::Dataset;
pub use error::{InferenceError, Result, Stage};
pub use value::Candidate;
