//! Multi-source attribute inference.
//!
//! `attrinfer` lets a host declare, for each attribute ("field") of an
//! entity, one or more weighted sources of raw candidate values, together
//! with how to canonicalize, prefer among, and score those candidates.
//! Given an entity instance, the engine resolves each field to a single
//! best-guess value and the full scoring trail behind it.
//!
//! This crate is a thin facade re-exporting [`attrinfer_core`],
//! [`attrinfer_config`], and [`attrinfer_engine`] — the same
//! one-crate-to-depend-on shape the reference architecture's own facade
//! crate provides over its `*-core`/`*-config`/`*-scoring`/`*-solver`
//! split.
//!
//! ```
//! use attrinfer::{Candidate, EntityEvaluator, InferenceSchema};
//!
//! struct Listing;
//!
//! let mut schema = InferenceSchema::<Listing>::new();
//! schema.dataset("mls", |_: &Listing| Ok(attrinfer::Dataset::new("mls", vec![3_i64])));
//! schema
//!     .field("bedrooms", |field| {
//!         field.source("mls", 1.0, |source| {
//!             source.candidates(|ctx| {
//!                 let rows = ctx.dataset().unwrap().downcast_ref::<Vec<i64>>().unwrap();
//!                 Ok(rows.iter().map(|n| Candidate::Int(*n)).collect())
//!             });
//!             source.score(|_repr, raws, _ctx| Ok(raws.len() as f64));
//!         })?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let evaluator = EntityEvaluator::new(&schema, Listing);
//! assert_eq!(evaluator.best_value_for("bedrooms").unwrap(), Some(Candidate::Int(3)));
//! ```

pub use attrinfer_config::EngineConfig;
pub use attrinfer_core::{Candidate, Dataset, InferenceError, Result, Stage};
pub use attrinfer_engine::{
    EntityAttributes, EntityEvaluator, EvalContext, EvaluationTrace, FieldBuilder, FieldDescriptor,
    FieldEvaluator, FieldTrace, InferenceSchema, ScoreEntry, SourceBuilder, SourceDescriptor,
    SourceEvaluator, SourceTrace, UnknownHelper,
};
