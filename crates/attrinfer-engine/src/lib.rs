//! The attrinfer declaration registry and evaluation pipeline.
//!
//! A host declares an [`InferenceSchema`] once — datasets, shared helpers,
//! and fields built from weighted sources — and then builds one
//! [`EntityEvaluator`] per entity instance to pull out a best-guess value
//! (and its full scoring trail) for any declared field.
//!
//! ```
//! use attrinfer_core::Candidate;
//! use attrinfer_engine::{EntityEvaluator, InferenceSchema};
//!
//! struct Listing {
//!     id: u64,
//! }
//!
//! let mut schema = InferenceSchema::<Listing>::new();
//! schema.dataset("mls", |_listing: &Listing| {
//!     Ok(attrinfer_core::Dataset::new("mls", vec![3_i64]))
//! });
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
//! let evaluator = EntityEvaluator::new(&schema, Listing { id: 1 });
//! assert_eq!(evaluator.best_value_for("bedrooms").unwrap(), Some(Candidate::Int(3)));
//! ```

mod context;
mod descriptor;
mod entity_eval;
mod field_eval;
mod registry;
mod source_eval;
mod trace;
mod types;
mod wrap;

pub use attrinfer_core::{Candidate, Dataset, InferenceError, Stage};
pub use attrinfer_config::EngineConfig;

pub use context::{EntityAttributes, EvalContext, UnknownHelper};
pub use descriptor::{FieldDescriptor, SourceDescriptor};
pub use entity_eval::EntityEvaluator;
pub use field_eval::FieldEvaluator;
pub use registry::{FieldBuilder, InferenceSchema, SourceBuilder};
pub use source_eval::{ScoreEntry, SourceEvaluator};
pub use trace::{EvaluationTrace, FieldTrace, SourceTrace};
pub use types::{CandidatesFn, CanonicalizeFn, DatasetProducerFn, PreferFn, ScoreFn, UserError, UserResult};
