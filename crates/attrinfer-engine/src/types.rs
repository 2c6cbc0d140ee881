//! Shared closure type aliases.
//!
//! Evaluation in this engine is explicitly single-threaded and
//! non-reentrant (an `EntityEvaluator` cannot be driven from two threads at
//! once, and a block must not re-enter its own field's evaluation), so
//! these are plain `Rc<dyn Fn>` rather than `Arc<dyn Fn + Send + Sync>` —
//! there is no cross-thread sharing to support, unlike
//! `solverforge-dynamic`'s closures which back a parallel solver.

use std::rc::Rc;

use attrinfer_core::{Candidate, Dataset};

use crate::context::EvalContext;

/// The error type a user-supplied block may raise. Wrapped into
/// [`attrinfer_core::InferenceError::UserBlock`] by the evaluator with the
/// field/source/stage that was running when it happened.
pub type UserError = Box<dyn std::error::Error>;
pub type UserResult<T> = Result<T, UserError>;

pub type DatasetProducerFn<E> = dyn Fn(&E) -> UserResult<Dataset>;
pub type CandidatesFn<E> = dyn Fn(&EvalContext<'_, E>) -> UserResult<Vec<Candidate>>;
pub type CanonicalizeFn<E> = dyn Fn(&Candidate, &EvalContext<'_, E>) -> UserResult<Candidate>;
pub type PreferFn<E> =
    dyn Fn(&Candidate, &[Candidate], &EvalContext<'_, E>) -> UserResult<Candidate>;
pub type ScoreFn<E> = dyn Fn(&Candidate, &[Candidate], &EvalContext<'_, E>) -> UserResult<f64>;

pub(crate) type RcDatasetProducer<E> = Rc<DatasetProducerFn<E>>;
pub(crate) type RcCanonicalize<E> = Rc<CanonicalizeFn<E>>;
pub(crate) type RcPrefer<E> = Rc<PreferFn<E>>;
pub(crate) type RcCandidates<E> = Rc<CandidatesFn<E>>;
pub(crate) type RcScore<E> = Rc<ScoreFn<E>>;

/// The default canonicalizer: every raw candidate is its own class.
pub(crate) fn identity_canonicalize<E>() -> RcCanonicalize<E> {
    Rc::new(|value: &Candidate, _ctx: &EvalContext<'_, E>| Ok(value.clone()))
}

/// The default preferrer: the canonical key stands in for its class
/// unchanged. Used at the field level, and at the source level whenever a
/// source doesn't declare its own `prefer`.
pub(crate) fn identity_prefer<E>() -> RcPrefer<E> {
    Rc::new(
        |canonical_key: &Candidate, _raws: &[Candidate], _ctx: &EvalContext<'_, E>| {
            Ok(canonical_key.clone())
        },
    )
}
