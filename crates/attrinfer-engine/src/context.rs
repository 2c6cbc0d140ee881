//! The object every user-supplied closure receives.
//!
//! Grounded on `solverforge-dynamic`'s `EvalContext` (`eval/mod.rs`), which
//! bundles "the thing being evaluated" with a lookup table of names the
//! expression can reference. Here the closures are real Rust closures rather
//! than an interpreted expression AST, so `EvalContext` plays a narrower
//! role: it carries the entity, the shared helper table, and (for
//! source-level blocks only) the dataset the source is bound to.

use std::rc::Rc;

use attrinfer_core::{Candidate, Dataset};
use indexmap::IndexMap;

/// A helper function: given the entity and the arguments a block passed to
/// `ctx.call(name, args)`, produces a `Candidate`. Helpers cannot fail — the
/// sample primitives in the spec (`score_for_count`, `recency_of`, ...) are
/// all total functions over their inputs, and `share()`-generated helpers
/// just forward to `Entity::attribute`, which is likewise infallible.
pub type HelperFn<E> = dyn Fn(&EvalContext<'_, E>, &[Candidate]) -> Candidate;

/// Forwards attribute lookups to field values an entity type exposes by
/// name. Implementing this is only required to use `share()`; entities that
/// never call `share()` can ignore this trait entirely.
pub trait EntityAttributes {
    fn attribute(&self, name: &str) -> Candidate;
}

/// The shared, read-only table of helpers registered against a schema.
/// Looked up by name rather than called directly, since a block only knows
/// the helper's name at declaration time, not its Rust identifier.
pub struct Helpers<E> {
    entries: IndexMap<String, Rc<HelperFn<E>>>,
}

impl<E> Default for Helpers<E> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<E> Helpers<E> {
    pub fn insert(&mut self, name: impl Into<String>, f: Rc<HelperFn<E>>) {
        self.entries.insert(name.into(), f);
    }

    pub fn get(&self, name: &str) -> Option<&Rc<HelperFn<E>>> {
        self.entries.get(name)
    }
}

/// The evaluation context passed as the first argument to every
/// candidates/canonicalize/prefer/score block, and to every helper.
pub struct EvalContext<'a, E> {
    entity: &'a E,
    helpers: &'a Helpers<E>,
    dataset: Option<&'a Dataset>,
}

impl<'a, E> EvalContext<'a, E> {
    pub fn new(entity: &'a E, helpers: &'a Helpers<E>, dataset: Option<&'a Dataset>) -> Self {
        Self {
            entity,
            helpers,
            dataset,
        }
    }

    pub fn entity(&self) -> &E {
        self.entity
    }

    /// `Some` only inside a source-level block; field-level blocks
    /// (`canonicalize`/`prefer` declared directly on the field) are not
    /// bound to any one source's dataset.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset
    }

    /// Invokes a registered helper by name. The name is only a string until
    /// someone calls it, so a typo can't be caught at declaration time; the
    /// error surfaces here instead, to be propagated with `?` through the
    /// calling block and reported as a `UserBlock` error like any other
    /// failure a block raises.
    pub fn call(&self, name: &str, args: &[Candidate]) -> Result<Candidate, UnknownHelper> {
        match self.helpers.get(name) {
            Some(f) => Ok(f(self, args)),
            None => Err(UnknownHelper(name.to_string())),
        }
    }
}

/// Raised by [`EvalContext::call`] when no helper is registered under the
/// given name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no helper registered under the name {0:?}")]
pub struct UnknownHelper(pub String);
