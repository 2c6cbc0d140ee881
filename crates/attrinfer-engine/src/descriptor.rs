//! Declarative descriptors produced by the registry builders.
//!
//! Named after `solverforge-dynamic`'s `descriptor.rs`, which holds the
//! plain-data `FieldDef`/`EntityClassDef` structs a schema is built from
//! before any solving happens. These play the same role here: a
//! `FieldDescriptor`/`SourceDescriptor` is inert data produced once, by
//! calling `InferenceSchema::field`/`FieldBuilder::source`, and then
//! evaluated arbitrarily many times against different entities.

use indexmap::IndexMap;

use crate::types::{RcCandidates, RcCanonicalize, RcPrefer, RcScore};

/// One source bound to a field: a dataset name, a weight, and the four
/// optional source-level blocks. `canonicalize`/`prefer` fall back to the
/// owning field's blocks when absent, resolved at evaluation time rather
/// than copied in at declaration time, since a field's own blocks may be
/// declared either before or after its sources within the same `field()`
/// call.
pub struct SourceDescriptor<E> {
    pub(crate) name: String,
    pub(crate) dataset_name: String,
    pub(crate) weight: f64,
    pub(crate) candidates: Option<RcCandidates<E>>,
    pub(crate) canonicalize: Option<RcCanonicalize<E>>,
    pub(crate) prefer: Option<RcPrefer<E>>,
    pub(crate) score: Option<RcScore<E>>,
}

impl<E> SourceDescriptor<E> {
    pub(crate) fn new(name: impl Into<String>, dataset_name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            dataset_name: dataset_name.into(),
            weight,
            candidates: None,
            canonicalize: None,
            prefer: None,
            score: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// A declared field: its own canonicalizer/preferrer (the field-level
/// defaults sources fall back to) and its sources, in declaration order.
/// Declaration order is load-bearing — it is the tie-break used by
/// `best_value` when two final representatives end up with equal scores.
pub struct FieldDescriptor<E> {
    pub(crate) name: String,
    pub(crate) canonicalize: RcCanonicalize<E>,
    pub(crate) prefer: RcPrefer<E>,
    pub(crate) sources: IndexMap<String, SourceDescriptor<E>>,
}

impl<E> FieldDescriptor<E> {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            canonicalize: crate::types::identity_canonicalize(),
            prefer: crate::types::identity_prefer(),
            sources: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> impl Iterator<Item = &SourceDescriptor<E>> {
        self.sources.values()
    }

    pub fn source(&self, name: &str) -> Option<&SourceDescriptor<E>> {
        self.sources.get(name)
    }
}
