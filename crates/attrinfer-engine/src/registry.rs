//! The declaration registry: `InferenceSchema` and its builders.
//!
//! Grounded on `solverforge-dynamic`'s `descriptor.rs` (`DynamicDescriptor`),
//! which accumulates runtime-declared entity/fact classes by pushing onto
//! `Vec`s (`add_entity_class`/`add_fact_class`) during setup, then serves
//! indexed lookups during solving without ever being mutated again.
//! `InferenceSchema` plays the same role for attrinfer: a host
//! builds one up with `dataset`/`helper`/`share`/`field`, and once built it
//! is immutable and can be evaluated against any number of entities in
//! turn — evaluation reads the schema, it never writes it. The schema
//! itself is `Rc`-based rather than `Arc`-based, matching this engine's
//! single-threaded evaluation model (see `types`), so one schema is meant
//! to be driven from one thread at a time, not shared concurrently.

use std::rc::Rc;

use attrinfer_core::{Candidate, InferenceError};
use indexmap::IndexMap;

use crate::context::{EntityAttributes, EvalContext, HelperFn, Helpers};
use crate::descriptor::{FieldDescriptor, SourceDescriptor};
use crate::types::{CandidatesFn, CanonicalizeFn, PreferFn, RcDatasetProducer, ScoreFn};

/// The top-level declaration registry. `E` is the host's entity type: the
/// thing every dataset producer, helper, and block is ultimately evaluated
/// against.
pub struct InferenceSchema<E> {
    pub(crate) datasets: IndexMap<String, RcDatasetProducer<E>>,
    pub(crate) helpers: Helpers<E>,
    pub(crate) fields: IndexMap<String, FieldDescriptor<E>>,
}

impl<E> Default for InferenceSchema<E> {
    fn default() -> Self {
        Self {
            datasets: IndexMap::new(),
            helpers: Helpers::default(),
            fields: IndexMap::new(),
        }
    }
}

impl<E: 'static> InferenceSchema<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dataset producer under `name`. Re-declaring the same
    /// name is a no-op — the first producer registered wins, matching the
    /// spec's "a dataset is produced once per entity, lazily, the first
    /// time any source asks for it" memoization contract: there is only
    /// ever one recipe for a given dataset name.
    pub fn dataset(
        &mut self,
        name: impl Into<String>,
        producer: impl Fn(&E) -> Result<attrinfer_core::Dataset, Box<dyn std::error::Error>> + 'static,
    ) -> &mut Self {
        self.datasets
            .entry(name.into())
            .or_insert_with(|| Rc::new(producer));
        self
    }

    /// Registers a named helper, callable from any block via
    /// `ctx.call(name, args)`.
    pub fn helper(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&EvalContext<'_, E>, &[Candidate]) -> Candidate + 'static,
    ) -> &mut Self {
        self.helpers.insert(name, Rc::new(f) as Rc<HelperFn<E>>);
        self
    }

    /// Registers one helper per attribute name, each of which forwards to
    /// `EntityAttributes::attribute` on the bound entity. Mirrors the
    /// spec's `share(:bedrooms, :bathrooms)` shorthand.
    pub fn share(&mut self, attrs: impl IntoIterator<Item = &'static str>) -> &mut Self
    where
        E: EntityAttributes,
    {
        for attr in attrs {
            self.helper(attr, move |ctx: &EvalContext<'_, E>, _args: &[Candidate]| {
                ctx.entity().attribute(attr)
            });
        }
        self
    }

    /// Declares or re-enters a field. Calling `field` a second time with a
    /// name already in use does not overwrite the existing field — the
    /// body closure runs against the same `FieldDescriptor`, so it can add
    /// more sources or override the field's canonicalizer/preferrer, the
    /// same re-entrant extension the spec documents for repeated `field`
    /// calls inside an `infers` block.
    pub fn field(
        &mut self,
        name: impl Into<String>,
        body: impl FnOnce(&mut FieldBuilder<'_, E>) -> Result<(), InferenceError>,
    ) -> Result<&mut Self, InferenceError> {
        let name = name.into();
        let descriptor = self
            .fields
            .entry(name.clone())
            .or_insert_with(|| FieldDescriptor::new(name));
        let mut builder = FieldBuilder { descriptor };
        body(&mut builder)?;
        Ok(self)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor<E>> {
        self.fields.values()
    }

    pub fn field_descriptor(&self, name: &str) -> Option<&FieldDescriptor<E>> {
        self.fields.get(name)
    }

    pub(crate) fn dataset_producer(&self, name: &str) -> Option<&RcDatasetProducer<E>> {
        self.datasets.get(name)
    }

    pub(crate) fn helpers(&self) -> &Helpers<E> {
        &self.helpers
    }
}

/// Handed to a field's declaration body by [`InferenceSchema::field`].
pub struct FieldBuilder<'a, E> {
    descriptor: &'a mut FieldDescriptor<E>,
}

impl<E> FieldBuilder<'_, E> {
    pub fn canonicalize(
        &mut self,
        f: impl Fn(&Candidate, &EvalContext<'_, E>) -> Result<Candidate, Box<dyn std::error::Error>>
            + 'static,
    ) -> &mut Self {
        self.descriptor.canonicalize = Rc::new(f) as Rc<CanonicalizeFn<E>>;
        self
    }

    pub fn prefer(
        &mut self,
        f: impl Fn(
                &Candidate,
                &[Candidate],
                &EvalContext<'_, E>,
            ) -> Result<Candidate, Box<dyn std::error::Error>>
            + 'static,
    ) -> &mut Self {
        self.descriptor.prefer = Rc::new(f) as Rc<PreferFn<E>>;
        self
    }

    /// Declares a source drawing candidates from `dataset_name`, weighted
    /// by `weight` in this field's cross-source aggregation. The body must
    /// call `.candidates(...)` and `.score(...)`; both are required and
    /// their absence is reported as a `Configuration` error here, at
    /// declaration time, rather than surfacing lazily on first evaluation.
    pub fn source(
        &mut self,
        dataset_name: impl Into<String>,
        weight: f64,
        body: impl FnOnce(&mut SourceBuilder<'_, E>),
    ) -> Result<&mut Self, InferenceError> {
        let field_name = self.descriptor.name.clone();
        let dataset_name = dataset_name.into();

        if !weight.is_finite() || weight <= 0.0 {
            return Err(InferenceError::configuration_source(
                field_name,
                dataset_name,
                format!("source weight must be a positive, finite number, got {weight}"),
            ));
        }

        let mut descriptor = SourceDescriptor::new(dataset_name.clone(), dataset_name.clone(), weight);
        {
            let mut builder = SourceBuilder {
                descriptor: &mut descriptor,
            };
            body(&mut builder);
        }

        if descriptor.candidates.is_none() {
            return Err(InferenceError::configuration_source(
                field_name,
                dataset_name,
                "source is missing a candidates block",
            ));
        }
        if descriptor.score.is_none() {
            return Err(InferenceError::configuration_source(
                field_name,
                dataset_name,
                "source is missing a score block",
            ));
        }

        self.descriptor
            .sources
            .insert(descriptor.name.clone(), descriptor);
        Ok(self)
    }
}

/// Handed to a source's declaration body by [`FieldBuilder::source`].
pub struct SourceBuilder<'a, E> {
    descriptor: &'a mut SourceDescriptor<E>,
}

impl<E> SourceBuilder<'_, E> {
    pub fn candidates(
        &mut self,
        f: impl Fn(&EvalContext<'_, E>) -> Result<Vec<Candidate>, Box<dyn std::error::Error>> + 'static,
    ) -> &mut Self {
        self.descriptor.candidates = Some(Rc::new(f) as Rc<CandidatesFn<E>>);
        self
    }

    pub fn canonicalize(
        &mut self,
        f: impl Fn(&Candidate, &EvalContext<'_, E>) -> Result<Candidate, Box<dyn std::error::Error>>
            + 'static,
    ) -> &mut Self {
        self.descriptor.canonicalize = Some(Rc::new(f) as Rc<CanonicalizeFn<E>>);
        self
    }

    pub fn prefer(
        &mut self,
        f: impl Fn(
                &Candidate,
                &[Candidate],
                &EvalContext<'_, E>,
            ) -> Result<Candidate, Box<dyn std::error::Error>>
            + 'static,
    ) -> &mut Self {
        self.descriptor.prefer = Some(Rc::new(f) as Rc<PreferFn<E>>);
        self
    }

    pub fn score(
        &mut self,
        f: impl Fn(
                &Candidate,
                &[Candidate],
                &EvalContext<'_, E>,
            ) -> Result<f64, Box<dyn std::error::Error>>
            + 'static,
    ) -> &mut Self {
        self.descriptor.score = Some(Rc::new(f) as Rc<ScoreFn<E>>);
        self
    }
}
