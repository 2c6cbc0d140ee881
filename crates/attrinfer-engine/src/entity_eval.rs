//! The top-level facade: one `EntityEvaluator` per entity instance,
//! handing out memoized field/source evaluators on demand.
//!
//! Grounded on `solverforge-dynamic`'s `DynamicSolverManager` (`manager.rs`)
//! as a facade over runtime-declared state, scaled down to this crate's
//! single-threaded, non-reentrant evaluation model: one `EntityEvaluator`
//! is built, driven to completion (or abandoned) by one caller, and
//! discarded — it is not meant to outlive the request that created it.

use std::cell::RefCell;
use std::rc::Rc;

use attrinfer_config::EngineConfig;
use attrinfer_core::{Candidate, Dataset, InferenceError};
use indexmap::IndexMap;

use crate::field_eval::FieldEvaluator;
use crate::registry::InferenceSchema;
use crate::source_eval::SourceEvaluator;
use crate::trace::{EvaluationTrace, FieldTrace};

pub struct EntityEvaluator<'s, E> {
    schema: &'s InferenceSchema<E>,
    entity: Rc<E>,
    config: EngineConfig,
    fields: RefCell<IndexMap<String, Rc<FieldEvaluator<'s, E>>>>,
}

impl<'s, E: 'static> EntityEvaluator<'s, E> {
    pub fn new(schema: &'s InferenceSchema<E>, entity: E) -> Self {
        Self::with_config(schema, entity, EngineConfig::default())
    }

    pub fn with_config(schema: &'s InferenceSchema<E>, entity: E, config: EngineConfig) -> Self {
        Self {
            schema,
            entity: Rc::new(entity),
            config,
            fields: RefCell::new(IndexMap::new()),
        }
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    fn field_evaluator(&self, field_name: &str) -> Result<Rc<FieldEvaluator<'s, E>>, InferenceError> {
        if let Some(ev) = self.fields.borrow().get(field_name).cloned() {
            return Ok(ev);
        }

        let descriptor = self
            .schema
            .field_descriptor(field_name)
            .ok_or_else(|| InferenceError::unknown_field(field_name))?;

        let ev = Rc::new(FieldEvaluator::new(
            descriptor,
            self.entity.clone(),
            self.schema.helpers(),
            self.config.clone(),
        ));
        self.fields
            .borrow_mut()
            .insert(field_name.to_string(), ev.clone());
        Ok(ev)
    }

    /// Produces the dataset a source needs by running its registered
    /// producer against this evaluator's entity. Deliberately *not*
    /// memoized here: per §3/§5, dataset memoization is per source
    /// evaluator, not per entity evaluator, so two sources bound to the
    /// same dataset name each invoke the producer independently. A host
    /// that wants to share a dataset value across sources does so inside
    /// the producer itself (e.g. a cache keyed by entity identity).
    fn bind_dataset(&self, dataset_name: &str) -> Result<Dataset, InferenceError> {
        let producer = self.schema.dataset_producer(dataset_name).ok_or_else(|| {
            InferenceError::configuration(
                dataset_name,
                format!("no dataset registered under the name {dataset_name:?}"),
            )
        })?;
        producer(&self.entity)
            .map_err(|e| InferenceError::dataset(dataset_name, dataset_name, crate::wrap::wrap(e)))
    }

    fn resolve(
        &self,
        field: &Rc<FieldEvaluator<'s, E>>,
        source_name: &str,
    ) -> Result<Rc<SourceEvaluator<'s, E>>, InferenceError> {
        let descriptor = self
            .schema
            .field_descriptor(field.name())
            .and_then(|f| f.source(source_name))
            .ok_or_else(|| InferenceError::unknown_source(source_name))?;
        let dataset_name = descriptor.dataset_name().to_string();
        field.source_evaluator(source_name, || self.bind_dataset(&dataset_name))
    }

    pub fn best_value_for(&self, field_name: &str) -> Result<Option<Candidate>, InferenceError> {
        let field = self.field_evaluator(field_name)?;
        field.best_value(&|source_name| self.resolve(&field, source_name))
    }

    pub fn scores_for(&self, field_name: &str) -> Result<IndexMap<Candidate, f64>, InferenceError> {
        let field = self.field_evaluator(field_name)?;
        Ok((*field.scores(&|source_name| self.resolve(&field, source_name))?).clone())
    }

    pub fn field_values(&self) -> Result<IndexMap<String, Option<Candidate>>, InferenceError> {
        let mut out = IndexMap::new();
        for descriptor in self.schema.fields() {
            out.insert(
                descriptor.name().to_string(),
                self.best_value_for(descriptor.name())?,
            );
        }
        Ok(out)
    }

    pub fn evaluator_for(&self, field_name: &str) -> Result<Rc<FieldEvaluator<'s, E>>, InferenceError> {
        self.field_evaluator(field_name)
    }

    /// Produces a snapshot of every stage, for every field and source, for
    /// introspection (logging a decision trail, debugging a canonicalizer,
    /// building an explanation UI).
    pub fn trace(&self) -> Result<EvaluationTrace, InferenceError> {
        let mut fields = IndexMap::new();
        for descriptor in self.schema.fields() {
            let field = self.field_evaluator(descriptor.name())?;
            let resolve = |source_name: &str| self.resolve(&field, source_name);
            fields.insert(descriptor.name().to_string(), FieldTrace::capture(&field, &resolve)?);
        }
        Ok(EvaluationTrace { fields })
    }
}
