//! Per-field evaluation: cross-source aggregation, field-level
//! regrouping, and best-value selection.

use std::cell::RefCell;
use std::rc::Rc;

use attrinfer_config::EngineConfig;
use attrinfer_core::{Candidate, InferenceError, Stage};
use indexmap::IndexMap;

use crate::context::{EvalContext, Helpers};
use crate::descriptor::FieldDescriptor;
use crate::source_eval::SourceEvaluator;

pub struct FieldEvaluator<'s, E> {
    descriptor: &'s FieldDescriptor<E>,
    entity: Rc<E>,
    helpers: &'s Helpers<E>,
    config: EngineConfig,

    sources: RefCell<IndexMap<String, Rc<SourceEvaluator<'s, E>>>>,
    sourced_unweighted_scores: RefCell<Option<Rc<IndexMap<String, Rc<IndexMap<Candidate, f64>>>>>>,
    sourced_weighted_scores: RefCell<Option<Rc<IndexMap<String, IndexMap<Candidate, f64>>>>>,
    ungrouped_scores: RefCell<Option<Rc<IndexMap<Candidate, f64>>>>,
    grouped_scores: RefCell<Option<Rc<IndexMap<Candidate, Vec<(Candidate, f64)>>>>>,
    scores: RefCell<Option<Rc<IndexMap<Candidate, f64>>>>,
    best_value: RefCell<Option<Option<Candidate>>>,
}

impl<'s, E: 'static> FieldEvaluator<'s, E> {
    pub(crate) fn new(
        descriptor: &'s FieldDescriptor<E>,
        entity: Rc<E>,
        helpers: &'s Helpers<E>,
        config: EngineConfig,
    ) -> Self {
        Self {
            descriptor,
            entity,
            helpers,
            config,
            sources: RefCell::new(IndexMap::new()),
            sourced_unweighted_scores: RefCell::new(None),
            sourced_weighted_scores: RefCell::new(None),
            ungrouped_scores: RefCell::new(None),
            grouped_scores: RefCell::new(None),
            scores: RefCell::new(None),
            best_value: RefCell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Looks up (creating and memoizing if necessary) the evaluator for
    /// one of this field's sources. `bind_dataset` must run against the
    /// schema's registered dataset producer before the returned evaluator
    /// can compute `raw_candidates`; the entity evaluator does this the
    /// first time a source is resolved.
    pub(crate) fn source_evaluator(
        &self,
        source_name: &str,
        bind: impl FnOnce() -> Result<attrinfer_core::Dataset, InferenceError>,
    ) -> Result<Rc<SourceEvaluator<'s, E>>, InferenceError> {
        if let Some(ev) = self.sources.borrow().get(source_name).cloned() {
            return Ok(ev);
        }

        let descriptor = self
            .descriptor
            .source(source_name)
            .ok_or_else(|| InferenceError::unknown_source(source_name))?;

        let ev = Rc::new(SourceEvaluator::new(
            Rc::from(self.descriptor.name()),
            descriptor,
            self.descriptor.canonicalize.clone(),
            self.descriptor.prefer.clone(),
            self.entity.clone(),
            self.helpers,
            self.config.clone(),
        ));
        ev.bind_dataset(bind()?);

        self.sources
            .borrow_mut()
            .insert(source_name.to_string(), ev.clone());
        Ok(ev)
    }

    pub fn evaluator_for(
        &self,
        source_name: &str,
        bind: impl FnOnce() -> Result<attrinfer_core::Dataset, InferenceError>,
    ) -> Result<Rc<SourceEvaluator<'s, E>>, InferenceError> {
        self.source_evaluator(source_name, bind)
    }

    /// Stage 1: `{source_name → source_evaluator.scores()}`, in source
    /// declaration order.
    pub fn sourced_unweighted_scores(
        &self,
        resolve: &dyn Fn(&str) -> Result<Rc<SourceEvaluator<'s, E>>, InferenceError>,
    ) -> Result<Rc<IndexMap<String, Rc<IndexMap<Candidate, f64>>>>, InferenceError> {
        if let Some(v) = self.sourced_unweighted_scores.borrow().clone() {
            return Ok(v);
        }

        let mut out = IndexMap::new();
        for source in self.descriptor.sources() {
            let ev = resolve(source.name())?;
            out.insert(source.name().to_string(), ev.scores()?);
        }

        let out = Rc::new(out);
        *self.sourced_unweighted_scores.borrow_mut() = Some(out.clone());
        Ok(out)
    }

    /// Stage 2: each source's scores multiplied by that source's weight.
    pub fn sourced_weighted_scores(
        &self,
        resolve: &dyn Fn(&str) -> Result<Rc<SourceEvaluator<'s, E>>, InferenceError>,
    ) -> Result<Rc<IndexMap<String, IndexMap<Candidate, f64>>>, InferenceError> {
        if let Some(v) = self.sourced_weighted_scores.borrow().clone() {
            return Ok(v);
        }

        let unweighted = self.sourced_unweighted_scores(resolve)?;
        let mut out = IndexMap::new();
        for source in self.descriptor.sources() {
            let scores = unweighted.get(source.name()).expect("populated above");
            let weighted: IndexMap<Candidate, f64> = scores
                .iter()
                .map(|(k, v)| (k.clone(), v * source.weight()))
                .collect();
            out.insert(source.name().to_string(), weighted);
        }

        let out = Rc::new(out);
        *self.sourced_weighted_scores.borrow_mut() = Some(out.clone());
        Ok(out)
    }

    /// Stage 3: weighted scores summed across sources, keyed by the exact
    /// (already source-preferred) candidate value. Insertion order is
    /// first-appearance order across sources in declaration order.
    pub fn ungrouped_scores(
        &self,
        resolve: &dyn Fn(&str) -> Result<Rc<SourceEvaluator<'s, E>>, InferenceError>,
    ) -> Result<Rc<IndexMap<Candidate, f64>>, InferenceError> {
        if let Some(v) = self.ungrouped_scores.borrow().clone() {
            return Ok(v);
        }

        let weighted = self.sourced_weighted_scores(resolve)?;
        let mut out: IndexMap<Candidate, f64> = IndexMap::new();
        for source in self.descriptor.sources() {
            let scores = weighted.get(source.name()).expect("populated above");
            for (candidate, score) in scores.iter() {
                *out.entry(candidate.clone()).or_insert(0.0) += score;
            }
        }

        tracing::debug!(field = self.descriptor.name(), candidates = out.len(), "merged weighted scorecards across sources");
        let out = Rc::new(out);
        *self.ungrouped_scores.borrow_mut() = Some(out.clone());
        Ok(out)
    }

    /// Stage 4: ungrouped candidates regrouped by the field's own
    /// canonicalizer (not a source's). Members of each group keep the
    /// order they had in `ungrouped_scores`.
    pub fn grouped_scores(
        &self,
        resolve: &dyn Fn(&str) -> Result<Rc<SourceEvaluator<'s, E>>, InferenceError>,
    ) -> Result<Rc<IndexMap<Candidate, Vec<(Candidate, f64)>>>, InferenceError> {
        if let Some(v) = self.grouped_scores.borrow().clone() {
            return Ok(v);
        }

        let ungrouped = self.ungrouped_scores(resolve)?;
        let ctx = EvalContext::new(&self.entity, self.helpers, None);

        let mut out: IndexMap<Candidate, Vec<(Candidate, f64)>> = IndexMap::new();
        for (candidate, score) in ungrouped.iter() {
            let key = (self.descriptor.canonicalize)(candidate, &ctx).map_err(|e| {
                InferenceError::user_block(
                    self.descriptor.name().to_string(),
                    None,
                    Stage::Canonicalize,
                    crate::wrap::wrap(e),
                )
            })?;
            out.entry(key).or_default().push((candidate.clone(), *score));
        }

        let out = Rc::new(out);
        *self.grouped_scores.borrow_mut() = Some(out.clone());
        Ok(out)
    }

    /// Stage 5: each field-level group reduced to one final representative
    /// (via the field's `prefer`) with a summed score. Two groups that
    /// resolve to the same final representative have their scores summed
    /// rather than one overwriting the other.
    pub fn scores(
        &self,
        resolve: &dyn Fn(&str) -> Result<Rc<SourceEvaluator<'s, E>>, InferenceError>,
    ) -> Result<Rc<IndexMap<Candidate, f64>>, InferenceError> {
        if let Some(v) = self.scores.borrow().clone() {
            return Ok(v);
        }

        let grouped = self.grouped_scores(resolve)?;
        let ctx = EvalContext::new(&self.entity, self.helpers, None);

        let mut out: IndexMap<Candidate, f64> = IndexMap::new();
        for (canonical_key, members) in grouped.iter() {
            let raws: Vec<Candidate> = members.iter().map(|(c, _)| c.clone()).collect();
            let representative = (self.descriptor.prefer)(canonical_key, &raws, &ctx).map_err(|e| {
                InferenceError::user_block(
                    self.descriptor.name().to_string(),
                    None,
                    Stage::Prefer,
                    crate::wrap::wrap(e),
                )
            })?;
            let group_score: f64 = members.iter().map(|(_, s)| s).sum();
            *out.entry(representative).or_insert(0.0) += group_score;
        }

        let out = Rc::new(out);
        *self.scores.borrow_mut() = Some(out.clone());
        Ok(out)
    }

    /// Stage 6: the single best final representative. Ties (including the
    /// all-zero case) are broken by first-insertion order in `scores`,
    /// which falls out of scanning for a strictly-greater score rather
    /// than a greater-or-equal one. `None` only when the field has no
    /// candidates at all.
    pub fn best_value(
        &self,
        resolve: &dyn Fn(&str) -> Result<Rc<SourceEvaluator<'s, E>>, InferenceError>,
    ) -> Result<Option<Candidate>, InferenceError> {
        if let Some(v) = self.best_value.borrow().clone() {
            return Ok(v);
        }

        let scores = self.scores(resolve)?;
        let mut best: Option<(&Candidate, f64)> = None;
        for (candidate, score) in scores.iter() {
            match best {
                Some((_, best_score)) if *score <= best_score => {}
                _ => best = Some((candidate, *score)),
            }
        }
        let result = best.map(|(c, _)| c.clone());
        tracing::debug!(field = self.descriptor.name(), best_value = ?result, "selected best value");
        *self.best_value.borrow_mut() = Some(result.clone());
        Ok(result)
    }
}
