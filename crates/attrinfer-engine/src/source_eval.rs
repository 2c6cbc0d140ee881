//! Per-source evaluation: raw candidates → equivalence classes →
//! preferred representatives → scores.
//!
//! Grounded on `solverforge-dynamic`'s `eval/eval_entity.rs`: a small
//! object that lazily computes and memoizes one stage at a time, reusing
//! earlier stages rather than recomputing them, scoped to one entity
//! instance and never shared across entities.

use std::cell::RefCell;
use std::rc::Rc;

use attrinfer_core::{Candidate, Dataset, InferenceError, Stage};
use attrinfer_config::EngineConfig;
use indexmap::IndexMap;

use crate::context::{EvalContext, Helpers};
use crate::descriptor::SourceDescriptor;

/// A source's raw score for one final representative, before and after the
/// "negative or NaN counts as zero for aggregation" clamp. `scores()`
/// exposes `effective`; `raw_scores()` exposes `raw` for introspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEntry {
    pub raw: f64,
    pub effective: f64,
}

fn clamp_for_aggregation(raw: f64) -> f64 {
    if raw.is_nan() || raw < 0.0 {
        0.0
    } else {
        raw
    }
}

pub struct SourceEvaluator<'s, E> {
    field_name: Rc<str>,
    descriptor: &'s SourceDescriptor<E>,
    field_canonicalize: crate::types::RcCanonicalize<E>,
    field_prefer: crate::types::RcPrefer<E>,
    entity: Rc<E>,
    helpers: &'s Helpers<E>,
    config: EngineConfig,

    dataset: RefCell<Option<Dataset>>,
    raw_candidates: RefCell<Option<Rc<IndexMap<Candidate, Vec<Candidate>>>>>,
    candidates: RefCell<Option<Rc<IndexMap<Candidate, Vec<Candidate>>>>>,
    scores: RefCell<Option<Rc<IndexMap<Candidate, ScoreEntry>>>>,
}

impl<'s, E> SourceEvaluator<'s, E> {
    pub(crate) fn new(
        field_name: Rc<str>,
        descriptor: &'s SourceDescriptor<E>,
        field_canonicalize: crate::types::RcCanonicalize<E>,
        field_prefer: crate::types::RcPrefer<E>,
        entity: Rc<E>,
        helpers: &'s Helpers<E>,
        config: EngineConfig,
    ) -> Self {
        Self {
            field_name,
            descriptor,
            field_canonicalize,
            field_prefer,
            entity,
            helpers,
            config,
            dataset: RefCell::new(None),
            raw_candidates: RefCell::new(None),
            candidates: RefCell::new(None),
            scores: RefCell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn weight(&self) -> f64 {
        self.descriptor.weight()
    }

    pub(crate) fn bind_dataset(&self, ds: Dataset) {
        *self.dataset.borrow_mut() = Some(ds);
    }

    fn user_err(&self, stage: Stage, err: Box<dyn std::error::Error>) -> InferenceError {
        InferenceError::user_block(
            self.field_name.to_string(),
            Some(self.descriptor.name().to_string()),
            stage,
            crate::wrap::wrap(err),
        )
    }

    /// Stage 1: `{canonical_key → raw candidates}`, built by running the
    /// source's `candidates` block and grouping each result by the
    /// canonicalizer (the source's own, or the field's if the source
    /// didn't declare one). Ordering of raws within a class preserves
    /// producer order; class order is first-appearance order.
    pub fn raw_candidates(&self) -> Result<Rc<IndexMap<Candidate, Vec<Candidate>>>, InferenceError> {
        if let Some(v) = self.raw_candidates.borrow().clone() {
            return Ok(v);
        }

        let dataset = self.dataset.borrow().clone().ok_or_else(|| {
            InferenceError::configuration_source(
                self.field_name.to_string(),
                self.descriptor.name().to_string(),
                "dataset was not bound before evaluation",
            )
        })?;
        let ctx = EvalContext::new(&self.entity, self.helpers, Some(&dataset));

        let candidates_fn = self.descriptor.candidates.as_ref().expect(
            "FieldBuilder::source rejects a source with no candidates block at declaration time",
        );
        let raws = candidates_fn(&ctx).map_err(|e| self.user_err(Stage::Candidates, e))?;
        tracing::trace!(field = %self.field_name, source = self.descriptor.name(), count = raws.len(), "produced raw candidates");

        let canonicalize = self
            .descriptor
            .canonicalize
            .clone()
            .unwrap_or_else(|| self.field_canonicalize.clone());

        let mut grouped: IndexMap<Candidate, Vec<Candidate>> = IndexMap::new();
        for raw in raws {
            let key = canonicalize(&raw, &ctx).map_err(|e| self.user_err(Stage::Canonicalize, e))?;
            if self.config.log_grouping_decisions {
                tracing::debug!(field = %self.field_name, source = self.descriptor.name(), ?key, ?raw, "grouped raw candidate");
            }
            grouped.entry(key).or_default().push(raw);
        }

        let grouped = Rc::new(grouped);
        *self.raw_candidates.borrow_mut() = Some(grouped.clone());
        Ok(grouped)
    }

    /// Stage 2: `{preferred_representative → raws}`. If two canonical
    /// classes resolve to the same preferred representative, their raws
    /// are concatenated under that one key rather than one class silently
    /// overwriting the other.
    pub fn candidates(&self) -> Result<Rc<IndexMap<Candidate, Vec<Candidate>>>, InferenceError> {
        if let Some(v) = self.candidates.borrow().clone() {
            return Ok(v);
        }

        let raw_candidates = self.raw_candidates()?;
        let dataset = self.dataset.borrow().clone();
        let ctx = EvalContext::new(&self.entity, self.helpers, dataset.as_ref());

        let prefer = self
            .descriptor
            .prefer
            .clone()
            .unwrap_or_else(|| self.field_prefer.clone());

        let mut preferred: IndexMap<Candidate, Vec<Candidate>> = IndexMap::new();
        for (canonical_key, raws) in raw_candidates.iter() {
            let representative = prefer(canonical_key, raws, &ctx)
                .map_err(|e| self.user_err(Stage::Prefer, e))?;
            preferred
                .entry(representative)
                .or_default()
                .extend(raws.iter().cloned());
        }

        tracing::debug!(field = %self.field_name, source = self.descriptor.name(), classes = preferred.len(), "resolved preferred representatives");
        let preferred = Rc::new(preferred);
        *self.candidates.borrow_mut() = Some(preferred.clone());
        Ok(preferred)
    }

    /// Stage 3: `{preferred_representative → score}`. Scores are the raw
    /// values the user's `score` block returned; a negative or NaN score
    /// is clamped to 0 for downstream aggregation (see
    /// [`Self::raw_scores`] for the unclamped values) unless
    /// [`EngineConfig::strict_scores`] is set, in which case such a score
    /// is a hard error.
    pub fn scores(&self) -> Result<Rc<IndexMap<Candidate, f64>>, InferenceError> {
        Ok(Rc::new(
            self.score_entries()?
                .iter()
                .map(|(k, v)| (k.clone(), v.effective))
                .collect(),
        ))
    }

    /// The unclamped scores a `score` block actually returned, preserved
    /// for introspection even where [`Self::scores`] clamps to 0.
    pub fn raw_scores(&self) -> Result<Rc<IndexMap<Candidate, f64>>, InferenceError> {
        Ok(Rc::new(
            self.score_entries()?
                .iter()
                .map(|(k, v)| (k.clone(), v.raw))
                .collect(),
        ))
    }

    fn score_entries(&self) -> Result<Rc<IndexMap<Candidate, ScoreEntry>>, InferenceError> {
        if let Some(v) = self.scores.borrow().clone() {
            return Ok(v);
        }

        let candidates = self.candidates()?;
        let dataset = self.dataset.borrow().clone();
        let ctx = EvalContext::new(&self.entity, self.helpers, dataset.as_ref());

        let score_fn = self
            .descriptor
            .score
            .as_ref()
            .expect("FieldBuilder::source rejects a source with no score block at declaration time");

        let mut entries = IndexMap::new();
        for (representative, raws) in candidates.iter() {
            let raw_score = score_fn(representative, raws, &ctx)
                .map_err(|e| self.user_err(Stage::Score, e))?;

            if (raw_score.is_nan() || raw_score < 0.0) && self.config.strict_scores {
                return Err(InferenceError::invalid_score(
                    self.field_name.to_string(),
                    self.descriptor.name().to_string(),
                    representative,
                    raw_score,
                ));
            }

            entries.insert(
                representative.clone(),
                ScoreEntry {
                    raw: raw_score,
                    effective: clamp_for_aggregation(raw_score),
                },
            );
        }

        tracing::debug!(field = %self.field_name, source = self.descriptor.name(), scored = entries.len(), "scored source candidates");
        let entries = Rc::new(entries);
        *self.scores.borrow_mut() = Some(entries.clone());
        Ok(entries)
    }
}

