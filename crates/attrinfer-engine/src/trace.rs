//! Introspection snapshots over a completed (or partially completed)
//! evaluation. Not part of the core algebra — a supplemented feature for
//! hosts that want to explain or debug a particular inference rather than
//! just consume its `best_value`.

use std::rc::Rc;

use attrinfer_core::{Candidate, InferenceError};
use indexmap::IndexMap;

use crate::field_eval::FieldEvaluator;
use crate::source_eval::SourceEvaluator;

/// A snapshot of one source's four pipeline stages.
#[derive(Debug, Clone)]
pub struct SourceTrace {
    pub name: String,
    pub weight: f64,
    pub raw_candidates: IndexMap<Candidate, Vec<Candidate>>,
    pub candidates: IndexMap<Candidate, Vec<Candidate>>,
    pub scores: IndexMap<Candidate, f64>,
    pub raw_scores: IndexMap<Candidate, f64>,
}

impl SourceTrace {
    fn capture<E>(ev: &SourceEvaluator<'_, E>) -> Result<Self, InferenceError> {
        Ok(Self {
            name: ev.name().to_string(),
            weight: ev.weight(),
            raw_candidates: (*ev.raw_candidates()?).clone(),
            candidates: (*ev.candidates()?).clone(),
            scores: (*ev.scores()?).clone(),
            raw_scores: (*ev.raw_scores()?).clone(),
        })
    }
}

/// A snapshot of one field's six pipeline stages plus its per-source
/// traces, in source declaration order.
#[derive(Debug, Clone)]
pub struct FieldTrace {
    pub name: String,
    pub sources: IndexMap<String, SourceTrace>,
    pub ungrouped_scores: IndexMap<Candidate, f64>,
    pub grouped_scores: IndexMap<Candidate, Vec<(Candidate, f64)>>,
    pub scores: IndexMap<Candidate, f64>,
    pub best_value: Option<Candidate>,
}

impl FieldTrace {
    pub(crate) fn capture<'s, E: 'static>(
        field: &Rc<FieldEvaluator<'s, E>>,
        resolve: &dyn Fn(&str) -> Result<Rc<SourceEvaluator<'s, E>>, InferenceError>,
    ) -> Result<Self, InferenceError> {
        let mut sources = IndexMap::new();
        for (name, scores) in field.sourced_unweighted_scores(resolve)?.iter() {
            let _ = scores;
            let ev = resolve(name)?;
            sources.insert(name.clone(), SourceTrace::capture(&ev)?);
        }

        Ok(Self {
            name: field.name().to_string(),
            sources,
            ungrouped_scores: (*field.ungrouped_scores(resolve)?).clone(),
            grouped_scores: (*field.grouped_scores(resolve)?).clone(),
            scores: (*field.scores(resolve)?).clone(),
            best_value: field.best_value(resolve)?,
        })
    }
}

/// A snapshot of every declared field for one entity evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationTrace {
    pub fields: IndexMap<String, FieldTrace>,
}

impl EvaluationTrace {
    pub fn field(&self, name: &str) -> Option<&FieldTrace> {
        self.fields.get(name)
    }
}
