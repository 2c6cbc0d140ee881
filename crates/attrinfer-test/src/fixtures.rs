//! A minimal entity fixture implementing [`EntityAttributes`], for tests
//! that exercise `share()` without pulling in a real host's domain model.

use std::collections::HashMap;

use attrinfer_core::Candidate;
use attrinfer_engine::EntityAttributes;

/// A bag of named attributes, standing in for whatever domain entity a
/// real host would pass to `EntityEvaluator::new`.
#[derive(Debug, Clone, Default)]
pub struct FixtureEntity {
    id: u64,
    attrs: HashMap<String, Candidate>,
}

impl FixtureEntity {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            attrs: HashMap::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Candidate>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }
}

impl EntityAttributes for FixtureEntity {
    fn attribute(&self, name: &str) -> Candidate {
        self.attrs.get(name).cloned().unwrap_or(Candidate::None)
    }
}
