//! Error taxonomy for attrinfer.
//!
//! Grounded on the reference architecture's `SolverForgeError`: one
//! `thiserror`-derived enum distinguishing errors by the stage that raised
//! them rather than a single generic "it broke" variant, so a caller can
//! `match` on what kind of thing failed. `UserBlock` additionally carries the
//! offending user closure's own error boxed behind `std::error::Error`,
//! mirroring how the reference architecture's phase/constraint errors wrap an
//! inner cause instead of flattening it into a string.

use thiserror::Error;

/// The stage of a field/source pipeline a `UserBlockError` was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Candidates,
    Canonicalize,
    Prefer,
    Score,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Candidates => "candidates",
            Stage::Canonicalize => "canonicalize",
            Stage::Prefer => "prefer",
            Stage::Score => "score",
        };
        write!(f, "{s}")
    }
}

/// Main error type for attrinfer declaration and evaluation.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// A source or field was declared with a malformed configuration: a
    /// non-numeric/non-positive weight, a source missing its score function,
    /// a source missing its candidates producer, or a source naming an
    /// unregistered dataset. Surfaces at declaration time, never during
    /// evaluation.
    #[error("configuration error in field {field:?} source {source:?}: {message}")]
    Configuration {
        field: String,
        source: Option<String>,
        message: String,
    },

    /// A dataset producer raised during evaluation.
    #[error("dataset {dataset:?} failed while evaluating field {field:?}: {source}")]
    Dataset {
        field: String,
        dataset: String,
        #[source]
        source: Box<dyn std::error::Error>,
    },

    /// A user-supplied candidates/canonicalize/prefer/score block raised.
    #[error("field {field:?} source {source:?} ({stage}) raised: {inner}")]
    UserBlock {
        field: String,
        source: Option<String>,
        stage: Stage,
        #[source]
        inner: Box<dyn std::error::Error>,
    },

    /// `best_value_for`/`scores_for`/`evaluator_for` was called with an
    /// unknown field or source name.
    #[error("unknown {kind} {name:?}")]
    Lookup { kind: &'static str, name: String },

    /// A `score` block returned NaN or a negative number while the engine's
    /// `strict_scores` config was set. Unlike `Configuration`, this can only
    /// happen during evaluation — the score block has already run against a
    /// particular entity — so it gets its own variant rather than
    /// overloading `Configuration`'s declaration-time-only contract.
    #[error("field {field:?} source {source:?} scored {score} for {candidate:?}, which strict_scores forbids")]
    InvalidScore {
        field: String,
        source: String,
        candidate: String,
        score: f64,
    },
}

impl InferenceError {
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        InferenceError::Configuration {
            field: field.into(),
            source: None,
            message: message.into(),
        }
    }

    pub fn configuration_source(
        field: impl Into<String>,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        InferenceError::Configuration {
            field: field.into(),
            source: Some(source.into()),
            message: message.into(),
        }
    }

    pub fn user_block(
        field: impl Into<String>,
        source: Option<String>,
        stage: Stage,
        inner: impl std::error::Error + 'static,
    ) -> Self {
        InferenceError::UserBlock {
            field: field.into(),
            source,
            stage,
            inner: Box::new(inner),
        }
    }

    pub fn dataset(
        field: impl Into<String>,
        dataset: impl Into<String>,
        source: impl std::error::Error + 'static,
    ) -> Self {
        InferenceError::Dataset {
            field: field.into(),
            dataset: dataset.into(),
            source: Box::new(source),
        }
    }

    pub fn unknown_field(name: impl Into<String>) -> Self {
        InferenceError::Lookup {
            kind: "field",
            name: name.into(),
        }
    }

    pub fn unknown_source(name: impl Into<String>) -> Self {
        InferenceError::Lookup {
            kind: "source",
            name: name.into(),
        }
    }

    pub fn invalid_score(
        field: impl Into<String>,
        source: impl Into<String>,
        candidate: impl std::fmt::Debug,
        score: f64,
    ) -> Self {
        InferenceError::InvalidScore {
            field: field.into(),
            source: source.into(),
            candidate: format!("{candidate:?}"),
            score,
        }
    }
}

/// Result type alias for attrinfer operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
