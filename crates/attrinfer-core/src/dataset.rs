//! Type-erased dataset handle.
//!
//! The spec treats datasets as "opaque, queryable collections with
//! domain-specific query methods supplied by the user" — the engine never
//! interprets their contents. Grounded on the reference architecture's
//! `EntityRef`, which stores a type-erased entity behind `Arc<dyn Any>` for
//! diagnostics while still letting a caller downcast back to its concrete
//! type when it knows what it's holding.

use std::any::Any;
use std::sync::Arc;

/// An opaque, queryable dataset value produced by a dataset producer.
///
/// Cheaply cloneable (an `Arc` clone) so it can be memoized once per source
/// evaluator and handed to every candidates/canonicalize/prefer/score block
/// that binds to it.
#[derive(Clone)]
pub struct Dataset {
    name: Arc<str>,
    value: Arc<dyn Any + Send + Sync>,
}

impl Dataset {
    pub fn new<T: Send + Sync + 'static>(name: impl Into<Arc<str>>, value: T) -> Self {
        Self {
            name: name.into(),
            value: Arc::new(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Downcasts to the dataset's concrete type. Returns `None` if the
    /// caller asked for the wrong type, which indicates a source was bound
    /// to a dataset produced for a different purpose.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_concrete_type() {
        let ds = Dataset::new("listings", vec![1, 2, 3]);
        assert_eq!(ds.name(), "listings");
        assert_eq!(ds.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2, 3]));
        assert_eq!(ds.downcast_ref::<Vec<String>>(), None);
    }
}
