//! The polymorphic value type flowing through candidates, canonical keys, and
//! preferred representatives.
//!
//! Grounded on the reference architecture's `DynamicValue` (a runtime-typed
//! value for schemas defined outside the Rust type system): same closed set of
//! variants, same manual `Hash`/`Eq` (floats compared/hashed by bit pattern so
//! `NaN` doesn't silently violate `Hash`'s equality contract, lists/sets
//! compared structurally). Candidates, canonical keys, and preferred
//! representatives are all `Candidate` — the engine never needs a second type
//! for "the hashable projection of a candidate" because every variant here is
//! already hashable by construction. This is the Rust-idiomatic resolution of
//! the spec's "if a canonical key is not hashable, raise `ConfigurationError`"
//! note: static typing makes that case unreachable instead of a runtime check.

use std::hash::{Hash, Hasher};

/// A raw candidate, a canonical key, or a preferred representative.
#[derive(Debug, Clone)]
pub enum Candidate {
    /// Absence of a value. Passed through canonicalization unchanged per the
    /// spec's note that producers, not the engine, are responsible for
    /// filtering `None`/missing values.
    None,
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    /// An ordered sequence, e.g. the two endpoints of a `rangify`d interval.
    List(Vec<Candidate>),
    /// A structured value with named fields, sorted by field name so two
    /// compounds built in different field orders still compare/hash equal.
    Compound(Vec<(String, Candidate)>),
}

impl Candidate {
    pub fn str(s: impl Into<String>) -> Self {
        Candidate::Str(s.into())
    }

    pub fn compound(fields: impl IntoIterator<Item = (String, Candidate)>) -> Self {
        let mut fields: Vec<_> = fields.into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        Candidate::Compound(fields)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Candidate::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Candidate::Float(f) => Some(*f),
            Candidate::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Candidate::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Candidate::None)
    }
}

impl From<&str> for Candidate {
    fn from(s: &str) -> Self {
        Candidate::Str(s.to_string())
    }
}

impl From<String> for Candidate {
    fn from(s: String) -> Self {
        Candidate::Str(s)
    }
}

impl From<i64> for Candidate {
    fn from(v: i64) -> Self {
        Candidate::Int(v)
    }
}

impl From<f64> for Candidate {
    fn from(v: f64) -> Self {
        Candidate::Float(v)
    }
}

impl From<bool> for Candidate {
    fn from(v: bool) -> Self {
        Candidate::Bool(v)
    }
}

impl<T: Into<Candidate>> From<Option<T>> for Candidate {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Candidate::None,
        }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Candidate::None, Candidate::None) => true,
            (Candidate::Int(a), Candidate::Int(b)) => a == b,
            (Candidate::Float(a), Candidate::Float(b)) => {
                a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
            }
            (Candidate::Str(a), Candidate::Str(b)) => a == b,
            (Candidate::Bool(a), Candidate::Bool(b)) => a == b,
            (Candidate::List(a), Candidate::List(b)) => a == b,
            (Candidate::Compound(a), Candidate::Compound(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Candidate {}

impl Hash for Candidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Candidate::None => {}
            Candidate::Int(v) => v.hash(state),
            Candidate::Float(v) => v.to_bits().hash(state),
            Candidate::Str(v) => v.hash(state),
            Candidate::Bool(v) => v.hash(state),
            Candidate::List(v) => v.hash(state),
            Candidate::Compound(v) => v.hash(state),
        }
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Candidate::None => write!(f, "None"),
            Candidate::Int(v) => write!(f, "{v}"),
            Candidate::Float(v) => write!(f, "{v}"),
            Candidate::Str(v) => write!(f, "{v}"),
            Candidate::Bool(v) => write!(f, "{v}"),
            Candidate::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Candidate::Compound(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn float_nan_is_hash_consistent_with_eq() {
        let a = Candidate::Float(f64::NAN);
        let b = Candidate::Float(f64::NAN);
        assert_eq!(a, b);
    }

    #[test]
    fn compound_field_order_does_not_affect_equality() {
        let a = Candidate::compound([
            ("city".to_string(), Candidate::str("Reno")),
            ("zip".to_string(), Candidate::str("89501")),
        ]);
        let b = Candidate::compound([
            ("zip".to_string(), Candidate::str("89501")),
            ("city".to_string(), Candidate::str("Reno")),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_variants_are_not_equal_even_with_same_payload_shape() {
        assert_ne!(Candidate::Int(1), Candidate::Float(1.0));
    }
}
