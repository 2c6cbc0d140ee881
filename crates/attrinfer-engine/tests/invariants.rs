//! Property-based tests for the universal invariants: canonicalization
//! partitions raws, weighted merging is linear, best_value is an argmax
//! with first-insertion tie-break, and evaluation is memoized.

use std::cell::Cell;
use std::rc::Rc;

use attrinfer_core::{Candidate, Dataset};
use attrinfer_engine::{EntityEvaluator, InferenceSchema};
use attrinfer_test::strategies::{candidate, nonempty_raws, source_weight};
use proptest::prelude::*;

/// Canonicalization partitions raws: every raw in a class canonicalizes
/// back to that class's key, and the classes partition the raw set (no
/// raw lands in two classes).
#[test]
fn canonicalization_partitions_raws() {
    proptest!(|(raws in nonempty_raws())| {
        let mut schema = InferenceSchema::<()>::new();
        let raws_for_producer = raws.clone();
        schema.dataset("raws", move |_: &()| Ok(Dataset::new("raws", raws_for_producer.clone())));
        schema
            .field("value", |field| {
                field.source("raws", 1.0, |source| {
                    source.candidates(|ctx| {
                        Ok(ctx.dataset().unwrap().downcast_ref::<Vec<Candidate>>().unwrap().clone())
                    });
                    source.canonicalize(|c, _ctx| Ok(discretize(c)));
                    source.score(|_repr, raws, _ctx| Ok(raws.len() as f64));
                })?;
                Ok(())
            })
            .unwrap();

        let evaluator = EntityEvaluator::new(&schema, ());
        let trace = evaluator.trace().unwrap();
        let source_trace = &trace.field("value").unwrap().sources["raws"];

        let mut seen = std::collections::HashSet::new();
        for (key, members) in source_trace.raw_candidates.iter() {
            for raw in members {
                prop_assert_eq!(&discretize(raw), key);
                prop_assert!(seen.insert(raw.clone()), "a raw appeared in two classes");
            }
        }
        prop_assert_eq!(source_trace.raw_candidates.values().map(|v| v.len()).sum::<usize>(), raws.len());
    });
}

/// `ungrouped_scores[r] = sum(w_i * x_i)` over the sources that produced
/// `r`, for two independently-weighted sources sharing one candidate.
#[test]
fn merging_rule_is_linear_in_weight() {
    proptest!(|(weight_a in source_weight(), weight_b in source_weight(), score_a in 0.0_f64..1.0, score_b in 0.0_f64..1.0)| {
        let mut schema = InferenceSchema::<()>::new();
        schema.dataset("a", |_: &()| Ok(Dataset::new("a", vec!["shared"])));
        schema.dataset("b", |_: &()| Ok(Dataset::new("b", vec!["shared"])));
        schema
            .field("value", |field| {
                field.source("a", weight_a, |source| {
                    source.candidates(|ctx| {
                        let rows = ctx.dataset().unwrap().downcast_ref::<Vec<&str>>().unwrap();
                        Ok(rows.iter().map(|s| Candidate::str(*s)).collect())
                    });
                    source.score(move |_repr, _raws, _ctx| Ok(score_a));
                })?;
                field.source("b", weight_b, |source| {
                    source.candidates(|ctx| {
                        let rows = ctx.dataset().unwrap().downcast_ref::<Vec<&str>>().unwrap();
                        Ok(rows.iter().map(|s| Candidate::str(*s)).collect())
                    });
                    source.score(move |_repr, _raws, _ctx| Ok(score_b));
                })?;
                Ok(())
            })
            .unwrap();

        let evaluator = EntityEvaluator::new(&schema, ());
        let trace = evaluator.trace().unwrap();
        let field = trace.field("value").unwrap();
        let got = *field.ungrouped_scores.get(&Candidate::str("shared")).unwrap();
        let expected = weight_a * score_a + weight_b * score_b;
        prop_assert!((got - expected).abs() < 1e-9, "got {got} expected {expected}");
    });
}

/// `best_value` always names the entry with the maximum score, and among
/// equal maxima the first-inserted final representative wins.
#[test]
fn best_value_is_an_argmax_with_first_insertion_tiebreak() {
    let mut schema = InferenceSchema::<()>::new();
    schema.dataset("a", |_: &()| Ok(Dataset::new("a", vec!["first", "second", "third"])));
    schema
        .field("value", |field| {
            field.source("a", 1.0, |source| {
                source.candidates(|ctx| {
                    let rows = ctx.dataset().unwrap().downcast_ref::<Vec<&str>>().unwrap();
                    Ok(rows.iter().map(|s| Candidate::str(*s)).collect())
                });
                // All three candidates score identically: the tie must
                // resolve to "first", the one inserted first.
                source.score(|_repr, _raws, _ctx| Ok(0.5));
            })?;
            Ok(())
        })
        .unwrap();

    let evaluator = EntityEvaluator::new(&schema, ());
    assert_eq!(evaluator.best_value_for("value").unwrap(), Some(Candidate::str("first")));
}

/// A source's candidates/score blocks are each invoked at most once per
/// entity evaluator, however many times different fields/accessors ask
/// for the field's value.
#[test]
fn evaluation_is_memoized_per_entity_evaluator() {
    let candidates_calls = Rc::new(Cell::new(0_u32));
    let score_calls = Rc::new(Cell::new(0_u32));

    let mut schema = InferenceSchema::<()>::new();
    schema.dataset("a", |_: &()| Ok(Dataset::new("a", vec!["x"])));

    let candidates_calls_clone = candidates_calls.clone();
    let score_calls_clone = score_calls.clone();
    schema
        .field("value", move |field| {
            let candidates_calls = candidates_calls_clone.clone();
            let score_calls = score_calls_clone.clone();
            field.source("a", 1.0, move |source| {
                let candidates_calls = candidates_calls.clone();
                source.candidates(move |ctx| {
                    candidates_calls.set(candidates_calls.get() + 1);
                    let rows = ctx.dataset().unwrap().downcast_ref::<Vec<&str>>().unwrap();
                    Ok(rows.iter().map(|s| Candidate::str(*s)).collect())
                });
                let score_calls = score_calls.clone();
                source.score(move |_repr, _raws, _ctx| {
                    score_calls.set(score_calls.get() + 1);
                    Ok(1.0)
                });
            })?;
            Ok(())
        })
        .unwrap();

    let evaluator = EntityEvaluator::new(&schema, ());
    let _ = evaluator.scores_for("value").unwrap();
    let _ = evaluator.best_value_for("value").unwrap();
    let _ = evaluator.scores_for("value").unwrap();

    assert_eq!(candidates_calls.get(), 1);
    assert_eq!(score_calls.get(), 1);
}

/// Two sources bound to the same dataset name, on two different fields,
/// each invoke the dataset producer independently — dataset memoization
/// is per source evaluator, not shared entity-wide, per the spec's
/// resource-sharing note in its concurrency section.
#[test]
fn dataset_producer_runs_once_per_source_evaluator_not_once_per_entity() {
    let producer_calls = Rc::new(Cell::new(0_u32));

    let mut schema = InferenceSchema::<()>::new();
    let calls = producer_calls.clone();
    schema.dataset("shared", move |_: &()| {
        calls.set(calls.get() + 1);
        Ok(Dataset::new("shared", vec!["x"]))
    });

    schema
        .field("a", |field| {
            field.source("shared", 1.0, |source| {
                source.candidates(|ctx| {
                    let rows = ctx.dataset().unwrap().downcast_ref::<Vec<&str>>().unwrap();
                    Ok(rows.iter().map(|s| Candidate::str(*s)).collect())
                });
                source.score(|_repr, _raws, _ctx| Ok(1.0));
            })?;
            Ok(())
        })
        .unwrap();
    schema
        .field("b", |field| {
            field.source("shared", 1.0, |source| {
                source.candidates(|ctx| {
                    let rows = ctx.dataset().unwrap().downcast_ref::<Vec<&str>>().unwrap();
                    Ok(rows.iter().map(|s| Candidate::str(*s)).collect())
                });
                source.score(|_repr, _raws, _ctx| Ok(1.0));
            })?;
            Ok(())
        })
        .unwrap();

    let evaluator = EntityEvaluator::new(&schema, ());
    let _ = evaluator.scores_for("a").unwrap();
    // Asking for field "a" again must not re-invoke the producer: memoized
    // inside its own source evaluator.
    let _ = evaluator.scores_for("a").unwrap();
    assert_eq!(producer_calls.get(), 1);

    // Field "b"'s source is a distinct source evaluator bound to the same
    // dataset name, so it invokes the producer again rather than reusing
    // field "a"'s cached dataset value.
    let _ = evaluator.scores_for("b").unwrap();
    assert_eq!(producer_calls.get(), 2);
}

/// Field-canonical grouping is idempotent (spec §8 property 3): reapplying
/// the field's own canonicalizer to each key already produced by
/// `grouped_scores` must reproduce that same key, so regrouping those keys
/// can never split the partition any further. Exercised over the full
/// `Candidate` domain, including `List`/`Compound`, not just leaf values.
#[test]
fn field_level_grouping_is_idempotent_under_its_own_canonicalizer() {
    proptest!(|(raws in proptest::collection::vec(candidate(), 1..8))| {
        let mut schema = InferenceSchema::<()>::new();
        let raws_for_producer = raws.clone();
        schema.dataset("raws", move |_: &()| Ok(Dataset::new("raws", raws_for_producer.clone())));
        schema
            .field("value", |field| {
                field.canonicalize(|c, _ctx| Ok(discretize(c)));
                field.source("raws", 1.0, |source| {
                    source.candidates(|ctx| {
                        Ok(ctx.dataset().unwrap().downcast_ref::<Vec<Candidate>>().unwrap().clone())
                    });
                    source.score(|_repr, _raws, _ctx| Ok(1.0));
                })?;
                Ok(())
            })
            .unwrap();

        let evaluator = EntityEvaluator::new(&schema, ());
        let trace = evaluator.trace().unwrap();
        let grouped = &trace.field("value").unwrap().grouped_scores;

        for key in grouped.keys() {
            prop_assert_eq!(&discretize(key), key);
        }
    });
}

fn discretize(c: &Candidate) -> Candidate {
    match c {
        Candidate::Str(s) => Candidate::str(s.to_lowercase()),
        Candidate::Float(f) => Candidate::Float((f * 10.0).round() / 10.0),
        other => other.clone(),
    }
}
