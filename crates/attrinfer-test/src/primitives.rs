//! The sample scoring primitives a host inferrer would register as shared
//! helpers. Kept here, not in `attrinfer-engine`, because the engine itself
//! is agnostic to how a score is computed — these are illustrative
//! building blocks, not part of the core algebra, and every engine test
//! that reproduces a concrete scenario needs the same numbers the scenario
//! was written against.

use attrinfer_core::Candidate;

pub const DEFAULT_DECAY: f64 = 0.95;

/// `1 - k^sqrt(n)` for `n >= 1`, else a small positive floor so a field
/// with zero observations from this source never wins a tie against a
/// field with one.
pub fn score_for_count(n: f64, k: f64) -> f64 {
    if n >= 1.0 {
        1.0 - k.powf(n.sqrt())
    } else {
        0.0001
    }
}

/// `k^sqrt(max(0, r - 4))` for `r >= 0`, else the same small floor.
/// `r` is a recency measure in the same units `recency_of` produces
/// (weeks-ago), not raw days.
pub fn score_for_recency(r: f64, k: f64) -> f64 {
    if r >= 0.0 {
        k.powf((r - 4.0).max(0.0).sqrt())
    } else {
        0.0001
    }
}

/// Converts a days-since-observation measure into whole weeks ago.
pub fn recency_of(days_since: f64) -> f64 {
    (days_since / 7.0).floor()
}

/// `(prod(max(x_i, 0.001)))^(1/n)`. The `0.001` floor keeps one zero input
/// from collapsing the whole product to zero.
pub fn geometric_mean_of(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let product: f64 = xs.iter().map(|x| x.max(0.001)).product();
    product.powf(1.0 / n)
}

/// The inclusive interval `[v - m, v + m]` around a scalar, represented as
/// a two-element `Candidate::List`. Applied pointwise when `value` is
/// itself a `Candidate::List` (e.g. rangifying a list of measurements).
pub fn rangify(value: &Candidate, m: f64) -> Candidate {
    match value {
        Candidate::List(items) => Candidate::List(items.iter().map(|v| rangify(v, m)).collect()),
        other => {
            let v = other
                .as_f64()
                .unwrap_or_else(|| panic!("rangify requires a numeric candidate, got {other:?}"));
            Candidate::List(vec![Candidate::Float(v - m), Candidate::Float(v + m)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_for_count_matches_s4_expectations() {
        let score = score_for_count(2.0, DEFAULT_DECAY);
        assert!((score - 0.0688).abs() < 0.001, "got {score}");

        let score = score_for_count(1.0, DEFAULT_DECAY);
        assert!((score - 0.05).abs() < 0.001, "got {score}");
    }

    #[test]
    fn score_for_count_floors_below_one_observation() {
        assert_eq!(score_for_count(0.0, DEFAULT_DECAY), 0.0001);
    }

    #[test]
    fn score_for_recency_is_highest_within_the_four_week_grace_period() {
        assert_eq!(score_for_recency(0.0, DEFAULT_DECAY), 1.0);
        assert_eq!(score_for_recency(4.0, DEFAULT_DECAY), 1.0);
    }

    #[test]
    fn score_for_recency_decays_past_the_grace_period() {
        let at_grace = score_for_recency(4.0, DEFAULT_DECAY);
        let past_grace = score_for_recency(13.0, DEFAULT_DECAY);
        assert!(past_grace < at_grace, "got {past_grace} expected < {at_grace}");

        let expected = DEFAULT_DECAY.powf((13.0_f64 - 4.0).sqrt());
        assert!((past_grace - expected).abs() < 1e-9, "got {past_grace}");
    }

    #[test]
    fn score_for_recency_floors_negative_input() {
        assert_eq!(score_for_recency(-1.0, DEFAULT_DECAY), 0.0001);
    }

    #[test]
    fn recency_of_floors_to_whole_weeks_ago() {
        assert_eq!(recency_of(0.0), 0.0);
        assert_eq!(recency_of(6.9), 0.0);
        assert_eq!(recency_of(7.0), 1.0);
        assert_eq!(recency_of(20.0), 2.0);
    }

    #[test]
    fn rangify_wraps_a_scalar_symmetrically() {
        let range = rangify(&Candidate::Float(1.03), 1e-5);
        assert_eq!(
            range,
            Candidate::List(vec![
                Candidate::Float(1.03 - 1e-5),
                Candidate::Float(1.03 + 1e-5)
            ])
        );
    }

    #[test]
    fn geometric_mean_floors_zero_inputs() {
        let mean = geometric_mean_of(&[0.0, 1.0]);
        assert!(mean > 0.0 && mean < 0.1);
    }
}
