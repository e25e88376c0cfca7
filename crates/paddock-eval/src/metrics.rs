//! Evaluation metrics.
//!
//! Probabilistic scores over individual rows plus the event-level ranking
//! metric. Degenerate inputs yield NaN, never zero, so a broken fold stays
//! visible all the way into the final report.

use ndarray::Array1;
use std::collections::HashMap;

const EPS: f64 = 1e-15;

/// Logarithmic loss between predicted probabilities and 0/1 labels.
///
/// Probabilities are clamped away from 0 and 1 before taking logs. An empty
/// input scores NaN.
pub fn log_loss(y: &Array1<f64>, probabilities: &Array1<f64>) -> f64 {
    if y.is_empty() || y.len() != probabilities.len() {
        return f64::NAN;
    }
    let total: f64 = y
        .iter()
        .zip(probabilities)
        .map(|(&label, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            -(label * p.ln() + (1.0 - label) * (1.0 - p).ln())
        })
        .sum();
    total / y.len() as f64
}

/// Brier score: mean squared difference between probability and outcome.
pub fn brier_score(y: &Array1<f64>, probabilities: &Array1<f64>) -> f64 {
    if y.is_empty() || y.len() != probabilities.len() {
        return f64::NAN;
    }
    let total: f64 = y
        .iter()
        .zip(probabilities)
        .map(|(&label, &p)| (p - label).powi(2))
        .sum();
    total / y.len() as f64
}

/// Fraction of events whose highest-probability row is the actual winner.
///
/// `events` carries the `(event_date, event_name)` key of each row, in input
/// row order. Within an event, ties on the maximum probability resolve to the
/// first occurrence (strict `>` comparison keeps the earlier row). Events
/// with no winner-labeled row have no determinable winner and are excluded;
/// if no event qualifies the result is NaN.
pub fn top1_hit_rate(
    events: &[(String, String)],
    y: &Array1<f64>,
    probabilities: &Array1<f64>,
) -> f64 {
    debug_assert_eq!(events.len(), y.len());
    debug_assert_eq!(events.len(), probabilities.len());

    struct Best {
        probability: f64,
        is_winner: bool,
        has_winner: bool,
    }

    let mut order: Vec<&(String, String)> = Vec::new();
    let mut per_event: HashMap<&(String, String), Best> = HashMap::new();
    for (i, key) in events.iter().enumerate() {
        let winner = y[i] > 0.5;
        match per_event.get_mut(key) {
            Some(best) => {
                if probabilities[i] > best.probability {
                    best.probability = probabilities[i];
                    best.is_winner = winner;
                }
                best.has_winner |= winner;
            }
            None => {
                order.push(key);
                per_event.insert(
                    key,
                    Best {
                        probability: probabilities[i],
                        is_winner: winner,
                        has_winner: winner,
                    },
                );
            }
        }
    }

    let mut hits = 0usize;
    let mut scored = 0usize;
    for key in order {
        let best = &per_event[key];
        if best.has_winner {
            scored += 1;
            if best.is_winner {
                hits += 1;
            }
        }
    }
    if scored == 0 {
        f64::NAN
    } else {
        hits as f64 / scored as f64
    }
}

/// Arithmetic mean ignoring NaN entries; NaN when nothing is finite.
pub fn nan_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &value in values {
        if !value.is_nan() {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn keys(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(date, name)| (date.to_string(), name.to_string()))
            .collect()
    }

    #[test]
    fn test_log_loss_perfect_and_uninformed() {
        let y = array![1.0, 0.0];
        assert!(log_loss(&y, &array![1.0, 0.0]) < 1e-10);
        assert_relative_eq!(
            log_loss(&y, &array![0.5, 0.5]),
            std::f64::consts::LN_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_log_loss_clamps_confident_mistakes() {
        let y = array![1.0];
        let loss = log_loss(&y, &array![0.0]);
        assert!(loss.is_finite());
        assert!(loss > 30.0);
    }

    #[test]
    fn test_brier_score_bounds() {
        let y = array![1.0, 0.0];
        assert_relative_eq!(brier_score(&y, &array![1.0, 0.0]), 0.0);
        assert_relative_eq!(brier_score(&y, &array![0.0, 1.0]), 1.0);
        assert_relative_eq!(brier_score(&y, &array![0.5, 0.5]), 0.25);
    }

    #[test]
    fn test_empty_inputs_score_nan() {
        let empty = Array1::from_vec(vec![]);
        assert!(log_loss(&empty, &empty).is_nan());
        assert!(brier_score(&empty, &empty).is_nan());
        assert!(top1_hit_rate(&[], &empty, &empty).is_nan());
    }

    #[test]
    fn test_top1_counts_argmax_winner() {
        let events = keys(&[("d1", "a"), ("d1", "a"), ("d2", "b"), ("d2", "b")]);
        let y = array![1.0, 0.0, 0.0, 1.0];
        let p = array![0.9, 0.1, 0.8, 0.2];
        // Event a: hit. Event b: argmax row is not the winner.
        assert_relative_eq!(top1_hit_rate(&events, &y, &p), 0.5);
    }

    #[test]
    fn test_top1_ties_resolve_to_first_occurrence() {
        let events = keys(&[("d1", "a"), ("d1", "a"), ("d1", "a")]);
        let y = array![0.0, 1.0, 0.0];
        let p = array![0.4, 0.4, 0.4];
        // All tied: the first row in input order is the predicted winner,
        // and it is not the actual winner.
        assert_relative_eq!(top1_hit_rate(&events, &y, &p), 0.0);

        let y_first = array![1.0, 0.0, 0.0];
        assert_relative_eq!(top1_hit_rate(&events, &y_first, &p), 1.0);
    }

    #[test]
    fn test_top1_skips_events_without_winner() {
        let events = keys(&[("d1", "a"), ("d1", "a"), ("d2", "b")]);
        let y = array![1.0, 0.0, 0.0];
        let p = array![0.9, 0.1, 0.7];
        // Event b has no determinable winner and contributes nothing.
        assert_relative_eq!(top1_hit_rate(&events, &y, &p), 1.0);

        let no_winners = array![0.0, 0.0, 0.0];
        assert!(top1_hit_rate(&events, &no_winners, &p).is_nan());
    }

    #[test]
    fn test_nan_mean_ignores_missing_folds() {
        assert_relative_eq!(nan_mean(&[1.0, f64::NAN, 3.0]), 2.0);
        assert!(nan_mean(&[f64::NAN, f64::NAN]).is_nan());
        assert!(nan_mean(&[]).is_nan());
    }
}
