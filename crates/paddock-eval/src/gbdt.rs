//! Gradient-boosted trees estimator.
//!
//! Depth-limited regression trees boosted on the logistic loss with Newton
//! leaf steps. Deliberately deterministic: no row or column subsampling,
//! candidate thresholds taken from evenly spaced quantiles, ties resolved to
//! the first candidate. Rows whose split feature is missing (NaN) are routed
//! to the right child; the comparison `value < threshold` is false for NaN,
//! and that rule is fixed rather than learned.

use crate::error::{EvalError, Result};
use crate::estimator::Estimator;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Configuration for the gradient-boosted trees estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingConfig {
    /// Number of boosting rounds (default: 100)
    pub n_estimators: usize,
    /// Shrinkage applied to each tree (default: 0.1)
    pub learning_rate: f64,
    /// Maximum tree depth (default: 3)
    pub max_depth: usize,
    /// Minimum rows per leaf (default: 5)
    pub min_samples_leaf: usize,
    /// Maximum candidate thresholds per feature per node (default: 16)
    pub max_thresholds: usize,
    /// L2 regularization on leaf values (default: 1.0)
    pub l2: f64,
}

impl Default for GradientBoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 5,
            max_thresholds: 16,
            l2: 1.0,
        }
    }
}

#[derive(Debug)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: ArrayView1<'_, f64>) -> f64 {
        match self {
            Self::Leaf { value } => *value,
            Self::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                // NaN comparisons are false, so missing values go right.
                if row[*feature] < *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

#[derive(Debug)]
struct Fitted {
    base_score: f64,
    trees: Vec<Node>,
    n_features: usize,
}

/// Gradient-boosted trees on the logistic loss
#[derive(Debug)]
pub struct GradientBoostedTrees {
    config: GradientBoostingConfig,
    fitted: Option<Fitted>,
}

impl GradientBoostedTrees {
    /// Create the estimator with an explicit configuration.
    pub const fn with_config(config: GradientBoostingConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }
}

impl Default for GradientBoostedTrees {
    fn default() -> Self {
        Self::with_config(GradientBoostingConfig::default())
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn leaf_value(rows: &[usize], gradient: &[f64], hessian: &[f64], l2: f64) -> f64 {
    let sum_g: f64 = rows.iter().map(|&i| gradient[i]).sum();
    let sum_h: f64 = rows.iter().map(|&i| hessian[i]).sum();
    sum_g / (sum_h + l2)
}

fn split_score(sum_g: f64, sum_h: f64, l2: f64) -> f64 {
    sum_g * sum_g / (sum_h + l2)
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

fn candidate_thresholds(mut values: Vec<f64>, max_thresholds: usize) -> Vec<f64> {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values.dedup();
    if values.len() < 2 {
        return Vec::new();
    }
    if values.len() - 1 <= max_thresholds {
        return values
            .windows(2)
            .map(|pair| (pair[0] + pair[1]) / 2.0)
            .collect();
    }
    // Evenly spaced quantile midpoints over the distinct values.
    (1..=max_thresholds)
        .map(|k| {
            let idx = k * (values.len() - 1) / (max_thresholds + 1);
            (values[idx] + values[idx + 1]) / 2.0
        })
        .collect()
}

struct TreeBuilder<'a> {
    x: &'a Array2<f64>,
    gradient: &'a [f64],
    hessian: &'a [f64],
    config: &'a GradientBoostingConfig,
}

impl TreeBuilder<'_> {
    fn best_split(&self, rows: &[usize]) -> Option<BestSplit> {
        let total_g: f64 = rows.iter().map(|&i| self.gradient[i]).sum();
        let total_h: f64 = rows.iter().map(|&i| self.hessian[i]).sum();
        let parent = split_score(total_g, total_h, self.config.l2);

        let mut best: Option<BestSplit> = None;
        for feature in 0..self.x.ncols() {
            let finite: Vec<f64> = rows
                .iter()
                .map(|&i| self.x[[i, feature]])
                .filter(|v| v.is_finite())
                .collect();
            for threshold in candidate_thresholds(finite, self.config.max_thresholds) {
                let mut left_g = 0.0;
                let mut left_h = 0.0;
                let mut left_n = 0usize;
                for &i in rows {
                    if self.x[[i, feature]] < threshold {
                        left_g += self.gradient[i];
                        left_h += self.hessian[i];
                        left_n += 1;
                    }
                }
                let right_n = rows.len() - left_n;
                if left_n < self.config.min_samples_leaf
                    || right_n < self.config.min_samples_leaf
                {
                    continue;
                }
                let gain = split_score(left_g, left_h, self.config.l2)
                    + split_score(total_g - left_g, total_h - left_h, self.config.l2)
                    - parent;
                let better = match &best {
                    Some(current) => gain > current.gain,
                    None => gain > 1e-12,
                };
                if better {
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }
        best
    }

    fn build(&self, rows: &[usize], depth: usize) -> Node {
        if depth >= self.config.max_depth || rows.len() < 2 * self.config.min_samples_leaf {
            return Node::Leaf {
                value: leaf_value(rows, self.gradient, self.hessian, self.config.l2),
            };
        }
        match self.best_split(rows) {
            Some(split) => {
                let (left, right): (Vec<usize>, Vec<usize>) = rows
                    .iter()
                    .partition(|&&i| self.x[[i, split.feature]] < split.threshold);
                Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left: Box::new(self.build(&left, depth + 1)),
                    right: Box::new(self.build(&right, depth + 1)),
                }
            }
            None => Node::Leaf {
                value: leaf_value(rows, self.gradient, self.hessian, self.config.l2),
            },
        }
    }
}

impl Estimator for GradientBoostedTrees {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let rows = x.nrows();
        if rows == 0 || rows != y.len() {
            return Err(EvalError::Estimator(format!(
                "feature matrix has {rows} rows but label vector has {}",
                y.len()
            )));
        }

        let base_rate = (y.sum() / rows as f64).clamp(1e-6, 1.0 - 1e-6);
        let base_score = (base_rate / (1.0 - base_rate)).ln();

        let all_rows: Vec<usize> = (0..rows).collect();
        let mut scores = vec![base_score; rows];
        let mut trees = Vec::with_capacity(self.config.n_estimators);

        for _ in 0..self.config.n_estimators {
            let mut gradient = vec![0.0; rows];
            let mut hessian = vec![0.0; rows];
            for i in 0..rows {
                let p = sigmoid(scores[i]);
                gradient[i] = y[i] - p;
                hessian[i] = p * (1.0 - p);
            }
            let builder = TreeBuilder {
                x,
                gradient: &gradient,
                hessian: &hessian,
                config: &self.config,
            };
            let tree = builder.build(&all_rows, 0);
            for i in 0..rows {
                scores[i] += self.config.learning_rate * tree.predict(x.row(i));
            }
            trees.push(tree);
        }

        self.fitted = Some(Fitted {
            base_score,
            trees,
            n_features: x.ncols(),
        });
        Ok(())
    }

    fn predict_probability(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| EvalError::Estimator("predict before fit".to_string()))?;
        if x.ncols() != fitted.n_features {
            return Err(EvalError::Estimator(format!(
                "expected {} feature column(s), got {}",
                fitted.n_features,
                x.ncols()
            )));
        }
        let probabilities = x
            .rows()
            .into_iter()
            .map(|row| {
                let score: f64 = fitted.base_score
                    + fitted
                        .trees
                        .iter()
                        .map(|tree| self.config.learning_rate * tree.predict(row))
                        .sum::<f64>();
                sigmoid(score)
            })
            .collect();
        Ok(Array1::from_vec(probabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Array1<f64>) {
        let mut data = Vec::new();
        let mut labels = Vec::new();
        for event in 0..6 {
            for slot in 0..4 {
                data.push(1.0 + slot as f64 + 0.1 * event as f64);
                labels.push(if slot == 0 { 1.0 } else { 0.0 });
            }
        }
        let x = Array2::from_shape_vec((labels.len(), 1), data).unwrap();
        (x, Array1::from_vec(labels))
    }

    #[test]
    fn test_learns_separable_boundary() {
        let (x, y) = separable();
        let mut model = GradientBoostedTrees::default();
        model.fit(&x, &y).unwrap();
        let p = model.predict_probability(&array![[1.0], [4.0]]).unwrap();
        assert!(p[0] > 0.5, "front slot should look like a winner, got {}", p[0]);
        assert!(p[1] < 0.5, "back slot should not, got {}", p[1]);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = separable();
        let mut a = GradientBoostedTrees::default();
        let mut b = GradientBoostedTrees::default();
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(
            a.predict_probability(&x).unwrap(),
            b.predict_probability(&x).unwrap()
        );
    }

    #[test]
    fn test_missing_values_follow_the_fixed_branch() {
        let (x, y) = separable();
        let mut model = GradientBoostedTrees::default();
        model.fit(&x, &y).unwrap();
        let p = model.predict_probability(&array![[f64::NAN]]).unwrap();
        assert!(p[0].is_finite());
        assert!((0.0..=1.0).contains(&p[0]));
    }

    #[test]
    fn test_candidate_thresholds_are_midpoints() {
        let thresholds = candidate_thresholds(vec![1.0, 2.0, 3.0], 16);
        assert_eq!(thresholds, vec![1.5, 2.5]);
        assert!(candidate_thresholds(vec![1.0], 16).is_empty());
        assert!(candidate_thresholds(Vec::new(), 16).is_empty());
    }

    #[test]
    fn test_quantile_thresholds_are_bounded() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let thresholds = candidate_thresholds(values, 8);
        assert_eq!(thresholds.len(), 8);
        assert!(thresholds.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
