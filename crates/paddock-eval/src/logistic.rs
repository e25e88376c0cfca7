//! Logistic regression estimator.
//!
//! Standardizes each column with training-split statistics, then fits a
//! weighted logistic model by full-batch gradient descent. Everything is
//! deterministic: zero initialization, fixed iteration count, no sampling.
//!
//! Missing feature values (NaN) are mapped to the column mean, which lands on
//! zero after standardization, so sparse early-career rows do not derail the
//! gradient.

use crate::error::{EvalError, Result};
use crate::estimator::Estimator;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Configuration for the logistic regression estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionConfig {
    /// Gradient descent iterations (default: 500)
    pub max_iter: usize,
    /// Learning rate on standardized features (default: 0.1)
    pub learning_rate: f64,
    /// L2 penalty on the weights (default: 1e-4)
    pub l2: f64,
    /// Reweight classes inversely to their frequency (default: true)
    pub balanced: bool,
}

impl Default for LogisticRegressionConfig {
    fn default() -> Self {
        Self {
            max_iter: 500,
            learning_rate: 0.1,
            l2: 1e-4,
            balanced: true,
        }
    }
}

#[derive(Debug)]
struct Fitted {
    means: Array1<f64>,
    stds: Array1<f64>,
    weights: Array1<f64>,
    intercept: f64,
}

/// Standardizing logistic regression
#[derive(Debug)]
pub struct LogisticRegression {
    config: LogisticRegressionConfig,
    fitted: Option<Fitted>,
}

impl LogisticRegression {
    /// Create the estimator with an explicit configuration.
    pub const fn with_config(config: LogisticRegressionConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::with_config(LogisticRegressionConfig::default())
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn column_stats(x: &Array2<f64>) -> (Array1<f64>, Array1<f64>) {
    let rows = x.nrows();
    let cols = x.ncols();
    let mut means = Array1::zeros(cols);
    let mut stds = Array1::ones(cols);
    for j in 0..cols {
        let mut sum = 0.0;
        let mut count = 0usize;
        for i in 0..rows {
            let value = x[[i, j]];
            if value.is_finite() {
                sum += value;
                count += 1;
            }
        }
        let mean = if count > 0 { sum / count as f64 } else { 0.0 };
        let mut var = 0.0;
        for i in 0..rows {
            let value = x[[i, j]];
            if value.is_finite() {
                var += (value - mean).powi(2);
            }
        }
        let std = if count > 0 { (var / count as f64).sqrt() } else { 0.0 };
        means[j] = mean;
        stds[j] = if std > 0.0 { std } else { 1.0 };
    }
    (means, stds)
}

fn standardize(x: &Array2<f64>, means: &Array1<f64>, stds: &Array1<f64>) -> Array2<f64> {
    let mut out = x.clone();
    for ((_, j), value) in out.indexed_iter_mut() {
        *value = if value.is_finite() {
            (*value - means[j]) / stds[j]
        } else {
            0.0
        };
    }
    out
}

impl Estimator for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let rows = x.nrows();
        if rows == 0 || rows != y.len() {
            return Err(EvalError::Estimator(format!(
                "feature matrix has {rows} rows but label vector has {}",
                y.len()
            )));
        }

        let (means, stds) = column_stats(x);
        let xs = standardize(x, &means, &stds);

        let positives = y.sum();
        let negatives = rows as f64 - positives;
        let (weight_pos, weight_neg) = if self.config.balanced && positives > 0.0 && negatives > 0.0
        {
            let n = rows as f64;
            (n / (2.0 * positives), n / (2.0 * negatives))
        } else {
            (1.0, 1.0)
        };

        let cols = xs.ncols();
        let mut weights: Array1<f64> = Array1::zeros(cols);
        let mut intercept = 0.0;
        let total_weight = positives * weight_pos + negatives * weight_neg;

        for _ in 0..self.config.max_iter {
            let mut grad_w: Array1<f64> = Array1::zeros(cols);
            let mut grad_b = 0.0;
            for i in 0..rows {
                let row = xs.row(i);
                let margin = row.dot(&weights) + intercept;
                let sample_weight = if y[i] > 0.5 { weight_pos } else { weight_neg };
                let residual = sample_weight * (sigmoid(margin) - y[i]);
                grad_b += residual;
                for j in 0..cols {
                    grad_w[j] += residual * row[j];
                }
            }
            for j in 0..cols {
                grad_w[j] = grad_w[j] / total_weight + self.config.l2 * weights[j];
            }
            grad_b /= total_weight;

            for j in 0..cols {
                weights[j] -= self.config.learning_rate * grad_w[j];
            }
            intercept -= self.config.learning_rate * grad_b;
        }

        self.fitted = Some(Fitted {
            means,
            stds,
            weights,
            intercept,
        });
        Ok(())
    }

    fn predict_probability(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or_else(|| EvalError::Estimator("predict before fit".to_string()))?;
        if x.ncols() != fitted.weights.len() {
            return Err(EvalError::Estimator(format!(
                "expected {} feature column(s), got {}",
                fitted.weights.len(),
                x.ncols()
            )));
        }
        let xs = standardize(x, &fitted.means, &fitted.stds);
        let probabilities = xs
            .rows()
            .into_iter()
            .map(|row| sigmoid(row.dot(&fitted.weights) + fitted.intercept))
            .collect();
        Ok(Array1::from_vec(probabilities))
    }
}
