//! Trivial baseline estimator.

use crate::error::{EvalError, Result};
use crate::estimator::Estimator;
use ndarray::{Array1, Array2};

/// Predicts the training base rate for every row.
///
/// Useless as a ranker (every event ties, so the first row in input order is
/// always the predicted winner) but a meaningful floor for the probabilistic
/// metrics.
#[derive(Debug, Default)]
pub struct ConstantProbability {
    probability: Option<f64>,
}

impl ConstantProbability {
    /// Skip fitting and always predict the given probability.
    pub const fn with_probability(probability: f64) -> Self {
        Self {
            probability: Some(probability),
        }
    }
}

impl Estimator for ConstantProbability {
    fn fit(&mut self, _x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if self.probability.is_none() {
            if y.is_empty() {
                return Err(EvalError::Estimator(
                    "cannot fit on an empty label vector".to_string(),
                ));
            }
            self.probability = Some(y.sum() / y.len() as f64);
        }
        Ok(())
    }

    fn predict_probability(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let probability = self
            .probability
            .ok_or_else(|| EvalError::Estimator("predict before fit".to_string()))?;
        Ok(Array1::from_elem(x.nrows(), probability))
    }
}
