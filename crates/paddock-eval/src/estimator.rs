//! Estimator capability and factory.
//!
//! The evaluator never inspects what is inside an estimator; it only relies
//! on the fit/predict contract. Concrete models are registered in a factory
//! keyed by identifier, so adding a model type touches nothing else.

use crate::baseline::ConstantProbability;
use crate::error::{EvalError, Result};
use crate::gbdt::GradientBoostedTrees;
use crate::logistic::LogisticRegression;
use ndarray::{Array1, Array2};
use std::collections::BTreeMap;

/// A trainable winner-probability model.
pub trait Estimator: std::fmt::Debug {
    /// Fit on a feature matrix and 0/1 label vector.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict winner probability in `[0, 1]` for each row.
    fn predict_probability(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

type EstimatorBuilder = Box<dyn Fn() -> Box<dyn Estimator>>;

/// Registry mapping model identifiers to estimator builders.
///
/// Builders produce a fresh, stateless instance on every call; the evaluator
/// builds one per model per fold so no state crosses fold boundaries.
pub struct EstimatorFactory {
    builders: BTreeMap<String, EstimatorBuilder>,
}

impl std::fmt::Debug for EstimatorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EstimatorFactory")
            .field("model_ids", &self.model_ids())
            .finish()
    }
}

impl Default for EstimatorFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl EstimatorFactory {
    /// Create an empty factory.
    pub const fn new() -> Self {
        Self {
            builders: BTreeMap::new(),
        }
    }

    /// Factory with the standard model set registered.
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register("logreg", || Box::new(LogisticRegression::default()));
        factory.register("gbdt", || Box::new(GradientBoostedTrees::default()));
        factory.register("constant", || Box::new(ConstantProbability::default()));
        factory
    }

    /// Register (or replace) a builder under a model identifier.
    pub fn register<F>(&mut self, model_id: &str, builder: F)
    where
        F: Fn() -> Box<dyn Estimator> + 'static,
    {
        self.builders
            .insert(model_id.to_string(), Box::new(builder));
    }

    /// Build a fresh estimator for a model identifier.
    pub fn build(&self, model_id: &str) -> Result<Box<dyn Estimator>> {
        self.builders
            .get(model_id)
            .map(|builder| builder())
            .ok_or_else(|| EvalError::UnknownModel(model_id.to_string()))
    }

    /// Fail fast if any requested identifier has no registered builder.
    pub fn ensure_registered(&self, model_ids: &[&str]) -> Result<()> {
        for model_id in model_ids {
            if !self.builders.contains_key(*model_id) {
                return Err(EvalError::UnknownModel((*model_id).to_string()));
            }
        }
        Ok(())
    }

    /// Registered model identifiers, sorted.
    pub fn model_ids(&self) -> Vec<&str> {
        self.builders.keys().map(String::as_str).collect()
    }
}
