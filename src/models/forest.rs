use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::{
    check_prediction_input, check_training_input, invalid, model_failure, parse_usize,
    unsupported, IModel, ModelKind,
};
use crate::data_loading::FeatureMatrix;
use crate::error::{AnalysisError, Result};

/// Random forest regressor.
pub struct ForestWrapper {
    model: Option<RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>>,
    n_trees: usize,
    max_depth: Option<u16>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    seed: u64,
    n_features: usize,
}

impl ForestWrapper {
    pub fn new() -> Self {
        Self {
            model: None,
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 0,
            n_features: 0,
        }
    }

    pub fn with_trees(n_trees: usize, seed: u64) -> Self {
        Self {
            n_trees,
            seed,
            ..Self::new()
        }
    }

    fn parameters(&self) -> RandomForestRegressorParameters {
        RandomForestRegressorParameters {
            max_depth: self.max_depth,
            min_samples_leaf: self.min_samples_leaf,
            min_samples_split: self.min_samples_split,
            n_trees: self.n_trees,
            m: None,
            keep_samples: false,
            seed: self.seed,
        }
    }
}

impl Default for ForestWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl IModel for ForestWrapper {
    fn kind(&self) -> ModelKind {
        ModelKind::RandomForest
    }

    fn get_param(&self, key: &str) -> Result<String> {
        match key {
            "n_trees" => Ok(self.n_trees.to_string()),
            "max_depth" => Ok(self
                .max_depth
                .map(|d| d.to_string())
                .unwrap_or_else(|| "none".to_string())),
            "min_samples_split" => Ok(self.min_samples_split.to_string()),
            "min_samples_leaf" => Ok(self.min_samples_leaf.to_string()),
            "seed" => Ok(self.seed.to_string()),
            _ => Err(unsupported(self.kind(), key)),
        }
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "n_trees" => {
                let n_trees = parse_usize(self.kind(), key, value)?;
                if n_trees == 0 {
                    return Err(invalid(self.kind(), key, value));
                }
                self.n_trees = n_trees;
            }
            "max_depth" => {
                self.max_depth = match value.trim() {
                    "none" | "" => None,
                    depth => Some(depth.parse().map_err(|_| invalid(self.kind(), key, value))?),
                };
            }
            "min_samples_split" => {
                self.min_samples_split = parse_usize(self.kind(), key, value)?
            }
            "min_samples_leaf" => self.min_samples_leaf = parse_usize(self.kind(), key, value)?,
            "seed" => {
                self.seed = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(self.kind(), key, value))?
            }
            _ => return Err(unsupported(self.kind(), key)),
        }
        Ok(())
    }

    fn fit(&mut self, x: &FeatureMatrix, y: &[f64]) -> Result<()> {
        check_training_input(self.kind(), x, y)?;

        let model = RandomForestRegressor::fit(&x.to_dense(), &y.to_vec(), self.parameters())
            .map_err(|e| model_failure(self.kind(), "fit", e))?;
        self.model = Some(model);
        self.n_features = x.n_features();
        Ok(())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| AnalysisError::NotFitted(self.kind().to_string()))?;
        check_prediction_input(self.kind(), self.n_features, x)?;
        model
            .predict(&x.to_dense())
            .map_err(|e| model_failure(self.kind(), "predict", e))
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn fresh(&self) -> Box<dyn IModel> {
        Box::new(Self {
            model: None,
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            seed: self.seed,
            n_features: 0,
        })
    }
}
