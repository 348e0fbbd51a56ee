use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::lasso::{Lasso, LassoParameters};

use super::{
    check_prediction_input, check_training_input, model_failure, parse_f64, parse_usize,
    unsupported, IModel, ModelKind,
};
use crate::data_loading::FeatureMatrix;
use crate::error::{AnalysisError, Result};

/// L1-regularized linear regression.
pub struct LassoWrapper {
    model: Option<Lasso<f64, f64, DenseMatrix<f64>, Vec<f64>>>,
    alpha: f64,
    max_iter: usize,
    tol: f64,
    n_features: usize,
}

impl LassoWrapper {
    pub fn new() -> Self {
        Self {
            model: None,
            alpha: 1.0,
            max_iter: 1000,
            tol: 1e-4,
            n_features: 0,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }
}

impl Default for LassoWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl IModel for LassoWrapper {
    fn kind(&self) -> ModelKind {
        ModelKind::Lasso
    }

    fn get_param(&self, key: &str) -> Result<String> {
        match key {
            "alpha" => Ok(self.alpha.to_string()),
            "max_iter" => Ok(self.max_iter.to_string()),
            "tol" => Ok(self.tol.to_string()),
            _ => Err(unsupported(self.kind(), key)),
        }
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "alpha" => self.alpha = parse_f64(self.kind(), key, value)?,
            "max_iter" => self.max_iter = parse_usize(self.kind(), key, value)?,
            "tol" => self.tol = parse_f64(self.kind(), key, value)?,
            _ => return Err(unsupported(self.kind(), key)),
        }
        Ok(())
    }

    fn fit(&mut self, x: &FeatureMatrix, y: &[f64]) -> Result<()> {
        check_training_input(self.kind(), x, y)?;

        let params = LassoParameters::default()
            .with_alpha(self.alpha)
            .with_max_iter(self.max_iter)
            .with_tol(self.tol);

        let model = Lasso::fit(&x.to_dense(), &y.to_vec(), params)
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
            alpha: self.alpha,
            max_iter: self.max_iter,
            tol: self.tol,
            n_features: 0,
        })
    }

    fn alpha(&self) -> Option<f64> {
        Some(self.alpha)
    }
}
