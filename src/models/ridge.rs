use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::ridge_regression::{
    RidgeRegression, RidgeRegressionParameters, RidgeRegressionSolverName,
};

use super::{
    check_prediction_input, check_training_input, model_failure, parse_f64, unsupported, IModel,
    ModelKind,
};
use crate::data_loading::FeatureMatrix;
use crate::error::{AnalysisError, Result};

/// L2-regularized linear regression.
pub struct RidgeWrapper {
    model: Option<RidgeRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>>,
    alpha: f64,
    n_features: usize,
}

impl RidgeWrapper {
    pub fn new() -> Self {
        Self {
            model: None,
            alpha: 1.0,
            n_features: 0,
        }
    }

    pub fn with_alpha(alpha: f64) -> Self {
        Self {
            alpha,
            ..Self::new()
        }
    }
}

impl Default for RidgeWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl IModel for RidgeWrapper {
    fn kind(&self) -> ModelKind {
        ModelKind::Ridge
    }

    fn get_param(&self, key: &str) -> Result<String> {
        match key {
            "alpha" => Ok(self.alpha.to_string()),
            _ => Err(unsupported(self.kind(), key)),
        }
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "alpha" => {
                self.alpha = parse_f64(self.kind(), key, value)?;
                Ok(())
            }
            _ => Err(unsupported(self.kind(), key)),
        }
    }

    fn fit(&mut self, x: &FeatureMatrix, y: &[f64]) -> Result<()> {
        check_training_input(self.kind(), x, y)?;

        let params = RidgeRegressionParameters {
            alpha: self.alpha,
            normalize: true,
            solver: RidgeRegressionSolverName::Cholesky,
        };

        let model = RidgeRegression::fit(&x.to_dense(), &y.to_vec(), params)
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
        Box::new(Self::with_alpha(self.alpha))
    }

    fn alpha(&self) -> Option<f64> {
        Some(self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::linear_data;

    #[test]
    fn ridge_fits_and_predicts() {
        let (x, y) = linear_data(50);
        let mut model = RidgeWrapper::with_alpha(0.5);
        model.fit(&x, &y).unwrap();
        let predicted = model.predict(&x).unwrap();
        assert!(predicted.iter().all(|p| p.is_finite()));
        assert_eq!(model.get_param("alpha").unwrap(), "0.5");
    }

    #[test]
    fn mismatched_target_is_rejected_before_fitting() {
        let (x, mut y) = linear_data(20);
        y.pop();
        assert!(matches!(
            RidgeWrapper::new().fit(&x, &y),
            Err(AnalysisError::LengthMismatch { x_rows: 20, y_len: 19 })
        ));
    }
}
