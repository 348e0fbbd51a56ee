use std::panic::{self, AssertUnwindSafe};

use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};

use super::{
    check_prediction_input, check_training_input, invalid, model_failure, unsupported, IModel,
    ModelKind,
};
use crate::data_loading::FeatureMatrix;
use crate::error::{AnalysisError, Result};

/// Ordinary least squares.
pub struct LinRegWrapper {
    pub(crate) model: Option<LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>>,
    solver: String,
    n_features: usize,
}

impl LinRegWrapper {
    pub fn new() -> Self {
        Self {
            model: None,
            solver: "qr".to_string(),
            n_features: 0,
        }
    }
}

/// Least squares with an intercept needs `[X | 1]` to have full column rank:
/// more rows than features and no constant feature.
fn check_full_rank(kind: ModelKind, x: &FeatureMatrix) -> Result<()> {
    if x.n_samples() <= x.n_features() {
        return Err(model_failure(
            kind,
            "fit",
            format!(
                "{} samples cannot determine {} coefficients and an intercept",
                x.n_samples(),
                x.n_features()
            ),
        ));
    }
    for j in 0..x.n_features() {
        let column = x.column(j);
        if column.iter().all(|v| *v == column[0]) {
            return Err(model_failure(
                kind,
                "fit",
                format!("feature {j} is constant ({})", column[0]),
            ));
        }
    }
    Ok(())
}

impl Default for LinRegWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl IModel for LinRegWrapper {
    fn kind(&self) -> ModelKind {
        ModelKind::LinearRegression
    }

    fn get_param(&self, key: &str) -> Result<String> {
        match key {
            "solver" => Ok(self.solver.clone()),
            _ => Err(unsupported(self.kind(), key)),
        }
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "solver" => {
                if value == "qr" || value == "svd" {
                    self.solver = value.to_string();
                    Ok(())
                } else {
                    Err(invalid(self.kind(), key, value))
                }
            }
            _ => Err(unsupported(self.kind(), key)),
        }
    }

    fn fit(&mut self, x: &FeatureMatrix, y: &[f64]) -> Result<()> {
        check_training_input(self.kind(), x, y)?;
        check_full_rank(self.kind(), x)?;

        let mut params = LinearRegressionParameters::default();
        params.solver = match self.solver.as_str() {
            "svd" => LinearRegressionSolverName::SVD,
            _ => LinearRegressionSolverName::QR,
        };

        // smartcore's QR solver panics on collinear columns
        let (x_dense, y_vec) = (x.to_dense(), y.to_vec());
        let model = panic::catch_unwind(AssertUnwindSafe(|| {
            LinearRegression::fit(&x_dense, &y_vec, params)
        }))
        .map_err(|_| model_failure(self.kind(), "fit", "matrix is rank deficient"))?
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
            solver: self.solver.clone(),
            n_features: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::linear_data;
    use approx::assert_abs_diff_eq;

    #[test]
    fn recovers_noise_free_linear_target() {
        let (x, y) = linear_data(60);
        let mut model = LinRegWrapper::new();
        model.fit(&x, &y).unwrap();
        let predicted = model.predict(&x).unwrap();
        for (p, t) in predicted.iter().zip(&y) {
            assert_abs_diff_eq!(*p, *t, epsilon = 1e-6);
        }
    }

    #[test]
    fn predicting_before_fit_fails() {
        let (x, _) = linear_data(10);
        assert!(matches!(
            LinRegWrapper::new().predict(&x),
            Err(AnalysisError::NotFitted(_))
        ));
    }

    #[test]
    fn wrong_feature_count_is_a_model_failure() {
        let (x, y) = linear_data(30);
        let mut model = LinRegWrapper::new();
        model.fit(&x, &y).unwrap();
        let narrow = FeatureMatrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        assert!(matches!(
            model.predict(&narrow),
            Err(AnalysisError::ModelFailure { stage: "predict", .. })
        ));
    }

    #[test]
    fn all_zero_feature_is_a_model_failure() {
        let (x, y) = linear_data(100);
        let rows = x
            .rows()
            .iter()
            .map(|r| {
                let mut r = r.clone();
                r[2] = 0.0;
                r
            })
            .collect();
        let x = FeatureMatrix::from_rows(rows).unwrap();
        let mut model = LinRegWrapper::new();
        assert!(matches!(
            model.fit(&x, &y),
            Err(AnalysisError::ModelFailure { stage: "fit", .. })
        ));
        assert!(!model.is_fitted());
    }

    #[test]
    fn fewer_rows_than_coefficients_is_a_model_failure() {
        let (x, y) = linear_data(4);
        assert!(matches!(
            LinRegWrapper::new().fit(&x, &y),
            Err(AnalysisError::ModelFailure { stage: "fit", .. })
        ));
        let (x, y) = linear_data(5);
        assert!(LinRegWrapper::new().fit(&x, &y).is_err());
    }

    #[test]
    fn solver_param_is_validated() {
        let mut model = LinRegWrapper::new();
        model.set_param("solver", "svd").unwrap();
        assert_eq!(model.get_param("solver").unwrap(), "svd");
        assert!(model.set_param("solver", "lbfgs").is_err());
        assert!(matches!(
            model.get_param("alpha"),
            Err(AnalysisError::UnsupportedParam { .. })
        ));
        assert_eq!(model.alpha(), None);
    }
}
