use std::fmt;

use crate::data_loading::FeatureMatrix;
use crate::error::{AnalysisError, Result};

/// Closed set of regressors used by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    LinearRegression,
    Lasso,
    Ridge,
    RandomForest,
}

impl ModelKind {
    /// Type name the display label is derived from.
    pub fn type_name(&self) -> &'static str {
        match self {
            ModelKind::LinearRegression => "LinearRegression",
            ModelKind::Lasso => "Lasso",
            ModelKind::Ridge => "Ridge",
            ModelKind::RandomForest => "RandomForestRegressor",
        }
    }

    /// Whether the family is parameterized by a single regularization strength.
    pub fn is_regularized(&self) -> bool {
        matches!(self, ModelKind::Lasso | ModelKind::Ridge)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Common interface over the smartcore regressors.
///
/// A wrapper holds its hyperparameters and, once fitted, the trained
/// smartcore model. `fresh` hands out an unfitted copy with the same
/// hyperparameters, which is what cross-validation trains on each fold.
pub trait IModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    fn fit(&mut self, x: &FeatureMatrix, y: &[f64]) -> Result<()>;

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<f64>>;

    fn is_fitted(&self) -> bool;

    fn get_param(&self, key: &str) -> Result<String>;

    fn set_param(&mut self, key: &str, value: &str) -> Result<()>;

    fn fresh(&self) -> Box<dyn IModel>;

    /// Regularization strength, for the families that have one.
    fn alpha(&self) -> Option<f64> {
        None
    }
}

pub mod factory;
pub mod forest;
pub mod lasso;
pub mod linreg;
pub mod ridge;

pub use factory::ModelFactory;
pub use forest::ForestWrapper;
pub use lasso::LassoWrapper;
pub use linreg::LinRegWrapper;
pub use ridge::RidgeWrapper;

pub(crate) fn model_failure(
    kind: ModelKind,
    stage: &'static str,
    err: impl fmt::Display,
) -> AnalysisError {
    AnalysisError::ModelFailure {
        model: kind.to_string(),
        stage,
        message: err.to_string(),
    }
}

pub(crate) fn unsupported(kind: ModelKind, param: &str) -> AnalysisError {
    AnalysisError::UnsupportedParam {
        model: kind.to_string(),
        param: param.to_string(),
    }
}

pub(crate) fn invalid(kind: ModelKind, param: &str, value: &str) -> AnalysisError {
    AnalysisError::InvalidParam {
        model: kind.to_string(),
        param: param.to_string(),
        value: value.to_string(),
    }
}

/// Rejects empty or misaligned training data before it reaches smartcore.
pub(crate) fn check_training_input(kind: ModelKind, x: &FeatureMatrix, y: &[f64]) -> Result<()> {
    if x.n_samples() != y.len() {
        return Err(AnalysisError::LengthMismatch {
            x_rows: x.n_samples(),
            y_len: y.len(),
        });
    }
    if x.is_empty() || x.n_features() == 0 {
        return Err(model_failure(kind, "fit", "no training samples or features"));
    }
    Ok(())
}

/// Prediction input must have the width the model was trained on.
pub(crate) fn check_prediction_input(
    kind: ModelKind,
    trained_features: usize,
    x: &FeatureMatrix,
) -> Result<()> {
    if x.n_features() != trained_features {
        return Err(model_failure(
            kind,
            "predict",
            format!(
                "expected {} features, got {}",
                trained_features,
                x.n_features()
            ),
        ));
    }
    Ok(())
}

pub(crate) fn parse_f64(kind: ModelKind, key: &str, value: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| invalid(kind, key, value))
}

pub(crate) fn parse_usize(kind: ModelKind, key: &str, value: &str) -> Result<usize> {
    value.trim().parse::<usize>().map_err(|_| invalid(kind, key, value))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::data_loading::FeatureMatrix;

    /// Noise-free linear target over five features: y = 3 + sum((j + 1) * x_j).
    pub fn linear_data(n: usize) -> (FeatureMatrix, Vec<f64>) {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..5)
                    .map(|j| {
                        let freq = 0.31 + 0.17 * j as f64;
                        ((i as f64 + 1.0) * freq).sin() * 4.0 + 2.0 * j as f64
                    })
                    .collect()
            })
            .collect();
        let y = rows
            .iter()
            .map(|r| 3.0 + r.iter().enumerate().map(|(j, v)| (j + 1) as f64 * v).sum::<f64>())
            .collect();
        (FeatureMatrix::from_rows(rows).unwrap(), y)
    }
}
