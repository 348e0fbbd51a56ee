use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smartcore::metrics::{mean_absolute_error, mean_squared_error, r2};

/// How a fold's predictions are turned into a single score. Higher is better for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    /// Coefficient of determination, the default score of a regressor.
    R2,
    /// Root mean squared error with the sign flipped.
    NegRootMeanSquaredError,
}

impl Scoring {
    pub fn score(&self, y_true: &[f64], y_pred: &[f64]) -> f64 {
        let y_true_vec: Vec<f64> = y_true.to_vec();
        let y_pred_vec: Vec<f64> = y_pred.to_vec();
        match self {
            Scoring::R2 => r2(&y_true_vec, &y_pred_vec),
            Scoring::NegRootMeanSquaredError => {
                -mean_squared_error(&y_true_vec, &y_pred_vec).sqrt()
            }
        }
    }
}

/// Outcome of one `fit_and_test` run.
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub model_name: String,
    /// Cross-validation scores with the default (R²) scoring, in fold order.
    pub cv_scores: Vec<f64>,
    /// Cross-validation negative RMSE scores, in fold order.
    pub rmse_scores: Vec<f64>,
    /// Configured alpha, reported for Lasso only.
    pub alpha: Option<f64>,
    pub test_size: usize,
    pub plot_prefix: usize,
    /// Hold-out metrics on the test split (r2_score, rmse, mae).
    pub metrics: HashMap<String, f64>,
}

impl EvaluationReport {
    pub fn new(model_name: String) -> Self {
        Self {
            model_name,
            cv_scores: Vec::new(),
            rmse_scores: Vec::new(),
            alpha: None,
            test_size: 0,
            plot_prefix: 0,
            metrics: HashMap::new(),
        }
    }

    pub fn add_metric(&mut self, name: String, value: f64) {
        self.metrics.insert(name, value);
    }

    pub fn get_metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// Records r2, rmse and mae of the hold-out predictions.
    pub fn add_holdout_metrics(&mut self, y_true: &[f64], y_pred: &[f64]) {
        let y_true_vec: Vec<f64> = y_true.to_vec();
        let y_pred_vec: Vec<f64> = y_pred.to_vec();
        let mse = mean_squared_error(&y_true_vec, &y_pred_vec);
        self.add_metric("r2_score".to_string(), r2(&y_true_vec, &y_pred_vec));
        self.add_metric("rmse".to_string(), mse.sqrt());
        self.add_metric(
            "mae".to_string(),
            mean_absolute_error(&y_true_vec, &y_pred_vec),
        );
    }

    pub fn mean_cv_score(&self) -> f64 {
        mean(&self.cv_scores)
    }

    /// Mean of the negative RMSE scores; more negative is worse.
    pub fn mean_rmse_score(&self) -> f64 {
        mean(&self.rmse_scores)
    }

    /// Console report lines, in print order.
    pub fn lines(&self) -> Vec<String> {
        let name = &self.model_name;
        let mut lines = Vec::with_capacity(5);
        if let Some(alpha) = self.alpha {
            lines.push(format!("{name} alpha: {alpha}"));
        }
        lines.push(format!("{name} CV scores: {}", format_scores(&self.cv_scores)));
        lines.push(format!("{name} mean CV score: {}", self.mean_cv_score()));
        lines.push(format!("{name} RMSE score: {}", format_scores(&self.rmse_scores)));
        lines.push(format!("{name} mean RMSE score: {}", self.mean_rmse_score()));
        lines
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Bracketed, space separated sequence: `[0.97514021 0.96820183]`.
pub fn format_scores(scores: &[f64]) -> String {
    let body: Vec<String> = scores.iter().map(|s| format!("{s:.8}")).collect();
    format!("[{}]", body.join(" "))
}
