use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::data_loading::{check_aligned, FeatureMatrix};
use crate::error::{AnalysisError, Result};
use crate::evaluation::{cross_val_score, KFold, Scoring};
use crate::models::{IModel, ModelFactory, ModelKind};

/// Alpha candidates `0.01, 0.02, ..., 0.99`.
pub fn alpha_grid() -> Vec<f64> {
    (1..100).map(|i| i as f64 / 100.0).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerConfig {
    /// Folds used to score each candidate. Folds are contiguous, not shuffled.
    pub cv_folds: usize,
    /// Return the template's own family instead of always returning a Lasso.
    pub keep_family: bool,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            cv_folds: 5,
            keep_family: false,
        }
    }
}

/// Mean cross-validation score of every alpha, plus the winner.
#[derive(Debug, Clone)]
pub struct GridSearchResult {
    pub best_alpha: f64,
    pub best_score: f64,
    pub scores: Vec<(f64, f64)>,
}

/// Grid search over the regularization strength of a Lasso or Ridge template.
pub struct Tuner {
    config: TunerConfig,
}

impl Tuner {
    pub fn new(config: TunerConfig) -> Self {
        Self { config }
    }

    /// Scores every alpha in [`alpha_grid`] with k-fold R². The highest mean
    /// wins; on ties the smaller alpha is kept.
    pub fn grid_search(
        &self,
        template: &dyn IModel,
        x: &FeatureMatrix,
        y: &[f64],
    ) -> Result<GridSearchResult> {
        if !template.kind().is_regularized() {
            return Err(AnalysisError::UnsupportedParam {
                model: template.kind().to_string(),
                param: "alpha".to_string(),
            });
        }
        check_aligned(x, y)?;
        let folds = KFold::new(self.config.cv_folds).split(y.len())?;

        let scores: Vec<(f64, f64)> = alpha_grid()
            .into_par_iter()
            .map(|alpha| -> Result<(f64, f64)> {
                let mut candidate = template.fresh();
                candidate.set_param("alpha", &alpha.to_string())?;
                let fold_scores = cross_val_score(candidate.as_ref(), x, y, &folds, Scoring::R2)?;
                let mean = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
                Ok((alpha, mean))
            })
            .collect::<Result<_>>()?;

        let mut best = scores[0];
        for &(alpha, score) in &scores[1..] {
            if score > best.1 || (best.1.is_nan() && !score.is_nan()) {
                best = (alpha, score);
            }
        }

        Ok(GridSearchResult {
            best_alpha: best.0,
            best_score: best.1,
            scores,
        })
    }

    /// Returns a new, unfitted model configured with the best alpha.
    ///
    /// Unless `keep_family` is set the result is always a Lasso with default
    /// settings apart from alpha, whatever family the template was.
    pub fn tune(
        &self,
        template: &dyn IModel,
        x: &FeatureMatrix,
        y: &[f64],
    ) -> Result<Box<dyn IModel>> {
        let search = self.grid_search(template, x, y)?;
        info!(
            template = %template.kind(),
            alpha = search.best_alpha,
            score = search.best_score,
            "grid search done"
        );

        let mut tuned = if self.config.keep_family {
            template.fresh()
        } else {
            if template.kind() != ModelKind::Lasso {
                warn!(template = %template.kind(), "tuned model is returned as Lasso");
            }
            ModelFactory::create_kind(ModelKind::Lasso)
        };
        tuned.set_param("alpha", &search.best_alpha.to_string())?;
        Ok(tuned)
    }
}

impl Default for Tuner {
    fn default() -> Self {
        Self::new(TunerConfig::default())
    }
}

/// [`Tuner::tune`] with the default configuration.
pub fn tune(template: &dyn IModel, x: &FeatureMatrix, y: &[f64]) -> Result<Box<dyn IModel>> {
    Tuner::default().tune(template, x, y)
}
