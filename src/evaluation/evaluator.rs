use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use super::cross_validation::{cross_val_score, RepeatedKFold};
use super::metrics::{EvaluationReport, Scoring};
use super::naming::name;
use super::split::train_test_split;
use crate::data_loading::{check_aligned, FeatureMatrix};
use crate::error::{AnalysisError, Result};
use crate::models::{IModel, ModelKind};
use crate::plot::{compare_plot, viewer_for, PlotMode, PlotViewer};

/// Split and cross-validation settings for [`ModelEvaluator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Fraction of rows held out for the comparison plot.
    pub test_size: f64,
    /// Seed for the train/test shuffle; `None` draws a fresh one every run.
    pub split_seed: Option<u64>,
    pub cv_splits: usize,
    pub cv_repeats: usize,
    /// Seed for the repeated k-fold assignment.
    pub cv_seed: u64,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            split_seed: None,
            cv_splits: 5,
            cv_repeats: 5,
            cv_seed: 1,
        }
    }
}

/// Fits, plots, cross-validates and reports one model at a time.
pub struct ModelEvaluator {
    settings: EvaluationSettings,
    viewer: Box<dyn PlotViewer>,
}

impl ModelEvaluator {
    pub fn new(settings: EvaluationSettings, viewer: Box<dyn PlotViewer>) -> Self {
        Self { settings, viewer }
    }

    /// Runs the whole evaluation and writes the report lines to `out`.
    ///
    /// `model` is fitted on the training split and stays fitted afterwards.
    /// Cross-validation trains fresh copies on the full data.
    pub fn fit_and_test(
        &mut self,
        model: &mut dyn IModel,
        x: &FeatureMatrix,
        y: &[f64],
        out: &mut dyn Write,
    ) -> Result<EvaluationReport> {
        let model_name = name(model);
        let _span = info_span!("fit_and_test", model = %model_name).entered();
        check_aligned(x, y)?;

        let mut report = EvaluationReport::new(model_name.clone());

        let split = train_test_split(x, y, self.settings.test_size, self.settings.split_seed)?;
        model.fit(&split.x_train, &split.y_train)?;
        let y_prediction = model.predict(&split.x_test)?;
        report.test_size = split.y_test.len();
        report.add_holdout_metrics(&split.y_test, &y_prediction);
        info!(
            train = split.y_train.len(),
            test = split.y_test.len(),
            rmse = report.get_metric("rmse"),
            "fitted on training split"
        );

        report.plot_prefix =
            compare_plot(&model_name, &split.y_test, &y_prediction, self.viewer.as_mut())?;

        let cv = RepeatedKFold::new(
            self.settings.cv_splits,
            self.settings.cv_repeats,
            self.settings.cv_seed,
        );
        let folds = cv.split(y.len())?;
        report.cv_scores = cross_val_score(model, x, y, &folds, Scoring::R2)?;
        report.rmse_scores =
            cross_val_score(model, x, y, &folds, Scoring::NegRootMeanSquaredError)?;

        if model.kind() == ModelKind::Lasso {
            let alpha = model.alpha().ok_or_else(|| AnalysisError::UnsupportedParam {
                model: model_name.clone(),
                param: "alpha".to_string(),
            })?;
            report.alpha = Some(alpha);
        }

        for line in report.lines() {
            writeln!(out, "{line}")?;
        }
        info!(
            folds = folds.len(),
            mean_cv = report.mean_cv_score(),
            mean_rmse = report.mean_rmse_score(),
            "cross-validation done"
        );

        Ok(report)
    }
}

/// Evaluates `model` with the default settings, an interactive plot and stdout.
pub fn fit_and_test(
    model: &mut dyn IModel,
    x: &FeatureMatrix,
    y: &[f64],
) -> Result<EvaluationReport> {
    let mut evaluator = ModelEvaluator::new(
        EvaluationSettings::default(),
        viewer_for(PlotMode::Interactive),
    );
    evaluator.fit_and_test(model, x, y, &mut std::io::stdout())
}
