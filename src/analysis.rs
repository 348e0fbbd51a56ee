//! The model suites and the exploration run shared by the binaries.

use std::io::Write;

use tracing::info;

use crate::config::AnalysisConfig;
use crate::data_loading::{CsvDataLoader, DataLoader, Dataset};
use crate::error::Result;
use crate::evaluation::{EvaluationReport, ModelEvaluator};
use crate::exploration::{correlations_with, describe, format_summary_table};
use crate::models::{ForestWrapper, LassoWrapper, LinRegWrapper, RidgeWrapper};
use crate::plot::viewer_for;
use crate::tuning::Tuner;

pub const RIDGE_SEPARATOR: &str =
    "***************** Everything below here is Ridge *****************";

pub fn load_dataset(config: &AnalysisConfig) -> Result<Dataset> {
    let loader = CsvDataLoader::new();
    let dataset = loader.load_from_path(&config.data.path, &config.data.dataset)?;
    info!(
        path = %config.data.path.display(),
        loader = loader.get_name(),
        samples = dataset.num_samples(),
        features = dataset.num_features(),
        "dataset loaded"
    );
    if let Some((start, end)) = dataset.time_range() {
        info!(%start, %end, "time range");
    }
    Ok(dataset)
}

fn evaluator(config: &AnalysisConfig) -> ModelEvaluator {
    ModelEvaluator::new(config.evaluation.clone(), viewer_for(config.plot.mode))
}

/// Linear Regression, then the tuned Lasso, then the tuned Ridge.
pub fn run_linear_suite(
    config: &AnalysisConfig,
    dataset: &Dataset,
    out: &mut dyn Write,
) -> Result<Vec<EvaluationReport>> {
    let (x, y) = (&dataset.x, dataset.y.as_slice());
    let mut evaluator = evaluator(config);
    let tuner = Tuner::new(config.tuning.clone());
    let mut reports = Vec::with_capacity(3);

    let mut linear = LinRegWrapper::new();
    reports.push(evaluator.fit_and_test(&mut linear, x, y, out)?);

    let lasso = LassoWrapper::new().with_max_iter(config.models.lasso_max_iter);
    let mut tuned = tuner.tune(&lasso, x, y)?;
    reports.push(evaluator.fit_and_test(tuned.as_mut(), x, y, out)?);

    writeln!(out, "{RIDGE_SEPARATOR}")?;

    let ridge = RidgeWrapper::new();
    let mut tuned = tuner.tune(&ridge, x, y)?;
    reports.push(evaluator.fit_and_test(tuned.as_mut(), x, y, out)?);

    Ok(reports)
}

pub fn run_forest_suite(
    config: &AnalysisConfig,
    dataset: &Dataset,
    out: &mut dyn Write,
) -> Result<EvaluationReport> {
    let mut forest = ForestWrapper::with_trees(config.models.forest_trees, config.models.forest_seed);
    evaluator(config).fit_and_test(&mut forest, &dataset.x, &dataset.y, out)
}

/// Prints the column summary table followed by the target correlations.
pub fn run_exploration(dataset: &Dataset, out: &mut dyn Write) -> Result<()> {
    let summaries = describe(dataset)?;
    for line in format_summary_table(&summaries) {
        writeln!(out, "{line}")?;
    }
    let flagged: Vec<&str> = summaries
        .iter()
        .filter(|s| s.extreme_outliers)
        .map(|s| s.name.as_str())
        .collect();
    info!(columns = ?flagged, "columns with extreme outliers");

    writeln!(out)?;
    writeln!(out, "Correlation with {}:", dataset.target_name)?;
    for (column, corr) in correlations_with(dataset, &dataset.target_name)? {
        writeln!(out, "{column:<12} {corr:>10.6}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_loading::DatasetSpec;
    use crate::plot::PlotMode;

    fn synthetic() -> Dataset {
        let spec = DatasetSpec::default();
        let mut text = format!(
            "{},{},{}\n",
            spec.index_column,
            spec.target_column,
            spec.feature_columns.join(",")
        );
        for i in 0..60 {
            let f: Vec<f64> = (0..5)
                .map(|j| ((i * (j + 2)) as f64 * 0.37).sin() + j as f64)
                .collect();
            let temp = 4.0 + f.iter().enumerate().map(|(j, v)| (j + 1) as f64 * v).sum::<f64>();
            let cells: Vec<String> = f.iter().map(|v| v.to_string()).collect();
            text.push_str(&format!(
                "2017-10-{:02} {:02}:00:00,{},{}\n",
                1 + i / 24,
                i % 24,
                temp,
                cells.join(",")
            ));
        }
        CsvDataLoader::new().load_from_string(&text, &spec).unwrap()
    }

    fn headless_config() -> AnalysisConfig {
        let mut config = AnalysisConfig::default();
        config.plot.mode = PlotMode::None;
        config.evaluation.split_seed = Some(5);
        config.evaluation.cv_repeats = 1;
        config
    }

    #[test]
    fn linear_suite_prints_separator_before_ridge() {
        let mut out = Vec::new();
        let reports = run_linear_suite(&headless_config(), &synthetic(), &mut out).unwrap();
        let names: Vec<&str> = reports.iter().map(|r| r.model_name.as_str()).collect();
        assert_eq!(names, ["Linear Regression", "Lasso", "Lasso"]);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // 4 + 5 report lines, separator, 5 report lines
        assert_eq!(lines.len(), 15);
        assert_eq!(lines[9], RIDGE_SEPARATOR);
        assert!(lines[10].starts_with("Lasso alpha: "));
    }

    #[test]
    fn forest_suite_uses_configured_trees() {
        let mut config = headless_config();
        config.models.forest_trees = 3;
        let mut out = Vec::new();
        let report = run_forest_suite(&config, &synthetic(), &mut out).unwrap();
        assert_eq!(report.model_name, "Random Forest Regressor");
        assert_eq!(report.cv_scores.len(), 5);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 4);
    }

    #[test]
    fn exploration_lists_every_numeric_column() {
        let dataset = synthetic();
        let mut out = Vec::new();
        run_exploration(&dataset, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Correlation with temp:"));
        for column in &dataset.feature_names {
            assert_eq!(
                text.lines().filter(|l| l.starts_with(column.as_str())).count(),
                2
            );
        }
        assert!(text.trim_end().lines().last().unwrap().starts_with("temp"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut config = AnalysisConfig::default();
        config.data.path = "does/not/exist.csv".into();
        assert!(matches!(
            load_dataset(&config),
            Err(crate::error::AnalysisError::Io(_))
        ));
    }
}
