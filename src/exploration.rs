//! Descriptive statistics and correlation ranking for the raw sensor table.
//!
//! Used to pick the predictors: columns with extreme outliers are flagged, and
//! every numeric column is ranked by its Pearson correlation with the target.

use statrs::statistics::Statistics;

use crate::data_loading::Dataset;
use crate::error::{AnalysisError, Result};

/// Multiplier of the interquartile range beyond which a value is an extreme outlier.
pub const EXTREME_OUTLIER_IQR: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub extreme_outliers: bool,
}

/// Percentile with linear interpolation between closest ranks.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let pos = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

pub fn summarize(name: &str, values: &[f64]) -> Result<ColumnSummary> {
    if values.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let min = Statistics::min(values.iter());
    let max = Statistics::max(values.iter());
    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;

    Ok(ColumnSummary {
        name: name.to_string(),
        count: values.len(),
        mean: Statistics::mean(values.iter()),
        std: Statistics::std_dev(values.iter()),
        min,
        q1,
        median: percentile(&sorted, 50.0),
        q3,
        max,
        extreme_outliers: min < q1 - EXTREME_OUTLIER_IQR * iqr
            || max > q3 + EXTREME_OUTLIER_IQR * iqr,
    })
}

/// Summary of every numeric column, in header order.
pub fn describe(dataset: &Dataset) -> Result<Vec<ColumnSummary>> {
    dataset
        .numeric_columns
        .iter()
        .map(|(name, values)| summarize(name, values))
        .collect()
}

/// NaN when either series is empty or constant.
fn pearson_corr(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    if n == 0.0 {
        return f64::NAN;
    }
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }
    let den = (den_x * den_y).sqrt();
    if den == 0.0 {
        f64::NAN
    } else {
        num / den
    }
}

/// Pearson correlation of each numeric column with `target`, ascending.
/// Undefined (NaN) correlations go last.
pub fn correlations_with(dataset: &Dataset, target: &str) -> Result<Vec<(String, f64)>> {
    let target_values =
        dataset
            .numeric_column(target)
            .ok_or_else(|| AnalysisError::MissingColumn {
                column: target.to_string(),
                available: dataset
                    .numeric_columns
                    .iter()
                    .map(|(n, _)| n.clone())
                    .collect(),
            })?;

    let mut ranked: Vec<(String, f64)> = dataset
        .numeric_columns
        .iter()
        .map(|(name, values)| (name.clone(), pearson_corr(values, target_values)))
        .collect();
    ranked.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
        (false, false) => a.1.total_cmp(&b.1),
        (nan_a, nan_b) => nan_a.cmp(&nan_b),
    });
    Ok(ranked)
}

/// Fixed-width table like a pandas `describe().T` with an outlier column.
pub fn format_summary_table(summaries: &[ColumnSummary]) -> Vec<String> {
    let width = summaries
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max(6);
    let mut lines = vec![format!(
        "{:<width$} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}  outliers",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    )];
    for s in summaries {
        lines.push(format!(
            "{:<width$} {:>8} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6}  {}",
            s.name, s.count, s.mean, s.std, s.min, s.q1, s.median, s.q3, s.max, s.extreme_outliers
        ));
    }
    lines
}
