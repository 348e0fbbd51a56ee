use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{AnalysisError, Result};

/// Predictors chosen for the water temperature models, in column order.
pub const DEFAULT_FEATURES: [&str; 5] = ["DO_mgL", "NO3_mgNL", "DO_sat", "spCond", "dewPoint"];

/// Which columns of the raw table make up the index, the target and the features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSpec {
    pub index_column: String,
    pub target_column: String,
    pub feature_columns: Vec<String>,
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            index_column: "timestamp".to_string(),
            target_column: "temp".to_string(),
            feature_columns: DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Row-major feature matrix. Every row has the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<Vec<f64>>,
    n_features: usize,
}

impl FeatureMatrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_features = rows.first().map(|r| r.len()).unwrap_or(0);
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != n_features {
                return Err(AnalysisError::RaggedRows {
                    row: idx,
                    got: row.len(),
                    expected: n_features,
                });
            }
        }
        Ok(Self { rows, n_features })
    }

    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn column(&self, j: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[j]).collect()
    }

    /// Rows at `indices`, in the order given.
    pub fn select(&self, indices: &[usize]) -> FeatureMatrix {
        FeatureMatrix {
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            n_features: self.n_features,
        }
    }

    /// Row-major copy for smartcore.
    pub fn to_dense(&self) -> DenseMatrix<f64> {
        let mut flat = Vec::with_capacity(self.rows.len() * self.n_features);
        for row in &self.rows {
            flat.extend_from_slice(row);
        }
        DenseMatrix::new(self.rows.len(), self.n_features, flat, false)
    }
}

/// Values of `y` at `indices`, in the order given.
pub fn select_targets(y: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&i| y[i]).collect()
}

/// Fails unless `x` and `y` describe the same, non-empty set of observations.
pub fn check_aligned(x: &FeatureMatrix, y: &[f64]) -> Result<()> {
    if x.n_samples() != y.len() {
        return Err(AnalysisError::LengthMismatch {
            x_rows: x.n_samples(),
            y_len: y.len(),
        });
    }
    if x.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }
    Ok(())
}

/// Time-indexed observations with the selected features split from the target.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub index: Vec<NaiveDateTime>,
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub x: FeatureMatrix,
    pub y: Vec<f64>,
    /// Every non-index column whose cells all parse as numbers, in header order.
    pub numeric_columns: Vec<(String, Vec<f64>)>,
}

impl Dataset {
    pub fn num_samples(&self) -> usize {
        self.y.len()
    }

    pub fn num_features(&self) -> usize {
        self.x.n_features()
    }

    pub fn numeric_column(&self, name: &str) -> Option<&[f64]> {
        self.numeric_columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// First and last timestamp, if any rows were loaded.
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((*self.index.first()?, *self.index.last()?))
    }
}

/// Strategy for loading a [`Dataset`] from some textual source.
pub trait DataLoader {
    fn get_name(&self) -> &str;

    fn load_from_string(&self, data: &str, spec: &DatasetSpec) -> Result<Dataset>;

    fn validate_format(&self, data: &str) -> Result<()>;

    fn load_from_path(&self, path: &Path, spec: &DatasetSpec) -> Result<Dataset> {
        let text = std::fs::read_to_string(path)?;
        self.load_from_string(&text, spec)
    }
}
