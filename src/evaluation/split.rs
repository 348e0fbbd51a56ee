use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data_loading::{check_aligned, select_targets, FeatureMatrix};
use crate::error::{AnalysisError, Result};

/// Seeded generator, or an entropy-seeded one when no seed is given.
pub(crate) fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: FeatureMatrix,
    pub x_test: FeatureMatrix,
    pub y_train: Vec<f64>,
    pub y_test: Vec<f64>,
}

/// Number of test rows for a fractional test size: `ceil(test_size * n)`.
pub fn test_count(n: usize, test_size: f64) -> usize {
    (test_size * n as f64).ceil() as usize
}

/// Random train/test partition. Rows are shuffled, the first `ceil(test_size * n)`
/// of the permutation become the test set.
pub fn train_test_split(
    x: &FeatureMatrix,
    y: &[f64],
    test_size: f64,
    seed: Option<u64>,
) -> Result<TrainTestSplit> {
    check_aligned(x, y)?;
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(AnalysisError::InvalidParam {
            model: "train/test split".to_string(),
            param: "test_size".to_string(),
            value: test_size.to_string(),
        });
    }

    let n = y.len();
    let n_test = test_count(n, test_size);
    if n_test >= n {
        return Err(AnalysisError::InsufficientData {
            stage: "train/test split",
            required: n_test + 1,
            got: n,
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng_from(seed));
    let (test_idx, train_idx) = indices.split_at(n_test);

    Ok(TrainTestSplit {
        x_train: x.select(train_idx),
        x_test: x.select(test_idx),
        y_train: select_targets(y, train_idx),
        y_test: select_targets(y, test_idx),
    })
}
