use rand::seq::SliceRandom;
use rayon::prelude::*;

use super::metrics::Scoring;
use super::split::rng_from;
use crate::data_loading::{check_aligned, select_targets, FeatureMatrix};
use crate::error::{AnalysisError, Result};
use crate::models::IModel;

/// Train and test row indices of one fold, both ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// K-Fold cross-validator.
///
/// Without shuffling the test folds are contiguous blocks. The first
/// `n % n_splits` folds get one extra row.
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: Option<u64>,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            seed: None,
        }
    }

    pub fn with_shuffle(mut self, seed: Option<u64>) -> Self {
        self.shuffle = true;
        self.seed = seed;
        self
    }

    pub fn split(&self, n_samples: usize) -> Result<Vec<Fold>> {
        self.check(n_samples)?;
        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            indices.shuffle(&mut rng_from(self.seed));
        }
        Ok(folds_from_order(&indices, self.n_splits))
    }

    fn check(&self, n_samples: usize) -> Result<()> {
        if self.n_splits < 2 {
            return Err(AnalysisError::InvalidParam {
                model: "k-fold".to_string(),
                param: "n_splits".to_string(),
                value: self.n_splits.to_string(),
            });
        }
        if n_samples < self.n_splits {
            return Err(AnalysisError::InsufficientData {
                stage: "k-fold cross-validation",
                required: self.n_splits,
                got: n_samples,
            });
        }
        Ok(())
    }
}

/// K-Fold repeated `n_repeats` times, reshuffling before each repetition.
/// One generator seeded with `seed` drives all repetitions, so the fold
/// assignment is fixed for a given seed.
#[derive(Debug, Clone)]
pub struct RepeatedKFold {
    n_splits: usize,
    n_repeats: usize,
    seed: u64,
}

impl RepeatedKFold {
    pub fn new(n_splits: usize, n_repeats: usize, seed: u64) -> Self {
        Self {
            n_splits,
            n_repeats,
            seed,
        }
    }

    pub fn total_folds(&self) -> usize {
        self.n_splits * self.n_repeats
    }

    pub fn split(&self, n_samples: usize) -> Result<Vec<Fold>> {
        KFold::new(self.n_splits).check(n_samples)?;
        let mut rng = rng_from(Some(self.seed));
        let mut folds = Vec::with_capacity(self.total_folds());
        for _ in 0..self.n_repeats {
            let mut indices: Vec<usize> = (0..n_samples).collect();
            indices.shuffle(&mut rng);
            folds.extend(folds_from_order(&indices, self.n_splits));
        }
        Ok(folds)
    }
}

fn folds_from_order(order: &[usize], n_splits: usize) -> Vec<Fold> {
    let n = order.len();
    let base = n / n_splits;
    let extra = n % n_splits;

    let mut folds = Vec::with_capacity(n_splits);
    let mut start = 0;
    for i in 0..n_splits {
        let size = base + usize::from(i < extra);
        let mut test: Vec<usize> = order[start..start + size].to_vec();
        test.sort_unstable();

        let mut in_test = vec![false; n];
        for &t in &test {
            in_test[t] = true;
        }
        let train = (0..n).filter(|&i| !in_test[i]).collect();

        folds.push(Fold { train, test });
        start += size;
    }
    folds
}

/// Scores a fresh copy of `model` on every fold. Folds run in parallel; the
/// returned scores follow fold order.
pub fn cross_val_score(
    model: &dyn IModel,
    x: &FeatureMatrix,
    y: &[f64],
    folds: &[Fold],
    scoring: Scoring,
) -> Result<Vec<f64>> {
    check_aligned(x, y)?;
    folds
        .par_iter()
        .map(|fold| -> Result<f64> {
            let mut fold_model = model.fresh();
            fold_model.fit(&x.select(&fold.train), &select_targets(y, &fold.train))?;
            let predicted = fold_model.predict(&x.select(&fold.test))?;
            Ok(scoring.score(&select_targets(y, &fold.test), &predicted))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::linear_data;
    use crate::models::LinRegWrapper;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn unshuffled_folds_are_contiguous() {
        let folds = KFold::new(3).split(7).unwrap();
        assert_eq!(folds[0].test, vec![0, 1, 2]);
        assert_eq!(folds[1].test, vec![3, 4]);
        assert_eq!(folds[2].test, vec![5, 6]);
        assert_eq!(folds[1].train, vec![0, 1, 2, 5, 6]);
    }

    #[test]
    fn repeated_kfold_yields_all_folds_and_is_seeded() {
        let cv = RepeatedKFold::new(5, 5, 1);
        let a = cv.split(100).unwrap();
        let b = cv.split(100).unwrap();
        assert_eq!(a.len(), 25);
        assert_eq!(a, b);
        // Repetitions reshuffle.
        assert_ne!(a[0].test, a[5].test);
    }

    #[test]
    fn too_few_samples_for_folds() {
        assert!(matches!(
            KFold::new(5).split(4),
            Err(AnalysisError::InsufficientData { required: 5, got: 4, .. })
        ));
        assert!(KFold::new(1).split(10).is_err());
    }

    #[test]
    fn linear_model_scores_near_perfect_on_linear_data() {
        let (x, y) = linear_data(60);
        let folds = KFold::new(5).split(60).unwrap();
        let scores =
            cross_val_score(&LinRegWrapper::new(), &x, &y, &folds, Scoring::R2).unwrap();
        assert_eq!(scores.len(), 5);
        for s in scores {
            assert_abs_diff_eq!(s, 1.0, epsilon = 1e-6);
        }
    }

    proptest! {
        #[test]
        fn prop_every_row_is_tested_once_per_repeat(
            n in 5usize..200,
            k in 2usize..6,
            seed in any::<u64>(),
        ) {
            let folds = KFold::new(k).with_shuffle(Some(seed)).split(n).unwrap();
            let mut seen = vec![0usize; n];
            for fold in &folds {
                prop_assert_eq!(fold.train.len() + fold.test.len(), n);
                for &t in &fold.test {
                    seen[t] += 1;
                }
            }
            prop_assert!(seen.iter().all(|&c| c == 1));
            let sizes: Vec<usize> = folds.iter().map(|f| f.test.len()).collect();
            let max = *sizes.iter().max().unwrap();
            let min = *sizes.iter().min().unwrap();
            prop_assert!(max - min <= 1);
        }
    }
}
