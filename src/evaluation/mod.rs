pub mod cross_validation;
pub mod evaluator;
pub mod metrics;
pub mod naming;
pub mod split;

pub use cross_validation::{cross_val_score, Fold, KFold, RepeatedKFold};
pub use evaluator::{fit_and_test, EvaluationSettings, ModelEvaluator};
pub use metrics::{format_scores, EvaluationReport, Scoring};
pub use naming::{derive_label, name};
pub use split::{test_count, train_test_split, TrainTestSplit};
