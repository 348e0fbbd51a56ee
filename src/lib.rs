pub mod analysis;
pub mod config;
pub mod data_loading;
pub mod error;
pub mod evaluation;
pub mod exploration;
pub mod models;
pub mod plot;
pub mod telemetry;
pub mod tuning;

pub use config::AnalysisConfig;
pub use data_loading::{CsvDataLoader, DataLoader, Dataset, DatasetSpec, FeatureMatrix};
pub use error::{AnalysisError, Result};
pub use evaluation::{fit_and_test, name, EvaluationReport, EvaluationSettings, ModelEvaluator};
pub use models::{
    ForestWrapper, IModel, LassoWrapper, LinRegWrapper, ModelFactory, ModelKind, RidgeWrapper,
};
pub use plot::{compare_plot, HeadlessViewer, PlotMode, PlotViewer};
pub use tuning::{tune, Tuner, TunerConfig};
