use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::data_loading::DatasetSpec;
use crate::error::Result;
use crate::evaluation::EvaluationSettings;
use crate::plot::PlotMode;
use crate::tuning::TunerConfig;

pub const CONFIG_FILE: &str = "wade.toml";
pub const ENV_PREFIX: &str = "WADE__";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub data: DataConfig,
    pub evaluation: EvaluationSettings,
    pub tuning: TunerConfig,
    pub plot: PlotConfig,
    pub models: ModelsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: PathBuf,
    #[serde(flatten)]
    pub dataset: DatasetSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub mode: PlotMode,
}

/// Hyperparameters of the model templates the suites start from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub lasso_max_iter: usize,
    pub forest_trees: usize,
    pub forest_seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            evaluation: EvaluationSettings::default(),
            tuning: TunerConfig::default(),
            plot: PlotConfig::default(),
            models: ModelsConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/wade.csv"),
            dataset: DatasetSpec::default(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            lasso_max_iter: 5000,
            forest_trees: 10,
            forest_seed: 0,
        }
    }
}

impl AnalysisConfig {
    /// Defaults, then `wade.toml` in the working directory, then `WADE__*`
    /// environment variables (`WADE__PLOT__MODE=none`).
    pub fn load() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AnalysisConfig::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = AnalysisConfig::load().unwrap();
            assert_eq!(config, AnalysisConfig::default());
            assert_eq!(config.data.dataset.target_column, "temp");
            assert_eq!(config.models.lasso_max_iter, 5000);
            assert_eq!(config.plot.mode, PlotMode::Interactive);
            Ok(())
        });
    }

    #[test]
    fn file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [data]
                path = "sensors.csv"
                feature_columns = ["DO_mgL", "spCond"]

                [evaluation]
                split_seed = 7
                cv_repeats = 2
                "#,
            )?;
            let config = AnalysisConfig::load().unwrap();
            assert_eq!(config.data.path, PathBuf::from("sensors.csv"));
            assert_eq!(config.data.dataset.feature_columns, vec!["DO_mgL", "spCond"]);
            assert_eq!(config.data.dataset.index_column, "timestamp");
            assert_eq!(config.evaluation.split_seed, Some(7));
            assert_eq!(config.evaluation.cv_repeats, 2);
            assert_eq!(config.evaluation.cv_splits, 5);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, "[plot]\nmode = \"interactive\"\n")?;
            jail.set_env("WADE__PLOT__MODE", "none");
            jail.set_env("WADE__TUNING__KEEP_FAMILY", "true");
            let config = AnalysisConfig::load().unwrap();
            assert_eq!(config.plot.mode, PlotMode::None);
            assert!(config.tuning.keep_family);
            Ok(())
        });
    }

    #[test]
    fn bad_value_is_a_config_error() {
        Jail::expect_with(|jail| {
            jail.set_env("WADE__EVALUATION__CV_SPLITS", "many");
            let err = AnalysisConfig::load().unwrap_err();
            assert!(matches!(err, crate::error::AnalysisError::Config(_)));
            Ok(())
        });
    }
}
