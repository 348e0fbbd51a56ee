//! Random forest on the water temperature data.

use anyhow::{Context, Result};

use wade_regression::analysis::{load_dataset, run_forest_suite};
use wade_regression::telemetry::init_tracing;
use wade_regression::AnalysisConfig;

fn main() -> Result<()> {
    init_tracing();

    let config = AnalysisConfig::load().context("failed to load configuration")?;
    let dataset = load_dataset(&config)
        .with_context(|| format!("failed to load {}", config.data.path.display()))?;

    run_forest_suite(&config, &dataset, &mut std::io::stdout())
        .context("Random Forest Regressor evaluation failed")?;
    Ok(())
}
