//! Column summaries, outlier flags and target correlations.

use anyhow::{Context, Result};
use tracing::info;

use wade_regression::analysis::{load_dataset, run_exploration};
use wade_regression::telemetry::init_tracing;
use wade_regression::AnalysisConfig;

fn main() -> Result<()> {
    init_tracing();

    let config = AnalysisConfig::load().context("failed to load configuration")?;
    let dataset = load_dataset(&config)
        .with_context(|| format!("failed to load {}", config.data.path.display()))?;
    info!(
        rows = dataset.num_samples(),
        columns = dataset.numeric_columns.len(),
        "exploring"
    );

    run_exploration(&dataset, &mut std::io::stdout()).context("exploration failed")?;
    Ok(())
}
