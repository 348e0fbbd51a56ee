pub mod chart;
pub mod viewer;

pub use chart::ComparisonPlot;
pub use viewer::{viewer_for, HeadlessViewer, PlotMode, PlotViewer, TerminalViewer};

use tracing::warn;

use crate::error::Result;

/// `floor(sqrt(n))`, computed exactly on integers.
pub fn prefix_len(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

/// Shows the reference/prediction comparison for `model_name`.
///
/// Returns the number of plotted points; 0 means the prefix was empty and
/// nothing was shown.
pub fn compare_plot(
    model_name: &str,
    y_test: &[f64],
    y_pred: &[f64],
    viewer: &mut dyn PlotViewer,
) -> Result<usize> {
    match ComparisonPlot::build(model_name, y_test, y_pred) {
        Some(plot) => {
            viewer.show(&plot)?;
            Ok(plot.len())
        }
        None => {
            warn!(model = model_name, test_size = y_test.len(), "test set too small to plot");
            Ok(0)
        }
    }
}
