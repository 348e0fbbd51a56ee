//! Reference vs predicted chart for the test split.

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use super::prefix_len;

pub const CHART_TITLE: &str = "Predicted Temperature";
pub const Y_LABEL: &str = "Temperature";
pub const REFERENCE_LABEL: &str = "Reference Data";
pub const PREDICTED_LABEL: &str = "Predicted Data";

/// Truncated prefix of the test targets and the matching predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonPlot {
    suptitle: String,
    reference: Vec<(f64, f64)>,
    predicted: Vec<(f64, f64)>,
}

impl ComparisonPlot {
    /// Keeps the first `floor(sqrt(n))` points of each series. Returns `None`
    /// when that prefix is empty.
    pub fn build(model_name: &str, y_test: &[f64], y_pred: &[f64]) -> Option<Self> {
        let len = prefix_len(y_test.len().min(y_pred.len()));
        if len == 0 {
            return None;
        }
        let points = |values: &[f64]| -> Vec<(f64, f64)> {
            values[..len]
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64, v))
                .collect()
        };
        Some(Self {
            suptitle: model_name.to_string(),
            reference: points(y_test),
            predicted: points(y_pred),
        })
    }

    pub fn suptitle(&self) -> &str {
        &self.suptitle
    }

    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    pub fn reference(&self) -> &[(f64, f64)] {
        &self.reference
    }

    pub fn predicted(&self) -> &[(f64, f64)] {
        &self.predicted
    }

    fn y_bounds(&self) -> [f64; 2] {
        let values = self.reference.iter().chain(&self.predicted).map(|&(_, v)| v);
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
        [lo - pad, hi + pad]
    }

    fn chart(&self) -> Chart<'_> {
        let datasets = vec![
            Dataset::default()
                .name(REFERENCE_LABEL)
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&self.reference),
            Dataset::default()
                .name(PREDICTED_LABEL)
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Yellow))
                .data(&self.predicted),
        ];

        let x_max = (self.len().saturating_sub(1) as f64).max(1.0);
        let [y_min, y_max] = self.y_bounds();

        Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", CHART_TITLE)),
            )
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, x_max])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format!("{}", self.len() / 2)),
                        Span::raw(format!("{}", self.len().saturating_sub(1))),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title(Y_LABEL)
                    .style(Style::default().fg(Color::Gray))
                    .bounds([y_min, y_max])
                    .labels(vec![
                        Span::raw(format!("{:.1}", y_min)),
                        Span::raw(format!("{:.1}", (y_min + y_max) / 2.0)),
                        Span::raw(format!("{:.1}", y_max)),
                    ]),
            )
    }

    /// Draws the model name as the outer title, the chart and a dismiss hint.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.suptitle))
            .title_alignment(Alignment::Center);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);
        frame.render_widget(self.chart(), chunks[0]);
        frame.render_widget(
            Paragraph::new("press any key to continue").style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn rendered_text(plot: &ComparisonPlot) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| plot.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn keeps_square_root_prefix() {
        let y_test: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y_pred: Vec<f64> = (0..20).map(|i| i as f64 + 0.5).collect();
        let plot = ComparisonPlot::build("Lasso", &y_test, &y_pred).unwrap();
        assert_eq!(plot.len(), 4);
        assert_eq!(plot.reference()[3], (3.0, 3.0));
        assert_eq!(plot.predicted()[0], (0.0, 0.5));
    }

    #[test]
    fn empty_prefix_builds_nothing() {
        assert!(ComparisonPlot::build("Lasso", &[], &[]).is_none());
        assert_eq!(ComparisonPlot::build("Lasso", &[1.0], &[2.0]).unwrap().len(), 1);
    }

    #[test]
    fn renders_titles_into_the_terminal_buffer() {
        let y: Vec<f64> = (0..30).map(|i| 10.0 + (i as f64).sin()).collect();
        let plot = ComparisonPlot::build("Random Forest Regressor", &y, &y).unwrap();
        let text = rendered_text(&plot);
        assert!(text.contains("Random Forest Regressor"));
        assert!(text.contains(CHART_TITLE));
        assert!(text.contains(Y_LABEL));
    }

    #[test]
    fn flat_series_still_has_a_y_range() {
        let plot = ComparisonPlot::build("Ridge", &[5.0; 9], &[5.0; 9]).unwrap();
        let [lo, hi] = plot.y_bounds();
        assert!(lo < 5.0 && hi > 5.0);
    }
}
