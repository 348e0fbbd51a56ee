use std::io::{self, IsTerminal, Write};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::chart::ComparisonPlot;
use crate::error::{AnalysisError, Result};

/// Where comparison plots go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotMode {
    /// Full-screen terminal chart, blocks until a key is pressed.
    #[default]
    Interactive,
    /// Plots are built but not displayed.
    None,
}

pub trait PlotViewer {
    fn show(&mut self, plot: &ComparisonPlot) -> Result<()>;
}

pub fn viewer_for(mode: PlotMode) -> Box<dyn PlotViewer> {
    match mode {
        PlotMode::Interactive => Box::new(TerminalViewer),
        PlotMode::None => Box::new(HeadlessViewer::default()),
    }
}

fn plot_error(stage: &str, err: io::Error) -> AnalysisError {
    AnalysisError::Plot(format!("{stage}: {err}"))
}

/// Switches `out` to the alternate screen. Raw mode is switched off again if
/// that fails.
fn enter_screen<W: Write>(out: &mut W) -> Result<()> {
    if let Err(e) = execute!(out, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(plot_error("enter screen", e));
    }
    Ok(())
}

fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen)
}

/// Shows the chart on the alternate screen until any key is pressed.
pub struct TerminalViewer;

impl TerminalViewer {
    fn run<B: Backend>(terminal: &mut Terminal<B>, plot: &ComparisonPlot) -> io::Result<()> {
        loop {
            terminal.draw(|frame| plot.render(frame))?;
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(()),
                Event::Resize(_, _) => {} // redrawn on next iteration
                _ => {}
            }
        }
    }
}

impl PlotViewer for TerminalViewer {
    fn show(&mut self, plot: &ComparisonPlot) -> Result<()> {
        if !io::stdout().is_terminal() {
            warn!(model = plot.suptitle(), "stdout is not a terminal, skipping plot");
            return Ok(());
        }

        enable_raw_mode().map_err(|e| plot_error("enable raw mode", e))?;
        let mut stdout = io::stdout();
        enter_screen(&mut stdout)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = leave_screen(&mut io::stdout());
                return Err(plot_error("terminal", e));
            }
        };

        let result = Self::run(&mut terminal, plot);

        // Restore terminal
        leave_screen(terminal.backend_mut()).map_err(|e| plot_error("leave screen", e))?;
        terminal
            .show_cursor()
            .map_err(|e| plot_error("show cursor", e))?;

        result.map_err(|e| plot_error("draw", e))
    }
}

/// Records what would have been shown.
#[derive(Debug, Default)]
pub struct HeadlessViewer {
    shown: Vec<String>,
}

impl HeadlessViewer {
    pub fn shown(&self) -> &[String] {
        &self.shown
    }
}

impl PlotViewer for HeadlessViewer {
    fn show(&mut self, plot: &ComparisonPlot) -> Result<()> {
        info!(model = plot.suptitle(), points = plot.len(), "plot not displayed");
        self.shown.push(plot.suptitle().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenTerminal;

    impl Write for BrokenTerminal {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn failed_screen_switch_is_a_plot_error() {
        let err = enter_screen(&mut BrokenTerminal).unwrap_err();
        match err {
            AnalysisError::Plot(message) => assert!(message.starts_with("enter screen")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn headless_viewer_records_titles() {
        let mut viewer = viewer_for(PlotMode::None);
        let plot = ComparisonPlot::build("Ridge", &[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0])
            .unwrap();
        viewer.show(&plot).unwrap();

        let mut headless = HeadlessViewer::default();
        headless.show(&plot).unwrap();
        assert_eq!(headless.shown(), &["Ridge".to_string()]);
    }
}
