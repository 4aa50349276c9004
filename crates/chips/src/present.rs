//! Presentation adapters
//!
//! Stand-ins for the dashboard's rendering side: they receive each new chip
//! list from the controller and write it out.

use std::io::Write;

use status_chips::{ChipView, Presenter};
use tracing::{info, warn};

use crate::config::OutputFormat;

/// Writes each chip list as one JSON document.
pub struct JsonPresenter<W: Write> {
    writer: W,
    pretty: bool,
    presented: usize,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            presented: 0,
        }
    }

    /// Number of chip lists written so far
    pub fn presented(&self) -> usize {
        self.presented
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, chips: &[ChipView]) -> std::io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, chips)?;
        } else {
            serde_json::to_writer(&mut self.writer, chips)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, chips: &[ChipView]) {
        match self.write(chips) {
            Ok(()) => self.presented += 1,
            Err(e) => warn!("Failed to write chips: {}", e),
        }
    }
}

/// Logs one line per chip.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&mut self, chips: &[ChipView]) {
        if chips.is_empty() {
            info!("No chips to show");
        }
        for chip in chips {
            info!(
                entity = %chip.entity_id,
                state = chip.state.as_deref().unwrap_or("unknown"),
                tier = ?chip.tier,
                color = %chip.icon_color,
                active = chip.is_active,
                "chip"
            );
        }
    }
}

/// Presenter chosen by the output configuration.
pub enum OutputPresenter {
    Json(JsonPresenter<std::io::Stdout>),
    Log(LogPresenter),
}

impl OutputPresenter {
    pub fn stdout(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json(JsonPresenter::new(std::io::stdout(), false)),
            OutputFormat::Pretty => Self::Json(JsonPresenter::new(std::io::stdout(), true)),
            OutputFormat::Log => Self::Log(LogPresenter),
        }
    }
}

impl Presenter for OutputPresenter {
    fn present(&mut self, chips: &[ChipView]) {
        match self {
            Self::Json(presenter) => presenter.present(chips),
            Self::Log(presenter) => presenter.present(chips),
        }
    }
}
