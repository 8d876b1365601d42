// Single-line terminal progress display

use std::io::Write;

use super::errors::{AppError, AppResult};
use super::models::TransferProgress;
use crate::style::{BLUE, GREEN, RESET, YELLOW};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Progress emitter that keeps rewriting the current terminal line
pub struct ProgressReporter<W: Write> {
    out: W,
    title: Option<String>,
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, title: None }
    }

    /// Announce `title` once the output file exists
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Called once before the first chunk, after the output file is created
    pub fn begin(&mut self, declared_length: u64) -> AppResult<()> {
        if let Some(title) = &self.title {
            writeln!(self.out, "{}Downloading: {}{}", GREEN, title, RESET).map_err(AppError::Terminal)?;
        }
        if declared_length == 0 {
            writeln!(
                self.out,
                "{}Unknown video size, progress will be shown in megabytes.{}",
                YELLOW, RESET
            )
            .map_err(AppError::Terminal)?;
        }
        Ok(())
    }

    pub fn report(&mut self, progress: &TransferProgress) -> AppResult<()> {
        write!(
            self.out,
            "\rDownloading... {}{} complete{}",
            BLUE,
            render(progress),
            RESET
        )
        .map_err(AppError::Terminal)?;
        self.out.flush().map_err(AppError::Terminal)
    }

    /// Terminate the progress line
    pub fn finish(&mut self) -> AppResult<()> {
        writeln!(self.out).map_err(AppError::Terminal)
    }
}

/// Progress value as shown to the user: "42.00%" or "3.00 MB"
pub fn render(progress: &TransferProgress) -> String {
    if progress.is_size_known() {
        format!(
            "{:.2}%",
            progress.bytes_written as f64 / progress.declared_length as f64 * 100.0
        )
    } else {
        format!("{:.2} MB", progress.bytes_written as f64 / BYTES_PER_MB)
    }
}
