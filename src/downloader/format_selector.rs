// FormatSelector - rendition ranking and interactive choice
//
// Turns the raw rendition list of a video into the numbered menu shown to
// the user:
// - Drops renditions without a quality label
// - Ranks renditions with audio first, then by resolution
// - Reads a single menu index from the user

use std::cmp::Reverse;
use std::io::{BufRead, Write};

use tracing::debug;

use super::errors::{AppError, AppResult};
use super::models::Rendition;
use crate::style::{GREEN, RESET};

const PROMPT: &str = "Enter the number of the format you want to download: ";

/// Format selector for the download menu
pub struct FormatSelector;

impl FormatSelector {
    /// Keep selectable renditions, best first
    pub fn filter_and_sort(renditions: &[Rendition]) -> Vec<Rendition> {
        let mut selectable: Vec<Rendition> = renditions
            .iter()
            .filter(|r| r.is_selectable())
            .cloned()
            .collect();

        // sort_by_key is stable
        selectable.sort_by_key(|r| {
            (
                Reverse(r.audio_channels),
                Reverse(Self::parse_quality_label(&r.quality_label)),
            )
        });

        selectable
    }

    /// Numeric resolution of a label like "1080p"; 0 when it does not parse
    pub fn parse_quality_label(label: &str) -> i64 {
        label
            .strip_suffix('p')
            .unwrap_or(label)
            .parse()
            .unwrap_or(0)
    }

    /// Print one menu line per rendition
    pub fn display<W: Write>(renditions: &[Rendition], out: &mut W) -> AppResult<()> {
        for (i, r) in renditions.iter().enumerate() {
            let written = if r.has_audio() {
                writeln!(out, "{}[{}] Quality: {}, Audio: Yes{}", GREEN, i, r.quality_label, RESET)
            } else {
                writeln!(out, "[{}] Quality: {}, Audio: No", i, r.quality_label)
            };
            written.map_err(AppError::Terminal)?;
        }
        Ok(())
    }

    /// Ask for a menu index; any bad answer is fatal
    pub fn prompt_choice<R: BufRead, W: Write>(
        renditions: &[Rendition],
        input: &mut R,
        out: &mut W,
    ) -> AppResult<usize> {
        write!(out, "{}", PROMPT).map_err(AppError::Terminal)?;
        out.flush().map_err(AppError::Terminal)?;

        let mut line = String::new();
        let read = input.read_line(&mut line).map_err(AppError::ReadInput)?;
        if read == 0 {
            return Err(AppError::ReadInput(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no input",
            )));
        }

        Self::parse_choice(&line, renditions.len())
    }

    /// Validate a raw input line against a menu of `len` entries
    pub fn parse_choice(line: &str, len: usize) -> AppResult<usize> {
        let text = line.strip_suffix('\n').unwrap_or(line);
        let text = text.strip_suffix('\r').unwrap_or(text);

        match text.parse::<i64>() {
            Ok(choice) if choice >= 0 && (choice as u64) < len as u64 => Ok(choice as usize),
            _ => {
                debug!(input = %text, len, "rejected menu choice");
                Err(AppError::InvalidChoice)
            }
        }
    }
}
