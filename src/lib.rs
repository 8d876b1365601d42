pub mod cli;
pub mod config;
pub mod downloader;
pub mod style;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::debug;

use config::Config;
use downloader::errors::{AppError, AppResult};
use downloader::utils::output_file_name;
use downloader::{FormatSelector, ProgressReporter, TransferEngine, VideoSource};
use style::{GREEN, RESET};

/// Steps of a run; a failure at any point ends it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    MetadataFetched,
    RenditionChosen,
    StreamOpened,
    Downloading,
    Completed,
}

/// Fetch, choose, and download one video. Returns the path written.
pub async fn run<S, R, W>(
    source: &S,
    config: &Config,
    input: &mut R,
    out: &mut W,
) -> AppResult<PathBuf>
where
    S: VideoSource + ?Sized,
    R: BufRead,
    W: Write,
{
    debug!(source = source.name(), url = %config.url, "starting");

    let video = source
        .fetch_metadata(&config.url)
        .await
        .map_err(AppError::VideoInfo)?;
    debug!(stage = ?Stage::MetadataFetched, title = %video.title);

    let renditions = FormatSelector::filter_and_sort(&video.renditions);
    FormatSelector::display(&renditions, out)?;
    let choice = FormatSelector::prompt_choice(&renditions, input, out)?;
    let rendition = &renditions[choice];
    debug!(stage = ?Stage::RenditionChosen, quality = %rendition.quality_label, format = %rendition.locator.format_id);

    let mut stream = source
        .open_stream(&video, rendition)
        .await
        .map_err(AppError::Stream)?;
    debug!(stage = ?Stage::StreamOpened);

    let path = config.output_dir.join(output_file_name(&video.title));
    debug!(stage = ?Stage::Downloading, path = %path.display());

    let mut reporter = ProgressReporter::new(&mut *out).with_title(video.title.as_str());
    TransferEngine::new(config.chunk_size)
        .copy(&mut stream, &path, rendition.content_length, &mut reporter)
        .await?;

    writeln!(out, "{}Download completed!{}", GREEN, RESET).map_err(AppError::Terminal)?;
    debug!(stage = ?Stage::Completed);

    Ok(path)
}
