use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use youtube_downloader_lib::cli::Cli;
use youtube_downloader_lib::downloader::extractors::YtDlpSource;
use youtube_downloader_lib::downloader::AppResult;
use youtube_downloader_lib::style::{RED, RESET, YELLOW};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Only this crate logs; reqwest/hyper stay quiet
    let level = cli.log_level().to_string().to_lowercase();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "youtube_downloader={level},youtube_downloader_lib={level}"
        )))
        .with_writer(io::stderr)
        .init();

    match download(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(kind = ?e.kind(), "run failed");
            eprintln!("{}{}{}", RED, e, RESET);
            if let Some(reason) = e.blocking_reason() {
                let hint = reason.hint().unwrap_or_default();
                eprintln!("{}{}: {}{}", YELLOW, reason.description(), hint, RESET);
            }
            ExitCode::FAILURE
        }
    }
}

async fn download(cli: Cli) -> AppResult<()> {
    let config = cli.into_config()?;
    let source = YtDlpSource::new(config.extractor.clone());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    youtube_downloader_lib::run(&source, &config, &mut input, &mut out).await?;
    Ok(())
}
