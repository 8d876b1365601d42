// Helper functions shared by the download pipeline

use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration as TokioDuration};

use super::errors::ExtractorError;

/// Extension appended to every output file
pub const OUTPUT_EXTENSION: &str = ".mp4";

/// Run command with timeout, capturing stdout and stderr
pub async fn run_output_with_timeout(
    program: &str,
    args: &[String],
    timeout_secs: u64,
) -> Result<std::process::Output, ExtractorError> {
    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ExtractorError::ToolNotFound(program.to_string()),
            _ => ExtractorError::ExecutionError(format!("Failed to start {}: {}", program, e)),
        })?;

    let mut stdout_pipe = child.stdout.take().ok_or_else(|| {
        ExtractorError::ExecutionError(format!("Failed to capture stdout from {}", program))
    })?;
    let mut stderr_pipe = child.stderr.take().ok_or_else(|| {
        ExtractorError::ExecutionError(format!("Failed to capture stderr from {}", program))
    })?;

    // Drain both pipes while waiting so a chatty child cannot block on a full pipe
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });

    match timeout(TokioDuration::from_secs(timeout_secs), child.wait()).await {
        Ok(status_res) => {
            let status = status_res.map_err(|e| {
                ExtractorError::ExecutionError(format!("Failed to wait for {}: {}", program, e))
            })?;
            let stdout = join_pipe(stdout_task, "stdout").await?;
            let stderr = join_pipe(stderr_task, "stderr").await?;
            Ok(std::process::Output { status, stdout, stderr })
        }
        Err(_) => {
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(ExtractorError::NetworkTimeout(format!(
                "{} gave no answer within {}s",
                program, timeout_secs
            )))
        }
    }
}

async fn join_pipe(
    task: tokio::task::JoinHandle<std::io::Result<Vec<u8>>>,
    name: &str,
) -> Result<Vec<u8>, ExtractorError> {
    task.await
        .map_err(|e| ExtractorError::ExecutionError(format!("{} task failed: {}", name, e)))?
        .map_err(|e| ExtractorError::ExecutionError(format!("Failed to read {}: {}", name, e)))
}

pub fn is_youtube_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.contains("youtube.com") || lower.contains("youtu.be")
}

/// Make a video title safe to use as a file name in the current directory
pub fn sanitize_file_name(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim().trim_end_matches('.').trim_end();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        "video".to_string()
    } else {
        trimmed.to_string()
    }
}

/// "<sanitized title>.mp4"
pub fn output_file_name(title: &str) -> String {
    format!("{}{}", sanitize_file_name(title), OUTPUT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_title_kept() {
        assert_eq!(output_file_name("My Trip (2024)"), "My Trip (2024).mp4");
    }

    #[test]
    fn test_separators_replaced() {
        assert_eq!(sanitize_file_name("AC/DC: Live?"), "AC_DC_ Live_");
        assert_eq!(sanitize_file_name("..\\..\\etc"), ".._.._etc");
        assert_eq!(sanitize_file_name("tab\there"), "tab_here");
    }

    #[test]
    fn test_degenerate_titles() {
        assert_eq!(sanitize_file_name(""), "video");
        assert_eq!(sanitize_file_name("   "), "video");
        assert_eq!(sanitize_file_name(".."), "video");
        assert_eq!(sanitize_file_name("ends with dots..."), "ends with dots");
    }

    #[test]
    fn test_youtube_detection() {
        assert!(is_youtube_url("https://www.YouTube.com/watch?v=abc"));
        assert!(is_youtube_url("https://youtu.be/abc"));
        assert!(!is_youtube_url("https://vimeo.com/123"));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = run_output_with_timeout("definitely-not-a-real-binary-xyz", &[], 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::ToolNotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_program_times_out_with_cause() {
        let err = run_output_with_timeout("sleep", &["5".to_string()], 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::NetworkTimeout(_)));
        assert_eq!(err.to_string(), "network timeout: sleep gave no answer within 1s");
    }
}
