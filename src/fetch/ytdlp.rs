//! yt-dlp invocation
//!
//! All network fetching, extraction and stream merging is delegated to the
//! `yt-dlp` executable. This module builds its argument lists from the
//! selection policy and runs it once per item, so a failing item is a value
//! in the batch report instead of an aborted process.

use crate::error::FetchmuxError;
use crate::fetch::probe::{classify_probe_output, Source};
use crate::fetch::progress::{parse_progress_line, Progress};
use crate::fetch::report::{BatchReport, ItemOutcome};
use crate::policy::{build_format_query, choose_output_layout, MediaRequest, OutputLayout};
use crate::utils::cookies::{resolve_cookie_file, CookieResolution};
use crate::utils::url::validate_locator;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Fetcher backed by the yt-dlp executable
pub struct YtDlpFetcher {
    binary: String,
    output_dir: Option<PathBuf>,
    timeout: Duration,
    limit: Option<usize>,
    verbose: bool,
    progress_callback: Option<Arc<dyn Fn(Progress) + Send + Sync>>,
}

impl YtDlpFetcher {
    /// Create a fetcher using `yt-dlp` from PATH
    pub fn new() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            output_dir: None,
            timeout: Duration::from_secs(2 * 3600),
            limit: None,
            verbose: false,
            progress_callback: None,
        }
    }

    /// Use a specific yt-dlp binary
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Place downloads under this directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Per-item timeout for the collaborator process
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cap the number of collection items to fetch (0 means all)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = if limit > 0 { Some(limit) } else { None };
        self
    }

    /// Pass the collaborator's own verbose output through
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set a progress callback fed from the collaborator's progress lines
    pub fn with_progress(mut self, callback: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Fetch everything the request's locator addresses.
    ///
    /// A collection is fetched item by item; individual failures are recorded
    /// in the report and never abort the remaining items.
    pub async fn fetch(&self, request: &MediaRequest) -> Result<BatchReport, FetchmuxError> {
        validate_locator(&request.source_locator)?;

        let cookies = match resolve_cookie_file(request.cookies_file.as_deref()) {
            CookieResolution::None => None,
            CookieResolution::Usable(path) => {
                info!("Using cookie file {}", path.display());
                Some(path)
            }
            CookieResolution::Unreadable(path) => {
                warn!(
                    "Cookie file {} is not readable, proceeding unauthenticated",
                    path.display()
                );
                None
            }
        };

        let source = self
            .probe_source(&request.source_locator, cookies.as_deref())
            .await?;
        let layout = choose_output_layout(source.is_collection());
        let query = build_format_query(request).to_string();

        match source {
            Source::Single { title } => {
                let title = title.unwrap_or_else(|| request.source_locator.clone());
                info!("Fetching single item: {}", title);

                let mut report = BatchReport::new();
                match self
                    .fetch_item(request, &query, layout, None, cookies.as_deref())
                    .await
                {
                    Ok(()) => report.push(ItemOutcome::ok(1, title)),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => report.push(ItemOutcome::failed(1, title, e.to_string())),
                }
                Ok(report)
            }
            Source::Collection { title, entries } => {
                let total = entries.len();
                let take = self.limit.unwrap_or(total).min(total);
                info!("Fetching collection '{}': {}/{} items", title, take, total);

                let mut report = BatchReport::for_collection(title);
                for (i, entry) in entries.iter().take(take).enumerate() {
                    let index = i + 1;
                    let item_title = entry.display_title();

                    match self
                        .fetch_item(request, &query, layout, Some(index), cookies.as_deref())
                        .await
                    {
                        Ok(()) => report.push(ItemOutcome::ok(index, item_title)),
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => {
                            warn!("Item {} '{}' failed: {}", index, item_title, e);
                            report.push(ItemOutcome::failed(index, item_title, e.to_string()));
                        }
                    }
                }
                Ok(report)
            }
        }
    }

    /// Probe the locator without downloading media
    async fn probe_source(
        &self,
        locator: &str,
        cookies: Option<&Path>,
    ) -> Result<Source, FetchmuxError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--flat-playlist").arg("-J");
        if let Some(path) = cookies {
            cmd.arg("--cookies").arg(path);
        }
        cmd.arg(locator);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        debug!("Probing source: {} --flat-playlist -J {}", self.binary, locator);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| FetchmuxError::Timeout {
                tool: self.binary.clone(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchmuxError::ProbeFailed(tail_of(&stderr)));
        }

        classify_probe_output(&String::from_utf8_lossy(&output.stdout))
    }

    /// Run the collaborator for one item
    async fn fetch_item(
        &self,
        request: &MediaRequest,
        format: &str,
        layout: OutputLayout,
        playlist_index: Option<usize>,
        cookies: Option<&Path>,
    ) -> Result<(), FetchmuxError> {
        let args = self.build_fetch_args(request, format, layout, playlist_index, cookies);
        debug!("{} {}", self.binary, args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child.stdout.take();
        let stderr_task = tokio::spawn(drain_stderr(child.stderr.take()));

        let run = async {
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(target: "collaborator", "{}", line);
                    if let Some(progress) = parse_progress_line(&line) {
                        if let Some(callback) = &self.progress_callback {
                            callback(progress);
                        }
                    }
                }
            }
            child.wait().await
        };

        let status = match tokio::time::timeout(self.timeout, run).await {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(FetchmuxError::Timeout {
                    tool: self.binary.clone(),
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let stderr_tail = stderr_task.await.unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            let message = if stderr_tail.is_empty() {
                format!("exit status {}", status.code().unwrap_or(-1))
            } else {
                stderr_tail
            };
            Err(self.classify_failure(message))
        }
    }

    /// Map collaborator stderr to the crate's error taxonomy
    fn classify_failure(&self, message: String) -> FetchmuxError {
        if message.contains("Requested format is not available") {
            FetchmuxError::NoFormatFound
        } else if message.contains("ERROR:") {
            FetchmuxError::ItemFetchFailure(message)
        } else {
            FetchmuxError::Collaborator {
                tool: self.binary.clone(),
                message,
            }
        }
    }

    /// Build the argument list for one item fetch
    fn build_fetch_args(
        &self,
        request: &MediaRequest,
        format: &str,
        layout: OutputLayout,
        playlist_index: Option<usize>,
        cookies: Option<&Path>,
    ) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            format.to_string(),
            "-o".to_string(),
            layout.template().to_string(),
            "--merge-output-format".to_string(),
            request.preferred_container.clone(),
            "--embed-metadata".to_string(),
            "--newline".to_string(),
        ];

        // Collection items are addressed by position within the original
        // locator so the collection-name and index template fields expand.
        match playlist_index {
            Some(index) => {
                args.push("--playlist-items".to_string());
                args.push(index.to_string());
            }
            None => args.push("--no-playlist".to_string()),
        }

        if let Some(dir) = &self.output_dir {
            args.push("-P".to_string());
            args.push(dir.display().to_string());
        }
        if let Some(path) = cookies {
            args.push("--cookies".to_string());
            args.push(path.display().to_string());
        }
        if request.write_description {
            args.push("--write-description".to_string());
        }
        if self.verbose {
            args.push("--verbose".to_string());
        }

        args.push(request.source_locator.clone());
        args
    }

    fn spawn_error(&self, e: std::io::Error) -> FetchmuxError {
        if e.kind() == std::io::ErrorKind::NotFound {
            FetchmuxError::CollaboratorMissing {
                tool: self.binary.clone(),
                source: e,
            }
        } else {
            FetchmuxError::IoError(e)
        }
    }
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect the last lines of collaborator stderr for error reporting
async fn drain_stderr(stderr: Option<tokio::process::ChildStderr>) -> String {
    let mut tail: VecDeque<String> = VecDeque::new();
    if let Some(stderr) = stderr {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(target: "collaborator", "{}", line);
            tail.push_back(line);
            if tail.len() > 20 {
                tail.pop_front();
            }
        }
    }
    tail.into_iter().collect::<Vec<_>>().join("\n")
}

fn tail_of(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(5);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::report::BatchStatus;
    use crate::policy::choose_output_layout;

    fn fetch_args(fetcher: &YtDlpFetcher, request: &MediaRequest, index: Option<usize>) -> Vec<String> {
        let query = build_format_query(request).to_string();
        let layout = choose_output_layout(index.is_some());
        fetcher.build_fetch_args(request, &query, layout, index, request.cookies_file.as_deref())
    }

    #[test]
    fn test_single_item_args() {
        let fetcher = YtDlpFetcher::new();
        let request = MediaRequest::new("https://youtu.be/x").with_max_height(1080);
        let args = fetch_args(&fetcher, &request, None);

        assert_eq!(args[0], "-f");
        assert_eq!(
            args[1],
            "bestvideo[height<=1080]+bestaudio/bestvideo+bestaudio/best"
        );
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(!args.contains(&"--playlist-items".to_string()));
        assert!(args.contains(&"--merge-output-format".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/x");
    }

    #[test]
    fn test_collection_item_args_address_by_index() {
        let fetcher = YtDlpFetcher::new();
        let request = MediaRequest::new("https://www.youtube.com/playlist?list=PLx");
        let args = fetch_args(&fetcher, &request, Some(3));

        let pos = args.iter().position(|a| a == "--playlist-items").unwrap();
        assert_eq!(args[pos + 1], "3");
        assert!(!args.contains(&"--no-playlist".to_string()));
        // Collection layout goes to the collaborator unchanged
        assert!(args
            .iter()
            .any(|a| a.contains("%(playlist)s") && a.contains("%(playlist_index)s")));
    }

    #[test]
    fn test_cookie_and_description_args() {
        let fetcher = YtDlpFetcher::new().with_output_dir("/downloads");
        let mut request = MediaRequest::new("https://youtu.be/x")
            .with_cookies_file("/tmp/cookies.txt");
        request.write_description = true;
        let query = build_format_query(&request).to_string();
        let args = fetcher.build_fetch_args(
            &request,
            &query,
            choose_output_layout(false),
            None,
            request.cookies_file.as_deref(),
        );

        let pos = args.iter().position(|a| a == "--cookies").unwrap();
        assert_eq!(args[pos + 1], "/tmp/cookies.txt");
        assert!(args.contains(&"--write-description".to_string()));
        let pos = args.iter().position(|a| a == "-P").unwrap();
        assert_eq!(args[pos + 1], "/downloads");
    }

    #[test]
    fn test_unreadable_cookie_file_is_omitted() {
        let fetcher = YtDlpFetcher::new();
        let request = MediaRequest::new("https://youtu.be/x");
        let resolution = resolve_cookie_file(Some(Path::new("/nonexistent/cookies.txt")));
        let query = build_format_query(&request).to_string();
        let args = fetcher.build_fetch_args(
            &request,
            &query,
            choose_output_layout(false),
            None,
            resolution.usable_path(),
        );

        assert!(!args.contains(&"--cookies".to_string()));
    }

    #[test]
    fn test_failure_classification() {
        let fetcher = YtDlpFetcher::new();
        assert!(matches!(
            fetcher.classify_failure("ERROR: Requested format is not available".to_string()),
            FetchmuxError::NoFormatFound
        ));
        assert!(matches!(
            fetcher.classify_failure("ERROR: Video unavailable".to_string()),
            FetchmuxError::ItemFetchFailure(_)
        ));
        assert!(matches!(
            fetcher.classify_failure("exit status 1".to_string()),
            FetchmuxError::Collaborator { .. }
        ));
    }

    #[test]
    fn test_limit_builder() {
        let fetcher = YtDlpFetcher::new().with_limit(0);
        assert_eq!(fetcher.limit, None);
        let fetcher = YtDlpFetcher::new().with_limit(5);
        assert_eq!(fetcher.limit, Some(5));
    }

    #[tokio::test]
    async fn test_empty_locator_is_rejected_before_spawn() {
        let fetcher = YtDlpFetcher::new().with_binary("/definitely/not/here");
        let request = MediaRequest::new("");
        let err = fetcher.fetch(&request).await.unwrap_err();
        assert!(matches!(err, FetchmuxError::InputMissing));
    }

    #[tokio::test]
    async fn test_missing_binary_is_fatal() {
        let fetcher = YtDlpFetcher::new().with_binary("/definitely/not/here");
        let request = MediaRequest::new("https://youtu.be/x");
        let err = fetcher.fetch(&request).await.unwrap_err();
        assert!(err.is_collaborator_error());
    }

    #[cfg(unix)]
    fn fake_collaborator(dir: &std::path::Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-ytdlp");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// A collection where item 2 fails: items 1 and 3 still complete and the
    /// batch reports partial failure.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_collection_continues_past_failing_item() {
        let dir = tempfile::tempdir().unwrap();
        let script = r#"#!/bin/sh
case "$*" in
  *"--flat-playlist"*)
    echo '{"_type":"playlist","title":"T","entries":[{"id":"a","title":"One"},{"id":"b","title":"Two"},{"id":"c","title":"Three"}]}'
    ;;
  *"--playlist-items 2"*)
    echo "ERROR: video unavailable" >&2
    exit 1
    ;;
  *)
    echo "[download] 100%"
    ;;
esac
"#;
        let binary = fake_collaborator(dir.path(), script);

        let fetcher = YtDlpFetcher::new().with_binary(binary.display().to_string());
        let request = MediaRequest::new("https://www.youtube.com/playlist?list=PLx");
        let report = fetcher.fetch(&request).await.unwrap();

        assert_eq!(report.outcomes().len(), 3);
        assert!(report.outcomes()[0].is_ok());
        assert!(!report.outcomes()[1].is_ok());
        assert!(report.outcomes()[2].is_ok());
        assert_eq!(report.status(), BatchStatus::CompleteWithErrors);
        assert_eq!(report.status().exit_code(), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_single_item_report() {
        let dir = tempfile::tempdir().unwrap();
        let script = r#"#!/bin/sh
case "$*" in
  *"--flat-playlist"*) echo '{"_type":"video","title":"Solo"}' ;;
  *) echo "[download] 100%" ;;
esac
"#;
        let binary = fake_collaborator(dir.path(), script);

        let fetcher = YtDlpFetcher::new().with_binary(binary.display().to_string());
        let request = MediaRequest::new("https://youtu.be/x");
        let report = fetcher.fetch(&request).await.unwrap();

        assert_eq!(report.outcomes().len(), 1);
        assert_eq!(report.outcomes()[0].title, "Solo");
        assert_eq!(report.status(), BatchStatus::Complete);
    }

    /// An unreadable cookie path downgrades to a warning; the fetch still runs.
    #[cfg(unix)]
    #[tokio::test]
    async fn test_unreadable_cookie_file_does_not_fail_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let script = r#"#!/bin/sh
case "$*" in
  *"--cookies"*) echo "ERROR: should not receive cookies" >&2; exit 1 ;;
  *"--flat-playlist"*) echo '{"_type":"video","title":"Solo"}' ;;
  *) exit 0 ;;
esac
"#;
        let binary = fake_collaborator(dir.path(), script);

        let fetcher = YtDlpFetcher::new().with_binary(binary.display().to_string());
        let request = MediaRequest::new("https://youtu.be/x")
            .with_cookies_file(dir.path().join("missing-cookies.txt"));
        let report = fetcher.fetch(&request).await.unwrap();

        assert_eq!(report.status(), BatchStatus::Complete);
    }
}
