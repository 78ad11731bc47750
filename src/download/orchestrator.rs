//! Concurrent batch transfer with per-file retry.
//!
//! The orchestrator processes a manifest under a semaphore bound: one spawned
//! task per entry, each running its full fetch-with-retry loop before
//! releasing its permit. Tasks return typed [`DownloadOutcome`]s; the
//! orchestrator joins every task and folds the outcomes into a [`Summary`],
//! so no failure can silently vanish and per-file errors never abort the
//! batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use crate::config::PortalConfig;
use crate::manifest::{FileEntry, Manifest};
use crate::session::Session;

use super::error::FetchError;
use super::outcome::{DownloadOutcome, SkipReason, Summary};
use super::paths::{destination_for, part_path};

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Default number of parallel downloads.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default fetch attempts per file.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Fixed delay between fetch attempts for one file.
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Error type for orchestrator configuration.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// Concurrent batch downloader for one manifest.
///
/// # Concurrency model
///
/// - Each entry runs in its own Tokio task
/// - A semaphore permit bounds how many tasks fetch at once
/// - A file's retry loop runs to completion on its task; permits are
///   released by RAII
/// - Outcomes are collected by joining every task, in spawn order
#[derive(Debug)]
pub struct DownloadOrchestrator {
    base_dir: PathBuf,
    concurrency: usize,
    max_attempts: u32,
    retry_delay: Duration,
    progress: Option<Arc<AtomicUsize>>,
}

impl DownloadOrchestrator {
    /// Creates an orchestrator writing under `base_dir` with the given
    /// concurrency bound.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::InvalidConcurrency`] when the value is
    /// outside `1..=100`.
    pub fn new(
        base_dir: impl Into<PathBuf>,
        concurrency: usize,
    ) -> Result<Self, OrchestratorError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(OrchestratorError::InvalidConcurrency { value: concurrency });
        }
        Ok(Self {
            base_dir: base_dir.into(),
            concurrency,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: RETRY_DELAY,
            progress: None,
        })
    }

    /// Overrides the per-file retry policy (attempt budget and the fixed
    /// inter-attempt delay). The budget is clamped to at least one attempt.
    #[must_use]
    pub fn with_retry_policy(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// Attaches a shared counter incremented once per finished entry, for
    /// progress display.
    #[must_use]
    pub fn with_progress_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.progress = Some(counter);
        self
    }

    /// Returns the configured concurrency bound.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Downloads every manifest entry and returns the batch summary.
    ///
    /// Per-file failures are recorded in the summary, never propagated; an
    /// empty manifest yields an all-zero summary without touching the
    /// network.
    #[instrument(skip(self, session, config, manifest), fields(files = manifest.files.len()))]
    pub async fn run(
        &self,
        session: &Session,
        config: &PortalConfig,
        manifest: Manifest,
    ) -> Summary {
        if manifest.files.is_empty() {
            info!("manifest is empty; nothing to download");
            return Summary::default();
        }

        info!(
            files = manifest.files.len(),
            concurrency = self.concurrency,
            base_dir = %self.base_dir.display(),
            "starting batch download"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(manifest.files.len());

        for entry in manifest.files {
            let display_name = entry
                .original_name()
                .unwrap_or("<unnamed entry>")
                .to_string();
            let semaphore = Arc::clone(&semaphore);
            let session = session.clone();
            let config = config.clone();
            let base_dir = self.base_dir.clone();
            let max_attempts = self.max_attempts;
            let retry_delay = self.retry_delay;
            let progress = self.progress.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return DownloadOutcome::Failed {
                            name: entry
                                .original_name()
                                .unwrap_or("<unnamed entry>")
                                .to_string(),
                            attempts: 0,
                            reason: "worker pool closed".to_string(),
                        };
                    }
                };
                let outcome =
                    download_entry(&session, &config, &entry, &base_dir, max_attempts, retry_delay)
                        .await;
                if let Some(counter) = progress {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
                outcome
            });
            handles.push((display_name, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                // A panicked worker still produces a visible failure.
                Err(error) => {
                    warn!(name = %name, error = %error, "download task panicked");
                    outcomes.push(DownloadOutcome::Failed {
                        name,
                        attempts: 0,
                        reason: format!("worker panicked: {error}"),
                    });
                }
            }
        }

        let summary = Summary::from_outcomes(&outcomes);
        info!(
            completed = summary.completed,
            size_mismatches = summary.size_mismatches,
            skipped = summary.skipped,
            failed = summary.failed_count(),
            bytes = summary.bytes_downloaded,
            "batch download complete"
        );
        summary
    }
}

/// Processes one manifest entry: skip checks, then fetch with retry.
async fn download_entry(
    session: &Session,
    config: &PortalConfig,
    entry: &FileEntry,
    base_dir: &Path,
    max_attempts: u32,
    retry_delay: Duration,
) -> DownloadOutcome {
    let Some(name) = entry.original_name() else {
        warn!("manifest entry without original_name skipped");
        return DownloadOutcome::Skipped {
            name: None,
            reason: SkipReason::MissingName,
        };
    };

    let dest = destination_for(base_dir, entry.group(), name);

    // Size-based skip, not checksum-based: tolerate servers that report
    // stale or zero sizes rather than re-download on every run.
    if let Some(expected) = entry.expected_size()
        && let Ok(meta) = tokio::fs::metadata(&dest).await
        && meta.len() >= expected
    {
        debug!(name = %name, local = meta.len(), expected, "already complete; skipping");
        return DownloadOutcome::Skipped {
            name: Some(name.to_string()),
            reason: SkipReason::AlreadyComplete {
                local: meta.len(),
                expected,
            },
        };
    }

    if let Some(parent) = dest.parent()
        && let Err(error) = tokio::fs::create_dir_all(parent).await
    {
        return DownloadOutcome::Failed {
            name: name.to_string(),
            attempts: 0,
            reason: FetchError::io(parent.to_path_buf(), error).to_string(),
        };
    }

    let url = config.file_url(name);
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        match fetch_to_file(session, &url, &dest).await {
            Ok(bytes) => {
                if let Some(expected) = entry.expected_size()
                    && bytes != expected
                {
                    warn!(
                        name = %name,
                        expected,
                        actual = bytes,
                        "downloaded with size mismatch"
                    );
                    return DownloadOutcome::CompletedSizeMismatch {
                        name: name.to_string(),
                        path: dest,
                        expected,
                        actual: bytes,
                    };
                }
                info!(name = %name, bytes, path = %dest.display(), "downloaded");
                return DownloadOutcome::Completed {
                    name: name.to_string(),
                    path: dest,
                    bytes,
                };
            }
            Err(error) => {
                warn!(name = %name, attempt, max_attempts, error = %error, "attempt failed");
                last_error = error.to_string();
                if attempt < max_attempts {
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }
    }

    DownloadOutcome::Failed {
        name: name.to_string(),
        attempts: max_attempts,
        reason: last_error,
    }
}

/// One fetch attempt: streaming GET into a `.part` sibling, renamed into
/// place on success so a partial write is never mistaken for a complete file.
async fn fetch_to_file(session: &Session, url: &str, dest: &Path) -> Result<u64, FetchError> {
    let response = session
        .get(url)
        .await
        .map_err(|source| FetchError::network(url, source))?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(FetchError::http_status(url, status));
    }

    let part = part_path(dest);
    let file = File::create(&part)
        .await
        .map_err(|source| FetchError::io(part.clone(), source))?;

    let stream_result = stream_to_file(file, response, url, &part).await;

    let bytes_written = match stream_result {
        Ok(bytes) => bytes,
        Err(error) => {
            debug!(path = %part.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(&part).await;
            return Err(error);
        }
    };

    tokio::fs::rename(&part, dest)
        .await
        .map_err(|source| FetchError::io(dest.to_path_buf(), source))?;

    Ok(bytes_written)
}

/// Streams the response body to the file, returning bytes written.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, FetchError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|source| FetchError::network(url, source))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|source| FetchError::io(path.to_path_buf(), source))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|source| FetchError::io(path.to_path_buf(), source))?;

    Ok(bytes_written)
}
