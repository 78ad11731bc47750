//! Per-file outcomes and the batch summary.
//!
//! Every manifest entry produces exactly one [`DownloadOutcome`]; the
//! [`Summary`] is a pure fold over the outcome list, so the aggregate is the
//! same whatever order the workers finished in.

use std::fmt;
use std::path::PathBuf;

/// Why an entry was skipped without a network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The manifest entry had no `original_name`.
    MissingName,
    /// The destination already holds at least the expected bytes.
    AlreadyComplete {
        /// Size of the local file.
        local: u64,
        /// Server-reported size.
        expected: u64,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "entry has no original_name"),
            Self::AlreadyComplete { local, expected } => {
                write!(f, "already complete (local {local} >= expected {expected})")
            }
        }
    }
}

/// The result of processing one manifest entry.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Downloaded and, where a size was known, verified.
    Completed {
        /// The entry's original name.
        name: String,
        /// Where the file was written.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },

    /// Downloaded, but the written size disagrees with the server-reported
    /// size. The file is left on disk; integrity is suspect.
    CompletedSizeMismatch {
        /// The entry's original name.
        name: String,
        /// Where the file was written.
        path: PathBuf,
        /// Server-reported size.
        expected: u64,
        /// Bytes actually written.
        actual: u64,
    },

    /// Nothing was fetched, deliberately.
    Skipped {
        /// The entry's original name, when it had one.
        name: Option<String>,
        /// Why the entry was skipped.
        reason: SkipReason,
    },

    /// All attempts failed.
    Failed {
        /// The entry's original name.
        name: String,
        /// How many fetch attempts were made.
        attempts: u32,
        /// The last recorded error.
        reason: String,
    },
}

/// Aggregate of one batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Clean successes.
    pub completed: usize,
    /// Successes whose written size disagreed with the server-reported size.
    pub size_mismatches: usize,
    /// Total bytes written across all successes, clean or not.
    pub bytes_downloaded: u64,
    /// Entries skipped without a network call.
    pub skipped: usize,
    /// Failed entries as (name, reason), in outcome order.
    pub failed: Vec<(String, String)>,
}

impl Summary {
    /// Folds a list of outcomes into the aggregate.
    #[must_use]
    pub fn from_outcomes(outcomes: &[DownloadOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome {
                DownloadOutcome::Completed { bytes, .. } => {
                    summary.completed += 1;
                    summary.bytes_downloaded += bytes;
                }
                DownloadOutcome::CompletedSizeMismatch { actual, .. } => {
                    summary.size_mismatches += 1;
                    summary.bytes_downloaded += actual;
                }
                DownloadOutcome::Skipped { .. } => summary.skipped += 1,
                DownloadOutcome::Failed { name, reason, .. } => {
                    summary.failed.push((name.clone(), reason.clone()));
                }
            }
        }
        summary
    }

    /// Number of failed entries.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Total entries accounted for.
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed + self.size_mismatches + self.skipped + self.failed_count()
    }
}
