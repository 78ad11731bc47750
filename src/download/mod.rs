//! Batch download orchestration: destination layout, per-file outcomes,
//! and the bounded-concurrency transfer loop.

mod error;
mod orchestrator;
mod outcome;
mod paths;

pub use error::FetchError;
pub use orchestrator::{
    DEFAULT_CONCURRENCY, DEFAULT_MAX_ATTEMPTS, DownloadOrchestrator, OrchestratorError,
    RETRY_DELAY,
};
pub use outcome::{DownloadOutcome, SkipReason, Summary};
pub use paths::{FALLBACK_GROUP, destination_for, sanitize_group_name};
