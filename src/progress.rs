//! Progress UI for batch runs.
//!
//! Polls a shared completion counter and renders an overall bar. The
//! orchestrator only increments the counter; rendering stays out of the
//! download path entirely.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spawns the progress UI when requested.
///
/// Returns `(handle, stop)` so the caller can signal stop and await the
/// handle. When `use_bar` is false, returns `(None, stop)` with stop already
/// true.
#[must_use]
pub fn spawn_progress_bar(
    use_bar: bool,
    done: Arc<AtomicUsize>,
    total: usize,
) -> (Option<tokio::task::JoinHandle<()>>, Arc<AtomicBool>) {
    if !use_bar {
        return (None, Arc::new(AtomicBool::new(true)));
    }
    let stop = Arc::new(AtomicBool::new(false));
    let handle = spawn_bar_inner(done, total, Arc::clone(&stop));
    (Some(handle), stop)
}

fn spawn_bar_inner(
    done: Arc<AtomicUsize>,
    total: usize,
    stop: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} files {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        while !stop.load(Ordering::SeqCst) {
            let current = done.load(Ordering::SeqCst).min(total);
            bar.set_position(current as u64);
            tokio::time::sleep(Duration::from_millis(120)).await;
        }

        bar.set_position(done.load(Ordering::SeqCst).min(total) as u64);
        bar.finish_and_clear();
    })
}
