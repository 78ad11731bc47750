//! CLI entry point for the portal-fetch tool.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use portal_fetch_core::{
    Authenticator, CaptureAuthenticator, CredentialStore, DownloadOrchestrator,
    NonInteractiveAuthenticator, PortalConfig, establish_session,
    progress::spawn_progress_bar,
};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!(batch = %args.batch, "portal-fetch starting");

    let config = PortalConfig::new(&args.portal_root, &args.entry_url, &args.batch)
        .with_init_urls(args.init_urls.clone());
    let store = CredentialStore::new(&args.cookie_file);

    let authenticator: Box<dyn Authenticator> = if args.headless {
        Box::new(NonInteractiveAuthenticator::new())
    } else {
        Box::new(CaptureAuthenticator::new())
    };

    // Authentication failure is the only condition that fails the process.
    let (session, manifest) = establish_session(
        &store,
        authenticator.as_ref(),
        &config,
        Duration::from_secs(args.wait),
    )
    .await
    .context("could not establish an authenticated portal session")?;

    let total = manifest.files.len();
    info!(files = total, "manifest fetched");

    let done = Arc::new(AtomicUsize::new(0));
    let use_bar = !args.no_progress && !args.quiet && total > 0;
    let (bar_handle, stop_bar) = spawn_progress_bar(use_bar, Arc::clone(&done), total);

    let orchestrator = DownloadOrchestrator::new(&args.base_dir, usize::from(args.concurrency))?
        .with_progress_counter(done);
    let summary = orchestrator.run(&session, &config, manifest).await;

    stop_bar.store(true, Ordering::SeqCst);
    if let Some(handle) = bar_handle {
        let _ = handle.await;
    }

    info!(
        completed = summary.completed,
        size_mismatches = summary.size_mismatches,
        skipped = summary.skipped,
        failed = summary.failed_count(),
        bytes = summary.bytes_downloaded,
        "download summary"
    );
    for (name, reason) in &summary.failed {
        warn!(name = %name, reason = %reason, "file failed");
    }

    // Per-file failures are reported above but do not fail the process;
    // the operator re-runs and complete files are skipped.
    Ok(())
}
