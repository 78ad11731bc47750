//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use portal_fetch_core::DEFAULT_CONCURRENCY;

/// Default seconds to wait for the operator to log in and paste cookies.
const DEFAULT_LOGIN_WAIT_SECS: u64 = 120;

/// Bulk downloader for cookie-authenticated upload portals.
///
/// Tries cached credentials first; when the portal rejects them, walks the
/// operator through an interactive browser login and cookie capture, then
/// fetches the batch manifest and downloads every file in parallel.
#[derive(Parser, Debug)]
#[command(name = "portal-fetch")]
#[command(author, version, about)]
pub struct Args {
    /// Batch/month code selecting the remote upload batch (e.g. 202510)
    pub batch: String,

    /// Portal root serving the list/download endpoints
    #[arg(long, default_value = "https://portal.ogc.org")]
    pub portal_root: String,

    /// Login entry page the browser authenticates against
    #[arg(long, default_value = "https://agora.ogc.org")]
    pub entry_url: String,

    /// Session-initializing URL visited after login (repeatable; defaults to
    /// the batch uploader page under the entry URL)
    #[arg(long = "init-url")]
    pub init_urls: Vec<String>,

    /// Never prompt for interactive login; fail if cached cookies are rejected
    #[arg(long)]
    pub headless: bool,

    /// Seconds to wait for manual login and cookie paste
    #[arg(short = 'w', long, default_value_t = DEFAULT_LOGIN_WAIT_SECS)]
    pub wait: u64,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Directory downloaded files are organized under
    #[arg(long, default_value = "downloads")]
    pub base_dir: PathBuf,

    /// Credential bundle file (cookies + user agent)
    #[arg(long, default_value = "cookies_portal.json")]
    pub cookie_file: PathBuf,

    /// Disable the overall progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
