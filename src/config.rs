//! Portal endpoint configuration.
//!
//! All remote URLs are derived here from operator-supplied roots and the
//! batch code. Nothing else in the crate hardcodes a portal address; in
//! particular the session-initializing URLs are configuration, with a
//! default that tracks the requested batch code.

/// Endpoint configuration for one portal batch run.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    portal_root: String,
    entry_url: String,
    batch_code: String,
    init_urls: Vec<String>,
}

impl PortalConfig {
    /// Creates a configuration for the given roots and batch code.
    ///
    /// The default session-initializing URL is `<entry_url>/<batch>-uploader`,
    /// the uploader page whose visit materializes portal session cookies.
    /// Override it with [`with_init_urls`](Self::with_init_urls) when the
    /// portal bootstraps differently.
    #[must_use]
    pub fn new(
        portal_root: impl Into<String>,
        entry_url: impl Into<String>,
        batch_code: impl Into<String>,
    ) -> Self {
        let portal_root = trim_trailing_slash(portal_root.into());
        let entry_url = trim_trailing_slash(entry_url.into());
        let batch_code = batch_code.into();
        let init_urls = vec![format!("{entry_url}/{batch_code}-uploader")];
        Self {
            portal_root,
            entry_url,
            batch_code,
            init_urls,
        }
    }

    /// Replaces the session-initializing URL list.
    #[must_use]
    pub fn with_init_urls(mut self, init_urls: Vec<String>) -> Self {
        if !init_urls.is_empty() {
            self.init_urls = init_urls;
        }
        self
    }

    /// The portal root serving the batch endpoints.
    #[must_use]
    pub fn portal_root(&self) -> &str {
        &self.portal_root
    }

    /// The login entry page the human authenticates against.
    #[must_use]
    pub fn entry_url(&self) -> &str {
        &self.entry_url
    }

    /// The batch/month code selecting the remote upload batch.
    #[must_use]
    pub fn batch_code(&self) -> &str {
        &self.batch_code
    }

    /// URLs visited after login so dependent subdomains get their cookies.
    #[must_use]
    pub fn init_urls(&self) -> &[String] {
        &self.init_urls
    }

    /// The batch manifest endpoint.
    #[must_use]
    pub fn manifest_url(&self) -> String {
        format!(
            "{}/upload/{}/list_files.php",
            self.portal_root, self.batch_code
        )
    }

    /// The per-file download endpoint, with the file name percent-encoded
    /// into the query.
    #[must_use]
    pub fn file_url(&self, original_name: &str) -> String {
        format!(
            "{}/upload/{}/getfile.php?id={}",
            self.portal_root,
            self.batch_code,
            urlencoding::encode(original_name)
        )
    }
}

fn trim_trailing_slash(mut value: String) -> String {
    while value.ends_with('/') {
        value.pop();
    }
    value
}
