//! Fallback User-Agent for portal sessions.
//!
//! Sessions normally reuse the browser identity captured at login; this
//! fallback only applies when a bundle carries no identity string.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/portal-fetch";

/// Default User-Agent when the authentication bundle carries none.
#[must_use]
pub(crate) fn default_portal_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("portal-fetch/{version} (batch-retrieval-tool; +{PROJECT_UA_URL})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ua_carries_version_and_project_url() {
        let ua = default_portal_user_agent();
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL");
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("portal-fetch/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "UA must contain crate version"
        );
    }
}
