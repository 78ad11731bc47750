//! Authentication bundle: browser cookies plus the client identity string.
//!
//! An [`AuthBundle`] is the serializable set of artifacts needed to appear as
//! a logged-in browser to the portal HTTP API. Bundles are immutable after
//! creation; a re-authentication produces a new bundle.

use std::fmt;

use serde::{Deserialize, Serialize};

fn default_cookie_path() -> String {
    "/".to_string()
}

/// A single browser cookie as exported by the interactive login flow.
///
/// The value field is intentionally redacted in Debug output to prevent
/// accidental logging of sensitive session tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    #[serde(default)]
    pub name: String,
    /// Cookie value (sensitive — never log).
    #[serde(default)]
    value: String,
    /// The domain the cookie belongs to (e.g., `.portal.example.org`).
    #[serde(default)]
    pub domain: String,
    /// The URL path scope for the cookie.
    #[serde(default = "default_cookie_path")]
    pub path: String,
}

impl Cookie {
    /// Creates a new cookie entry. An empty path is normalized to `/`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let path = path.into();
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: if path.trim().is_empty() {
                default_cookie_path()
            } else {
                path
            },
        }
    }

    /// Returns the cookie value.
    ///
    /// Cookie values are sensitive — avoid logging the return value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the cookie carries everything needed for injection.
    ///
    /// Entries missing name, value, or domain are dropped before use rather
    /// than rejected at parse time.
    #[must_use]
    pub fn is_injectable(&self) -> bool {
        !self.name.is_empty() && !self.value.is_empty() && !self.domain.is_empty()
    }
}

// Custom Debug impl that redacts the cookie value.
impl fmt::Debug for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("domain", &self.domain)
            .field("path", &self.path)
            .finish()
    }
}

/// The serializable authentication artifacts produced by a login flow:
/// cookies for the cooperating portal domains plus the browser's
/// `User-Agent` string.
///
/// Wire format (persisted credential file):
///
/// ```json
/// { "cookies": [ { "name": "...", "value": "...", "domain": "...", "path": "/" } ],
///   "user_agent": "Mozilla/5.0 ..." }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthBundle {
    /// Cookies in the order the login flow captured them.
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    /// The browser identity the cookies were issued to. Empty when the
    /// capture source did not record one; the session falls back to the
    /// tool's own identity in that case.
    #[serde(default)]
    pub user_agent: String,
}

impl AuthBundle {
    /// Creates a bundle from captured cookies and a client identity string.
    #[must_use]
    pub fn new(cookies: Vec<Cookie>, user_agent: impl Into<String>) -> Self {
        Self {
            cookies,
            user_agent: user_agent.into(),
        }
    }

    /// Cookies that carry all fields required for injection.
    pub fn injectable_cookies(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter().filter(|cookie| cookie.is_injectable())
    }

    /// Number of cookie entries that would be dropped at injection time.
    #[must_use]
    pub fn dropped_cookie_count(&self) -> usize {
        self.cookies
            .iter()
            .filter(|cookie| !cookie.is_injectable())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_debug_redacts_value() {
        let cookie = Cookie::new("session", "super_secret_token", ".portal.example.org", "/");
        let debug_str = format!("{cookie:?}");
        assert!(
            debug_str.contains("[REDACTED]"),
            "Debug output should contain [REDACTED]"
        );
        assert!(
            !debug_str.contains("super_secret_token"),
            "Debug output must NOT contain the actual value"
        );
    }

    #[test]
    fn test_cookie_empty_path_normalized() {
        let cookie = Cookie::new("session", "v", ".example.org", "  ");
        assert_eq!(cookie.path, "/");
    }

    #[test]
    fn test_injectable_requires_name_value_domain() {
        assert!(Cookie::new("n", "v", "d.example.org", "/").is_injectable());
        assert!(!Cookie::new("", "v", "d.example.org", "/").is_injectable());
        assert!(!Cookie::new("n", "", "d.example.org", "/").is_injectable());
        assert!(!Cookie::new("n", "v", "", "/").is_injectable());
    }

    #[test]
    fn test_bundle_filters_incomplete_cookies() {
        let bundle = AuthBundle::new(
            vec![
                Cookie::new("good", "v1", ".example.org", "/"),
                Cookie::new("", "v2", ".example.org", "/"),
                Cookie::new("no-domain", "v3", "", "/"),
            ],
            "TestAgent/1.0",
        );
        let injectable: Vec<_> = bundle.injectable_cookies().collect();
        assert_eq!(injectable.len(), 1);
        assert_eq!(injectable[0].name, "good");
        assert_eq!(bundle.dropped_cookie_count(), 2);
    }

    #[test]
    fn test_bundle_json_round_trip() {
        let bundle = AuthBundle::new(
            vec![
                Cookie::new("session", "abc123", ".portal.example.org", "/"),
                Cookie::new("csrf", "xyz", "portal.example.org", "/upload"),
            ],
            "Mozilla/5.0 (X11; Linux x86_64)",
        );
        let json = serde_json::to_string(&bundle).unwrap();
        let restored: AuthBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, bundle);
    }

    #[test]
    fn test_bundle_deserializes_partial_entries_without_error() {
        // Entries missing required fields parse fine; they are filtered at use.
        let json = r#"{
            "cookies": [
                { "name": "only-name" },
                { "name": "full", "value": "v", "domain": ".example.org", "path": "/" }
            ],
            "user_agent": "UA"
        }"#;
        let bundle: AuthBundle = serde_json::from_str(json).unwrap();
        assert_eq!(bundle.cookies.len(), 2);
        assert_eq!(bundle.injectable_cookies().count(), 1);
    }

    #[test]
    fn test_bundle_missing_keys_default() {
        let bundle: AuthBundle = serde_json::from_str("{}").unwrap();
        assert!(bundle.cookies.is_empty());
        assert!(bundle.user_agent.is_empty());
    }
}
