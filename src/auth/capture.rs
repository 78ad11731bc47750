//! Browser cookie export parsing for the interactive login flow.
//!
//! Accepts the payload a cookie export extension produces after the operator
//! logs in: either a bare JSON array of cookie objects, or the wrapped form
//! `{ "cookies": [...], "user_agent": "..." }` (the same shape the credential
//! store persists).

use serde::Deserialize;
use tracing::instrument;

use super::bundle::{AuthBundle, Cookie};

/// Parsed and validated capture input.
#[derive(Debug)]
pub struct CapturedBundle {
    /// The resulting bundle; only injectable cookies are retained.
    pub bundle: AuthBundle,
    /// Non-fatal warnings for entries that were dropped.
    pub warnings: Vec<String>,
}

/// Errors that can occur while parsing cookie capture input.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Input was empty.
    #[error("cookie input is empty")]
    EmptyInput,
    /// JSON parser failed.
    #[error("invalid cookie JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// No valid cookies remained after validation.
    #[error("no valid cookies found after validation")]
    NoValidCookies,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CapturePayload {
    Wrapped {
        #[serde(default)]
        cookies: Vec<JsonCookieEntry>,
        #[serde(default)]
        user_agent: Option<String>,
    },
    Array(Vec<JsonCookieEntry>),
}

#[derive(Deserialize)]
struct JsonCookieEntry {
    name: Option<String>,
    value: Option<String>,
    domain: Option<String>,
    path: Option<String>,
}

/// Parses a pasted cookie export into an [`AuthBundle`].
///
/// Entries missing name, value, or domain are dropped with a warning rather
/// than failing the capture; the login portal exports auxiliary entries the
/// download session never needs.
///
/// # Errors
///
/// Returns [`CaptureError`] when input is empty, is not JSON, or yields zero
/// usable cookies.
#[instrument(level = "debug", skip(input))]
pub fn parse_captured_bundle(input: &str) -> Result<CapturedBundle, CaptureError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CaptureError::EmptyInput);
    }

    let payload: CapturePayload = serde_json::from_str(trimmed)?;
    let (entries, user_agent) = match payload {
        CapturePayload::Wrapped {
            cookies,
            user_agent,
        } => (cookies, user_agent.unwrap_or_default()),
        CapturePayload::Array(entries) => (entries, String::new()),
    };

    let mut cookies = Vec::new();
    let mut warnings = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let cookie = Cookie::new(
            entry.name.unwrap_or_default(),
            entry.value.unwrap_or_default(),
            entry.domain.unwrap_or_default(),
            entry.path.unwrap_or_default(),
        );
        if cookie.is_injectable() {
            cookies.push(cookie);
        } else {
            warnings.push(format!(
                "entry {}: missing name, value, or domain — dropped",
                index + 1
            ));
        }
    }

    if cookies.is_empty() {
        return Err(CaptureError::NoValidCookies);
    }

    Ok(CapturedBundle {
        bundle: AuthBundle::new(cookies, user_agent),
        warnings,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_payload() {
        let input = r#"{
            "cookies": [
                { "name": "session", "value": "abc", "domain": ".portal.example.org", "path": "/" }
            ],
            "user_agent": "Mozilla/5.0 (X11)"
        }"#;
        let captured = parse_captured_bundle(input).unwrap();
        assert_eq!(captured.bundle.cookies.len(), 1);
        assert_eq!(captured.bundle.user_agent, "Mozilla/5.0 (X11)");
        assert!(captured.warnings.is_empty());
    }

    #[test]
    fn test_parse_bare_array_payload() {
        let input = r#"[
            { "name": "a", "value": "1", "domain": ".example.org" },
            { "name": "b", "value": "2", "domain": "example.org", "path": "/upload" }
        ]"#;
        let captured = parse_captured_bundle(input).unwrap();
        assert_eq!(captured.bundle.cookies.len(), 2);
        assert!(captured.bundle.user_agent.is_empty());
        assert_eq!(captured.bundle.cookies[1].path, "/upload");
    }

    #[test]
    fn test_parse_drops_incomplete_entries_with_warnings() {
        let input = r#"[
            { "name": "good", "value": "1", "domain": ".example.org" },
            { "name": "no-value", "domain": ".example.org" },
            { "value": "orphan" }
        ]"#;
        let captured = parse_captured_bundle(input).unwrap();
        assert_eq!(captured.bundle.cookies.len(), 1);
        assert_eq!(captured.warnings.len(), 2);
        assert!(captured.warnings[0].contains("entry 2"));
    }

    #[test]
    fn test_parse_empty_input_rejected() {
        assert!(matches!(
            parse_captured_bundle("   "),
            Err(CaptureError::EmptyInput)
        ));
    }

    #[test]
    fn test_parse_non_json_rejected() {
        assert!(matches!(
            parse_captured_bundle("not json at all"),
            Err(CaptureError::Json(_))
        ));
    }

    #[test]
    fn test_parse_all_invalid_rejected() {
        let input = r#"[ { "name": "x" }, { "value": "y" } ]"#;
        assert!(matches!(
            parse_captured_bundle(input),
            Err(CaptureError::NoValidCookies)
        ));
    }

    #[test]
    fn test_parse_missing_path_defaults_to_root() {
        let input = r#"[ { "name": "a", "value": "1", "domain": ".example.org" } ]"#;
        let captured = parse_captured_bundle(input).unwrap();
        assert_eq!(captured.bundle.cookies[0].path, "/");
    }
}
