//! Destination layout: group sanitization and per-file paths.
//!
//! Files land at `<base_dir>/<safe_group>/<original_name>`. The group name
//! comes from portal metadata and may contain anything; it is reduced to a
//! filesystem-safe form here. The original file name is used verbatim, as
//! the portal serves it.

use std::path::{Path, PathBuf};

/// Group directory used when an entry has no usable group name.
pub const FALLBACK_GROUP: &str = "Others";

/// Reduces a portal group name to a filesystem-safe directory name.
///
/// Characters outside `[A-Za-z0-9 _\-.]` become underscores, leading and
/// trailing whitespace is trimmed, and interior spaces become underscores.
/// A result with nothing left but underscores (including the empty result)
/// maps to [`FALLBACK_GROUP`]. The function is idempotent.
#[must_use]
pub fn sanitize_group_name(group: &str) -> String {
    let filtered: String = group
        .chars()
        .map(|c| match c {
            c if c.is_ascii_alphanumeric() => c,
            ' ' | '_' | '-' | '.' => c,
            _ => '_',
        })
        .collect();

    let cleaned: String = filtered
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    if cleaned.chars().all(|c| c == '_') {
        FALLBACK_GROUP.to_string()
    } else {
        cleaned
    }
}

/// Builds the destination path for one manifest entry.
///
/// An absent group maps to the fallback group directory.
#[must_use]
pub fn destination_for(base_dir: &Path, group: Option<&str>, original_name: &str) -> PathBuf {
    base_dir
        .join(sanitize_group_name(group.unwrap_or_default()))
        .join(original_name)
}

/// The in-progress sibling a download streams into before the final rename.
#[must_use]
pub(crate) fn part_path(dest: &Path) -> PathBuf {
    let mut os = dest.as_os_str().to_os_string();
    os.push(".part");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_group_name("Working-Group_1.2"), "Working-Group_1.2");
    }

    #[test]
    fn test_sanitize_replaces_invalid_characters() {
        assert_eq!(sanitize_group_name("WG/SWG: #7"), "WG_SWG___7");
    }

    #[test]
    fn test_sanitize_trims_and_replaces_spaces() {
        assert_eq!(sanitize_group_name("  Plenary Session  "), "Plenary_Session");
    }

    #[test]
    fn test_sanitize_all_invalid_maps_to_fallback() {
        assert_eq!(sanitize_group_name("###"), FALLBACK_GROUP);
        assert_eq!(sanitize_group_name(""), FALLBACK_GROUP);
        assert_eq!(sanitize_group_name("   "), FALLBACK_GROUP);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for input in [
            "Working Group 7",
            "WG/SWG: #7",
            "###",
            "",
            "  spaced  out  ",
            "unicode-café",
            "Others",
        ] {
            let once = sanitize_group_name(input);
            assert_eq!(
                sanitize_group_name(&once),
                once,
                "not idempotent for {input:?}"
            );
        }
    }

    #[test]
    fn test_sanitize_non_ascii_replaced() {
        assert_eq!(sanitize_group_name("café"), "caf_");
    }

    #[test]
    fn test_destination_layout() {
        let dest = destination_for(Path::new("downloads"), Some("WG 7"), "minutes.pdf");
        assert_eq!(dest, Path::new("downloads/WG_7/minutes.pdf"));
    }

    #[test]
    fn test_destination_missing_group_uses_fallback() {
        let dest = destination_for(Path::new("downloads"), None, "minutes.pdf");
        assert_eq!(dest, Path::new("downloads/Others/minutes.pdf"));
    }

    #[test]
    fn test_part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("downloads/WG/minutes.pdf")),
            Path::new("downloads/WG/minutes.pdf.part")
        );
    }
}
