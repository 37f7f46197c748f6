//! Output key derivation
//!
//! `photos/sunset_raw.jpg` at width 150 becomes `photos/sunset_150.jpg`, and
//! its WebP sibling `photos/sunset_150.webp`. Keys depend only on the source
//! key and the width, so redelivered events overwrite the same objects.

/// Substring of the source key replaced by `_<width>`
pub const RAW_MARKER: &str = "_raw";

pub const WEBP_EXTENSION: &str = ".webp";

/// Destination key of the JPEG thumbnail.
///
/// Every occurrence of [`RAW_MARKER`] is replaced. A key without the marker is
/// returned unchanged, so all widths share it and the last one wins.
pub fn baseline_key(source_key: &str, width: u32) -> String {
    source_key.replace(RAW_MARKER, &format!("_{width}"))
}

/// Destination key of the WebP thumbnail.
///
/// Replaces the *source* key's extension wherever it occurs in the baseline
/// key. Appends [`WEBP_EXTENSION`] when the source key has no extension.
pub fn secondary_key(source_key: &str, baseline_key: &str) -> String {
    match source_extension(source_key) {
        "" => format!("{baseline_key}{WEBP_EXTENSION}"),
        extension => baseline_key.replace(extension, WEBP_EXTENSION),
    }
}

/// Extension of the last path segment including the dot, or `""`.
pub fn source_extension(key: &str) -> &str {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() => &file_name[dot..],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_replaces_marker() {
        assert_eq!(baseline_key("photos/sunset_raw.jpg", 300), "photos/sunset_300.jpg");
        assert_eq!(baseline_key("photos/sunset_raw.jpg", 150), "photos/sunset_150.jpg");
    }

    #[test]
    fn test_baseline_injective_over_widths() {
        let keys: std::collections::HashSet<String> = [100, 200, 300, 1000]
            .into_iter()
            .map(|w| baseline_key("a/b_raw.png", w))
            .collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_baseline_without_marker_is_unchanged() {
        assert_eq!(baseline_key("photos/sunset.jpg", 150), "photos/sunset.jpg");
        assert_eq!(baseline_key("photos/sunset.jpg", 600), "photos/sunset.jpg");
    }

    #[test]
    fn test_baseline_replaces_every_marker() {
        assert_eq!(baseline_key("x_raw/y_raw.jpg", 64), "x_64/y_64.jpg");
    }

    #[test]
    fn test_secondary_swaps_extension() {
        let baseline = baseline_key("photos/sunset_raw.jpg", 150);
        assert_eq!(secondary_key("photos/sunset_raw.jpg", &baseline), "photos/sunset_150.webp");
    }

    #[test]
    fn test_secondary_replaces_every_occurrence() {
        let baseline = baseline_key("a.png/b_raw.png", 10);
        assert_eq!(secondary_key("a.png/b_raw.png", &baseline), "a.webp/b_10.webp");
    }

    #[test]
    fn test_secondary_without_extension_appends() {
        let baseline = baseline_key("photos/sunset_raw", 150);
        assert_eq!(secondary_key("photos/sunset_raw", &baseline), "photos/sunset_150.webp");
    }

    #[test]
    fn test_source_extension() {
        assert_eq!(source_extension("photos/sunset_raw.jpg"), ".jpg");
        assert_eq!(source_extension("photos/archive.tar.gz"), ".gz");
        assert_eq!(source_extension("photos.d/sunset"), "");
        assert_eq!(source_extension("photos/sunset."), "");
        assert_eq!(source_extension(".hidden"), ".hidden");
    }
}
