//! Width resolution from object metadata

use crate::error::{ResizeError, Result};
use s3_utils::ObjectMetadata;

/// Metadata names are `width1`, `width2`, ...
pub const WIDTH_METADATA_PREFIX: &str = "width";

/// Highest metadata index consulted
pub const MAX_WIDTH_ENTRIES: usize = 5;

/// Resolve the ordered list of target widths for an object.
///
/// Reads `width1..=width5` in order and stops at the first missing index, so
/// `width1` + `width3` yields only `width1`. Without `width1` the result is
/// `[default_width]`. A present value that is not a positive integer fails the
/// whole resolution.
pub fn resolve_widths(metadata: &ObjectMetadata, default_width: u32) -> Result<Vec<u32>> {
    let mut widths = Vec::with_capacity(MAX_WIDTH_ENTRIES);

    for index in 1..=MAX_WIDTH_ENTRIES {
        let name = format!("{WIDTH_METADATA_PREFIX}{index}");
        let Some(value) = metadata.get(&name) else {
            break;
        };
        widths.push(parse_width(&name, value)?);
    }

    if widths.is_empty() {
        widths.push(default_width);
    }

    Ok(widths)
}

fn parse_width(name: &str, value: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(width) if width > 0 => Ok(width),
        _ => Err(ResizeError::InvalidWidth {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(pairs: &[(&str, &str)]) -> ObjectMetadata {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_default_when_no_width_metadata() {
        let widths = resolve_widths(&metadata(&[("author", "kim")]), 300).unwrap();
        assert_eq!(widths, vec![300]);
    }

    #[test]
    fn test_consecutive_prefix() {
        let widths =
            resolve_widths(&metadata(&[("width1", "100"), ("width2", "200")]), 300).unwrap();
        assert_eq!(widths, vec![100, 200]);
    }

    #[test]
    fn test_gap_stops_resolution() {
        let widths =
            resolve_widths(&metadata(&[("width1", "100"), ("width3", "300")]), 50).unwrap();
        assert_eq!(widths, vec![100]);
    }

    #[test]
    fn test_missing_first_index_uses_default() {
        let widths = resolve_widths(&metadata(&[("width2", "200")]), 300).unwrap();
        assert_eq!(widths, vec![300]);
    }

    #[test]
    fn test_capped_at_five_entries() {
        let widths = resolve_widths(
            &metadata(&[
                ("width1", "10"),
                ("width2", "20"),
                ("width3", "30"),
                ("width4", "40"),
                ("width5", "50"),
                ("width6", "60"),
            ]),
            300,
        )
        .unwrap();
        assert_eq!(widths, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_malformed_value_is_fatal() {
        let err = resolve_widths(&metadata(&[("width1", "100"), ("width2", "abc")]), 300)
            .unwrap_err();
        match err {
            ResizeError::InvalidWidth { name, value } => {
                assert_eq!(name, "width2");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_and_negative_rejected() {
        assert!(resolve_widths(&metadata(&[("width1", "0")]), 300).is_err());
        assert!(resolve_widths(&metadata(&[("width1", "-20")]), 300).is_err());
    }

    #[test]
    fn test_whitespace_tolerated() {
        let widths = resolve_widths(&metadata(&[("width1", " 150 ")]), 300).unwrap();
        assert_eq!(widths, vec![150]);
    }
}
