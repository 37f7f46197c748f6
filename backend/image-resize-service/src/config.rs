//! Configuration management for image-resize-service
//!
//! Resolved once per process from environment variables and injected into the
//! thumbnail service. Unparseable values fall back to their defaults.

/// WebP quality when `Quality` is unset or invalid
pub const DEFAULT_QUALITY: u8 = 80;

/// Thumbnail width when the object carries no `width1` metadata
pub const DEFAULT_WIDTH: u32 = 300;

/// Widths processed concurrently when `MaxConcurrency` is unset
pub const DEFAULT_MAX_CONCURRENCY: usize = 1;

/// Encoding options applied to every width
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodingConfig {
    /// WebP quality (0-100). JPEG output always uses the encoder default.
    pub quality: u8,
    /// Emit a WebP variant next to every JPEG
    pub emit_webp: bool,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            emit_webp: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResizeConfig {
    pub encoding: EncodingConfig,
    pub default_width: u32,
    /// Upper bound on widths in flight at once (1 = sequential)
    pub max_concurrency: usize,
    /// Delete this invocation's uploads when a later step fails
    pub rollback_on_failure: bool,
    /// Process every record of a batched notification, not only the first
    pub process_all_records: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            encoding: EncodingConfig::default(),
            default_width: DEFAULT_WIDTH,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            rollback_on_failure: false,
            process_all_records: false,
        }
    }
}

impl ResizeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let quality = lookup("Quality")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|q| q.clamp(0, 100) as u8)
            .unwrap_or(DEFAULT_QUALITY);

        Self {
            encoding: EncodingConfig {
                quality,
                emit_webp: lookup("IsWebP")
                    .and_then(|v| parse_bool(&v))
                    .unwrap_or(false),
            },
            default_width: lookup("Width")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|w| *w > 0)
                .unwrap_or(DEFAULT_WIDTH),
            max_concurrency: lookup("MaxConcurrency")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_CONCURRENCY),
            rollback_on_failure: lookup("RollbackOnFailure")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
            process_all_records: lookup("ProcessAllRecords")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ResizeConfig {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        ResizeConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config, ResizeConfig::default());
        assert_eq!(config.encoding.quality, 80);
        assert_eq!(config.default_width, 300);
        assert!(!config.encoding.emit_webp);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("Quality", "70"),
            ("IsWebP", "True"),
            ("Width", "640"),
            ("MaxConcurrency", "4"),
            ("RollbackOnFailure", "true"),
            ("ProcessAllRecords", " TRUE "),
        ]);

        assert_eq!(config.encoding.quality, 70);
        assert!(config.encoding.emit_webp);
        assert_eq!(config.default_width, 640);
        assert_eq!(config.max_concurrency, 4);
        assert!(config.rollback_on_failure);
        assert!(config.process_all_records);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("Quality", "high"),
            ("IsWebP", "yes"),
            ("Width", "0"),
            ("MaxConcurrency", "0"),
        ]);

        assert_eq!(config, ResizeConfig::default());
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(config_from(&[("Quality", "250")]).encoding.quality, 100);
        assert_eq!(config_from(&[("Quality", "-5")]).encoding.quality, 0);
    }
}
