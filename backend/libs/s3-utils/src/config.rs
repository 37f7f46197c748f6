/// S3 client configuration shared across services
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region override (falls back to the default provider chain)
    pub region: Option<String>,
    /// Custom endpoint (MinIO, LocalStack)
    pub endpoint: Option<String>,
    /// Whether to use path-style URLs (false = virtual-hosted-style)
    pub path_style: bool,
}

impl S3Config {
    /// Load S3 configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load S3 configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            region: lookup("AWS_REGION").filter(|v| !v.trim().is_empty()),
            endpoint: lookup("S3_ENDPOINT").filter(|v| !v.trim().is_empty()),
            path_style: lookup("S3_PATH_STYLE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(false),
        }
    }
}
