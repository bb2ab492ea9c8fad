use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/data";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Loader settings. Statement CSVs are served from a fixed base path
/// (`{base_url}/{COMPANY}_{stmt}_quarterly.csv`); there is no parameterized
/// API behind it.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl LoaderConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults. Reads a `.env` file if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_url = env::var("FINDASH_DATA_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = env::var("FINDASH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Config pointing at an explicit base URL, defaults elsewhere.
    /// Used by tests and by callers that serve the data themselves.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_data() {
        let config = LoaderConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn with_base_url_overrides_only_the_url() {
        let config = LoaderConfig::with_base_url("http://127.0.0.1:9999/files");
        assert_eq!(config.base_url, "http://127.0.0.1:9999/files");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
