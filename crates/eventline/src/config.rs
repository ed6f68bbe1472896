use crate::error::Error;
use std::env;
use std::time::Duration;
use tracing::error;
use url::Url;

/// Default number of buffered envelopes that triggers a flush.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 10;

/// Default timeout for a single delivery attempt.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the telemetry client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Collection endpoint. `None` means the client is uninitialized and
    /// flushes are warn-and-skip no-ops.
    pub endpoint: Option<Url>,
    /// Buffer length at or above which an append triggers a flush.
    pub flush_threshold: usize,
    /// Timeout applied to each delivery request.
    pub flush_timeout: Duration,
    /// Value of the `platform` attribute stamped on every envelope.
    pub platform: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            platform: env::consts::OS.to_string(),
        }
    }
}

impl Config {
    /// Create a configuration pointing at `endpoint`.
    ///
    /// An unparseable URL leaves the endpoint unset rather than failing:
    /// the client still accepts events, but flushes become no-ops until a
    /// valid endpoint is supplied.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: parse_endpoint(endpoint),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `EVENTLINE_ENDPOINT`, `EVENTLINE_FLUSH_THRESHOLD` and
    /// `EVENTLINE_PLATFORM`; unset or unparseable values fall back to
    /// defaults.
    pub fn from_env() -> Result<Self, Error> {
        let endpoint = env::var("EVENTLINE_ENDPOINT")
            .ok()
            .and_then(|raw| parse_endpoint(&raw));
        let flush_threshold = env::var("EVENTLINE_FLUSH_THRESHOLD")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .unwrap_or(DEFAULT_FLUSH_THRESHOLD);
        let platform =
            env::var("EVENTLINE_PLATFORM").unwrap_or_else(|_| env::consts::OS.to_string());

        let config = Self {
            endpoint,
            flush_threshold,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            platform,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if self.flush_threshold == 0 {
            return Err(Error::InvalidConfig(
                "flush threshold must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_endpoint(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            error!("Failed to parse endpoint URL {raw:?}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.endpoint.is_none());
        assert_eq!(config.flush_threshold, DEFAULT_FLUSH_THRESHOLD);
        assert_eq!(config.flush_timeout, DEFAULT_FLUSH_TIMEOUT);
        assert!(!config.platform.is_empty());
    }

    #[test]
    fn test_new_with_valid_endpoint() {
        let config = Config::new("https://example.test/collect");
        let endpoint = config.endpoint.expect("endpoint should parse");
        assert_eq!(endpoint.as_str(), "https://example.test/collect");
    }

    #[test]
    fn test_new_with_invalid_endpoint_leaves_unconfigured() {
        let config = Config::new("not a url at all");
        assert!(config.endpoint.is_none());
        // Everything else still usable
        assert_eq!(config.flush_threshold, DEFAULT_FLUSH_THRESHOLD);
    }

    #[test]
    fn test_validate_rejects_zero_threshold() {
        let config = Config {
            flush_threshold: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_default() {
        assert!(Config::default().validate().is_ok());
    }
}
