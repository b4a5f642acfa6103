//! Client configuration read from the environment.

use std::time::Duration;

use serde::Deserialize;

/// Default API location when `UNIWAYS_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables as read by `serde-env`.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    uniways_api_url: Option<String>,
    uniways_request_timeout_secs: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read environment: {0}")]
    Env(String),

    #[error("UNIWAYS_API_URL must start with http:// or https://, got `{0}`")]
    InvalidApiUrl(String),

    #[error("UNIWAYS_REQUEST_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    api_base_url: String,
    request_timeout: Duration,
}

impl BusinessConfig {
    /// Config pointing at `base_url` with the default timeout.
    ///
    /// A trailing `/` is dropped so routes can be appended as `{base}/usuarios/`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&base_url.into()),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Load from an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        // Only `UNIWAYS_*` variables take part in deserialization.
        let ours: Vec<(String, String)> = vars
            .into_iter()
            .filter(|(k, _)| k.as_ref().starts_with("UNIWAYS_"))
            .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned()))
            .collect();

        let raw: RawConfig =
            serde_env::from_iter(ours).map_err(|e| ConfigError::Env(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let RawConfig {
            uniways_api_url,
            uniways_request_timeout_secs,
        } = raw;

        let api_base_url = match uniways_api_url {
            Some(url) if !url.trim().is_empty() => {
                let url = url.trim().to_owned();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidApiUrl(url));
                }
                log::info!("Using UNIWAYS_API_URL: {url}");
                url
            }
            _ => {
                log::debug!("UNIWAYS_API_URL not set, defaulting to {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_owned()
            }
        };

        let request_timeout = match uniways_request_timeout_secs {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self::new(api_base_url).with_timeout(request_timeout))
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}
