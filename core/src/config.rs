//! Client configuration.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://betterpick.dvdblk.com/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

pub const BASE_URL_ENV: &str = "BETTERPICK_BASE_URL";
pub const TIMEOUT_ENV: &str = "BETTERPICK_TIMEOUT_SECS";

/// Where requests go and how long a transport may wait for them.
///
/// A `timeout` of `None` leaves the transport's own default in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Defaults overridden by `BETTERPICK_BASE_URL` and
    /// `BETTERPICK_TIMEOUT_SECS`. A timeout of `0` disables it; an
    /// unparsable timeout is ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(0) => config.timeout = None,
                Ok(secs) => config.timeout = Some(Duration::from_secs(secs)),
                Err(_) => warn!(value = %raw, "ignoring unparsable {TIMEOUT_ENV}"),
            }
        }
        config
    }
}
