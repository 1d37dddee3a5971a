//! Settings for the shared reqwest client.

use reqwest::Client;
use std::time::Duration;

/// Default limit for a whole request, body included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default limit for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeouts, pooling and identification of outgoing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Limit for a whole request
    pub request_timeout: Duration,
    /// Limit for establishing a connection
    pub connect_timeout: Duration,
    /// How long idle pooled connections are kept; `None` keeps reqwest's default
    pub pool_idle_timeout: Option<Duration>,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pool_idle_timeout: None,
            user_agent: format!("vipcore-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set how long idle connections stay pooled.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Build a rustls-backed client from `config`.
///
/// # Errors
///
/// Fails when the TLS backend cannot be initialized.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vipcore_common::{HttpConfig, build_http_client};
///
/// let config = HttpConfig::default().with_request_timeout(Duration::from_secs(5));
/// assert!(build_http_client(&config).is_ok());
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .use_rustls_tls()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout);

    if let Some(idle) = config.pool_idle_timeout {
        builder = builder.pool_idle_timeout(idle);
    }

    builder.build()
}
