//! POST transport shared by every vip-core query.
//!
//! [`Transport::send`] posts a JSON body below the configured base URL and
//! retries incomplete requests and retryable statuses with a fixed delay.
//! [`Transport::post`] adds response validation and the per-call timing event.

use crate::config::VipCoreConfig;
use crate::error::VipCoreResult;
use crate::response::read_response;
use parking_lot::RwLock;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};
use url::Url;
use vipcore_common::{RetryPolicy, TransportError, build_http_client};

const APPLICATION_JSON: &str = "application/json";

/// Level at which the per-call timing event is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingLogLevel {
    /// `TRACE`
    Trace,
    /// `DEBUG`
    Debug,
    /// `INFO`
    #[default]
    Info,
    /// `WARN`
    Warn,
    /// `ERROR`
    Error,
}

impl TimingLogLevel {
    /// Upper-case name of the level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for TimingLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized timing log level name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown timing log level {0:?}, expected TRACE, DEBUG, INFO, WARN or ERROR")]
pub struct UnknownTimingLogLevel(pub String);

impl FromStr for TimingLogLevel {
    type Err = UnknownTimingLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Self::Trace),
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            _ => Err(UnknownTimingLogLevel(s.to_string())),
        }
    }
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl RawResponse {
    /// Create a response from its parts.
    #[must_use]
    pub const fn new(status: StatusCode, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Retrying JSON POST transport bound to one base URL.
///
/// The HTTP client handle is held until [`Transport::close`] or drop.
#[derive(Debug)]
pub struct Transport {
    http: RwLock<Option<Client>>,
    base_url: Url,
    retry: RetryPolicy,
    timing_log_level: TimingLogLevel,
}

impl Transport {
    /// Create a transport with a client built from `config.http`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &VipCoreConfig) -> Result<Self, TransportError> {
        let http = build_http_client(&config.http).map_err(TransportError::Client)?;
        Ok(Self::with_client(http, config))
    }

    /// Create a transport around an existing HTTP client.
    #[must_use]
    pub fn with_client(http: Client, config: &VipCoreConfig) -> Self {
        Self {
            http: RwLock::new(Some(http)),
            base_url: directory_url(&config.base_url),
            retry: RetryPolicy::new(config.retry.clone()),
            timing_log_level: config.timing_log_level,
        }
    }

    /// Base URL every path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// POST `body` to `path` and return the raw response.
    ///
    /// Statuses outside the retry set are returned as they are.
    ///
    /// # Errors
    ///
    /// Returns the last [`TransportError`] once retries are exhausted, or
    /// immediately for failures that are not retryable.
    pub async fn send<B>(&self, path: &str, body: &B) -> Result<RawResponse, TransportError>
    where
        B: Serialize + ?Sized,
    {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::invalid_url(path, e.to_string()))?;
        let payload = serde_json::to_vec(body)?;

        self.retry
            .execute(|| self.attempt(path, url.clone(), payload.clone()))
            .await
    }

    async fn attempt(
        &self,
        path: &str,
        url: Url,
        payload: Vec<u8>,
    ) -> Result<RawResponse, TransportError> {
        let http = self.client()?;
        let response = http
            .post(url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body(payload)
            .send()
            .await
            .map_err(|e| TransportError::request(path, e))?;

        let status = response.status();
        if self.retry.retries_status(status.as_u16()) {
            return Err(TransportError::server_error(path, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::request(path, e))?;
        Ok(RawResponse::new(status, body.to_vec()))
    }

    /// POST `request` to `path` and decode a 200 response as `T`.
    ///
    /// Emits one timing event per call, successful or not.
    ///
    /// # Errors
    ///
    /// Transport failures and every application error of
    /// [`read_response`].
    pub async fn post<Req, T>(&self, path: &str, request: &Req) -> VipCoreResult<T>
    where
        Req: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let started = Instant::now();
        let result = match self.send(path, request).await {
            Ok(response) => read_response(&response, StatusCode::OK),
            Err(err) => Err(err.into()),
        };
        log_timing(self.timing_log_level, path, started.elapsed());
        result
    }

    fn client(&self) -> Result<Client, TransportError> {
        self.http.read().clone().ok_or(TransportError::Closed)
    }

    /// Release the HTTP client. Safe to call more than once.
    pub fn close(&self) {
        if self.http.write().take().is_some() {
            debug!(base_url = %self.base_url, "Closed vip-core transport");
        }
    }

    /// Whether [`Transport::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.http.read().is_none()
    }
}

/// Make relative paths resolve below the base URL's last segment.
fn directory_url(base: &Url) -> Url {
    let mut url = base.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn log_timing(level: TimingLogLevel, path: &str, elapsed: Duration) {
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    match level {
        TimingLogLevel::Trace => {
            trace!(path, elapsed_ms, "POST /{path} took {elapsed_ms} milliseconds");
        }
        TimingLogLevel::Debug => {
            debug!(path, elapsed_ms, "POST /{path} took {elapsed_ms} milliseconds");
        }
        TimingLogLevel::Info => {
            info!(path, elapsed_ms, "POST /{path} took {elapsed_ms} milliseconds");
        }
        TimingLogLevel::Warn => {
            warn!(path, elapsed_ms, "POST /{path} took {elapsed_ms} milliseconds");
        }
        TimingLogLevel::Error => {
            error!(path, elapsed_ms, "POST /{path} took {elapsed_ms} milliseconds");
        }
    }
}
