//! vip-core error types using thiserror 2.0.
//!
//! Failures fall into disjoint categories: the transport never produced a
//! usable response ([`TransportError`]), the service answered but reported a
//! problem or broke its response contract ([`ApplicationError`]), or the
//! client was configured wrongly ([`ConfigError`]).

use crate::config::ConfigError;
use thiserror::Error;
use vipcore_common::TransportError;

/// Problems reported by vip-core, or responses that violate its contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// `authentication_error`
    #[error("vip-core authentication error")]
    AuthenticationError,

    /// `service_unavailable`
    #[error("vip-core service unavailable")]
    ServiceUnavailable,

    /// `agency_not_found`
    #[error("Agency not found")]
    AgencyNotFound,

    /// `error_in_request`
    #[error("Error in request")]
    ErrorInRequest,

    /// `no_agencies_found`
    #[error("No agencies found")]
    NoAgenciesFound,

    /// `no_userid_selected`
    #[error("No user id selected")]
    NoUserIdSelected,

    /// `profile_not_found`
    #[error("Profile not found")]
    ProfileNotFound,

    /// The call succeeded but the response held no rules for the agency
    #[error("Could not find library rules for agency {agency_id}")]
    NoMatchingAgencyInResponse {
        /// Requested agency
        agency_id: String,
    },

    /// The response body was empty, null or not the expected shape
    #[error("vip-core returned an undecodable {target} body: {reason}")]
    Decode {
        /// Name of the expected type
        target: &'static str,
        /// What went wrong
        reason: String,
    },

    /// An error code outside the known table
    #[error("vip-core error: {0}")]
    Unknown(String),
}

impl ApplicationError {
    /// Map a vip-core error code to its typed error.
    ///
    /// # Examples
    ///
    /// ```
    /// use vipcore_client::ApplicationError;
    ///
    /// assert_eq!(
    ///     ApplicationError::from_code("agency_not_found"),
    ///     ApplicationError::AgencyNotFound
    /// );
    /// assert_eq!(
    ///     ApplicationError::from_code("quota_exceeded"),
    ///     ApplicationError::Unknown("quota_exceeded".to_string())
    /// );
    /// ```
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "authentication_error" => Self::AuthenticationError,
            "service_unavailable" => Self::ServiceUnavailable,
            "agency_not_found" => Self::AgencyNotFound,
            "error_in_request" => Self::ErrorInRequest,
            "no_agencies_found" => Self::NoAgenciesFound,
            "no_userid_selected" => Self::NoUserIdSelected,
            "profile_not_found" => Self::ProfileNotFound,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The wire code of this error, if it came from the service.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::AuthenticationError => Some("authentication_error"),
            Self::ServiceUnavailable => Some("service_unavailable"),
            Self::AgencyNotFound => Some("agency_not_found"),
            Self::ErrorInRequest => Some("error_in_request"),
            Self::NoAgenciesFound => Some("no_agencies_found"),
            Self::NoUserIdSelected => Some("no_userid_selected"),
            Self::ProfileNotFound => Some("profile_not_found"),
            Self::Unknown(code) => Some(code.as_str()),
            Self::NoMatchingAgencyInResponse { .. } | Self::Decode { .. } => None,
        }
    }

    /// Create a decode error for the given target type.
    #[must_use]
    pub fn decode(target: &'static str, reason: impl Into<String>) -> Self {
        Self::Decode {
            target,
            reason: reason.into(),
        }
    }
}

/// Every failure a vip-core call can produce.
#[derive(Error, Debug)]
pub enum VipCoreError {
    /// No usable response after the retry budget
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service reported a problem
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Invalid client configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for vip-core operations.
pub type VipCoreResult<T> = Result<T, VipCoreError>;

impl VipCoreError {
    /// The application error, if this is one.
    #[must_use]
    pub const fn as_application(&self) -> Option<&ApplicationError> {
        match self {
            Self::Application(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the request failed at the transport level.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
