//! Response validation and error-code mapping.
//!
//! A response carrying the expected status is decoded as the caller's type;
//! any other status must carry `{"error": "<code>"}`, which is mapped to an
//! [`ApplicationError`]. There is no path that ignores a response.

use crate::error::{ApplicationError, VipCoreResult};
use crate::models::ErrorMessage;
use crate::transport::RawResponse;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Validate `response` against `expected` and decode its body.
///
/// # Errors
///
/// - [`ApplicationError::Decode`] if the body is empty, `null` or malformed
/// - the mapped [`ApplicationError`] for any other status
pub fn read_response<T: DeserializeOwned>(
    response: &RawResponse,
    expected: StatusCode,
) -> VipCoreResult<T> {
    if response.status() == expected {
        return Ok(decode_entity(response.body())?);
    }

    let message: ErrorMessage = decode_entity(response.body())?;
    debug!(
        status = response.status().as_u16(),
        code = %message.error,
        "vip-core rejected request"
    );
    Err(ApplicationError::from_code(&message.error).into())
}

fn decode_entity<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApplicationError> {
    let target = short_type_name::<T>();

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApplicationError::decode(target, "empty body"));
    }

    match serde_json::from_slice::<Option<T>>(body) {
        Ok(Some(entity)) => Ok(entity),
        Ok(None) => Err(ApplicationError::decode(target, "null-valued entity")),
        Err(e) => Err(ApplicationError::decode(target, e.to_string())),
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
