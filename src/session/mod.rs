//! Session gate
//!
//! The single decision point of the server: given an incoming request, decide
//! whether a valid session cookie is present. Token validity is owned by an
//! external identity service; this module only extracts the cookie and asks.
//! An indeterminate answer (transport failure) counts as "deny" (fail-closed).

mod validator;

use async_trait::async_trait;
use thiserror::Error;

pub use validator::RemoteValidator;

use crate::logger;

/// Errors from the external validation call
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("identity service request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Validates opaque session tokens against an identity backend.
///
/// Kept as a trait so the gate can be tested with a stub collaborator
/// instead of a running identity service.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<bool, SessionError>;
}

/// Decide whether a request carrying `token` may proceed.
///
/// Absent token, invalid token, and a failed validation call all yield
/// `false`. The validation result is not cached and there are no retries.
pub async fn authorize(validator: &dyn SessionValidator, token: Option<&str>) -> bool {
    let Some(token) = token else {
        return false;
    };
    if token.is_empty() {
        return false;
    }

    match validator.validate(token).await {
        Ok(valid) => valid,
        Err(e) => {
            logger::log_warning(&format!("Session validation failed, denying access: {e}"));
            false
        }
    }
}

/// Extract the value of the named cookie from a `Cookie` header value
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// `Set-Cookie` value that clears the named session cookie.
///
/// Empty value with immediate expiry, scoped to the whole site and hidden
/// from scripts.
pub fn clearing_cookie(name: &str) -> String {
    format!("{name}=; Max-Age=0; HttpOnly; Path=/")
}
