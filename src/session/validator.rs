//! Remote session validation
//!
//! Asks the external identity service whether a session token is valid by
//! replaying the session cookie against its `/me` endpoint. The service owns
//! issuance, expiry and signatures; from here a token is just an opaque
//! string.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{SessionError, SessionValidator};
use crate::config::SessionConfig;
use crate::logger;

/// Identity payload returned for a valid session.
/// Only the fields used for logging are deserialized.
#[derive(Debug, Deserialize)]
struct SessionInfo {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Validator backed by an HTTP identity service
pub struct RemoteValidator {
    client: reqwest::Client,
    me_url: String,
    cookie_name: String,
}

impl RemoteValidator {
    pub fn from_config(config: &SessionConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.validate_timeout))
            .build()?;

        Ok(Self {
            client,
            me_url: format!(
                "{}/me",
                config.identity_base_url.trim_end_matches('/')
            ),
            cookie_name: config.cookie_name.clone(),
        })
    }
}

#[async_trait]
impl SessionValidator for RemoteValidator {
    async fn validate(&self, token: &str) -> Result<bool, SessionError> {
        let response = self
            .client
            .get(&self.me_url)
            .header("Cookie", format!("{}={token}", self.cookie_name))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // 401/403 is the expected answer for an expired or forged token.
            // Identity service errors (5xx) also deny: fail-closed.
            return Ok(false);
        }

        // The body is informational only; a valid status already decided.
        match response.json::<SessionInfo>().await {
            Ok(info) => {
                if let Some(id) = info.id {
                    logger::log_session_validated(&id, info.email.as_deref());
                }
            }
            Err(e) => {
                logger::log_warning(&format!("Identity service returned malformed body: {e}"));
            }
        }

        Ok(true)
    }
}
