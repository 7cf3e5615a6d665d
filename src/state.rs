// Shared application state
// Built once at startup and shared read-only across connections, so request
// handling never takes a lock.

use hyper::header::HeaderValue;

use crate::config::Config;
use crate::error::StartupError;
use crate::session::SessionValidator;
use crate::templates::TemplateSet;

/// Immutable application state injected into every request handler
pub struct AppState {
    pub config: Config,
    /// Pre-validated header value applied to every response
    pub cache_control: HeaderValue,
    /// Pre-validated Server header value
    pub server_name: HeaderValue,
    pub templates: TemplateSet,
    pub validator: Box<dyn SessionValidator>,
}

impl AppState {
    pub fn new(
        config: Config,
        templates: TemplateSet,
        validator: Box<dyn SessionValidator>,
    ) -> Result<Self, StartupError> {
        let cache_control = HeaderValue::from_str(&config.http.cache_control).map_err(|source| {
            StartupError::CacheControl {
                value: config.http.cache_control.clone(),
                source,
            }
        })?;
        let server_name = HeaderValue::from_str(&config.http.server_name).map_err(|source| {
            StartupError::ServerName {
                value: config.http.server_name.clone(),
                source,
            }
        })?;

        Ok(Self {
            config,
            cache_control,
            server_name,
            templates,
            validator,
        })
    }
}
