// Configuration module entry point
// Layered loading: optional config.toml, SERVER_* environment overrides,
// programmatic defaults.

mod types;

use std::net::SocketAddr;

pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, SessionConfig, SiteConfig,
};

use crate::error::StartupError;

impl Config {
    /// Load configuration from "config.toml" plus environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "json")?
            .set_default("http.server_name", "Wicket/0.1")?
            .set_default("http.cache_control", "no-cache, no-store, must-revalidate")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("session.cookie_name", "session-token")?
            .set_default("session.identity_base_url", "http://127.0.0.1:8000")?
            .set_default("session.unauthorized_path", "/unauthorized")?
            .set_default("session.validate_timeout", 5)?
            .set_default("site.template_dir", "public/html")?
            .set_default("site.static_dir", "public/assets")?
            .set_default("site.static_prefix", "/static")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|source| StartupError::Addr { addr, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_sections() {
        let cfg = Config::load_from("nonexistent-config").expect("defaults should suffice");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.session.cookie_name, "session-token");
        assert_eq!(cfg.session.unauthorized_path, "/unauthorized");
        assert_eq!(cfg.site.static_prefix, "/static");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "json");
    }

    #[test]
    fn socket_addr_rejects_bad_host() {
        let mut cfg = Config::load_from("nonexistent-config").unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.socket_addr().is_err());
    }
}
