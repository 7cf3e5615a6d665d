// Configuration types
// All sections are resolved once at startup and immutable afterwards.

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
    pub session: SessionConfig,
    pub site: SiteConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (json, combined, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    /// Cache-Control value applied to every response, regardless of route
    pub cache_control: String,
    pub max_body_size: u64,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Session gate configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Name of the cookie carrying the opaque session token
    pub cookie_name: String,
    /// Base URL of the external identity service
    pub identity_base_url: String,
    /// Where unauthorized visitors are redirected to
    pub unauthorized_path: String,
    /// Timeout for the outbound validation call, in seconds
    pub validate_timeout: u64,
}

/// Template and static asset locations
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    pub template_dir: String,
    pub static_dir: String,
    pub static_prefix: String,
}
