//! Startup error types
//!
//! Every failure here is fatal: the process aborts instead of attempting
//! runtime recovery. Request-level errors never surface through these types,
//! they are expressed directly as HTTP responses (404 or a redirect).

use std::net::SocketAddr;

use thiserror::Error;

use crate::templates::TemplateError;

/// Fatal errors that abort process startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}'")]
    Addr {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("failed to parse templates")]
    Template(#[from] TemplateError),

    #[error("invalid cache-control value '{value}' in [http] config")]
    CacheControl {
        value: String,
        source: hyper::header::InvalidHeaderValue,
    },

    #[error("invalid server_name value '{value}' in [http] config")]
    ServerName {
        value: String,
        source: hyper::header::InvalidHeaderValue,
    },

    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}
