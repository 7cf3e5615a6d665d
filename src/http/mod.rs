//! HTTP protocol layer
//!
//! Response builders, cache validation and MIME detection, decoupled from
//! routing and business logic.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

pub use range::parse_range_header;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_416_response, build_html_response, build_logout_response, build_options_response,
    build_redirect_response,
};
