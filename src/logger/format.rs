//! Access log formats
//!
//! One line per request. Formats:
//! - `json` (default) — structured, mirrors the upstream logger fields
//! - `combined` — Apache/Nginx combined log format
//! - anything else — custom pattern with `$var` substitution

use chrono::Local;

/// Everything the access logger records about one request/response pair
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client socket address
    pub remote_addr: String,
    /// Time the request was received
    pub time: chrono::DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub latency_us: u64,
}

impl AccessLogEntry {
    pub fn format(&self, format: &str) -> String {
        match format {
            "json" => self.format_json(),
            "combined" => self.format_combined(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        self.query
            .as_ref()
            .map_or_else(|| self.path.clone(), |q| format!("{}?{q}", self.path))
    }

    /// Structured JSON line, field names matching the original logger
    fn format_json(&self) -> String {
        let opt = |v: &Option<String>| {
            v.as_deref().map_or_else(|| "null".to_string(), json_str)
        };

        format!(
            r#"{{"time":{},"remote_addr":{},"method":{},"uri":{},"http_version":{},"status":{},"bytes_out":{},"latency_us":{},"referer":{},"user_agent":{}}}"#,
            json_str(&self.time.to_rfc3339()),
            json_str(&self.remote_addr),
            json_str(&self.method),
            json_str(&self.request_uri()),
            json_str(&self.http_version),
            self.status,
            self.body_bytes,
            self.latency_us,
            opt(&self.referer),
            opt(&self.user_agent),
        )
    }

    /// Apache/Nginx combined log format
    fn format_combined(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {} \"{}\" \"{}\"",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes,
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// Custom pattern substitution.
    ///
    /// Supported variables: `$remote_addr`, `$time_iso8601`, `$request_method`,
    /// `$request_uri`, `$status`, `$body_bytes_sent`, `$request_time`,
    /// `$http_referer`, `$http_user_agent`.
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.latency_us as f64 / 1_000_000.0;

        // Longer names first so $request_uri is not clobbered by $request_time
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$request_method", &self.method)
            .replace("$request_uri", &self.request_uri())
            .replace("$request_time", &format!("{request_time:.3}"))
            .replace("$body_bytes_sent", &self.body_bytes.to_string())
            .replace("$status", &self.status.to_string())
            .replace("$http_referer", self.referer.as_deref().unwrap_or("-"))
            .replace(
                "$http_user_agent",
                self.user_agent.as_deref().unwrap_or("-"),
            )
    }
}

/// Quote and escape a JSON string value
fn json_str(s: &str) -> String {
    // Serializing a str cannot fail
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> AccessLogEntry {
        AccessLogEntry {
            remote_addr: "10.0.0.1:51234".to_string(),
            time: Local::now(),
            method: "GET".to_string(),
            path: "/secured".to_string(),
            query: Some("tab=profile".to_string()),
            http_version: "1.1".to_string(),
            status: 307,
            body_bytes: 0,
            referer: Some("http://localhost:8080/".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            latency_us: 2500,
        }
    }

    #[test]
    fn json_has_all_fields() {
        let line = entry().format("json");
        assert!(line.contains(r#""remote_addr":"10.0.0.1:51234""#));
        assert!(line.contains(r#""method":"GET""#));
        assert!(line.contains(r#""uri":"/secured?tab=profile""#));
        assert!(line.contains(r#""status":307"#));
        assert!(line.contains(r#""bytes_out":0"#));
        assert!(line.contains(r#""latency_us":2500"#));
    }

    #[test]
    fn json_null_for_missing_headers() {
        let mut e = entry();
        e.referer = None;
        e.user_agent = None;
        let line = e.format("json");
        assert!(line.contains(r#""referer":null"#));
        assert!(line.contains(r#""user_agent":null"#));
    }

    #[test]
    fn combined_format_shape() {
        let line = entry().format("combined");
        assert!(line.contains("GET /secured?tab=profile HTTP/1.1"));
        assert!(line.contains("307 0"));
        assert!(line.contains("\"Mozilla/5.0\""));
    }

    #[test]
    fn custom_pattern_substitution() {
        let line = entry().format("$request_method $request_uri -> $status in $request_time");
        assert!(line.starts_with("GET /secured?tab=profile -> 307 in 0.00"));
    }
}
