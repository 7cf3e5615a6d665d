//! Range header parsing
//!
//! Single-range `bytes=` requests only, per RFC 7233. Multi-range and
//! malformed headers are ignored, which downgrades to a full response.

/// Outcome of parsing a Range header against a known file size
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No Range header, or one we deliberately ignore: serve the whole file
    Full,
    /// A satisfiable range with inclusive byte positions
    Partial { start: usize, end: usize },
    /// A syntactically valid range outside the file: respond 416
    Unsatisfiable,
}

/// Parse an HTTP Range header value against the total file size.
///
/// Supported forms: `bytes=a-b`, `bytes=a-`, `bytes=-suffix`.
pub fn parse_range_header(range_header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(header) = range_header else {
        return RangeOutcome::Full;
    };
    let Some(spec) = header.strip_prefix("bytes=") else {
        return RangeOutcome::Full;
    };
    // Multi-range requests are not supported; serve the full file instead
    if spec.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };

    if file_size == 0 {
        return RangeOutcome::Unsatisfiable;
    }

    // Suffix form: last N bytes
    if start_str.is_empty() {
        let Ok(suffix) = end_str.trim().parse::<usize>() else {
            return RangeOutcome::Full;
        };
        if suffix == 0 {
            return RangeOutcome::Unsatisfiable;
        }
        let start = file_size.saturating_sub(suffix);
        return RangeOutcome::Partial {
            start,
            end: file_size - 1,
        };
    }

    let Ok(start) = start_str.trim().parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= file_size {
        return RangeOutcome::Unsatisfiable;
    }

    // Open-ended form: from start to end of file
    if end_str.trim().is_empty() {
        return RangeOutcome::Partial {
            start,
            end: file_size - 1,
        };
    }

    let Ok(end) = end_str.trim().parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if end < start {
        return RangeOutcome::Full;
    }

    RangeOutcome::Partial {
        start,
        // An end past EOF is clamped, per the RFC
        end: end.min(file_size - 1),
    }
}
