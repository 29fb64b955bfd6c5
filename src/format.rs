//! Type-level format matchers.
//!
//! Shape-only rules for primitive values where the concrete example carries
//! no test semantics: integers, decimals, URLs, timestamps, media types.

use crate::matcher::Matcher;
use chrono::{TimeZone, Utc};
use serde_json::json;

/// ISO-8601 timestamp with optional fractional seconds and zone offset.
const ISO_DATETIME_PATTERN: &str =
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$";

/// RFC 7231 HTTP-date, as used by `Last-Modified`.
const HTTP_DATE_PATTERN: &str =
    r"^[A-Za-z]{3}, \d{2} [A-Za-z]{3} \d{4} \d{2}:\d{2}:\d{2} GMT$";

/// JSON media type, with an optional charset parameter.
const MEDIA_TYPE_JSON_PATTERN: &str = r"^application/json(;\s?charset=[\w\-]+)?$";

/// Fixed instant used for example timestamps, so generated interactions are
/// identical across runs.
const EXAMPLE_EPOCH: i64 = 1_686_825_000;

/// Namespace for primitive shape matchers.
pub struct Format;

impl Format {
    /// Any integer.
    pub fn integer() -> Matcher {
        Matcher::like(json!(1))
    }

    /// Any decimal number.
    pub fn decimal() -> Matcher {
        Matcher::like(json!(1.0))
    }

    /// A URL ending in the given path. The example is what the mock serves.
    pub fn url(path: &str, example: &str) -> Matcher {
        Matcher::term(format!(".*{}$", regex::escape(path)), example)
    }

    /// An ISO-8601 timestamp.
    pub fn iso_datetime() -> Matcher {
        let example = Utc
            .timestamp_opt(EXAMPLE_EPOCH, 0)
            .unwrap()
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();
        Matcher::term(ISO_DATETIME_PATTERN, example)
    }

    /// An HTTP-date, as carried by the `Last-Modified` header.
    pub fn last_modified() -> Matcher {
        let example = Utc
            .timestamp_opt(EXAMPLE_EPOCH, 0)
            .unwrap()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string();
        Matcher::term(HTTP_DATE_PATTERN, example)
    }

    /// The JSON media type, charset parameter allowed.
    pub fn media_type_json() -> Matcher {
        Matcher::term(MEDIA_TYPE_JSON_PATTERN, "application/json")
    }
}
