//! Time helpers

use chrono::Utc;

/// Current time as unix milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time as RFC 3339 string (stored on documents)
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
