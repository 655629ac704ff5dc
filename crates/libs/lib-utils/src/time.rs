//! # Time Utilities
//!
//! Clock access for token issue and expiry.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
