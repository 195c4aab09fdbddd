//! Small shared helpers.

use rust_decimal::Decimal;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Canonical form of a decimal for boundary shapes: no trailing zeros
/// beyond the significant fraction, never an exponent.
pub fn canonical(value: Decimal) -> Decimal {
    value.normalize()
}
