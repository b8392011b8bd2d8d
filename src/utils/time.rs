//! Timestamp formatting and parsing utilities

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::model::Timestamp;
use crate::error::{CutterError, CutterResult};

/// Format seconds the way ffmpeg expects them: plain decimal, no trailing zeros
pub fn format_seconds(seconds: Timestamp) -> String {
    seconds.normalize().to_string()
}

/// Format seconds as HH:MM:SS.mmm (or MM:SS.mmm below one hour) for logs
pub fn format_clock(seconds: Timestamp) -> String {
    let millis_total = (seconds.abs() * Decimal::ONE_THOUSAND)
        .trunc()
        .to_u64()
        .unwrap_or(u64::MAX);

    let hours = millis_total / 3_600_000;
    let minutes = (millis_total % 3_600_000) / 60_000;
    let secs = (millis_total % 60_000) / 1000;
    let millis = millis_total % 1000;
    let sign = if seconds < Decimal::ZERO { "-" } else { "" };

    if hours > 0 {
        format!("{}{:02}:{:02}:{:02}.{:03}", sign, hours, minutes, secs, millis)
    } else {
        format!("{}{:02}:{:02}.{:03}", sign, minutes, secs, millis)
    }
}

/// Parse a decimal seconds string as printed by ffprobe
pub fn parse_seconds(value: &str) -> CutterResult<Timestamp> {
    Decimal::from_str(value.trim())
        .map_err(|e| CutterError::probe(format!("Invalid timestamp '{}': {}", value, e)))
}
