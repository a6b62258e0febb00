//! Timestamp codec for yt-dlp section syntax.
//!
//! yt-dlp accepts `--download-sections "*START-END"` where both ends are
//! `HH:MM:SS.mmm`. A padding or rounding slip is only reported after the
//! download has already been attempted, so the grammar is produced here and
//! nowhere else.

use crate::{Error, Result};
use std::fmt;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Format a non-negative offset in seconds as `HH:MM:SS.mmm`.
///
/// Hours are not wrapped at 24 and grow past two digits when needed. The
/// value is rounded to the nearest millisecond before it is split into
/// fields, so `59.9996` becomes `00:01:00.000` rather than `00:00:60.000`.
///
/// Callers must reject negative and non-finite input first.
///
/// # Example
///
/// ```
/// use clipforged_av::timecode::encode;
///
/// assert_eq!(encode(65.0), "00:01:05.000");
/// assert_eq!(encode(3723.5), "01:02:03.500");
/// ```
pub fn encode(seconds: f64) -> String {
    debug_assert!(
        seconds.is_finite() && seconds >= 0.0,
        "timecode::encode called with {seconds}"
    );

    let total_ms = (seconds.max(0.0) * MS_PER_SECOND as f64).round() as u64;

    let hours = total_ms / MS_PER_HOUR;
    let minutes = (total_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let secs = (total_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = total_ms % MS_PER_SECOND;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

/// Parse an `H+:MM:SS.mmm` timestamp back into seconds.
///
/// # Errors
///
/// Returns [`Error::InvalidTimestamp`] if the input does not match the
/// grammar or minutes/seconds are out of range.
///
/// # Example
///
/// ```
/// use clipforged_av::timecode::decode;
///
/// assert_eq!(decode("00:02:05.000").unwrap(), 125.0);
/// assert!(decode("2:05").is_err());
/// ```
pub fn decode(timestamp: &str) -> Result<f64> {
    let invalid = || Error::InvalidTimestamp(timestamp.to_string());

    let mut parts = timestamp.split(':');
    let (Some(hours), Some(minutes), Some(rest), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let (secs, millis) = rest.split_once('.').ok_or_else(invalid)?;

    let hours = parse_digits(hours, None).ok_or_else(invalid)?;
    let minutes = parse_digits(minutes, Some(2)).ok_or_else(invalid)?;
    let secs = parse_digits(secs, Some(2)).ok_or_else(invalid)?;
    let millis = parse_digits(millis, Some(3)).ok_or_else(invalid)?;

    if minutes >= 60 || secs >= 60 {
        return Err(invalid());
    }

    let total_ms = hours * MS_PER_HOUR + minutes * MS_PER_MINUTE + secs * MS_PER_SECOND + millis;
    Ok(total_ms as f64 / MS_PER_SECOND as f64)
}

fn parse_digits(field: &str, width: Option<usize>) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if width.is_some_and(|w| field.len() != w) {
        return None;
    }
    field.parse().ok()
}

/// A time range in yt-dlp's section notation.
///
/// Both ends are pre-formatted with [`encode`]. For ranges under 100 hours the
/// start string sorts lexicographically before the end string whenever the
/// start offset is smaller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSpec {
    start: String,
    end: String,
}

impl SegmentSpec {
    /// Build a segment spec from start and end offsets in seconds.
    pub fn new(start_secs: f64, end_secs: f64) -> Self {
        Self {
            start: encode(start_secs),
            end: encode(end_secs),
        }
    }

    /// Formatted start timestamp.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Formatted end timestamp.
    pub fn end(&self) -> &str {
        &self.end
    }

    /// The `*START-END` value passed to `--download-sections`.
    pub fn to_arg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SegmentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*{}-{}", self.start, self.end)
    }
}
