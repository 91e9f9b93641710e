//! Conversions between caption timestamps, whole seconds and display strings.

use crate::error::{HuskError, Result};

/// Parse an `HH:MM:SS.mmm` timestamp into whole seconds.
///
/// Milliseconds are validated but truncated.
pub fn parse_timestamp(ts: &str) -> Result<u64> {
    let invalid = || HuskError::Subtitle(format!("Invalid timestamp: {}", ts));

    let mut parts = ts.trim().split(':');
    let (h, m, s) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(s), None) => (h, m, s),
        _ => return Err(invalid()),
    };
    let (s, ms) = s.split_once('.').ok_or_else(invalid)?;

    let hours: u64 = h.parse().map_err(|_| invalid())?;
    let minutes: u64 = m.parse().map_err(|_| invalid())?;
    let seconds: u64 = s.parse().map_err(|_| invalid())?;
    ms.parse::<u32>().map_err(|_| invalid())?;

    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    Ok(hours * 3600 + minutes * 60 + seconds)
}

/// Format whole seconds as `H:MM:SS`, with a day prefix past 24 hours.
///
/// `95` -> `0:01:35`, `90061` -> `1 day, 1:01:01`.
pub fn format_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let rem = total_seconds % 86_400;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);

    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}
