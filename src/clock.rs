//! Timezone-offset parsing and naive device timestamps.
//!
//! The Timebox has no timezone concept: its clock-set endpoint accepts a
//! naive ISO-8601 local timestamp (`YYYY-MM-DDTHH:MM:SS`, second precision,
//! no offset suffix). Callers may steer the wall clock with an
//! `offset-datetime` string of the form `[+-]HH:MM`; without one the process
//! local time is used as-is.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};

use crate::error::Error;

/// Parse a `[+-]HH:MM` offset into a fixed timezone.
///
/// The sign is optional and defaults to `+`. Hours and minutes must be two
/// digits each; trailing characters after the `HH:MM` prefix are ignored.
///
/// # Example
///
/// ```
/// use timebox_notify::clock::parse_offset;
///
/// let tz = parse_offset("+02:30").unwrap();
/// assert_eq!(tz.local_minus_utc(), 150 * 60);
/// ```
pub fn parse_offset(offset: &str) -> Result<FixedOffset, Error> {
    let malformed = || Error::Parse(format!("malformed offset-datetime {offset:?}"));

    let (sign, rest) = match offset.strip_prefix('+') {
        Some(rest) => (1, rest),
        None => match offset.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, offset),
        },
    };

    let bytes = rest.as_bytes();
    let digits = |range: std::ops::Range<usize>| {
        bytes
            .get(range)
            .filter(|part| part.iter().all(u8::is_ascii_digit))
            .map(|part| std::str::from_utf8(part).unwrap_or_default())
    };
    if bytes.get(2) != Some(&b':') {
        return Err(malformed());
    }
    let hours: i32 = digits(0..2).ok_or_else(malformed)?.parse().map_err(|_| malformed())?;
    let minutes: i32 = digits(3..5).ok_or_else(malformed)?.parse().map_err(|_| malformed())?;

    let seconds = sign * (hours * 3600 + minutes * 60);
    FixedOffset::east_opt(seconds)
        .ok_or_else(|| Error::Parse(format!("offset-datetime {offset:?} out of range")))
}

/// Current wall-clock time as the device expects it.
///
/// With an offset string, the current instant is expressed at that fixed
/// offset and the annotation stripped. Without one, local system time is
/// used directly.
pub fn device_timestamp(offset: Option<&str>) -> Result<String, Error> {
    let naive = match offset {
        Some(offset) => naive_at(Utc::now(), parse_offset(offset)?),
        None => Local::now().naive_local(),
    };
    Ok(format_naive(naive))
}

fn naive_at(instant: DateTime<Utc>, tz: FixedOffset) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

fn format_naive(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
}
