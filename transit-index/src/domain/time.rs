//! Schedule time handling for static feeds.
//!
//! Feeds publish stop times as "HH:MM:SS" strings measured from the start of
//! the trip's service day. Hours may exceed 23 for trips that run past
//! midnight ("25:15:00" is 01:15 the following morning, but still belongs to
//! the service day the trip started on). This module never reduces hours
//! modulo 24: the verbatim text is what every retrieval hands back.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A stop time relative to the start of its service day.
///
/// Keeps the feed's text verbatim alongside the parsed seconds, so display
/// and comparison never disagree about post-midnight values.
///
/// # Examples
///
/// ```
/// use transit_index::domain::FeedTime;
///
/// let late = FeedTime::parse("25:15:00").unwrap();
/// assert_eq!(late.as_str(), "25:15:00");
/// assert_eq!(late.seconds(), Some(25 * 3600 + 15 * 60));
///
/// let early = FeedTime::parse("08:00:00").unwrap();
/// assert!(early < late);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FeedTime {
    text: String,
    seconds: Option<u32>,
}

impl FeedTime {
    /// Parse a time from "HH:MM:SS" format, rejecting anything malformed.
    ///
    /// Hours are unbounded above; minutes and seconds must be 00-59.
    ///
    /// ```
    /// use transit_index::domain::FeedTime;
    ///
    /// assert!(FeedTime::parse("00:00:00").is_ok());
    /// assert!(FeedTime::parse("47:59:59").is_ok());
    /// assert!(FeedTime::parse("8:05:00").is_ok());
    ///
    /// assert!(FeedTime::parse("08:00").is_err());
    /// assert!(FeedTime::parse("08:60:00").is_err());
    /// assert!(FeedTime::parse("").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let seconds = parse_seconds(s)?;
        Ok(Self {
            text: s.to_string(),
            seconds: Some(seconds),
        })
    }

    /// Wrap a time as it appeared in the feed.
    ///
    /// Feeds may leave times blank for untimed stops, so this never fails:
    /// unparseable text is kept verbatim with no seconds value.
    pub fn from_feed(s: impl Into<String>) -> Self {
        let text = s.into();
        let seconds = parse_seconds(&text).ok();
        Self { text, seconds }
    }

    /// Returns the time exactly as the feed wrote it.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Seconds since the start of the service day, if the text parsed.
    pub fn seconds(&self) -> Option<u32> {
        self.seconds
    }

    /// Returns true if the feed left this time blank.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Returns true if this time falls on the calendar day after the
    /// service day (hour 24 or later).
    pub fn is_after_midnight(&self) -> bool {
        self.seconds.is_some_and(|s| s >= 24 * 3600)
    }
}

/// Orders by parsed seconds, then by text.
///
/// For zero-padded "HH:MM:SS" values this is the same order as comparing the
/// raw strings; it additionally stays correct for unpadded hours ("9:00:00").
impl Ord for FeedTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seconds
            .cmp(&other.seconds)
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for FeedTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for FeedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeedTime({})", self.text)
    }
}

impl fmt::Display for FeedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for FeedTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

fn parse_seconds(s: &str) -> Result<u32, TimeError> {
    let mut parts = s.split(':');
    let (Some(h), Some(m), Some(sec), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TimeError::new("expected HH:MM:SS format"));
    };

    if h.is_empty() || h.len() > 3 || !h.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeError::new("invalid hour digits"));
    }
    let hours: u32 = h
        .parse()
        .map_err(|_| TimeError::new("invalid hour digits"))?;

    let minutes = parse_two_digits(m).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minutes > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    let seconds = parse_two_digits(sec).ok_or_else(|| TimeError::new("invalid second digits"))?;
    if seconds > 59 {
        return Err(TimeError::new("second must be 0-59"));
    }

    Ok(hours * 3600 + minutes * 60 + seconds)
}

/// Parse two ASCII digits into a u32.
fn parse_two_digits(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
