//! Normalized revision type shared by the git and svn backends.

use chrono::{DateTime, NaiveDate};

/// Day format of svn timestamps.
const DAY_FORMAT: &str = "%Y-%m-%d";

/// A single change after a release, as retrieved from either backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// The day the change was made.
    pub date: NaiveDate,

    /// The full commit message (may be empty).
    pub message: String,
}

impl Revision {
    /// Creates a new revision.
    #[must_use]
    pub fn new(date: NaiveDate, message: impl Into<String>) -> Self {
        Self {
            date,
            message: message.into(),
        }
    }

    /// Builds a revision from an RFC 3339 timestamp such as `2011-03-04T10:20:30Z`.
    ///
    /// Returns `None` if the timestamp cannot be parsed.
    #[must_use]
    pub fn from_timestamp(timestamp: &str, message: impl Into<String>) -> Option<Self> {
        let date = DateTime::parse_from_rfc3339(timestamp).ok()?.date_naive();
        Some(Self::new(date, message))
    }

    /// Builds a revision from a timestamp whose first ten characters are `YYYY-MM-DD`.
    ///
    /// svn reports dates like `2011-03-04T10:20:30.123456Z`; only the day is kept.
    #[must_use]
    pub fn from_day_prefix(timestamp: &str, message: impl Into<String>) -> Option<Self> {
        let day = timestamp.get(..10)?;
        let date = NaiveDate::parse_from_str(day, DAY_FORMAT).ok()?;
        Some(Self::new(date, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new() {
        let rev = Revision::new(day(2011, 3, 4), "Fix JENKINS-1");
        assert_eq!(rev.date, day(2011, 3, 4));
        assert_eq!(rev.message, "Fix JENKINS-1");
    }

    #[test]
    fn test_from_timestamp_utc() {
        let rev = Revision::from_timestamp("2011-03-04T23:59:59Z", "msg").unwrap();
        assert_eq!(rev.date, day(2011, 3, 4));
    }

    #[test]
    fn test_from_timestamp_keeps_local_day() {
        let rev = Revision::from_timestamp("2011-03-04T23:30:00-08:00", "msg").unwrap();
        assert_eq!(rev.date, day(2011, 3, 4));
    }

    #[test]
    fn test_from_timestamp_invalid() {
        assert!(Revision::from_timestamp("yesterday", "msg").is_none());
        assert!(Revision::from_timestamp("", "msg").is_none());
    }

    #[test]
    fn test_from_day_prefix_svn_date() {
        let rev = Revision::from_day_prefix("2010-12-31T08:15:42.123456Z", "").unwrap();
        assert_eq!(rev.date, day(2010, 12, 31));
        assert_eq!(rev.message, "");
    }

    #[test]
    fn test_from_day_prefix_too_short() {
        assert!(Revision::from_day_prefix("2010-12", "msg").is_none());
    }
}
