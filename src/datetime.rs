//! Module containing functionality related to extended JSON dates.
//! For more information, see the documentation for the [`DateTime`] type.

use std::{
    convert::TryInto,
    fmt::{self, Display},
    time::{Duration, SystemTime},
};

use time::{
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::error::{Error, Result};

const SECONDS_LAYOUT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

const DATE_ONLY_LAYOUT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A UTC instant with millisecond precision, stored as the signed number of milliseconds since
/// the Unix epoch.
///
/// In canonical extended JSON a `DateTime` is written as `{"$date":"2014-11-28T12:00:09.12Z"}`:
/// milliseconds are printed with trailing zeros removed and omitted entirely when zero. Shell
/// mode writes `ISODate("2014-11-28T12:00:09.12Z")`.
///
/// ```
/// # fn main() -> mongoextjson::error::Result<()> {
/// let dt = mongoextjson::DateTime::parse_extjson_str("2014-11-28T12:00:09.120Z")?;
/// assert_eq!(dt.to_extjson_string().as_deref(), Some("2014-11-28T12:00:09.12Z"));
/// # Ok(())
/// # }
/// ```
///
/// ## Large Dates
/// The range of dates supported by `DateTime` is defined by [`DateTime::MIN`] and
/// [`DateTime::MAX`]. Only years `0000` through `9999` have a string form; other instants are
/// written as a millisecond count instead.
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone)]
pub struct DateTime(i64);

impl crate::DateTime {
    /// The latest possible date.
    pub const MAX: Self = Self::from_millis(i64::MAX);

    /// The earliest possible date.
    pub const MIN: Self = Self::from_millis(i64::MIN);

    /// Makes a new [`DateTime`] from the number of non-leap milliseconds since
    /// January 1, 1970 0:00:00 UTC (aka "UNIX timestamp").
    pub const fn from_millis(date: i64) -> Self {
        Self(date)
    }

    /// Returns a [`DateTime`] which corresponds to the current date and time.
    pub fn now() -> DateTime {
        Self::from_system_time(SystemTime::now())
    }

    /// Convert the given [`time::OffsetDateTime`] into a [`DateTime`], truncating it to
    /// millisecond precision.
    ///
    /// If the provided time is too far in the future or too far in the past to be represented,
    /// either [`DateTime::MAX`] or [`DateTime::MIN`] will be returned, whichever is closer.
    pub fn from_time(dt: time::OffsetDateTime) -> Self {
        let millis = dt.unix_timestamp_nanos().div_euclid(1_000_000);
        match millis.try_into() {
            Ok(ts) => Self::from_millis(ts),
            _ => {
                if millis > 0 {
                    Self::MAX
                } else {
                    Self::MIN
                }
            }
        }
    }

    pub(crate) fn to_time_opt(self) -> Option<time::OffsetDateTime> {
        time::OffsetDateTime::UNIX_EPOCH.checked_add(time::Duration::milliseconds(self.0))
    }

    /// Convert this [`DateTime`] to a [`time::OffsetDateTime`] in UTC, or `None` if it lies
    /// outside the range supported by the `time` crate.
    pub fn to_time(self) -> Option<time::OffsetDateTime> {
        self.to_time_opt()
    }

    /// Convert the given [`std::time::SystemTime`] to a [`DateTime`].
    ///
    /// If the provided time is too far in the future or too far in the past to be represented,
    /// either [`DateTime::MAX`] or [`DateTime::MIN`] will be returned, whichever is closer.
    pub fn from_system_time(st: SystemTime) -> Self {
        match st.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(d) => {
                if d.as_millis() <= i64::MAX as u128 {
                    Self::from_millis(d.as_millis() as i64)
                } else {
                    Self::MAX
                }
            }
            // handle SystemTime from before the Unix Epoch
            Err(e) => {
                let millis = e.duration().as_millis();
                if millis > i64::MAX as u128 {
                    Self::MIN
                } else {
                    Self::from_millis(-(millis as i64))
                }
            }
        }
    }

    /// Convert this [`DateTime`] to a [`std::time::SystemTime`].
    pub fn to_system_time(self) -> SystemTime {
        if self.0 >= 0 {
            SystemTime::UNIX_EPOCH + Duration::from_millis(self.0 as u64)
        } else {
            // need to convert to i128 before calculating absolute value since i64::MIN.abs()
            // overflows and panics.
            SystemTime::UNIX_EPOCH - Duration::from_millis((self.0 as i128).unsigned_abs() as u64)
        }
    }

    /// Returns the number of non-leap-milliseconds since January 1, 1970 UTC.
    pub const fn timestamp_millis(self) -> i64 {
        self.0
    }

    /// Formats this instant the way extended JSON writes dates: `YYYY-MM-DDTHH:MM:SS`, then
    /// `.` and the milliseconds with trailing zeros removed (nothing when they are zero), then
    /// `Z`.
    ///
    /// Returns `None` when the year falls outside `0000..=9999`; such dates have no string
    /// form and are written as a millisecond count.
    pub fn to_extjson_string(self) -> Option<String> {
        let dt = self.to_time_opt()?;
        if !(0..=9999).contains(&dt.year()) {
            return None;
        }
        let mut out = dt.format(SECONDS_LAYOUT).ok()?;
        let millis = dt.millisecond();
        if millis != 0 {
            let digits = format!("{millis:03}");
            out.push('.');
            out.push_str(digits.trim_end_matches('0'));
        }
        out.push('Z');
        Some(out)
    }

    /// Parses a date string the way extended JSON reads them. The accepted layouts are tried in
    /// order and the first one that matches wins:
    ///
    /// 1. RFC 3339 with optional fractional seconds and either `Z` or a numeric offset (the
    ///    result is converted to UTC and truncated to milliseconds);
    /// 2. a bare `YYYY-MM-DD` date, read as midnight UTC.
    pub fn parse_extjson_str(s: impl AsRef<str>) -> Result<Self> {
        let s = s.as_ref();
        if let Ok(odt) = time::OffsetDateTime::parse(s, &Rfc3339) {
            return Ok(Self::from_time(odt));
        }
        match time::Date::parse(s, DATE_ONLY_LAYOUT) {
            Ok(date) => Ok(Self::from_time(date.midnight().assume_utc())),
            Err(_) => Err(Error::invalid_datetime_value(format!(
                "{s:?} is neither an RFC 3339 timestamp nor a YYYY-MM-DD date"
            ))),
        }
    }

    /// Convert this [`DateTime`] to an RFC 3339 formatted string.
    pub fn try_to_rfc3339_string(self) -> Result<String> {
        let dt = self.to_time_opt().ok_or_else(|| {
            Error::cannot_format_datetime(format!("{} ms is out of range", self.0))
        })?;
        dt.format(&Rfc3339).map_err(Error::cannot_format_datetime)
    }

    /// Convert the given RFC 3339 formatted string to a [`DateTime`], truncating it to millisecond
    /// precision.
    pub fn parse_rfc3339_str(s: impl AsRef<str>) -> Result<Self> {
        let odt = time::OffsetDateTime::parse(s.as_ref(), &Rfc3339)
            .map_err(Error::invalid_datetime_value)?;
        Ok(Self::from_time(odt))
    }

    /// Adds `millis` milliseconds to the [`DateTime`] saturating at [`DateTime::MIN`] and
    /// [`DateTime::MAX`].
    pub const fn saturating_add_millis(self, millis: i64) -> Self {
        Self::from_millis(self.0.saturating_add(millis))
    }
}

impl fmt::Debug for crate::DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tup = f.debug_tuple("DateTime");
        match self.to_time_opt() {
            Some(dt) => tup.field(&dt),
            _ => tup.field(&self.0),
        };
        tup.finish()
    }
}

impl Display for crate::DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_extjson_string() {
            Some(s) => f.write_str(&s),
            _ => Display::fmt(&self.0, f),
        }
    }
}

impl From<SystemTime> for crate::DateTime {
    fn from(st: SystemTime) -> Self {
        Self::from_system_time(st)
    }
}

impl From<crate::DateTime> for SystemTime {
    fn from(dt: crate::DateTime) -> Self {
        dt.to_system_time()
    }
}

impl From<time::OffsetDateTime> for crate::DateTime {
    fn from(x: time::OffsetDateTime) -> Self {
        Self::from_time(x)
    }
}
