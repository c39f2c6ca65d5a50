//! MS-DOS packed date/time handling.
//!
//! RAR 1.5 - 4.x file headers store the modification time as a 32-bit
//! MS-DOS date/time word, split into two 16-bit halves:
//!
//! | Bits | Field | Decoding |
//! |------|-------|----------|
//! | 31-25 | year | `+ 1980` |
//! | 24-21 | month | as is |
//! | 20-16 | day | as is |
//! | 15-11 | hour | as is |
//! | 10-5 | minute | as is |
//! | 4-0 | second / 2 | `* 2` |
//!
//! The value carries no time zone. Decoding is total: components outside the
//! calendar range (month 0 or 13, day 0, hour 31, ...) are kept exactly as
//! stored so that nothing is lost. Use [`DosDateTime::is_valid`] or the
//! checked conversions to find out whether the value names a real instant.
//!
//! # Example
//!
//! ```rust
//! use rarstore::DosDateTime;
//!
//! let packed = (21 << 25) | (2 << 21) | (3 << 16) | (4 << 11) | (5 << 5) | 3;
//! let ts = DosDateTime::from_packed(packed);
//!
//! assert_eq!(ts.year, 2001);
//! assert_eq!(ts.second, 6);
//! assert_eq!(ts.to_string(), "2001-02-03T04:05:06");
//! ```

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// First year representable in the packed format.
const DOS_EPOCH_YEAR: u16 = 1980;

/// Seconds per day.
const SECS_PER_DAY: i64 = 86_400;

/// A naive calendar timestamp decoded from an MS-DOS date/time word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DosDateTime {
    /// Calendar year (1980-2107).
    pub year: u16,
    /// Month as stored (1-12 when valid).
    pub month: u8,
    /// Day of month as stored (1-31 when valid).
    pub day: u8,
    /// Hour as stored (0-23 when valid).
    pub hour: u8,
    /// Minute as stored (0-59 when valid).
    pub minute: u8,
    /// Second, always even (0-62).
    pub second: u8,
}

impl DosDateTime {
    /// Unpacks a 32-bit MS-DOS date/time word.
    ///
    /// Never fails; see the module documentation for how out-of-range
    /// components are treated.
    pub const fn from_packed(value: u32) -> Self {
        Self {
            year: (value >> 25) as u16 + DOS_EPOCH_YEAR,
            month: ((value >> 21) & 0x0F) as u8,
            day: ((value >> 16) & 0x1F) as u8,
            hour: ((value >> 11) & 0x1F) as u8,
            minute: ((value >> 5) & 0x3F) as u8,
            second: ((value & 0x1F) * 2) as u8,
        }
    }

    /// Packs the timestamp back into its 32-bit form.
    ///
    /// Every value produced by [`from_packed`](Self::from_packed) packs back
    /// to the original word.
    pub const fn to_packed(&self) -> u32 {
        ((self.year.saturating_sub(DOS_EPOCH_YEAR) as u32 & 0x7F) << 25)
            | ((self.month as u32 & 0x0F) << 21)
            | ((self.day as u32 & 0x1F) << 16)
            | ((self.hour as u32 & 0x1F) << 11)
            | ((self.minute as u32 & 0x3F) << 5)
            | ((self.second as u32 / 2) & 0x1F)
    }

    /// Returns true if every component lies inside the calendar range.
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
            && self.hour < 24
            && self.minute < 60
            && self.second < 60
    }

    /// Returns the timestamp as Unix seconds, interpreting it as UTC.
    ///
    /// Returns `None` if the value is not a valid calendar date/time.
    pub fn as_unix_secs(&self) -> Option<i64> {
        if !self.is_valid() {
            return None;
        }
        let days = days_from_civil(self.year as i64, self.month as i64, self.day as i64);
        Some(
            days * SECS_PER_DAY
                + self.hour as i64 * 3600
                + self.minute as i64 * 60
                + self.second as i64,
        )
    }

    /// Returns the timestamp as a `SystemTime`, interpreting it as UTC.
    ///
    /// Returns `None` if the value is not a valid calendar date/time.
    pub fn as_system_time(&self) -> Option<SystemTime> {
        // Every valid DOS date lies after the Unix epoch.
        let secs = u64::try_from(self.as_unix_secs()?).ok()?;
        UNIX_EPOCH.checked_add(Duration::from_secs(secs))
    }
}

impl fmt::Display for DosDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl From<u32> for DosDateTime {
    fn from(value: u32) -> Self {
        Self::from_packed(value)
    }
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(year: u32, month: u32, day: u32, hour: u32, minute: u32, half_secs: u32) -> u32 {
        ((year - 1980) << 25) | (month << 21) | (day << 16) | (hour << 11) | (minute << 5) | half_secs
    }

    #[test]
    fn test_decode_components() {
        let ts = DosDateTime::from_packed(pack(2001, 2, 3, 4, 5, 3));
        assert_eq!(ts.year, 2001);
        assert_eq!(ts.month, 2);
        assert_eq!(ts.day, 3);
        assert_eq!(ts.hour, 4);
        assert_eq!(ts.minute, 5);
        assert_eq!(ts.second, 6);
        assert_eq!(ts.to_string(), "2001-02-03T04:05:06");
    }

    #[test]
    fn test_zero_word() {
        let ts = DosDateTime::from_packed(0);
        assert_eq!(ts.year, 1980);
        assert_eq!(ts.month, 0);
        assert_eq!(ts.day, 0);
        assert!(!ts.is_valid());
        assert_eq!(ts.as_unix_secs(), None);
    }

    #[test]
    fn test_out_of_range_preserved() {
        // month 15, day 31, hour 31, minute 63, seconds 62
        let ts = DosDateTime::from_packed(u32::MAX);
        assert_eq!(ts.year, 1980 + 127);
        assert_eq!(ts.month, 15);
        assert_eq!(ts.day, 31);
        assert_eq!(ts.hour, 31);
        assert_eq!(ts.minute, 63);
        assert_eq!(ts.second, 62);
        assert!(!ts.is_valid());
        assert_eq!(ts.to_packed(), u32::MAX);
    }

    #[test]
    fn test_unix_secs() {
        let ts = DosDateTime::from_packed(pack(1980, 1, 1, 0, 0, 0));
        assert_eq!(ts.as_unix_secs(), Some(315_532_800));

        let ts = DosDateTime::from_packed(pack(2000, 2, 29, 12, 30, 15));
        assert_eq!(ts.as_unix_secs(), Some(951_827_430));
    }

    #[test]
    fn test_invalid_leap_day() {
        let ts = DosDateTime::from_packed(pack(2001, 2, 29, 0, 0, 0));
        assert!(!ts.is_valid());
        assert!(ts.as_system_time().is_none());
    }

    #[test]
    fn test_system_time() {
        let ts = DosDateTime::from_packed(pack(1980, 1, 1, 0, 0, 1));
        let expected = UNIX_EPOCH + Duration::from_secs(315_532_802);
        assert_eq!(ts.as_system_time(), Some(expected));
    }
}
