//! Record identifiers
//!
//! Identifiers have the form `PREFIX-MMYY-NNN`, where `MMYY` is the calendar
//! [`Period`] of creation and `NNN` is the 1-based serial within that period,
//! zero-padded to at least three digits.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::RecordError;
use crate::record_type::RecordType;

/// Minimum width of the serial component
pub const SERIAL_WIDTH: usize = 3;

/// Calendar month and two-digit year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    month: u8,
    year: u8,
}

impl Period {
    /// Create period from month (1-12) and two-digit year (0-99)
    ///
    /// # Errors
    /// Returns `RecordError::InvalidPeriod` when either value is out of range
    pub fn new(month: u32, year: u32) -> Result<Self, RecordError> {
        if !(1..=12).contains(&month) || year > 99 {
            return Err(RecordError::InvalidPeriod { month, year });
        }
        Ok(Self {
            month: month as u8,
            year: year as u8,
        })
    }

    /// Period containing the given date
    #[must_use]
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            month: date.month() as u8,
            year: date.year().rem_euclid(100) as u8,
        }
    }

    /// Month, 1-12
    #[inline]
    #[must_use]
    pub fn month(&self) -> u32 {
        u32::from(self.month)
    }

    /// Two-digit year
    #[inline]
    #[must_use]
    pub fn year(&self) -> u32 {
        u32::from(self.year)
    }

    /// Calendar month before this one; January 00 wraps to December 99
    #[must_use]
    pub fn previous(&self) -> Self {
        match (self.month, self.year) {
            (1, 0) => Self { month: 12, year: 99 },
            (1, year) => Self { month: 12, year: year - 1 },
            (month, year) => Self { month: month - 1, year },
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.month, self.year)
    }
}

impl FromStr for Period {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RecordError::malformed(s, "period must be four digits MMYY"));
        }
        let month = s[..2]
            .parse()
            .map_err(|_| RecordError::malformed(s, "period must be four digits MMYY"))?;
        let year = s[2..]
            .parse()
            .map_err(|_| RecordError::malformed(s, "period must be four digits MMYY"))?;
        Self::new(month, year)
    }
}

/// Human-readable record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId {
    record_type: RecordType,
    period: Period,
    serial: u32,
}

impl RecordId {
    /// Create identifier
    ///
    /// # Errors
    /// Returns `RecordError::MalformedId` when `serial` is zero
    pub fn new(record_type: RecordType, period: Period, serial: u32) -> Result<Self, RecordError> {
        if serial == 0 {
            return Err(RecordError::malformed(
                format!("{}-{period}-000", record_type.prefix()),
                "serial starts at 1",
            ));
        }
        Ok(Self {
            record_type,
            period,
            serial,
        })
    }

    /// First identifier of a period
    #[inline]
    #[must_use]
    pub fn first(record_type: RecordType, period: Period) -> Self {
        Self {
            record_type,
            period,
            serial: 1,
        }
    }

    /// Identifier following this one in the same period
    ///
    /// # Errors
    /// Returns `RecordError::SerialExhausted` when the serial is already `u32::MAX`
    pub fn next(&self) -> Result<Self, RecordError> {
        let serial = self
            .serial
            .checked_add(1)
            .ok_or_else(|| RecordError::SerialExhausted(self.to_string()))?;
        Ok(Self { serial, ..*self })
    }

    /// Record type encoded in the prefix
    #[inline]
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Period of creation
    #[inline]
    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    /// Serial within the period
    #[inline]
    #[must_use]
    pub fn serial(&self) -> u32 {
        self.serial
    }

    /// Check whether this identifier belongs to the given type and period
    #[inline]
    #[must_use]
    pub fn is_in(&self, record_type: RecordType, period: Period) -> bool {
        self.record_type == record_type && self.period == period
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:0width$}",
            self.record_type.prefix(),
            self.period,
            self.serial,
            width = SERIAL_WIDTH
        )
    }
}

impl FromStr for RecordId {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts = s.split('-');
        let (Some(prefix), Some(period), Some(serial), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(RecordError::malformed(
                s,
                "expected three dash-separated parts",
            ));
        };

        let record_type = RecordType::from_prefix(prefix)
            .ok_or_else(|| RecordError::UnknownPrefix(prefix.to_string()))?;
        let period: Period = period.parse()?;

        if serial.len() < SERIAL_WIDTH || !serial.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RecordError::malformed(
                s,
                "serial must be at least three digits",
            ));
        }
        let serial: u32 = serial
            .parse()
            .map_err(|_| RecordError::malformed(s, "serial out of range"))?;

        Self::new(record_type, period, serial)
    }
}

impl Serialize for RecordId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
