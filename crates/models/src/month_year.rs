//! Month/year values exchanged as `MM-YYYY` strings.
//!
//! A `MonthYear` is stored as the first day of its month, so calendar ordering
//! of the stored dates is the ordering of the months themselves.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ModelError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    pub fn new(year: i32, month: u32) -> Result<Self, ModelError> {
        if !(1..=9999).contains(&year) {
            return Err(ModelError::Validation(format!("year {year} out of range")));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(MonthYear)
            .ok_or_else(|| ModelError::Validation(format!("month {month} out of range")))
    }

    /// Decode the wire form. Exactly two month digits, a dash, four year digits.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let invalid = || ModelError::Validation(format!("invalid date {s:?}, expected MM-YYYY"));
        let b = s.as_bytes();
        if b.len() != 7 || b[2] != b'-' {
            return Err(invalid());
        }
        if !b[..2].iter().chain(&b[3..]).all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let month: u32 = s[..2].parse().map_err(|_| invalid())?;
        let year: i32 = s[3..].parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    /// Anchor any calendar date to the first day of its month.
    pub fn from_date(date: NaiveDate) -> Self {
        // day 1 exists in every month
        MonthYear(date.with_day(1).unwrap_or(date))
    }

    pub fn first_day(self) -> NaiveDate { self.0 }

    pub fn month(self) -> u32 { self.0.month() }

    pub fn year(self) -> i32 { self.0.year() }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.0.month(), self.0.year())
    }
}

impl FromStr for MonthYear {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl From<MonthYear> for NaiveDate {
    fn from(m: MonthYear) -> Self { m.0 }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MonthYear::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_anchors_at_first_of_month() {
        let m = MonthYear::parse("09-2025").unwrap();
        assert_eq!(m.first_day(), NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());
        assert_eq!(m.month(), 9);
        assert_eq!(m.year(), 2025);
    }

    #[test]
    fn decode_then_encode_is_identity() {
        for s in ["01-2024", "09-2025", "12-1999", "07-0001", "10-9999"] {
            assert_eq!(MonthYear::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn rejects_malformed() {
        // unpadded months are rejected: the wire form is fixed width
        for s in ["13-2025", "00-2025", "2025-09", "9-2025", "", "09/2025", "09-25", "09-20255", "ab-2025", "+9-2025", "09-+025", "09-0000"] {
            assert!(MonthYear::parse(s).is_err(), "{s:?} should be rejected");
        }
    }

    #[test]
    fn ordering_follows_calendar() {
        let a = MonthYear::parse("12-2024").unwrap();
        let b = MonthYear::parse("01-2025").unwrap();
        assert!(a < b);
    }

    #[test]
    fn from_date_normalizes_day() {
        let d = NaiveDate::from_ymd_opt(2023, 10, 17).unwrap();
        assert_eq!(MonthYear::from_date(d).to_string(), "10-2023");
        assert_eq!(MonthYear::from_date(d).first_day().day(), 1);
    }

    #[test]
    fn serde_uses_wire_form() {
        let m = MonthYear::parse("03-2026").unwrap();
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"03-2026\"");
        let back: MonthYear = serde_json::from_str("\"03-2026\"").unwrap();
        assert_eq!(back, m);
        assert!(serde_json::from_str::<MonthYear>("\"2026-03\"").is_err());
    }
}
