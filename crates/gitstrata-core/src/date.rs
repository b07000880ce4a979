//! Calendar point value type with git's textual month encoding

use crate::error::{Error, Result};

/// An immutable point in calendar time.
///
/// Fields are deliberately not range-checked: a `Date` decoded from git
/// output carries whatever the tool printed, and the only contract this
/// type guarantees is the ordering. Comparison is lexicographic over
/// (year, month, day, hour, minute, second) in declaration order, which
/// the derived `Ord` provides exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    /// Calendar year
    pub year: i32,
    /// Month, 1–12 when decoded from git output
    pub month: u32,
    /// Day of month
    pub day: u32,
    /// Hour of day
    pub hour: u32,
    /// Minute
    pub minute: u32,
    /// Second
    pub second: u32,
}

impl Date {
    /// Construct a date from all six fields.
    pub const fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Construct a date at midnight.
    pub const fn at_midnight(year: i32, month: u32, day: u32) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Decode a three-letter month abbreviation as printed by git
    /// (`Jan` … `Dec`) into its 1–12 numeric value.
    ///
    /// Any other token is fatal to parsing the enclosing commit record.
    pub fn decode_month(token: &str) -> Result<u32> {
        match token {
            "Jan" => Ok(1),
            "Feb" => Ok(2),
            "Mar" => Ok(3),
            "Apr" => Ok(4),
            "May" => Ok(5),
            "Jun" => Ok(6),
            "Jul" => Ok(7),
            "Aug" => Ok(8),
            "Sep" => Ok(9),
            "Oct" => Ok(10),
            "Nov" => Ok(11),
            "Dec" => Ok(12),
            other => Err(Error::CommitLogParse(format!(
                "unrecognized month token '{}'",
                other
            ))),
        }
    }

    /// Parse an operator-supplied calendar date, `YYYY-MM-DD` or
    /// `YYYY-MM-DDTHH:MM:SS`, into a `Date`.
    ///
    /// Unlike `decode_month` this path is for configuration input, so it
    /// goes through chrono for validation and reports a config error.
    pub fn parse(input: &str) -> Result<Self> {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
            use chrono::{Datelike, Timelike};
            return Ok(Self::new(
                dt.year(),
                dt.month(),
                dt.day(),
                dt.hour(),
                dt.minute(),
                dt.second(),
            ));
        }
        if let Ok(d) = chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            use chrono::Datelike;
            return Ok(Self::at_midnight(d.year(), d.month(), d.day()));
        }
        Err(Error::Config(format!(
            "invalid date '{}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
            input
        )))
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ordering_priority() {
        assert!(Date::at_midnight(2020, 4, 1) < Date::at_midnight(2020, 5, 1));
        assert!(Date::at_midnight(2020, 5, 1) < Date::at_midnight(2021, 4, 1));
        // Year dominates month, month dominates day
        assert!(Date::at_midnight(2020, 12, 31) < Date::at_midnight(2021, 1, 1));
        assert!(Date::new(2020, 4, 1, 23, 59, 59) < Date::at_midnight(2020, 4, 2));
    }

    #[test]
    fn test_equal_only_when_all_fields_equal() {
        let a = Date::new(2020, 4, 1, 12, 30, 15);
        let b = Date::new(2020, 4, 1, 12, 30, 15);
        let c = Date::new(2020, 4, 1, 12, 30, 16);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
    }

    #[test]
    fn test_garbage_fields_are_preserved() {
        // No range checking: month 13 is ordered after month 12
        let normal = Date::at_midnight(2020, 12, 1);
        let garbage = Date::at_midnight(2020, 13, 1);
        assert!(normal < garbage);
        assert_eq!(garbage.month, 13);
    }

    #[test]
    fn test_decode_month_all_abbreviations() {
        let months = [
            ("Jan", 1),
            ("Feb", 2),
            ("Mar", 3),
            ("Apr", 4),
            ("May", 5),
            ("Jun", 6),
            ("Jul", 7),
            ("Aug", 8),
            ("Sep", 9),
            ("Oct", 10),
            ("Nov", 11),
            ("Dec", 12),
        ];
        for (token, expected) in months {
            assert_eq!(Date::decode_month(token).unwrap(), expected);
        }
    }

    #[test]
    fn test_decode_month_rejects_unknown_tokens() {
        for bad in ["jan", "JAN", "January", "Foo", ""] {
            let err = Date::decode_month(bad).unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::CommitLogParse);
        }
    }

    #[test]
    fn test_parse_operator_dates() {
        assert_eq!(
            Date::parse("2020-04-01").unwrap(),
            Date::at_midnight(2020, 4, 1)
        );
        assert_eq!(
            Date::parse("2021-12-31T23:59:58").unwrap(),
            Date::new(2021, 12, 31, 23, 59, 58)
        );
        assert!(Date::parse("2020-13-01").is_err());
        assert!(Date::parse("yesterday").is_err());
    }

    fn arb_date() -> impl Strategy<Value = Date> {
        (1990i32..2100, 1u32..=12, 1u32..=31, 0u32..24, 0u32..60, 0u32..60)
            .prop_map(|(y, mo, d, h, mi, s)| Date::new(y, mo, d, h, mi, s))
    }

    proptest! {
        #[test]
        fn prop_ordering_is_antisymmetric(a in arb_date(), b in arb_date()) {
            if a < b {
                prop_assert!(b > a);
            }
            if a == b {
                prop_assert!(!(a < b) && !(b < a));
            }
        }

        #[test]
        fn prop_ordering_is_transitive(a in arb_date(), b in arb_date(), c in arb_date()) {
            let mut v = [a, b, c];
            v.sort();
            prop_assert!(v[0] <= v[1] && v[1] <= v[2] && v[0] <= v[2]);
        }
    }
}
