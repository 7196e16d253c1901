//! Date text handling for payment dates.
//!
//! Payment dates are written the way people write them on a statement:
//! `January 2 2006`, `Jan 2, 2006`, `2 January 2006`, a bare month such as
//! `January 2006`, or ISO `2006-01-02`.

use chrono::{Datelike, Months, NaiveDate};

/// display format for payment dates, e.g. `January 2 2006`
pub const PAYMENT_DATE_FORMAT: &str = "%B %-d %Y";

const FULL_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%B %d %Y", "%d %B %Y"];

/// date text as parsed, before the contractual day is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    /// a complete calendar date
    Day(NaiveDate),
    /// month and year only
    Month { year: i32, month: u32 },
}

impl ParsedDate {
    /// parse date text, returning `None` when no supported format matches
    pub fn parse(text: &str) -> Option<Self> {
        let cleaned = text.replace(',', " ");
        let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.is_empty() {
            return None;
        }

        for format in FULL_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
                return Some(ParsedDate::Day(date));
            }
        }

        // month and year only: anchor on the first to let chrono validate it
        NaiveDate::parse_from_str(&format!("1 {cleaned}"), "%d %B %Y")
            .ok()
            .map(|date| ParsedDate::Month {
                year: date.year(),
                month: date.month(),
            })
    }

    /// resolve to a calendar date; a bare month lands on `day`, clamped to the month's length
    pub fn resolve(&self, day: u32) -> Option<NaiveDate> {
        match *self {
            ParsedDate::Day(date) => Some(date),
            ParsedDate::Month { year, month } => {
                let day = day.clamp(1, days_in_month(year, month));
                NaiveDate::from_ymd_opt(year, month, day)
            }
        }
    }
}

/// format a date as `January 2 2006`
pub fn format_date(date: NaiveDate) -> String {
    date.format(PAYMENT_DATE_FORMAT).to_string()
}

/// english month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December",
    ];
    NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown")
}

/// add calendar months, clamping the day to the end of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_full_dates() {
        let expected = Some(ParsedDate::Day(ymd(2019, 9, 9)));
        assert_eq!(ParsedDate::parse("September 9 2019"), expected);
        assert_eq!(ParsedDate::parse("September 9, 2019"), expected);
        assert_eq!(ParsedDate::parse("Sep 9 2019"), expected);
        assert_eq!(ParsedDate::parse("  9 September 2019 "), expected);
        assert_eq!(ParsedDate::parse("2019-09-09"), expected);
    }

    #[test]
    fn test_parse_month_year() {
        assert_eq!(
            ParsedDate::parse("January 2006"),
            Some(ParsedDate::Month { year: 2006, month: 1 })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(ParsedDate::parse("date"), None);
        assert_eq!(ParsedDate::parse(""), None);
        assert_eq!(ParsedDate::parse("February 30 2020"), None);
        assert_eq!(ParsedDate::parse("13/45/2020"), None);
    }

    #[test]
    fn test_resolve_month_clamps_day() {
        let feb = ParsedDate::Month { year: 2021, month: 2 };
        assert_eq!(feb.resolve(31), Some(ymd(2021, 2, 28)));
        assert_eq!(feb.resolve(15), Some(ymd(2021, 2, 15)));

        let day = ParsedDate::Day(ymd(2021, 3, 4));
        assert_eq!(day.resolve(15), Some(ymd(2021, 3, 4)));
    }

    #[test]
    fn test_add_months_clamps() {
        assert_eq!(add_months(ymd(2020, 1, 31), 1), Some(ymd(2020, 2, 29)));
        assert_eq!(add_months(ymd(2019, 9, 9), 6), Some(ymd(2020, 3, 9)));
        assert_eq!(add_months(ymd(2019, 9, 9), 0), Some(ymd(2019, 9, 9)));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2006, 1, 2)), "January 2 2006");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "Unknown");
    }
}
