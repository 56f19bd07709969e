use crate::data::Error;
use chrono::NaiveDate;
use std::fmt;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9377;

/// Year of the arithmetic cycle we count from; 1 Farvardin of that year falls on
/// 1600-03-20 in the proleptic Gregorian calendar.
const ANCHOR_YEAR: i32 = 979;
/// 1600-03-20, counted from 0001-01-01 (day 1).
const ANCHOR_DAYS_FROM_CE: i64 = 584_102;

/// Remainders (mod 33) of the leap years in the 33-year cycle.
const LEAP_REMAINDERS: [i32; 8] = [1, 5, 9, 13, 17, 22, 26, 30];

const DAYS_IN_MONTH: [u32; 12] = [31, 31, 31, 31, 31, 31, 30, 30, 30, 30, 30, 29];

/// A date in the Solar Hijri (Jalali) calendar, using the arithmetic 33-year
/// leap cycle. Construction always validates the day against its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JalaliDate {
    year: i32,
    month: u32,
    day: u32,
}

pub fn is_leap(year: i32) -> bool {
    LEAP_REMAINDERS.contains(&year.rem_euclid(33))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 && is_leap(year) {
        30
    } else {
        DAYS_IN_MONTH[(month - 1) as usize]
    }
}

impl JalaliDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, Error> {
        let out_of_range = Error::DateOutOfRange { year, month, day };
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) {
            return Err(out_of_range);
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(out_of_range);
        }
        Ok(Self { year, month, day })
    }

    /// Parses `YYYY-MM-DD`. Components don't need zero padding: `1400-1-9` is fine.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let bad_format = || Error::InvalidDateFormat(s.to_string());
        let parts: Vec<&str> = s.split('-').collect();
        let [year, month, day] = parts[..] else {
            return Err(bad_format());
        };
        let year = year.parse().map_err(|_| bad_format())?;
        let month = month.parse().map_err(|_| bad_format())?;
        let day = day.parse().map_err(|_| bad_format())?;
        Self::new(year, month, day)
    }

    /// Number of days between 1 Farvardin of `ANCHOR_YEAR` and this date.
    fn days_from_anchor(&self) -> i64 {
        let jy = i64::from(self.year - ANCHOR_YEAR);
        let elapsed_years = 365 * jy + jy.div_euclid(33) * 8 + (jy.rem_euclid(33) + 3) / 4;
        let elapsed_months: u32 = DAYS_IN_MONTH[..(self.month - 1) as usize].iter().sum();
        elapsed_years + i64::from(elapsed_months) + i64::from(self.day - 1)
    }

    pub fn to_gregorian(&self) -> Result<NaiveDate, Error> {
        i32::try_from(ANCHOR_DAYS_FROM_CE + self.days_from_anchor())
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or(Error::DateOutOfRange {
                year: self.year,
                month: self.month,
                day: self.day,
            })
    }

    pub fn next_day(&self) -> Result<Self, Error> {
        if self.day < days_in_month(self.year, self.month) {
            Self::new(self.year, self.month, self.day + 1)
        } else if self.month < 12 {
            Self::new(self.year, self.month + 1, 1)
        } else {
            Self::new(self.year + 1, 1, 1)
        }
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Converts a `YYYY-MM-DD` Jalali date string to its Gregorian equivalent.
pub fn to_gregorian(date: &str) -> Result<NaiveDate, Error> {
    JalaliDate::parse(date)?.to_gregorian()
}

/// Inclusive number of days from `start` to `end`, both given as Jalali
/// `YYYY-MM-DD` strings. An `end` before `start` gives zero or a negative count.
pub fn day_span(start: &str, end: &str) -> Result<i64, Error> {
    Ok(inclusive_days(to_gregorian(start)?, to_gregorian(end)?))
}

/// Same as `day_span`, on dates that are already converted.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    let days = (end - start).num_days() + 1;
    if days < 1 {
        tracing::warn!(%start, %end, days, "end date precedes start date");
    }
    days
}
