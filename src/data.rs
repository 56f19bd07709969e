use crate::calendar;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Number of fields every data row must carry.
pub(crate) const ROW_FIELDS: usize = 8;

/// One membership interval as read from a CSV row, in column order. Dates are
/// kept as their raw components; they only get checked when converted, so a row
/// can be loaded even if its dates turn out to be impossible.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Membership {
    pub player: String,
    pub team: String,
    #[serde(deserialize_with = "trimmed")]
    pub start_day: u32,
    #[serde(deserialize_with = "trimmed")]
    pub start_month: u32,
    #[serde(deserialize_with = "trimmed")]
    pub start_year: i32,
    #[serde(deserialize_with = "trimmed")]
    pub end_day: u32,
    #[serde(deserialize_with = "trimmed")]
    pub end_month: u32,
    #[serde(deserialize_with = "trimmed")]
    pub end_year: i32,
}

/// Numbers may be padded with spaces (`1400, 1,1`); names are kept as written.
fn trimmed<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let field = String::deserialize(deserializer)?;
    field.trim().parse().map_err(serde::de::Error::custom)
}

impl Membership {
    /// Start date as a Jalali `YYYY-MM-DD` string.
    pub fn start(&self) -> String {
        format!("{}-{}-{}", self.start_year, self.start_month, self.start_day)
    }

    pub fn end(&self) -> String {
        format!("{}-{}-{}", self.end_year, self.end_month, self.end_day)
    }

    /// Start and end converted to Gregorian dates.
    pub fn dates(&self) -> Result<(NaiveDate, NaiveDate), Error> {
        Ok((
            calendar::to_gregorian(&self.start())?,
            calendar::to_gregorian(&self.end())?,
        ))
    }

    /// Inclusive number of days covered by this membership.
    pub fn span(&self) -> Result<i64, Error> {
        calendar::day_span(&self.start(), &self.end())
    }
}

/// Everything that can stop a run. None of these are recovered from: the first
/// one aborts loading or aggregation and no report gets printed.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed row at line {line}: expected 8 fields, found {fields}")]
    MalformedRow { line: u64, fields: usize },
    #[error("Invalid date {0:?}: expected three integers as YYYY-MM-DD")]
    InvalidDateFormat(String),
    #[error("Date {year}-{month}-{day} is out of range for the Jalali calendar")]
    DateOutOfRange { year: i32, month: u32, day: u32 },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
pub fn membership(player: &str, team: &str, start: [i32; 3], end: [i32; 3]) -> Membership {
    // [day, month, year], like the CSV columns
    Membership {
        player: player.to_string(),
        team: team.to_string(),
        start_day: start[0] as u32,
        start_month: start[1] as u32,
        start_year: start[2],
        end_day: end[0] as u32,
        end_month: end[1] as u32,
        end_year: end[2],
    }
}
