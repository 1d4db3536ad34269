//! Month-year worksheet labels, e.g. "March 2025".

use chrono::{Datelike, Local};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthLabel {
    year: i32,
    month: u32,
}

impl MonthLabel {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The label for the current calendar month.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Parses a worksheet title. Titles that are not exactly
    /// "<month name> <year>" are not month worksheets.
    pub fn parse(title: &str) -> Option<Self> {
        let (name, year) = title.trim().split_once(' ')?;
        let month = MONTH_NAMES.iter().position(|m| *m == name)? as u32 + 1;
        let year: i32 = year.parse().ok()?;
        Self::new(year, month)
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", MONTH_NAMES[self.month as usize - 1], self.year)
    }
}
