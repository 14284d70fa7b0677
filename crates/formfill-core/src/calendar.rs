use chrono::{Datelike, Local, NaiveDate};
use std::fmt;

/// Contracts signed before the 20th start on the first of next month,
/// later ones on the first of the month after.
const CUTOFF_DAY: u32 = 20;

/// Start date of a supply agreement, always the first of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgreementDate {
    pub year: i32,
    pub month: u32,
}

impl AgreementDate {
    pub fn from_today(today: NaiveDate) -> Self {
        let offset = if today.day() < CUTOFF_DAY { 1 } else { 2 };
        let mut month = today.month() + offset;
        let mut year = today.year();

        if month > 12 {
            month -= 12;
            year += 1;
        }

        Self { year, month }
    }
}

impl fmt::Display for AgreementDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "01.{:02}.{}", self.month, self.year)
    }
}

/// Today's date in local time.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
