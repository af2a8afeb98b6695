//! Forecast date window

use chrono::{Days, NaiveDate};

use crate::error::ApplicationError;

/// Range of dates, relative to today, for which forecasts are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    max_days_ahead: u32,
}

impl DateWindow {
    /// Create a window covering today through `max_days_ahead` days from now
    #[must_use]
    pub const fn new(max_days_ahead: u32) -> Self {
        Self { max_days_ahead }
    }

    /// Number of days ahead the window reaches
    #[must_use]
    pub const fn max_days_ahead(&self) -> u32 {
        self.max_days_ahead
    }

    /// Last date inside the window
    #[must_use]
    pub fn last_day(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(u64::from(self.max_days_ahead)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Check whether `date` lies in `today..=today + max_days_ahead`
    #[must_use]
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        date >= today && date <= self.last_day(today)
    }

    /// Reject dates outside the window
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::DateOutOfRange` when `date` is in the past
    /// or beyond the window.
    pub fn check(&self, date: NaiveDate, today: NaiveDate) -> Result<(), ApplicationError> {
        if self.contains(date, today) {
            Ok(())
        } else {
            Err(ApplicationError::DateOutOfRange {
                date,
                max_days_ahead: self.max_days_ahead,
            })
        }
    }
}
