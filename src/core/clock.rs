//! Clock abstraction so "today" can be pinned in tests.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

/// Source of the current time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// Real time. "Today" is the local calendar date.
    #[default]
    System,
    /// A fixed instant. "Today" is its UTC calendar date, so the pinned day
    /// does not depend on the machine's time zone.
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// A clock pinned to midnight UTC of `date`.
    #[must_use]
    pub fn fixed_date(date: NaiveDate) -> Self {
        Self::Fixed(date.and_time(NaiveTime::MIN).and_utc())
    }

    /// Current instant.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Current calendar date: the local date for [`Clock::System`], the UTC
    /// date of the pinned instant for [`Clock::Fixed`].
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(t) => t.date_naive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_date_today() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let clock = Clock::fixed_date(date);

        assert_eq!(clock.today(), date);
        assert_eq!(clock.now().to_rfc3339(), "2024-02-29T00:00:00+00:00");
    }

    #[test]
    fn test_fixed_today_is_utc_date() {
        let late = Utc.with_ymd_and_hms(2024, 3, 9, 23, 30, 0).unwrap();
        assert_eq!(
            Clock::Fixed(late).today(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
    }

    #[test]
    fn test_system_is_default() {
        assert_eq!(Clock::default(), Clock::System);
    }
}
