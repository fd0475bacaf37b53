//! Fixed-interval review schedule.
//!
//! Every study session is reviewed 7, 14, 20 and 30 days after its base date.
//! Checkpoints are derived on demand and never persisted, since whether one
//! has been reached depends on the current date.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::record::parse_date;

/// Review offsets in days, in display order.
pub const REVIEW_INTERVALS: [u32; 4] = [7, 14, 20, 30];

/// One scheduled review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCheckpoint {
    /// Days after the base date.
    pub offset_days: u32,
    /// Review date, absent when the base date is unusable.
    pub date: Option<NaiveDate>,
    /// Whether the review date is today or earlier.
    pub reached: bool,
}

/// Compute the four checkpoints for `base_date` as seen on `today`.
pub fn compute_checkpoints(base_date: NaiveDate, today: NaiveDate) -> [ReviewCheckpoint; 4] {
    REVIEW_INTERVALS.map(|offset_days| {
        let date = base_date.checked_add_days(Days::new(u64::from(offset_days)));
        ReviewCheckpoint {
            offset_days,
            date,
            reached: date.is_some_and(|d| d <= today),
        }
    })
}

/// Compute checkpoints from a stored `YYYY-MM-DD` string.
///
/// An unparseable date yields dateless, unreached checkpoints instead of an
/// error, so one damaged record cannot break a whole listing.
pub fn checkpoints_for(raw_base_date: &str, today: NaiveDate) -> [ReviewCheckpoint; 4] {
    match parse_date(raw_base_date) {
        Ok(base) => compute_checkpoints(base, today),
        Err(_) => REVIEW_INTERVALS.map(|offset_days| ReviewCheckpoint {
            offset_days,
            date: None,
            reached: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reference_example() {
        let checkpoints = compute_checkpoints(date(2024, 1, 1), date(2023, 12, 1));

        let dates: Vec<_> = checkpoints.iter().map(|c| c.date.unwrap()).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 8),
                date(2024, 1, 15),
                date(2024, 1, 21),
                date(2024, 1, 31)
            ]
        );
        let offsets: Vec<_> = checkpoints.iter().map(|c| c.offset_days).collect();
        assert_eq!(offsets, vec![7, 14, 20, 30]);
    }

    #[test]
    fn test_crosses_month_and_leap_day() {
        let checkpoints = compute_checkpoints(date(2024, 2, 20), date(2024, 2, 20));

        assert_eq!(checkpoints[0].date, Some(date(2024, 2, 27)));
        assert_eq!(checkpoints[1].date, Some(date(2024, 3, 5)));
        assert_eq!(checkpoints[3].date, Some(date(2024, 3, 21)));
    }

    #[test]
    fn test_dst_change_does_not_shift_dates() {
        // Brazil and the EU both changed clocks around these dates in past years
        let checkpoints = compute_checkpoints(date(2018, 10, 28), date(2018, 10, 28));
        assert_eq!(checkpoints[0].date, Some(date(2018, 11, 4)));

        let checkpoints = compute_checkpoints(date(2024, 3, 25), date(2024, 3, 25));
        assert_eq!(checkpoints[0].date, Some(date(2024, 4, 1)));
    }

    #[test]
    fn test_reached_boundary_is_inclusive() {
        let base = date(2024, 1, 1);

        let on_day = compute_checkpoints(base, date(2024, 1, 8));
        assert!(on_day[0].reached);
        assert!(!on_day[1].reached);

        let day_before = compute_checkpoints(base, date(2024, 1, 7));
        assert!(!day_before[0].reached);
    }

    #[test]
    fn test_reached_changes_with_today_only() {
        let base = date(2024, 1, 1);

        let early: Vec<bool> = compute_checkpoints(base, date(2024, 1, 14))
            .iter()
            .map(|c| c.reached)
            .collect();
        let later: Vec<bool> = compute_checkpoints(base, date(2024, 1, 15))
            .iter()
            .map(|c| c.reached)
            .collect();

        assert_eq!(early, vec![true, false, false, false]);
        assert_eq!(later, vec![true, true, false, false]);
    }

    #[test]
    fn test_unparseable_base_date_degrades() {
        let checkpoints = checkpoints_for("not-a-date", date(2024, 1, 1));

        assert_eq!(checkpoints.len(), 4);
        assert!(checkpoints.iter().all(|c| c.date.is_none() && !c.reached));
        assert_eq!(checkpoints[2].offset_days, 20);
    }

    #[test]
    fn test_overflow_degrades() {
        let checkpoints = compute_checkpoints(NaiveDate::MAX, NaiveDate::MAX);
        assert!(checkpoints.iter().all(|c| c.date.is_none() && !c.reached));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn checkpoints_are_base_plus_offset(days in 0i64..200_000, today_days in 0i64..200_000) {
                let epoch = date(1900, 1, 1);
                let base = epoch + chrono::Duration::days(days);
                let today = epoch + chrono::Duration::days(today_days);

                let checkpoints = compute_checkpoints(base, today);

                for (checkpoint, offset) in checkpoints.iter().zip(REVIEW_INTERVALS) {
                    prop_assert_eq!(checkpoint.offset_days, offset);
                    let expected = base + chrono::Duration::days(i64::from(offset));
                    prop_assert_eq!(checkpoint.date, Some(expected));
                    prop_assert_eq!(checkpoint.reached, expected <= today);
                }
            }

            #[test]
            fn string_and_date_paths_agree(days in 0i64..100_000) {
                let base = date(1970, 1, 1) + chrono::Duration::days(days);
                let today = date(2024, 6, 1);
                let raw = base.format("%Y-%m-%d").to_string();

                prop_assert_eq!(checkpoints_for(&raw, today), compute_checkpoints(base, today));
            }
        }
    }
}
