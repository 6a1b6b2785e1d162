use crate::utils::time;
use chrono::{Datelike, Days, NaiveDate};
use std::collections::HashSet;

/// Consecutive-day streak ending at `today` or yesterday.
///
/// A streak survives overnight: if the latest check-in was yesterday the walk
/// anchors there, so the user has until midnight to extend it. A gap of more
/// than one day means the streak is broken.
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(latest) = dates.iter().max().copied() else {
        return 0;
    };

    let gap = time::days_between(latest, today);
    if gap > 1 {
        return 0;
    }

    let set: HashSet<NaiveDate> = dates.iter().copied().collect();
    let mut anchor = if gap == 1 { latest } else { today };

    let mut streak = 0u32;
    while set.contains(&anchor) {
        streak += 1;
        match anchor.pred_opt() {
            Some(prev) => anchor = prev,
            None => break,
        }
    }

    streak
}

/// Longest run of consecutive days ever observed in the history.
pub fn longest_streak(dates: &[NaiveDate]) -> u32 {
    if dates.is_empty() {
        return 0;
    }

    let mut sorted = dates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut longest = 1u32;
    let mut run = 1u32;

    for pair in sorted.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }

    longest
}

pub fn count_in_range(dates: &[NaiveDate], start: NaiveDate, end: NaiveDate) -> usize {
    dates.iter().filter(|d| **d >= start && **d <= end).count()
}

/// Check-ins since Monday of the current week.
pub fn count_this_week(dates: &[NaiveDate], today: NaiveDate) -> usize {
    let days_since_monday = today.weekday().num_days_from_monday() as u64;
    let monday = today
        .checked_sub_days(Days::new(days_since_monday))
        .unwrap_or(today);

    count_in_range(dates, monday, today)
}

pub fn count_this_month(dates: &[NaiveDate], today: NaiveDate) -> usize {
    let first_of_month = today.with_day(1).unwrap_or(today);

    count_in_range(dates, first_of_month, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn ds(strs: &[&str]) -> Vec<NaiveDate> {
        strs.iter().map(|s| d(s)).collect()
    }

    #[test]
    fn current_streak_empty_is_zero() {
        assert_eq!(current_streak(&[], d("2026-03-10")), 0);
    }

    #[test]
    fn current_streak_today_only() {
        assert_eq!(current_streak(&ds(&["2026-03-10"]), d("2026-03-10")), 1);
    }

    #[test]
    fn current_streak_three_consecutive_days() {
        let dates = ds(&["2026-03-10", "2026-03-09", "2026-03-08"]);
        assert_eq!(current_streak(&dates, d("2026-03-10")), 3);
    }

    #[test]
    fn current_streak_anchored_at_yesterday() {
        // No check-in today yet; yesterday's run still counts.
        let dates = ds(&["2026-03-09", "2026-03-08"]);
        assert_eq!(current_streak(&dates, d("2026-03-10")), 2);
    }

    #[test]
    fn current_streak_broken_by_two_day_gap() {
        assert_eq!(current_streak(&ds(&["2026-03-08"]), d("2026-03-10")), 0);
    }

    #[test]
    fn current_streak_stops_at_first_miss() {
        let dates = ds(&["2026-03-10", "2026-03-09", "2026-03-07", "2026-03-06"]);
        assert_eq!(current_streak(&dates, d("2026-03-10")), 2);
    }

    #[test]
    fn current_streak_ignores_duplicate_dates() {
        let dates = ds(&["2026-03-10", "2026-03-10", "2026-03-09"]);
        assert_eq!(current_streak(&dates, d("2026-03-10")), 2);
    }

    #[test]
    fn longest_streak_empty_and_single() {
        assert_eq!(longest_streak(&[]), 0);
        assert_eq!(longest_streak(&ds(&["2026-01-05"])), 1);
    }

    #[test]
    fn longest_streak_finds_run_before_gap() {
        let dates = ds(&["2026-01-01", "2026-01-02", "2026-01-03", "2026-01-10"]);
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn longest_streak_unsorted_input() {
        let dates = ds(&["2026-01-10", "2026-01-02", "2026-01-01", "2026-01-03", "2026-01-11"]);
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn longest_streak_spans_month_boundary() {
        let dates = ds(&["2026-01-30", "2026-01-31", "2026-02-01"]);
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn current_never_exceeds_longest() {
        let samples: Vec<Vec<NaiveDate>> = vec![
            ds(&[]),
            ds(&["2026-03-10"]),
            ds(&["2026-03-10", "2026-03-09", "2026-03-08"]),
            ds(&["2026-03-09", "2026-03-08", "2026-03-01", "2026-02-28"]),
            ds(&["2026-03-10", "2026-03-08", "2026-03-07", "2026-03-06"]),
        ];
        let today = d("2026-03-10");

        for dates in samples {
            assert!(current_streak(&dates, today) <= longest_streak(&dates));
        }
    }

    #[test]
    fn streak_functions_are_pure() {
        let dates = ds(&["2026-03-10", "2026-03-09"]);
        let today = d("2026-03-10");

        assert_eq!(current_streak(&dates, today), current_streak(&dates, today));
        assert_eq!(longest_streak(&dates), longest_streak(&dates));
    }

    #[test]
    fn week_count_starts_monday() {
        // 2026-03-10 is a Tuesday; Monday is 03-09.
        let dates = ds(&["2026-03-08", "2026-03-09", "2026-03-10"]);
        assert_eq!(count_this_week(&dates, d("2026-03-10")), 2);
    }

    #[test]
    fn month_count_ignores_previous_month() {
        let dates = ds(&["2026-02-28", "2026-03-01", "2026-03-09"]);
        assert_eq!(count_this_month(&dates, d("2026-03-10")), 2);
    }
}
