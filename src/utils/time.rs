use chrono::{NaiveDate, NaiveTime, Utc};

/// The whole system resolves "today" against a fixed +09:00 (KST) offset,
/// once per request, so streak and date-boundary math never depends on the
/// host machine's local timezone.
pub fn today_kst() -> NaiveDate {
    let kst_offset = chrono::FixedOffset::east_opt(9 * 3600).unwrap();
    let now_kst = Utc::now().with_timezone(&kst_offset);
    now_kst.date_naive()
}

/// Parses a `HH:MM` clock-time string, rejecting anything that is not
/// zero-padded. Stored times are compared lexicographically, so `9:30`
/// must not slip through.
pub fn parse_clock_time(time_str: &str) -> Option<NaiveTime> {
    let time = NaiveTime::parse_from_str(time_str, "%H:%M").ok()?;
    if time.format("%H:%M").to_string() != time_str {
        return None;
    }
    Some(time)
}

/// Next calendar day in the fixed (proleptic Gregorian) calendar.
pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}

pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

pub fn format_duration_minutes(minutes: i64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    if hours > 0 {
        format!("{}시간 {}분", hours, mins)
    } else {
        format!("{}분", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn parse_clock_time_accepts_padded_hh_mm() {
        assert!(parse_clock_time("00:00").is_some());
        assert!(parse_clock_time("23:59").is_some());
        assert!(parse_clock_time("07:05").is_some());
    }

    #[test]
    fn parse_clock_time_rejects_unpadded_and_garbage() {
        assert!(parse_clock_time("9:30").is_none());
        assert!(parse_clock_time("24:00").is_none());
        assert!(parse_clock_time("12:5").is_none());
        assert!(parse_clock_time("1230").is_none());
        assert!(parse_clock_time("").is_none());
    }

    #[test]
    fn next_day_crosses_month_and_year() {
        assert_eq!(next_day(d("2026-01-31")), Some(d("2026-02-01")));
        assert_eq!(next_day(d("2026-12-31")), Some(d("2027-01-01")));
        assert_eq!(next_day(d("2024-02-28")), Some(d("2024-02-29")));
    }

    #[test]
    fn days_between_is_signed() {
        assert_eq!(days_between(d("2026-03-01"), d("2026-03-04")), 3);
        assert_eq!(days_between(d("2026-03-04"), d("2026-03-01")), -3);
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration_minutes(45), "45분");
        assert_eq!(format_duration_minutes(90), "1시간 30분");
        assert_eq!(format_duration_minutes(0), "0분");
    }
}
