use crate::error::AppError;
use crate::utils::checkin_writer::CheckinInput;
use crate::utils::time::parse_clock_time;
use chrono::NaiveDate;

const MAX_MEMO_CHARS: usize = 500;
const MAX_DURATION_MINUTES: i32 = 999;
pub const MIN_YEAR: i32 = 2024;
pub const MAX_YEAR: i32 = 2030;

pub fn validate_clock_time(label: &str, value: &str) -> Result<(), AppError> {
    if parse_clock_time(value).is_none() {
        return Err(AppError::validation(format!(
            "{label}은(는) HH:MM 형식이어야 합니다"
        )));
    }
    Ok(())
}

pub fn validate_date_not_future(date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if date > today {
        return Err(AppError::validation("미래 날짜에는 체크인할 수 없습니다"));
    }
    Ok(())
}

pub fn validate_year(year: i32) -> Result<(), AppError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(AppError::validation("올바른 연도가 아닙니다"));
    }
    Ok(())
}

/// Full check-in validation; runs before any write is attempted.
pub fn validate_checkin(input: &CheckinInput, today: NaiveDate) -> Result<(), AppError> {
    validate_date_not_future(input.checkin_date, today)?;

    for (label, value) in [
        ("시작 시간", &input.start_time),
        ("종료 시간", &input.end_time),
        ("계획 시작 시간", &input.planned_start_time),
        ("계획 종료 시간", &input.planned_end_time),
    ] {
        if let Some(value) = value {
            validate_clock_time(label, value)?;
        }
    }

    if let Some(minutes) = input.duration_minutes {
        if !(1..=MAX_DURATION_MINUTES).contains(&minutes) {
            return Err(AppError::validation(
                "수행 시간은 1분 이상 999분 이하여야 합니다",
            ));
        }
    }

    if let Some(memo) = &input.memo {
        if memo.chars().count() > MAX_MEMO_CHARS {
            return Err(AppError::validation("메모는 500자를 넘을 수 없습니다"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn base_input() -> CheckinInput {
        CheckinInput {
            id: None,
            checkin_date: d("2026-03-01"),
            plan_id: None,
            planned_start_time: None,
            planned_end_time: None,
            start_time: None,
            end_time: None,
            duration_minutes: None,
            memo: None,
        }
    }

    #[test]
    fn accepts_minimal_checkin() {
        assert!(validate_checkin(&base_input(), d("2026-03-10")).is_ok());
    }

    #[test]
    fn rejects_future_date() {
        let mut input = base_input();
        input.checkin_date = d("2026-03-11");
        assert!(matches!(
            validate_checkin(&input, d("2026-03-10")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn rejects_unpadded_time() {
        let mut input = base_input();
        input.start_time = Some("9:30".to_string());
        assert!(validate_checkin(&input, d("2026-03-10")).is_err());
    }

    #[test]
    fn rejects_out_of_range_duration() {
        let mut input = base_input();
        input.duration_minutes = Some(0);
        assert!(validate_checkin(&input, d("2026-03-10")).is_err());

        input.duration_minutes = Some(1000);
        assert!(validate_checkin(&input, d("2026-03-10")).is_err());

        input.duration_minutes = Some(30);
        assert!(validate_checkin(&input, d("2026-03-10")).is_ok());
    }

    #[test]
    fn rejects_oversized_memo() {
        let mut input = base_input();
        input.memo = Some("가".repeat(501));
        assert!(validate_checkin(&input, d("2026-03-10")).is_err());

        input.memo = Some("가".repeat(500));
        assert!(validate_checkin(&input, d("2026-03-10")).is_ok());
    }

    #[test]
    fn year_bounds() {
        assert!(validate_year(2026).is_ok());
        assert!(validate_year(2023).is_err());
        assert!(validate_year(2031).is_err());
    }
}
