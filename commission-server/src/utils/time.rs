//! 时间工具函数 (业务时区转换)
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{DateTime, Datelike, NaiveDate};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 校验可选日期字符串 (YYYY-MM-DD)
pub fn validate_optional_date(date: &Option<String>) -> AppResult<()> {
    if let Some(d) = date {
        parse_date(d)?;
    }
    Ok(())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// 当前自然月的 [start, end) Unix millis (业务时区)
pub fn month_bounds_millis(now: DateTime<Tz>) -> (i64, i64) {
    let tz = now.timezone();
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1).unwrap_or(now.date_naive());
    let next = if now.month() == 12 {
        NaiveDate::from_ymd_opt(now.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(now.year(), now.month() + 1, 1)
    }
    .unwrap_or(first);
    (day_start_millis(first, tz), day_start_millis(next, tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("2026-02-30").is_err());
        assert!(parse_date("15/03/2026").is_err());
        assert!(parse_date("2026-03-15").is_ok());
    }

    #[test]
    fn month_bounds_cover_december_rollover() {
        let tz: Tz = "America/Sao_Paulo".parse().unwrap();
        let now = tz.with_ymd_and_hms(2025, 12, 20, 10, 0, 0).unwrap();
        let (start, end) = month_bounds_millis(now);

        let expected_start = tz.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        let expected_end = tz.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(start, expected_start.timestamp_millis());
        assert_eq!(end, expected_end.timestamp_millis());
        assert!(start <= now.timestamp_millis() && now.timestamp_millis() < end);
    }

    #[test]
    fn day_end_is_next_midnight() {
        let tz: Tz = "UTC".parse().unwrap();
        let d = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(day_end_millis(d, tz) - day_start_millis(d, tz), 86_400_000);
    }
}
