//! 时间工具函数 (店铺时区转换)
//!
//! 所有日期→时间戳转换统一在这里完成，存储层只保存 `i64` Unix millis。

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{AppError, AppResult};

/// 营收统计时间范围
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Today,
    /// 本周 (周一开始)
    Week,
    Month,
    Year,
    #[default]
    All,
    /// 显式起止日期 (含首尾)
    Custom,
}

/// 半开区间 `[start, end)`，单位 Unix millis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn contains(&self, millis: i64) -> bool {
        millis >= self.start && millis < self.end
    }
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期开始 (00:00:00) → Unix millis (店铺时区)
///
/// DST gap fallback: 如果本地零点不存在 (夏令时跳跃)，按 UTC 计算。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (店铺时区)
///
/// 调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// 时间戳 → 店铺时区的本地时间
pub fn to_local(millis: i64, tz: Tz) -> Option<DateTime<Tz>> {
    tz.timestamp_millis_opt(millis).single()
}

/// 按日分组键 `YYYY-MM-DD`
pub fn day_key(millis: i64, tz: Tz) -> Option<String> {
    to_local(millis, tz).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// 按月分组键 `YYYY-MM`
pub fn month_key(millis: i64, tz: Tz) -> Option<String> {
    to_local(millis, tz).map(|dt| dt.format("%Y-%m").to_string())
}

/// 按年分组键 `YYYY`
pub fn year_key(millis: i64, tz: Tz) -> Option<String> {
    to_local(millis, tz).map(|dt| dt.format("%Y").to_string())
}

/// 计算统计窗口
///
/// 返回 `None` 表示不限时间 (`all`)。`custom` 需要 `start_date` 和
/// `end_date`，结束日期包含在内。任一日期参数存在时视为 `custom`。
pub fn resolve_window(
    range: TimeRange,
    start_date: Option<&str>,
    end_date: Option<&str>,
    tz: Tz,
    now_millis: i64,
) -> AppResult<Option<TimeWindow>> {
    let range = if start_date.is_some() || end_date.is_some() {
        TimeRange::Custom
    } else {
        range
    };

    let today = to_local(now_millis, tz)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| AppError::internal("Current time out of range"))?;

    let (first, last) = match range {
        TimeRange::All => return Ok(None),
        TimeRange::Today => (today, today),
        TimeRange::Week => {
            let offset = i64::from(today.weekday().num_days_from_monday());
            let monday = today - Duration::days(offset);
            (monday, monday + Duration::days(6))
        }
        TimeRange::Month => {
            let first = today.with_day(1).unwrap_or(today);
            let next_month = if today.month() == 12 {
                NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
            };
            let last = next_month.and_then(|d| d.pred_opt()).unwrap_or(today);
            (first, last)
        }
        TimeRange::Year => {
            let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
            let last = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
            (first, last)
        }
        TimeRange::Custom => {
            let start = start_date.ok_or_else(|| AppError::required("startDate"))?;
            let end = end_date.ok_or_else(|| AppError::required("endDate"))?;
            let first = parse_date(start)?;
            let last = parse_date(end)?;
            if first > last {
                return Err(AppError::validation(format!(
                    "startDate {} is after endDate {}",
                    first, last
                )));
            }
            (first, last)
        }
    };

    Ok(Some(TimeWindow {
        start: day_start_millis(first, tz),
        end: day_end_millis(last, tz),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(tz: Tz, y: i32, m: u32, d: u32, h: u32) -> i64 {
        tz.with_ymd_and_hms(y, m, d, h, 0, 0)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_today_window() {
        let tz = Tz::UTC;
        let now = millis(tz, 2026, 3, 18, 15);
        let w = resolve_window(TimeRange::Today, None, None, tz, now)
            .unwrap()
            .unwrap();
        assert_eq!(w.start, millis(tz, 2026, 3, 18, 0));
        assert_eq!(w.end, millis(tz, 2026, 3, 19, 0));
        assert!(w.contains(now));
    }

    #[test]
    fn test_week_starts_monday() {
        let tz = Tz::UTC;
        // 2026-03-18 is a Wednesday
        let now = millis(tz, 2026, 3, 18, 9);
        let w = resolve_window(TimeRange::Week, None, None, tz, now)
            .unwrap()
            .unwrap();
        assert_eq!(w.start, millis(tz, 2026, 3, 16, 0));
        assert_eq!(w.end, millis(tz, 2026, 3, 23, 0));
    }

    #[test]
    fn test_month_window_december_rollover() {
        let tz = Tz::UTC;
        let now = millis(tz, 2025, 12, 20, 9);
        let w = resolve_window(TimeRange::Month, None, None, tz, now)
            .unwrap()
            .unwrap();
        assert_eq!(w.start, millis(tz, 2025, 12, 1, 0));
        assert_eq!(w.end, millis(tz, 2026, 1, 1, 0));
    }

    #[test]
    fn test_year_window() {
        let tz = Tz::UTC;
        let now = millis(tz, 2026, 7, 4, 9);
        let w = resolve_window(TimeRange::Year, None, None, tz, now)
            .unwrap()
            .unwrap();
        assert_eq!(w.start, millis(tz, 2026, 1, 1, 0));
        assert_eq!(w.end, millis(tz, 2027, 1, 1, 0));
    }

    #[test]
    fn test_all_is_unbounded() {
        assert!(
            resolve_window(TimeRange::All, None, None, Tz::UTC, 0)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_custom_inclusive_end() {
        let tz = Tz::UTC;
        let w = resolve_window(
            TimeRange::Custom,
            Some("2026-01-10"),
            Some("2026-01-12"),
            tz,
            0,
        )
        .unwrap()
        .unwrap();
        assert_eq!(w.start, millis(tz, 2026, 1, 10, 0));
        assert_eq!(w.end, millis(tz, 2026, 1, 13, 0));
    }

    #[test]
    fn test_dates_imply_custom() {
        let w = resolve_window(
            TimeRange::All,
            Some("2026-01-10"),
            Some("2026-01-10"),
            Tz::UTC,
            0,
        )
        .unwrap();
        assert!(w.is_some());
    }

    #[test]
    fn test_custom_rejects_inverted_or_missing() {
        assert!(
            resolve_window(
                TimeRange::Custom,
                Some("2026-02-01"),
                Some("2026-01-01"),
                Tz::UTC,
                0
            )
            .is_err()
        );
        assert!(resolve_window(TimeRange::Custom, Some("2026-02-01"), None, Tz::UTC, 0).is_err());
        assert!(resolve_window(TimeRange::Custom, Some("01/02/2026"), Some("2026-02-02"), Tz::UTC, 0).is_err());
    }

    #[test]
    fn test_window_uses_shop_timezone() {
        let tz: Tz = "Asia/Shanghai".parse().unwrap();
        // 2026-03-18 01:00 in Shanghai is still 2026-03-17 in UTC
        let now = millis(tz, 2026, 3, 18, 1);
        let w = resolve_window(TimeRange::Today, None, None, tz, now)
            .unwrap()
            .unwrap();
        assert_eq!(w.start, millis(tz, 2026, 3, 18, 0));
        assert_eq!(day_key(now, tz).as_deref(), Some("2026-03-18"));
        assert_eq!(day_key(now, Tz::UTC).as_deref(), Some("2026-03-17"));
    }

    #[test]
    fn test_bucket_keys() {
        let tz = Tz::UTC;
        let t = millis(tz, 2026, 2, 5, 12);
        assert_eq!(day_key(t, tz).as_deref(), Some("2026-02-05"));
        assert_eq!(month_key(t, tz).as_deref(), Some("2026-02"));
        assert_eq!(year_key(t, tz).as_deref(), Some("2026"));
    }
}
