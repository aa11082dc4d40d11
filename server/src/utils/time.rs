//! Time helpers — business-timezone conversions
//!
//! All date-to-timestamp conversion happens in the API handler layer;
//! repositories only ever see `i64` Unix millis.

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use shared::error::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Date + hour/min/sec to Unix millis in the business timezone.
///
/// DST gap fallback: if the local time does not exist, fall back to
/// UTC.
fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = match date.and_hms_opt(hour, min, sec) {
        Some(n) => n,
        None => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
    };
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of a date (00:00:00) as Unix millis in the business timezone
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// End of a date as Unix millis in the business timezone.
///
/// Returns the last millisecond of the day; callers use inclusive
/// `<= end` semantics.
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz) - 1
}

/// Current calendar date in the business timezone
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// Inclusive millisecond range covering today in the business timezone
pub fn today_range(tz: Tz) -> (i64, i64) {
    let date = today(tz);
    (day_start_millis(date, tz), day_end_millis(date, tz))
}

/// Start of the month `months_back` months before today (1st, 00:00)
pub fn month_start_millis_back(months_back: u32, tz: Tz) -> i64 {
    let now = today(tz);
    let total = now.year() * 12 + now.month0() as i32 - months_back as i32;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .unwrap_or(now);
    day_start_millis(first, tz)
}
