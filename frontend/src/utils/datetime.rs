use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc, Weekday};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_date_time(date_time: NaiveDateTime) -> String {
    date_time.format(DATE_TIME_FORMAT).to_string()
}

/// Wall-clock timestamp in the wire format the backend uses for `created_at`.
pub fn current_timestamp() -> String {
    format_date_time(Utc::now().naive_utc())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Inclusive calendar-day span. A reversed range counts as zero days.
pub fn calculate_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return 0;
    }
    (end - start).num_days() + 1
}

/// Inclusive span counting Monday through Friday only.
pub fn calculate_work_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return 0;
    }
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as i64
}
