// src/dates.rs

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Years a timestamp may fall in. Outside this range the window and calendar
/// arithmetic would run into chrono's date limits.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parse a raw timestamp cell. Unparseable input yields `None`, never an error.
///
/// Accepted forms: RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]`, `YYYY-MM-DDTHH:MM:SS[.fff]`,
/// bare `YYYY-MM-DD`, and integer epoch milliseconds. Naive values are taken as UTC.
/// Timestamps whose year lies outside [`YEAR_RANGE`] are rejected.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    parse_any(raw).filter(|ts| YEAR_RANGE.contains(&ts.year()))
}

fn parse_any(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        let ms: i64 = s.parse().ok()?;
        return Utc.timestamp_millis_opt(ms).single();
    }
    None
}

/// Calendar day of a timestamp in UTC (time of day stripped).
pub fn to_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// `"YYYY-MM-DD"`
pub fn day_key(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// `"YYYY-MM"`
pub fn month_key(d: NaiveDate) -> String {
    format!("{:04}-{:02}", d.year(), d.month())
}

pub fn first_of_month(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// First day of the month after `d`'s month, `None` past chrono's last month.
pub fn next_month(d: NaiveDate) -> Option<NaiveDate> {
    first_of_month(d).checked_add_months(Months::new(1))
}

pub fn sunday_on_or_before(d: NaiveDate) -> NaiveDate {
    add_days(d, -(d.weekday().num_days_from_sunday() as i64))
}

pub fn saturday_on_or_after(d: NaiveDate) -> NaiveDate {
    add_days(d, 6 - d.weekday().num_days_from_sunday() as i64)
}

/// Saturates at `NaiveDate::MIN` / `NaiveDate::MAX`.
pub fn add_days(d: NaiveDate, n: i64) -> NaiveDate {
    let step = Days::new(n.unsigned_abs());
    if n >= 0 {
        d.checked_add_days(step).unwrap_or(NaiveDate::MAX)
    } else {
        d.checked_sub_days(step).unwrap_or(NaiveDate::MIN)
    }
}

/// Whole days from `a` to `b` (negative when `b` precedes `a`).
pub fn diff_days(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Parse a `"YYYY-MM"` key into the first day of that month.
pub fn parse_month_key(ym: &str) -> Option<NaiveDate> {
    let (y, m) = ym.split_once('-')?;
    NaiveDate::from_ymd_opt(y.trim().parse().ok()?, m.trim().parse().ok()?, 1)
}

/// `"2024-01"` → `"Jan 2024"`. Unparseable keys are returned unchanged.
pub fn month_label(ym: &str) -> String {
    match parse_month_key(ym) {
        Some(d) => format!("{} {}", MONTH_ABBR[d.month0() as usize], d.year()),
        None => ym.to_string(),
    }
}

/// `"2024-01"` → `"Jan"`.
pub fn month_tick(ym: &str) -> String {
    match parse_month_key(ym) {
        Some(d) => MONTH_ABBR[d.month0() as usize].to_string(),
        None => ym.to_string(),
    }
}

pub fn month_abbr(d: NaiveDate) -> &'static str {
    MONTH_ABBR[d.month0() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_timestamp_forms() {
        let expected = ymd(2024, 1, 10);
        for raw in [
            "2024-01-10T08:30:00Z",
            "2024-01-10T08:30:00+00:00",
            "2024-01-10 08:30:00",
            "2024-01-10T08:30:00.250",
            "2024-01-10",
            " 2024-01-10 ",
        ] {
            let ts = parse_timestamp(raw).unwrap_or_else(|| panic!("failed on {raw}"));
            assert_eq!(to_day(ts), expected, "{raw}");
        }
    }

    #[test]
    fn offset_timestamps_truncate_in_utc() {
        let ts = parse_timestamp("2024-01-10T23:30:00-02:00").unwrap();
        assert_eq!(to_day(ts), ymd(2024, 1, 11));
    }

    #[test]
    fn epoch_millis_are_accepted() {
        let ts = parse_timestamp("1704844800000").unwrap();
        assert_eq!(to_day(ts), ymd(2024, 1, 10));
    }

    #[test]
    fn garbage_is_none() {
        for raw in ["", "   ", "not a date", "2024-13-45", "10/01/2024x"] {
            assert!(parse_timestamp(raw).is_none(), "{raw}");
        }
    }

    #[test]
    fn keys_are_zero_padded() {
        assert_eq!(day_key(ymd(2024, 3, 1)), "2024-03-01");
        assert_eq!(month_key(ymd(2024, 3, 1)), "2024-03");
    }

    #[test]
    fn week_boundaries() {
        // 2024-03-01 is a Friday
        assert_eq!(sunday_on_or_before(ymd(2024, 3, 1)), ymd(2024, 2, 25));
        assert_eq!(saturday_on_or_after(ymd(2024, 3, 1)), ymd(2024, 3, 2));
        assert_eq!(sunday_on_or_before(ymd(2024, 3, 3)), ymd(2024, 3, 3));
    }

    #[test]
    fn month_stepping_crosses_years() {
        assert_eq!(next_month(ymd(2023, 12, 31)), Some(ymd(2024, 1, 1)));
        assert_eq!(next_month(ymd(2024, 1, 31)), Some(ymd(2024, 2, 1)));
        assert_eq!(first_of_month(ymd(2024, 2, 29)), ymd(2024, 2, 1));
    }

    #[test]
    fn month_stepping_stops_at_the_last_representable_month() {
        assert_eq!(next_month(NaiveDate::MAX), None);
    }

    #[test]
    fn day_arithmetic_saturates_at_the_date_limits() {
        assert_eq!(add_days(NaiveDate::MAX, 1), NaiveDate::MAX);
        assert_eq!(add_days(NaiveDate::MIN, -7), NaiveDate::MIN);
        assert!(saturday_on_or_after(NaiveDate::MAX) <= NaiveDate::MAX);
        assert!(sunday_on_or_before(NaiveDate::MIN) >= NaiveDate::MIN);
    }

    #[test]
    fn far_out_of_range_timestamps_are_rejected() {
        // epoch ms for 262142-12-15 and a year-10000 ISO date
        for raw in ["8210265408000000", "+10000-01-01T00:00:00Z", "253402300800000"] {
            assert!(parse_timestamp(raw).is_none(), "{raw}");
        }
        assert!(parse_timestamp("253402214400000").is_some());
    }

    #[test]
    fn day_arithmetic() {
        assert_eq!(add_days(ymd(2024, 3, 1), -364), ymd(2023, 3, 3));
        assert_eq!(diff_days(ymd(2024, 1, 1), ymd(2024, 3, 1)), 60);
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_label("2024-01"), "Jan 2024");
        assert_eq!(month_tick("2023-12"), "Dec");
        assert_eq!(month_label("bogus"), "bogus");
    }
}
