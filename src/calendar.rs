// src/calendar.rs

use chrono::{Datelike, NaiveDate};

use crate::aggregate::{DayBucket, DayDetail};
use crate::dates::{
    add_days, day_key, diff_days, first_of_month, month_abbr, next_month, saturday_on_or_after,
    sunday_on_or_before,
};
use crate::window::Window;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub key: String,
    /// Column, counted from the first Sunday.
    pub week: usize,
    /// Row, Sunday = 0.
    pub weekday: usize,
    /// Padding cells before the window start or after its end are hidden.
    pub in_window: bool,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthMarker {
    pub week: usize,
    pub text: String,
}

/// Week-column grid (Sunday..Saturday rows) covering a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub first_sunday: NaiveDate,
    pub last_saturday: NaiveDate,
    pub weeks: usize,
    pub cells: Vec<CalendarCell>,
    pub months: Vec<MonthMarker>,
}

impl CalendarGrid {
    pub fn build(window: &Window, days: &DayBucket) -> Self {
        let first_sunday = sunday_on_or_before(window.start);
        let last_saturday = saturday_on_or_after(window.end);
        let total_days = diff_days(first_sunday, last_saturday) + 1;
        let weeks = ((total_days + 6) / 7) as usize;

        let cells = (0..total_days)
            .map(|i| {
                let date = add_days(first_sunday, i);
                let key = day_key(date);
                let in_window = window.contains(date);
                let count = if in_window { days.count(&key) } else { 0 };
                CalendarCell {
                    date,
                    key,
                    week: (i / 7) as usize,
                    weekday: (i % 7) as usize,
                    in_window,
                    count,
                }
            })
            .collect();

        CalendarGrid { first_sunday, last_saturday, weeks, cells, months: month_markers(window, first_sunday) }
    }

    pub fn cell(&self, week: usize, weekday: usize) -> Option<&CalendarCell> {
        self.cells.get(week * 7 + weekday)
    }

    pub fn max_count(&self) -> u32 {
        self.cells.iter().map(|c| c.count).max().unwrap_or(0)
    }
}

/// A marker at each month start inside the window. The year is shown on the
/// first marker, on every January and whenever the year changes.
fn month_markers(window: &Window, first_sunday: NaiveDate) -> Vec<MonthMarker> {
    let mut cursor = Some(first_of_month(window.start));
    if cursor < Some(window.start) {
        cursor = cursor.and_then(next_month);
    }
    let mut out = Vec::new();
    let mut last_year = None;
    while let Some(month) = cursor.filter(|m| *m <= window.end) {
        let year = month.year();
        let show_year = last_year != Some(year) || month.month() == 1;
        let text = if show_year {
            format!("{} {}", month_abbr(month), year)
        } else {
            month_abbr(month).to_string()
        };
        out.push(MonthMarker { week: (diff_days(first_sunday, month) / 7) as usize, text });
        last_year = Some(year);
        cursor = next_month(month);
    }
    out
}

/// Hover text for one day: a header line, then details sorted by actor and label.
pub fn day_tooltip(key: &str, details: &[DayDetail], max_lines: usize, noun: &str) -> String {
    let n = details.len();
    let mut lines = vec![format!("{n} {noun}{} on {key}", if n == 1 { "" } else { "s" })];

    let mut sorted: Vec<&DayDetail> = details.iter().collect();
    sorted.sort_by(|a, b| a.actor.cmp(&b.actor).then_with(|| a.label.cmp(&b.label)));
    lines.extend(sorted.iter().take(max_lines).map(|d| format!("• {} — {}", d.actor, d.label)));
    if sorted.len() > max_lines {
        lines.push(format!("… +{} more", sorted.len() - max_lines));
    }
    lines.join("\n")
}

pub fn window_caption(window: &Window) -> String {
    format!("Window: {} → {}", day_key(window.start), day_key(window.end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_is_whole_weeks_around_the_window() {
        let window = Window::ending_at(ymd(2024, 3, 1));
        let mut days = DayBucket::default();
        days.counts.insert("2024-01-10".into(), 2);
        let grid = CalendarGrid::build(&window, &days);

        assert_eq!(grid.first_sunday.weekday(), chrono::Weekday::Sun);
        assert_eq!(grid.last_saturday, ymd(2024, 3, 2));
        assert_eq!(grid.cells.len(), grid.weeks * 7);
        assert_eq!(grid.cells.iter().filter(|c| c.in_window).count(), 365);
        assert_eq!(grid.max_count(), 2);

        let jan10 = grid.cells.iter().find(|c| c.key == "2024-01-10").unwrap();
        assert_eq!(jan10.weekday, 3); // Wednesday
        assert_eq!(grid.cell(jan10.week, jan10.weekday), Some(jan10));
        assert!(!grid.cells.last().unwrap().in_window);
    }

    #[test]
    fn month_markers_skip_partial_first_month() {
        let window = Window::ending_at(ymd(2024, 3, 1)); // starts 2023-03-03
        let grid = CalendarGrid::build(&window, &DayBucket::default());
        let texts: Vec<&str> = grid.months.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts.first(), Some(&"Apr 2023"));
        assert_eq!(texts[1], "May");
        assert!(texts.contains(&"Jan 2024"));
        assert_eq!(texts.last(), Some(&"Mar"));
        assert!(grid.months.windows(2).all(|w| w[0].week < w[1].week));
    }

    #[test]
    fn grid_at_the_last_accepted_year() {
        let window = Window::ending_at(ymd(9999, 12, 31));
        let grid = CalendarGrid::build(&window, &DayBucket::default());
        assert_eq!(grid.cells.len(), grid.weeks * 7);
        assert_eq!(grid.cells.iter().filter(|c| c.in_window).count(), 365);
        assert_eq!(grid.months.last().map(|m| m.text.as_str()), Some("Dec"));
    }

    #[test]
    fn tooltip_sorts_and_truncates() {
        let details = vec![
            DayDetail { actor: "b".into(), label: "x".into() },
            DayDetail { actor: "a".into(), label: "z".into() },
            DayDetail { actor: "a".into(), label: "y".into() },
        ];
        let text = day_tooltip("2024-01-10", &details, 2, "session");
        assert_eq!(text, "3 sessions on 2024-01-10\n• a — y\n• a — z\n… +1 more");
        assert_eq!(day_tooltip("2024-01-10", &details[..1], 5, "session"), "1 session on 2024-01-10\n• b — x");
    }

    #[test]
    fn caption() {
        let window = Window::ending_at(ymd(2024, 3, 1));
        assert_eq!(window_caption(&window), "Window: 2023-03-03 → 2024-03-01");
    }
}
