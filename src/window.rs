// src/window.rs

use chrono::NaiveDate;

use crate::dates::{add_days, first_of_month, month_key, next_month};

/// Days in the rolling window, both ends inclusive.
pub const WINDOW_DAYS: i64 = 365;

/// The trailing 365-day interval `[end - 364d, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    /// Window ending on `end`.
    pub fn ending_at(end: NaiveDate) -> Self {
        Window { start: add_days(end, -(WINDOW_DAYS - 1)), end }
    }

    /// Window anchored on the latest of `days`; `None` when there are none.
    /// The anchor is always the data, never the wall clock.
    pub fn from_days<I>(days: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        days.into_iter().max().map(Self::ending_at)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn month_span(&self) -> MonthSpan {
        MonthSpan::between(self.start, self.end)
    }
}

/// Gap-filled, strictly increasing list of `"YYYY-MM"` keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthSpan(Vec<String>);

impl MonthSpan {
    pub fn empty() -> Self {
        MonthSpan(Vec::new())
    }

    /// Every month from the one containing `start` to the one containing `end`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        let last = first_of_month(end);
        let mut cursor = first_of_month(start);
        let mut months = Vec::new();
        while cursor <= last {
            months.push(month_key(cursor));
            match next_month(cursor) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        MonthSpan(months)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Column index of `month`, if it lies in the span.
    pub fn index_of(&self, month: &str) -> Option<usize> {
        self.0.binary_search_by(|m| m.as_str().cmp(month)).ok()
    }
}

impl<'a> IntoIterator for &'a MonthSpan {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
