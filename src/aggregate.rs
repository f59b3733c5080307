// src/aggregate.rs

use std::collections::{BTreeMap, HashMap};

use crate::dates::{day_key, month_key};
use crate::dimension::{numeric_value, Dimension, FamilyColumns};
use crate::record::{ActorFilter, Columns, ParsedEvent, Record};
use crate::window::{MonthSpan, Window};

/// One line of a day's detail list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDetail {
    pub actor: String,
    pub label: String,
}

/// Per-day counts and detail lists for the calendar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayBucket {
    pub counts: BTreeMap<String, u32>,
    pub details: BTreeMap<String, Vec<DayDetail>>,
}

impl DayBucket {
    pub fn count(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn details(&self, key: &str) -> &[DayDetail] {
        self.details.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    fn push(&mut self, key: String, detail: DayDetail) {
        *self.counts.entry(key.clone()).or_insert(0) += 1;
        self.details.entry(key).or_default().push(detail);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTotal {
    pub month: String,
    pub count: u32,
}

/// Share of a month's events whose status column reads `COMPLETED`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRate {
    pub month: String,
    pub pct: f64,
    pub completed: u32,
    pub total: u32,
}

/// `row → month → value`, dense over the month span it was built for.
/// Anything not present reads as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionMatrix {
    months: Vec<String>,
    rows: BTreeMap<String, BTreeMap<String, f64>>,
}

impl DimensionMatrix {
    pub fn new(months: &MonthSpan) -> Self {
        DimensionMatrix { months: months.as_slice().to_vec(), rows: BTreeMap::new() }
    }

    pub fn months(&self) -> &[String] {
        &self.months
    }

    /// Add a zero row for `row` if it is missing.
    pub fn ensure_row(&mut self, row: &str) {
        if !self.rows.contains_key(row) {
            let dense = self.months.iter().map(|m| (m.clone(), 0.0)).collect();
            self.rows.insert(row.to_string(), dense);
        }
    }

    pub fn ensure_rows<I, S>(&mut self, rows: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for r in rows {
            self.ensure_row(r.as_ref());
        }
    }

    pub fn add(&mut self, row: &str, month: &str, v: f64) {
        self.ensure_row(row);
        if let Some(cells) = self.rows.get_mut(row) {
            *cells.entry(month.to_string()).or_insert(0.0) += v;
        }
    }

    pub fn get(&self, row: &str, month: &str) -> f64 {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(month))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn row(&self, row: &str) -> Option<&BTreeMap<String, f64>> {
        self.rows.get(row)
    }

    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of `row` in month-span order.
    pub fn series(&self, row: &str) -> Vec<f64> {
        self.months.iter().map(|m| self.get(row, m)).collect()
    }

    pub fn row_total(&self, row: &str) -> f64 {
        self.rows.get(row).map(|cells| cells.values().sum()).unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.rows.values().flat_map(|cells| cells.values()).sum()
    }

    /// Largest cell among `rows` over the span; 0 when there is nothing positive.
    pub fn vmax<S: AsRef<str>>(&self, rows: &[S]) -> f64 {
        rows.iter()
            .flat_map(|r| self.months.iter().map(move |m| self.get(r.as_ref(), m)))
            .fold(0.0, f64::max)
    }

    /// Rows by descending total, ties broken by name.
    pub fn ranked_rows(&self) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> =
            self.rows.keys().map(|r| (r.clone(), self.row_total(r))).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// Same cells re-keyed by `f(row)`; rows that collide are summed.
    pub fn display_map<F>(&self, f: F) -> DimensionMatrix
    where
        F: Fn(&str) -> String,
    {
        let mut out = DimensionMatrix { months: self.months.clone(), rows: BTreeMap::new() };
        for (row, cells) in &self.rows {
            let key = f(row);
            out.ensure_row(&key);
            for (month, v) in cells {
                out.add(&key, month, *v);
            }
        }
        out
    }
}

/// What to aggregate and how.
#[derive(Debug, Clone, Copy)]
pub struct AggregateRequest<'a> {
    pub columns: &'a Columns,
    pub filter: &'a ActorFilter,
    pub dimensions: &'a [Dimension],
}

/// Everything one refresh needs, produced in a single pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub window: Option<Window>,
    pub months: MonthSpan,
    pub days: DayBucket,
    /// Dense over `months`.
    pub monthly: Vec<MonthTotal>,
    /// Keyed by [`Dimension::key`].
    pub matrices: BTreeMap<String, DimensionMatrix>,
    /// Dense over `months`; empty when no completion column is configured.
    pub completion: Vec<CompletionRate>,
    /// Records inside the window that matched the filter.
    pub contributing: usize,
    /// Records dropped for an unparseable timestamp.
    pub skipped: usize,
}

impl Aggregation {
    pub fn empty() -> Self {
        Aggregation::default()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_none()
    }

    pub fn matrix(&self, key: &str) -> Option<&DimensionMatrix> {
        self.matrices.get(key)
    }
}

/// Per-dimension accumulation state for one pass.
enum Bucketer<'a> {
    Actor,
    Label,
    Metrics(&'a [String]),
    Family(FamilyColumns),
}

impl Bucketer<'_> {
    fn accumulate(&self, matrix: &mut DimensionMatrix, event: &ParsedEvent, record: &Record, month: &str) {
        match self {
            Bucketer::Actor => matrix.add(event.actor(), month, 1.0),
            Bucketer::Label => matrix.add(event.label(), month, 1.0),
            Bucketer::Metrics(cols) => {
                for col in cols.iter() {
                    let v = record.get(col).map(numeric_value).unwrap_or(0.0);
                    matrix.add(col, month, v);
                }
            }
            Bucketer::Family(fam) => {
                for (idx, v) in fam.values(record) {
                    matrix.add(&fam.columns[idx], month, v);
                }
            }
        }
    }
}

fn is_completed(status: &str) -> bool {
    status.trim().to_uppercase() == "COMPLETED"
}

/// Bucket `records` into the rolling window under `req.filter`.
///
/// Records with an unparseable or out-of-range timestamp are skipped and counted; they never
/// abort the pass. With no valid timestamps at all the result is
/// [`Aggregation::empty`] (plus the skipped count).
pub fn aggregate(records: &[Record], req: &AggregateRequest<'_>) -> Aggregation {
    let mut events = Vec::with_capacity(records.len());
    let mut skipped = 0usize;
    for (idx, record) in records.iter().enumerate() {
        match ParsedEvent::from_record(record, req.columns) {
            Some(ev) => events.push((idx, ev)),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, total = records.len(), "skipped rows with unusable timestamps");
    }

    let Some(window) = Window::from_days(events.iter().map(|(_, ev)| ev.day)) else {
        return Aggregation { skipped, ..Aggregation::empty() };
    };
    let months = window.month_span();

    let bucketers: Vec<(String, Bucketer<'_>)> = req
        .dimensions
        .iter()
        .map(|d| {
            let b = match d {
                Dimension::Actor => Bucketer::Actor,
                Dimension::Label => Bucketer::Label,
                Dimension::Metrics(cols) => Bucketer::Metrics(cols),
                Dimension::Family(fam) => Bucketer::Family(FamilyColumns::discover(fam, records)),
            };
            (d.key().to_string(), b)
        })
        .collect();

    let mut matrices: BTreeMap<String, DimensionMatrix> = BTreeMap::new();
    for (key, b) in &bucketers {
        let m = matrices.entry(key.clone()).or_insert_with(|| DimensionMatrix::new(&months));
        match b {
            Bucketer::Metrics(cols) => m.ensure_rows(cols.iter()),
            Bucketer::Family(fam) => m.ensure_rows(&fam.columns),
            _ => {}
        }
    }

    let mut days = DayBucket::default();
    let mut month_counts: HashMap<String, u32> = HashMap::new();
    let mut completed: HashMap<String, u32> = HashMap::new();
    let mut contributing = 0usize;

    for (idx, ev) in &events {
        if !window.contains(ev.day) || !req.filter.matches(&ev.raw_actor) {
            continue;
        }
        let record = &records[*idx];
        contributing += 1;

        days.push(
            day_key(ev.day),
            DayDetail { actor: ev.actor().to_string(), label: ev.label().to_string() },
        );

        let mk = month_key(ev.day);
        *month_counts.entry(mk.clone()).or_insert(0) += 1;
        if let Some(col) = &req.columns.completion {
            if record.get(col).is_some_and(is_completed) {
                *completed.entry(mk.clone()).or_insert(0) += 1;
            }
        }

        for (key, b) in &bucketers {
            if let Some(m) = matrices.get_mut(key) {
                b.accumulate(m, ev, record, &mk);
            }
        }
    }

    let monthly = months
        .iter()
        .map(|m| MonthTotal { month: m.clone(), count: month_counts.get(m).copied().unwrap_or(0) })
        .collect();

    let completion = match req.columns.completion {
        Some(_) => months
            .iter()
            .map(|m| {
                let total = month_counts.get(m).copied().unwrap_or(0);
                let done = completed.get(m).copied().unwrap_or(0);
                let pct = if total == 0 { 0.0 } else { done as f64 / total as f64 * 100.0 };
                CompletionRate { month: m.clone(), pct, completed: done, total }
            })
            .collect(),
        None => Vec::new(),
    };

    tracing::debug!(
        start = %window.start,
        end = %window.end,
        contributing,
        filter = req.filter.as_str(),
        "aggregated window"
    );

    Aggregation {
        window: Some(window),
        months,
        days,
        monthly,
        matrices,
        completion,
        contributing,
        skipped,
    }
}
