// src/dimension.rs

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::layout::LabelWidthOptions;
use crate::record::Record;

/// A family of numeric columns sharing a header prefix, e.g. `Category: Comms`,
/// `Category: Tooling`. Families are declared in config, not code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrefixFamily {
    /// Matrix key, e.g. `"category"`.
    pub name: String,
    /// Case-insensitive header prefix, e.g. `"Category:"`.
    pub prefix: String,
    #[serde(default)]
    pub title: String,
    /// Own label sizing; the matrix uses the wider of this and the shared width.
    #[serde(default)]
    pub label_width: Option<LabelWidthOptions>,
}

impl PrefixFamily {
    pub fn new(name: &str, prefix: &str, title: &str) -> Self {
        PrefixFamily {
            name: name.to_string(),
            prefix: prefix.to_string(),
            title: title.to_string(),
            label_width: None,
        }
    }

    /// Whether an already-normalised header belongs to this family.
    pub fn matches(&self, normalized: &str) -> bool {
        normalized
            .get(..self.prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&self.prefix))
    }

    /// Header with the prefix (and the whitespace after it) removed.
    pub fn display_name(&self, normalized: &str) -> String {
        if self.matches(normalized) {
            normalized[self.prefix.len()..].trim().to_string()
        } else {
            normalized.trim().to_string()
        }
    }
}

/// How a contributing record is bucketed into a matrix row.
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    /// One per record, keyed by normalised actor.
    Actor,
    /// One per record, keyed by normalised activity label.
    Label,
    /// Sum of each named numeric column; rows are the column names.
    Metrics(Vec<String>),
    /// Sum of every column discovered under a header prefix.
    Family(PrefixFamily),
}

impl Dimension {
    pub const ACTOR_KEY: &'static str = "actor";
    pub const LABEL_KEY: &'static str = "label";
    pub const METRICS_KEY: &'static str = "metrics";

    pub fn key(&self) -> &str {
        match self {
            Dimension::Actor => Self::ACTOR_KEY,
            Dimension::Label => Self::LABEL_KEY,
            Dimension::Metrics(_) => Self::METRICS_KEY,
            Dimension::Family(f) => &f.name,
        }
    }
}

/// Trim a header and peel off wrapping quotes, which upstream CSV quoting can nest.
pub fn normalize_header(h: &str) -> String {
    let mut s = h.trim();
    loop {
        let wrapped = s.len() >= 2
            && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')));
        if !wrapped {
            break;
        }
        s = s[1..s.len() - 1].trim();
    }
    s.trim_matches('"').trim().to_string()
}

/// Numeric cell value; empty, non-numeric and non-finite cells count as zero.
pub fn numeric_value(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// `incident_mechanics` → `incident mechanics`
pub fn metric_display_name(column: &str) -> String {
    column.replace('_', " ")
}

/// Columns of one family found in a record set, with raw header lookup.
#[derive(Debug, Clone)]
pub struct FamilyColumns {
    pub family: PrefixFamily,
    /// Normalised headers, sorted.
    pub columns: Vec<String>,
    raw_to_column: HashMap<String, usize>,
}

impl FamilyColumns {
    /// Scan every header of every record for members of `family`.
    pub fn discover(family: &PrefixFamily, records: &[Record]) -> Self {
        let raw_headers: BTreeSet<&str> = records.iter().flat_map(Record::headers).collect();

        let mut matched: Vec<(&str, String)> = raw_headers
            .into_iter()
            .map(|raw| (raw, normalize_header(raw)))
            .filter(|(_, norm)| family.matches(norm))
            .collect();
        matched.sort_by(|a, b| a.1.cmp(&b.1));

        let mut columns: Vec<String> = matched.iter().map(|(_, n)| n.clone()).collect();
        columns.dedup();

        let raw_to_column = matched
            .into_iter()
            .filter_map(|(raw, norm)| {
                columns.binary_search(&norm).ok().map(|idx| (raw.to_string(), idx))
            })
            .collect();

        tracing::debug!(family = %family.name, columns = columns.len(), "discovered family columns");
        FamilyColumns { family: family.clone(), columns, raw_to_column }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// `(column index, value)` for each family column present in `record`.
    /// When several raw headers normalise to the same column, the raw header
    /// that sorts first (byte order) wins.
    pub fn values(&self, record: &Record) -> Vec<(usize, f64)> {
        let mut seen = vec![false; self.columns.len()];
        let mut out = Vec::new();
        for (raw, cell) in &record.fields {
            if let Some(&idx) = self.raw_to_column.get(raw) {
                if !seen[idx] {
                    seen[idx] = true;
                    out.push((idx, numeric_value(cell)));
                }
            }
        }
        out
    }
}
