// src/record.rs

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{parse_timestamp, to_day};

pub const UNKNOWN_ACTOR: &str = "(unknown actor)";
pub const UNNAMED_LABEL: &str = "(unnamed)";

/// Value of the filter picker that selects every actor.
pub const ALL_ACTORS: &str = "ALL";

/// One ingested row: header → cell text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Record { fields }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Record {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Which columns carry the timestamp, actor, activity label and completion status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Columns {
    pub timestamp: String,
    pub actor: String,
    pub label: String,
    pub completion: Option<String>,
}

impl Default for Columns {
    fn default() -> Self {
        Columns {
            timestamp: "session_start".to_string(),
            actor: "player".to_string(),
            label: "name".to_string(),
            completion: Some("completion_status".to_string()),
        }
    }
}

/// A record with a valid timestamp, reduced to what aggregation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEvent {
    pub day: NaiveDate,
    /// Actor exactly as it appears in the data; filters compare against this.
    pub raw_actor: String,
    pub raw_label: String,
}

impl ParsedEvent {
    /// `None` when the timestamp cell is missing or unparseable.
    pub fn from_record(record: &Record, columns: &Columns) -> Option<Self> {
        let ts = parse_timestamp(record.get(&columns.timestamp)?)?;
        Some(ParsedEvent {
            day: to_day(ts),
            raw_actor: record.get(&columns.actor).unwrap_or_default().to_string(),
            raw_label: record.get(&columns.label).unwrap_or_default().to_string(),
        })
    }

    pub fn actor(&self) -> &str {
        if self.raw_actor.is_empty() { UNKNOWN_ACTOR } else { &self.raw_actor }
    }

    pub fn label(&self) -> &str {
        if self.raw_label.is_empty() { UNNAMED_LABEL } else { &self.raw_label }
    }
}

/// Actor selection for a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActorFilter {
    #[default]
    All,
    /// Exact, case-sensitive match on the raw actor value.
    Actor(String),
}

impl ActorFilter {
    pub fn parse(value: &str) -> Self {
        if value == ALL_ACTORS {
            ActorFilter::All
        } else {
            ActorFilter::Actor(value.to_string())
        }
    }

    pub fn matches(&self, raw_actor: &str) -> bool {
        match self {
            ActorFilter::All => true,
            ActorFilter::Actor(a) => a == raw_actor,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActorFilter::All => ALL_ACTORS,
            ActorFilter::Actor(a) => a,
        }
    }

    /// Human caption: "All players" / the actor name.
    pub fn caption(&self, noun_plural: &str) -> String {
        match self {
            ActorFilter::All => format!("All {noun_plural}"),
            ActorFilter::Actor(a) => a.clone(),
        }
    }
}

/// Sorted distinct non-empty actors across every record (window ignored).
pub fn unique_actors(records: &[Record], columns: &Columns) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.get(&columns.actor))
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
