// src/cumulative.rs

use std::collections::BTreeMap;

use crate::aggregate::{DimensionMatrix, MonthTotal};

/// Running total of `values`, starting from zero on every call.
pub fn running_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |run, v| {
            *run += v;
            Some(*run)
        })
        .collect()
}

/// Cumulative monthly totals, aligned with the input months.
pub fn cumulative_monthly(monthly: &[MonthTotal]) -> Vec<MonthTotal> {
    let mut run = 0u32;
    monthly
        .iter()
        .map(|m| {
            run += m.count;
            MonthTotal { month: m.month.clone(), count: run }
        })
        .collect()
}

/// Several named running totals over the same month span.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CumulativeSeries {
    /// Insertion order of the keys; charts colour series by position.
    pub keys: Vec<String>,
    pub series: BTreeMap<String, Vec<f64>>,
    /// Largest running total, never below 1 so axes can divide by it.
    pub max_y: f64,
}

impl CumulativeSeries {
    /// One running total per key; keys missing from `matrix` become flat zero lines.
    pub fn from_matrix<S: AsRef<str>>(matrix: &DimensionMatrix, keys: &[S]) -> Self {
        let mut out = CumulativeSeries { max_y: 1.0, ..Default::default() };
        for key in keys {
            let key = key.as_ref();
            let run = running_sum(&matrix.series(key));
            out.max_y = run.iter().copied().fold(out.max_y, f64::max);
            out.keys.push(key.to_string());
            out.series.insert(key.to_string(), run);
        }
        out
    }

    /// Every row of `matrix`, in row order.
    pub fn from_matrix_all(matrix: &DimensionMatrix) -> Self {
        let keys: Vec<&str> = matrix.rows().collect();
        Self::from_matrix(matrix, &keys)
    }

    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.series.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
