// src/legend.rs

use serde::{Deserialize, Serialize};

use crate::layout::truncate_label;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LegendConfig {
    pub origin_x: u32,
    /// Right edge no entry may cross.
    pub max_x: u32,
    pub first_baseline: u32,
    pub row_height: u32,
    pub swatch: u32,
    pub swatch_gap: u32,
    pub trailing: u32,
    pub px_per_char: u32,
    pub max_label_chars: usize,
    /// Series beyond this are left out of the chart and the legend.
    pub max_series: usize,
}

impl Default for LegendConfig {
    fn default() -> Self {
        LegendConfig {
            origin_x: 44,
            max_x: 964,
            first_baseline: 18,
            row_height: 14,
            swatch: 14,
            swatch_gap: 6,
            trailing: 16,
            px_per_char: 7,
            max_label_chars: 28,
            max_series: 15,
        }
    }
}

impl LegendConfig {
    fn entry_width(&self, text: &str) -> u32 {
        self.swatch + self.swatch_gap + text.chars().count() as u32 * self.px_per_char + self.trailing
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    /// Series key as given.
    pub key: String,
    /// Text to draw, possibly shortened.
    pub text: String,
    pub row: usize,
    pub x: u32,
    pub y: u32,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegendLayout {
    pub entries: Vec<LegendEntry>,
    pub rows: usize,
    /// Vertical space the legend needs, including the "N more" notice line.
    pub height: u32,
    /// Series dropped by the caller before packing.
    pub hidden: usize,
}

impl LegendLayout {
    /// Where the plot region may start so the legend never overlaps it.
    pub fn plot_top(&self) -> u32 {
        self.height + 10
    }
}

/// Greedy left-to-right packing of `labels` into rows no wider than `max_x`.
///
/// Entries keep their order; a row is closed only when the next entry does
/// not fit and the row already holds something. An entry too wide for any
/// row has its text shortened until it fits.
pub fn pack_legend<S: AsRef<str>>(labels: &[S], hidden: usize, cfg: &LegendConfig) -> LegendLayout {
    let row_width = cfg.max_x.saturating_sub(cfg.origin_x);
    let fixed = cfg.swatch + cfg.swatch_gap + cfg.trailing;
    let fit_chars = (row_width.saturating_sub(fixed) / cfg.px_per_char.max(1)) as usize;

    let mut entries = Vec::with_capacity(labels.len());
    let mut cursor = cfg.origin_x;
    let mut row = 0usize;

    for label in labels {
        let key = label.as_ref();
        let mut text = truncate_label(key, cfg.max_label_chars);
        let mut width = cfg.entry_width(&text);
        if width > row_width {
            text = truncate_label(&text, fit_chars);
            width = cfg.entry_width(&text);
        }

        if cursor > cfg.origin_x && cursor + width > cfg.max_x {
            cursor = cfg.origin_x;
            row += 1;
        }
        entries.push(LegendEntry {
            key: key.to_string(),
            text,
            row,
            x: cursor,
            y: cfg.first_baseline + row as u32 * cfg.row_height,
            width,
        });
        cursor += width;
    }

    let rows = if entries.is_empty() { 0 } else { row + 1 };
    let height = cfg.first_baseline
        + (rows.max(1) as u32 - 1) * cfg.row_height
        + 16
        + if hidden > 0 { 14 } else { 0 };

    LegendLayout { entries, rows, height, hidden }
}

/// Order series by descending total (ties by key) and keep the first `max_series`.
/// Returns the kept keys and how many were dropped.
pub fn rank_and_truncate<I>(totals: I, max_series: usize) -> (Vec<String>, usize)
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut ranked: Vec<(String, f64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let hidden = ranked.len().saturating_sub(max_series);
    ranked.truncate(max_series);
    (ranked.into_iter().map(|(k, _)| k).collect(), hidden)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_fill_a_row_then_wrap() {
        let cfg = LegendConfig::default();
        // each entry: 14 + 6 + 10*7 + 16 = 106 wide; 920 px row fits 8
        let labels: Vec<String> = (0..10).map(|i| format!("series-{i:03}")).collect();
        let legend = pack_legend(&labels, 0, &cfg);
        assert_eq!(legend.rows, 2);
        assert_eq!(legend.entries[7].row, 0);
        assert_eq!(legend.entries[7].x, 44 + 7 * 106);
        assert_eq!(legend.entries[8].row, 1);
        assert_eq!(legend.entries[8].x, 44);
        assert_eq!(legend.entries[8].y, 32);
        assert_eq!(legend.height, 18 + 14 + 16);
        assert_eq!(legend.plot_top(), 58);
    }

    #[test]
    fn hidden_series_reserve_a_notice_line() {
        let cfg = LegendConfig::default();
        let legend = pack_legend(&["a"], 3, &cfg);
        assert_eq!(legend.height, 18 + 16 + 14);
        assert_eq!(legend.hidden, 3);
    }

    #[test]
    fn empty_legend_still_has_height() {
        let legend = pack_legend::<&str>(&[], 0, &LegendConfig::default());
        assert_eq!(legend.rows, 0);
        assert_eq!(legend.height, 34);
    }

    #[test]
    fn long_labels_are_truncated() {
        let cfg = LegendConfig::default();
        let legend = pack_legend(&["a label that is clearly much longer than allowed"], 0, &cfg);
        assert_eq!(legend.entries[0].text.chars().count(), 28);
        assert!(legend.entries[0].text.ends_with('…'));
    }

    #[test]
    fn oversized_entry_is_shrunk_to_the_row() {
        let cfg = LegendConfig { max_x: 200, max_label_chars: 100, ..LegendConfig::default() };
        let legend = pack_legend(&["x".repeat(60), "y".to_string()], 0, &cfg);
        let first = &legend.entries[0];
        assert_eq!(first.row, 0);
        assert!(first.x + first.width <= cfg.max_x);
        assert_eq!(legend.entries[1].row, 1);
    }

    #[test]
    fn ranking_breaks_ties_by_name() {
        let totals = vec![
            ("b".to_string(), 3.0),
            ("a".to_string(), 3.0),
            ("c".to_string(), 9.0),
            ("d".to_string(), 1.0),
        ];
        let (kept, hidden) = rank_and_truncate(totals, 3);
        assert_eq!(kept, vec!["c", "a", "b"]);
        assert_eq!(hidden, 1);
    }
}
