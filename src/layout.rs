// src/layout.rs

use serde::{Deserialize, Serialize};

/// Fixed geometry of a row × month matrix. Units are abstract pixels; the
/// terminal renderer scales them down to character cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub base_width: u32,
    pub left_pad: u32,
    pub right_pad: u32,
    pub top_pad: u32,
    pub bottom_pad: u32,
    pub row_pitch: u32,
    pub cell_height: u32,
    /// Below this the canvas grows instead of the cells shrinking.
    pub min_cell_width: u32,
    pub cell_gap: u32,
    pub min_render_width: u32,
    pub min_canvas_height: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            base_width: 980,
            left_pad: 10,
            right_pad: 10,
            top_pad: 44,
            bottom_pad: 34,
            row_pitch: 22,
            cell_height: 18,
            min_cell_width: 40,
            cell_gap: 6,
            min_render_width: 18,
            min_canvas_height: 240,
        }
    }
}

/// Computed geometry for one matrix. Two matrices given the same month count
/// and label width get identical column positions whatever their rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSpec {
    pub rows: usize,
    pub months: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub label_column_width: u32,
    pub cell_pitch: u32,
    pub cell_render_width: u32,
    pub cell_height: u32,
    pub row_pitch: u32,
    pub origin_x: u32,
    pub origin_y: u32,
}

impl LayoutSpec {
    pub fn compute(rows: usize, months: usize, label_width: u32, cfg: &LayoutConfig) -> Self {
        let columns = months.max(1) as u32;
        let available = cfg
            .base_width
            .saturating_sub(cfg.left_pad + cfg.right_pad + label_width);

        let mut cell_pitch = available / columns;
        let mut canvas_width = cfg.base_width;
        if cell_pitch < cfg.min_cell_width {
            cell_pitch = cfg.min_cell_width;
            canvas_width = cfg.left_pad + cfg.right_pad + label_width + columns * cell_pitch;
        }

        let needed_height = cfg.top_pad + rows as u32 * cfg.row_pitch + cfg.bottom_pad;
        LayoutSpec {
            rows,
            months,
            canvas_width,
            canvas_height: needed_height.max(cfg.min_canvas_height),
            label_column_width: label_width,
            cell_pitch,
            cell_render_width: cell_pitch.saturating_sub(cfg.cell_gap).max(cfg.min_render_width),
            cell_height: cfg.cell_height,
            row_pitch: cfg.row_pitch,
            origin_x: cfg.left_pad + label_width,
            origin_y: cfg.top_pad,
        }
    }

    /// Top-left corner of cell `(row, col)`.
    pub fn cell_origin(&self, row: usize, col: usize) -> (u32, u32) {
        (
            self.origin_x + col as u32 * self.cell_pitch,
            self.origin_y + row as u32 * self.row_pitch,
        )
    }

    pub fn month_center_x(&self, col: usize) -> u32 {
        self.origin_x + col as u32 * self.cell_pitch + self.cell_pitch / 2
    }

    /// Baseline for the colour-scale caption under the last row.
    pub fn footer_y(&self) -> u32 {
        self.origin_y + self.rows as u32 * self.row_pitch + 10
    }
}

/// Heuristic sizing of the row-label column from label lengths.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LabelWidthOptions {
    /// Longer labels are truncated and stop contributing width past this.
    pub max_chars: usize,
    pub min: u32,
    pub max: u32,
    pub px_per_char: u32,
    pub padding: u32,
}

impl Default for LabelWidthOptions {
    fn default() -> Self {
        LabelWidthOptions { max_chars: 44, min: 90, max: 340, px_per_char: 7, padding: 36 }
    }
}

impl LabelWidthOptions {
    pub fn estimate(&self, chars: usize) -> u32 {
        let chars = chars.min(self.max_chars) as u32;
        (chars * self.px_per_char + self.padding).clamp(self.min, self.max.max(self.min))
    }
}

/// One label-column width for every matrix that must line up: measured from
/// the longest label across *all* of `lists`.
pub fn shared_label_width<I, L, S>(lists: I, opts: &LabelWidthOptions) -> u32
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let longest = lists
        .into_iter()
        .flat_map(|list| list.into_iter().map(|s| s.as_ref().chars().count().min(opts.max_chars)))
        .max()
        .unwrap_or(0);
    opts.estimate(longest)
}

/// Shorten to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate_label(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
