// src/ui/matrix.rs

use tui::{
    backend::Backend,
    layout::Rect,
    style::{Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::color::Gradient;
use crate::dashboard::MatrixView;
use crate::dates::month_tick;
use crate::layout::{truncate_label, LayoutSpec};
use crate::theme::{rgb_to_tui, Theme};

/// Abstract pixels per terminal column.
const PX_PER_COL: u32 = 7;
/// Fewest terminal columns per month, gap included.
const MIN_CELL_COLS: usize = 3;

/// Terminal geometry derived from a [`LayoutSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharGrid {
    pub label_cols: usize,
    pub cell_cols: usize,
    pub fill_cols: usize,
}

impl CharGrid {
    pub fn from_layout(layout: &LayoutSpec) -> Self {
        let label_cols = (layout.label_column_width / PX_PER_COL) as usize;
        let cell_cols = ((layout.cell_pitch / (PX_PER_COL * 2)) as usize).max(MIN_CELL_COLS);
        let fill_cols = ((layout.cell_render_width * cell_cols as u32) / layout.cell_pitch.max(1)) as usize;
        CharGrid { label_cols, cell_cols, fill_cols: fill_cols.clamp(1, cell_cols - 1) }
    }
}

pub fn draw_matrix<B: Backend>(f: &mut Frame<B>, area: Rect, view: &MatrixView, scroll: u16, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border.to_tui_color()))
        .title(Span::styled(
            format!(" {} ", view.title),
            Style::default().fg(theme.title.to_tui_color()).add_modifier(Modifier::BOLD),
        ));

    let lines = match &view.empty_note {
        Some(note) => vec![Spans::from(Span::styled(
            note.clone(),
            Style::default().fg(theme.stats_label.to_tui_color()),
        ))],
        None => matrix_lines(view, &theme.gradient(), theme),
    };
    f.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

/// Header of month ticks, one line per row, then the colour scale.
pub fn matrix_lines<'a>(view: &MatrixView, gradient: &Gradient, theme: &Theme) -> Vec<Spans<'a>> {
    let grid = CharGrid::from_layout(&view.layout);
    let label_style = Style::default().fg(theme.chart_labels.to_tui_color());
    let months = view.matrix.months();
    let mut lines = Vec::with_capacity(view.rows.len() + 2);

    let mut header = " ".repeat(grid.label_cols);
    for m in months {
        header.push_str(&format!("{:<width$}", month_tick(m), width = grid.cell_cols));
    }
    lines.push(Spans::from(Span::styled(header, label_style)));

    let label_chars = grid.label_cols.saturating_sub(1).max(1);
    for row in &view.rows {
        let mut spans = Vec::with_capacity(months.len() * 2 + 1);
        spans.push(Span::styled(
            format!("{:<width$}", truncate_label(row, label_chars), width = grid.label_cols),
            Style::default().fg(theme.foreground.to_tui_color()),
        ));
        for m in months {
            let color = rgb_to_tui(view.cell_color(gradient, row, m));
            spans.push(Span::styled(" ".repeat(grid.fill_cols), Style::default().bg(color)));
            spans.push(Span::raw(" ".repeat(grid.cell_cols - grid.fill_cols)));
        }
        lines.push(Spans::from(spans));
    }

    lines.push(Spans::from(Span::styled(view.scale_caption(), label_style)));
    lines
}
