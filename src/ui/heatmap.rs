// src/ui/heatmap.rs

use chrono::NaiveDate;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::calendar::{day_tooltip, CalendarGrid};
use crate::color::LevelPalette;
use crate::dates::day_key;
use crate::app::state::App;
use crate::theme::{rgb_to_tui, Theme};

/// Each cell is 2 chars wide + 1 char padding.
const CELL_W: usize = 3;
/// Weekday labels take this many columns on the left.
const GUTTER: usize = 4;
const WEEKDAYS: [&str; 7] = ["", "Mon", "", "Wed", "", "Fri", ""];

/// Calendar grid on top, the cursor day's details below.
pub fn draw_calendar<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App) {
    let dash = &app.dashboard;
    let theme = &app.theme;
    let palette = theme.level_palette(app.config.calendar_cap);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(3)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border.to_tui_color()))
        .title(Span::styled(
            format!(" Activity (365d) · {} ", dash.caption),
            Style::default().fg(theme.title.to_tui_color()),
        ));
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    let Some(grid) = &dash.calendar else {
        f.render_widget(
            Paragraph::new("No data in window.").style(Style::default().fg(theme.stats_label.to_tui_color())),
            inner,
        );
        return;
    };

    let lines = heatmap_lines(grid, inner.width as usize, app.cursor, theme, &palette);
    f.render_widget(Paragraph::new(lines), inner);

    let details = match app.cursor {
        Some(day) => {
            let key = day_key(day);
            day_tooltip(&key, dash.aggregation.days.details(&key), app.config.tooltip_max_lines, &app.config.event_noun)
        }
        None => String::new(),
    };
    let detail = Paragraph::new(details)
        .style(Style::default().fg(theme.foreground.to_tui_color()))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border.to_tui_color()))
                .title(" Day "),
        );
    f.render_widget(detail, chunks[1]);
}

/// First visible week so the most recent weeks fit in `width` columns.
fn first_visible_week(weeks: usize, width: usize) -> usize {
    let fit = (width.saturating_sub(GUTTER) / CELL_W).max(1);
    weeks.saturating_sub(fit)
}

/// Month labels line plus one line per weekday (Sunday first).
fn heatmap_lines<'a>(
    grid: &CalendarGrid,
    width: usize,
    cursor: Option<NaiveDate>,
    theme: &Theme,
    palette: &LevelPalette,
) -> Vec<Spans<'a>> {
    let first_week = first_visible_week(grid.weeks, width);
    let mut lines = Vec::with_capacity(8);

    let mut header = " ".repeat(GUTTER);
    for marker in grid.months.iter().filter(|m| m.week >= first_week) {
        let col = GUTTER + (marker.week - first_week) * CELL_W;
        if col < header.chars().count() {
            continue;
        }
        header.push_str(&" ".repeat(col - header.chars().count()));
        header.push_str(&marker.text);
        header.push(' ');
    }
    lines.push(Spans::from(Span::styled(
        header,
        Style::default().fg(theme.chart_labels.to_tui_color()),
    )));

    for (weekday, name) in WEEKDAYS.iter().enumerate() {
        let mut spans = Vec::with_capacity((grid.weeks - first_week) * 2 + 1);
        spans.push(Span::styled(
            format!("{:<width$}", name, width = GUTTER),
            Style::default().fg(theme.chart_labels.to_tui_color()),
        ));
        for week in first_week..grid.weeks {
            match grid.cell(week, weekday) {
                Some(cell) if cell.in_window => {
                    let mut style = Style::default().bg(rgb_to_tui(palette.color_for(cell.count)));
                    let text = if Some(cell.date) == cursor {
                        style = style.fg(theme.foreground.to_tui_color()).add_modifier(Modifier::BOLD);
                        "<>"
                    } else {
                        "  "
                    };
                    spans.push(Span::styled(text, style));
                }
                _ => spans.push(Span::raw("  ")),
            }
            spans.push(Span::raw(" "));
        }
        lines.push(Spans::from(spans));
    }
    lines
}
