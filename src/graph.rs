// src/graph.rs

use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Span, Spans},
    widgets::{Axis, BarChart, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::aggregate::{CompletionRate, MonthTotal};
use crate::dashboard::{format_value, SeriesChart};
use crate::dates::{month_label, month_tick};
use crate::legend::{LegendConfig, LegendLayout};
use crate::theme::Theme;

fn titled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(theme.stats_value.to_tui_color()).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border.to_tui_color()))
        .style(Style::default().bg(theme.background.to_tui_color()).fg(theme.foreground.to_tui_color()))
}

/// First, middle and last month of the span as axis labels.
fn month_axis_labels<'a>(months: &[String], theme: &Theme) -> Vec<Span<'a>> {
    let axis = Style::default().fg(theme.chart_axis.to_tui_color());
    match months.len() {
        0 => vec![],
        1 => vec![Span::styled(month_label(&months[0]), axis)],
        n => vec![
            Span::styled(month_label(&months[0]), axis.add_modifier(Modifier::BOLD)),
            Span::styled(month_label(&months[n / 2]), axis),
            Span::styled(month_label(&months[n - 1]), axis.add_modifier(Modifier::BOLD)),
        ],
    }
}

fn value_axis_labels<'a>(max_y: f64, theme: &Theme) -> Vec<Span<'a>> {
    let axis = Style::default().fg(theme.chart_axis.to_tui_color());
    vec![
        Span::styled("0", axis.add_modifier(Modifier::BOLD)),
        Span::styled(format_value((max_y / 2.0).round()), axis),
        Span::styled(format_value(max_y.round()), axis.add_modifier(Modifier::BOLD)),
    ]
}

/// Points of a per-month series, x = month index.
pub fn month_points(values: &[f64]) -> Vec<(f64, f64)> {
    values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect()
}

/// Line chart over month indices. Datasets are unnamed so tui draws no legend
/// of its own.
fn draw_month_lines<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    title: &str,
    months: &[String],
    lines: &[(Color, Vec<(f64, f64)>)],
    max_y: f64,
    y_title: &str,
    theme: &Theme,
) {
    let datasets = lines
        .iter()
        .map(|(color, pts)| {
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(*color))
                .data(pts)
        })
        .collect();
    let max_x = (months.len().saturating_sub(1) as f64).max(1.0);
    let max_y = max_y.max(1.0) * 1.05;

    let chart = Chart::new(datasets)
        .block(titled_block(title, theme))
        .style(Style::default().bg(theme.background.to_tui_color()).fg(theme.foreground.to_tui_color()))
        .x_axis(
            Axis::default()
                .title(Span::styled("Month", Style::default().fg(theme.chart_labels.to_tui_color())))
                .style(Style::default().fg(theme.chart_axis.to_tui_color()))
                .bounds([0.0, max_x])
                .labels(month_axis_labels(months, theme)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(y_title.to_string(), Style::default().fg(theme.chart_labels.to_tui_color())))
                .style(Style::default().fg(theme.chart_axis.to_tui_color()))
                .bounds([0.0, max_y])
                .labels(value_axis_labels(max_y, theme)),
        );
    f.render_widget(chart, area);
}

/// One bar per month, labelled with the short month name.
pub fn draw_monthly_bars<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    title: &str,
    monthly: &[MonthTotal],
    theme: &Theme,
) {
    let ticks: Vec<String> = monthly.iter().map(|m| month_tick(&m.month)).collect();
    let data: Vec<(&str, u64)> = ticks
        .iter()
        .zip(monthly)
        .map(|(t, m)| (t.as_str(), m.count as u64))
        .collect();

    // fill the width when there is room, but never below the label width
    let inner_w = area.width.saturating_sub(2) as usize;
    let n = monthly.len().max(1);
    let bar_width = ((inner_w / n).saturating_sub(1)).clamp(3, 8) as u16;

    let bars = BarChart::default()
        .block(titled_block(title, theme))
        .data(&data)
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.chart_line.to_tui_color()))
        .value_style(
            Style::default()
                .fg(theme.background.to_tui_color())
                .bg(theme.chart_line.to_tui_color())
                .add_modifier(Modifier::BOLD),
        )
        .label_style(Style::default().fg(theme.chart_labels.to_tui_color()));
    f.render_widget(bars, area);
}

pub fn draw_cumulative_monthly<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    title: &str,
    cumulative: &[MonthTotal],
    theme: &Theme,
) {
    let months: Vec<String> = cumulative.iter().map(|m| m.month.clone()).collect();
    let values: Vec<f64> = cumulative.iter().map(|m| m.count as f64).collect();
    let max_y = values.iter().copied().fold(1.0, f64::max);
    let lines = vec![(theme.chart_line.to_tui_color(), month_points(&values))];
    draw_month_lines(f, area, title, &months, &lines, max_y, "Total", theme);
}

pub fn draw_completion<B: Backend>(f: &mut Frame<B>, area: Rect, rates: &[CompletionRate], theme: &Theme) {
    let months: Vec<String> = rates.iter().map(|r| r.month.clone()).collect();
    let values: Vec<f64> = rates.iter().map(|r| r.pct).collect();
    let lines = vec![(theme.chart_line.to_tui_color(), month_points(&values))];
    draw_month_lines(f, area, "Completion rate per month", &months, &lines, 100.0, "%", theme);
}

/// Legend lines for a packed legend: one line per legend row, plus the
/// "N more" notice when series were left out.
pub fn legend_lines<'a>(
    legend: &LegendLayout,
    cfg: &LegendConfig,
    notice: Option<&str>,
    theme: &Theme,
) -> Vec<Spans<'a>> {
    let px = cfg.px_per_char.max(1);
    let mut lines: Vec<Vec<Span<'a>>> = vec![Vec::new(); legend.rows];
    let mut cols = vec![0usize; legend.rows];

    for (idx, entry) in legend.entries.iter().enumerate() {
        let col = (entry.x.saturating_sub(cfg.origin_x) / px) as usize;
        let (spans, used) = (&mut lines[entry.row], &mut cols[entry.row]);
        if col > *used {
            spans.push(Span::raw(" ".repeat(col - *used)));
            *used = col;
        }
        spans.push(Span::styled("■ ", Style::default().fg(theme.series_color(idx))));
        spans.push(Span::styled(
            entry.text.clone(),
            Style::default().fg(theme.foreground.to_tui_color()),
        ));
        *used += 2 + entry.text.chars().count();
    }

    let mut out: Vec<Spans<'a>> = lines.into_iter().map(Spans::from).collect();
    if legend.hidden > 0 {
        let text = notice
            .map(str::to_string)
            .unwrap_or_else(|| format!("+{} more", legend.hidden));
        out.push(Spans::from(Span::styled(
            text,
            Style::default().fg(theme.stats_label.to_tui_color()),
        )));
    }
    out
}

/// A multi-series cumulative chart with its legend above the plot.
pub fn draw_series_chart<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    chart: &SeriesChart,
    months: &[String],
    legend_cfg: &LegendConfig,
    theme: &Theme,
) {
    let legend = legend_lines(&chart.legend, legend_cfg, chart.notice.as_deref(), theme);
    let legend_h = (legend.len() as u16).min(area.height / 2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(legend_h), Constraint::Min(3)])
        .split(area);
    f.render_widget(Paragraph::new(legend), chunks[0]);

    let lines: Vec<(Color, Vec<(f64, f64)>)> = chart
        .series
        .keys
        .iter()
        .enumerate()
        .map(|(idx, key)| {
            let values = chart.series.get(key).unwrap_or(&[]);
            (theme.series_color(idx), month_points(values))
        })
        .collect();
    draw_month_lines(f, chunks[1], &chart.title, months, &lines, chart.series.max_y, "Total", theme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::pack_legend;

    fn text(line: &Spans) -> String {
        line.0.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn points_use_month_index() {
        assert_eq!(month_points(&[1.0, 3.0]), vec![(0.0, 1.0), (1.0, 3.0)]);
    }

    #[test]
    fn legend_rows_map_to_lines() {
        let cfg = LegendConfig::default();
        let labels: Vec<String> = (0..10).map(|i| format!("series-{i:03}")).collect();
        let legend = pack_legend(&labels, 2, &cfg);
        let lines = legend_lines(&legend, &cfg, Some("Showing top 10"), &Theme::default());
        assert_eq!(lines.len(), 3);
        assert!(text(&lines[0]).starts_with("■ series-000"));
        // second entry starts at its packed column: 106 px / 7
        assert_eq!(text(&lines[0]).find("■ series-001").map(|i| text(&lines[0])[..i].chars().count()), Some(15));
        assert!(text(&lines[1]).starts_with("■ series-008"));
        assert_eq!(text(&lines[2]), "Showing top 10");
    }

    #[test]
    fn axis_labels_pick_ends_and_middle() {
        let months: Vec<String> = ["2024-01", "2024-02", "2024-03"].iter().map(|s| s.to_string()).collect();
        let labels = month_axis_labels(&months, &Theme::default());
        let texts: Vec<&str> = labels.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["Jan 2024", "Feb 2024", "Mar 2024"]);
        assert!(month_axis_labels(&[], &Theme::default()).is_empty());
    }
}
