use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::input::key_help;
use crate::app::state::{App, TABS};
use crate::graph;
use crate::ui::{heatmap, matrix};

/// Main drawing function: tab bar and filter on top, the selected tab in the
/// middle, status line at the bottom.
pub fn draw<B: Backend>(f: &mut Frame<B>, app: &App) {
    let size = f.size();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs + filter
            Constraint::Min(5),    // main area
            Constraint::Length(1), // status
        ])
        .split(size);

    draw_top_bar(f, rows[0], app);
    if app.dashboard.is_empty() {
        draw_no_data(f, rows[1], app);
    } else {
        match app.selected_tab {
            0 => heatmap::draw_calendar(f, rows[1], app),
            1 => draw_monthly(f, rows[1], app),
            2 => draw_cumulative(f, rows[1], app),
            _ => draw_matrices(f, rows[1], app),
        }
    }
    draw_status(f, rows[2], app);
}

fn draw_top_bar<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App) {
    let theme = &app.theme;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let titles = TABS
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Spans::from(vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(theme.title.to_tui_color())),
                Span::raw(*t),
            ])
        })
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border.to_tui_color()))
                .title(" View "),
        )
        .select(app.selected_tab)
        .style(Style::default().fg(theme.tab_inactive.to_tui_color()))
        .highlight_style(
            Style::default()
                .fg(theme.tab_active.to_tui_color())
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, cols[0]);

    let filter = Paragraph::new(Spans::from(vec![
        Span::styled("← ", Style::default().fg(theme.stats_label.to_tui_color())),
        Span::styled(
            app.filter().caption(&app.config.actor_noun),
            Style::default().fg(theme.stats_value.to_tui_color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" →", Style::default().fg(theme.stats_label.to_tui_color())),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border.to_tui_color()))
            .title(format!(" Filter ({}/{}) ", app.filter_idx + 1, app.actors.len())),
    );
    f.render_widget(filter, cols[1]);
}

fn draw_no_data<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App) {
    let msg = format!(
        "No data in window. {} has no rows with a readable '{}' timestamp.",
        app.path.display(),
        app.config.columns.timestamp
    );
    let para = Paragraph::new(msg)
        .style(Style::default().fg(app.theme.stats_label.to_tui_color()))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_monthly<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App) {
    let dash = &app.dashboard;
    if dash.aggregation.completion.is_empty() {
        graph::draw_monthly_bars(f, area, &dash.monthly_title, &dash.aggregation.monthly, &app.theme);
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    graph::draw_monthly_bars(f, chunks[0], &dash.monthly_title, &dash.aggregation.monthly, &app.theme);
    graph::draw_completion(f, chunks[1], &dash.aggregation.completion, &app.theme);
}

/// View 0 is the overall running total, the rest are the per-series charts.
fn draw_cumulative<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App) {
    let dash = &app.dashboard;
    match app.selected_view.checked_sub(1).and_then(|i| dash.charts.get(i)) {
        Some(chart) => graph::draw_series_chart(
            f,
            area,
            chart,
            dash.aggregation.months.as_slice(),
            &app.config.legend,
            &app.theme,
        ),
        None => graph::draw_cumulative_monthly(f, area, &dash.cumulative_title, &dash.cumulative_monthly, &app.theme),
    }
}

fn draw_matrices<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App) {
    if let Some(view) = app.dashboard.matrices.get(app.selected_view) {
        matrix::draw_matrix(f, area, view, app.scroll, &app.theme);
    }
}

fn draw_status<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App) {
    let theme = &app.theme;
    let agg = &app.dashboard.aggregation;
    let mut spans = vec![Span::styled(
        format!(" {} {}s", agg.contributing, app.config.event_noun),
        Style::default().fg(theme.stats_value.to_tui_color()),
    )];
    if agg.skipped > 0 {
        spans.push(Span::styled(
            format!(" · {} skipped", agg.skipped),
            Style::default().fg(theme.error.to_tui_color()),
        ));
    }
    if let Some(status) = &app.status {
        spans.push(Span::styled(format!(" · {status}"), Style::default().fg(theme.stats_label.to_tui_color())));
    }
    spans.push(Span::styled(
        format!("   {}", key_help(app.selected_tab)),
        Style::default().fg(theme.stats_label.to_tui_color()),
    ));
    f.render_widget(Paragraph::new(Spans::from(spans)), area);
}
