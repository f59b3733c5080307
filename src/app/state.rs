// /src/app/state.rs
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::dates::add_days;
use crate::loader;
use crate::record::{unique_actors, ActorFilter, Record, ALL_ACTORS};
use crate::theme::Theme;

pub const TABS: [&str; 4] = ["Calendar", "Monthly", "Cumulative", "Matrices"];

/// Viewer state: the loaded records, the active filter and the dashboard
/// computed from them.
pub struct App {
    pub path: PathBuf,
    pub records: Vec<Record>,
    pub config: Config,
    pub theme: Theme,
    /// Filter choices, `ALL` first.
    pub actors: Vec<String>,
    pub filter_idx: usize,
    pub selected_tab: usize,
    /// Which chart or matrix is shown on the Cumulative / Matrices tabs.
    pub selected_view: usize,
    /// Calendar day whose details are shown.
    pub cursor: Option<NaiveDate>,
    pub scroll: u16,
    pub status: Option<String>,
    pub dashboard: Dashboard,
}

impl App {
    pub fn new(path: PathBuf, records: Vec<Record>, config: Config, theme: Theme) -> Self {
        let dashboard = Dashboard::build(&records, &ActorFilter::All, &config);
        let mut app = App {
            path,
            actors: Vec::new(),
            filter_idx: 0,
            selected_tab: 0,
            selected_view: 0,
            cursor: None,
            scroll: 0,
            status: None,
            dashboard,
            records,
            config,
            theme,
        };
        app.actors = app.filter_choices();
        app.cursor = app.dashboard.aggregation.window.map(|w| w.end);
        app
    }

    fn filter_choices(&self) -> Vec<String> {
        std::iter::once(ALL_ACTORS.to_string())
            .chain(unique_actors(&self.records, &self.config.columns))
            .collect()
    }

    pub fn filter(&self) -> ActorFilter {
        self.actors
            .get(self.filter_idx)
            .map(|a| ActorFilter::parse(a))
            .unwrap_or(ActorFilter::All)
    }

    /// Recompute everything for the current filter.
    pub fn refresh(&mut self) {
        self.dashboard = Dashboard::build(&self.records, &self.filter(), &self.config);
        let window = self.dashboard.aggregation.window;
        self.cursor = match (window, self.cursor) {
            (Some(w), Some(c)) if w.contains(c) => Some(c),
            (Some(w), _) => Some(w.end),
            (None, _) => None,
        };
        let views = self.view_count();
        if self.selected_view >= views {
            self.selected_view = 0;
        }
    }

    pub fn next_filter(&mut self) {
        if self.actors.is_empty() {
            return;
        }
        self.filter_idx = (self.filter_idx + 1) % self.actors.len();
        self.refresh();
    }

    pub fn prev_filter(&mut self) {
        if self.actors.is_empty() {
            return;
        }
        self.filter_idx = (self.filter_idx + self.actors.len() - 1) % self.actors.len();
        self.refresh();
    }

    /// Re-read the CSV from disk. On failure the previous records stay.
    pub fn reload(&mut self) {
        self.reload_with(loader::load_csv);
    }

    pub fn reload_with<F>(&mut self, load: F)
    where
        F: FnOnce(&Path) -> Result<Vec<Record>, Box<dyn std::error::Error>>,
    {
        match load(&self.path) {
            Ok(records) => {
                let current = self.actors.get(self.filter_idx).cloned();
                self.records = records;
                self.actors = self.filter_choices();
                self.filter_idx = current
                    .and_then(|a| self.actors.iter().position(|x| *x == a))
                    .unwrap_or(0);
                self.refresh();
                self.status = Some(format!("Reloaded {} rows", self.records.len()));
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "reload failed");
                self.status = Some(format!("Reload failed: {err}"));
            }
        }
    }

    pub fn select_tab(&mut self, tab: usize) {
        if tab < TABS.len() && tab != self.selected_tab {
            self.selected_tab = tab;
            self.selected_view = 0;
            self.scroll = 0;
        }
    }

    /// Number of sub-views on the current tab.
    pub fn view_count(&self) -> usize {
        match self.selected_tab {
            2 => self.dashboard.charts.len() + 1,
            3 => self.dashboard.matrices.len(),
            _ => 1,
        }
    }

    pub fn next_view(&mut self) {
        let n = self.view_count().max(1);
        self.selected_view = (self.selected_view + 1) % n;
        self.scroll = 0;
    }

    /// Move the calendar cursor, clamped to the window.
    pub fn move_cursor(&mut self, days: i64) {
        let (Some(window), Some(cursor)) = (self.dashboard.aggregation.window, self.cursor) else {
            return;
        };
        let moved = add_days(cursor, days);
        self.cursor = Some(moved.clamp(window.start, window.end));
    }

    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll = (self.scroll as i32 + delta).max(0) as u16;
    }
}
