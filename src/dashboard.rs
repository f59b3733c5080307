// src/dashboard.rs

use crate::aggregate::{aggregate, AggregateRequest, Aggregation, DimensionMatrix, MonthTotal};
use crate::calendar::{window_caption, CalendarGrid};
use crate::color::{Gradient, Rgb};
use crate::config::Config;
use crate::cumulative::{cumulative_monthly, CumulativeSeries};
use crate::dimension::{metric_display_name, Dimension, PrefixFamily};
use crate::layout::{shared_label_width, LayoutSpec};
use crate::legend::{pack_legend, rank_and_truncate, LegendLayout};
use crate::record::{unique_actors, ActorFilter, Record};

/// A row × month intensity matrix ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixView {
    pub key: String,
    pub title: String,
    /// Row labels in draw order; also the keys of `matrix`.
    pub rows: Vec<String>,
    pub matrix: DimensionMatrix,
    pub layout: LayoutSpec,
    /// Largest visible cell, for the colour ramp.
    pub vmax: f64,
    /// Shown instead of the grid when there is nothing to draw.
    pub empty_note: Option<String>,
}

impl MatrixView {
    pub fn cell_color(&self, gradient: &Gradient, row: &str, month: &str) -> Rgb {
        gradient.color_of(self.matrix.get(row, month), self.vmax)
    }

    pub fn scale_caption(&self) -> String {
        if self.vmax > 0.0 {
            format!("Color scale: 0 → {}", format_value(self.vmax))
        } else {
            "No values in window".to_string()
        }
    }
}

/// A multi-series cumulative line chart with its packed legend.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesChart {
    pub title: String,
    pub series: CumulativeSeries,
    /// Legend entries are keyed by series key; `legend.entries[i].text` is the display text.
    pub legend: LegendLayout,
    pub notice: Option<String>,
}

/// Everything the viewer draws for one filter value. Rebuilt from scratch on
/// every refresh; nothing here is mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub filter: ActorFilter,
    pub aggregation: Aggregation,
    pub calendar: Option<CalendarGrid>,
    pub caption: String,
    pub monthly_title: String,
    pub cumulative_title: String,
    pub cumulative_monthly: Vec<MonthTotal>,
    pub shared_label_width: u32,
    pub matrices: Vec<MatrixView>,
    pub charts: Vec<SeriesChart>,
}

impl Dashboard {
    pub fn build(records: &[Record], filter: &ActorFilter, config: &Config) -> Self {
        let dimensions = config.dimensions();
        let aggregation = aggregate(
            records,
            &AggregateRequest { columns: &config.columns, filter, dimensions: &dimensions },
        );

        let who = filter.caption(&config.actor_noun);
        let noun = capitalize(&config.event_noun);
        let mut dash = Dashboard {
            filter: filter.clone(),
            calendar: None,
            caption: "No data in window.".to_string(),
            monthly_title: format!("{noun}s per month ({who})"),
            cumulative_title: format!("Cumulative {}s per month ({who})", config.event_noun),
            cumulative_monthly: cumulative_monthly(&aggregation.monthly),
            shared_label_width: config.label_width.min,
            matrices: Vec::new(),
            charts: Vec::new(),
            aggregation,
        };
        let Some(window) = dash.aggregation.window else {
            return dash;
        };
        dash.calendar = Some(CalendarGrid::build(&window, &dash.aggregation.days));
        dash.caption = window_caption(&window);

        let agg = &dash.aggregation;
        let months = agg.months.len();
        let empty = DimensionMatrix::new(&agg.months);

        // Actors silent in the window still get a (zero) row.
        let mut actor_matrix = agg.matrix(Dimension::ACTOR_KEY).cloned().unwrap_or_else(|| empty.clone());
        let actors_shown: Vec<String> = match filter {
            ActorFilter::All => {
                actor_matrix.ensure_rows(unique_actors(records, &config.columns));
                actor_matrix.rows().map(str::to_string).collect()
            }
            ActorFilter::Actor(a) => {
                actor_matrix.ensure_row(a);
                vec![a.clone()]
            }
        };
        let label_matrix = agg.matrix(Dimension::LABEL_KEY).cloned().unwrap_or_else(|| empty.clone());
        let labels_shown: Vec<String> = label_matrix.rows().map(str::to_string).collect();

        let shared = shared_label_width([&actors_shown, &labels_shown], &config.label_width);
        dash.shared_label_width = shared;

        let view = |key: &str, title: String, rows: Vec<String>, matrix: DimensionMatrix, width: u32| {
            let vmax = matrix.vmax(&rows);
            MatrixView {
                key: key.to_string(),
                title,
                layout: LayoutSpec::compute(rows.len(), months, width, &config.layout),
                empty_note: rows.is_empty().then(|| "No data in window.".to_string()),
                rows,
                matrix,
                vmax,
            }
        };

        let mut matrices = vec![
            view(
                Dimension::ACTOR_KEY,
                format!("{}-by-month usage", capitalize(singular(&config.actor_noun))),
                actors_shown.clone(),
                actor_matrix.clone(),
                shared,
            ),
            view(
                Dimension::LABEL_KEY,
                format!("{noun} names by month"),
                labels_shown,
                label_matrix,
                shared,
            ),
        ];

        let mut charts = Vec::new();

        // Cumulative per actor: top N by total in the window.
        let (kept, hidden) = rank_and_truncate(
            actors_shown.iter().map(|a| (a.clone(), actor_matrix.row_total(a))),
            config.legend.max_series,
        );
        charts.push(SeriesChart {
            title: format!("Cumulative {}s by {}", config.event_noun, singular(&config.actor_noun)),
            series: CumulativeSeries::from_matrix(&actor_matrix, &kept),
            legend: pack_legend(&kept, hidden, &config.legend),
            notice: (hidden > 0).then(|| {
                format!(
                    "Showing top {} {} by {}s in window",
                    config.legend.max_series, config.actor_noun, config.event_noun
                )
            }),
        });

        if let Some(metrics) = agg.matrix(Dimension::METRICS_KEY) {
            let labels: Vec<String> = config.score_metrics.iter().map(|m| metric_display_name(m)).collect();
            charts.push(SeriesChart {
                title: format!("Cumulative score totals by month ({who})"),
                series: CumulativeSeries::from_matrix(metrics, &config.score_metrics),
                legend: relabel(pack_legend(&labels, 0, &config.legend), &config.score_metrics),
                notice: None,
            });
        }

        for family in &config.families {
            let raw = agg.matrix(&family.name).cloned().unwrap_or_else(|| empty.clone());
            let display = raw.display_map(|h| family.display_name(h));
            let rows: Vec<String> = display.rows().map(str::to_string).collect();

            let width = match &family.label_width {
                Some(opts) => shared.max(shared_label_width([&rows], opts)),
                None => shared,
            };
            let mut mv = view(&family.name, family_title(family), rows.clone(), display.clone(), width);
            if rows.is_empty() {
                mv.empty_note = Some(format!("No columns found starting with '{}'.", family.prefix));
            }
            matrices.push(mv);

            if !rows.is_empty() {
                charts.push(SeriesChart {
                    title: format!("Cumulative {} totals by month", family_noun(family)),
                    series: CumulativeSeries::from_matrix(&display, &rows),
                    legend: pack_legend(&rows, 0, &config.legend),
                    notice: None,
                });
            }
        }

        dash.matrices = matrices;
        dash.charts = charts;
        dash
    }

    pub fn is_empty(&self) -> bool {
        self.aggregation.is_empty()
    }

    pub fn matrix(&self, key: &str) -> Option<&MatrixView> {
        self.matrices.iter().find(|m| m.key == key)
    }
}

/// Swap legend keys back to the series keys after packing display names.
fn relabel(mut legend: LegendLayout, keys: &[String]) -> LegendLayout {
    for (entry, key) in legend.entries.iter_mut().zip(keys) {
        entry.key = key.clone();
    }
    legend
}

fn family_title(family: &PrefixFamily) -> String {
    if family.title.is_empty() {
        format!("{} per month", capitalize(&family_noun(family)))
    } else {
        family.title.clone()
    }
}

fn family_noun(family: &PrefixFamily) -> String {
    family.prefix.trim_end_matches(':').trim().to_lowercase()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn singular(plural: &str) -> &str {
    plural.strip_suffix('s').unwrap_or(plural)
}

/// Whole numbers without a fraction, everything else to two places.
pub fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}
