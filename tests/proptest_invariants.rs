//! Property-based invariant tests for the aggregation pipeline.
//!
//! 1. The window is always 365 days and ends on the latest event.
//! 2. The month span is gap-free, strictly increasing and runs from the
//!    window's start month to its end month.
//! 3. Every in-window event lands in exactly one day, one month and one row
//!    of each count matrix; metric matrices sum the metric cells.
//! 4. Cumulative series are prefix sums and never decrease.
//! 5. Legend packing never crosses the right edge, keeps entry order and
//!    never loses a row when entries are added.
//! 6. The colour ramp moves towards `high` as the value grows.
//! 7. Matrices built for the same span share column positions.

use activity_heatmap::aggregate::{aggregate, AggregateRequest};
use activity_heatmap::color::Gradient;
use activity_heatmap::cumulative::running_sum;
use activity_heatmap::dates::{add_days, day_key, month_key, next_month, parse_month_key};
use activity_heatmap::dimension::Dimension;
use activity_heatmap::layout::{LayoutConfig, LayoutSpec};
use activity_heatmap::legend::{pack_legend, LegendConfig};
use activity_heatmap::record::{ActorFilter, Columns, Record};
use activity_heatmap::window::{Window, WINDOW_DAYS};
use chrono::NaiveDate;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn day_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..2000).prop_map(|offset| add_days(base(), offset))
}

/// `(day, actor index, score)`
type Event = (NaiveDate, u8, u8);

fn events_strategy() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec((day_strategy(), 0u8..4, 0u8..10), 1..60)
}

fn records(events: &[Event]) -> Vec<Record> {
    events
        .iter()
        .map(|(day, actor, score)| {
            let day = day_key(*day);
            let actor = format!("actor-{actor}");
            let label = format!("drill-{}", score % 3);
            let score = score.to_string();
            Record::from_pairs([
                ("session_start", day.as_str()),
                ("player", actor.as_str()),
                ("name", label.as_str()),
                ("score", score.as_str()),
            ])
        })
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Window length and anchor
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn window_is_anchored_on_latest_day(days in prop::collection::vec(day_strategy(), 1..40)) {
        let window = Window::from_days(days.iter().copied()).unwrap();
        prop_assert_eq!(window.end, *days.iter().max().unwrap());
        prop_assert_eq!(window.len_days(), WINDOW_DAYS);
        prop_assert!(window.contains(window.start));
        prop_assert!(!window.contains(add_days(window.start, -1)));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Month span
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn month_span_has_no_gaps(end in day_strategy()) {
        let span = Window::ending_at(end).month_span();
        prop_assert!(span.len() == 13 || span.len() == 12);
        for pair in span.as_slice().windows(2) {
            let a = parse_month_key(&pair[0]).unwrap();
            let b = parse_month_key(&pair[1]).unwrap();
            prop_assert_eq!(next_month(a), Some(b), "gap between {} and {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn month_span_runs_from_start_month_to_end_month(end in day_strategy()) {
        let window = Window::ending_at(end);
        let span = window.month_span();
        let first = month_key(window.start);
        let last = month_key(window.end);
        prop_assert_eq!(span.first(), Some(first.as_str()));
        prop_assert_eq!(span.last(), Some(last.as_str()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Conservation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_event_counted_once(events in events_strategy()) {
        let recs = records(&events);
        let columns = Columns::default();
        let dims = [Dimension::Actor];
        let agg = aggregate(
            &recs,
            &AggregateRequest { columns: &columns, filter: &ActorFilter::All, dimensions: &dims },
        );
        let window = agg.window.unwrap();
        let in_window = events.iter().filter(|(d, _, _)| window.contains(*d)).count();

        prop_assert_eq!(agg.contributing, in_window);
        prop_assert_eq!(agg.days.total() as usize, in_window);
        prop_assert_eq!(agg.monthly.iter().map(|m| m.count as usize).sum::<usize>(), in_window);
        prop_assert_eq!(agg.matrix("actor").unwrap().total() as usize, in_window);
    }

    #[test]
    fn label_matrix_counts_every_contributing_event(events in events_strategy(), actor in 0u8..5) {
        let recs = records(&events);
        let columns = Columns::default();
        // actor-4 never occurs, so that filter leaves nothing
        let filter = ActorFilter::parse(&format!("actor-{actor}"));
        let dims = [Dimension::Label];
        let agg = aggregate(&recs, &AggregateRequest { columns: &columns, filter: &filter, dimensions: &dims });
        prop_assert_eq!(agg.matrix("label").unwrap().total() as usize, agg.contributing);
    }

    #[test]
    fn metric_matrix_sums_the_metric_column(events in events_strategy()) {
        let recs = records(&events);
        let columns = Columns::default();
        let dims = [Dimension::Metrics(vec!["score".to_string()])];
        let agg = aggregate(
            &recs,
            &AggregateRequest { columns: &columns, filter: &ActorFilter::All, dimensions: &dims },
        );
        let window = agg.window.unwrap();
        let expected: f64 = events
            .iter()
            .filter(|(d, _, _)| window.contains(*d))
            .map(|(_, _, score)| f64::from(*score))
            .sum();
        let metrics = agg.matrix("metrics").unwrap();
        prop_assert_eq!(metrics.row_total("score"), expected);
        prop_assert_eq!(metrics.total(), expected);
    }

    #[test]
    fn filters_partition_the_events(events in events_strategy()) {
        let recs = records(&events);
        let columns = Columns::default();
        let run = |filter: &ActorFilter| {
            aggregate(&recs, &AggregateRequest { columns: &columns, filter, dimensions: &[] }).contributing
        };
        let all = run(&ActorFilter::All);
        let split: usize = (0..4).map(|a| run(&ActorFilter::parse(&format!("actor-{a}")))).sum();
        prop_assert_eq!(all, split);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Cumulative series
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn running_sum_is_monotone_prefix_sum(values in prop::collection::vec(0u32..1000, 0..30)) {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let run = running_sum(&values);
        prop_assert_eq!(run.len(), values.len());
        for i in 0..run.len() {
            prop_assert_eq!(run[i], values[..=i].iter().sum::<f64>());
            if i > 0 {
                prop_assert!(run[i] >= run[i - 1]);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Legend packing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn legend_rows_stay_inside_bounds(labels in prop::collection::vec("[a-z ]{0,60}", 0..40)) {
        let cfg = LegendConfig::default();
        let legend = pack_legend(&labels, 0, &cfg);
        prop_assert_eq!(legend.entries.len(), labels.len());
        let mut last = (0usize, 0u32);
        for entry in &legend.entries {
            prop_assert!(entry.x + entry.width <= cfg.max_x, "{:?} crosses max_x", entry);
            prop_assert!((entry.row, entry.x) > last || last == (0, 0));
            last = (entry.row, entry.x);
        }
        prop_assert!(legend.height >= cfg.first_baseline + 16);
    }

    #[test]
    fn legend_rows_never_shrink_as_entries_are_added(labels in prop::collection::vec("[a-z ]{0,60}", 0..40)) {
        let cfg = LegendConfig::default();
        let mut prev = 0usize;
        for k in 0..=labels.len() {
            let rows = pack_legend(&labels[..k], 0, &cfg).rows;
            prop_assert!(rows >= prev, "rows fell from {} to {} at {} entries", prev, rows, k);
            prev = rows;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Colour ramp
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn gradient_moves_towards_high(a in 0.001f64..100.0, b in 0.001f64..100.0, vmax in 0.001f64..100.0) {
        let g = Gradient::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let c1 = g.color_of(lo, vmax);
        let c2 = g.color_of(hi, vmax);
        let dist = |c: activity_heatmap::color::Rgb| {
            (c.r as i32 - g.high.r as i32).abs()
                + (c.g as i32 - g.high.g as i32).abs()
                + (c.b as i32 - g.high.b as i32).abs()
        };
        prop_assert!(dist(c2) <= dist(c1));
        prop_assert_eq!(g.color_of(0.0, vmax), g.empty);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Shared column positions
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn same_span_same_columns(rows_a in 0usize..50, rows_b in 0usize..50, months in 1usize..14, label in 90u32..340) {
        let cfg = LayoutConfig::default();
        let a = LayoutSpec::compute(rows_a, months, label, &cfg);
        let b = LayoutSpec::compute(rows_b, months, label, &cfg);
        for col in 0..months {
            prop_assert_eq!(a.month_center_x(col), b.month_center_x(col));
        }
        prop_assert!(a.cell_render_width >= cfg.min_render_width);
        prop_assert!(a.canvas_height >= cfg.min_canvas_height);
    }
}
