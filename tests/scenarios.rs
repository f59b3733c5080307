//! End-to-end scenarios: CSV text in, dashboard out.

use activity_heatmap::config::Config;
use activity_heatmap::dashboard::Dashboard;
use activity_heatmap::loader::read_csv;
use activity_heatmap::record::ActorFilter;
use chrono::NaiveDate;

const SESSIONS: &str = "\
session_start,player,name,completion_status,identify_scope,\"Category: Comms\",Complexity: Multiple teams
2024-01-10T09:00:00Z,A,Failover,COMPLETED,3,1,
2024-01-10T15:00:00Z,A,Failover,ABANDONED,2,,1
2024-03-01T10:00:00Z,B,Outage,COMPLETED,1,2,1
not a date,C,Broken,COMPLETED,9,9,9
2022-06-01T10:00:00Z,D,Ancient,COMPLETED,1,1,1
";

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dashboard(filter: &str) -> Dashboard {
    let records = read_csv(SESSIONS.as_bytes()).unwrap();
    Dashboard::build(&records, &ActorFilter::parse(filter), &Config::default())
}

#[test]
fn window_is_anchored_on_the_latest_session() {
    let dash = dashboard("ALL");
    let window = dash.aggregation.window.unwrap();
    assert_eq!(window.end, ymd(2024, 3, 1));
    assert_eq!(window.start, ymd(2023, 3, 3));
    assert_eq!(dash.caption, "Window: 2023-03-03 → 2024-03-01");
    assert_eq!(dash.aggregation.months.first(), Some("2023-03"));
    assert_eq!(dash.aggregation.months.last(), Some("2024-03"));
}

#[test]
fn unparseable_and_old_rows_do_not_count() {
    let dash = dashboard("ALL");
    assert_eq!(dash.aggregation.skipped, 1);
    assert_eq!(dash.aggregation.contributing, 3);
    assert_eq!(dash.aggregation.days.count("2024-01-10"), 2);
    assert_eq!(dash.cumulative_monthly.last().unwrap().count, 3);
}

#[test]
fn calendar_and_tooltip_data() {
    let dash = dashboard("ALL");
    let grid = dash.calendar.as_ref().unwrap();
    assert_eq!(grid.max_count(), 2);
    let details = dash.aggregation.days.details("2024-01-10");
    assert_eq!(details.len(), 2);
    assert!(details.iter().all(|d| d.actor == "A" && d.label == "Failover"));
}

#[test]
fn actor_filter_narrows_every_view() {
    let dash = dashboard("B");
    assert_eq!(dash.aggregation.contributing, 1);
    assert_eq!(dash.aggregation.days.total(), 1);
    assert_eq!(dash.matrix("actor").unwrap().rows, vec!["B"]);
    assert_eq!(dash.matrix("label").unwrap().rows, vec!["Outage"]);
    let mar = dash.aggregation.completion.iter().find(|c| c.month == "2024-03").unwrap();
    assert_eq!((mar.completed, mar.total), (1, 1));
}

#[test]
fn families_and_metrics_follow_their_columns() {
    let dash = dashboard("ALL");
    let cat = dash.matrix("category").unwrap();
    assert_eq!(cat.rows, vec!["Comms"]);
    assert_eq!(cat.matrix.get("Comms", "2024-01"), 1.0);
    assert_eq!(cat.matrix.get("Comms", "2024-03"), 2.0);

    let cx = dash.matrix("complexity").unwrap();
    assert_eq!(cx.rows, vec!["Multiple teams"]);
    assert_eq!(cx.matrix.get("Multiple teams", "2024-01"), 1.0);

    let metrics = dash.aggregation.matrix("metrics").unwrap();
    assert_eq!(metrics.get("identify_scope", "2024-01"), 5.0);
    assert_eq!(metrics.row_total("external_comms"), 0.0);
}

#[test]
fn completion_rate_in_january() {
    let dash = dashboard("ALL");
    let jan = dash.aggregation.completion.iter().find(|c| c.month == "2024-01").unwrap();
    assert_eq!(jan.pct, 50.0);
}

#[test]
fn header_only_file_is_the_empty_state() {
    let records = read_csv("session_start,player,name\n".as_bytes()).unwrap();
    let dash = Dashboard::build(&records, &ActorFilter::All, &Config::default());
    assert!(dash.is_empty());
    assert!(dash.calendar.is_none());
}

#[test]
fn custom_columns_from_config() {
    let cfg = Config::from_toml(
        r#"
score_metrics = []
families = []

[columns]
timestamp = "when"
actor = "who"
label = "what"
"#,
    )
    .unwrap();
    let csv = "when,who,what\n1704877200000,eve,drill\n2024-01-11,eve,\n";
    let records = read_csv(csv.as_bytes()).unwrap();
    let dash = Dashboard::build(&records, &ActorFilter::All, &cfg);
    assert_eq!(dash.aggregation.contributing, 2);
    assert_eq!(dash.matrix("label").unwrap().rows, vec!["(unnamed)", "drill"]);
    assert!(dash.aggregation.matrix("metrics").is_none());
    assert_eq!(dash.matrices.len(), 2);
}
