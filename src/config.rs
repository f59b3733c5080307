// src/config.rs

use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::dimension::{Dimension, PrefixFamily};
use crate::layout::{LabelWidthOptions, LayoutConfig};
use crate::legend::LegendConfig;
use crate::record::Columns;

pub const APP_DIR: &str = "activity-heatmap";

/// Everything about how rows are read and charts are laid out.
/// Missing keys in the TOML file fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Numeric columns summed for the cumulative score chart.
    pub score_metrics: Vec<String>,
    /// Calendar counts at or above this get the darkest colour.
    pub calendar_cap: u32,
    pub tooltip_max_lines: usize,
    /// Singular noun for one record, e.g. "session".
    pub event_noun: String,
    /// Plural noun for actors, e.g. "players".
    pub actor_noun: String,
    pub columns: Columns,
    /// Header-prefix column families, one matrix each.
    pub families: Vec<PrefixFamily>,
    pub layout: LayoutConfig,
    /// Shared label column sizing for the aligned matrices.
    pub label_width: LabelWidthOptions,
    pub legend: LegendConfig,
}

impl Default for Config {
    fn default() -> Self {
        let mut complexity = PrefixFamily::new("complexity", "Complexity:", "Complexities Experienced Per Month");
        complexity.label_width = Some(LabelWidthOptions {
            max_chars: 35,
            min: 160,
            max: 560,
            px_per_char: 7,
            padding: 24,
        });
        Config {
            columns: Columns::default(),
            score_metrics: [
                "identify_scope",
                "incident_mechanics",
                "external_comms",
                "internal_comms",
                "commanding_the_incident",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            families: vec![
                PrefixFamily::new("category", "Category:", "Complexity Categories Per Month"),
                complexity,
            ],
            layout: LayoutConfig::default(),
            label_width: LabelWidthOptions::default(),
            legend: LegendConfig::default(),
            calendar_cap: 4,
            tooltip_max_lines: 18,
            event_noun: "session".to_string(),
            actor_noun: "players".to_string(),
        }
    }
}

impl Config {
    /// Load from the config dir, writing a commented default file on first run.
    /// Any problem falls back to the defaults.
    pub fn load() -> Self {
        match Self::config_file_path().and_then(|p| Self::load_from(&p)) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::info!(%err, "using default config");
                let _ = Self::create_default_config();
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(toml::from_str(content)?)
    }

    /// Dimensions aggregated on every refresh, in one pass.
    pub fn dimensions(&self) -> Vec<Dimension> {
        let mut dims = vec![Dimension::Actor, Dimension::Label];
        if !self.score_metrics.is_empty() {
            dims.push(Dimension::Metrics(self.score_metrics.clone()));
        }
        dims.extend(self.families.iter().cloned().map(Dimension::Family));
        dims
    }

    pub fn create_default_config() -> Result<(), Box<dyn std::error::Error>> {
        let dir = config_dir_path()?;
        fs::create_dir_all(&dir)?;
        let file = dir.join("config.toml");
        if !file.exists() {
            let content = toml::to_string_pretty(&Self::default())?;
            fs::write(&file, Self::add_config_comments(&content))?;
        }
        Ok(())
    }

    fn config_file_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(config_dir_path()?.join("config.toml"))
    }

    fn add_config_comments(toml_content: &str) -> String {
        format!(r#"# activity-heatmap configuration
#
# [columns]          which CSV columns hold the timestamp, actor, label and status
# score_metrics      numeric columns summed into the cumulative score chart
# [[families]]       header-prefix column families (e.g. "Category:"), one matrix each
# [layout], [legend], [label_width]  chart geometry, in abstract pixels
#
# Delete this file to regenerate the defaults.

{}"#, toml_content)
    }
}

/// `~/.config/activity-heatmap` (or the platform equivalent).
pub fn config_dir_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut dir = dirs::config_dir().ok_or("Could not determine config directory")?;
    dir.push(APP_DIR);
    Ok(dir)
}
