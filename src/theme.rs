// src/theme.rs

use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tui::style::Color;

use crate::color::{Gradient, LevelPalette, Rgb};
use crate::config::config_dir_path;

/// Colours for the terminal viewer and the heatmap ramps.
/// All colors have sensible defaults and can be customized via theme.toml.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Theme {
    // General UI colors
    pub background: ThemeColor,
    pub foreground: ThemeColor,
    pub border: ThemeColor,
    pub title: ThemeColor,
    pub tab_active: ThemeColor,
    pub tab_inactive: ThemeColor,
    pub stats_label: ThemeColor,
    pub stats_value: ThemeColor,

    // Chart colors
    pub chart_line: ThemeColor,
    pub chart_axis: ThemeColor,
    pub chart_labels: ThemeColor,

    pub error: ThemeColor,

    /// Calendar levels, lightest (zero) first.
    pub heat_levels: Vec<ThemeColor>,
    /// Matrix cells: zero value, low end and high end of the ramp.
    pub gradient_empty: ThemeColor,
    pub gradient_low: ThemeColor,
    pub gradient_high: ThemeColor,
    /// Multi-series line charts cycle through these.
    pub series: Vec<ThemeColor>,
}

/// Represents a color that can be serialized to/from TOML
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ThemeColor {
    /// Named color like "red", or a hex string like "#154EB3"
    Named(String),
    /// RGB color as [r, g, b] array
    Rgb([u8; 3]),
    /// Indexed color (0-255)
    Indexed(u8),
}

fn named(s: &str) -> ThemeColor {
    ThemeColor::Named(s.to_string())
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: named("reset"),
            foreground: named("white"),
            border: named("white"),
            title: named("light_blue"),
            tab_active: named("yellow"),
            tab_inactive: named("white"),
            stats_label: named("gray"),
            stats_value: named("yellow"),

            chart_line: named("#154EB3"),
            chart_axis: named("white"),
            chart_labels: named("gray"),

            error: named("red"),

            heat_levels: ["#F5F7FA", "#D1DCEF", "#A9BEE2", "#83A1D6", "#154EB3"]
                .iter()
                .map(|h| named(h))
                .collect(),
            gradient_empty: named("#F5F7FA"),
            gradient_low: named("#A9BEE2"),
            gradient_high: named("#154EB3"),
            series: [
                "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
                "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
                "#393b79", "#637939", "#8c6d31", "#843c39", "#7b4173",
            ]
            .iter()
            .map(|h| named(h))
            .collect(),
        }
    }
}

impl ThemeColor {
    /// Exact RGB value, when the color is given as hex or `[r, g, b]`.
    pub fn to_rgb(&self) -> Option<Rgb> {
        match self {
            ThemeColor::Named(name) if name.starts_with('#') => Rgb::from_hex(name),
            ThemeColor::Rgb([r, g, b]) => Some(Rgb::new(*r, *g, *b)),
            _ => None,
        }
    }

    /// Convert ThemeColor to tui::style::Color
    pub fn to_tui_color(&self) -> Color {
        if let Some(rgb) = self.to_rgb() {
            return Color::Rgb(rgb.r, rgb.g, rgb.b);
        }
        match self {
            ThemeColor::Named(name) => match name.to_lowercase().as_str() {
                "reset" => Color::Reset,
                "black" => Color::Black,
                "red" => Color::Red,
                "green" => Color::Green,
                "yellow" => Color::Yellow,
                "blue" => Color::Blue,
                "magenta" => Color::Magenta,
                "cyan" => Color::Cyan,
                "gray" | "grey" => Color::Gray,
                "dark_gray" | "dark_grey" => Color::DarkGray,
                "light_red" => Color::LightRed,
                "light_green" => Color::LightGreen,
                "light_yellow" => Color::LightYellow,
                "light_blue" => Color::LightBlue,
                "light_magenta" => Color::LightMagenta,
                "light_cyan" => Color::LightCyan,
                "white" => Color::White,
                _ => Color::White, // fallback
            },
            ThemeColor::Rgb([r, g, b]) => Color::Rgb(*r, *g, *b),
            ThemeColor::Indexed(index) => Color::Indexed(*index),
        }
    }
}

pub fn rgb_to_tui(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

impl Theme {
    /// Load theme from config file, falling back to defaults if file doesn't exist or has errors
    pub fn load() -> Self {
        match Self::load_from_config() {
            Ok(theme) => theme,
            Err(err) => {
                tracing::info!(%err, "using default theme");
                let _ = Self::create_default_config();
                Self::default()
            }
        }
    }

    fn load_from_config() -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(Self::config_file_path()?)?;
        let theme: Theme = toml::from_str(&content)?;
        Ok(theme)
    }

    /// Create default theme config file if it doesn't exist
    pub fn create_default_config() -> Result<(), Box<dyn std::error::Error>> {
        let config_dir = config_dir_path()?;
        let config_file = config_dir.join("theme.toml");
        fs::create_dir_all(&config_dir)?;

        if !config_file.exists() {
            let toml_content = toml::to_string_pretty(&Self::default())?;
            fs::write(&config_file, Self::add_config_comments(&toml_content))?;
        }
        Ok(())
    }

    fn config_file_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(config_dir_path()?.join("theme.toml"))
    }

    fn add_config_comments(toml_content: &str) -> String {
        format!(r##"# activity-heatmap theme configuration
#
# Colors can be specified in four ways:
#   1. Named colors: "red", "blue", "green", "yellow", "cyan", "magenta",
#      "white", "black", "gray", "light_red", "light_blue", etc.
#   2. Hex strings: "#154EB3"
#   3. RGB colors: [255, 128, 0] for orange
#   4. Indexed colors: 42 (for terminal color index 42)
#
# heat_levels and the gradient_* colors need exact values (hex or RGB).

{}"##, toml_content)
    }

    /// Calendar level palette; unusable entries fall back to the defaults.
    pub fn level_palette(&self, cap: u32) -> LevelPalette {
        let fallback = LevelPalette::default();
        let colors: Vec<Rgb> = self.heat_levels.iter().filter_map(ThemeColor::to_rgb).collect();
        LevelPalette {
            colors: if colors.is_empty() { fallback.colors } else { colors },
            cap,
        }
    }

    pub fn gradient(&self) -> Gradient {
        let d = Gradient::default();
        Gradient {
            empty: self.gradient_empty.to_rgb().unwrap_or(d.empty),
            low: self.gradient_low.to_rgb().unwrap_or(d.low),
            high: self.gradient_high.to_rgb().unwrap_or(d.high),
        }
    }

    pub fn series_color(&self, idx: usize) -> Color {
        if self.series.is_empty() {
            return self.chart_line.to_tui_color();
        }
        self.series[idx % self.series.len()].to_tui_color()
    }
}
