// src/color.rs

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let h = hex.trim().trim_start_matches('#');
        if h.len() != 6 || !h.is_ascii() {
            return None;
        }
        let v = u32::from_str_radix(h, 16).ok()?;
        Some(Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let ch = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Rgb::new(ch(self.r, other.r), ch(self.g, other.g), ch(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Value → colour for matrix cells. Zero and negative values get `empty`,
/// which is not part of the `low..high` ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub empty: Rgb,
    pub low: Rgb,
    pub high: Rgb,
}

impl Default for Gradient {
    fn default() -> Self {
        Gradient {
            empty: Rgb::new(0xF5, 0xF7, 0xFA),
            low: Rgb::new(0xA9, 0xBE, 0xE2),
            high: Rgb::new(0x15, 0x4E, 0xB3),
        }
    }
}

impl Gradient {
    /// Position of `v` on the ramp; a non-positive `vmax` maps to 0 rather than dividing.
    pub fn ratio(v: f64, vmax: f64) -> f64 {
        if vmax <= 0.0 || !vmax.is_finite() || v.is_nan() {
            return 0.0;
        }
        (v / vmax).clamp(0.0, 1.0)
    }

    pub fn color_of(&self, v: f64, vmax: f64) -> Rgb {
        if v.is_nan() || v <= 0.0 {
            return self.empty;
        }
        self.low.lerp(self.high, Self::ratio(v, vmax))
    }
}

/// Discrete palette for the calendar: `colors[min(count, cap)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelPalette {
    pub colors: Vec<Rgb>,
    pub cap: u32,
}

impl Default for LevelPalette {
    fn default() -> Self {
        LevelPalette {
            colors: vec![
                Rgb::new(0xF5, 0xF7, 0xFA),
                Rgb::new(0xD1, 0xDC, 0xEF),
                Rgb::new(0xA9, 0xBE, 0xE2),
                Rgb::new(0x83, 0xA1, 0xD6),
                Rgb::new(0x15, 0x4E, 0xB3),
            ],
            cap: 4,
        }
    }
}

impl LevelPalette {
    pub fn level(&self, count: u32) -> usize {
        let top = self.colors.len().saturating_sub(1) as u32;
        count.min(self.cap).min(top) as usize
    }

    pub fn color_for(&self, count: u32) -> Rgb {
        self.colors
            .get(self.level(count))
            .copied()
            .unwrap_or(Rgb::new(0, 0, 0))
    }
}
