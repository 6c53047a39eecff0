//! Color-to-level classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::color::{Hsl, Rgb};
use crate::error::{Error, Result};

const MAX_HUE: f64 = 360.0;
const MAX_LUMINANCE: f64 = 100.0;

/// Semantic importance of an annotation, derived from its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Title-level entry
    Level1,
    /// Normal-priority bullet
    Level2,
    /// Low-priority sub-bullet
    Level3,
    /// Summary ("special level 1")
    Summary,
    /// Important ("special level 2")
    Important,
    /// No reference color matched
    Unknown,
}

impl Level {
    /// Reference levels in match priority order.
    pub const RANKED: [Level; 5] = [
        Level::Level1,
        Level::Level2,
        Level::Level3,
        Level::Summary,
        Level::Important,
    ];

    /// Display label used in the legend.
    pub fn label(self) -> &'static str {
        match self {
            Level::Level1 => "Level 1",
            Level::Level2 => "Level 2",
            Level::Level3 => "Level 3",
            Level::Summary => "Special level 1",
            Level::Important => "Special level 2",
            Level::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference color for each level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelColors {
    pub level1: Rgb,
    pub level2: Rgb,
    pub level3: Rgb,
    pub summary: Rgb,
    pub important: Rgb,
}

impl LevelColors {
    /// Reference color of a level; `None` for [`Level::Unknown`].
    pub fn get(&self, level: Level) -> Option<Rgb> {
        match level {
            Level::Level1 => Some(self.level1),
            Level::Level2 => Some(self.level2),
            Level::Level3 => Some(self.level3),
            Level::Summary => Some(self.summary),
            Level::Important => Some(self.important),
            Level::Unknown => None,
        }
    }
}

impl Default for LevelColors {
    fn default() -> Self {
        Self {
            level1: Rgb::new(255, 173, 91),
            level2: Rgb::new(255, 255, 0),
            level3: Rgb::new(209, 223, 235),
            summary: Rgb::new(0, 255, 0),
            important: Rgb::new(252, 54, 54),
        }
    }
}

/// Reference colors plus tolerance bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Reference colors
    pub colors: LevelColors,

    /// Maximum hue distance, in percent of 360 degrees
    pub hue_tolerance_pct: f64,

    /// Maximum luminance distance, in percent
    pub luminance_tolerance_pct: f64,
}

impl ClassifierConfig {
    /// Set the reference colors.
    pub fn with_colors(mut self, colors: LevelColors) -> Self {
        self.colors = colors;
        self
    }

    /// Set both tolerances.
    pub fn with_tolerances(mut self, hue_pct: f64, luminance_pct: f64) -> Self {
        self.hue_tolerance_pct = hue_pct;
        self.luminance_tolerance_pct = luminance_pct;
        self
    }

    /// Check that tolerances are percentages.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("hue_tolerance_pct", self.hue_tolerance_pct),
            ("luminance_tolerance_pct", self.luminance_tolerance_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            colors: LevelColors::default(),
            hue_tolerance_pct: 5.0,
            luminance_tolerance_pct: 30.0,
        }
    }
}

/// Classifies colors against a fixed, ordered table of reference levels.
#[derive(Debug, Clone)]
pub struct ColorClassifier {
    table: Vec<(Level, Hsl)>,
    hue_tolerance_pct: f64,
    luminance_tolerance_pct: f64,
}

impl ColorClassifier {
    /// Build the lookup table from a configuration.
    pub fn new(config: &ClassifierConfig) -> Self {
        let table = Level::RANKED
            .iter()
            .filter_map(|&level| config.colors.get(level).map(|c| (level, c.to_hsl())))
            .collect();
        Self {
            table,
            hue_tolerance_pct: config.hue_tolerance_pct,
            luminance_tolerance_pct: config.luminance_tolerance_pct,
        }
    }

    /// Level of the first reference whose hue and luminance bands contain `color`.
    ///
    /// Hue distance is linear, not circular: hues near 0 and near 360 are far
    /// apart.
    pub fn classify(&self, color: Option<Rgb>) -> Level {
        let Some(color) = color else {
            return Level::Unknown;
        };
        let hsl = color.to_hsl();
        self.table
            .iter()
            .find(|(_, reference)| self.within_tolerance(&hsl, reference))
            .map(|(level, _)| *level)
            .unwrap_or(Level::Unknown)
    }

    fn within_tolerance(&self, hsl: &Hsl, reference: &Hsl) -> bool {
        let hue_distance = (100.0 * (hsl.hue - reference.hue) / MAX_HUE).abs();
        let lum_distance = (100.0 * (hsl.luminance - reference.luminance) / MAX_LUMINANCE).abs();
        hue_distance <= self.hue_tolerance_pct && lum_distance <= self.luminance_tolerance_pct
    }
}

/// Classify a single color without keeping the lookup table around.
pub fn classify(color: Option<Rgb>, config: &ClassifierConfig) -> Level {
    ColorClassifier::new(config).classify(color)
}
