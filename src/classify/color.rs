//! RGB colors and their hue/saturation/luminance form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::round_half_up;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorSpec", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to HSL with whole-number components.
    ///
    /// Hue is in degrees `[0, 360)`, saturation and luminance in percent. Each
    /// component is rounded half-up, so equal inputs always land on the same
    /// integer grid.
    pub fn to_hsl(self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let mut hue = if delta == 0.0 {
            0.0
        } else if max == r {
            (g - b) / delta
        } else if max == g {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        hue = (hue * 60.0).min(360.0);
        if hue < 0.0 {
            hue += 360.0;
        }

        let lum = (min + max) / 2.0;
        let sat = if delta == 0.0 {
            0.0
        } else if lum <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        Hsl {
            hue: round_half_up(hue),
            saturation: round_half_up(sat * 100.0),
            luminance: round_half_up(lum * 100.0),
        }
    }

    /// Human-readable name of the color's hue band.
    pub fn name(self) -> &'static str {
        hue_name(self.to_hsl().hue)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Parse `#RRGGBB`, `#RGB` or `r,g,b` (optionally wrapped in `rgb(...)`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidColor(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            let expanded: String = match hex.len() {
                3 => hex.chars().flat_map(|c| [c, c]).collect(),
                6 => hex.to_string(),
                _ => return Err(invalid()),
            };
            let value = u32::from_str_radix(&expanded, 16).map_err(|_| invalid())?;
            return Ok(Rgb::new(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            ));
        }

        let inner = s
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(s);
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| invalid())?;
        }
        Ok(Rgb::new(channels[0], channels[1], channels[2]))
    }
}

/// Accepted serialized shapes for a color.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Triple([u8; 3]),
    Text(String),
}

impl TryFrom<ColorSpec> for Rgb {
    type Error = Error;

    fn try_from(spec: ColorSpec) -> Result<Self> {
        match spec {
            ColorSpec::Triple([r, g, b]) => Ok(Rgb::new(r, g, b)),
            ColorSpec::Text(s) => s.parse(),
        }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Hue in degrees, saturation and luminance in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub luminance: f64,
}

/// Name of the hue band a hue falls in.
pub fn hue_name(hue: f64) -> &'static str {
    match hue {
        h if h <= 20.0 => "Red",
        h if h <= 55.0 => "Orange",
        h if h <= 70.0 => "Yellow",
        h if h <= 160.0 => "Green",
        h if h <= 195.0 => "Cyan",
        h if h <= 240.0 => "Blue",
        h if h <= 270.0 => "Indigo",
        h if h <= 300.0 => "Violet",
        h if h <= 330.0 => "Magenta",
        _ => "Red",
    }
}
