use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// Current conditions as reported by a weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    /// Summary code such as `clear-day` or `rain`.
    pub summary: String,
    /// Apparent ("feels like") temperature in degrees Fahrenheit.
    pub apparent_temperature: f64,
    pub observed_at: DateTime<Utc>,
}

/// One RGB color, written on the wire as `rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(pub Srgb<u8>);

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(Srgb::new(r, g, b))
    }

    /// Builds a color from a `0xRRGGBB` literal.
    pub const fn from_u32(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

impl From<Srgb<u8>> for HexColor {
    fn from(color: Srgb<u8>) -> Self {
        Self(color)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color '{0}': expected 6 hex digits")]
pub struct ParseHexColorError(String);

impl FromStr for HexColor {
    type Err = ParseHexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseHexColorError(s.to_string());

        // Srgb also takes the short `rgb` form; the cube only speaks `rrggbb`.
        if s.strip_prefix('#').unwrap_or(s).len() != 6 {
            return Err(err());
        }

        s.parse::<Srgb<u8>>().map(Self).map_err(|_| err())
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Number of addressable positions on the cube.
pub const PALETTE_LEN: usize = 6;

/// Colors for the six cube positions.
///
/// Positions 0 and 2 are the top, 1 and 3 the middle, 4 and 5 the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorPalette(pub [HexColor; PALETTE_LEN]);

impl ColorPalette {
    pub fn filled(color: HexColor) -> Self {
        Self([color; PALETTE_LEN])
    }

    pub fn colors(&self) -> &[HexColor; PALETTE_LEN] {
        &self.0
    }
}

impl fmt::Display for ColorPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, color) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{color}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    #[serde(rename = "setColors")]
    SetColors,
}

/// A single request line sent to the cube.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceCommand {
    pub command: CommandKind,
    pub colors: ColorPalette,
    pub mode: String,
}

impl DeviceCommand {
    pub const AMBIENT_MODE: &'static str = "ambient";

    pub fn set_colors(colors: ColorPalette) -> Self {
        Self {
            command: CommandKind::SetColors,
            colors,
            mode: Self::AMBIENT_MODE.to_string(),
        }
    }
}

/// The cube's reply to a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DeviceAck {
    pub success: bool,
}
