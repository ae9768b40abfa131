//! Terminal capability mapping
//!
//! Quantizes 24-bit colors down to the xterm 256-color and the 16-color ANSI
//! palettes, reports whether a color survives that quantization, and detects
//! which tier the current terminal supports.

use ratatui::style::Color as RatatuiColor;
use serde::Serialize;

use crate::{
    colors::{BrandColorize, CanonicalColor},
    format::OutputFormat,
};

/// Axis values of the 6×6×6 cube (indices 16–231)
pub const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// First index of the 24-step gray ramp
const GRAY_RAMP_START: u8 = 232;

/// Reference table for the 8 basic and 8 bright ANSI colors
pub const ANSI16_PALETTE: [CanonicalColor; 16] = [
    CanonicalColor::rgb(0, 0, 0),       // black
    CanonicalColor::rgb(128, 0, 0),     // red
    CanonicalColor::rgb(0, 128, 0),     // green
    CanonicalColor::rgb(128, 128, 0),   // yellow
    CanonicalColor::rgb(0, 0, 128),     // blue
    CanonicalColor::rgb(128, 0, 128),   // magenta
    CanonicalColor::rgb(0, 128, 128),   // cyan
    CanonicalColor::rgb(192, 192, 192), // white
    CanonicalColor::rgb(128, 128, 128), // bright black
    CanonicalColor::rgb(255, 0, 0),     // bright red
    CanonicalColor::rgb(0, 255, 0),     // bright green
    CanonicalColor::rgb(255, 255, 0),   // bright yellow
    CanonicalColor::rgb(0, 0, 255),     // bright blue
    CanonicalColor::rgb(255, 0, 255),   // bright magenta
    CanonicalColor::rgb(0, 255, 255),   // bright cyan
    CanonicalColor::rgb(255, 255, 255), // bright white
];

/// Reconstruct the color of any 256-color palette index
pub fn palette_rgb(index: u8) -> CanonicalColor {
    match index {
        0..=15 => ANSI16_PALETTE[index as usize],
        16..=231 => {
            let i = index - 16;
            CanonicalColor::rgb(
                CUBE_LEVELS[(i / 36) as usize],
                CUBE_LEVELS[((i / 6) % 6) as usize],
                CUBE_LEVELS[(i % 6) as usize],
            )
        }
        _ => {
            let v = 8 + 10 * (index - GRAY_RAMP_START);
            CanonicalColor::rgb(v, v, v)
        }
    }
}

fn nearest_cube_level(v: u8) -> u8 {
    let mut best = 0;
    for (i, level) in CUBE_LEVELS.iter().enumerate() {
        if v.abs_diff(*level) < v.abs_diff(CUBE_LEVELS[best]) {
            best = i;
        }
    }
    best as u8
}

/// Nearest index in 16..=255: the closest cube entry and the closest gray
/// step are both computed and the smaller distance wins (cube on ties).
pub fn to_ansi256(color: &CanonicalColor) -> u8 {
    let (r, g, b) = color.rgb_components();
    let cube = 16
        + 36 * nearest_cube_level(r)
        + 6 * nearest_cube_level(g)
        + nearest_cube_level(b);

    let mean = (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0;
    let step = ((mean - 8.0) / 10.0).round().clamp(0.0, 23.0) as u8;
    let gray = GRAY_RAMP_START + step;

    if palette_rgb(gray).distance(color) < palette_rgb(cube).distance(color) {
        gray
    } else {
        cube
    }
}

/// Nearest index in 0..=15 by Euclidean distance
pub fn to_ansi16(color: &CanonicalColor) -> u8 {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (i, candidate) in ANSI16_PALETTE.iter().enumerate() {
        let dist = candidate.distance(color);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best as u8
}

/// Whether a color survives each terminal tier without visible loss.
///
/// Advisory only: a tier supports a color when its quantized color lies
/// strictly closer than `epsilon` to the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TerminalSupport {
    pub ansi16: bool,
    pub ansi256: bool,
    pub ansi16m: bool,
}

impl TerminalSupport {
    pub fn for_color(color: &CanonicalColor, epsilon: f64) -> Self {
        let within = |index: u8| palette_rgb(index).distance(color) < epsilon;
        Self {
            ansi16: within(to_ansi16(color)),
            ansi256: within(to_ansi256(color)),
            ansi16m: true,
        }
    }
}

/// Color capability of an output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorTier {
    NoColor,
    Ansi16,
    Ansi256,
    TrueColor,
}

impl ColorTier {
    /// Detect the tier of stdout from the process environment
    pub fn detect() -> Self {
        if !atty::is(atty::Stream::Stdout) {
            return ColorTier::NoColor;
        }

        let tier = Self::from_env(
            std::env::var("NO_COLOR").ok().as_deref(),
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        );
        tracing::debug!(?tier, "detected terminal color tier");
        tier
    }

    /// Tier implied by `NO_COLOR`, `COLORTERM` and `TERM`
    pub fn from_env(
        no_color: Option<&str>,
        colorterm: Option<&str>,
        term: Option<&str>,
    ) -> Self {
        if no_color.is_some_and(|v| !v.is_empty()) {
            return ColorTier::NoColor;
        }

        let term = match term {
            Some(term) if term != "dumb" && !term.is_empty() => term,
            _ => return ColorTier::NoColor,
        };

        match colorterm.map(str::to_ascii_lowercase).as_deref() {
            Some("truecolor") | Some("24bit") => ColorTier::TrueColor,
            _ if term.contains("256color") => ColorTier::Ansi256,
            _ => ColorTier::Ansi16,
        }
    }

    /// The ANSI output format matching this tier, `None` when colors are off
    pub fn output_format(&self) -> Option<OutputFormat> {
        match self {
            ColorTier::NoColor => None,
            ColorTier::Ansi16 => Some(OutputFormat::Ansi16),
            ColorTier::Ansi256 => Some(OutputFormat::Ansi256),
            ColorTier::TrueColor => Some(OutputFormat::Ansi16m),
        }
    }

    /// Convert a color to the ratatui color this tier can display
    pub fn ratatui_color(&self, color: &CanonicalColor) -> RatatuiColor {
        match self {
            ColorTier::NoColor => RatatuiColor::Reset,
            ColorTier::Ansi16 => RatatuiColor::Indexed(to_ansi16(color)),
            ColorTier::Ansi256 => RatatuiColor::Indexed(to_ansi256(color)),
            ColorTier::TrueColor => color.to_ratatui(),
        }
    }

    /// Paint `text` in `color` quantized to this tier, plain when colors are off
    pub fn paint(&self, text: &str, color: &CanonicalColor) -> String {
        match self {
            ColorTier::NoColor => text.to_string(),
            ColorTier::Ansi16 => text.paint_indexed(to_ansi16(color)),
            ColorTier::Ansi256 => text.paint_indexed(to_ansi256(color)),
            ColorTier::TrueColor => text.paint(*color),
        }
    }
}
