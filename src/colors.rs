//! Canonical color model.
//!
//! Every accepted input is reduced to a [`CanonicalColor`]:
//! - 8-bit RGB channels plus a normalized alpha
//! - HSL is a derived view computed on demand, never stored
//! - Conversions into owo-colors and ratatui types
//! - Terminal string painting through [`BrandColorize`]

use owo_colors::{OwoColorize, Style, XtermColors};
use ratatui::style::Color as RatatuiColor;
use std::fmt::{self, Display};

/// The single source of truth for a color value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalColor {
    r: u8,
    g: u8,
    b: u8,
    a: f32,
}

impl Default for CanonicalColor {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

impl CanonicalColor {
    /// Create a new RGB color with full opacity
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a new RGBA color, clamping alpha into `[0, 1]`
    #[inline]
    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        let a = if a.is_nan() { 1.0 } else { a.clamp(0.0, 1.0) };
        Self { r, g, b, a }
    }

    /// Unpack a `0xRRGGBB` integer; bits above the low 24 are ignored
    #[inline]
    pub const fn from_packed(n: u32) -> Self {
        Self::rgb(
            ((n >> 16) & 0xFF) as u8,
            ((n >> 8) & 0xFF) as u8,
            (n & 0xFF) as u8,
        )
    }

    /// Create a color from HSL values (hue in degrees, saturation and lightness in percent)
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let (r, g, b) = hsl_to_rgb(h, s, l);
        Self::rgb(r, g, b)
    }

    /// Convert to HSL values
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        rgb_to_hsl(self.r, self.g, self.b)
    }

    pub const fn r(&self) -> u8 {
        self.r
    }

    pub const fn g(&self) -> u8 {
        self.g
    }

    pub const fn b(&self) -> u8 {
        self.b
    }

    /// Alpha in `[0, 1]`
    pub const fn alpha(&self) -> f32 {
        self.a
    }

    /// Alpha scaled to `0..=255`
    pub fn alpha_u8(&self) -> u8 {
        (self.a * 255.0).round() as u8
    }

    /// Get the RGB components
    pub fn rgb_components(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Packed 24-bit integer, alpha dropped
    pub const fn packed(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Uppercase `#RRGGBB`
    pub fn to_hex_upper(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Get color with modified alpha
    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, alpha)
    }

    /// Euclidean distance in RGB space
    pub fn distance(&self, other: &CanonicalColor) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Convert to owo-colors RGB type
    pub fn to_owo_rgb(&self) -> owo_colors::Rgb {
        owo_colors::Rgb(self.r, self.g, self.b)
    }

    /// Convert to ratatui Color
    pub fn to_ratatui(&self) -> RatatuiColor {
        RatatuiColor::Rgb(self.r, self.g, self.b)
    }
}

/// Convert 8-bit RGB into `(hue°, saturation%, lightness%)`
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    if delta == 0.0 {
        return (0.0, 0.0, l * 100.0);
    }

    let mut h = if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    if h < 0.0 {
        h += 360.0;
    }
    if h >= 360.0 {
        h -= 360.0;
    }

    let s = delta / (1.0 - (2.0 * l - 1.0).abs());

    (h, s * 100.0, l * 100.0)
}

/// Convert `(hue°, saturation%, lightness%)` into 8-bit RGB
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 100.0) / 100.0;
    let l = l.clamp(0.0, 100.0) / 100.0;
    let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;

    if s == 0.0 {
        let v = to_u8(l);
        return (v, v, v);
    }

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (to_u8(r + m), to_u8(g + m), to_u8(b + m))
}

impl From<CanonicalColor> for owo_colors::Rgb {
    fn from(color: CanonicalColor) -> Self {
        color.to_owo_rgb()
    }
}

impl From<CanonicalColor> for RatatuiColor {
    fn from(color: CanonicalColor) -> Self {
        color.to_ratatui()
    }
}

impl fmt::Display for CanonicalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Extension trait for painting any displayable value through owo-colors.
///
/// Every painted string ends with a full SGR reset (`\x1b[0m`).
pub trait BrandColorize: OwoColorize + Display {
    /// Paint in 24-bit color
    fn paint(&self, color: CanonicalColor) -> String {
        self.style(Style::new().color(color.to_owo_rgb())).to_string()
    }

    /// Paint with an xterm palette index (0-255)
    fn paint_indexed(&self, index: u8) -> String {
        self.style(Style::new().color(XtermColors::from(index)))
            .to_string()
    }
}

impl<T: OwoColorize + Display> BrandColorize for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq as pretty_assert_eq;
    use test_case::test_case;

    /// Helper function to round HSL values for testing
    fn round_hsl(hsl: (f64, f64, f64)) -> (f64, f64, f64) {
        (
            (hsl.0 * 10.0).round() / 10.0,
            (hsl.1 * 10.0).round() / 10.0,
            (hsl.2 * 10.0).round() / 10.0,
        )
    }

    #[test]
    fn test_color_conversions() {
        let color = CanonicalColor::rgb(255, 128, 0);
        pretty_assert_eq!(color.to_owo_rgb(), owo_colors::Rgb(255, 128, 0));
        pretty_assert_eq!(color.to_ratatui(), RatatuiColor::Rgb(255, 128, 0));
    }

    #[test]
    fn test_hex_and_packed() {
        let color = CanonicalColor::rgb(255, 128, 0);
        pretty_assert_eq!(color.to_hex(), "#ff8000");
        pretty_assert_eq!(color.to_hex_upper(), "#FF8000");
        pretty_assert_eq!(color.packed(), 0xff8000);
        pretty_assert_eq!(CanonicalColor::from_packed(0xff8000), color);
    }

    #[test_case(255, 0, 0 => (0.0, 100.0, 50.0))]
    #[test_case(0, 0, 255 => (240.0, 100.0, 50.0))]
    #[test_case(0, 128, 0 => (120.0, 100.0, 25.1))]
    #[test_case(128, 128, 128 => (0.0, 0.0, 50.2))]
    #[test_case(255, 0, 128 => (329.9, 100.0, 50.0))]
    fn test_rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
        round_hsl(rgb_to_hsl(r, g, b))
    }

    #[test_case(0.0, 100.0, 50.0 => (255, 0, 0))]
    #[test_case(120.0, 100.0, 25.0 => (0, 128, 0))]
    #[test_case(240.0, 100.0, 50.0 => (0, 0, 255))]
    #[test_case(360.0, 100.0, 50.0 => (255, 0, 0))]
    #[test_case(0.0, 0.0, 100.0 => (255, 255, 255))]
    fn test_hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
        hsl_to_rgb(h, s, l)
    }

    #[test]
    fn test_hsl_round_trip_within_one() {
        for r in 0..=255u8 {
            for g in 0..=255u8 {
                for b in 0..=255u8 {
                    let (h, s, l) = rgb_to_hsl(r, g, b);
                    assert!((0.0..360.0).contains(&h), "hue {h} out of range");
                    let (r2, g2, b2) = hsl_to_rgb(h, s, l);
                    assert!(
                        r.abs_diff(r2) <= 1 && g.abs_diff(g2) <= 1 && b.abs_diff(b2) <= 1,
                        "({r}, {g}, {b}) came back as ({r2}, {g2}, {b2})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_alpha_handling() {
        let color = CanonicalColor::rgba(255, 0, 0, 0.5);
        pretty_assert_eq!(color.alpha(), 0.5);
        pretty_assert_eq!(color.alpha_u8(), 128);

        let modified = color.with_alpha(2.0);
        pretty_assert_eq!(modified.alpha(), 1.0);
        pretty_assert_eq!(modified.rgb_components(), (255, 0, 0));

        pretty_assert_eq!(CanonicalColor::rgba(1, 2, 3, f32::NAN).alpha(), 1.0);
    }

    #[test]
    fn test_equality_includes_alpha() {
        assert_ne!(
            CanonicalColor::rgb(1, 2, 3),
            CanonicalColor::rgba(1, 2, 3, 0.5)
        );
    }

    #[test]
    fn test_distance() {
        let black = CanonicalColor::rgb(0, 0, 0);
        let white = CanonicalColor::rgb(255, 255, 255);
        pretty_assert_eq!(black.distance(&white), (3.0f64 * 255.0 * 255.0).sqrt());
        pretty_assert_eq!(black.distance(&CanonicalColor::rgb(1, 0, 0)), 1.0);
    }

    #[test]
    fn test_from_hsl_keeps_opacity() {
        let color = CanonicalColor::from_hsl(120.0, 100.0, 25.0);
        pretty_assert_eq!(color, CanonicalColor::rgb(0, 128, 0));
        pretty_assert_eq!(color.with_alpha(0.5).alpha(), 0.5);
    }

    #[test]
    fn test_display() {
        pretty_assert_eq!(CanonicalColor::rgb(1, 2, 3).to_string(), "rgb(1, 2, 3)");
        pretty_assert_eq!(
            CanonicalColor::rgba(1, 2, 3, 0.25).to_string(),
            "rgba(1, 2, 3, 0.25)"
        );
    }

    #[test]
    fn test_brand_colorize() {
        pretty_assert_eq!(
            "Test".paint(CanonicalColor::rgb(1, 2, 3)),
            "\x1b[38;2;1;2;3mTest\x1b[0m"
        );
        pretty_assert_eq!("Test".paint_indexed(196), "\x1b[38;5;196mTest\x1b[0m");
        pretty_assert_eq!(42u8.paint_indexed(9), "\x1b[38;5;9m42\x1b[0m");
    }
}
