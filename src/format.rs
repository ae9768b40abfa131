//! Output encodings of a canonical color.

use serde::Serialize;
use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::{
    colors::CanonicalColor,
    error::CanvasColorError,
    terminal::{to_ansi16, to_ansi256},
};

const CSI: &str = "\x1b[";
const SGR: &str = "m";

/// Output format tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Css,
    Hex,
    HexUpper,
    Number,
    Rgb,
    Rgba,
    Hsl,
    Hsla,
    RgbObject,
    RgbaObject,
    RgbArray,
    RgbaArray,
    Ansi16m,
    Ansi256,
    Ansi16,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 15] = [
        OutputFormat::Css,
        OutputFormat::Hex,
        OutputFormat::HexUpper,
        OutputFormat::Number,
        OutputFormat::Rgb,
        OutputFormat::Rgba,
        OutputFormat::Hsl,
        OutputFormat::Hsla,
        OutputFormat::RgbObject,
        OutputFormat::RgbaObject,
        OutputFormat::RgbArray,
        OutputFormat::RgbaArray,
        OutputFormat::Ansi16m,
        OutputFormat::Ansi256,
        OutputFormat::Ansi16,
    ];

    /// Resolve a tag. Matching is exact, so `hex` and `HEX` differ; `ansi`
    /// is accepted as an alias of `ansi-16m`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let format = match tag {
            "css" => OutputFormat::Css,
            "hex" => OutputFormat::Hex,
            "HEX" => OutputFormat::HexUpper,
            "number" => OutputFormat::Number,
            "rgb" => OutputFormat::Rgb,
            "rgba" => OutputFormat::Rgba,
            "hsl" => OutputFormat::Hsl,
            "hsla" => OutputFormat::Hsla,
            "{rgb}" => OutputFormat::RgbObject,
            "{rgba}" => OutputFormat::RgbaObject,
            "[rgb]" => OutputFormat::RgbArray,
            "[rgba]" => OutputFormat::RgbaArray,
            "ansi" | "ansi-16m" => OutputFormat::Ansi16m,
            "ansi-256" => OutputFormat::Ansi256,
            "ansi-16" => OutputFormat::Ansi16,
            _ => return None,
        };
        Some(format)
    }

    pub const fn tag(&self) -> &'static str {
        match self {
            OutputFormat::Css => "css",
            OutputFormat::Hex => "hex",
            OutputFormat::HexUpper => "HEX",
            OutputFormat::Number => "number",
            OutputFormat::Rgb => "rgb",
            OutputFormat::Rgba => "rgba",
            OutputFormat::Hsl => "hsl",
            OutputFormat::Hsla => "hsla",
            OutputFormat::RgbObject => "{rgb}",
            OutputFormat::RgbaObject => "{rgba}",
            OutputFormat::RgbArray => "[rgb]",
            OutputFormat::RgbaArray => "[rgba]",
            OutputFormat::Ansi16m => "ansi-16m",
            OutputFormat::Ansi256 => "ansi-256",
            OutputFormat::Ansi16 => "ansi-16",
        }
    }

    pub const fn is_ansi(&self) -> bool {
        matches!(
            self,
            OutputFormat::Ansi16m | OutputFormat::Ansi256 | OutputFormat::Ansi16
        )
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for OutputFormat {
    type Err = CanvasColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| CanvasColorError::unsupported_format(s))
    }
}

/// A serialized color; strings, numbers, objects or arrays depending on the tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormattedColor {
    Text(String),
    Number(u32),
    RgbObject { r: u8, g: u8, b: u8 },
    RgbaObject { r: u8, g: u8, b: u8, a: f32 },
    RgbArray([u8; 3]),
    RgbaArray([u8; 4]),
}

impl FormattedColor {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormattedColor::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            FormattedColor::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl Display for FormattedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormattedColor::Text(s) => f.write_str(s),
            FormattedColor::Number(n) => write!(f, "{}", n),
            structured => {
                let json = serde_json::to_string(structured).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// Serialize `color` in the given format
pub fn format(color: &CanonicalColor, format: OutputFormat) -> FormattedColor {
    let (r, g, b) = color.rgb_components();
    let a = color.alpha();
    let text = FormattedColor::Text;

    match format {
        OutputFormat::Css | OutputFormat::Rgba => text(format!("rgba({}, {}, {}, {})", r, g, b, a)),
        OutputFormat::Hex => text(color.to_hex()),
        OutputFormat::HexUpper => text(color.to_hex_upper()),
        OutputFormat::Number => FormattedColor::Number(color.packed()),
        OutputFormat::Rgb => text(format!("rgb({}, {}, {})", r, g, b)),
        OutputFormat::Hsl => {
            let (h, s, l) = rounded_hsl(color);
            text(format!("hsl({}, {}%, {}%)", h, s, l))
        }
        OutputFormat::Hsla => {
            let (h, s, l) = rounded_hsl(color);
            text(format!("hsla({}, {}%, {}%, {})", h, s, l, a))
        }
        OutputFormat::RgbObject => FormattedColor::RgbObject { r, g, b },
        OutputFormat::RgbaObject => FormattedColor::RgbaObject { r, g, b, a },
        OutputFormat::RgbArray => FormattedColor::RgbArray([r, g, b]),
        OutputFormat::RgbaArray => FormattedColor::RgbaArray([r, g, b, color.alpha_u8()]),
        OutputFormat::Ansi16m => text(format!("{CSI}38;2;{r};{g};{b}{SGR}")),
        OutputFormat::Ansi256 => text(format!("{CSI}38;5;{}{SGR}", to_ansi256(color))),
        OutputFormat::Ansi16 => text(format!("{CSI}38;5;{}{SGR}", to_ansi16(color))),
    }
}

/// Same as [`format`] for a raw tag; unknown tags yield `None`
pub fn format_tag(color: &CanonicalColor, tag: &str) -> Option<FormattedColor> {
    let Some(output) = OutputFormat::from_tag(tag) else {
        tracing::debug!(tag, "unsupported output format");
        return None;
    };
    Some(format(color, output))
}

fn rounded_hsl(color: &CanonicalColor) -> (u32, u32, u32) {
    let (h, s, l) = color.to_hsl();
    ((h.round() as u32) % 360, s.round() as u32, l.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq as pretty_assert_eq;
    use test_case::test_case;

    const RED: CanonicalColor = CanonicalColor::rgb(255, 0, 0);

    #[test_case("css" => "rgba(255, 0, 0, 1)")]
    #[test_case("hex" => "#ff0000")]
    #[test_case("HEX" => "#FF0000" ; "uppercase hex")]
    #[test_case("number" => "16711680")]
    #[test_case("rgb" => "rgb(255, 0, 0)")]
    #[test_case("rgba" => "rgba(255, 0, 0, 1)")]
    #[test_case("hsl" => "hsl(0, 100%, 50%)")]
    #[test_case("hsla" => "hsla(0, 100%, 50%, 1)")]
    #[test_case("{rgb}" => r#"{"r":255,"g":0,"b":0}"# ; "rgb object")]
    #[test_case("{rgba}" => r#"{"r":255,"g":0,"b":0,"a":1.0}"# ; "rgba object")]
    #[test_case("[rgb]" => "[255,0,0]" ; "rgb array")]
    #[test_case("[rgba]" => "[255,0,0,255]" ; "rgba array")]
    #[test_case("ansi" => "\u{1b}[38;2;255;0;0m")]
    #[test_case("ansi-16m" => "\u{1b}[38;2;255;0;0m")]
    #[test_case("ansi-256" => "\u{1b}[38;5;196m")]
    #[test_case("ansi-16" => "\u{1b}[38;5;9m")]
    fn test_red_in_every_format(tag: &str) -> String {
        format_tag(&RED, tag)
            .unwrap_or_else(|| panic!("tag {tag} unsupported"))
            .to_string()
    }

    #[test]
    fn test_structured_values() {
        pretty_assert_eq!(format(&RED, OutputFormat::Number).as_number(), Some(16711680));
        pretty_assert_eq!(
            format(&RED, OutputFormat::RgbaObject),
            FormattedColor::RgbaObject {
                r: 255,
                g: 0,
                b: 0,
                a: 1.0
            }
        );

        let translucent = CanonicalColor::rgba(1, 2, 3, 0.5);
        pretty_assert_eq!(
            format(&translucent, OutputFormat::RgbaArray),
            FormattedColor::RgbaArray([1, 2, 3, 128])
        );
        pretty_assert_eq!(
            format(&translucent, OutputFormat::Css).as_str(),
            Some("rgba(1, 2, 3, 0.5)")
        );
    }

    #[test_case("Hex" ; "wrong case")]
    #[test_case("ansi-8" ; "unknown tier")]
    #[test_case("" ; "empty tag")]
    #[test_case("rgb " ; "trailing space")]
    fn test_unsupported_tag_is_empty(tag: &str) {
        pretty_assert_eq!(format_tag(&RED, tag), None);
        assert!(tag.parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_tags_round_trip() {
        for output in OutputFormat::ALL {
            pretty_assert_eq!(OutputFormat::from_tag(output.tag()), Some(output));
        }
        pretty_assert_eq!(OutputFormat::from_tag("ansi"), Some(OutputFormat::Ansi16m));
        pretty_assert_eq!(OutputFormat::ALL.iter().filter(|f| f.is_ansi()).count(), 3);
    }

    #[test]
    fn test_ansi_tiers_quantize() {
        let orange = CanonicalColor::rgb(255, 128, 0);
        pretty_assert_eq!(
            format(&orange, OutputFormat::Ansi256).to_string(),
            "\x1b[38;5;208m"
        );
        pretty_assert_eq!(
            format(&orange, OutputFormat::Ansi16m).to_string(),
            "\x1b[38;2;255;128;0m"
        );
    }
}
