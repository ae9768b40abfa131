//! Input classification and decoding.
//!
//! A raw value becomes a [`ColorInput`] variant first ([`ColorInput::classify`]
//! for strings), then [`parse`] decodes that variant into a [`CanonicalColor`].
//! Range violations are reported, never clamped.

use serde::Serialize;
use std::{fmt, str::FromStr};

use crate::{
    colors::CanonicalColor,
    error::{CanvasColorError, CanvasColorResult},
};

/// Every shape a caller may hand to the engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColorInput {
    /// CSS keyword, e.g. `rebeccapurple`
    Named(String),
    /// `#rgb` or `#rrggbb`
    Hex(String),
    /// `0xRRGGBB`
    Packed(u32),
    /// `rgb()`, `rgba()`, `hsl()` or `hsla()`
    Functional(String),
    /// Plain object; channels are kept as given so range errors can be reported
    Object {
        r: f64,
        g: f64,
        b: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        a: Option<f64>,
    },
    /// `[r, g, b]` or `[r, g, b, a]`
    Tuple(Vec<f64>),
}

impl ColorInput {
    /// Decide which string shape `raw` has. Hex wins on a leading `#`, a
    /// parenthesis means a functional notation, anything else is looked up
    /// as a keyword.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        let input = if trimmed.starts_with('#') {
            ColorInput::Hex(raw.to_string())
        } else if trimmed.contains('(') {
            ColorInput::Functional(raw.to_string())
        } else {
            ColorInput::Named(raw.to_string())
        };
        tracing::trace!(?input, "classified color input");
        input
    }

    pub fn object(r: f64, g: f64, b: f64, a: Option<f64>) -> Self {
        ColorInput::Object { r, g, b, a }
    }

    /// Short label of the variant, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ColorInput::Named(_) => "named",
            ColorInput::Hex(_) => "hex",
            ColorInput::Packed(_) => "packed",
            ColorInput::Functional(_) => "functional",
            ColorInput::Object { .. } => "object",
            ColorInput::Tuple(_) => "tuple",
        }
    }

    /// The string key used for memoization, if this input is textual
    pub fn cache_key(&self) -> Option<&str> {
        match self {
            ColorInput::Named(s) | ColorInput::Hex(s) | ColorInput::Functional(s) => {
                Some(s.trim())
            }
            _ => None,
        }
    }
}

impl fmt::Display for ColorInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorInput::Named(s) | ColorInput::Hex(s) | ColorInput::Functional(s) => {
                f.write_str(s)
            }
            ColorInput::Packed(n) => write!(f, "{}", n),
            ColorInput::Object { r, g, b, a: None } => {
                write!(f, "{{r: {}, g: {}, b: {}}}", r, g, b)
            }
            ColorInput::Object {
                r,
                g,
                b,
                a: Some(a),
            } => write!(f, "{{r: {}, g: {}, b: {}, a: {}}}", r, g, b, a),
            ColorInput::Tuple(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for ColorInput {
    fn from(raw: &str) -> Self {
        ColorInput::classify(raw)
    }
}

impl From<String> for ColorInput {
    fn from(raw: String) -> Self {
        ColorInput::classify(&raw)
    }
}

impl From<&String> for ColorInput {
    fn from(raw: &String) -> Self {
        ColorInput::classify(raw)
    }
}

impl From<u32> for ColorInput {
    fn from(n: u32) -> Self {
        ColorInput::Packed(n)
    }
}

impl From<[u8; 3]> for ColorInput {
    fn from([r, g, b]: [u8; 3]) -> Self {
        ColorInput::Tuple(vec![f64::from(r), f64::from(g), f64::from(b)])
    }
}

impl From<Vec<f64>> for ColorInput {
    fn from(values: Vec<f64>) -> Self {
        ColorInput::Tuple(values)
    }
}

impl From<(u8, u8, u8)> for ColorInput {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        ColorInput::object(f64::from(r), f64::from(g), f64::from(b), None)
    }
}

impl From<CanonicalColor> for ColorInput {
    fn from(color: CanonicalColor) -> Self {
        ColorInput::Tuple(vec![
            f64::from(color.r()),
            f64::from(color.g()),
            f64::from(color.b()),
            f64::from(color.alpha()),
        ])
    }
}

impl FromStr for CanonicalColor {
    type Err = CanvasColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(&ColorInput::classify(s))
    }
}

/// Decode any [`ColorInput`] into its canonical color
pub fn parse(input: &ColorInput) -> CanvasColorResult<CanonicalColor> {
    let parsed = match input {
        ColorInput::Named(name) => parse_named(name),
        ColorInput::Hex(hex) => parse_hex(hex),
        ColorInput::Packed(n) => parse_packed(*n),
        ColorInput::Functional(src) => parse_functional(src),
        ColorInput::Object { r, g, b, a } => parse_object(input, *r, *g, *b, *a),
        ColorInput::Tuple(values) => parse_tuple(input, values),
    };

    match &parsed {
        Ok(color) => tracing::trace!(kind = input.kind(), %color, "parsed color"),
        Err(e) => tracing::debug!(kind = input.kind(), error = %e, "rejected color input"),
    }
    parsed
}

/// Classify and decode a string in one step
pub fn parse_str(raw: &str) -> CanvasColorResult<CanonicalColor> {
    parse(&ColorInput::classify(raw))
}

fn parse_named(src: &str) -> CanvasColorResult<CanonicalColor> {
    let name = src.trim().to_ascii_lowercase();
    named_color(&name).ok_or_else(|| {
        CanvasColorError::invalid_format(
            src,
            (0, src.len()),
            format!("unknown color name `{}`", src.trim()),
        )
    })
}

fn parse_hex(src: &str) -> CanvasColorResult<CanonicalColor> {
    let lead = src.len() - src.trim_start().len();
    let trimmed = src.trim();
    let (digits, digits_at) = match trimmed.strip_prefix('#') {
        Some(rest) => (rest, lead + 1),
        None => (trimmed, lead),
    };

    if let Some(bad) = digits.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(CanvasColorError::invalid_format(
            src,
            (digits_at + bad.0, bad.1.len_utf8()),
            format!("`{}` is not a hex digit", bad.1),
        ));
    }

    let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).unwrap_or(0);
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);

    match digits.len() {
        3 => Ok(CanonicalColor::rgb(
            nibble(0) * 17,
            nibble(1) * 17,
            nibble(2) * 17,
        )),
        6 => Ok(CanonicalColor::rgb(byte(0), byte(2), byte(4))),
        n => Err(CanvasColorError::invalid_format(
            src,
            (digits_at, n),
            format!("expected 3 or 6 hex digits, found {}", n),
        )),
    }
}

fn parse_packed(n: u32) -> CanvasColorResult<CanonicalColor> {
    if n > 0xFF_FFFF {
        let src = n.to_string();
        let len = src.len();
        return Err(CanvasColorError::out_of_range(
            src,
            (0, len),
            "packed",
            format!("{:#x} exceeds 0xffffff", n),
        ));
    }
    Ok(CanonicalColor::from_packed(n))
}

/// An argument of a functional notation with its byte offset in the source
struct Arg<'a> {
    text: &'a str,
    at: usize,
}

fn parse_functional(src: &str) -> CanvasColorResult<CanonicalColor> {
    let whole = (0, src.len());
    let lead = src.len() - src.trim_start().len();
    let trimmed = src.trim();

    let (Some(open), true) = (trimmed.find('('), trimmed.ends_with(')')) else {
        return Err(CanvasColorError::invalid_format(
            src,
            whole,
            "unbalanced parentheses",
        ));
    };

    let name = trimmed[..open].trim().to_ascii_lowercase();
    let body_at = lead + open + 1;
    let body = &trimmed[open + 1..trimmed.len() - 1];

    let mut args = Vec::new();
    let mut offset = body_at;
    for piece in body.split(',') {
        let pad = piece.len() - piece.trim_start().len();
        args.push(Arg {
            text: piece.trim(),
            at: offset + pad,
        });
        offset += piece.len() + 1;
    }

    let expected = match name.as_str() {
        "rgb" | "hsl" => 3,
        "rgba" | "hsla" => 4,
        _ => {
            return Err(CanvasColorError::invalid_format(
                src,
                (lead, open),
                format!("unknown color function `{}`", name),
            ))
        }
    };
    if args.len() != expected {
        return Err(CanvasColorError::invalid_format(
            src,
            whole,
            format!("`{}` takes {} arguments, found {}", name, expected, args.len()),
        ));
    }

    let alpha = match args.get(3) {
        Some(arg) => {
            let a = number(src, arg)?;
            check_range(src, (arg.at, arg.text.len()), "a", a, 0.0, 1.0)?;
            a as f32
        }
        None => 1.0,
    };

    if name.starts_with("rgb") {
        let mut channels = [0u8; 3];
        for (slot, (arg, label)) in channels.iter_mut().zip(args.iter().zip(["r", "g", "b"])) {
            *slot = integer_channel(src, arg, label)?;
        }
        let [r, g, b] = channels;
        Ok(CanonicalColor::rgba(r, g, b, alpha))
    } else {
        let h = number(src, &args[0])?;
        check_range(src, (args[0].at, args[0].text.len()), "h", h, 0.0, 360.0)?;

        let mut sl = [0.0f64; 2];
        for (slot, (arg, label)) in sl.iter_mut().zip(args[1..3].iter().zip(["s", "l"])) {
            let value = percent(src, arg)?;
            check_range(src, (arg.at, arg.text.len()), label, value, 0.0, 100.0)?;
            *slot = value;
        }

        Ok(CanonicalColor::from_hsl(h, sl[0], sl[1]).with_alpha(alpha))
    }
}

fn number(src: &str, arg: &Arg<'_>) -> CanvasColorResult<f64> {
    arg.text
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            CanvasColorError::invalid_format(
                src,
                (arg.at, arg.text.len().max(1)),
                format!("`{}` is not a number", arg.text),
            )
        })
}

fn percent(src: &str, arg: &Arg<'_>) -> CanvasColorResult<f64> {
    let stripped = Arg {
        text: arg.text.strip_suffix('%').unwrap_or(arg.text).trim_end(),
        at: arg.at,
    };
    number(src, &stripped)
}

fn check_range(
    src: &str,
    span: (usize, usize),
    component: &str,
    value: f64,
    min: f64,
    max: f64,
) -> CanvasColorResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CanvasColorError::out_of_range(
            src,
            span,
            component,
            format!("{} is outside [{}, {}]", value, min, max),
        ))
    }
}

/// An 8-bit channel written as a plain decimal integer: digits with an
/// optional leading `-`, no exponent, sign `+` or fraction.
fn integer_channel(src: &str, arg: &Arg<'_>, component: &str) -> CanvasColorResult<u8> {
    let span = (arg.at, arg.text.len().max(1));
    let (negative, digits) = match arg.text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, arg.text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CanvasColorError::invalid_format(
            src,
            span,
            format!("`{}` must be an integer, found `{}`", component, arg.text),
        ));
    }

    let magnitude = digits.parse::<u64>().map_or(f64::MAX, |v| v as f64);
    let value = if negative { -magnitude } else { magnitude };
    check_range(src, span, component, value, 0.0, 255.0)?;
    Ok(value as u8)
}

/// Validate an 8-bit channel given as a float
fn channel(
    src: &str,
    span: (usize, usize),
    component: &str,
    value: f64,
) -> CanvasColorResult<u8> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(CanvasColorError::invalid_format(
            src,
            span,
            format!("`{}` must be an integer, found {}", component, value),
        ));
    }
    check_range(src, span, component, value, 0.0, 255.0)?;
    Ok(value as u8)
}

fn parse_object(
    input: &ColorInput,
    r: f64,
    g: f64,
    b: f64,
    a: Option<f64>,
) -> CanvasColorResult<CanonicalColor> {
    let src = input.to_string();
    let whole = (0, src.len());

    let r = channel(&src, whole, "r", r)?;
    let g = channel(&src, whole, "g", g)?;
    let b = channel(&src, whole, "b", b)?;
    let a = match a {
        Some(a) if !a.is_finite() => {
            return Err(CanvasColorError::invalid_format(
                src,
                whole,
                "`a` must be a finite number",
            ))
        }
        Some(a) => {
            check_range(&src, whole, "a", a, 0.0, 1.0)?;
            a as f32
        }
        None => 1.0,
    };
    Ok(CanonicalColor::rgba(r, g, b, a))
}

fn parse_tuple(input: &ColorInput, values: &[f64]) -> CanvasColorResult<CanonicalColor> {
    let src = input.to_string();
    let whole = (0, src.len());

    if !matches!(values.len(), 3 | 4) {
        return Err(CanvasColorError::invalid_format(
            src,
            whole,
            format!("expected 3 or 4 elements, found {}", values.len()),
        ));
    }

    let r = channel(&src, whole, "r", values[0])?;
    let g = channel(&src, whole, "g", values[1])?;
    let b = channel(&src, whole, "b", values[2])?;
    let a = match values.get(3).copied() {
        None => 1.0,
        Some(a) => tuple_alpha(&src, whole, a)?,
    };
    Ok(CanonicalColor::rgba(r, g, b, a))
}

/// A 4th element up to `1.0` is already normalized; above that it is an
/// 8-bit channel and is scaled down.
fn tuple_alpha(src: &str, span: (usize, usize), a: f64) -> CanvasColorResult<f32> {
    if !a.is_finite() {
        return Err(CanvasColorError::invalid_format(
            src,
            span,
            "`a` must be a finite number",
        ));
    }
    if a <= 1.0 {
        check_range(src, span, "a", a, 0.0, 1.0)?;
        return Ok(a as f32);
    }
    let a = channel(src, span, "a", a)?;
    Ok(f32::from(a) / 255.0)
}

/// Look up a CSS color keyword (lowercase)
pub fn named_color(name: &str) -> Option<CanonicalColor> {
    let rgb = CanonicalColor::rgb;
    let color = match name {
        "transparent" => return Some(CanonicalColor::rgba(0, 0, 0, 0.0)),
        "black" => rgb(0, 0, 0),
        "white" => rgb(255, 255, 255),
        "red" => rgb(255, 0, 0),
        "green" => rgb(0, 128, 0),
        "blue" => rgb(0, 0, 255),
        "yellow" => rgb(255, 255, 0),
        "cyan" | "aqua" => rgb(0, 255, 255),
        "magenta" | "fuchsia" => rgb(255, 0, 255),
        "aliceblue" => rgb(240, 248, 255),
        "antiquewhite" => rgb(250, 235, 215),
        "aquamarine" => rgb(127, 255, 212),
        "azure" => rgb(240, 255, 255),
        "beige" => rgb(245, 245, 220),
        "bisque" => rgb(255, 228, 196),
        "blanchedalmond" => rgb(255, 235, 205),
        "blueviolet" => rgb(138, 43, 226),
        "brown" => rgb(165, 42, 42),
        "burlywood" => rgb(222, 184, 135),
        "cadetblue" => rgb(95, 158, 160),
        "chartreuse" => rgb(127, 255, 0),
        "chocolate" => rgb(210, 105, 30),
        "coral" => rgb(255, 127, 80),
        "cornflowerblue" => rgb(100, 149, 237),
        "cornsilk" => rgb(255, 248, 220),
        "crimson" => rgb(220, 20, 60),
        "darkblue" => rgb(0, 0, 139),
        "darkcyan" => rgb(0, 139, 139),
        "darkgoldenrod" => rgb(184, 134, 11),
        "darkgray" | "darkgrey" => rgb(169, 169, 169),
        "darkgreen" => rgb(0, 100, 0),
        "darkkhaki" => rgb(189, 183, 107),
        "darkmagenta" => rgb(139, 0, 139),
        "darkolivegreen" => rgb(85, 107, 47),
        "darkorange" => rgb(255, 140, 0),
        "darkorchid" => rgb(153, 50, 204),
        "darkred" => rgb(139, 0, 0),
        "darksalmon" => rgb(233, 150, 122),
        "darkseagreen" => rgb(143, 188, 143),
        "darkslateblue" => rgb(72, 61, 139),
        "darkslategray" | "darkslategrey" => rgb(47, 79, 79),
        "darkturquoise" => rgb(0, 206, 209),
        "darkviolet" => rgb(148, 0, 211),
        "deeppink" => rgb(255, 20, 147),
        "deepskyblue" => rgb(0, 191, 255),
        "dimgray" | "dimgrey" => rgb(105, 105, 105),
        "dodgerblue" => rgb(30, 144, 255),
        "firebrick" => rgb(178, 34, 34),
        "floralwhite" => rgb(255, 250, 240),
        "forestgreen" => rgb(34, 139, 34),
        "gainsboro" => rgb(220, 220, 220),
        "ghostwhite" => rgb(248, 248, 255),
        "gold" => rgb(255, 215, 0),
        "goldenrod" => rgb(218, 165, 32),
        "gray" | "grey" => rgb(128, 128, 128),
        "greenyellow" => rgb(173, 255, 47),
        "honeydew" => rgb(240, 255, 240),
        "hotpink" => rgb(255, 105, 180),
        "indianred" => rgb(205, 92, 92),
        "indigo" => rgb(75, 0, 130),
        "ivory" => rgb(255, 255, 240),
        "khaki" => rgb(240, 230, 140),
        "lavender" => rgb(230, 230, 250),
        "lavenderblush" => rgb(255, 240, 245),
        "lawngreen" => rgb(124, 252, 0),
        "lemonchiffon" => rgb(255, 250, 205),
        "lightblue" => rgb(173, 216, 230),
        "lightcoral" => rgb(240, 128, 128),
        "lightcyan" => rgb(224, 255, 255),
        "lightgoldenrodyellow" => rgb(250, 250, 210),
        "lightgray" | "lightgrey" => rgb(211, 211, 211),
        "lightgreen" => rgb(144, 238, 144),
        "lightpink" => rgb(255, 182, 193),
        "lightsalmon" => rgb(255, 160, 122),
        "lightseagreen" => rgb(32, 178, 170),
        "lightskyblue" => rgb(135, 206, 250),
        "lightslategray" | "lightslategrey" => rgb(119, 136, 153),
        "lightsteelblue" => rgb(176, 196, 222),
        "lightyellow" => rgb(255, 255, 224),
        "lime" => rgb(0, 255, 0),
        "limegreen" => rgb(50, 205, 50),
        "linen" => rgb(250, 240, 230),
        "maroon" => rgb(128, 0, 0),
        "mediumaquamarine" => rgb(102, 205, 170),
        "mediumblue" => rgb(0, 0, 205),
        "mediumorchid" => rgb(186, 85, 211),
        "mediumpurple" => rgb(147, 112, 219),
        "mediumseagreen" => rgb(60, 179, 113),
        "mediumslateblue" => rgb(123, 104, 238),
        "mediumspringgreen" => rgb(0, 250, 154),
        "mediumturquoise" => rgb(72, 209, 204),
        "mediumvioletred" => rgb(199, 21, 133),
        "midnightblue" => rgb(25, 25, 112),
        "mintcream" => rgb(245, 255, 250),
        "mistyrose" => rgb(255, 228, 225),
        "moccasin" => rgb(255, 228, 181),
        "navajowhite" => rgb(255, 222, 173),
        "navy" => rgb(0, 0, 128),
        "oldlace" => rgb(253, 245, 230),
        "olive" => rgb(128, 128, 0),
        "olivedrab" => rgb(107, 142, 35),
        "orange" => rgb(255, 165, 0),
        "orangered" => rgb(255, 69, 0),
        "orchid" => rgb(218, 112, 214),
        "palegoldenrod" => rgb(238, 232, 170),
        "palegreen" => rgb(152, 251, 152),
        "paleturquoise" => rgb(175, 238, 238),
        "palevioletred" => rgb(219, 112, 147),
        "papayawhip" => rgb(255, 239, 213),
        "peachpuff" => rgb(255, 218, 185),
        "peru" => rgb(205, 133, 63),
        "pink" => rgb(255, 192, 203),
        "plum" => rgb(221, 160, 221),
        "powderblue" => rgb(176, 224, 230),
        "purple" => rgb(128, 0, 128),
        "rebeccapurple" => rgb(102, 51, 153),
        "rosybrown" => rgb(188, 143, 143),
        "royalblue" => rgb(65, 105, 225),
        "saddlebrown" => rgb(139, 69, 19),
        "salmon" => rgb(250, 128, 114),
        "sandybrown" => rgb(244, 164, 96),
        "seagreen" => rgb(46, 139, 87),
        "seashell" => rgb(255, 245, 238),
        "sienna" => rgb(160, 82, 45),
        "silver" => rgb(192, 192, 192),
        "skyblue" => rgb(135, 206, 235),
        "slateblue" => rgb(106, 90, 205),
        "slategray" | "slategrey" => rgb(112, 128, 144),
        "snow" => rgb(255, 250, 250),
        "springgreen" => rgb(0, 255, 127),
        "steelblue" => rgb(70, 130, 180),
        "tan" => rgb(210, 180, 140),
        "teal" => rgb(0, 128, 128),
        "thistle" => rgb(216, 191, 216),
        "tomato" => rgb(255, 99, 71),
        "turquoise" => rgb(64, 224, 208),
        "violet" => rgb(238, 130, 238),
        "wheat" => rgb(245, 222, 179),
        "whitesmoke" => rgb(245, 245, 245),
        "yellowgreen" => rgb(154, 205, 50),
        _ => return None,
    };
    Some(color)
}
