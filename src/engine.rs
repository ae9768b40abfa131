//! The color engine: parse, normalize, validate and describe colors
//!
//! [`ColorEngine`] owns the resolved configuration and the optional parse
//! cache. The crate-root functions delegate to a process-wide engine built
//! with [`EngineConfig::default`].

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, sync::LazyLock};

use crate::{
    accessibility::{ContrastReport, ValidationReport, WcagLevel, Warning, WarningKind},
    cache::{CacheStats, ColorCache},
    colors::CanonicalColor,
    config::EngineConfig,
    error::{CanvasColorError, CanvasColorResult},
    format::{format, FormattedColor, OutputFormat},
    palette::resolve_legacy,
    parse::{parse, ColorInput},
    terminal::{to_ansi256, TerminalSupport},
};

static DEFAULT_ENGINE: LazyLock<ColorEngine> = LazyLock::new(ColorEngine::default);

/// The engine behind the crate-root functions
pub fn default_engine() -> &'static ColorEngine {
    &DEFAULT_ENGINE
}

/// A color reference as it appears in canvas data: either a node-like
/// object carrying a `color` field or a bare string. The string may be a
/// legacy index (`"0"`..`"5"`) or any parseable color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorRef {
    Node { color: String },
    Plain(String),
}

impl ColorRef {
    pub fn as_str(&self) -> &str {
        match self {
            ColorRef::Node { color } | ColorRef::Plain(color) => color,
        }
    }
}

impl From<&str> for ColorRef {
    fn from(color: &str) -> Self {
        ColorRef::Plain(color.to_string())
    }
}

impl From<String> for ColorRef {
    fn from(color: String) -> Self {
        ColorRef::Plain(color)
    }
}

impl fmt::Display for ColorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the engine knows about one color in one context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorMetadata {
    pub input: String,
    pub normalized: String,
    pub context_id: String,
    pub contrast_ratio: f64,
    pub is_accessible: bool,
    pub wcag_level: WcagLevel,
    pub terminal_support: TerminalSupport,
}

#[derive(Debug)]
pub struct ColorEngine {
    config: EngineConfig,
    background: CanonicalColor,
    context_backgrounds: HashMap<String, CanonicalColor>,
    cache: Option<ColorCache>,
}

impl Default for ColorEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            background: CanonicalColor::rgb(255, 255, 255),
            context_backgrounds: HashMap::new(),
            cache: config.memoize.then(ColorCache::new),
            config,
        }
    }
}

impl ColorEngine {
    /// Build an engine, parsing every configured background up front
    pub fn new(config: EngineConfig) -> CanvasColorResult<Self> {
        let background = crate::parse::parse_str(&config.background)?;
        let context_backgrounds = config
            .context_backgrounds
            .iter()
            .map(|(id, raw)| -> CanvasColorResult<(String, CanonicalColor)> {
                Ok((id.clone(), crate::parse::parse_str(raw)?))
            })
            .collect::<CanvasColorResult<HashMap<_, _>>>()?;

        tracing::debug!(
            background = %background.to_hex(),
            contexts = context_backgrounds.len(),
            memoize = config.memoize,
            "color engine configured"
        );

        Ok(Self {
            background,
            context_backgrounds,
            cache: config.memoize.then(ColorCache::new),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Counters of the parse cache, `None` when memoization is off
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ColorCache::stats)
    }

    /// Reference background for `context_id`
    pub fn background_for(&self, context_id: &str) -> CanonicalColor {
        self.context_backgrounds
            .get(context_id)
            .copied()
            .unwrap_or(self.background)
    }

    /// Parse any input, going through the cache for textual inputs
    pub fn parse(&self, input: impl Into<ColorInput>) -> CanvasColorResult<CanonicalColor> {
        let input = input.into();
        match (&self.cache, input.cache_key()) {
            (Some(cache), Some(key)) => cache.get_or_try_insert_with(key, || parse(&input)),
            _ => parse(&input),
        }
    }

    /// Parse a color reference, resolving legacy indices first
    pub fn resolve(&self, raw: &str) -> CanvasColorResult<CanonicalColor> {
        match resolve_legacy(raw) {
            Some(hex) => {
                tracing::trace!(key = raw.trim(), hex, "resolved legacy color index");
                self.parse(hex)
            }
            None => self.parse(raw),
        }
    }

    /// Canonical lowercase `#rrggbb` form of any input
    pub fn normalize_color(&self, input: impl Into<ColorInput>) -> CanvasColorResult<String> {
        Ok(self.parse(input)?.to_hex())
    }

    /// Normalize `input` and collect accessibility (and optionally terminal)
    /// warnings for it. Only parse failures are errors.
    pub fn validate_canvas_color(
        &self,
        input: impl Into<ColorInput>,
        context_id: &str,
    ) -> CanvasColorResult<ValidationReport> {
        let color = self.parse(input)?;
        let mut warnings = Vec::new();

        let contrast = ContrastReport::analyze(&color, &self.background_for(context_id));
        warnings.extend(contrast.warning(context_id, &color));
        warnings.extend(self.terminal_advisory(&color, context_id));

        Ok(ValidationReport {
            normalized_color: color.to_hex(),
            warnings,
        })
    }

    fn terminal_advisory(&self, color: &CanonicalColor, context_id: &str) -> Option<Warning> {
        if !self.config.terminal_advisories {
            return None;
        }
        let support = TerminalSupport::for_color(color, self.config.support_epsilon);
        if support.ansi256 {
            return None;
        }
        tracing::warn!(
            context_id,
            color = %color.to_hex(),
            "color is approximated in 256-color terminals"
        );
        Some(Warning::new(
            WarningKind::TerminalSupport,
            context_id,
            format!(
                "{} is approximated by ansi-256 index {} in 256-color terminals",
                color.to_hex(),
                to_ansi256(color)
            ),
        ))
    }

    /// Serialize `color` for a format tag. Unknown tags give `Ok(None)`, or
    /// an error when strict formats are configured.
    pub fn format(
        &self,
        color: &CanonicalColor,
        tag: &str,
    ) -> CanvasColorResult<Option<FormattedColor>> {
        match OutputFormat::from_tag(tag) {
            Some(output) => Ok(Some(format(color, output))),
            None if self.config.strict_formats => Err(CanvasColorError::unsupported_format(tag)),
            None => {
                tracing::debug!(tag, "unsupported output format");
                Ok(None)
            }
        }
    }

    /// The string form of `color_ref` in the given format; empty for an
    /// unknown tag unless strict formats are configured.
    pub fn get_terminal_color(
        &self,
        color_ref: impl Into<ColorRef>,
        tag: &str,
    ) -> CanvasColorResult<String> {
        let color_ref = color_ref.into();
        let color = self.resolve(color_ref.as_str())?;
        Ok(self
            .format(&color, tag)?
            .map(|formatted| formatted.to_string())
            .unwrap_or_default())
    }

    pub fn create_color_metadata(
        &self,
        hex: &str,
        context_id: &str,
    ) -> CanvasColorResult<ColorMetadata> {
        let color = self.parse(hex)?;
        let contrast = ContrastReport::analyze(&color, &self.background_for(context_id));

        Ok(ColorMetadata {
            input: hex.to_string(),
            normalized: color.to_hex(),
            context_id: context_id.to_string(),
            contrast_ratio: contrast.ratio,
            is_accessible: contrast.is_accessible(),
            wcag_level: contrast.level,
            terminal_support: TerminalSupport::for_color(&color, self.config.support_epsilon),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::status;
    use pretty_assertions::assert_eq as pretty_assert_eq;
    use test_case::test_case;

    fn dark_sidebar_engine() -> ColorEngine {
        ColorEngine::new(EngineConfig::new().with_context_background("sidebar", "#1e293b")).unwrap()
    }

    #[test]
    fn test_invalid_background_is_rejected() {
        let err = ColorEngine::new(EngineConfig::new().with_background("not-a-color")).unwrap_err();
        assert!(err.is_invalid_format());

        let err = ColorEngine::new(
            EngineConfig::new().with_context_background("panel", "rgb(0, 0, 300)"),
        )
        .unwrap_err();
        assert!(err.is_out_of_range());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let engine = ColorEngine::default();
        for input in ["RED", "#F00", "rgb(255, 0, 0)", "hsl(0, 100%, 50%)", "rebeccapurple"] {
            let once = engine.normalize_color(input).unwrap();
            pretty_assert_eq!(engine.normalize_color(once.as_str()).unwrap(), once);
        }
    }

    #[test]
    fn test_equivalent_inputs_normalize_equal() {
        let engine = ColorEngine::default();
        let inputs: Vec<ColorInput> = vec![
            "red".into(),
            "#f00".into(),
            "#FF0000".into(),
            0xFF0000u32.into(),
            "rgb(255,0,0)".into(),
            "hsl(0,100%,50%)".into(),
            (255u8, 0u8, 0u8).into(),
            [255u8, 0, 0].into(),
        ];
        for input in inputs {
            pretty_assert_eq!(engine.normalize_color(input).unwrap(), "#ff0000");
        }
    }

    #[test]
    fn test_low_contrast_is_a_warning() {
        let engine = ColorEngine::default();

        let report = engine.validate_canvas_color("#eab308", "node-7").unwrap();
        pretty_assert_eq!(report.normalized_color, "#eab308");
        pretty_assert_eq!(report.warnings.len(), 1);
        pretty_assert_eq!(report.warnings[0].kind, WarningKind::Accessibility);
        pretty_assert_eq!(report.warnings[0].context_id, "node-7");

        let report = engine.validate_canvas_color("black", "node-8").unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_parse_failure_is_an_error() {
        let engine = ColorEngine::default();
        assert!(engine
            .validate_canvas_color("not-a-color", "n")
            .unwrap_err()
            .is_invalid_format());
        assert!(engine
            .validate_canvas_color("rgb(300,0,0)", "n")
            .unwrap_err()
            .is_out_of_range());
    }

    #[test]
    fn test_context_background_override() {
        let engine = dark_sidebar_engine();
        pretty_assert_eq!(engine.background_for("sidebar"), CanonicalColor::rgb(30, 41, 59));
        pretty_assert_eq!(engine.background_for("main"), CanonicalColor::rgb(255, 255, 255));

        let on_white = engine.create_color_metadata("#eab308", "main").unwrap();
        let on_dark = engine.create_color_metadata("#eab308", "sidebar").unwrap();
        assert!(!on_white.is_accessible);
        pretty_assert_eq!(on_white.wcag_level, WcagLevel::Fail);
        assert!(on_dark.is_accessible);
        pretty_assert_eq!(on_dark.wcag_level, WcagLevel::Aaa);

        assert!(engine
            .validate_canvas_color("#eab308", "sidebar")
            .unwrap()
            .is_clean());
    }

    #[test]
    fn test_terminal_advisories() {
        let engine =
            ColorEngine::new(EngineConfig::new().with_terminal_advisories(true)).unwrap();

        let report = engine.validate_canvas_color("#000000", "n").unwrap();
        assert!(report.is_clean());

        let report = engine.validate_canvas_color("#1e293b", "n").unwrap();
        pretty_assert_eq!(report.warnings.len(), 1);
        pretty_assert_eq!(report.warnings[0].kind, WarningKind::TerminalSupport);

        let quiet = ColorEngine::default();
        assert!(quiet.validate_canvas_color("#1e293b", "n").unwrap().is_clean());
    }

    #[test]
    fn test_metadata() {
        let engine = ColorEngine::default();
        let metadata = engine.create_color_metadata("#FF0000", "node-1").unwrap();

        pretty_assert_eq!(metadata.input, "#FF0000");
        pretty_assert_eq!(metadata.normalized, "#ff0000");
        pretty_assert_eq!(metadata.context_id, "node-1");
        assert!((metadata.contrast_ratio - 3.998).abs() < 1e-3);
        assert!(!metadata.is_accessible);
        pretty_assert_eq!(metadata.wcag_level, WcagLevel::AaLargeText);
        pretty_assert_eq!(
            metadata.terminal_support,
            TerminalSupport {
                ansi16: true,
                ansi256: true,
                ansi16m: true
            }
        );

        let black = engine.create_color_metadata("#000000", "node-2").unwrap();
        pretty_assert_eq!(black.contrast_ratio, 21.0);
        assert!(black.is_accessible);
    }

    #[test]
    fn test_metadata_support_boundary() {
        let engine = ColorEngine::default();
        let metadata = engine.create_color_metadata("#010000", "node-1").unwrap();
        pretty_assert_eq!(
            metadata.terminal_support,
            TerminalSupport {
                ansi16: false,
                ansi256: false,
                ansi16m: true
            }
        );
    }

    #[test]
    fn test_metadata_serializes() {
        let metadata = ColorEngine::default()
            .create_color_metadata("#000000", "n")
            .unwrap();
        let json = serde_json::to_value(&metadata).unwrap();
        pretty_assert_eq!(json["normalized"], "#000000");
        pretty_assert_eq!(json["wcag_level"], "AAA");
        pretty_assert_eq!(json["terminal_support"]["ansi16m"], true);
    }

    #[test_case(ColorRef::from("3"), "hex" => "#22c55e" ; "legacy key")]
    #[test_case(ColorRef::from(" 0 "), "hex" => "#ef4444" ; "padded legacy key")]
    #[test_case(ColorRef::Node { color: "5".into() }, "rgb" => "rgb(139, 92, 246)"
        ; "node with legacy key")]
    #[test_case(ColorRef::Node { color: "red".into() }, "ansi-256" => "\u{1b}[38;5;196m"
        ; "node with named color")]
    #[test_case(ColorRef::from("#00ff00"), "ansi" => "\u{1b}[38;2;0;255;0m" ; "plain hex")]
    #[test_case(ColorRef::from("#00ff00"), "[rgb]" => "[0,255,0]" ; "plain hex as array")]
    #[test_case(ColorRef::from("red"), "ansi-8" => "" ; "unknown format")]
    fn test_get_terminal_color(color_ref: ColorRef, tag: &str) -> String {
        ColorEngine::default().get_terminal_color(color_ref, tag).unwrap()
    }

    #[test]
    fn test_strict_formats() {
        let engine = ColorEngine::new(EngineConfig::new().with_strict_formats(true)).unwrap();
        let err = engine.get_terminal_color("red", "ansi-8").unwrap_err();
        assert!(matches!(err, CanvasColorError::UnsupportedOutputFormat { .. }));
        pretty_assert_eq!(engine.get_terminal_color("red", "hex").unwrap(), "#ff0000");
    }

    #[test]
    fn test_unresolvable_reference_is_an_error() {
        let engine = ColorEngine::default();
        assert!(engine.get_terminal_color("6", "hex").unwrap_err().is_invalid_format());
    }

    #[test]
    fn test_memoization() {
        let engine = ColorEngine::default();
        engine.normalize_color("red").unwrap();
        engine.normalize_color("  red ").unwrap();
        engine.normalize_color([1u8, 2, 3]).unwrap();
        let _ = engine.normalize_color("bogus");

        let stats = engine.cache_stats().unwrap();
        pretty_assert_eq!(stats.hits, 1);
        pretty_assert_eq!(stats.misses, 2);
        pretty_assert_eq!(stats.entries, 1);

        let uncached = ColorEngine::new(EngineConfig::new().with_memoize(false)).unwrap();
        uncached.normalize_color("red").unwrap();
        pretty_assert_eq!(uncached.cache_stats(), None);
    }

    #[test]
    fn test_palette_colors_normalize_to_their_hex() {
        let engine = ColorEngine::default();
        pretty_assert_eq!(
            engine.normalize_color(status::ACTIVE).unwrap(),
            status::ACTIVE.to_hex()
        );
    }
}
