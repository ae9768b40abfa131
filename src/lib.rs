#![forbid(unsafe_code)]

//! # canvas-color
//!
//! A color normalization and conversion engine for canvas documents.
//!
//! ## Overview
//!
//! Colors arrive in many shapes and leave in one canonical model:
//!
//! - **Parsing**: CSS names, `#rgb`/`#rrggbb`, packed integers,
//!   `rgb()`/`rgba()`/`hsl()`/`hsla()` strings, `{r, g, b, a}` objects and
//!   `[r, g, b, a]` tuples
//! - **Formatting**: fifteen output tags, from `hex` and `css` to JSON-shaped
//!   objects and three ANSI terminal tiers
//! - **Accessibility**: WCAG luminance, contrast ratio and compliance level
//! - **Palette**: a read-only brand palette plus the legacy `"0"`..`"5"`
//!   index map used by older canvases
//!
//! ## Core Components
//!
//! - [`CanonicalColor`]: 8-bit RGB with a normalized alpha
//! - [`ColorInput`]: every accepted input shape, with explicit classification
//! - [`OutputFormat`] / [`FormattedColor`]: output tags and their values
//! - [`ColorEngine`]: configured engine with an optional parse cache
//! - [`CanvasColorError`]: diagnostics with a labelled source span
//!
//! ## Example Usage
//!
//! ```rust
//! use canvas_color::{get_terminal_color, normalize_color, validate_canvas_color};
//!
//! fn main() -> miette::Result<()> {
//!     assert_eq!(normalize_color("rgb(255, 0, 0)")?, "#ff0000");
//!     assert_eq!(normalize_color(0x00ff00u32)?, "#00ff00");
//!
//!     // Legacy index 3 is the palette green
//!     assert_eq!(get_terminal_color("3", "ansi-256")?, "\x1b[38;5;41m");
//!
//!     // Low contrast against white is a warning, not an error
//!     let report = validate_canvas_color("#eab308", "node-1")?;
//!     assert_eq!(report.warnings.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `colors`: Canonical model and HSL conversion
//! - `parse`: Input classification and decoding
//! - `format`: Output encodings
//! - `terminal`: ANSI quantization and terminal tier detection
//! - `accessibility`: WCAG metrics and warnings
//! - `palette`: Brand palette and legacy index map
//! - `cache`: Parse memoization
//! - `config`: Engine settings
//! - `engine`: The configured engine behind the free functions
//! - `canvas`: Batch conversion and rendering of canvas documents
//! - `error`: Error types and handling
//!
//! ## Error Handling
//!
//! Fallible operations return [`CanvasColorResult`]. Every
//! [`CanvasColorError`] is a `miette` diagnostic pointing at the offending
//! token, so `?` lifts it into a `miette::Report` with a rendered snippet.

/// Re-exports of core components
pub use accessibility::{ValidationReport, WcagLevel, Warning, WarningKind};
pub use cache::CacheStats;
pub use canvas::{convert_all_canvas_colors, render_colored_node, Canvas, CanvasNode};
pub use colors::{BrandColorize, CanonicalColor};
pub use config::EngineConfig;
pub use engine::{ColorEngine, ColorMetadata, ColorRef};
pub use error::{CanvasColorError, CanvasColorResult};
pub use format::{FormattedColor, OutputFormat};
pub use palette::{CANVAS_BRAND_COLORS, LEGACY_COLOR_MAP};
pub use parse::ColorInput;
pub use terminal::{ColorTier, TerminalSupport};

/// WCAG contrast analysis
pub mod accessibility;
/// Parse memoization
pub mod cache;
/// Canvas documents
pub mod canvas;
/// Canonical color model
pub mod colors;
/// Engine settings
pub mod config;
/// Configured engine
pub mod engine;
/// Error types and handling
pub mod error;
/// Output encodings
pub mod format;
/// Brand palette
pub mod palette;
/// Input decoding
pub mod parse;
/// Terminal capability mapping
pub mod terminal;

use engine::default_engine;

/// Canonical `#rrggbb` form of any accepted input
pub fn normalize_color(input: impl Into<ColorInput>) -> CanvasColorResult<String> {
    default_engine().normalize_color(input)
}

/// Normalize `input` and report low contrast in `context_id` as warnings
pub fn validate_canvas_color(
    input: impl Into<ColorInput>,
    context_id: &str,
) -> CanvasColorResult<ValidationReport> {
    default_engine().validate_canvas_color(input, context_id)
}

/// Serialize a color reference (node, legacy index or color string) for a
/// format tag. Unknown tags give an empty string.
pub fn get_terminal_color(
    color_ref: impl Into<ColorRef>,
    format: &str,
) -> CanvasColorResult<String> {
    default_engine().get_terminal_color(color_ref, format)
}

/// Normalized value, contrast and terminal support of `hex` in `context_id`
pub fn create_color_metadata(hex: &str, context_id: &str) -> CanvasColorResult<ColorMetadata> {
    default_engine().create_color_metadata(hex, context_id)
}
