//! WCAG luminance and contrast analysis.
//!
//! Nothing in here fails: low contrast is reported as a [`Warning`], never as
//! an error.

use serde::Serialize;
use std::fmt::{self, Display};

use crate::colors::CanonicalColor;

/// Minimum ratio for normal text (AA)
pub const AA_NORMAL_TEXT: f64 = 4.5;
/// Minimum ratio for large text (AA) and the warning threshold
pub const AA_LARGE_TEXT: f64 = 3.0;
/// Minimum ratio for normal text (AAA)
pub const AAA_NORMAL_TEXT: f64 = 7.0;

/// Relative luminance of `color` in `[0, 1]`
pub fn relative_luminance(color: &CanonicalColor) -> f64 {
    let linear = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    let (r, g, b) = color.rgb_components();
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Contrast between two luminances, always `>= 1.0`
pub fn contrast_ratio(l1: f64, l2: f64) -> f64 {
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Contrast between two colors
pub fn contrast_between(fg: &CanonicalColor, bg: &CanonicalColor) -> f64 {
    contrast_ratio(relative_luminance(fg), relative_luminance(bg))
}

/// Whether `ratio` meets AA for normal text
pub fn is_accessible(ratio: f64) -> bool {
    ratio >= AA_NORMAL_TEXT
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WcagLevel {
    #[serde(rename = "fail")]
    Fail,
    #[serde(rename = "AA-large")]
    AaLargeText,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AAA")]
    Aaa,
}

impl WcagLevel {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= AAA_NORMAL_TEXT {
            WcagLevel::Aaa
        } else if ratio >= AA_NORMAL_TEXT {
            WcagLevel::Aa
        } else if ratio >= AA_LARGE_TEXT {
            WcagLevel::AaLargeText
        } else {
            WcagLevel::Fail
        }
    }
}

impl Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WcagLevel::Fail => "fail",
            WcagLevel::AaLargeText => "AA-large",
            WcagLevel::Aa => "AA",
            WcagLevel::Aaa => "AAA",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    Accessibility,
    TerminalSupport,
    /// A stored color that could not be parsed, reported by batch conversion
    InvalidColor,
}

/// A soft finding attached to an otherwise successful result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub context_id: String,
    pub message: String,
}

impl Warning {
    pub fn new(
        kind: WarningKind,
        context_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            context_id: context_id.into(),
            message: message.into(),
        }
    }
}

impl Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.context_id, self.message)
    }
}

/// A normalized color with every warning raised while checking it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub normalized_color: String,
    pub warnings: Vec<Warning>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Result of checking a color against a background
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContrastReport {
    pub ratio: f64,
    pub level: WcagLevel,
}

impl ContrastReport {
    pub fn analyze(color: &CanonicalColor, background: &CanonicalColor) -> Self {
        let ratio = contrast_between(color, background);
        Self {
            ratio,
            level: WcagLevel::from_ratio(ratio),
        }
    }

    pub fn is_accessible(&self) -> bool {
        is_accessible(self.ratio)
    }

    /// An accessibility warning when the ratio is below the large-text minimum
    pub fn warning(&self, context_id: &str, color: &CanonicalColor) -> Option<Warning> {
        if self.level != WcagLevel::Fail {
            return None;
        }
        let warning = Warning::new(
            WarningKind::Accessibility,
            context_id,
            format!(
                "{} has a contrast ratio of {:.2}:1, below the {}:1 minimum",
                color.to_hex(),
                self.ratio,
                AA_LARGE_TEXT
            ),
        );
        tracing::warn!(context_id, ratio = self.ratio, "low contrast color");
        Some(warning)
    }
}
