//! Engine configuration

use serde::Deserialize;
use std::collections::HashMap;

/// Default reference background for contrast checks
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Default distance under which a quantized terminal color counts as supported
pub const DEFAULT_SUPPORT_EPSILON: f64 = 1.0;

/// Settings of a [`ColorEngine`](crate::ColorEngine).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use canvas_color::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "strict_formats": true }"#).unwrap();
/// assert!(config.strict_formats);
/// assert_eq!(config.background, "#ffffff");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Background used for contrast when a context has no override
    pub background: String,
    /// Per-context background overrides, keyed by context id
    pub context_backgrounds: HashMap<String, String>,
    /// Turn unknown output format tags into errors instead of empty output
    pub strict_formats: bool,
    /// A terminal tier supports a color when its quantized color is strictly
    /// closer than this
    pub support_epsilon: f64,
    /// Memoize string parses
    pub memoize: bool,
    /// Add a warning when a color does not survive 256-color quantization
    pub terminal_advisories: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_string(),
            context_backgrounds: HashMap::new(),
            strict_formats: false,
            support_epsilon: DEFAULT_SUPPORT_EPSILON,
            memoize: true,
            terminal_advisories: false,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    pub fn with_context_background(
        mut self,
        context_id: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        self.context_backgrounds
            .insert(context_id.into(), background.into());
        self
    }

    pub fn with_strict_formats(mut self, strict: bool) -> Self {
        self.strict_formats = strict;
        self
    }

    pub fn with_support_epsilon(mut self, epsilon: f64) -> Self {
        self.support_epsilon = epsilon;
        self
    }

    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn with_terminal_advisories(mut self, enabled: bool) -> Self {
        self.terminal_advisories = enabled;
        self
    }
}
