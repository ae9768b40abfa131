//! JSON canvas documents
//!
//! A minimal [`serde`] model of a canvas file: nodes and edges keep every
//! field they were loaded with, only `color` (and the label text used for
//! rendering) is interpreted here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    accessibility::{Warning, WarningKind},
    engine::{default_engine, ColorEngine},
    error::CanvasColorResult,
    terminal::ColorTier,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    #[serde(default)]
    pub nodes: Vec<CanvasNode>,
    #[serde(default)]
    pub edges: Vec<CanvasEdge>,
}

impl Canvas {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanvasNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Text shown for the node: its label, else its text, else its id
    pub fn display_text(&self) -> &str {
        self.label
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outcome of rewriting the colors of a canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionReport {
    /// Colors rewritten to a different string
    pub converted: usize,
    /// Colors already in canonical form
    pub unchanged: usize,
    /// One entry per color that could not be parsed
    pub warnings: Vec<Warning>,
}

/// Rewrite every node and edge color of `canvas` to `#rrggbb`
pub fn convert_all_canvas_colors(canvas: &mut Canvas) -> ConversionReport {
    default_engine().convert_canvas(canvas)
}

/// Wrap the node's text in the escape sequence for its color at `tier`
pub fn render_colored_node(node: &CanvasNode, tier: ColorTier) -> CanvasColorResult<String> {
    default_engine().render_node(node, tier)
}

impl ColorEngine {
    /// Canonicalize every color in `canvas` in place. Legacy indices are
    /// resolved; colors that fail to parse are kept and reported.
    pub fn convert_canvas(&self, canvas: &mut Canvas) -> ConversionReport {
        let mut report = ConversionReport::default();

        let slots = canvas
            .nodes
            .iter_mut()
            .map(|node| (node.id.as_str(), &mut node.color))
            .chain(
                canvas
                    .edges
                    .iter_mut()
                    .map(|edge| (edge.id.as_str(), &mut edge.color)),
            );

        for (id, slot) in slots {
            let Some(raw) = slot.as_mut() else {
                continue;
            };
            match self.resolve(raw) {
                Ok(color) => {
                    let hex = color.to_hex();
                    if *raw == hex {
                        report.unchanged += 1;
                    } else {
                        tracing::debug!(id, from = %raw, to = %hex, "converted canvas color");
                        *raw = hex;
                        report.converted += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(id, color = %raw, error = %e, "left canvas color unconverted");
                    report.warnings.push(Warning::new(
                        WarningKind::InvalidColor,
                        id,
                        format!("`{}` kept as is: {}", raw, e),
                    ));
                }
            }
        }

        report
    }

    /// Engine-bound form of [`render_colored_node`]
    pub fn render_node(&self, node: &CanvasNode, tier: ColorTier) -> CanvasColorResult<String> {
        let text = node.display_text();
        match node.color.as_deref() {
            Some(raw) if tier.output_format().is_some() => {
                Ok(tier.paint(text, &self.resolve(raw)?))
            }
            _ => Ok(text.to_string()),
        }
    }
}
