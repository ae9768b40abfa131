//! Brand palette registry.
//!
//! Semantic colors are declared as constants in nested modules, and exposed
//! as a read-only string-keyed tree through [`CANVAS_BRAND_COLORS`]. The six
//! legacy canvas presets live in [`LEGACY_COLOR_MAP`].

use serde::Serialize;
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    sync::LazyLock,
};

use crate::colors::CanonicalColor;

/// Core brand identity
pub mod brand {
    use super::CanonicalColor;

    pub const PRIMARY: CanonicalColor = CanonicalColor::rgb(59, 130, 246); // #3B82F6
    pub const SECONDARY: CanonicalColor = CanonicalColor::rgb(139, 92, 246); // #8B5CF6
    pub const ACCENT: CanonicalColor = CanonicalColor::rgb(236, 72, 153); // #EC4899
    pub const NEUTRAL: CanonicalColor = CanonicalColor::rgb(100, 116, 139); // #64748B
    pub const DARK: CanonicalColor = CanonicalColor::rgb(30, 41, 59); // #1E293B
    pub const LIGHT: CanonicalColor = CanonicalColor::rgb(248, 250, 252); // #F8FAFC
}

/// Workflow status of a node
pub mod status {
    use super::CanonicalColor;

    pub const ACTIVE: CanonicalColor = CanonicalColor::rgb(34, 197, 94); // #22C55E
    pub const INACTIVE: CanonicalColor = CanonicalColor::rgb(107, 114, 128); // #6B7280
    pub const PENDING: CanonicalColor = CanonicalColor::rgb(234, 179, 8); // #EAB308
    pub const BLOCKED: CanonicalColor = CanonicalColor::rgb(239, 68, 68); // #EF4444
    pub const COMPLETED: CanonicalColor = super::brand::PRIMARY;
    pub const ARCHIVED: CanonicalColor = CanonicalColor::rgb(156, 163, 175); // #9CA3AF
}

/// Knowledge domains
pub mod domain {
    use super::CanonicalColor;

    pub const SYSTEMS: CanonicalColor = CanonicalColor::rgb(6, 182, 212); // #06B6D4
    pub const SECURITY: CanonicalColor = CanonicalColor::rgb(220, 38, 38); // #DC2626
    pub const DATA: CanonicalColor = super::brand::SECONDARY;
    pub const INFRASTRUCTURE: CanonicalColor = CanonicalColor::rgb(249, 115, 22); // #F97316
    pub const DOCUMENTATION: CanonicalColor = CanonicalColor::rgb(20, 184, 166); // #14B8A6
    pub const RESEARCH: CanonicalColor = CanonicalColor::rgb(168, 85, 247); // #A855F7
}

/// Task priority
pub mod priority {
    use super::CanonicalColor;

    pub const CRITICAL: CanonicalColor = super::domain::SECURITY;
    pub const HIGH: CanonicalColor = super::domain::INFRASTRUCTURE;
    pub const MEDIUM: CanonicalColor = super::status::PENDING;
    pub const LOW: CanonicalColor = super::status::ACTIVE;
    pub const NONE: CanonicalColor = CanonicalColor::rgb(148, 163, 184); // #94A3B8
}

/// Service and vault health
pub mod health {
    use super::CanonicalColor;

    pub const HEALTHY: CanonicalColor = super::status::ACTIVE;
    pub const WARNING: CanonicalColor = super::status::PENDING;
    pub const CRITICAL: CanonicalColor = super::status::BLOCKED;
    pub const UNKNOWN: CanonicalColor = super::status::INACTIVE;
}

/// Top-level palette categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteCategory {
    Status,
    Domain,
    Priority,
    Health,
    Brand,
}

impl PaletteCategory {
    pub const ALL: [PaletteCategory; 5] = [
        PaletteCategory::Status,
        PaletteCategory::Domain,
        PaletteCategory::Priority,
        PaletteCategory::Health,
        PaletteCategory::Brand,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaletteCategory::Status => "status",
            PaletteCategory::Domain => "domain",
            PaletteCategory::Priority => "priority",
            PaletteCategory::Health => "health",
            PaletteCategory::Brand => "brand",
        }
    }
}

impl Display for PaletteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only tree of `category -> key -> #rrggbb`
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct BrandPalette {
    categories: BTreeMap<PaletteCategory, BTreeMap<&'static str, String>>,
}

impl BrandPalette {
    fn build() -> Self {
        let entries: [(PaletteCategory, &[(&'static str, CanonicalColor)]); 5] = [
            (
                PaletteCategory::Status,
                &[
                    ("active", status::ACTIVE),
                    ("inactive", status::INACTIVE),
                    ("pending", status::PENDING),
                    ("blocked", status::BLOCKED),
                    ("completed", status::COMPLETED),
                    ("archived", status::ARCHIVED),
                ],
            ),
            (
                PaletteCategory::Domain,
                &[
                    ("systems", domain::SYSTEMS),
                    ("security", domain::SECURITY),
                    ("data", domain::DATA),
                    ("infrastructure", domain::INFRASTRUCTURE),
                    ("documentation", domain::DOCUMENTATION),
                    ("research", domain::RESEARCH),
                ],
            ),
            (
                PaletteCategory::Priority,
                &[
                    ("critical", priority::CRITICAL),
                    ("high", priority::HIGH),
                    ("medium", priority::MEDIUM),
                    ("low", priority::LOW),
                    ("none", priority::NONE),
                ],
            ),
            (
                PaletteCategory::Health,
                &[
                    ("healthy", health::HEALTHY),
                    ("warning", health::WARNING),
                    ("critical", health::CRITICAL),
                    ("unknown", health::UNKNOWN),
                ],
            ),
            (
                PaletteCategory::Brand,
                &[
                    ("primary", brand::PRIMARY),
                    ("secondary", brand::SECONDARY),
                    ("accent", brand::ACCENT),
                    ("neutral", brand::NEUTRAL),
                    ("dark", brand::DARK),
                    ("light", brand::LIGHT),
                ],
            ),
        ];

        let categories = entries
            .into_iter()
            .map(|(category, colors)| {
                let keyed = colors
                    .iter()
                    .map(|(key, color)| (*key, color.to_hex()))
                    .collect();
                (category, keyed)
            })
            .collect();

        Self { categories }
    }

    /// All keys of a category
    pub fn category(&self, category: PaletteCategory) -> Option<&BTreeMap<&'static str, String>> {
        self.categories.get(&category)
    }

    /// Hex value of `category.key`
    pub fn get(&self, category: PaletteCategory, key: &str) -> Option<&str> {
        self.categories
            .get(&category)
            .and_then(|colors| colors.get(key))
            .map(String::as_str)
    }

    /// Same as [`BrandPalette::get`], decoded into a canonical color
    pub fn color(&self, category: PaletteCategory, key: &str) -> Option<CanonicalColor> {
        let hex = self.get(category, key)?;
        u32::from_str_radix(hex.trim_start_matches('#'), 16)
            .ok()
            .map(CanonicalColor::from_packed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PaletteCategory, &'static str, &str)> + '_ {
        self.categories.iter().flat_map(|(category, colors)| {
            colors
                .iter()
                .map(move |(key, hex)| (*category, *key, hex.as_str()))
        })
    }

    pub fn contains_hex(&self, hex: &str) -> bool {
        let hex = hex.to_ascii_lowercase();
        self.iter().any(|(_, _, value)| value == hex)
    }
}

/// Six-preset mapping kept for canvases written before the named palette
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct LegacyColorMap {
    entries: BTreeMap<&'static str, String>,
}

impl LegacyColorMap {
    fn build() -> Self {
        let presets: [(&'static str, CanonicalColor); 6] = [
            ("0", health::CRITICAL),
            ("1", domain::INFRASTRUCTURE),
            ("2", status::PENDING),
            ("3", status::ACTIVE),
            ("4", domain::SYSTEMS),
            ("5", brand::SECONDARY),
        ];

        Self {
            entries: presets
                .into_iter()
                .map(|(key, color)| (key, color.to_hex()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.entries.iter().map(|(key, hex)| (*key, hex.as_str()))
    }
}

pub static CANVAS_BRAND_COLORS: LazyLock<BrandPalette> = LazyLock::new(BrandPalette::build);

pub static LEGACY_COLOR_MAP: LazyLock<LegacyColorMap> = LazyLock::new(LegacyColorMap::build);

/// Resolve a legacy preset key (`"0"..="5"`) to its hex value
pub fn resolve_legacy(key: &str) -> Option<&'static str> {
    LEGACY_COLOR_MAP.get(key.trim())
}
