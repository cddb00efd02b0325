//! Engine configuration
//!
//! Every field has a default so partial TOML files are valid. Layout values
//! are not used by the engine itself; they are handed to the overlay presenter.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub polling: PollingConfig,
    pub discovery: DiscoveryConfig,
    pub mirror: MirrorConfig,
    pub layout: BadgeLayout,
}

impl EngineConfig {
    /// Parse TOML and clamp layout values into their supported ranges
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: EngineConfig = toml::from_str(text)?;
        config.layout = config.layout.clamped();
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Timer intervals, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Open/closed detection and anchor tracking
    pub detect_interval_ms: u64,
    /// Full recount while open
    pub refresh_interval_ms: u64,
    /// Delay before either timer first fires
    pub initial_delay_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            detect_interval_ms: 250,
            refresh_interval_ms: 250,
            initial_delay_ms: 250,
        }
    }
}

impl PollingConfig {
    pub fn detect_interval(&self) -> Duration {
        Duration::from_millis(self.detect_interval_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

/// Naming heuristics used to find slots, containers, models and anchors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Strong marker: type names of individual inventory slot widgets
    pub slot_marker: String,
    /// Broad fallback keyword for inventory-ish components
    pub container_keyword: String,
    /// Type-name fragment of renderable roots
    pub canvas_keyword: String,
    /// Type-name fragments of objects that may own the item model
    pub model_keywords: Vec<String>,
    /// Object/resource name fragments of the anchor icon
    pub anchor_keywords: Vec<String>,
    /// Name fragment of the overlay's own objects, never used as anchors
    pub overlay_marker: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            slot_marker: "InventoryUIItem".to_string(),
            container_keyword: "Inventory".to_string(),
            canvas_keyword: "Canvas".to_string(),
            model_keywords: vec!["Player".to_string(), "Inventory".to_string()],
            anchor_keywords: vec!["backpack".to_string(), "bag".to_string()],
            overlay_marker: "InventoryCounter".to_string(),
        }
    }
}

/// Where the authoritative item list lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub enabled: bool,
    /// Controller type holding the singleton
    pub type_name: String,
    /// Static accessors tried in order
    pub accessors: Vec<String>,
    /// Instance attribute holding the item list
    pub items_attribute: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            type_name: "InGameUI".to_string(),
            accessors: vec!["instance".to_string(), "realInstance".to_string()],
            items_attribute: "items".to_string(),
        }
    }
}

/// Badge tuning, as fractions of screen height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeLayout {
    pub badge_height_percent: f32,
    pub badge_width_to_height: f32,
    pub offset_x_percent: f32,
    pub offset_y_percent: f32,
}

impl Default for BadgeLayout {
    fn default() -> Self {
        Self {
            badge_height_percent: 0.035,
            badge_width_to_height: 1.6,
            offset_x_percent: 0.018,
            offset_y_percent: 0.014,
        }
    }
}

impl BadgeLayout {
    pub const HEIGHT_RANGE: (f32, f32) = (0.01, 0.20);
    pub const RATIO_RANGE: (f32, f32) = (1.0, 3.0);
    pub const OFFSET_RANGE: (f32, f32) = (0.0, 0.10);

    /// Copy with every value forced into its supported range
    pub fn clamped(&self) -> Self {
        Self {
            badge_height_percent: clamp_logged(
                "badge_height_percent",
                self.badge_height_percent,
                Self::HEIGHT_RANGE,
            ),
            badge_width_to_height: clamp_logged(
                "badge_width_to_height",
                self.badge_width_to_height,
                Self::RATIO_RANGE,
            ),
            offset_x_percent: clamp_logged("offset_x_percent", self.offset_x_percent, Self::OFFSET_RANGE),
            offset_y_percent: clamp_logged("offset_y_percent", self.offset_y_percent, Self::OFFSET_RANGE),
        }
    }
}

fn clamp_logged(field: &str, value: f32, (lo, hi): (f32, f32)) -> f32 {
    let clamped = if value.is_nan() { lo } else { value.clamp(lo, hi) };
    if clamped != value {
        tracing::warn!(field, value, clamped, "layout value out of range");
    }
    clamped
}
