//! Run settings
//!
//! Read from a JSON file next to the binary; anything missing or unreadable
//! falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::Variant;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prototype (single map) or full leveled game
    pub variant: Variant,

    // === Levels ===
    /// Directory holding `<level>.txt` files. Bundled levels when unset.
    pub level_dir: Option<String>,
    /// Level to start on
    pub start_level: u32,

    // === Gameplay ===
    /// Touching a spark sends the ball back to the anchor
    pub spark_ends_flight: bool,

    // === Headless runner ===
    /// Frames to simulate before exiting
    pub frames: u64,
    /// Autopilot seed
    pub seed: u64,
    /// Log a HUD line every N frames (0 = never)
    pub hud_every: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Full,

            level_dir: None,
            start_level: 1,

            spark_ends_flight: true,

            frames: 60 * 120,
            seed: 0x5eed,
            hud_every: 600,
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "keyshot.json";

    /// Parse settings from JSON; unknown fields are ignored, missing ones default
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Invalid settings JSON: {}", e);
                None
            }
        }
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
            }
            Err(e) => log::warn!("Settings file {} unreadable ({})", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Level the game actually starts on for this variant
    pub fn effective_start_level(&self) -> u32 {
        self.variant.layout_level(self.start_level)
    }
}
