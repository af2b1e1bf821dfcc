//! Engine settings and preferences
//!
//! Cosmetic budgets and viewport live here; nothing in this file may change combat outcomes.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Whether the background grid is painted
    pub fn grid_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }

    /// Circle tessellation density for mesh output
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 10,
            QualityPreset::Medium => 18,
            QualityPreset::High => 32,
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Hit particles
    pub particles: bool,
    /// Floating damage numbers
    pub damage_numbers: bool,

    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Menu ===
    /// Number of cards offered on level-up
    pub choice_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            damage_numbers: true,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            choice_count: 3,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Parse settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse settings if given, falling back to defaults on any error
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings (quality: {})", settings.quality.as_str());
                settings
            }
            Some(Err(e)) => {
                log::warn!("Invalid settings, using defaults: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Clamp values the engine cannot work with
    fn sanitize(&mut self) {
        if !(self.viewport_width.is_finite() && self.viewport_width > 0.0) {
            self.viewport_width = DEFAULT_VIEWPORT_WIDTH;
        }
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            self.viewport_height = DEFAULT_VIEWPORT_HEIGHT;
        }
        self.choice_count = self.choice_count.clamp(1, 6);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_takes_defaults() {
        let settings = Settings::from_json(r#"{ "quality": "High", "particles": false }"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.choice_count, 3);
        assert_eq!(settings.viewport_width, DEFAULT_VIEWPORT_WIDTH);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let settings = Settings::load_or_default(Some("{ not json"));
        assert_eq!(settings.quality, QualityPreset::Medium);
        let settings = Settings::load_or_default(None);
        assert!(settings.damage_numbers);
    }

    #[test]
    fn test_sanitize_bad_viewport() {
        let settings =
            Settings::from_json(r#"{ "viewport_width": -5.0, "choice_count": 0 }"#).unwrap();
        assert_eq!(settings.viewport_width, DEFAULT_VIEWPORT_WIDTH);
        assert_eq!(settings.choice_count, 1);
    }

    #[test]
    fn test_preset_roundtrip_names() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::parse(preset.as_str()), Some(preset));
        }
        let json = Settings::from_preset(QualityPreset::Low).to_json().unwrap();
        assert!(json.contains("Low"));
    }
}
