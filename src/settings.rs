//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web; native builds use defaults or a JSON
//! file handed to [`Settings::from_json_file`].

use serde::{Deserialize, Serialize};

use crate::consts::{TIME_BETWEEN_HIGHLIGHTS, TIME_BETWEEN_ROUNDS};
use crate::error::{BloomError, Result};

/// Sequence pacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// Seconds each cube stays lit during playback
    pub time_between_highlights: f32,
    /// Seconds loaded into the playback timer after the sequence has played.
    ///
    /// Only visible through `time_to_next_event` while the player answers;
    /// it never delays the next round, whose playback starts the timer at 0.
    pub time_between_rounds: f32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            time_between_highlights: TIME_BETWEEN_HIGHLIGHTS,
            time_between_rounds: TIME_BETWEEN_ROUNDS,
        }
    }
}

impl Timing {
    /// Reject negative or non-finite durations
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("time_between_highlights", self.time_between_highlights),
            ("time_between_rounds", self.time_between_rounds),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(BloomError::InvalidTiming { name, value });
            }
        }
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timing: Timing,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Note volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    /// Fixed sequence seed (None = seed from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timing: Timing::default(),

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            show_fps: false,

            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.timing.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Effective note volume (respects mute)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "musical_bloom_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = crate::platform::storage::load::<Settings>(Self::STORAGE_KEY);
        match stored.map(|s| s.timing.validate().map(|_| s)) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if crate::platform::storage::save(Self::STORAGE_KEY, self) {
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.timing.time_between_highlights, 1.0);
        assert_eq!(settings.timing.time_between_rounds, 2.5);
        assert!(settings.timing.validate().is_ok());
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "timing": { "time_between_highlights": 0.5 }, "seed": 42 }"#)
            .unwrap();
        assert_eq!(settings.timing.time_between_highlights, 0.5);
        assert_eq!(settings.timing.time_between_rounds, 2.5);
        assert_eq!(settings.seed, Some(42));
        assert!(settings.mute_on_blur);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.muted = true;
        settings.seed = Some(9);
        let parsed = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert!(parsed.muted);
        assert_eq!(parsed.seed, Some(9));
        assert_eq!(parsed.effective_volume(), 0.0);
    }

    #[test]
    fn test_invalid_timing_rejected() {
        let err = Settings::from_json(r#"{ "timing": { "time_between_rounds": -1.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            BloomError::InvalidTiming { name: "time_between_rounds", .. }
        ));

        let timing = Timing {
            time_between_highlights: f32::NAN,
            ..Default::default()
        };
        assert!(timing.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(Settings::from_json("{ nope"), Err(BloomError::Settings(_))));
    }
}
