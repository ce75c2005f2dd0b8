//! Field settings and presets
//!
//! Persisted in LocalStorage on the web so a host page can pin a strategy.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::engine::StrategyKind;
use crate::error::Result;

/// Three-phase opacity envelope for ephemeral blobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub fade_in_ms: f64,
    /// Full-opacity hold after the fade-in completes
    pub hold_ms: f64,
    pub fade_out_ms: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            fade_in_ms: BLOB_FADE_IN_MS,
            hold_ms: BLOB_HOLD_MS,
            fade_out_ms: BLOB_FADE_OUT_MS,
        }
    }
}

impl Envelope {
    /// Age at which fade-out begins
    pub fn hold_until_ms(&self) -> f64 {
        self.fade_in_ms + self.hold_ms
    }

    /// Age at which a blob is expired
    pub fn lifetime_ms(&self) -> f64 {
        self.hold_until_ms() + self.fade_out_ms
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Which render strategy backs the field
    pub strategy: StrategyKind,

    // === Strokes ===
    /// Pointer travel required for one host-visible stroke
    pub stroke_threshold: f32,

    // === Canvas brush ===
    /// Interpolation step between brush stamps
    pub paint_step: f32,

    // === Blob field ===
    pub spawn_interval_ms: f64,
    pub blob_cap: usize,
    pub envelope: Envelope,

    // === Accessibility ===
    /// Treat the page as reduced-motion regardless of the system setting
    pub force_reduced_motion: bool,

    /// Fixed RNG seed (tests, screenshots); random per mount otherwise
    pub seed: Option<u64>,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self::from_preset(StrategyKind::Canvas)
    }
}

impl FieldSettings {
    /// Preset table for a strategy
    pub fn from_preset(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            stroke_threshold: STROKE_THRESHOLD,
            paint_step: PAINT_STEP,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            blob_cap: BLOB_CAP,
            envelope: Envelope::default(),
            force_reduced_motion: false,
            seed: None,
        }
    }

    /// Parse settings from JSON. Missing fields take the preset of the named
    /// strategy (or the canvas preset when no strategy is named).
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let strategy = match value.get("strategy") {
            Some(kind) => serde_json::from_value(kind.clone())?,
            None => StrategyKind::default(),
        };

        let mut merged = serde_json::to_value(Self::from_preset(strategy))?;
        if let (Some(dst), Some(src)) = (merged.as_object_mut(), value.as_object()) {
            for (key, val) in src {
                dst.insert(key.clone(), val.clone());
            }
        }
        let settings: Self = serde_json::from_value(merged)?;
        Ok(settings.sanitized())
    }

    /// Clamp values that would stall or break the engines
    pub fn sanitized(mut self) -> Self {
        if !(self.stroke_threshold.is_finite() && self.stroke_threshold > 0.0) {
            log::warn!("stroke_threshold {} rejected", self.stroke_threshold);
            self.stroke_threshold = STROKE_THRESHOLD;
        }
        if !(self.paint_step.is_finite() && self.paint_step > 0.0) {
            log::warn!("paint_step {} rejected", self.paint_step);
            self.paint_step = PAINT_STEP;
        }
        if self.blob_cap == 0 {
            self.blob_cap = BLOB_CAP;
        }
        self.spawn_interval_ms = self.spawn_interval_ms.max(0.0);
        self
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "hero_ambience_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Stored settings ignored: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("{} is only read on the web", Self::STORAGE_KEY);
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
    fn test_envelope_boundaries() {
        let env = Envelope::default();
        assert_eq!(env.hold_until_ms(), 2800.0);
        assert_eq!(env.lifetime_ms(), 3600.0);
    }

    #[test]
    fn test_presets_share_stroke_threshold() {
        for kind in [StrategyKind::Canvas, StrategyKind::Blobs, StrategyKind::Parallax] {
            let settings = FieldSettings::from_preset(kind);
            assert_eq!(settings.strategy, kind);
            assert_eq!(settings.stroke_threshold, 12.0);
        }
        assert_eq!(FieldSettings::from_preset(StrategyKind::Blobs).blob_cap, 26);
        assert_eq!(FieldSettings::from_preset(StrategyKind::Canvas).paint_step, 1.0);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let settings = FieldSettings::from_json(r#"{"strategy":"blobs","blob_cap":10}"#).unwrap();
        assert_eq!(settings.strategy, StrategyKind::Blobs);
        assert_eq!(settings.blob_cap, 10);
        assert_eq!(settings.spawn_interval_ms, 100.0);
        assert_eq!(settings.envelope, Envelope::default());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(FieldSettings::from_json("not json").is_err());
        assert!(FieldSettings::from_json(r#"{"strategy":"fireworks"}"#).is_err());
    }

    #[test]
    fn test_sanitize_bad_thresholds() {
        let settings = FieldSettings::from_json(r#"{"stroke_threshold":-3,"paint_step":0,"blob_cap":0}"#)
            .unwrap();
        assert_eq!(settings.stroke_threshold, STROKE_THRESHOLD);
        assert_eq!(settings.paint_step, PAINT_STEP);
        assert_eq!(settings.blob_cap, BLOB_CAP);
    }
}
