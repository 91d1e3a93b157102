//! Engine configuration — the two knobs host sites persist.

use serde::{Deserialize, Serialize};

/// Initial engine state. Host sites typically deserialize this from
/// their stored user preferences and hand it to `SoundEngine::new`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Global mute switch; when false, `play()` does nothing at all.
    pub enabled: bool,
    /// Master volume in [0, 1]; clamped on construction.
    pub master_volume: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            enabled: true,
            master_volume: 0.7,
        }
    }
}

impl EngineConfig {
    /// Copy with `master_volume` forced into [0, 1]; non-finite values
    /// fall back to the default.
    pub fn clamped(self) -> Self {
        let master_volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            EngineConfig::default().master_volume
        };
        EngineConfig {
            master_volume,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_enabled_at_moderate_volume() {
        let c = EngineConfig::default();
        assert!(c.enabled);
        assert_eq!(c.master_volume, 0.7);
    }

    #[test]
    fn clamped_forces_unit_range() {
        let c = EngineConfig {
            enabled: true,
            master_volume: 2.0,
        };
        assert_eq!(c.clamped().master_volume, 1.0);

        let c = EngineConfig {
            enabled: true,
            master_volume: -1.0,
        };
        assert_eq!(c.clamped().master_volume, 0.0);
    }

    #[test]
    fn clamped_replaces_non_finite_volume() {
        let c = EngineConfig {
            enabled: false,
            master_volume: f64::NAN,
        };
        let c = c.clamped();
        assert_eq!(c.master_volume, 0.7);
        assert!(!c.enabled);
    }
}
